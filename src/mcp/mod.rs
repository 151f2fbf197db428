//! MCP protocol surface.
//!
//! [`DbService`] maps tools, the schema prompt, table resources and
//! completions onto the database handlers.

pub mod service;

pub use service::DbService;
