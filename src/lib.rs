//! MySQL MCP Server Library
//!
//! This library exposes a single MySQL database to AI assistants through MCP
//! (Model Context Protocol): table listing, reconstructed DDL, per-table
//! schema resources and read-only queries.

pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::DbError;
pub use mcp::DbService;
