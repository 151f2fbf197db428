//! Database access layer.
//!
//! This module provides database access functionality:
//! - The connection interface and its scoped lease
//! - Connection pool management
//! - Metadata catalog reads
//! - Read-only query execution
//! - Type mappings

pub mod catalog;
pub mod connection;
pub mod executor;
pub mod pool;
pub mod types;

pub use connection::{ConnectionLease, ConnectionSource, DbConnection};
pub use executor::run_read_only;
pub use pool::{ConnectionManager, PooledConnection};
