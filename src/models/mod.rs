//! Data models for the MySQL MCP Server.
//!
//! This module re-exports all model types used throughout the application.

pub mod query;
pub mod request;
pub mod resource;
pub mod schema;

// Re-export commonly used types
pub use query::{QueryInput, QueryResult, Row};
pub use request::{Operation, SqlText};
pub use resource::{RESOURCE_MIME_TYPE, ResourceBase, SCHEMA_PATH};
pub use schema::{
    ALL_TABLES_SENTINEL, ColumnDescriptor, SchemaDocument, SchemaTarget, TableName, TableSchema,
};
