//! Query-related data models.
//!
//! This module defines types for SQL query inputs and results.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One result row, keyed by column name in SELECT order.
pub type Row = serde_json::Map<String, JsonValue>;

/// Input for the `query` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QueryInput {
    /// SQL statement to run inside a read-only transaction
    pub sql: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct QueryResult {
    /// Result rows keyed by column name, in SELECT order
    pub rows: Vec<Row>,
    pub row_count: usize,
    pub execution_time_ms: u64,
}

impl QueryResult {
    pub fn new(rows: Vec<Row>, execution_time_ms: u64) -> Self {
        Self {
            row_count: rows.len(),
            rows,
            execution_time_ms,
        }
    }
}
