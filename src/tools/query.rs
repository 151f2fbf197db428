//! Query execution tool.
//!
//! This module implements the `query` MCP tool. Statements are not inspected;
//! MySQL itself rejects writes inside the read-only transaction they run in.

use crate::db::{ConnectionSource, run_read_only};
use crate::error::DbResult;
use crate::models::{QueryResult, SqlText};
use std::sync::Arc;

pub struct QueryToolHandler<S> {
    source: Arc<S>,
}

impl<S: ConnectionSource> QueryToolHandler<S> {
    pub fn new(source: Arc<S>) -> Self {
        Self { source }
    }

    pub async fn query(&self, sql: &SqlText) -> DbResult<QueryResult> {
        run_read_only(self.source.as_ref(), sql.as_str()).await
    }
}
