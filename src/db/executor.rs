//! Read-only query execution.
//!
//! Client SQL runs inside a transaction that the server itself marks
//! `READ ONLY`, so any write is rejected by MySQL with SQLSTATE 25006. The
//! transaction is always rolled back and the connection always goes back to
//! its source, whatever the statement did.

use crate::db::connection::{ConnectionLease, ConnectionSource, DbConnection};
use crate::error::{DbError, DbResult};
use crate::models::{QueryResult, Row};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Applies to the next transaction on this session.
pub const SET_READ_ONLY: &str = "SET SESSION TRANSACTION READ ONLY";
pub const BEGIN: &str = "START TRANSACTION";
pub const ROLLBACK: &str = "ROLLBACK";

/// Run client SQL on a pooled connection inside a read-only transaction.
///
/// The SQL is sent verbatim as a single prepared statement with no parameters.
pub async fn run_read_only<S: ConnectionSource>(source: &S, sql: &str) -> DbResult<QueryResult> {
    let start = Instant::now();
    debug!(sql = %sql, "Executing read-only query");

    let mut lease = ConnectionLease::acquire(source).await?;
    let outcome = run_in_read_only_scope(lease.conn()?, sql).await;
    lease.release();

    let rows = outcome?;
    let result = QueryResult::new(rows, start.elapsed().as_millis() as u64);
    info!(
        row_count = result.row_count,
        execution_time_ms = result.execution_time_ms,
        "Query completed"
    );
    Ok(result)
}

/// Wrap `sql` in `SET SESSION TRANSACTION READ ONLY` / `START TRANSACTION`
/// and always finish with `ROLLBACK`.
///
/// A failed rollback is logged and never replaces the statement's own outcome.
/// The connection is then in an unknown transaction state and is discarded.
pub async fn run_in_read_only_scope<C: DbConnection>(
    conn: &mut C,
    sql: &str,
) -> DbResult<Vec<Row>> {
    let outcome = async {
        conn.execute(SET_READ_ONLY).await?;
        conn.execute(BEGIN).await?;
        conn.fetch_statement(sql).await
    }
    .await;

    if let Err(e) = conn.execute(ROLLBACK).await {
        warn!(error = %e, "Rollback after read-only query failed, discarding connection");
        conn.discard();
    }

    outcome.map_err(|e| {
        debug!(error = %e, "Read-only query failed");
        DbError::query_execution(e)
    })
}
