//! Connection interface used by the catalog reader and the query executor.
//!
//! The schema and query logic only sees [`ConnectionSource`] and
//! [`DbConnection`]; the sqlx pool in [`crate::db::pool`] is one implementation
//! and the integration tests provide an in-memory one.

use crate::error::{DbError, DbResult, DriverError};
use crate::models::Row;
use std::future::Future;

/// A single checked-out database connection.
pub trait DbConnection: Send {
    /// Run one of the server's catalog statements, binding each `?`
    /// placeholder positionally to a text value.
    fn fetch_rows(
        &mut self,
        sql: &str,
        params: &[&str],
    ) -> impl Future<Output = Result<Vec<Row>, DriverError>> + Send;

    /// Run client SQL as exactly one prepared statement and collect its rows.
    ///
    /// MySQL refuses to prepare stacked statements, so text such as
    /// `COMMIT; DELETE FROM t` fails as a whole before any part of it runs.
    fn fetch_statement(
        &mut self,
        sql: &str,
    ) -> impl Future<Output = Result<Vec<Row>, DriverError>> + Send;

    /// Run one of the server's own session statements. Never client text.
    fn execute(&mut self, sql: &str) -> impl Future<Output = Result<(), DriverError>> + Send;

    /// Keep this connection out of circulation once it is released.
    fn discard(&mut self);
}

/// Hands out connections and takes them back.
pub trait ConnectionSource: Send + Sync {
    type Connection: DbConnection;

    fn acquire(&self) -> impl Future<Output = DbResult<Self::Connection>> + Send;

    /// Return a connection. Called exactly once per acquired connection.
    fn release(&self, connection: Self::Connection);
}

/// A connection borrowed from a [`ConnectionSource`] for one request.
///
/// The connection goes back to its source when the lease is released or
/// dropped, whichever happens first, and never twice.
pub struct ConnectionLease<'a, S: ConnectionSource> {
    source: &'a S,
    connection: Option<S::Connection>,
}

impl<'a, S: ConnectionSource> ConnectionLease<'a, S> {
    pub async fn acquire(source: &'a S) -> DbResult<Self> {
        let connection = source.acquire().await?;
        Ok(Self {
            source,
            connection: Some(connection),
        })
    }

    pub fn conn(&mut self) -> DbResult<&mut S::Connection> {
        self.connection
            .as_mut()
            .ok_or_else(|| DbError::internal("Connection lease already released"))
    }

    pub fn release(mut self) {
        self.give_back();
    }

    fn give_back(&mut self) {
        if let Some(connection) = self.connection.take() {
            self.source.release(connection);
        }
    }
}

impl<S: ConnectionSource> Drop for ConnectionLease<'_, S> {
    fn drop(&mut self) {
        self.give_back();
    }
}

impl<S: ConnectionSource> std::fmt::Debug for ConnectionLease<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionLease")
            .field("held", &self.connection.is_some())
            .finish_non_exhaustive()
    }
}
