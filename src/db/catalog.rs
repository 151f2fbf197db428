//! Metadata catalog reader.
//!
//! Reads table and column metadata from `information_schema`, always scoped to
//! the connection's current database via `DATABASE()`. Client-supplied table
//! names are bound as parameters and never spliced into the SQL text.

use crate::db::connection::DbConnection;
use crate::error::{DbError, DbResult, DriverError};
use crate::models::{ColumnDescriptor, Row, SchemaTarget};
use serde_json::Value as JsonValue;
use tracing::debug;

/// Catalog SQL.
///
/// Identifier columns are converted to utf8mb4 because MySQL 8 reports some
/// `information_schema` columns with a binary collation.
pub mod queries {
    pub const LIST_TABLES: &str = r#"
        SELECT CONVERT(TABLE_NAME USING utf8mb4) AS table_name
        FROM information_schema.TABLES
        WHERE TABLE_SCHEMA = DATABASE()
        ORDER BY TABLE_NAME
    "#;

    pub const LIST_COLUMNS_ALL: &str = r#"
        SELECT
            CONVERT(TABLE_NAME USING utf8mb4) AS table_name,
            CONVERT(COLUMN_NAME USING utf8mb4) AS column_name,
            CONVERT(DATA_TYPE USING utf8mb4) AS data_type,
            CONVERT(IS_NULLABLE USING utf8mb4) AS is_nullable,
            CONVERT(COLUMN_DEFAULT USING utf8mb4) AS column_default
        FROM information_schema.COLUMNS
        WHERE TABLE_SCHEMA = DATABASE()
        ORDER BY TABLE_NAME, ORDINAL_POSITION
    "#;

    pub const LIST_COLUMNS_FOR_TABLE: &str = r#"
        SELECT
            CONVERT(TABLE_NAME USING utf8mb4) AS table_name,
            CONVERT(COLUMN_NAME USING utf8mb4) AS column_name,
            CONVERT(DATA_TYPE USING utf8mb4) AS data_type,
            CONVERT(IS_NULLABLE USING utf8mb4) AS is_nullable,
            CONVERT(COLUMN_DEFAULT USING utf8mb4) AS column_default
        FROM information_schema.COLUMNS
        WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?
        ORDER BY TABLE_NAME, ORDINAL_POSITION
    "#;
}

/// Names of every table (and view) in the current database, ordered by name.
pub async fn list_tables<C: DbConnection>(conn: &mut C) -> DbResult<Vec<String>> {
    debug!("Listing tables");
    let rows = conn
        .fetch_rows(queries::LIST_TABLES, &[])
        .await
        .map_err(DbError::catalog_query)?;

    rows.iter()
        .map(|row| required_text(row, "table_name"))
        .collect()
}

/// Column metadata for one table or the whole database, in catalog order.
///
/// An unknown table yields an empty list rather than an error.
pub async fn list_columns<C: DbConnection>(
    conn: &mut C,
    target: &SchemaTarget,
) -> DbResult<Vec<ColumnDescriptor>> {
    let rows = match target {
        SchemaTarget::AllTables => {
            debug!("Listing columns for all tables");
            conn.fetch_rows(queries::LIST_COLUMNS_ALL, &[]).await
        }
        SchemaTarget::Table(name) => {
            debug!(table = %name, "Listing columns for table");
            conn.fetch_rows(queries::LIST_COLUMNS_FOR_TABLE, &[name.as_str()])
                .await
        }
    }
    .map_err(DbError::catalog_query)?;

    rows.iter().map(column_from_row).collect()
}

fn column_from_row(row: &Row) -> DbResult<ColumnDescriptor> {
    let nullable_flag = required_text(row, "is_nullable")?;
    Ok(ColumnDescriptor::from_catalog(
        required_text(row, "table_name")?,
        required_text(row, "column_name")?,
        required_text(row, "data_type")?,
        &nullable_flag,
        optional_text(row, "column_default"),
    ))
}

fn required_text(row: &Row, field: &str) -> DbResult<String> {
    match row.get(field) {
        Some(JsonValue::String(s)) => Ok(s.clone()),
        Some(JsonValue::Null) | None => Err(malformed_row(field)),
        Some(other) => Ok(other.to_string()),
    }
}

fn optional_text(row: &Row, field: &str) -> Option<String> {
    match row.get(field) {
        Some(JsonValue::String(s)) => Some(s.clone()),
        Some(JsonValue::Null) | None => None,
        Some(other) => Some(other.to_string()),
    }
}

fn malformed_row(field: &str) -> DbError {
    DbError::catalog_query(DriverError::new(
        format!("Catalog row is missing required field '{field}'"),
        None,
    ))
}
