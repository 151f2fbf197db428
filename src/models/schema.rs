//! Schema-related data models.
//!
//! Catalog rows are turned into [`ColumnDescriptor`]s, grouped into
//! [`TableSchema`]s and collected into a [`SchemaDocument`] for rendering.

use crate::error::{DbError, DbResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Table-name argument value meaning "every table in the current database".
pub const ALL_TABLES_SENTINEL: &str = "all-tables";

/// Nullability flag value the catalog uses for `NOT NULL` columns.
const NOT_NULLABLE_FLAG: &str = "NO";

/// A table name supplied by a client, checked to be non-blank.
///
/// The name is kept exactly as given and only ever reaches SQL as a bound parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableName(String);

impl TableName {
    pub fn parse(name: impl Into<String>) -> DbResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DbError::invalid_argument("table_name must not be empty"));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TableName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which tables a schema request covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaTarget {
    AllTables,
    Table(TableName),
}

impl SchemaTarget {
    /// Interpret a single table-name argument where [`ALL_TABLES_SENTINEL`] means everything.
    pub fn from_table_argument(value: Option<&str>) -> DbResult<Self> {
        match value {
            None => Err(DbError::invalid_argument(format!(
                "table_name is required; pass a table name or '{ALL_TABLES_SENTINEL}'"
            ))),
            Some(ALL_TABLES_SENTINEL) => Ok(Self::AllTables),
            Some(name) => TableName::parse(name).map(Self::Table),
        }
    }

    /// Interpret a `mode` selector (`all` or `table`) plus an optional table name.
    pub fn from_mode(mode: &str, table_name: Option<&str>) -> DbResult<Self> {
        match mode.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::AllTables),
            "table" => match table_name {
                Some(name) => TableName::parse(name).map(Self::Table),
                None => Err(DbError::invalid_argument(
                    "table_name is required when mode is 'table'",
                )),
            },
            other => Err(DbError::invalid_argument(format!(
                "Unrecognized mode '{other}'. Use 'all' or 'table'"
            ))),
        }
    }
}

impl std::fmt::Display for SchemaTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AllTables => f.write_str(ALL_TABLES_SENTINEL),
            Self::Table(name) => write!(f, "{name}"),
        }
    }
}

/// One column as reported by `information_schema.COLUMNS`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ColumnDescriptor {
    pub table_name: String,
    pub column_name: String,
    /// Catalog `DATA_TYPE`, e.g. `int`, `varchar`
    pub data_type: String,
    pub is_nullable: bool,
    /// Default exactly as the catalog returns it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl ColumnDescriptor {
    /// Build a descriptor from raw catalog text.
    ///
    /// Only a flag of exactly `NO` marks the column as not nullable.
    pub fn from_catalog(
        table_name: impl Into<String>,
        column_name: impl Into<String>,
        data_type: impl Into<String>,
        nullable_flag: &str,
        default_value: Option<String>,
    ) -> Self {
        Self {
            table_name: table_name.into(),
            column_name: column_name.into(),
            data_type: data_type.into(),
            is_nullable: nullable_flag != NOT_NULLABLE_FLAG,
            default_value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub table_name: String,
    /// Catalog order, never re-sorted
    pub columns: Vec<ColumnDescriptor>,
}

/// Tables sorted by name, each holding its columns in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaDocument {
    pub tables: Vec<TableSchema>,
}

impl SchemaDocument {
    /// Group catalog rows by table.
    ///
    /// Table names are ordered by byte-wise comparison; the relative order of
    /// rows inside one table is kept as received.
    pub fn from_columns(columns: impl IntoIterator<Item = ColumnDescriptor>) -> Self {
        let mut grouped: BTreeMap<String, Vec<ColumnDescriptor>> = BTreeMap::new();
        for column in columns {
            grouped
                .entry(column.table_name.clone())
                .or_default()
                .push(column);
        }

        let tables = grouped
            .into_iter()
            .map(|(table_name, columns)| TableSchema {
                table_name,
                columns,
            })
            .collect();

        Self { tables }
    }
}
