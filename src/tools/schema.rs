//! Schema introspection tools.
//!
//! This module implements table listing, DDL rendering, table-name completion
//! and the per-table schema resources.

use crate::db::catalog;
use crate::db::{ConnectionLease, ConnectionSource};
use crate::error::{DbError, DbResult};
use crate::models::{
    ALL_TABLES_SENTINEL, RESOURCE_MIME_TYPE, ResourceBase, SchemaTarget, TableName,
};
use crate::tools::ddl::render_schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Input for the describe_schema tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DescribeSchemaInput {
    /// "all" for every table in the database, "table" for a single table
    pub mode: String,
    /// Table to describe. Required when mode is "table"
    #[serde(default)]
    pub table_name: Option<String>,
}

/// Input for the list_tables tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct ListTablesInput {}

/// Output from the list_tables tool.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct ListTablesOutput {
    pub tables: Vec<TableEntry>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct TableEntry {
    pub name: String,
}

/// A table exposed as a schema resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableResource {
    pub uri: String,
    pub name: String,
    pub mime_type: &'static str,
}

/// Schema document served for one table resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableResourceContent {
    pub uri: String,
    /// JSON array of column descriptors
    pub text: String,
}

pub struct SchemaToolHandler<S> {
    source: Arc<S>,
    resources: ResourceBase,
}

impl<S: ConnectionSource> SchemaToolHandler<S> {
    pub fn new(source: Arc<S>, resources: ResourceBase) -> Self {
        Self { source, resources }
    }

    pub fn resources(&self) -> &ResourceBase {
        &self.resources
    }

    async fn table_names(&self) -> DbResult<Vec<String>> {
        let mut lease = ConnectionLease::acquire(self.source.as_ref()).await?;
        let result = catalog::list_tables(lease.conn()?).await;
        lease.release();
        result
    }

    pub async fn list_tables(&self) -> DbResult<ListTablesOutput> {
        let tables = self.table_names().await?;
        let count = tables.len();

        info!(count = count, "Listed tables");

        Ok(ListTablesOutput {
            tables: tables.into_iter().map(|name| TableEntry { name }).collect(),
            count,
        })
    }

    /// Fenced DDL text for one table or the whole database.
    ///
    /// An unknown table renders as an empty block.
    pub async fn get_schema_text(&self, target: &SchemaTarget) -> DbResult<String> {
        let mut lease = ConnectionLease::acquire(self.source.as_ref()).await?;
        let result = catalog::list_columns(lease.conn()?, target).await;
        lease.release();
        let columns = result?;

        info!(target = %target, columns = columns.len(), "Described schema");

        Ok(render_schema(&columns))
    }

    /// Candidate values for a `table_name` argument.
    ///
    /// Fragments containing whitespace never match a table and return nothing
    /// without touching the database. Otherwise the sentinel comes first,
    /// followed by every table name unfiltered.
    pub async fn complete_table_name(&self, fragment: &str) -> DbResult<Vec<String>> {
        if fragment.chars().any(char::is_whitespace) {
            debug!(fragment = %fragment, "Skipping completion for fragment with whitespace");
            return Ok(Vec::new());
        }

        let tables = self.table_names().await?;
        let mut values = Vec::with_capacity(tables.len() + 1);
        values.push(ALL_TABLES_SENTINEL.to_string());
        values.extend(tables);
        Ok(values)
    }

    pub async fn list_table_resources(&self) -> DbResult<Vec<TableResource>> {
        let tables = self.table_names().await?;

        let resources: Vec<TableResource> = tables
            .into_iter()
            .map(|name| {
                let uri = match TableName::parse(name.as_str()) {
                    Ok(table) => self.resources.table_uri(&table),
                    Err(_) => return Err(DbError::internal("Catalog returned a blank table name")),
                };
                Ok(TableResource {
                    uri,
                    name: format!("\"{name}\" database schema"),
                    mime_type: RESOURCE_MIME_TYPE,
                })
            })
            .collect::<DbResult<_>>()?;

        info!(count = resources.len(), "Listed table resources");
        Ok(resources)
    }

    /// Column descriptors of one table as a JSON array.
    pub async fn read_table_resource(&self, table: &TableName) -> DbResult<TableResourceContent> {
        let target = SchemaTarget::Table(table.clone());
        let mut lease = ConnectionLease::acquire(self.source.as_ref()).await?;
        let result = catalog::list_columns(lease.conn()?, &target).await;
        lease.release();
        let columns = result?;

        let text = serde_json::to_string_pretty(&columns)
            .map_err(|e| DbError::internal(format!("Failed to serialize columns: {e}")))?;

        Ok(TableResourceContent {
            uri: self.resources.table_uri(table),
            text,
        })
    }
}
