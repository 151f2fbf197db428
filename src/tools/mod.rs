//! MCP tool implementations.
//!
//! This module contains the database handlers and the single dispatch point
//! that maps a validated [`Operation`] onto them:
//! - `ddl`: DDL text rendering from catalog rows
//! - `schema`: table listing, schema text, completion and resources
//! - `query`: read-only query execution

pub mod ddl;
pub mod query;
pub mod schema;

pub use query::QueryToolHandler;
pub use schema::{
    DescribeSchemaInput, ListTablesInput, ListTablesOutput, SchemaToolHandler, TableEntry,
    TableResource, TableResourceContent,
};

use crate::db::ConnectionSource;
use crate::error::DbResult;
use crate::models::{Operation, QueryResult, ResourceBase};
use std::sync::Arc;
use tracing::debug;

/// Result of dispatching an [`Operation`], one variant per operation.
#[derive(Debug, Clone)]
pub enum OperationOutput {
    Tables(ListTablesOutput),
    TableResources(Vec<TableResource>),
    SchemaText(String),
    TableResource(TableResourceContent),
    Rows(QueryResult),
    Completions(Vec<String>),
}

pub struct DatabaseTools<S> {
    schema: SchemaToolHandler<S>,
    query: QueryToolHandler<S>,
}

impl<S: ConnectionSource> DatabaseTools<S> {
    pub fn new(source: Arc<S>, resources: ResourceBase) -> Self {
        Self {
            schema: SchemaToolHandler::new(Arc::clone(&source), resources),
            query: QueryToolHandler::new(source),
        }
    }

    pub fn schema(&self) -> &SchemaToolHandler<S> {
        &self.schema
    }

    pub async fn dispatch(&self, operation: Operation) -> DbResult<OperationOutput> {
        debug!(operation = operation.name(), "Dispatching operation");
        match operation {
            Operation::ListTables => self.schema.list_tables().await.map(OperationOutput::Tables),
            Operation::ListTableResources => self
                .schema
                .list_table_resources()
                .await
                .map(OperationOutput::TableResources),
            Operation::DescribeSchema(target) => self
                .schema
                .get_schema_text(&target)
                .await
                .map(OperationOutput::SchemaText),
            Operation::ReadTableResource(table) => self
                .schema
                .read_table_resource(&table)
                .await
                .map(OperationOutput::TableResource),
            Operation::Query(sql) => self.query.query(&sql).await.map(OperationOutput::Rows),
            Operation::CompleteTableName(fragment) => self
                .schema
                .complete_table_name(&fragment)
                .await
                .map(OperationOutput::Completions),
        }
    }
}
