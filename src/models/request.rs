//! Validated requests.
//!
//! Every inbound tool call, prompt, resource read and completion is turned
//! into an [`Operation`] before any connection is acquired.

use crate::error::{DbError, DbResult};
use crate::models::schema::{SchemaTarget, TableName};

/// SQL text that has been checked to be non-blank. It is otherwise passed verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlText(String);

impl SqlText {
    pub fn parse(sql: impl Into<String>) -> DbResult<Self> {
        let sql = sql.into();
        if sql.trim().is_empty() {
            return Err(DbError::invalid_argument("sql must not be empty"));
        }
        Ok(Self(sql))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Every request kind the server understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    ListTables,
    ListTableResources,
    DescribeSchema(SchemaTarget),
    ReadTableResource(TableName),
    Query(SqlText),
    CompleteTableName(String),
}

impl Operation {
    pub fn query(sql: impl Into<String>) -> DbResult<Self> {
        SqlText::parse(sql).map(Self::Query)
    }

    pub fn describe_schema(mode: &str, table_name: Option<&str>) -> DbResult<Self> {
        SchemaTarget::from_mode(mode, table_name).map(Self::DescribeSchema)
    }

    pub fn schema_prompt(table_name: Option<&str>) -> DbResult<Self> {
        SchemaTarget::from_table_argument(table_name).map(Self::DescribeSchema)
    }

    /// Short name used in log events.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ListTables => "list_tables",
            Self::ListTableResources => "list_table_resources",
            Self::DescribeSchema(_) => "describe_schema",
            Self::ReadTableResource(_) => "read_table_resource",
            Self::Query(_) => "query",
            Self::CompleteTableName(_) => "complete_table_name",
        }
    }
}
