//! MCP service implementation using rmcp.
//!
//! This module defines the DbService struct exposing the database through the
//! MCP protocol: tools via the rmcp tool router, plus a schema prompt,
//! per-table resources and table-name completion implemented on
//! [`ServerHandler`] directly.
//!
//! Every entry point first validates its arguments into an [`Operation`] and
//! only then touches the database.

use crate::db::ConnectionManager;
use crate::error::DbError;
use crate::models::{ALL_TABLES_SENTINEL, Operation, QueryInput, QueryResult, ResourceBase};
use crate::tools::{
    DatabaseTools, DescribeSchemaInput, ListTablesOutput, OperationOutput, TableResource,
    TableResourceContent,
};
use rmcp::Json;
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{
        AnnotateAble, CallToolResult, CompleteRequestParam, CompleteResult, CompletionInfo,
        Content, GetPromptRequestParam, GetPromptResult, Implementation, JsonObject,
        ListPromptsResult, ListResourcesResult, PaginatedRequestParam, Prompt, PromptArgument,
        PromptMessage, PromptMessageRole, ProtocolVersion, RawResource, ReadResourceRequestParam,
        ReadResourceResult, Reference, Resource, ResourceContents, ServerCapabilities,
        ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use std::sync::Arc;
use tracing::info;

/// Name of the schema prompt.
pub const SCHEMA_PROMPT: &str = "mysql-schema";
/// The prompt's only argument, also the only one with completions.
pub const TABLE_NAME_ARGUMENT: &str = "table_name";

/// Completion responses are capped at this many values.
const MAX_COMPLETION_VALUES: usize = 100;

#[derive(Clone)]
pub struct DbService {
    /// Schema and query handlers over the shared pool
    tools: Arc<DatabaseTools<ConnectionManager>>,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

impl DbService {
    /// Create a new DbService instance.
    ///
    /// # Arguments
    ///
    /// * `connection_manager` - Shared pool every request borrows a connection from
    /// * `resources` - Base that table resource URIs are built from
    pub fn new(connection_manager: Arc<ConnectionManager>, resources: ResourceBase) -> Self {
        Self {
            tools: Arc::new(DatabaseTools::new(connection_manager, resources)),
            tool_router: Self::tool_router(),
        }
    }

    async fn run(&self, operation: Operation) -> Result<OperationOutput, McpError> {
        self.tools.dispatch(operation).await.map_err(McpError::from)
    }

    fn schema_prompt() -> Prompt {
        Prompt::new(
            SCHEMA_PROMPT,
            Some("Show the CREATE TABLE definition of one table, or of every table"),
            Some(vec![PromptArgument {
                name: TABLE_NAME_ARGUMENT.to_string(),
                title: None,
                description: Some(format!(
                    "Table to describe, or '{ALL_TABLES_SENTINEL}' for the whole database"
                )),
                required: Some(true),
            }]),
        )
    }

    /// Build the schema prompt for the given arguments.
    async fn prompt_result(
        &self,
        name: &str,
        arguments: Option<&JsonObject>,
    ) -> Result<GetPromptResult, McpError> {
        if name != SCHEMA_PROMPT {
            return Err(DbError::unknown_operation("prompt", name).into());
        }

        let table_name = arguments
            .and_then(|args| args.get(TABLE_NAME_ARGUMENT))
            .and_then(|value| value.as_str());
        let operation = Operation::schema_prompt(table_name)?;

        let OperationOutput::SchemaText(ddl) = self.run(operation).await? else {
            return Err(DbError::internal("describe_schema produced no schema text").into());
        };

        let subject = match table_name {
            Some(ALL_TABLES_SENTINEL) | None => "every table in the database".to_string(),
            Some(table) => format!("the `{table}` table"),
        };
        let text = format!(
            "Here is the MySQL schema for {subject}:\n\n{ddl}\n\n\
            Use these definitions when writing queries against this database. \
            Only read-only statements (SELECT, SHOW, DESCRIBE, EXPLAIN) can be run."
        );

        Ok(GetPromptResult {
            description: Some(format!("MySQL schema for {subject}")),
            messages: vec![PromptMessage::new_text(PromptMessageRole::User, text)],
        })
    }

    /// Completion values for one argument of a prompt.
    async fn completion_values(
        &self,
        prompt: &str,
        argument: &str,
        fragment: &str,
    ) -> Result<Vec<String>, McpError> {
        if prompt != SCHEMA_PROMPT {
            return Err(DbError::unknown_operation("prompt", prompt).into());
        }
        if argument != TABLE_NAME_ARGUMENT {
            return Ok(Vec::new());
        }

        match self
            .run(Operation::CompleteTableName(fragment.to_string()))
            .await?
        {
            OperationOutput::Completions(values) => Ok(values),
            _ => Err(DbError::internal("completion produced no values").into()),
        }
    }

    async fn table_resources(&self) -> Result<Vec<TableResource>, McpError> {
        match self.run(Operation::ListTableResources).await? {
            OperationOutput::TableResources(resources) => Ok(resources),
            _ => Err(DbError::internal("resource listing produced no resources").into()),
        }
    }

    async fn table_resource(&self, uri: &str) -> Result<TableResourceContent, McpError> {
        let table = self.tools.schema().resources().parse_table_uri(uri)?;
        match self.run(Operation::ReadTableResource(table)).await? {
            OperationOutput::TableResource(content) => Ok(content),
            _ => Err(DbError::internal("resource read produced no content").into()),
        }
    }
}

fn into_resource(resource: TableResource) -> Resource {
    let mut raw = RawResource::new(resource.uri, resource.name);
    raw.mime_type = Some(resource.mime_type.to_string());
    raw.no_annotation()
}

fn into_contents(content: TableResourceContent) -> ResourceContents {
    let mut contents = ResourceContents::text(content.text, content.uri);
    if let ResourceContents::TextResourceContents { mime_type, .. } = &mut contents {
        *mime_type = Some(crate::models::RESOURCE_MIME_TYPE.to_string());
    }
    contents
}

fn completion_info(mut values: Vec<String>) -> CompletionInfo {
    let total = values.len();
    values.truncate(MAX_COMPLETION_VALUES);
    CompletionInfo {
        has_more: Some(total > values.len()),
        total: Some(total as u32),
        values,
    }
}

#[tool_router]
impl DbService {
    #[tool(
        description = "Execute a SQL statement inside a read-only transaction and return the rows.\nThe transaction is always rolled back; writes are rejected by the database (SQLSTATE 25006)."
    )]
    async fn query(
        &self,
        Parameters(input): Parameters<QueryInput>,
    ) -> Result<Json<QueryResult>, McpError> {
        match self.run(Operation::query(input.sql)?).await? {
            OperationOutput::Rows(result) => Ok(Json(result)),
            _ => Err(DbError::internal("query produced no rows").into()),
        }
    }

    #[tool(
        description = "Show CREATE TABLE definitions.\nmode \"all\" describes every table in the database; mode \"table\" requires table_name."
    )]
    async fn describe_schema(
        &self,
        Parameters(input): Parameters<DescribeSchemaInput>,
    ) -> Result<CallToolResult, McpError> {
        let operation = Operation::describe_schema(&input.mode, input.table_name.as_deref())?;
        match self.run(operation).await? {
            OperationOutput::SchemaText(ddl) => Ok(CallToolResult::success(vec![Content::text(ddl)])),
            _ => Err(DbError::internal("describe_schema produced no schema text").into()),
        }
    }

    #[tool(description = "List all tables and views in the connected database.")]
    async fn list_tables(&self) -> Result<Json<ListTablesOutput>, McpError> {
        match self.run(Operation::ListTables).await? {
            OperationOutput::Tables(output) => Ok(Json(output)),
            _ => Err(DbError::internal("list_tables produced no tables").into()),
        }
    }
}

#[tool_handler]
impl ServerHandler for DbService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .enable_resources()
                .enable_completions()
                .build(),
            server_info: Implementation {
                name: "mysql-mcp-server".to_owned(),
                title: Some("MySQL MCP Server".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Read-only access to a single MySQL database.\n\
                \n\
                ## Workflow\n\
                1. Call `list_tables` (or list resources) to see what exists\n\
                2. Call `describe_schema` with mode \"table\" and a table_name, or mode \"all\"\n\
                3. Run `query` with SELECT, SHOW, DESCRIBE or EXPLAIN statements\n\
                \n\
                ## Notes\n\
                - Every query runs in a READ ONLY transaction that is rolled back afterwards\n\
                - Writes fail with SQLSTATE 25006\n\
                - The `mysql-schema` prompt accepts a table name or `all-tables`\n\
                - Each table is also a resource at `<base>/<table>/schema`"
                    .to_string(),
            ),
        }
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        Ok(ListPromptsResult::with_all_items(vec![Self::schema_prompt()]))
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        self.prompt_result(&request.name, request.arguments.as_ref())
            .await
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        let resources = self.table_resources().await?;
        Ok(ListResourcesResult::with_all_items(
            resources.into_iter().map(into_resource).collect(),
        ))
    }

    async fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        let content = self.table_resource(&request.uri).await?;
        info!(uri = %content.uri, "Read table resource");
        Ok(ReadResourceResult {
            contents: vec![into_contents(content)],
        })
    }

    async fn complete(
        &self,
        request: CompleteRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CompleteResult, McpError> {
        let values = match &request.r#ref {
            Reference::Prompt(prompt) => {
                self.completion_values(&prompt.name, &request.argument.name, &request.argument.value)
                    .await?
            }
            // Resource URIs are concrete, nothing to complete
            Reference::Resource(_) => Vec::new(),
        };

        Ok(CompleteResult {
            completion: completion_info(values),
        })
    }
}
