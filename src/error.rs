//! Error types for the MySQL MCP Server.
//!
//! This module defines all error types using `thiserror` for ergonomic error handling.
//! Database failures keep the driver's message and SQLSTATE intact so clients see
//! exactly what the server rejected.

use thiserror::Error;

/// Raw failure reported by the database driver.
///
/// Produced at the connection boundary and classified by the caller
/// (catalog lookup vs. client query) into a [`DbError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverError {
    pub message: String,
    /// e.g., "25006" for a write inside a read-only transaction
    pub sql_state: Option<String>,
}

impl DriverError {
    pub fn new(message: impl Into<String>, sql_state: Option<String>) -> Self {
        Self {
            message: message.into(),
            sql_state,
        }
    }
}

impl std::fmt::Display for DriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.sql_state {
            Some(code) => write!(f, "{} (SQLSTATE: {})", self.message, code),
            None => write!(f, "{}", self.message),
        }
    }
}

impl From<sqlx::Error> for DriverError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => Self {
                message: db_err.message().to_string(),
                sql_state: db_err.code().map(|c| c.to_string()),
            },
            other => Self {
                message: other.to_string(),
                sql_state: None,
            },
        }
    }
}

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Connection acquisition failed: {message}")]
    ConnectionAcquisition { message: String, suggestion: String },

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Catalog query failed: {message}")]
    CatalogQuery {
        message: String,
        sql_state: Option<String>,
    },

    #[error("Query execution failed: {message}")]
    QueryExecution {
        message: String,
        sql_state: Option<String>,
    },

    #[error("Unknown {kind}: {name}")]
    UnknownOperation { kind: String, name: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DbError {
    /// Create a connection acquisition error with a helpful suggestion.
    pub fn connection_acquisition(
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self::ConnectionAcquisition {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Classify a driver failure raised while reading the metadata catalog.
    pub fn catalog_query(err: DriverError) -> Self {
        Self::CatalogQuery {
            message: err.message,
            sql_state: err.sql_state,
        }
    }

    /// Classify a driver failure raised while running client SQL.
    pub fn query_execution(err: DriverError) -> Self {
        Self::QueryExecution {
            message: err.message,
            sql_state: err.sql_state,
        }
    }

    pub fn unknown_operation(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnknownOperation {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// SQLSTATE reported by the database, if this error came from one.
    pub fn sql_state(&self) -> Option<&str> {
        match self {
            Self::CatalogQuery { sql_state, .. } | Self::QueryExecution { sql_state, .. } => {
                sql_state.as_deref()
            }
            _ => None,
        }
    }

    /// Get the suggestion for this error, if available.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::ConnectionAcquisition { suggestion, .. } => Some(suggestion),
            Self::QueryExecution {
                sql_state: Some(code),
                ..
            } if code == READ_ONLY_VIOLATION_STATE => Some(
                "This server only runs read-only statements. Rewrite the query as a SELECT, SHOW, DESCRIBE or EXPLAIN",
            ),
            Self::QueryExecution { .. } => Some("Check the SQL syntax and referenced objects"),
            Self::UnknownOperation { .. } => {
                Some("List the server's tools, prompts and resources to find valid names")
            }
            _ => None,
        }
    }
}

/// SQLSTATE MySQL raises for writes inside a `READ ONLY` transaction.
pub const READ_ONLY_VIOLATION_STATE: &str = "25006";

/// Result type alias for database operations.
pub type DbResult<T> = Result<T, DbError>;

/// Build suggestion data as JSON value.
fn suggestion_data(suggestion: Option<&str>) -> Option<serde_json::Value> {
    suggestion.map(|s| serde_json::json!({ "suggestion": s }))
}

/// Convert DbError to MCP ErrorData for semantic error categorization.
/// Includes the suggestion field in the `data` object when available.
impl From<DbError> for rmcp::ErrorData {
    fn from(err: DbError) -> Self {
        let data = suggestion_data(err.suggestion());
        match &err {
            DbError::InvalidArgument { .. } => rmcp::ErrorData::invalid_params(err.to_string(), data),

            // Database rejections are the client's to fix, keep SQLSTATE visible
            DbError::QueryExecution { sql_state, .. } => {
                let msg = match sql_state {
                    Some(code) => format!("{} (SQLSTATE: {})", err, code),
                    None => err.to_string(),
                };
                rmcp::ErrorData::invalid_params(msg, data)
            }

            DbError::UnknownOperation { .. } => {
                rmcp::ErrorData::resource_not_found(err.to_string(), data)
            }

            DbError::CatalogQuery { sql_state, .. } => {
                let msg = match sql_state {
                    Some(code) => format!("{} (SQLSTATE: {})", err, code),
                    None => err.to_string(),
                };
                rmcp::ErrorData::internal_error(msg, data)
            }

            DbError::ConnectionAcquisition { .. } | DbError::Internal { .. } => {
                rmcp::ErrorData::internal_error(err.to_string(), data)
            }
        }
    }
}
