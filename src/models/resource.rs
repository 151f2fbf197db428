//! Resource URIs for per-table schema documents.
//!
//! Every table is addressable as `mysql://<host>[:port]/<database>/<table>/schema`.
//! The base is derived from the configured connection URL with credentials,
//! query and fragment removed.

use crate::error::{DbError, DbResult};
use crate::models::schema::TableName;
use url::Url;

/// Final path segment of every table resource URI.
pub const SCHEMA_PATH: &str = "schema";

/// MIME type of a table resource body.
pub const RESOURCE_MIME_TYPE: &str = "application/json";

const RESOURCE_SCHEME: &str = "mysql";

/// Base URI that table resources are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceBase {
    base: Url,
    database: String,
}

impl ResourceBase {
    pub fn from_connection_string(connection_string: &str, database: &str) -> DbResult<Self> {
        let mut base = Url::parse(connection_string)
            .map_err(|e| DbError::internal(format!("Invalid connection URL: {e}")))?;

        if base.scheme() != RESOURCE_SCHEME {
            base.set_scheme(RESOURCE_SCHEME)
                .map_err(|_| DbError::internal("Cannot derive resource scheme"))?;
        }
        base.set_username("")
            .map_err(|_| DbError::internal("Connection URL has no host"))?;
        base.set_password(None)
            .map_err(|_| DbError::internal("Connection URL has no host"))?;
        base.set_query(None);
        base.set_fragment(None);

        base.path_segments_mut()
            .map_err(|_| DbError::internal("Connection URL cannot carry a path"))?
            .clear()
            .push(database)
            .push("");

        Ok(Self {
            base,
            database: database.to_string(),
        })
    }

    pub fn as_str(&self) -> &str {
        self.base.as_str()
    }

    /// URI of a table's schema resource. The table segment is percent-encoded.
    pub fn table_uri(&self, table: &TableName) -> String {
        let mut uri = self.base.clone();
        if let Ok(mut segments) = uri.path_segments_mut() {
            segments.pop_if_empty().push(table.as_str()).push(SCHEMA_PATH);
        }
        uri.into()
    }

    /// Resolve a resource URI back to its table name.
    ///
    /// URIs outside this server's base are unknown resources; URIs inside it
    /// that don't end in `<table>/schema` are invalid arguments.
    pub fn parse_table_uri(&self, uri: &str) -> DbResult<TableName> {
        let unknown = || DbError::unknown_operation("resource", uri);

        let parsed = Url::parse(uri).map_err(|_| unknown())?;
        if parsed.scheme() != self.base.scheme()
            || parsed.host_str() != self.base.host_str()
            || parsed.port() != self.base.port()
        {
            return Err(unknown());
        }

        let segments: Vec<&str> = parsed.path_segments().map(|s| s.collect()).unwrap_or_default();
        let database = segments.first().map(|s| decode_segment(s)).transpose()?;
        if database.as_deref() != Some(self.database.as_str()) {
            return Err(unknown());
        }

        match segments.as_slice() {
            [_, table, last] if *last == SCHEMA_PATH => TableName::parse(decode_segment(table)?),
            _ => Err(DbError::invalid_argument(format!(
                "Resource URI must look like {}<table>/{SCHEMA_PATH}",
                self.base
            ))),
        }
    }
}

fn decode_segment(segment: &str) -> DbResult<String> {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .map_err(|e| DbError::invalid_argument(format!("Malformed resource URI segment: {e}")))
}
