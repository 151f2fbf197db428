//! Stdio transport: newline-delimited JSON-RPC on stdin/stdout.
//!
//! Logs go to stderr, so stdout carries protocol messages only.

use crate::db::ConnectionManager;
use crate::error::{DbError, DbResult};
use crate::mcp::DbService;
use crate::transport::{Transport, wait_for_signal};
use rmcp::{ServiceExt, transport::stdio};
use std::sync::Arc;
use tracing::{info, warn};

pub struct StdioTransport {
    service: DbService,
    connection_manager: Arc<ConnectionManager>,
}

/// Why the session stopped.
enum Stop {
    ClientClosed,
    Signal,
}

impl StdioTransport {
    pub fn new(service: DbService, connection_manager: Arc<ConnectionManager>) -> Self {
        Self {
            service,
            connection_manager,
        }
    }
}

impl Transport for StdioTransport {
    async fn run(&self) -> DbResult<()> {
        info!("Serving MCP over stdio");

        let session = self
            .service
            .clone()
            .serve(stdio())
            .await
            .map_err(|e| DbError::internal(format!("Failed to start stdio transport: {e}")))?;

        let stop = tokio::select! {
            result = session.waiting() => match result {
                Ok(reason) => {
                    info!(reason = ?reason, "Client closed the stdio session");
                    Stop::ClientClosed
                }
                Err(e) => {
                    self.connection_manager.close().await;
                    return Err(DbError::internal(format!("Stdio transport error: {e}")));
                }
            },
            _ = wait_for_signal() => Stop::Signal,
        };

        match stop {
            Stop::ClientClosed => {
                self.connection_manager.close().await;
                Ok(())
            }
            Stop::Signal => {
                info!("Shutdown signal received, closing pool (send again to force exit)");
                tokio::spawn(async {
                    wait_for_signal().await;
                    warn!("Second signal received, exiting immediately");
                    std::process::exit(1);
                });
                self.connection_manager.close().await;
                // a pending stdin read would otherwise keep the runtime alive
                std::process::exit(0);
            }
        }
    }

    fn name(&self) -> &'static str {
        "stdio"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use crate::models::ResourceBase;

    #[tokio::test]
    async fn test_stdio_transport_creation() {
        let config = DatabaseConfig::parse("mysql://user@127.0.0.1:1/shop").unwrap();
        let manager = Arc::new(ConnectionManager::connect_lazy(&config).unwrap());
        let resources =
            ResourceBase::from_connection_string(&config.connection_string, "shop").unwrap();
        let transport = StdioTransport::new(DbService::new(manager.clone(), resources), manager);
        assert_eq!(transport.name(), "stdio");
    }
}
