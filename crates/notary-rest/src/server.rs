use std::sync::Arc;

use notary_ledger::{InMemoryLedger, LedgerReader};
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;

/// Read-only ledger server.
pub struct NotaryServer {
    config: ServerConfig,
    ledger: Arc<dyn LedgerReader>,
}

impl NotaryServer {
    pub fn new(config: ServerConfig, ledger: Arc<dyn LedgerReader>) -> Self {
        Self { config, ledger }
    }

    /// Build a server over the ledger file named in the configuration, or an
    /// empty ledger if none is configured.
    pub fn from_config(config: ServerConfig) -> ServerResult<Self> {
        let ledger = match &config.ledger_path {
            Some(path) => InMemoryLedger::open(path)?,
            None => InMemoryLedger::new(),
        };
        Ok(Self::new(config, Arc::new(ledger)))
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Arc<dyn LedgerReader> {
        &self.ledger
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(Arc::clone(&self.ledger), &self.config)
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            blocks = self.ledger.block_count()?,
            "notary server listening on {}",
            self.config.bind_addr
        );
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notary_ledger::LedgerWriter;
    use notary_types::Block;

    #[test]
    fn server_construction() {
        let server = NotaryServer::from_config(ServerConfig::default()).unwrap();
        assert_eq!(server.config().bind_addr.port(), 8083);
        assert_eq!(server.ledger().block_count().unwrap(), 0);
    }

    #[test]
    fn loads_configured_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.bin");
        let ledger = InMemoryLedger::new();
        ledger.append_block(Block::new(40, Vec::new())).unwrap();
        ledger.save(&path).unwrap();

        let config = ServerConfig {
            ledger_path: Some(path),
            ..ServerConfig::default()
        };
        let server = NotaryServer::from_config(config).unwrap();
        assert_eq!(server.ledger().base_offset().unwrap().map(|id| id.get()), Some(40));
    }

    #[test]
    fn missing_ledger_file_fails() {
        let config = ServerConfig {
            ledger_path: Some("/nonexistent/ledger.bin".into()),
            ..ServerConfig::default()
        };
        assert!(matches!(
            NotaryServer::from_config(config),
            Err(ServerError::Ledger(_))
        ));
    }

    #[test]
    fn router_builds() {
        let server = NotaryServer::from_config(ServerConfig::default()).unwrap();
        let _router = server.router();
    }
}
