use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Ledger file to serve. Without one the server starts with an empty ledger.
    pub ledger_path: Option<PathBuf>,
    /// Largest accepted request body, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8083)),
            ledger_path: None,
            max_body_bytes: 64 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Read a TOML configuration file. Missing keys take their defaults.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
            .map_err(|e| ServerError::Config(format!("{}: {e}", path.display())))
    }
}
