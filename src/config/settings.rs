use crate::error::{NodeError, Result};
use std::env;
use std::path::{Path, PathBuf};

pub const DEFAULT_HOST: &str = "0.0.0.0";

const NODE_HOST_KEY: &str = "NODE_HOST";
const LEDGER_DIR_KEY: &str = "LEDGER_DIR";

/// Settings for one node instance
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    host: String,
    port: u16,
    ledger_dir: PathBuf,
}

impl Config {
    /// Build the settings for a node listening on `port`.
    ///
    /// `NODE_HOST` and `LEDGER_DIR` override the bind host and the directory
    /// holding the ledger file.
    pub fn new(port: u16) -> Config {
        let mut host = String::from(DEFAULT_HOST);
        if let Ok(value) = env::var(NODE_HOST_KEY) {
            host = value;
        }

        let mut ledger_dir = PathBuf::from(".");
        if let Ok(dir) = env::var(LEDGER_DIR_KEY) {
            ledger_dir = PathBuf::from(dir);
        }

        Config {
            host,
            port,
            ledger_dir,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Config {
        self.host = host.into();
        self
    }

    pub fn with_ledger_dir(mut self, dir: impl AsRef<Path>) -> Config {
        self.ledger_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn get_host(&self) -> &str {
        self.host.as_str()
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub fn get_ledger_dir(&self) -> &Path {
        self.ledger_dir.as_path()
    }

    /// e.g. "0.0.0.0:5000"
    pub fn get_node_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Named after the configured port, not the bound one: a node started
    /// on port 0 writes `transactions_0.json` whatever port the OS picks.
    pub fn ledger_path(&self) -> PathBuf {
        self.ledger_dir.join(ledger_file_name(self.port))
    }

    /// Reject settings a node cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(NodeError::Config("Bind host is empty".to_string()));
        }
        if self.ledger_dir.exists() && !self.ledger_dir.is_dir() {
            return Err(NodeError::Config(format!(
                "Ledger directory {} is not a directory",
                self.ledger_dir.display()
            )));
        }
        Ok(())
    }
}

/// Name of the ledger file for a node listening on `port`
pub fn ledger_file_name(port: u16) -> String {
    format!("transactions_{port}.json")
}
