//! Service configuration file
//!
//! JSON, loaded once per command:
//!
//! ```json
//! { "catalog_path": "catalog.json", "index": "schools", "port": 4060 }
//! ```
//!
//! A relative `catalog_path` is resolved against the config file's directory.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::planner::{NestedSortMode, PlannerConfig, PlannerError, MAX_PAGE_SIZE};
use crate::search::DEFAULT_INDEX;

use super::errors::{CliError, CliResult};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Field catalog file (required)
    pub catalog_path: String,

    /// Engine index name (default "documents")
    #[serde(default = "default_index")]
    pub index: String,

    /// Page size when a request sets none (default 20)
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,

    /// Nested sort mode when a request sets none (default "direction")
    #[serde(default = "default_nested_sort_mode")]
    pub nested_sort_mode: String,

    /// Host to bind to (default "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default 4060)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins; empty allows any
    #[serde(default)]
    pub cors_origins: Vec<String>,

    #[serde(skip)]
    base_dir: PathBuf,
}

fn default_index() -> String {
    DEFAULT_INDEX.to_string()
}

fn default_page_size() -> usize {
    20
}

fn default_nested_sort_mode() -> String {
    "direction".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4060
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let mut config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;
        config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        tracing::debug!(path = %path.display(), index = %config.index, "config loaded");

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.catalog_path.trim().is_empty() {
            return Err(CliError::config_error("catalog_path must not be empty"));
        }

        if !(1..=MAX_PAGE_SIZE).contains(&self.default_page_size) {
            return Err(CliError::config_error(format!(
                "default_page_size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.default_page_size
            )));
        }

        self.sort_mode()?;
        self.socket_addr()?;

        Ok(())
    }

    /// Catalog file location
    pub fn catalog_file(&self) -> PathBuf {
        let path = Path::new(&self.catalog_path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Compiler settings
    pub fn planner_config(&self) -> CliResult<PlannerConfig> {
        Ok(PlannerConfig {
            default_page_size: self.default_page_size,
            nested_sort_mode: self.sort_mode()?,
        })
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> CliResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| CliError::config_error(format!("Invalid host/port: {}", e)))
    }

    fn sort_mode(&self) -> CliResult<NestedSortMode> {
        self.nested_sort_mode
            .parse()
            .map_err(|e: PlannerError| CliError::config_error(e.message()))
    }
}
