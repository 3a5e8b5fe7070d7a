//! Configuration file
//!
//! A JSON object; every field is optional:
//!
//! ```json
//! {"host": "127.0.0.1", "port": 8000, "cors_origins": [],
//!  "max_upload_bytes": 26214400, "sqlite_row_limit": 5000,
//!  "csv_infer_records": 0}
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::http_server::HttpServerConfig;
use crate::table::LoadOptions;

use super::errors::{CliError, CliResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub max_upload_bytes: usize,
    pub sqlite_row_limit: usize,
    /// Rows sampled for CSV type inference; 0 scans every row
    pub csv_infer_records: usize,
}

impl Default for Config {
    fn default() -> Self {
        let server = HttpServerConfig::default();
        Self {
            host: server.host,
            port: server.port,
            cors_origins: server.cors_origins,
            max_upload_bytes: server.max_upload_bytes,
            sqlite_row_limit: server.load.sqlite_row_limit,
            csv_infer_records: server.load.csv_infer_records,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.host.trim().is_empty() {
            return Err(CliError::config_error("host must not be empty"));
        }
        if self.port == 0 {
            return Err(CliError::config_error("port must be > 0"));
        }
        if self.max_upload_bytes == 0 {
            return Err(CliError::config_error("max_upload_bytes must be > 0"));
        }
        if self.sqlite_row_limit == 0 {
            return Err(CliError::config_error("sqlite_row_limit must be > 0"));
        }
        Ok(())
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            sqlite_row_limit: self.sqlite_row_limit,
            csv_infer_records: self.csv_infer_records,
        }
    }

    pub fn server_config(&self) -> HttpServerConfig {
        HttpServerConfig {
            host: self.host.clone(),
            port: self.port,
            cors_origins: self.cors_origins.clone(),
            max_upload_bytes: self.max_upload_bytes,
            load: self.load_options(),
        }
    }
}
