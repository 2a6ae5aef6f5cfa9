use crate::error::ConfigError;
use core_types::MonthLabel;
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in the file; missing values fall back to the defaults
/// below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dataset: DatasetSettings,
    pub aggregation: AggregationSettings,
    pub server: ServerSettings,
    pub logging: LoggingSettings,
}

/// Where the sales ledger lives and how its dates are written.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    /// Path to the CSV export.
    pub path: PathBuf,
    /// `chrono` format strings tried in order for the order date column.
    pub date_formats: Vec<String>,
}

/// Parameters for the sales aggregator.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AggregationSettings {
    /// Date used to label a monthly bucket: "end" (default) or "start".
    pub month_label: MonthLabel,
    /// Zero-fill months without sales in the dashboard's monthly series.
    pub fill_month_gaps: bool,
}

/// HTTP listener settings for the JSON API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

/// Logging output.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    pub filter: String,
    /// When set, logs go to a daily rolling file in this directory instead of stderr.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

// --- Default Implementations ---

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/superstore_sample.csv"),
            date_formats: vec![
                "%Y-%m-%d".to_string(),
                "%m/%d/%Y".to_string(),
                "%d-%m-%Y".to_string(),
            ],
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            directory: None,
            file_prefix: "salesboard.log".to_string(),
        }
    }
}

impl ServerSettings {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.parse().map_err(|_| {
            let message = format!("server.host '{}' is not an IP address", self.host);
            ConfigError::ValidationError(message)
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Config {
    /// Rejects settings the application cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dataset.path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError("dataset.path must not be empty".to_string()));
        }
        if self.dataset.date_formats.iter().all(|f| f.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "dataset.date_formats must name at least one format".to_string(),
            ));
        }
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError("server.port must not be 0".to_string()));
        }
        self.server.socket_addr()?;
        Ok(())
    }
}
