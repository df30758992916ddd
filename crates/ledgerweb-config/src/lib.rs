//! Configuration management for ledgerweb
//!
//! This module handles loading, validation, and management of
//! ledgerweb configuration from YAML files.

pub mod error;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub use error::{ConfigError, ConfigResult};

/// Payer code meaning "no payer"
pub const NO_PAYER: i32 = 0;

// ==================== Configuration Types ====================

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,
    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

/// Storage backend selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Entries live in process memory and vanish on restart
    Memory,
    /// Entries live in an SQLite database file
    Sqlite,
}

impl Default for StoreBackend {
    fn default() -> Self {
        StoreBackend::Sqlite
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "sqlite" => Ok(StoreBackend::Sqlite),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Memory => write!(f, "memory"),
            StoreBackend::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Database file (sqlite backend only)
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: default_store_path(),
        }
    }
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./data/ledger.db")
}

/// Ledger-wide constants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Root key name; one ledger per deployment
    #[serde(default = "default_ledger_name")]
    pub name: String,
    /// First year offered by the yearly summary
    #[serde(default = "default_start_year")]
    pub start_year: i32,
    /// Number of rows on the input forms
    #[serde(default = "default_input_lines")]
    pub input_lines: usize,
    /// Offset of the fixed time zone from UTC, in hours
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            name: default_ledger_name(),
            start_year: default_start_year(),
            input_lines: default_input_lines(),
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

fn default_ledger_name() -> String {
    "household".to_string()
}

fn default_start_year() -> i32 {
    2017
}

fn default_input_lines() -> usize {
    15
}

fn default_utc_offset_hours() -> i32 {
    9
}

/// One payer registry row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayerConfig {
    pub code: i32,
    #[serde(default)]
    pub name: String,
    /// Break this payer's income out in the yearly summary
    #[serde(default)]
    pub summary: bool,
}

impl PayerConfig {
    fn new(code: i32, name: &str, summary: bool) -> Self {
        Self {
            code,
            name: name.to_string(),
            summary,
        }
    }
}

fn default_payers() -> Vec<PayerConfig> {
    vec![
        PayerConfig::new(NO_PAYER, "", false),
        PayerConfig::new(1, "江添", true),
        PayerConfig::new(2, "大舘", true),
        PayerConfig::new(3, "北原", true),
        PayerConfig::new(4, "久保田", true),
        PayerConfig::new(5, "清水", true),
        PayerConfig::new(6, "菅谷", true),
        PayerConfig::new(7, "中村", true),
        PayerConfig::new(8, "畑", true),
        PayerConfig::new(9, "羽田野", true),
        PayerConfig::new(10, "山添", true),
        PayerConfig::new(99, "その他", false),
    ]
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default = "default_payers")]
    pub payers: Vec<PayerConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            store: StoreConfig::default(),
            ledger: LedgerConfig::default(),
            payers: default_payers(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_yaml(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::InvalidYaml { message: e.to_string() })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> ConfigResult<()> {
        if self.server.port == 0 {
            return Err(invalid("server.port", "Port must be greater than 0"));
        }
        if self.ledger.name.trim().is_empty() {
            return Err(invalid("ledger.name", "Ledger name must not be empty"));
        }
        if self.ledger.name.contains(['/', ':']) {
            return Err(invalid("ledger.name", "Ledger name must not contain '/' or ':'"));
        }
        if !(1..=100).contains(&self.ledger.input_lines) {
            return Err(invalid("ledger.input_lines", "Input lines must be between 1 and 100"));
        }
        if !(-12..=14).contains(&self.ledger.utc_offset_hours) {
            return Err(invalid("ledger.utc_offset_hours", "UTC offset must be between -12 and 14"));
        }
        if !(1900..=9999).contains(&self.ledger.start_year) {
            return Err(invalid("ledger.start_year", "Start year must be between 1900 and 9999"));
        }

        let mut seen = HashSet::new();
        for payer in &self.payers {
            if !seen.insert(payer.code) {
                return Err(ConfigError::DuplicatePayer { code: payer.code });
            }
        }
        match self.payers.iter().find(|p| p.code == NO_PAYER) {
            None => return Err(invalid("payers", "Payer code 0 (no payer) must be defined")),
            Some(p) if p.summary => {
                return Err(invalid("payers", "Payer code 0 cannot be summary-eligible"))
            }
            Some(_) => {}
        }

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default() -> &'static str {
        include_str!("../templates/default_config.yaml")
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
