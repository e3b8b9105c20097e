//! Configuration for the group ledger

use crate::types::Currency;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Ledger configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// JSON snapshot loaded into the in-memory store (none = start empty)
    pub snapshot_path: Option<PathBuf>,

    /// Currency amounts are recorded in
    pub currency: Currency,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "splitledger-core".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            snapshot_path: None,
            currency: Currency::INR,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from environment variables
    pub fn apply_env(&mut self) -> crate::Result<()> {
        if let Ok(path) = std::env::var("SPLITLEDGER_SNAPSHOT") {
            self.snapshot_path = Some(PathBuf::from(path));
        }

        if let Ok(currency) = std::env::var("SPLITLEDGER_CURRENCY") {
            self.currency = currency.parse()?;
        }

        Ok(())
    }
}
