//! Configuration for the settlement engine

use ledger_core::Currency;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Settlement engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Service version
    pub service_version: String,

    /// Ledger configuration
    pub ledger: ledger_core::Config,

    /// Netting configuration
    pub netting: NettingConfig,

    /// Display configuration
    pub display: DisplayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "splitledger-settlement".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
            ledger: ledger_core::Config::default(),
            netting: NettingConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

/// Netting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NettingConfig {
    /// Remainders below this count as settled
    pub epsilon: Decimal,

    /// Largest acceptable `Σ net_balance` for a validated ledger
    pub conservation_tolerance: Decimal,
}

impl Default for NettingConfig {
    fn default() -> Self {
        Self {
            epsilon: crate::netting::DEFAULT_EPSILON,
            conservation_tolerance: Decimal::new(1, 6),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(crate::Error::Config(format!("Unknown log format: {}", other))),
        }
    }
}

/// Display configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Currency used when rendering amounts
    pub currency: Currency,

    /// Log output format
    pub log_format: LogFormat,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency: Currency::INR,
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();
        config.ledger.apply_env()?;

        if let Ok(currency) = std::env::var("SPLITLEDGER_CURRENCY") {
            config.display.currency = currency.parse()?;
        }

        if let Ok(epsilon) = std::env::var("SPLITLEDGER_EPSILON") {
            config.netting.epsilon = epsilon
                .trim()
                .parse()
                .map_err(|e| crate::Error::Config(format!("Invalid SPLITLEDGER_EPSILON: {}", e)))?;
        }

        if let Ok(format) = std::env::var("SPLITLEDGER_LOG_FORMAT") {
            config.display.log_format = format.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> crate::Result<()> {
        if self.netting.epsilon <= Decimal::ZERO {
            return Err(crate::Error::Config(format!(
                "netting.epsilon must be positive, got {}",
                self.netting.epsilon
            )));
        }

        if self.netting.conservation_tolerance < Decimal::ZERO {
            return Err(crate::Error::Config(format!(
                "netting.conservation_tolerance must not be negative, got {}",
                self.netting.conservation_tolerance
            )));
        }

        Ok(())
    }
}
