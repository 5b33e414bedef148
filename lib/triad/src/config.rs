//! The configuration of a Triad instance.
//!
//! Configurations are read from JSON. Missing sections and fields take their default values.
//!
//! ```json
//! {
//!   "transactions": { "default_timeout_secs": 30 },
//!   "logging": { "profile": "production" }
//! }
//! ```

use crate::logging::Profile;
use serde::{Deserialize, Serialize};
use triad_resolver::xa::XaResourceConfig;

/// An error raised while reading a [TriadConfig].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The input is not a valid configuration document.
    #[error("Invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TriadConfig {
    pub transactions: TransactionsConfig,
    pub logging: LoggingConfig,
}

impl TriadConfig {
    /// Parses a configuration from JSON.
    ///
    /// # Errors
    ///
    /// Returns [ConfigError::Parse] if the document is malformed or contains unknown fields.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransactionsConfig {
    /// The initial transaction timeout of new transaction resources.
    pub default_timeout_secs: u32,
}

impl TransactionsConfig {
    /// The configuration of the transaction resources created with this configuration.
    pub fn resource_config(&self) -> XaResourceConfig {
        XaResourceConfig {
            transaction_timeout_secs: self.default_timeout_secs,
        }
    }
}

impl Default for TransactionsConfig {
    fn default() -> Self {
        Self {
            default_timeout_secs: XaResourceConfig::DEFAULT_TRANSACTION_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub profile: Profile,
}
