use serde::{Deserialize, Serialize};

/// The configuration of an [XaResource](crate::xa::XaResource).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XaResourceConfig {
    /// The initial transaction timeout in seconds. Only hooks enforce it.
    pub transaction_timeout_secs: u32,
}

impl XaResourceConfig {
    pub const DEFAULT_TRANSACTION_TIMEOUT_SECS: u32 = 10;
}

impl Default for XaResourceConfig {
    fn default() -> Self {
        Self {
            transaction_timeout_secs: Self::DEFAULT_TRANSACTION_TIMEOUT_SECS,
        }
    }
}
