use serde::{Deserialize, Serialize};
use std::sync::Once;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Selects how log events are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Human-readable output, `debug` level.
    #[default]
    Development,
    /// JSON output, `info` level.
    Production,
    /// No output. Tests capture events with [super::test_capture].
    Test,
}

impl Profile {
    /// The filter that is used if `RUST_LOG` is not set.
    pub fn default_filter(self) -> &'static str {
        match self {
            Profile::Development => "triad=debug",
            Profile::Production | Profile::Test => "triad=info",
        }
    }
}

static INIT_ONCE: Once = Once::new();

/// Installs the global subscriber for `profile`.
///
/// Only the first call has an effect. If another global subscriber has already been installed,
/// the call is ignored.
pub fn init(profile: Profile) {
    INIT_ONCE.call_once(|| {
        let filter = || {
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(profile.default_filter()))
        };
        let result = match profile {
            Profile::Development => tracing_subscriber::fmt()
                .with_env_filter(filter())
                .finish()
                .try_init(),
            Profile::Production => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter())
                .finish()
                .try_init(),
            Profile::Test => tracing_subscriber::registry().try_init(),
        };
        if let Err(error) = result {
            tracing::warn!(%error, "A global subscriber has already been installed");
        }
    });
}
