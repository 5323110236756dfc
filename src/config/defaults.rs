//! Default values and configuration structs with default implementations.

use serde::{Deserialize, Serialize};

/// Macro to generate default functions for serde attributes
macro_rules! default_fn {
    ($name:ident, $type:ty, $value:expr) => {
        pub(crate) fn $name() -> $type {
            $value
        }
    };
}

/// Relations endpoint of the FACe directory API.
pub const DEFAULT_ENDPOINT: &str = "https://face.gob.es/api/v2/relaciones";

/// Desktop browser user agent; the service filters obvious bot agents.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

// =========================================================================
// DEFAULT VALUE FUNCTIONS
// =========================================================================

default_fn!(default_endpoint, String, DEFAULT_ENDPOINT.to_string());
default_fn!(default_user_agent, String, DEFAULT_USER_AGENT.to_string());
default_fn!(default_interval_ms, u64, 1000); // 1 second before every attempt
default_fn!(default_empty_response_delay_ms, u64, 2000); // 2 seconds after an empty answer

// =========================================================================
// CONFIG STRUCTS WITH DEFAULTS
// =========================================================================

/// Remote API settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Relations endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            user_agent: default_user_agent(),
        }
    }
}

/// Polling behaviour while the endpoint answers with empty bodies
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PollingConfig {
    /// Wait before every attempt in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Extra wait after an empty answer in milliseconds
    #[serde(default = "default_empty_response_delay_ms")]
    pub empty_response_delay_ms: u64,
    /// Maximum attempts; unset polls until an answer arrives
    #[serde(default)]
    pub max_attempts: Option<usize>,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            empty_response_delay_ms: default_empty_response_delay_ms(),
            max_attempts: None,
        }
    }
}
