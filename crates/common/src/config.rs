//! Service configuration types.

use serde::{Deserialize, Serialize};

/// Top-level service configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Upstream ORC RMS endpoint settings.
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Polar model cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Upstream ORC scoring-database client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the RMS download endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Polar model cache limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Max number of boats kept in memory.
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,

    /// Entry time-to-live in hours.
    #[serde(default = "default_cache_ttl_hours")]
    pub ttl_hours: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
            ttl_hours: default_cache_ttl_hours(),
        }
    }
}

fn default_base_url() -> String {
    "https://data.orc.org/public/WPub.dll".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_cache_capacity() -> usize {
    100
}

fn default_cache_ttl_hours() -> u64 {
    24
}
