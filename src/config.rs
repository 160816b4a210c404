//! Configuration loader — merges env vars, .env file, and config.toml.

use common::config::ServiceConfig;
use common::Error;
use std::path::Path;

fn validate_config(config: &ServiceConfig) -> Result<(), Error> {
    let mut issues: Vec<String> = Vec::new();

    if config.upstream.base_url.trim().is_empty() {
        issues.push("upstream.base_url must not be empty".into());
    }
    if config.upstream.timeout_secs == 0 {
        issues.push("upstream.timeout_secs must be > 0".into());
    }
    if config.cache.capacity == 0 {
        issues.push("cache.capacity must be > 0".into());
    }
    if config.cache.ttl_hours == 0 {
        issues.push("cache.ttl_hours must be > 0".into());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(Error::Config(format!(
            "Invalid config:\n - {}",
            issues.join("\n - ")
        )))
    }
}

/// Load service configuration from environment and optional config file.
pub fn load_config() -> Result<ServiceConfig, Error> {
    // 1. Load .env file if present.
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env file loaded: {}", e);
    }

    // 2. Start with defaults.
    let mut config = ServiceConfig::default();

    // 3. Try loading config.toml if it exists.
    let config_path = Path::new("config.toml");
    if config_path.exists() {
        let contents = std::fs::read_to_string(config_path)
            .map_err(|e| Error::Config(format!("Failed to read config.toml: {}", e)))?;
        config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config.toml: {}", e)))?;
    }

    // 4. Override with environment variables (highest priority).
    if let Ok(url) = std::env::var("ORC_BASE_URL") {
        config.upstream.base_url = url;
    }
    if let Ok(raw) = std::env::var("ORC_TIMEOUT_SECS") {
        let parsed = raw
            .trim()
            .parse::<u64>()
            .map_err(|_| Error::Config("ORC_TIMEOUT_SECS must be an integer > 0".into()))?;
        config.upstream.timeout_secs = parsed;
    }
    if let Ok(raw) = std::env::var("POLAR_CACHE_CAPACITY") {
        let parsed = raw
            .trim()
            .parse::<usize>()
            .map_err(|_| Error::Config("POLAR_CACHE_CAPACITY must be an integer > 0".into()))?;
        config.cache.capacity = parsed;
    }
    if let Ok(raw) = std::env::var("POLAR_CACHE_TTL_HOURS") {
        let parsed = raw
            .trim()
            .parse::<u64>()
            .map_err(|_| Error::Config("POLAR_CACHE_TTL_HOURS must be an integer > 0".into()))?;
        config.cache.ttl_hours = parsed;
    }

    validate_config(&config)?;

    Ok(config)
}
