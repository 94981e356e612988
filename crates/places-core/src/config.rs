use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

/// Load client configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load client configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let api_key = require("PLACES_API_KEY")?;
    let language = or_default("PLACES_LANGUAGE", "en");
    let base_url = or_default("PLACES_BASE_URL", DEFAULT_BASE_URL);
    let user_agent = or_default("PLACES_USER_AGENT", "places-client/0.1");
    let request_timeout_secs = parse_u64("PLACES_REQUEST_TIMEOUT_SECS", "30")?;
    let icon_cache_capacity = parse_usize("PLACES_ICON_CACHE_CAPACITY", "8")?;
    let log_level = or_default("PLACES_LOG_LEVEL", "info");

    if icon_cache_capacity == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PLACES_ICON_CACHE_CAPACITY".to_string(),
            reason: "capacity must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        api_key,
        language,
        base_url,
        user_agent,
        request_timeout_secs,
        icon_cache_capacity,
        log_level,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
