use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

/// Returns a map with all required env vars populated.
fn full_env<'a>() -> HashMap<&'a str, &'a str> {
    let mut m = HashMap::new();
    m.insert("PLACES_API_KEY", "test-key");
    m
}

#[test]
fn build_app_config_fails_without_api_key() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "PLACES_API_KEY"),
        "expected MissingEnvVar(PLACES_API_KEY), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_blank_api_key() {
    let mut map = HashMap::new();
    map.insert("PLACES_API_KEY", "   ");
    let result = build_app_config(lookup_from_map(&map));
    assert!(matches!(result, Err(ConfigError::MissingEnvVar(_))));
}

#[test]
fn build_app_config_succeeds_with_defaults() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.api_key, "test-key");
    assert_eq!(cfg.language, "en");
    assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    assert_eq!(cfg.user_agent, "places-client/0.1");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.icon_cache_capacity, 8);
    assert_eq!(cfg.log_level, "info");
}

#[test]
fn language_override() {
    let mut map = full_env();
    map.insert("PLACES_LANGUAGE", "ja");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.language, "ja");
}

#[test]
fn request_timeout_invalid() {
    let mut map = full_env();
    map.insert("PLACES_REQUEST_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PLACES_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(PLACES_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn icon_cache_capacity_override() {
    let mut map = full_env();
    map.insert("PLACES_ICON_CACHE_CAPACITY", "32");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.icon_cache_capacity, 32);
}

#[test]
fn icon_cache_capacity_zero_is_rejected() {
    let mut map = full_env();
    map.insert("PLACES_ICON_CACHE_CAPACITY", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "PLACES_ICON_CACHE_CAPACITY"),
        "expected InvalidEnvVar(PLACES_ICON_CACHE_CAPACITY), got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_api_key() {
    let map = full_env();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("test-key"), "api key leaked: {rendered}");
    assert!(rendered.contains("[redacted]"));
}
