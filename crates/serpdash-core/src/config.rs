use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
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

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files — useful for testing
/// or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup — no `set_var`/`remove_var` needed.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let target_domain = require("SERPDASH_TARGET_DOMAIN")?;

    let env = parse_environment(&or_default("SERPDASH_ENV", "development"));

    let bind_addr = parse_addr("SERPDASH_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("SERPDASH_LOG_LEVEL", "info");
    let sheet_csv_url = lookup("SERPDASH_SHEET_CSV_URL").ok();
    let sheets_api_key = lookup("SERPDASH_SHEETS_API_KEY").ok();

    let cache_ttl_secs = parse_u64("SERPDASH_CACHE_TTL_SECS", "300")?;
    let fetch_timeout_secs = parse_u64("SERPDASH_FETCH_TIMEOUT_SECS", "30")?;
    let fetch_max_retries = parse_u32("SERPDASH_FETCH_MAX_RETRIES", "3")?;
    let fetch_retry_backoff_base_ms =
        parse_u64("SERPDASH_FETCH_RETRY_BACKOFF_BASE_MS", "1000")?;

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        target_domain,
        sheet_csv_url,
        sheets_api_key,
        cache_ttl_secs,
        fetch_timeout_secs,
        fetch_max_retries,
        fetch_retry_backoff_base_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
mod tests {
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

    /// Returns a map with all required env vars populated with valid defaults.
    fn full_env<'a>() -> HashMap<&'a str, &'a str> {
        let mut m = HashMap::new();
        m.insert("SERPDASH_TARGET_DOMAIN", "recharge.com");
        m
    }

    #[test]
    fn parse_environment_development() {
        assert_eq!(parse_environment("development"), Environment::Development);
    }

    #[test]
    fn parse_environment_test() {
        assert_eq!(parse_environment("test"), Environment::Test);
    }

    #[test]
    fn parse_environment_production() {
        assert_eq!(parse_environment("production"), Environment::Production);
    }

    #[test]
    fn parse_environment_unknown_defaults_to_development() {
        assert_eq!(parse_environment("unknown"), Environment::Development);
    }

    #[test]
    fn build_app_config_fails_without_target_domain() {
        let map: HashMap<&str, &str> = HashMap::new();
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "SERPDASH_TARGET_DOMAIN"),
            "expected MissingEnvVar(SERPDASH_TARGET_DOMAIN), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_fails_with_invalid_bind_addr() {
        let mut map = full_env();
        map.insert("SERPDASH_BIND_ADDR", "not-a-socket-addr");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SERPDASH_BIND_ADDR"),
            "expected InvalidEnvVar(SERPDASH_BIND_ADDR), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_succeeds_with_all_required_vars() {
        let map = full_env();
        let result = build_app_config(lookup_from_map(&map));
        assert!(result.is_ok(), "expected Ok, got: {result:?}");
        let cfg = result.unwrap();
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.target_domain, "recharge.com");
        assert!(cfg.sheet_csv_url.is_none());
        assert!(cfg.sheets_api_key.is_none());
        assert_eq!(cfg.cache_ttl_secs, 300);
        assert_eq!(cfg.fetch_timeout_secs, 30);
        assert_eq!(cfg.fetch_max_retries, 3);
        assert_eq!(cfg.fetch_retry_backoff_base_ms, 1000);
    }

    #[test]
    fn cache_ttl_secs_override() {
        let mut map = full_env();
        map.insert("SERPDASH_CACHE_TTL_SECS", "60");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.cache_ttl_secs, 60);
    }

    #[test]
    fn cache_ttl_secs_invalid() {
        let mut map = full_env();
        map.insert("SERPDASH_CACHE_TTL_SECS", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SERPDASH_CACHE_TTL_SECS"),
            "expected InvalidEnvVar(SERPDASH_CACHE_TTL_SECS), got: {result:?}"
        );
    }

    #[test]
    fn fetch_timeout_secs_override() {
        let mut map = full_env();
        map.insert("SERPDASH_FETCH_TIMEOUT_SECS", "60");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.fetch_timeout_secs, 60);
    }

    #[test]
    fn fetch_timeout_secs_invalid() {
        let mut map = full_env();
        map.insert("SERPDASH_FETCH_TIMEOUT_SECS", "soon");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SERPDASH_FETCH_TIMEOUT_SECS"),
            "expected InvalidEnvVar(SERPDASH_FETCH_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn fetch_max_retries_override() {
        let mut map = full_env();
        map.insert("SERPDASH_FETCH_MAX_RETRIES", "5");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.fetch_max_retries, 5);
    }

    #[test]
    fn fetch_retry_backoff_base_ms_override() {
        let mut map = full_env();
        map.insert("SERPDASH_FETCH_RETRY_BACKOFF_BASE_MS", "250");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.fetch_retry_backoff_base_ms, 250);
    }

    #[test]
    fn sheet_csv_url_optional_passthrough() {
        let mut map = full_env();
        map.insert(
            "SERPDASH_SHEET_CSV_URL",
            "https://docs.google.com/spreadsheets/d/abc/export?format=csv",
        );
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(
            cfg.sheet_csv_url.as_deref(),
            Some("https://docs.google.com/spreadsheets/d/abc/export?format=csv")
        );
    }
}
