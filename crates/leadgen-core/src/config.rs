use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_PLACES_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

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
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can feed a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    // Blank values count as missing: an empty API key is as useless as none.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let require = |var: &str| -> Result<String, ConfigError> {
        optional(var).ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        optional(var).unwrap_or_else(|| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = require("DATABASE_URL")?;
    let places_api_key = require("GOOGLE_MAPS_API_KEY")?;

    let env = parse_environment(&or_default("LEADGEN_ENV", "development"))?;

    let bind_addr = or_default("LEADGEN_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("LEADGEN_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("LEADGEN_LOG_LEVEL", "info");

    let places_base_url = or_default("LEADGEN_PLACES_BASE_URL", DEFAULT_PLACES_BASE_URL);
    let places_timeout_secs = parse_u64("LEADGEN_PLACES_TIMEOUT_SECS", "30")?;

    let detail_concurrency = or_default("LEADGEN_DETAIL_CONCURRENCY", "4")
        .parse::<usize>()
        .map_err(|e| invalid("LEADGEN_DETAIL_CONCURRENCY", e.to_string()))?;
    if detail_concurrency == 0 {
        return Err(invalid(
            "LEADGEN_DETAIL_CONCURRENCY",
            "must be at least 1".to_string(),
        ));
    }

    let auth_url = optional("SUPABASE_URL");
    let auth_service_key = optional("SUPABASE_SERVICE_ROLE_KEY");

    let api_keys = optional("LEADGEN_API_KEYS")
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned)
                .collect()
        })
        .unwrap_or_default();

    let db_max_connections = parse_u32("LEADGEN_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("LEADGEN_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("LEADGEN_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        places_api_key,
        places_base_url,
        places_timeout_secs,
        detail_concurrency,
        auth_url,
        auth_service_key,
        api_keys,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "LEADGEN_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
