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
/// Parsing and validation are decoupled from the process environment so they
/// can be tested with a plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
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

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let saleor_api_url = require("SALEOR_API_URL")?;
    let saleor_app_token = require("SALEOR_APP_TOKEN")?;
    let saleor_app_id = require("SALEOR_APP_ID")?;

    let env = parse_environment(&or_default("ALGOSYNC_ENV", "development"))?;

    let bind_addr = parse_addr("ALGOSYNC_BIND_ADDR", "0.0.0.0:3000")?;
    let public_url = or_default("ALGOSYNC_PUBLIC_URL", "http://localhost:3000")
        .trim_end_matches('/')
        .to_string();
    let log_level = or_default("ALGOSYNC_LOG_LEVEL", "info");

    let request_timeout_secs = parse_u64("ALGOSYNC_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("ALGOSYNC_USER_AGENT", "algosync/0.1 (search-sync)");

    let import_batch_size = parse_usize("ALGOSYNC_IMPORT_BATCH_SIZE", "100")?;
    if import_batch_size == 0 {
        return Err(invalid(
            "ALGOSYNC_IMPORT_BATCH_SIZE",
            "must be at least 1".to_string(),
        ));
    }

    // Saleor caps connection page size at 100.
    let products_page_size = parse_u32("ALGOSYNC_PRODUCTS_PAGE_SIZE", "100")?;
    if !(1..=100).contains(&products_page_size) {
        return Err(invalid(
            "ALGOSYNC_PRODUCTS_PAGE_SIZE",
            format!("must be between 1 and 100, got {products_page_size}"),
        ));
    }

    let algolia_host_override = lookup("ALGOLIA_HOST_OVERRIDE")
        .ok()
        .filter(|v| !v.trim().is_empty());

    Ok(AppConfig {
        env,
        bind_addr,
        public_url,
        log_level,
        saleor_api_url,
        saleor_app_token,
        saleor_app_id,
        request_timeout_secs,
        user_agent,
        import_batch_size,
        products_page_size,
        algolia_host_override,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "ALGOSYNC_ENV".to_string(),
            reason: format!("expected development, test, or production; got {other:?}"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
