// src/config.rs

use std::env;

use dotenvy::dotenv;

const DEFAULT_DATABASE_URL: &str = "sqlite://database.sqlite?mode=rwc";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Base64 data URIs are roughly a third larger than the images they carry.
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub bind_addr: String,
    pub body_limit_bytes: usize,
    /// `None` means any origin is allowed.
    pub cors_allow_origins: Option<Vec<String>>,
    pub log_dir: String,
    pub rust_log: String,
}

/// A configuration variable was present but could not be parsed.
#[derive(Debug, thiserror::Error)]
#[error("invalid value for {key}: {value:?}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let database_max_connections = parse_var("DATABASE_MAX_CONNECTIONS", 5)?;

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let body_limit_bytes = parse_var("BODY_LIMIT_BYTES", DEFAULT_BODY_LIMIT_BYTES)?;

        let cors_allow_origins = env::var("CORS_ALLOW_ORIGINS")
            .ok()
            .and_then(|raw| parse_origins(&raw));

        let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            database_url,
            database_max_connections,
            bind_addr,
            body_limit_bytes,
            cors_allow_origins,
            log_dir,
            rust_log,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            database_max_connections: 5,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
            cors_allow_origins: None,
            log_dir: "logs".to_string(),
            rust_log: "info".to_string(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError { key, value }),
        Err(_) => Ok(default),
    }
}

/// `*` (or an empty list) allows every origin.
fn parse_origins(raw: &str) -> Option<Vec<String>> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        None
    } else {
        Some(origins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_origin_allows_everything() {
        assert!(parse_origins("*").is_none());
        assert!(parse_origins(" , ").is_none());
        assert!(parse_origins("http://a.test, *").is_none());
    }

    #[test]
    fn origin_list_is_trimmed() {
        let origins = parse_origins("http://localhost:5173, http://127.0.0.1:5173").unwrap();
        assert_eq!(
            origins,
            vec!["http://localhost:5173", "http://127.0.0.1:5173"]
        );
    }
}
