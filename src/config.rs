// src/config.rs
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const ADDR_VAR: &str = "LISTING_SEARCH_ADDR";
pub const API_BASE_VAR: &str = "LISTING_SEARCH_API_BASE";
pub const DB_VAR: &str = "LISTING_SEARCH_DB";
pub const WORKERS_VAR: &str = "LISTING_SEARCH_WORKERS";
pub const API_TIMEOUT_VAR: &str = "LISTING_SEARCH_API_TIMEOUT_SECS";

/// Startup failure reading the environment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
    #[error("{key} must be an http(s) URL, got {value:?}")]
    NotHttp { key: &'static str, value: String },
    #[error("{key} must be at least 1")]
    Zero { key: &'static str },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub addr: SocketAddr,
    /// Properties API root, without trailing slash.
    pub api_base: String,
    pub db_path: String,
    pub workers: usize,
    pub api_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            api_base: "https://agents.propertygenie.com.my/api".to_string(),
            db_path: "listing_search.sqlite3".to_string(),
            workers: 8,
            api_timeout: Duration::from_secs(15),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any variable source; unset or blank
    /// variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut cfg = Self::default();

        if let Some(v) = get(ADDR_VAR) {
            cfg.addr = parse(ADDR_VAR, &v)?;
        }
        if let Some(v) = get(API_BASE_VAR) {
            if !(v.starts_with("http://") || v.starts_with("https://")) {
                return Err(ConfigError::NotHttp {
                    key: API_BASE_VAR,
                    value: v,
                });
            }
            cfg.api_base = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = get(DB_VAR) {
            cfg.db_path = v;
        }
        if let Some(v) = get(WORKERS_VAR) {
            cfg.workers = parse(WORKERS_VAR, &v)?;
            if cfg.workers == 0 {
                return Err(ConfigError::Zero { key: WORKERS_VAR });
            }
        }
        if let Some(v) = get(API_TIMEOUT_VAR) {
            cfg.api_timeout = Duration::from_secs(parse(API_TIMEOUT_VAR, &v)?);
        }

        Ok(cfg)
    }
}

fn parse<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_string(),
    })
}
