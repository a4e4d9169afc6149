//! Server configuration parsed from environment variables.
//!
//! AI and storage settings live with their clients (`llm::config`,
//! `storage::StorageConfig`) and `SITE_URL` is read by the prerender CLI;
//! this covers the HTTP server and database.

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_STATIC_DIR: &str = "dist";
pub const DEFAULT_FACT_CHECK_MAX_TOKENS: u32 = 800;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("invalid {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub static_dir: PathBuf,
    pub fact_check_max_tokens: u32,
}

impl AppConfig {
    /// Build server config from environment variables.
    ///
    /// Required:
    /// - `DATABASE_URL`
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `DB_MAX_CONNECTIONS`: default 5
    /// - `STATIC_DIR`: default `dist`
    /// - `FACT_CHECK_MAX_TOKENS`: default 800
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when `DATABASE_URL` is unset and
    /// [`ConfigError::Invalid`] when `PORT` does not parse. Other numeric
    /// settings fall back to their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env_opt("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let port = match env_opt("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { var: "PORT", value: raw })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            port,
            database_url,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS),
            static_dir: env_opt("STATIC_DIR").map_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR), PathBuf::from),
            fact_check_max_tokens: env_parse("FACT_CHECK_MAX_TOKENS", DEFAULT_FACT_CHECK_MAX_TOKENS),
        })
    }
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
