//! Receipt API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use receipt_db::DbConfig;
use serde::{Deserialize, Serialize};

/// Receipt API configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Listen address
    pub bind_addr: IpAddr,

    /// Listen port
    pub port: u16,

    /// SQLite database file (`:memory:` for an ephemeral store)
    pub database_path: PathBuf,

    /// Connection pool size
    pub db_max_connections: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            bind_addr: IpAddr::from([0, 0, 0, 0]),
            port: 8080,
            database_path: PathBuf::from("./receipts.db"),
            db_max_connections: 5,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from any variable lookup.
    ///
    /// Unset variables fall back to [`ApiConfig::default`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ApiConfig::default();

        let config = ApiConfig {
            bind_addr: parse_or(&lookup, "RECEIPT_API_BIND_ADDR", defaults.bind_addr)?,

            port: parse_or(&lookup, "RECEIPT_API_PORT", defaults.port)?,

            database_path: lookup("RECEIPT_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),

            db_max_connections: parse_or(
                &lookup,
                "RECEIPT_DB_MAX_CONNECTIONS",
                defaults.db_max_connections,
            )?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue(
                "RECEIPT_DB_MAX_CONNECTIONS".to_string(),
            ));
        }

        Ok(config)
    }

    /// Socket address the server binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    /// Pool settings for [`receipt_db::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        let config = DbConfig::new(&self.database_path);
        if config.is_in_memory() {
            // One shared connection, or every request sees a fresh empty db
            return DbConfig::in_memory();
        }
        config
            .max_connections(self.db_max_connections)
            .min_connections(1)
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("RECEIPT_API_BIND_ADDR", "127.0.0.1"),
            ("RECEIPT_API_PORT", "9000"),
            ("RECEIPT_DATABASE_PATH", "/tmp/r.db"),
            ("RECEIPT_DB_MAX_CONNECTIONS", "8"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:9000");
        assert_eq!(config.database_path, PathBuf::from("/tmp/r.db"));

        let db = config.db_config();
        assert_eq!(db.max_connections, 8);
        assert!(!db.is_in_memory());
    }

    #[test]
    fn test_invalid_values_name_the_variable() {
        let err = load(&[("RECEIPT_API_PORT", "eighty")]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for RECEIPT_API_PORT");

        let err = load(&[("RECEIPT_DB_MAX_CONNECTIONS", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref name) if name == "RECEIPT_DB_MAX_CONNECTIONS"));

        assert!(load(&[("RECEIPT_API_BIND_ADDR", "localhost")]).is_err());
    }

    #[test]
    fn test_memory_database_uses_single_connection() {
        let config = load(&[
            ("RECEIPT_DATABASE_PATH", ":memory:"),
            ("RECEIPT_DB_MAX_CONNECTIONS", "8"),
        ])
        .unwrap();

        let db = config.db_config();
        assert!(db.is_in_memory());
        assert_eq!(db.max_connections, 1);
    }
}
