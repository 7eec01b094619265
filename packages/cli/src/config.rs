use std::env;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use thiserror::Error;

use todos_fetch::FetchConfig;
use todos_storage::PoolConfig;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("{0} must be at least 1")]
    MustBePositive(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    /// Allowed CORS origin; `*` allows any origin
    pub cors_origin: String,
    pub database: PoolConfig,
    pub fetch: FetchConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = parse_or(&lookup, "SERVER_HOST", IpAddr::from([127, 0, 0, 1]))?;

        let port: u16 = parse_or(&lookup, "PORT", 8080)?;
        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let cors_origin = lookup("CORS_ORIGIN").unwrap_or_else(|| "*".to_string());

        let defaults = PoolConfig::default();
        let database = PoolConfig {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            max_connections: positive(
                "DATABASE_MAX_CONNECTIONS",
                parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", defaults.max_connections)?,
            )?,
            ..defaults
        };

        let fetch_defaults = FetchConfig::default();
        let fetch = FetchConfig {
            default_limit: positive(
                "FETCH_DEFAULT_LIMIT",
                parse_or(&lookup, "FETCH_DEFAULT_LIMIT", fetch_defaults.default_limit)?,
            )?,
            max_limit: positive(
                "FETCH_MAX_LIMIT",
                parse_or(&lookup, "FETCH_MAX_LIMIT", fetch_defaults.max_limit)?,
            )?,
            max_partitions: positive(
                "FETCH_MAX_PARTITIONS",
                parse_or(&lookup, "FETCH_MAX_PARTITIONS", fetch_defaults.max_partitions)?,
            )?,
            partition_timeout: Duration::from_secs(positive(
                "FETCH_PARTITION_TIMEOUT_SECS",
                parse_or(
                    &lookup,
                    "FETCH_PARTITION_TIMEOUT_SECS",
                    fetch_defaults.partition_timeout.as_secs(),
                )?,
            )?),
            sort_by_id: parse_or(&lookup, "FETCH_SORT_BY_ID", fetch_defaults.sort_by_id)?,
        };

        Ok(Config {
            host,
            port,
            cors_origin,
            database,
            fetch,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value: raw }),
    }
}

fn positive<T>(name: &'static str, value: T) -> Result<T, ConfigError>
where
    T: PartialOrd + From<u8>,
{
    if value < T::from(1) {
        return Err(ConfigError::MustBePositive(name));
    }
    Ok(value)
}
