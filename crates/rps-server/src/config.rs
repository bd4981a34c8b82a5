//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Server bind address (`BIND_ADDR`, `PORT`)
    pub bind: SocketAddr,
    /// How long finished games are kept (`FINISHED_GAME_TTL_SECS`); `None` keeps them forever
    pub finished_game_ttl: Option<Duration>,
    /// Period of the eviction sweep (`SWEEP_INTERVAL_SECS`)
    pub sweep_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            finished_game_ttl: None,
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns error if a variable is set but cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let ip: IpAddr = parse_var(&lookup, "BIND_ADDR")?.unwrap_or(defaults.bind.ip());
        let port: u16 = parse_var(&lookup, "PORT")?.unwrap_or(defaults.bind.port());

        let finished_game_ttl =
            parse_var(&lookup, "FINISHED_GAME_TTL_SECS")?.map(Duration::from_secs);

        let sweep_secs: u64 = parse_var(&lookup, "SWEEP_INTERVAL_SECS")?
            .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS);
        if sweep_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "SWEEP_INTERVAL_SECS",
                value: sweep_secs.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            bind: SocketAddr::new(ip, port),
            finished_game_ttl,
            sweep_interval: Duration::from_secs(sweep_secs),
        })
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(value) = lookup(var) else {
        return Ok(None);
    };

    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
            value,
        })
}
