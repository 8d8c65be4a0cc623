//! Service configuration read from the environment.
//!
//! # Environment Variables
//!
//! - `HOST`: Listen address (default: 0.0.0.0)
//! - `PORT`: Listen port (default: 8080)
//! - `DOPPLER_ADDR`: Firehose endpoint address (refused while only the mock
//!   transport is available)
//! - `CF_ACCESS_TOKEN`: Firehose auth token
//! - `FIREHOSE_SUBSCRIPTION_ID`: Subscription id (default: firehose-a)
//! - `MOCK_REPLAY_INTERVAL_SECS`: Demo topology replay interval (default: 5)

use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use ingestor::firehose::DEFAULT_SUBSCRIPTION_ID;

use crate::errors::AppError;

/// Default listen port.
const DEFAULT_PORT: u16 = 8080;

/// Default listen address.
const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Default mock replay interval in seconds.
const DEFAULT_MOCK_REPLAY_INTERVAL_SECS: u64 = 5;

/// Runtime configuration for the service.
#[derive(Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    /// Address of the firehose endpoint.
    pub firehose_address: Option<String>,
    /// Credential presented to the firehose.
    pub auth_token: Option<String>,
    pub subscription_id: String,
    /// How often the mock firehose replays its topology.
    pub mock_replay_interval: Duration,
}

impl Config {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read the configuration through `lookup`, which returns the value of a
    /// variable or `None` when it is unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let replay_secs: u64 = parse_var(
            &non_empty,
            "MOCK_REPLAY_INTERVAL_SECS",
            DEFAULT_MOCK_REPLAY_INTERVAL_SECS,
        )?;
        if replay_secs == 0 {
            return Err(AppError::config(
                "MOCK_REPLAY_INTERVAL_SECS must be at least 1",
            ));
        }

        Ok(Self {
            host: parse_var(&non_empty, "HOST", DEFAULT_HOST)?,
            port: parse_var(&non_empty, "PORT", DEFAULT_PORT)?,
            firehose_address: non_empty("DOPPLER_ADDR"),
            auth_token: non_empty("CF_ACCESS_TOKEN"),
            subscription_id: non_empty("FIREHOSE_SUBSCRIPTION_ID")
                .unwrap_or_else(|| DEFAULT_SUBSCRIPTION_ID.to_string()),
            mock_replay_interval: Duration::from_secs(replay_secs),
        })
    }

    /// Address the HTTP server binds to.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// The auth token must never reach the logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("firehose_address", &self.firehose_address)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("subscription_id", &self.subscription_id)
            .field("mock_replay_interval", &self.mock_replay_interval)
            .finish()
    }
}

fn parse_var<T, F>(lookup: &F, name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| AppError::config(format!("Invalid {}={:?}: {}", name, raw, e))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.listen_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.firehose_address, None);
        assert_eq!(config.auth_token, None);
        assert_eq!(config.subscription_id, "firehose-a");
        assert_eq!(config.mock_replay_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_reads_values() {
        let config = config_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "9090"),
            ("DOPPLER_ADDR", "wss://doppler.example.com:443"),
            ("CF_ACCESS_TOKEN", "bearer abc"),
            ("FIREHOSE_SUBSCRIPTION_ID", "graph-b"),
            ("MOCK_REPLAY_INTERVAL_SECS", "30"),
        ])
        .unwrap();

        assert_eq!(config.listen_addr().to_string(), "127.0.0.1:9090");
        assert_eq!(
            config.firehose_address.as_deref(),
            Some("wss://doppler.example.com:443")
        );
        assert_eq!(config.auth_token.as_deref(), Some("bearer abc"));
        assert_eq!(config.subscription_id, "graph-b");
        assert_eq!(config.mock_replay_interval, Duration::from_secs(30));
    }

    #[test]
    fn test_empty_values_fall_back_to_defaults() {
        let config = config_from(&[("PORT", ""), ("CF_ACCESS_TOKEN", "  ")]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.auth_token, None);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(err.to_string().contains("PORT"));

        assert!(config_from(&[("PORT", "70000")]).is_err());
    }

    #[test]
    fn test_zero_replay_interval_is_rejected() {
        let err = config_from(&[("MOCK_REPLAY_INTERVAL_SECS", "0")]).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
        assert!(err.to_string().contains("MOCK_REPLAY_INTERVAL_SECS"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = config_from(&[("CF_ACCESS_TOKEN", "secret-token")]).unwrap();
        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("<redacted>"));
    }
}
