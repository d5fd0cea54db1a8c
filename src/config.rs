use std::net::{AddrParseError, SocketAddr};
use std::num::ParseIntError;
use thiserror::Error;

pub const ADDR_ENV: &str = "CPM_SCHEDULE_HTTP_ADDR";
pub const MAX_TASKS_ENV: &str = "CPM_SCHEDULE_MAX_TASKS";

pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_TASKS: usize = 10_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid CPM_SCHEDULE_HTTP_ADDR '{value}': {source}")]
    InvalidAddr {
        value: String,
        source: AddrParseError,
    },

    #[error("invalid CPM_SCHEDULE_MAX_TASKS '{value}': {source}")]
    InvalidMaxTasks {
        value: String,
        source: ParseIntError,
    },

    #[error("CPM_SCHEDULE_MAX_TASKS must be at least 1")]
    ZeroMaxTasks,
}

/// Settings for the hosting layer. The engine itself takes none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub addr: SocketAddr,
    /// Requests with more rows than this are refused before computing.
    pub max_tasks: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            max_tasks: DEFAULT_MAX_TASKS,
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let addr_value = lookup(ADDR_ENV).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_value
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidAddr {
                value: addr_value.clone(),
                source,
            })?;

        let max_tasks = match lookup(MAX_TASKS_ENV) {
            Some(value) => value
                .trim()
                .parse::<usize>()
                .map_err(|source| ConfigError::InvalidMaxTasks {
                    value: value.clone(),
                    source,
                })?,
            None => DEFAULT_MAX_TASKS,
        };
        if max_tasks == 0 {
            return Err(ConfigError::ZeroMaxTasks);
        }

        Ok(Self { addr, max_tasks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ServiceConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn reads_overrides() {
        let config = ServiceConfig::from_lookup(lookup(&[
            (ADDR_ENV, "127.0.0.1:8080"),
            (MAX_TASKS_ENV, " 50 "),
        ]))
        .unwrap();
        assert_eq!(config.addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(config.max_tasks, 50);
    }

    #[test]
    fn rejects_bad_values() {
        let err = ServiceConfig::from_lookup(lookup(&[(ADDR_ENV, "nowhere")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAddr { .. }));

        let err = ServiceConfig::from_lookup(lookup(&[(MAX_TASKS_ENV, "-3")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMaxTasks { .. }));

        let err = ServiceConfig::from_lookup(lookup(&[(MAX_TASKS_ENV, "0")])).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroMaxTasks));
    }
}
