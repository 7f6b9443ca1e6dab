//! Transport configuration.

use std::time::Duration;

use crate::error::ConfigError;

/// Caller-owned configuration for an
/// [`HttpClient`](crate::client::HttpClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Default per-request deadline, overridable per descriptor.
    pub timeout: Duration,
    /// Deadline for establishing a new connection.
    pub connect_timeout: Duration,
    /// Idle connections kept per (scheme, host, port). Zero disables
    /// pooling.
    pub pool_max_idle_per_host: usize,
    /// `User-Agent` header applied when the request does not set one.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_max_idle_per_host: 8,
            user_agent: concat!("arbalest/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl ClientConfig {
    /// Check the configuration for values that would make every request
    /// fail or hoard resources.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout.is_zero() {
            return Err(ConfigError::new("timeout must be greater than zero"));
        }
        if self.timeout.as_secs() > 3600 {
            return Err(ConfigError::new("timeout must not exceed 1 hour"));
        }
        if self.connect_timeout.is_zero() {
            return Err(ConfigError::new("connect timeout must be greater than zero"));
        }
        if self.connect_timeout.as_secs() > 300 {
            return Err(ConfigError::new("connect timeout must not exceed 5 minutes"));
        }
        if self.pool_max_idle_per_host > 1000 {
            return Err(ConfigError::new("pool max idle per host must not exceed 1000"));
        }
        if self.user_agent.is_empty() {
            return Err(ConfigError::new("user agent cannot be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(ClientConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let config = ClientConfig {
            timeout: Duration::ZERO,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_user_agent_is_rejected() {
        let config = ClientConfig {
            user_agent: String::new(),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
