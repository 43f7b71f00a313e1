//! Validated configuration the server runs with.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use super::ConfigError;

/// Configuration built once at startup and passed into the server.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub server: ServerConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub listen: ListenAddress,
    pub max_payload_bytes: usize,
}

/// Logging configuration.
///
/// `RUST_LOG`, when set, replaces `filter`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::default(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// A listen address in the Go `host:port` form.
///
/// An empty host (":8080") means every interface. IPv6 hosts must be
/// bracketed ("[::1]:8080").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenAddress {
    raw: String,
    host: String,
    port: u16,
}

impl ListenAddress {
    /// The address as it was configured.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Host to bind, with brackets removed and the wildcard filled in.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl FromStr for ListenAddress {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidAddress(s.to_owned());

        let (host, port) = s.rsplit_once(':').ok_or_else(invalid)?;
        let port = port.parse::<u16>().map_err(|_| invalid())?;

        let host = match host.strip_prefix('[') {
            Some(bracketed) => bracketed.strip_suffix(']').ok_or_else(invalid)?,
            None if host.contains(':') => return Err(invalid()),
            None => host,
        };
        let host = if host.is_empty() { "0.0.0.0" } else { host };

        Ok(Self {
            raw: s.to_owned(),
            host: host.to_owned(),
            port,
        })
    }
}

impl fmt::Display for ListenAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
