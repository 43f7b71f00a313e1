//! TOML file configuration structures.
//!
//! Every key is optional; an absent file behaves like an empty one.

use serde::Deserialize;

use super::runtime::LogConfig;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Listen address, Go style (e.g. ":8080" or "127.0.0.1:8080").
    ///
    /// The `ADDRESS` environment variable and `--listen` take precedence.
    pub listen: Option<String>,
    /// Largest accepted binding payload in bytes.
    #[serde(default = "default_max_payload_bytes")]
    pub max_payload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: None,
            max_payload_bytes: default_max_payload_bytes(),
        }
    }
}

/// Matches the sidecar's default request body limit of 4 MiB.
pub fn default_max_payload_bytes() -> usize {
    4 * 1024 * 1024
}
