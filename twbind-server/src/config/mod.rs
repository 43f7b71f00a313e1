//! Configuration module for twbind-server.
//!
//! Sources, highest precedence first:
//! 1. `--listen` on the command line
//! 2. the `ADDRESS` environment variable
//! 3. the optional TOML config file
//! 4. built-in defaults (listen on `:8080`)

pub mod file;
pub mod runtime;

use crate::config::file::FileConfig;
use crate::config::runtime::{ListenAddress, RuntimeConfig, ServerConfig};
use std::env::VarError;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the listen address.
pub const ADDRESS_ENV: &str = "ADDRESS";

/// Listen address used when nothing else is configured.
pub const DEFAULT_ADDRESS: &str = ":8080";

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("invalid listen address {0:?}")]
    InvalidAddress(String),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    listen_override: Option<String>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: Option<impl AsRef<Path>>, listen_override: Option<String>) -> Self {
        Self {
            config_path: config_path.map(|p| p.as_ref().to_path_buf()),
            listen_override,
        }
    }

    /// Load the configuration, reading `ADDRESS` from the process environment.
    pub fn load(&self) -> Result<RuntimeConfig, ConfigError> {
        let address = address_var(std::env::var(ADDRESS_ENV))?;
        self.load_with_address(address.as_deref())
    }

    /// Load the configuration with an explicit `ADDRESS` value.
    ///
    /// This will:
    /// 1. Read the TOML file, if one was given
    /// 2. Resolve the listen address across all sources
    /// 3. Validate the result
    pub fn load_with_address(&self, address: Option<&str>) -> Result<RuntimeConfig, ConfigError> {
        let file_config = self.read_file()?;

        let listen = resolve_listen(
            self.listen_override.as_deref(),
            address,
            file_config.server.listen.as_deref(),
        );
        let listen: ListenAddress = listen.parse()?;

        EnvFilter::try_new(&file_config.log.filter).map_err(|e| {
            ConfigError::ValidationError(format!(
                "invalid log filter {:?}: {}",
                file_config.log.filter, e
            ))
        })?;

        if file_config.server.max_payload_bytes == 0 {
            return Err(ConfigError::ValidationError(
                "server.max_payload_bytes must be greater than zero".to_string(),
            ));
        }

        Ok(RuntimeConfig {
            server: ServerConfig {
                listen,
                max_payload_bytes: file_config.server.max_payload_bytes,
            },
            log: file_config.log,
        })
    }

    /// Re-read the configuration (used on SIGHUP).
    pub fn reload(&self) -> Result<RuntimeConfig, ConfigError> {
        self.load()
    }

    fn read_file(&self) -> Result<FileConfig, ConfigError> {
        let Some(path) = &self.config_path else {
            return Ok(FileConfig::default());
        };
        let config_content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&config_content)?)
    }
}

/// Read the result of looking up `ADDRESS`.
///
/// Only an unset variable counts as missing; a value that is not UTF-8 is an
/// invalid address.
pub fn address_var(value: Result<String, VarError>) -> Result<Option<String>, ConfigError> {
    match value {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(raw)) => Err(ConfigError::InvalidAddress(
            raw.to_string_lossy().into_owned(),
        )),
    }
}

/// Interpret a raw `ADDRESS` value.
///
/// Surrounding whitespace is trimmed; a value that is empty afterwards counts
/// as unset.
pub fn address_from_env(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Pick the listen address from the CLI, `ADDRESS` and the config file, in
/// that order, falling back to [`DEFAULT_ADDRESS`].
pub fn resolve_listen<'a>(
    cli: Option<&'a str>,
    env: Option<&'a str>,
    file: Option<&'a str>,
) -> &'a str {
    address_from_env(cli)
        .or_else(|| address_from_env(env))
        .or_else(|| address_from_env(file))
        .unwrap_or(DEFAULT_ADDRESS)
}
