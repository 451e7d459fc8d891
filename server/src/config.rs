//! Server configuration module.
//!
//! This module provides configuration loading for the simulation server from
//! environment variables.
//!
//! # Environment Variables
//!
//! - `SIMULACAO_LISTEN_PORT`: Port to listen on (default: `8080`)
//! - `SIMULACAO_DATA_DIRECTORY`: Directory for the durable simulation log.
//!   When unset, simulations are kept in memory only.
//! - `SIMULACAO_RESTRICTIONS_FILE`: File listing restricted CPFs, one per line
//!   (default: the built-in dataset)
//! - `SIMULACAO_RESTRICTION_TIMEOUT_MS`: Restriction lookup timeout in
//!   milliseconds (default: `2000`)
//! - `SIMULACAO_SEED`: Whether to load the seed simulations into a store that
//!   has never held data, `true` or `false` (default: `true`). A durable log
//!   is seeded only on first start.
//!
//! # Invariants
//!
//! - `listen_port` is always a valid port number
//! - `restriction_timeout` is never zero

use std::path::PathBuf;
use std::time::Duration;

const LISTEN_PORT: &str = "SIMULACAO_LISTEN_PORT";
const DATA_DIRECTORY: &str = "SIMULACAO_DATA_DIRECTORY";
const RESTRICTIONS_FILE: &str = "SIMULACAO_RESTRICTIONS_FILE";
const RESTRICTION_TIMEOUT_MS: &str = "SIMULACAO_RESTRICTION_TIMEOUT_MS";
const SEED: &str = "SIMULACAO_SEED";

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Port to listen on for HTTP connections.
    pub listen_port: u16,
    /// Directory holding `simulacoes.log`. `None` selects the in-memory store.
    pub data_directory: Option<PathBuf>,
    /// Restricted CPF list. `None` selects the built-in dataset.
    pub restrictions_file: Option<PathBuf>,
    /// Upper bound on a single restriction lookup.
    pub restriction_timeout: Duration,
    /// Load the seed simulations into a new store.
    pub seed: bool,
}

/// Error returned when loading configuration fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    InvalidValue { name: String, message: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { name, message } => {
                write!(f, "invalid value for {name}: {message}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_port: Self::DEFAULT_PORT,
            data_directory: None,
            restrictions_file: None,
            restriction_timeout: Self::DEFAULT_RESTRICTION_TIMEOUT,
            seed: true,
        }
    }
}

impl ServerConfig {
    /// Default port for the server.
    pub const DEFAULT_PORT: u16 = 8080;
    /// Default restriction lookup timeout.
    pub const DEFAULT_RESTRICTION_TIMEOUT: Duration = Duration::from_millis(2000);
    /// File name of the simulation log inside the data directory.
    pub const LOG_FILE_NAME: &'static str = "simulacoes.log";

    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to a value that does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// Unset and empty variables take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to a value that does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let listen_port = match get(LISTEN_PORT) {
            Some(value) => Self::parse_port(&value)?,
            None => Self::DEFAULT_PORT,
        };
        let restriction_timeout = match get(RESTRICTION_TIMEOUT_MS) {
            Some(value) => Self::parse_timeout(&value)?,
            None => Self::DEFAULT_RESTRICTION_TIMEOUT,
        };
        let seed = match get(SEED) {
            Some(value) => Self::parse_bool(SEED, &value)?,
            None => true,
        };

        Ok(Self {
            listen_port,
            data_directory: get(DATA_DIRECTORY).map(PathBuf::from),
            restrictions_file: get(RESTRICTIONS_FILE).map(PathBuf::from),
            restriction_timeout,
            seed,
        })
    }

    /// Path of the simulation log, if a data directory is configured.
    #[must_use]
    pub fn log_path(&self) -> Option<PathBuf> {
        self.data_directory
            .as_ref()
            .map(|directory| directory.join(Self::LOG_FILE_NAME))
    }

    fn parse_port(value: &str) -> Result<u16, ConfigError> {
        match value.trim().parse::<u16>() {
            Ok(port) if port > 0 => Ok(port),
            _ => Err(ConfigError::InvalidValue {
                name: LISTEN_PORT.to_string(),
                message: format!("'{value}' is not a valid port number (must be 1-65535)"),
            }),
        }
    }

    fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
        match value.trim().parse::<u64>() {
            Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
            _ => Err(ConfigError::InvalidValue {
                name: RESTRICTION_TIMEOUT_MS.to_string(),
                message: format!("'{value}' is not a positive number of milliseconds"),
            }),
        }
    }

    fn parse_bool(name: &str, value: &str) -> Result<bool, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(true),
            "false" | "0" | "no" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                name: name.to_string(),
                message: format!("'{value}' is not a boolean (use true or false)"),
            }),
        }
    }
}
