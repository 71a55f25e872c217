//! Configuration management for taskpicker.
//!
//! Configuration can be set via environment variables:
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `5000`.
//! - `TASK_DATA_FILE` - Optional. Association map file. Defaults to `task_data.json`
//!   (relative to the working directory).
//! - `TASK_BIN` - Optional. Taskwarrior executable. Defaults to `task`.
//! - `TASKRC` - Optional. Forwarded to Taskwarrior.
//! - `TASKDATA` - Optional. Forwarded to Taskwarrior.
//! - `DEFAULT_TOP_N` - Optional. Default `n` for `/tasks`. Defaults to `5`.
//! - `DEFAULT_RANDOM_K` - Optional. Default `k` for `/tasks`. Defaults to `3`.

use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_DATA_FILE: &str = "task_data.json";
pub const DEFAULT_TOP_N: usize = 5;
pub const DEFAULT_RANDOM_K: usize = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// How to reach the Taskwarrior CLI.
#[derive(Debug, Clone)]
pub struct TaskwarriorConfig {
    /// Executable name or path
    pub bin: String,

    /// Overrides `TASKRC` for the child process
    pub taskrc: Option<PathBuf>,

    /// Overrides `TASKDATA` for the child process
    pub taskdata: Option<PathBuf>,
}

impl Default for TaskwarriorConfig {
    fn default() -> Self {
        Self {
            bin: "task".to_string(),
            taskrc: None,
            taskdata: None,
        }
    }
}

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// JSON file backing the association map
    pub data_file: PathBuf,

    /// Taskwarrior invocation settings
    pub taskwarrior: TaskwarriorConfig,

    /// Default size of the `top` list on `/tasks`
    pub default_top_n: usize,

    /// Default size of the `random` list on `/tasks`
    pub default_random_k: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if a numeric variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_or(&lookup, "PORT", 5000)?;

        let data_file = lookup("TASK_DATA_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));

        let taskwarrior = TaskwarriorConfig {
            bin: lookup("TASK_BIN")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| "task".to_string()),
            taskrc: lookup("TASKRC").map(PathBuf::from),
            taskdata: lookup("TASKDATA").map(PathBuf::from),
        };

        let default_top_n = parse_or(&lookup, "DEFAULT_TOP_N", DEFAULT_TOP_N)?;
        let default_random_k = parse_or(&lookup, "DEFAULT_RANDOM_K", DEFAULT_RANDOM_K)?;

        Ok(Self {
            host,
            port,
            data_file,
            taskwarrior,
            default_top_n,
            default_random_k,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(data_file: PathBuf) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            data_file,
            taskwarrior: TaskwarriorConfig::default(),
            default_top_n: DEFAULT_TOP_N,
            default_random_k: DEFAULT_RANDOM_K,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ConfigError::InvalidValue(key.to_string(), format!("{}", e))),
        None => Ok(default),
    }
}
