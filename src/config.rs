//! Launcher configuration.
//!
//! Desktops, programs and the switch command live in the SQLite store.  This
//! optional JSON file only says where that store is and what the default
//! wait between desktops is.  It is looked up at
//! `$XDG_CONFIG_HOME/deskstart/config.json`.
//!
//! # Example
//!
//! ```json
//! {
//!   "database": "~/Databases/general.sqlite",
//!   "default_wait_seconds": 10
//! }
//! ```

use crate::orchestrator::DEFAULT_WAIT_SECONDS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable selecting the store, overriding the config file.
pub const DATABASE_ENV: &str = "START_PROGRAMS_DB";

/// Store location used when neither the environment nor the file names one.
pub const DEFAULT_DATABASE: &str = "~/Databases/general.sqlite";

/// Top-level configuration.
///
/// Every field is optional — a minimal `{}` file is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Path of the SQLite store.  A leading `~` is expanded.
    pub database: Option<PathBuf>,
    /// Seconds to wait after a desktop whose `waitSeconds` is `0` and no
    /// `waitBeforeSwitchDesktop` variable exists.
    pub default_wait_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            default_wait_seconds: DEFAULT_WAIT_SECONDS,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// The store path: `env_override` (the value of [`DATABASE_ENV`]) wins,
    /// then the file's `database`, then [`DEFAULT_DATABASE`].
    pub fn database_path(&self, env_override: Option<&str>, home: &Path) -> PathBuf {
        let raw = match (env_override, &self.database) {
            (Some(env), _) => PathBuf::from(env),
            (None, Some(db)) => db.clone(),
            (None, None) => PathBuf::from(DEFAULT_DATABASE),
        };
        expand_home(&raw, home)
    }
}

/// Replace a leading `~` component with `home`.
pub fn expand_home(path: &Path, home: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => home.join(rest),
        Err(_) => path.to_path_buf(),
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
