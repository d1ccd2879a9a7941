//! Server configuration from environment variables.
//!
//! # Responsibility
//! - Resolve port, database path and logging settings with defaults that
//!   work for local runs.
//!
//! # Invariants
//! - Loading never logs; it runs before the logging bootstrap. The server
//!   startup path logs the resolved values once logging is active.
//! - The resolved log directory is absolute; the logging bootstrap rejects
//!   relative paths.

use cadence_core::default_log_level;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

const DEFAULT_PORT: u16 = 3333;
const DEFAULT_DB_PATH: &str = "cadence.db";

pub struct Config {
    pub port: u16,
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl Config {
    /// Loads configuration, falling back to defaults for missing or
    /// unparseable values.
    pub fn load() -> Self {
        Self {
            port: parse_var("CADENCE_PORT").unwrap_or(DEFAULT_PORT),
            db_path: env::var("CADENCE_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DB_PATH)),
            log_dir: env::var("CADENCE_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_log_dir()),
            log_level: env::var("CADENCE_LOG_LEVEL")
                .unwrap_or_else(|_| default_log_level().to_string()),
        }
    }
}

fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|value| value.parse().ok())
}

fn default_log_dir() -> PathBuf {
    env::current_dir()
        .map(|cwd| cwd.join("logs"))
        .unwrap_or_else(|_| PathBuf::from("/tmp/cadence/logs"))
}

#[cfg(test)]
mod tests {
    use super::{default_log_dir, parse_var};

    #[test]
    fn parse_var_returns_none_for_missing_key() {
        assert_eq!(parse_var::<u16>("CADENCE_TEST_UNSET_PORT"), None);
    }

    #[test]
    fn default_log_dir_is_absolute() {
        assert!(default_log_dir().is_absolute());
    }
}
