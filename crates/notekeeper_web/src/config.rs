//! Server configuration read from `NOTEKEEPER_*` environment variables.
//!
//! # Invariants
//! - `log_dir` is always absolute.
//! - Unset variables fall back to defaults; set but malformed ones are errors.

use notekeeper_core::default_log_level;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_BIND: &str = "127.0.0.1:8000";
pub const DEFAULT_DB_PATH: &str = "notekeeper.sqlite3";
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not a valid value: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
    #[error("cannot resolve working directory: {0}")]
    WorkingDir(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub db_path: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
    pub max_body_bytes: usize,
    pub password_cost: u32,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let cwd = std::env::current_dir()?;
        Self::from_lookup(|key| std::env::var(key).ok(), cwd)
    }

    /// Builds the config from an arbitrary variable source. Relative paths
    /// resolve against `cwd`.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        cwd: PathBuf,
    ) -> Result<Self, ConfigError> {
        let value = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let bind_raw = value("NOTEKEEPER_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|err| invalid("NOTEKEEPER_BIND", &bind_raw, err))?;

        let db_path = value("NOTEKEEPER_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        let log_level = value("NOTEKEEPER_LOG_LEVEL")
            .map(|level| level.trim().to_ascii_lowercase())
            .unwrap_or_else(|| default_log_level().to_string());

        let log_dir = match value("NOTEKEEPER_LOG_DIR") {
            Some(dir) => {
                let dir = PathBuf::from(dir);
                if dir.is_absolute() {
                    dir
                } else {
                    cwd.join(dir)
                }
            }
            None => cwd.join("logs"),
        };

        let max_body_bytes = match value("NOTEKEEPER_MAX_BODY_BYTES") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|err| invalid("NOTEKEEPER_MAX_BODY_BYTES", &raw, err))?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        let password_cost = match value("NOTEKEEPER_BCRYPT_COST") {
            Some(raw) => {
                let cost = raw
                    .trim()
                    .parse::<u32>()
                    .map_err(|err| invalid("NOTEKEEPER_BCRYPT_COST", &raw, err))?;
                if !(4..=31).contains(&cost) {
                    return Err(invalid("NOTEKEEPER_BCRYPT_COST", &raw, "must be in 4..=31"));
                }
                cost
            }
            None => bcrypt::DEFAULT_COST,
        };

        Ok(Self {
            bind,
            db_path,
            log_level,
            log_dir,
            max_body_bytes,
            password_cost,
        })
    }
}

fn invalid(var: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ServerConfig, DEFAULT_MAX_BODY_BYTES};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn load(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned(), PathBuf::from("/srv/notes"))
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind.to_string(), "127.0.0.1:8000");
        assert_eq!(config.db_path, PathBuf::from("notekeeper.sqlite3"));
        assert_eq!(config.log_dir, PathBuf::from("/srv/notes/logs"));
        assert_eq!(config.max_body_bytes, DEFAULT_MAX_BODY_BYTES);
        assert_eq!(config.password_cost, bcrypt::DEFAULT_COST);
    }

    #[test]
    fn relative_log_dir_is_anchored_to_cwd() {
        let config = load(&[("NOTEKEEPER_LOG_DIR", "var/log")]).unwrap();
        assert_eq!(config.log_dir, PathBuf::from("/srv/notes/var/log"));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = load(&[
            ("NOTEKEEPER_BIND", "0.0.0.0:9000"),
            ("NOTEKEEPER_LOG_LEVEL", "DEBUG"),
            ("NOTEKEEPER_MAX_BODY_BYTES", "1024"),
            ("NOTEKEEPER_BCRYPT_COST", "6"),
        ])
        .unwrap();
        assert_eq!(config.bind.port(), 9000);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.max_body_bytes, 1024);
        assert_eq!(config.password_cost, 6);
    }

    #[test]
    fn malformed_values_name_the_variable() {
        let err = load(&[("NOTEKEEPER_BIND", "nowhere")]).unwrap_err();
        assert!(err.to_string().starts_with("NOTEKEEPER_BIND"));

        let err = load(&[("NOTEKEEPER_BCRYPT_COST", "2")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: "NOTEKEEPER_BCRYPT_COST",
                ..
            }
        ));
    }
}
