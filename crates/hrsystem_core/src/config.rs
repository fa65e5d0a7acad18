//! Runtime configuration for hosts embedding the HR core.
//!
//! Values come from environment variables; every field has a default so an
//! empty environment yields a working setup.

use crate::logging::{default_log_level, normalize_level};
use crate::model::policy::{IncrementPolicy, IncrementRule};
use crate::model::validation::ValidationError;
use crate::store::FileStore;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DB_PATH_ENV: &str = "HRSYSTEM_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "HRSYSTEM_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "HRSYSTEM_LOG_DIR";
pub const DEFAULT_POLICY_ENV: &str = "HRSYSTEM_DEFAULT_POLICY";
pub const POLICY_MODE_ENV: &str = "HRSYSTEM_POLICY_MODE";

const DEFAULT_DB_FILE_NAME: &str = "hrsystem.sqlite3";

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidLogLevel(String),
    RelativeLogDir(String),
    InvalidDefaultPolicy(ValidationError),
    InvalidPolicyMode(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(message) => write!(f, "{LOG_LEVEL_ENV}: {message}"),
            Self::RelativeLogDir(value) => {
                write!(f, "{LOG_DIR_ENV} must be an absolute path, got `{value}`")
            }
            Self::InvalidDefaultPolicy(err) => write!(f, "{DEFAULT_POLICY_ENV}: {err}"),
            Self::InvalidPolicyMode(value) => write!(
                f,
                "{POLICY_MODE_ENV} `{value}` is not recognized; expected per-employee|global"
            ),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidDefaultPolicy(err) => Some(err),
            _ => None,
        }
    }
}

/// Resolved host configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct HrConfig {
    /// Record store file.
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// File logging is off when `None`.
    pub log_dir: Option<PathBuf>,
    /// Policy selection for increment-due evaluation.
    pub increment_rule: IncrementRule,
}

impl Default for HrConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level(),
            log_dir: None,
            increment_rule: IncrementRule::default(),
        }
    }
}

impl HrConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(path) = read(DB_PATH_ENV) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = read(LOG_LEVEL_ENV) {
            config.log_level = normalize_level(&level).map_err(ConfigError::InvalidLogLevel)?;
        }
        if let Some(dir) = read(LOG_DIR_ENV) {
            let path = PathBuf::from(&dir);
            if !path.is_absolute() {
                return Err(ConfigError::RelativeLogDir(dir));
            }
            config.log_dir = Some(path);
        }

        let policy = match read(DEFAULT_POLICY_ENV) {
            Some(value) => value
                .parse::<IncrementPolicy>()
                .map_err(ConfigError::InvalidDefaultPolicy)?,
            None => IncrementPolicy::Yearly,
        };
        config.increment_rule = match read(POLICY_MODE_ENV).as_deref() {
            None | Some("per-employee") => IncrementRule::PerEmployee { fallback: policy },
            Some("global") => IncrementRule::Global(policy),
            Some(other) => return Err(ConfigError::InvalidPolicyMode(other.to_string())),
        };

        Ok(config)
    }

    /// File-backed record store at `db_path`.
    pub fn file_store(&self) -> FileStore {
        FileStore::new(self.db_path.clone())
    }
}
