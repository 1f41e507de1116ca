//! Planner runtime configuration.
//!
//! Resolution chain: environment variable > config file > default. The
//! config file path itself comes from `PLANBOARD_CONFIG`; without it only
//! defaults and variable overrides apply.

use crate::logging::{default_log_level, normalize_level};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_VAR: &str = "PLANBOARD_CONFIG";
pub const DB_PATH_VAR: &str = "PLANBOARD_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "PLANBOARD_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "PLANBOARD_LOG_DIR";

/// Database file used when nothing else is configured.
pub const DEFAULT_DB_FILE: &str = "planboard.sqlite3";

/// Errors while loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, message: String },
    InvalidLevel(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config file `{}`: {source}", path.display())
            }
            Self::Parse { path, message } => {
                write!(f, "failed to parse config file `{}`: {message}", path.display())
            }
            Self::InvalidLevel(level) => write!(f, "{level}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { .. } | Self::InvalidLevel(_) => None,
        }
    }
}

/// Settings shared by the CLI and any embedding host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub database_path: PathBuf,
    pub log_level: String,
    /// Rolling log directory; file logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(DEFAULT_DB_FILE),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl PlannerConfig {
    /// Parses TOML; missing fields take their defaults.
    pub fn from_toml_str(contents: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents).map_err(|err| ConfigError::Parse {
            path: origin.to_path_buf(),
            message: err.to_string(),
        })?;
        config.validated()
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents, path)
    }

    /// Builds the process configuration from `PLANBOARD_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let lookup = |name: &str| std::env::var(name).ok();
        let base = match lookup(CONFIG_PATH_VAR).filter(|value| !value.trim().is_empty()) {
            Some(path) => Self::load(Path::new(path.trim()))?,
            None => Self::default(),
        };
        base.with_overrides(lookup)
    }

    /// Applies variable overrides through `lookup`; blank values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        if let Some(path) = read(DB_PATH_VAR) {
            self.database_path = PathBuf::from(path);
        }
        if let Some(level) = read(LOG_LEVEL_VAR) {
            self.log_level = level;
        }
        if let Some(dir) = read(LOG_DIR_VAR) {
            self.log_dir = Some(PathBuf::from(dir));
        }
        self.validated()
    }

    fn validated(mut self) -> Result<Self, ConfigError> {
        self.log_level = normalize_level(&self.log_level)
            .map_err(|err| ConfigError::InvalidLevel(err.to_string()))?
            .to_string();
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, PlannerConfig, DB_PATH_VAR, LOG_DIR_VAR, LOG_LEVEL_VAR};
    use std::collections::HashMap;
    use std::io::Write;
    use std::path::{Path, PathBuf};

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config = PlannerConfig::from_toml_str("log_level = \"WARNING\"", Path::new("inline"))
            .unwrap();
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.database_path, PlannerConfig::default().database_path);
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn env_overrides_file_values() {
        let base = PlannerConfig::from_toml_str(
            "database_path = \"/srv/plan.db\"\nlog_level = \"info\"",
            Path::new("inline"),
        )
        .unwrap();
        let env = vars(&[
            (DB_PATH_VAR, "/tmp/override.db"),
            (LOG_LEVEL_VAR, " "),
            (LOG_DIR_VAR, "/var/log/planboard"),
        ]);
        let config = base.with_overrides(|name| env.get(name).cloned()).unwrap();

        assert_eq!(config.database_path, PathBuf::from("/tmp/override.db"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/planboard")));
    }

    #[test]
    fn unknown_level_is_rejected() {
        let env = vars(&[(LOG_LEVEL_VAR, "loud")]);
        let err = PlannerConfig::default()
            .with_overrides(|name| env.get(name).cloned())
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidLevel(_)));
    }

    #[test]
    fn load_reads_file_and_reports_parse_errors() {
        let mut good = tempfile::NamedTempFile::new().unwrap();
        writeln!(good, "database_path = \"meals.db\"").unwrap();
        let config = PlannerConfig::load(good.path()).unwrap();
        assert_eq!(config.database_path, PathBuf::from("meals.db"));

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        writeln!(bad, "database_path = [").unwrap();
        assert!(matches!(
            PlannerConfig::load(bad.path()).unwrap_err(),
            ConfigError::Parse { .. }
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = PlannerConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
