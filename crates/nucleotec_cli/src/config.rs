//! Configuration management for the CLI.

use crate::cli::CliFormat;
use crate::error::{CliError, Result};
use nucleotec_core::{default_log_level, ReconcileMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration, read from an optional TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// SQLite database file
    pub database_path: PathBuf,

    /// trace|debug|info|warn|error
    pub log_level: String,

    /// Rolling log directory; relative paths resolve against the working directory
    pub log_dir: PathBuf,

    /// How `assoc set` treats row failures unless `--atomic` is given
    pub reconcile_mode: ReconcileMode,

    /// Default output format
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl From<CliFormat> for OutputFormat {
    fn from(value: CliFormat) -> Self {
        match value {
            CliFormat::Table => Self::Table,
            CliFormat::Json => Self::Json,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("nucleotec.sqlite3"),
            log_level: default_log_level().to_string(),
            log_dir: PathBuf::from("logs"),
            reconcile_mode: ReconcileMode::default(),
            format: OutputFormat::default(),
        }
    }
}

impl Config {
    /// Loads configuration from `path`; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents)
            .map_err(|err| CliError::Config(format!("{}: {err}", path.display())))
    }

    /// Returns `log_dir` as an absolute path.
    pub fn absolute_log_dir(&self, cwd: &Path) -> PathBuf {
        if self.log_dir.is_absolute() {
            self.log_dir.clone()
        } else {
            cwd.join(&self.log_dir)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("absent.toml")).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.database_path, PathBuf::from("nucleotec.sqlite3"));
        assert_eq!(config.reconcile_mode, ReconcileMode::BestEffort);
        assert_eq!(config.format, OutputFormat::Table);
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nucleotec.toml");
        fs::write(
            &path,
            "database_path = \"/srv/nucleo.db\"\nreconcile_mode = \"atomic\"\nformat = \"json\"\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.database_path, PathBuf::from("/srv/nucleo.db"));
        assert_eq!(config.reconcile_mode, ReconcileMode::Atomic);
        assert_eq!(config.format, OutputFormat::Json);
        assert_eq!(config.log_dir, PathBuf::from("logs"));
    }

    #[test]
    fn unknown_keys_and_bad_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nucleotec.toml");

        fs::write(&path, "database = \"x.db\"\n").unwrap();
        assert!(matches!(Config::load(&path), Err(CliError::Config(_))));

        fs::write(&path, "reconcile_mode = \"sometimes\"\n").unwrap();
        assert!(matches!(Config::load(&path), Err(CliError::Config(_))));
    }

    #[test]
    fn relative_log_dir_resolves_against_cwd() {
        let config = Config::default();
        let cwd = Path::new("/work/registry");
        assert_eq!(
            config.absolute_log_dir(cwd),
            PathBuf::from("/work/registry/logs")
        );

        let config = Config {
            log_dir: PathBuf::from("/var/log/nucleotec"),
            ..Config::default()
        };
        assert_eq!(
            config.absolute_log_dir(cwd),
            PathBuf::from("/var/log/nucleotec")
        );
    }
}
