//! core::config
//!
//! Configuration schema and loading.
//!
//! # Config Locations
//!
//! Searched in order:
//! 1. An explicit path (the `--config` flag)
//! 2. `$REPORTER_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/reporter/config.toml`
//! 4. `~/.reporter/config.toml`
//!
//! Relative `template` and `fields` paths are resolved against the
//! directory of the file they were read from.
//!
//! # Example
//!
//! ```no_run
//! use reporter::core::config::Config;
//!
//! let config = Config::load(None).unwrap();
//! if config.enabled() {
//!     let template = config.template().unwrap();
//!     println!("{}", template.raw());
//! }
//! ```

pub mod schema;

pub use schema::{MailConfig, RepositoryConfig, ReporterConfig};

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

use crate::core::template::Template;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "REPORTER_CONFIG";

/// Environment variable holding the access token.
pub const TOKEN_ENV: &str = "REPORTER_TOKEN";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed file contents
    pub file: ReporterConfig,
    /// Path the file was loaded from
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from an explicit path or the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit path does not exist, or if a config
    /// file exists but cannot be parsed or validated. Missing default
    /// files are not an error (defaults are used).
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::from_file(path);
        }

        match Self::locate() {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Find the first existing config file in the default locations.
    fn locate() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("reporter/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        dirs::home_dir()
            .map(|home| home.join(".reporter/config.toml"))
            .filter(|path| path.exists())
    }

    /// Read, parse and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: ReporterConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        file.validate()?;

        Ok(Self {
            file,
            path: Some(path.to_path_buf()),
        })
    }

    /// Build from already-parsed contents (no file on disk).
    pub fn from_parts(file: ReporterConfig) -> Result<Self, ConfigError> {
        file.validate()?;
        Ok(Self { file, path: None })
    }

    /// Resolve a configured path against the config file's directory.
    fn resolve(&self, path: &Path) -> PathBuf {
        match self.path.as_deref().and_then(Path::parent) {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Whether reporting is switched on.
    ///
    /// Defaults to `true` if not configured.
    pub fn enabled(&self) -> bool {
        self.file.enabled.unwrap_or(true)
    }

    /// Load the report body template.
    ///
    /// Falls back to the built-in template if none is configured.
    pub fn template(&self) -> Result<Template, ConfigError> {
        match &self.file.template {
            Some(path) => {
                let path = self.resolve(path);
                Template::load(&path).map_err(|e| ConfigError::ReadError { path, source: e })
            }
            None => Ok(Template::default()),
        }
    }

    /// Path of the form field blueprint, if configured.
    pub fn fields_path(&self) -> Option<PathBuf> {
        self.file.fields.as_deref().map(|p| self.resolve(p))
    }

    /// Timeout for the outbound call, if configured.
    pub fn timeout(&self) -> Option<Duration> {
        self.file.timeout_secs.map(Duration::from_secs)
    }

    /// Issue tracker settings, if this config targets one.
    pub fn repository(&self) -> Option<&RepositoryConfig> {
        self.file.repository.as_ref()
    }

    /// Email settings, if this config targets email.
    pub fn mail(&self) -> Option<&MailConfig> {
        self.file.mail.as_ref()
    }

    /// Repository token, falling back to `$REPORTER_TOKEN`.
    pub fn repository_token(&self) -> Option<String> {
        self.repository()
            .and_then(|r| r.token.clone())
            .or_else(|| std::env::var(TOKEN_ENV).ok())
            .filter(|t| !t.trim().is_empty())
    }

    /// Get the path the config was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_file() {
        let config = Config::default();
        assert!(config.enabled());
        assert!(config.repository().is_none());
        assert!(config.mail().is_none());
        assert!(config.timeout().is_none());
        assert_eq!(config.template().unwrap(), Template::default());
    }

    #[test]
    fn load_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
            timeout_secs = 5

            [repository]
            url = "https://github.com/owner/repo"
            token = "ghp_xxx"
            "#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.loaded_from(), Some(path.as_path()));
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(config.repository_token().as_deref(), Some("ghp_xxx"));
    }

    #[test]
    fn missing_explicit_path_is_error() {
        let temp = TempDir::new().unwrap();
        let result = Config::load(Some(&temp.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn relative_paths_resolve_against_config_dir() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("report.md"), "# {title}\n").unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
            template = "report.md"
            fields = "blueprints/reporter.yml"
            "#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.template().unwrap().raw(), "# {title}\n");
        assert_eq!(
            config.fields_path(),
            Some(temp.path().join("blueprints/reporter.yml"))
        );
    }

    #[test]
    fn missing_template_file_is_error() {
        let config = Config::from_parts(ReporterConfig {
            template: Some(PathBuf::from("/nonexistent/report.md")),
            ..Default::default()
        })
        .unwrap();
        assert!(matches!(
            config.template(),
            Err(ConfigError::ReadError { .. })
        ));
    }

    #[test]
    fn disabled_switch() {
        let config = Config::from_parts(ReporterConfig {
            enabled: Some(false),
            ..Default::default()
        })
        .unwrap();
        assert!(!config.enabled());
    }

    #[test]
    fn parse_error_names_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "enabled = [").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn invalid_values_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
            [mail]
            from = "a@example.com"
            "#,
        )
        .unwrap();

        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::InvalidValue(_))
        ));
    }
}
