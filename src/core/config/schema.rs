//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Example
//!
//! ```toml
//! enabled = true
//! template = "report.md"
//! fields = "reporter.yml"
//! timeout_secs = 30
//!
//! [repository]
//! url = "https://github.com/owner/repo"
//! token = "ghp_xxx"
//! ```
//!
//! or, for email delivery:
//!
//! ```toml
//! [mail]
//! from = "site@example.com"
//! to = "support@example.com"
//! subject = "[Report] {title}"
//! type = "html"
//! ```
//!
//! # Validation
//!
//! Exactly one of `[repository]` and `[mail]` must be present. Values are
//! checked after parsing; credentials are checked again when the
//! destination is built.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::destination::{ContentType, Platform};

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ReporterConfig {
    /// Master switch (default: enabled)
    pub enabled: Option<bool>,

    /// Report body template file
    pub template: Option<PathBuf>,

    /// Form field blueprint file (YAML)
    pub fields: Option<PathBuf>,

    /// Timeout for the outbound call, in seconds
    pub timeout_secs: Option<u64>,

    /// Issue tracker destination
    pub repository: Option<RepositoryConfig>,

    /// Email destination
    pub mail: Option<MailConfig>,
}

impl ReporterConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match (&self.repository, &self.mail) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::InvalidValue(
                    "configure either [repository] or [mail], not both".to_string(),
                ))
            }
            (Some(repo), None) => repo.validate()?,
            (None, Some(mail)) => mail.validate()?,
            (None, None) => {}
        }

        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Issue tracker settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RepositoryConfig {
    /// Web URL of the repository, e.g. `https://github.com/owner/repo`
    pub url: Option<String>,

    /// Access token (falls back to `$REPORTER_TOKEN`)
    pub token: Option<String>,

    /// Account name for Basic auth (Bitbucket)
    pub user: Option<String>,

    /// Platform override for self-hosted instances
    pub platform: Option<String>,

    /// API base URL override
    pub api_base: Option<String>,
}

impl RepositoryConfig {
    /// Validate the repository settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.url.as_deref() {
            Some(url) if !url.trim().is_empty() => {}
            _ => {
                return Err(ConfigError::InvalidValue(
                    "option \"repository.url\" not defined".to_string(),
                ))
            }
        }

        if let Some(platform) = &self.platform {
            if Platform::parse(platform).is_none() {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid platform '{}', must be one of: {}",
                    platform,
                    crate::destination::valid_platform_names().join(", ")
                )));
            }
        }

        Ok(())
    }
}

/// Email settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MailConfig {
    /// Sender address
    pub from: Option<String>,

    /// Recipient address
    pub to: Option<String>,

    /// Subject template; may reference form fields
    pub subject: Option<String>,

    /// "html" or "text"
    #[serde(rename = "type")]
    pub content_type: Option<String>,

    /// Path to a sendmail-compatible program
    pub sendmail: Option<PathBuf>,
}

impl MailConfig {
    /// Validate the email settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [("mail.from", &self.from), ("mail.to", &self.to)] {
            match value.as_deref() {
                Some(v) if !v.trim().is_empty() => {}
                _ => {
                    return Err(ConfigError::InvalidValue(format!(
                        "option \"{}\" not defined",
                        name
                    )))
                }
            }
        }

        if let Some(kind) = &self.content_type {
            if ContentType::parse(kind).is_none() {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid mail type '{}', must be one of: html, text",
                    kind
                )));
            }
        }

        Ok(())
    }
}
