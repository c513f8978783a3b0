//! destination::factory
//!
//! Destination selection and creation.
//!
//! # Design
//!
//! Callers use [`create_destination`] instead of importing specific
//! adapters. The choice between tracker and mail is made once, here, from
//! the loaded configuration.
//!
//! # Platform Detection
//!
//! The tracker platform is detected from the repository URL host:
//! - `github.com` → [`GitHubReport`]
//! - `gitlab.com` → [`GitLabReport`]
//! - `bitbucket.org` → [`BitbucketReport`]
//!
//! Self-hosted instances set `platform` (and usually `api_base`) explicitly.
//!
//! # Example
//!
//! ```no_run
//! use reporter::core::config::Config;
//! use reporter::destination::create_destination;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(None)?;
//!     let destination = create_destination(&config)?;
//!     println!("reporting to {}", destination.name());
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use super::bitbucket::BitbucketReport;
use super::github::GitHubReport;
use super::gitlab::GitLabReport;
use super::mail::{MailReport, MailTransport, Mailer, SendmailMailer};
use super::request::RequestHelper;
use super::traits::{ReportDestination, ReportError};
use super::vendor::Vendor;
use crate::core::config::{Config, RepositoryConfig};

/// Supported tracker platforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// GitHub
    GitHub,
    /// GitLab
    GitLab,
    /// Bitbucket Cloud
    Bitbucket,
}

impl Platform {
    /// Get all supported platforms.
    ///
    /// # Example
    ///
    /// ```
    /// use reporter::destination::Platform;
    ///
    /// assert!(Platform::all().contains(&Platform::Bitbucket));
    /// ```
    pub fn all() -> &'static [Platform] {
        &[Platform::GitHub, Platform::GitLab, Platform::Bitbucket]
    }

    /// Get the platform name as a string.
    ///
    /// This matches the name used in configuration files.
    pub fn name(&self) -> &'static str {
        match self {
            Platform::GitHub => "github",
            Platform::GitLab => "gitlab",
            Platform::Bitbucket => "bitbucket",
        }
    }

    /// Public host of the platform.
    pub fn host(&self) -> &'static str {
        match self {
            Platform::GitHub => "github.com",
            Platform::GitLab => "gitlab.com",
            Platform::Bitbucket => "bitbucket.org",
        }
    }

    /// API base URL of the public instance.
    pub fn default_api_base(&self) -> &'static str {
        match self {
            Platform::GitHub => "https://api.github.com",
            Platform::GitLab => "https://gitlab.com/api/v4",
            Platform::Bitbucket => "https://api.bitbucket.org/2.0",
        }
    }

    /// Parse a platform from a string.
    ///
    /// # Example
    ///
    /// ```
    /// use reporter::destination::Platform;
    ///
    /// assert_eq!(Platform::parse("GitHub"), Some(Platform::GitHub));
    /// assert_eq!(Platform::parse("gitea"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "github" => Some(Platform::GitHub),
            "gitlab" => Some(Platform::GitLab),
            "bitbucket" => Some(Platform::Bitbucket),
            _ => None,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Detect the platform from a repository host name.
///
/// Subdomains such as `www.github.com` are accepted.
pub fn detect_platform(host: &str) -> Option<Platform> {
    let host = host.trim().to_lowercase();
    Platform::all().iter().copied().find(|p| {
        host == p.host()
            || host
                .strip_suffix(p.host())
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

/// Get list of valid platform names for configuration validation.
pub fn valid_platform_names() -> Vec<&'static str> {
    Platform::all().iter().map(Platform::name).collect()
}

/// Create the configured destination.
///
/// Mail destinations deliver through a sendmail-compatible program.
///
/// # Errors
///
/// Returns `ReportError::Configuration` if no destination is configured or
/// its settings are incomplete.
pub fn create_destination(config: &Config) -> Result<Box<dyn ReportDestination>, ReportError> {
    let mailer = config.mail().map(|mail| {
        let mut sendmail = match &mail.sendmail {
            Some(program) => SendmailMailer::with_program(program),
            None => SendmailMailer::default(),
        };
        if let Some(timeout) = config.timeout() {
            sendmail = sendmail.with_timeout(timeout);
        }
        Arc::new(sendmail) as Arc<dyn Mailer>
    });

    match mailer {
        Some(mailer) => create_destination_with_mailer(config, mailer),
        None => create_tracker(config),
    }
}

/// Create the configured destination with an injected mail collaborator.
///
/// The mailer is only used when the configuration targets email.
pub fn create_destination_with_mailer(
    config: &Config,
    mailer: Arc<dyn Mailer>,
) -> Result<Box<dyn ReportDestination>, ReportError> {
    if let Some(mail) = config.mail() {
        let transport = MailTransport::from_config(mail)?;
        tracing::debug!(to = %transport.to(), "using mail destination");
        return Ok(Box::new(MailReport::new(transport, mailer)));
    }

    create_tracker(config)
}

/// Create the tracker adapter for `[repository]`.
fn create_tracker(config: &Config) -> Result<Box<dyn ReportDestination>, ReportError> {
    let repo = config.repository().ok_or_else(|| {
        ReportError::Configuration(
            "no destination configured: add a [repository] or [mail] section".to_string(),
        )
    })?;

    let vendor = vendor_from_config(repo, config.repository_token())?;
    let http = RequestHelper::new(config.timeout())?;
    tracing::debug!(platform = %vendor.platform(), repository = %vendor.slug(), "using tracker destination");

    Ok(create_for_vendor(vendor, http))
}

/// Build vendor settings from the `[repository]` section.
fn vendor_from_config(
    repo: &RepositoryConfig,
    token: Option<String>,
) -> Result<Vendor, ReportError> {
    let url = repo.url.as_deref().ok_or_else(|| {
        ReportError::Configuration("option \"repository.url\" not defined".to_string())
    })?;
    let token = token.ok_or_else(|| {
        ReportError::Configuration("option \"repository.token\" not defined".to_string())
    })?;

    let platform = match repo.platform.as_deref() {
        Some(name) => Some(Platform::parse(name).ok_or_else(|| {
            ReportError::Configuration(format!(
                "Unknown platform '{}'. Available platforms: {}",
                name,
                valid_platform_names().join(", ")
            ))
        })?),
        None => None,
    };

    let vendor = Vendor::from_url(url, token, repo.user.clone(), platform)?;
    Ok(match repo.api_base.as_deref() {
        Some(api_base) => vendor.with_api_base(api_base),
        None => vendor,
    })
}

/// Create the adapter matching the vendor's platform.
pub fn create_for_vendor(vendor: Vendor, http: RequestHelper) -> Box<dyn ReportDestination> {
    match vendor.platform() {
        Platform::GitHub => Box::new(GitHubReport::new(vendor, http)),
        Platform::GitLab => Box::new(GitLabReport::new(vendor, http)),
        Platform::Bitbucket => Box::new(BitbucketReport::new(vendor, http)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{MailConfig, ReporterConfig};
    use crate::destination::mock::RecordingMailer;

    fn repository(url: &str) -> RepositoryConfig {
        RepositoryConfig {
            url: Some(url.to_string()),
            token: Some("token".to_string()),
            ..Default::default()
        }
    }

    fn config_with(repository: Option<RepositoryConfig>, mail: Option<MailConfig>) -> Config {
        Config::from_parts(ReporterConfig {
            repository,
            mail,
            ..Default::default()
        })
        .unwrap()
    }

    mod platform {
        use super::*;

        #[test]
        fn names_roundtrip() {
            for platform in Platform::all() {
                assert_eq!(Platform::parse(platform.name()), Some(*platform));
                assert_eq!(platform.to_string(), platform.name());
            }
        }

        #[test]
        fn detect_hosts() {
            assert_eq!(detect_platform("github.com"), Some(Platform::GitHub));
            assert_eq!(detect_platform("www.github.com"), Some(Platform::GitHub));
            assert_eq!(detect_platform("gitlab.com"), Some(Platform::GitLab));
            assert_eq!(detect_platform("bitbucket.org"), Some(Platform::Bitbucket));
            assert_eq!(detect_platform("notgithub.com"), None);
            assert_eq!(detect_platform("git.example.com"), None);
        }

        #[test]
        fn valid_names() {
            assert_eq!(valid_platform_names(), vec!["github", "gitlab", "bitbucket"]);
        }
    }

    mod create {
        use super::*;

        #[test]
        fn selects_each_platform() {
            for (url, name) in [
                ("https://github.com/o/r", "github"),
                ("https://gitlab.com/o/r", "gitlab"),
            ] {
                let dest = create_destination(&config_with(Some(repository(url)), None)).unwrap();
                assert_eq!(dest.name(), name);
            }

            let bitbucket = RepositoryConfig {
                user: Some("me".to_string()),
                ..repository("https://bitbucket.org/o/r")
            };
            let dest = create_destination(&config_with(Some(bitbucket), None)).unwrap();
            assert_eq!(dest.name(), "bitbucket");
        }

        #[test]
        fn platform_override() {
            let repo = RepositoryConfig {
                platform: Some("gitlab".to_string()),
                api_base: Some("https://git.example.com/api/v4".to_string()),
                ..repository("https://git.example.com/o/r")
            };
            let dest = create_destination(&config_with(Some(repo), None)).unwrap();
            assert_eq!(dest.name(), "gitlab");
        }

        #[test]
        fn mail_uses_injected_mailer() {
            let mail = MailConfig {
                from: Some("a@example.com".to_string()),
                to: Some("b@example.com".to_string()),
                ..Default::default()
            };
            let dest = create_destination_with_mailer(
                &config_with(None, Some(mail)),
                Arc::new(RecordingMailer::new()),
            )
            .unwrap();
            assert_eq!(dest.name(), "mail");
        }

        #[test]
        fn nothing_configured() {
            let result = create_destination(&Config::default());
            assert!(matches!(result, Err(ReportError::Configuration(_))));
        }

        #[test]
        fn unsupported_host() {
            let result =
                create_destination(&config_with(Some(repository("https://gitea.io/o/r")), None));
            assert!(matches!(result, Err(ReportError::Configuration(_))));
        }
    }
}
