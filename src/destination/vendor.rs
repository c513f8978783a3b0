//! destination::vendor
//!
//! Connection settings for a hosted issue tracker.
//!
//! A [`Vendor`] is built once per request from configuration and carries
//! everything an adapter needs: platform, owner, repository, credentials
//! and the API base URL. Missing or unusable settings are rejected here as
//! `ReportError::Configuration`, before any request is attempted.

use super::factory::{detect_platform, Platform};
use super::traits::ReportError;

/// Repository coordinates parsed from a web or SSH URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryUrl {
    /// Host name (e.g., "github.com")
    pub host: String,
    /// Owner, workspace or (nested) group
    pub owner: String,
    /// Repository name
    pub repository: String,
}

/// Parse a repository URL into host, owner and repository.
///
/// Supports both SSH and HTTPS formats:
/// - `git@github.com:owner/repo.git`
/// - `https://github.com/owner/repo.git`
/// - `https://gitlab.com/group/subgroup/project`
///
/// All path segments but the last form the owner, so GitLab nested groups
/// are kept intact.
///
/// # Example
///
/// ```
/// use reporter::destination::parse_repository_url;
///
/// let parsed = parse_repository_url("git@github.com:octocat/hello-world.git").unwrap();
/// assert_eq!(parsed.host, "github.com");
/// assert_eq!(parsed.owner, "octocat");
/// assert_eq!(parsed.repository, "hello-world");
/// ```
pub fn parse_repository_url(url: &str) -> Option<RepositoryUrl> {
    let url = url.trim();

    let (host, path) = if let Some(rest) = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
    {
        rest.split_once('/')?
    } else if let Some(rest) = url.strip_prefix("git@") {
        rest.split_once(':')?
    } else {
        return None;
    };

    // Drop credentials or ports from the authority part.
    let host = host.rsplit('@').next()?.split(':').next()?;
    if host.is_empty() {
        return None;
    }

    let path = path.trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let (owner, repository) = path.rsplit_once('/')?;
    if owner.is_empty() || repository.is_empty() || owner.split('/').any(str::is_empty) {
        return None;
    }

    Some(RepositoryUrl {
        host: host.to_lowercase(),
        owner: owner.to_string(),
        repository: repository.to_string(),
    })
}

/// Tracker connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct Vendor {
    platform: Platform,
    owner: String,
    repository: String,
    token: String,
    user: Option<String>,
    api_base: String,
}

// Custom Debug to avoid exposing the token
impl std::fmt::Debug for Vendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Vendor")
            .field("platform", &self.platform)
            .field("owner", &self.owner)
            .field("repository", &self.repository)
            .field("has_token", &!self.token.is_empty())
            .field("user", &self.user)
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl Vendor {
    /// Build settings for a known platform.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Configuration` if the token is empty, if the
    /// owner is a nested path on a platform other than GitLab, or if the
    /// platform is Bitbucket and no user is given.
    pub fn new(
        platform: Platform,
        owner: impl Into<String>,
        repository: impl Into<String>,
        token: impl Into<String>,
        user: Option<String>,
    ) -> Result<Self, ReportError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ReportError::Configuration(
                "option \"repository.token\" not defined".to_string(),
            ));
        }

        let owner = owner.into();
        if owner.contains('/') && platform != Platform::GitLab {
            return Err(ReportError::Configuration(format!(
                "repository url must be <host>/<owner>/<repository> for {}, got owner '{}'",
                platform, owner
            )));
        }

        let user = user.filter(|u| !u.trim().is_empty());
        if platform == Platform::Bitbucket && user.is_none() {
            return Err(ReportError::Configuration(
                "option \"repository.user\" is required for Bitbucket".to_string(),
            ));
        }

        Ok(Self {
            platform,
            owner,
            repository: repository.into(),
            token,
            user,
            api_base: platform.default_api_base().to_string(),
        })
    }

    /// Build settings from a repository URL.
    ///
    /// The platform is detected from the host unless `platform` overrides it.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Configuration` if the URL cannot be parsed, the
    /// host is not a supported platform, or credentials are missing.
    pub fn from_url(
        url: &str,
        token: impl Into<String>,
        user: Option<String>,
        platform: Option<Platform>,
    ) -> Result<Self, ReportError> {
        let parsed = parse_repository_url(url).ok_or_else(|| {
            ReportError::Configuration(format!(
                "could not parse repository url '{}'. \
                 Expected format: https://github.com/owner/repo",
                url
            ))
        })?;

        let platform = platform
            .or_else(|| detect_platform(&parsed.host))
            .ok_or_else(|| {
                ReportError::Configuration(format!(
                    "Your Platform is currently not supported: {}",
                    parsed.host
                ))
            })?;

        Self::new(platform, parsed.owner, parsed.repository, token, user)
    }

    /// Use a different API base (self-hosted instances, tests).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// The tracker platform.
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Repository owner, workspace or group.
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Access token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Account name for Basic auth.
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// API base URL without trailing slash.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// `owner/repository`, for messages.
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repository)
    }
}
