//! destination::traits
//!
//! The `ReportDestination` capability and its request/response types.
//!
//! # Design
//!
//! The trait is async because delivery involves network or process I/O.
//! Each call performs exactly one outbound attempt; failures are returned
//! to the caller and never retried here.
//!
//! # Example
//!
//! ```no_run
//! use reporter::core::form::FormData;
//! use reporter::destination::{ReportDestination, ReportError};
//!
//! async fn deliver(dest: &dyn ReportDestination, form: &FormData) -> Result<(), ReportError> {
//!     let response = dest.report(form, "It crashes").await?;
//!     if let Some(url) = response.issue_url() {
//!         println!("Created {}", url);
//!     }
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::core::form::{FormData, FormError};

/// Errors from report delivery.
///
/// Each variant maps to one failure kind surfaced to the reporter; the
/// boundary turns them into HTTP status codes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReportError {
    /// The submission is malformed or incomplete.
    #[error("{0}")]
    Validation(String),

    /// The vendor rejected the credentials (401/403).
    #[error("Authentication failed. Please check your \"Personal Access Token\". ({0})")]
    AuthenticationFailed(String),

    /// The repository or endpoint does not exist (404).
    #[error("Repository not found. ({0})")]
    RepositoryNotFound(String),

    /// Any other non-success vendor status.
    #[error("vendor request failed: {status} - {body}")]
    VendorRequest {
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The vendor answered with an unexpected body.
    #[error("unexpected vendor response: {0}")]
    VendorResponse(String),

    /// The request never completed (DNS, connect, TLS, timeout).
    #[error("network error: {0}")]
    Transport(String),

    /// The mail collaborator failed to send.
    #[error("mail delivery failed: {0}")]
    Delivery(String),

    /// Required destination settings are missing or unsupported.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<FormError> for ReportError {
    fn from(err: FormError) -> Self {
        ReportError::Validation(err.to_string())
    }
}

/// Identifier and web URL of a created issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRef {
    /// Vendor issue number
    pub id: u64,
    /// Browser URL of the issue
    pub url: String,
}

/// Result of a successful delivery.
///
/// Tracker destinations carry an [`IssueRef`]; mail does not. Keeping both
/// values in one optional struct means they are always present together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportResponse {
    status: u16,
    issue: Option<IssueRef>,
}

impl ReportResponse {
    /// Response for a created tracker issue.
    pub fn issue(status: u16, id: u64, url: impl Into<String>) -> Self {
        Self {
            status,
            issue: Some(IssueRef {
                id,
                url: url.into(),
            }),
        }
    }

    /// Response for a delivery that creates no issue (mail).
    pub fn delivered() -> Self {
        Self {
            status: 200,
            issue: None,
        }
    }

    /// Transport-level status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Created issue number, if any.
    pub fn issue_id(&self) -> Option<u64> {
        self.issue.as_ref().map(|i| i.id)
    }

    /// Created issue URL, if any.
    pub fn issue_url(&self) -> Option<&str> {
        self.issue.as_ref().map(|i| i.url.as_str())
    }
}

impl Serialize for ReportResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Wire<'a> {
            status: u16,
            issue_url: Option<&'a str>,
            issue_id: Option<u64>,
        }

        Wire {
            status: self.status,
            issue_url: self.issue_url(),
            issue_id: self.issue_id(),
        }
        .serialize(serializer)
    }
}

/// A place reports can be delivered to.
///
/// Implementations must be `Send + Sync` so one instance can serve many
/// requests from async tasks.
#[async_trait]
pub trait ReportDestination: Send + Sync {
    /// Destination name (e.g., "github", "mail").
    fn name(&self) -> &'static str;

    /// Deliver one report.
    ///
    /// # Arguments
    ///
    /// * `form` - The validated submission (provides the title)
    /// * `body` - The rendered report body
    ///
    /// # Errors
    ///
    /// Any [`ReportError`] except `Validation`, which is raised before a
    /// destination is reached.
    async fn report(&self, form: &FormData, body: &str) -> Result<ReportResponse, ReportError>;
}
