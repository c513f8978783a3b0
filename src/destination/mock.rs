//! destination::mock
//!
//! In-memory destination and mailer for deterministic testing.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use reporter::core::form::FormData;
//! use reporter::destination::mock::MockDestination;
//! use reporter::destination::ReportDestination;
//!
//! # tokio_test::block_on(async {
//! let destination = MockDestination::new();
//!
//! let mut raw = HashMap::new();
//! raw.insert("title".to_string(), "Bug".to_string());
//! let form = FormData::new(raw).unwrap();
//!
//! let response = destination.report(&form, "It crashes").await.unwrap();
//! assert_eq!(response.issue_id(), Some(1));
//! assert_eq!(destination.reports()[0].body, "It crashes");
//! # });
//! ```

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use super::mail::{MailMessage, Mailer, MailerError};
use super::traits::{ReportDestination, ReportError, ReportResponse};
use crate::core::form::FormData;

/// A report received by [`MockDestination`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedReport {
    /// Submitted title
    pub title: String,
    /// Rendered body
    pub body: String,
}

/// Mock destination for testing.
///
/// Creates sequentially numbered issues unless configured to fail. Clones
/// share state.
#[derive(Debug, Clone, Default)]
pub struct MockDestination {
    inner: Arc<Mutex<MockDestinationInner>>,
}

#[derive(Debug, Default)]
struct MockDestinationInner {
    reports: Vec<RecordedReport>,
    fail_with: Option<ReportError>,
}

impl MockDestination {
    /// Create a mock that succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that fails every report with `error`.
    pub fn failing(error: ReportError) -> Self {
        let mock = Self::new();
        mock.lock().fail_with = Some(error);
        mock
    }

    /// Reports received so far.
    pub fn reports(&self) -> Vec<RecordedReport> {
        self.lock().reports.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockDestinationInner> {
        // A panicking test thread must not hide the recorded calls.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ReportDestination for MockDestination {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn report(&self, form: &FormData, body: &str) -> Result<ReportResponse, ReportError> {
        let mut inner = self.lock();
        inner.reports.push(RecordedReport {
            title: form.title().to_string(),
            body: body.to_string(),
        });

        if let Some(err) = &inner.fail_with {
            return Err(err.clone());
        }

        let id = inner.reports.len() as u64;
        Ok(ReportResponse::issue(
            201,
            id,
            format!("https://tracker.test/issues/{}", id),
        ))
    }
}

/// Mailer that records messages instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct RecordingMailer {
    inner: Arc<Mutex<RecordingMailerInner>>,
}

#[derive(Debug, Default)]
struct RecordingMailerInner {
    sent: Vec<MailMessage>,
    fail_with: Option<MailerError>,
}

impl RecordingMailer {
    /// Create a mailer that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mailer that rejects every message with `error`.
    pub fn failing(error: MailerError) -> Self {
        let mailer = Self::new();
        mailer.lock().fail_with = Some(error);
        mailer
    }

    /// Messages passed to `send` so far, including rejected ones.
    pub fn sent(&self) -> Vec<MailMessage> {
        self.lock().sent.clone()
    }

    fn lock(&self) -> MutexGuard<'_, RecordingMailerInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailerError> {
        let mut inner = self.lock();
        inner.sent.push(message.clone());
        match &inner.fail_with {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}
