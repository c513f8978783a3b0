//! destination::mail
//!
//! Report delivery by email.
//!
//! # Design
//!
//! [`MailReport`] composes a [`MailMessage`] and hands it to a [`Mailer`],
//! the narrow collaborator that actually transmits mail. The default
//! [`SendmailMailer`] pipes an RFC 5322 message into a sendmail-compatible
//! program; hosts and tests may inject any other implementation.
//!
//! The subject is a template expanded with the form fields, so
//! `"[Report] {title}"` yields `"[Report] Crash on save"`.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::traits::{ReportDestination, ReportError, ReportResponse};
use crate::core::config::MailConfig;
use crate::core::expand::expand;
use crate::core::form::FormData;

/// Subject used when none is configured.
pub const DEFAULT_SUBJECT: &str = "{title}";

/// Default sendmail location.
const DEFAULT_SENDMAIL: &str = "/usr/sbin/sendmail";

/// Body format of the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentType {
    /// `text/html`
    Html,
    /// `text/plain`
    #[default]
    Text,
}

impl ContentType {
    /// Parse the configured `type` value.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "html" => Some(ContentType::Html),
            "text" => Some(ContentType::Text),
            _ => None,
        }
    }

    /// MIME type for the `Content-Type` header.
    pub fn mime(&self) -> &'static str {
        match self {
            ContentType::Html => "text/html",
            ContentType::Text => "text/plain",
        }
    }
}

/// Email delivery settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailTransport {
    from: String,
    to: String,
    subject: String,
    content_type: ContentType,
}

impl MailTransport {
    /// Create settings with the default subject and plain text body.
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            subject: DEFAULT_SUBJECT.to_string(),
            content_type: ContentType::default(),
        }
    }

    /// Set the subject template.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Set the body format.
    pub fn with_content_type(mut self, content_type: ContentType) -> Self {
        self.content_type = content_type;
        self
    }

    /// Build settings from the `[mail]` section.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Configuration` if sender or recipient is missing
    /// or the type is unknown.
    pub fn from_config(config: &MailConfig) -> Result<Self, ReportError> {
        let required = |name: &str, value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .ok_or_else(|| {
                    ReportError::Configuration(format!("option \"{}\" not defined", name))
                })
        };

        let mut transport = Self::new(
            required("mail.from", &config.from)?,
            required("mail.to", &config.to)?,
        );

        if let Some(subject) = config.subject.as_deref().filter(|s| !s.trim().is_empty()) {
            transport = transport.with_subject(subject);
        }

        if let Some(kind) = &config.content_type {
            let content_type = ContentType::parse(kind).ok_or_else(|| {
                ReportError::Configuration(format!("invalid mail type '{}'", kind))
            })?;
            transport = transport.with_content_type(content_type);
        }

        Ok(transport)
    }

    /// Sender address.
    pub fn from(&self) -> &str {
        &self.from
    }

    /// Recipient address.
    pub fn to(&self) -> &str {
        &self.to
    }

    /// Subject template.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Body format.
    pub fn content_type(&self) -> ContentType {
        self.content_type
    }
}

/// A composed email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    /// Sender address
    pub from: String,
    /// Recipient address
    pub to: String,
    /// Expanded subject
    pub subject: String,
    /// Body format
    pub content_type: ContentType,
    /// Rendered report body
    pub body: String,
}

impl MailMessage {
    /// Serialize as an RFC 5322 message with a UTF-8 body.
    ///
    /// Header values are stripped of line breaks so form input cannot add
    /// headers.
    pub fn to_rfc5322(&self) -> String {
        format!(
            "From: {}\r\nTo: {}\r\nSubject: {}\r\nDate: {}\r\nMIME-Version: 1.0\r\n\
             Content-Type: {}; charset=utf-8\r\nContent-Transfer-Encoding: 8bit\r\n\r\n{}\r\n",
            header_safe(&self.from),
            header_safe(&self.to),
            header_safe(&self.subject),
            chrono::Utc::now().to_rfc2822(),
            self.content_type.mime(),
            self.body.replace("\r\n", "\n").replace('\n', "\r\n"),
        )
    }
}

/// Collapse line breaks in a header value.
fn header_safe(value: &str) -> String {
    value
        .split(['\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Errors from a mail collaborator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MailerError {
    #[error("failed to run '{program}': {message}")]
    Spawn { program: String, message: String },

    #[error("'{program}' exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("timed out after {0:?}")]
    TimedOut(Duration),

    #[error("{0}")]
    Other(String),
}

impl From<MailerError> for ReportError {
    fn from(err: MailerError) -> Self {
        ReportError::Delivery(err.to_string())
    }
}

/// Sends composed messages.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send one message. Called exactly once per report.
    async fn send(&self, message: &MailMessage) -> Result<(), MailerError>;
}

/// Delivers through a sendmail-compatible program (`sendmail -t -i`).
#[derive(Debug, Clone)]
pub struct SendmailMailer {
    program: PathBuf,
    timeout: Option<Duration>,
}

impl Default for SendmailMailer {
    fn default() -> Self {
        Self::with_program(DEFAULT_SENDMAIL)
    }
}

impl SendmailMailer {
    /// Use a specific program.
    pub fn with_program(program: impl AsRef<Path>) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            timeout: None,
        }
    }

    /// Abort sending after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    async fn run(&self, message: &MailMessage) -> Result<(), MailerError> {
        let program = self.program.display().to_string();
        let spawn_error = |e: std::io::Error| MailerError::Spawn {
            program: program.clone(),
            message: e.to_string(),
        };

        let mut child = Command::new(&self.program)
            .args(["-t", "-i"])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(spawn_error)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(message.to_rfc5322().as_bytes())
                .await
                .map_err(spawn_error)?;
            // Dropping stdin closes the pipe so sendmail sees EOF.
        }

        let output = child.wait_with_output().await.map_err(spawn_error)?;
        if output.status.success() {
            Ok(())
        } else {
            Err(MailerError::Failed {
                program,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

#[async_trait]
impl Mailer for SendmailMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailerError> {
        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.run(message))
                .await
                .map_err(|_| MailerError::TimedOut(timeout))?,
            None => self.run(message).await,
        }
    }
}

/// Email destination.
pub struct MailReport {
    transport: MailTransport,
    mailer: Arc<dyn Mailer>,
}

impl std::fmt::Debug for MailReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailReport")
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

impl MailReport {
    /// Create a mail destination.
    pub fn new(transport: MailTransport, mailer: Arc<dyn Mailer>) -> Self {
        Self { transport, mailer }
    }

    /// Compose the message for a report.
    pub fn compose(&self, form: &FormData, body: &str) -> MailMessage {
        MailMessage {
            from: self.transport.from.clone(),
            to: self.transport.to.clone(),
            subject: expand(&self.transport.subject, form.fields()),
            content_type: self.transport.content_type,
            body: body.to_string(),
        }
    }
}

#[async_trait]
impl ReportDestination for MailReport {
    fn name(&self) -> &'static str {
        "mail"
    }

    async fn report(&self, form: &FormData, body: &str) -> Result<ReportResponse, ReportError> {
        let message = self.compose(form, body);
        self.mailer.send(&message).await?;
        tracing::info!(to = %message.to, "sent report mail");
        Ok(ReportResponse::delivered())
    }
}
