//! destination
//!
//! Places a report can be delivered to: hosted issue trackers (GitHub,
//! GitLab, Bitbucket) or email.
//!
//! # Architecture
//!
//! The `ReportDestination` trait is the one interface the rest of the crate
//! sees. Callers obtain a destination from [`create_destination`] rather
//! than constructing adapters directly.
//!
//! Each tracker adapter owns its own endpoint template, auth header and
//! response shape. Only status classification and the POST itself are
//! shared, through [`request`].
//!
//! # Modules
//!
//! - `traits`: `ReportDestination`, `ReportResponse` and `ReportError`
//! - [`request`]: HTTP helper shared by tracker adapters
//! - `vendor`: tracker connection settings and URL parsing
//! - [`github`], [`gitlab`], [`bitbucket`]: tracker adapters
//! - [`mail`]: email adapter and the `Mailer` collaborator
//! - [`mock`]: mock destination and mailer for deterministic testing
//! - `factory`: destination selection from configuration

pub mod bitbucket;
mod factory;
pub mod github;
pub mod gitlab;
pub mod mail;
pub mod mock;
pub mod request;
mod traits;
mod vendor;

pub use factory::{
    create_destination, create_destination_with_mailer, create_for_vendor, detect_platform,
    valid_platform_names, Platform,
};
pub use mail::{ContentType, MailMessage, MailReport, MailTransport, Mailer, MailerError};
pub use request::RequestHelper;
pub use traits::*;
pub use vendor::{parse_repository_url, RepositoryUrl, Vendor};
