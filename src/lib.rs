//! Reporter - deliver issue reports to GitHub, GitLab, Bitbucket or email
//!
//! Reporter turns a submitted form (a title, a description and any number of
//! extra fields) into a report body and delivers it to the destination named
//! in the configuration: an issue on a hosted repository, or an email.
//!
//! # Architecture
//!
//! - [`core`] - Form model, placeholder expansion, templates and configuration
//! - [`destination`] - Report destinations (GitHub, GitLab, Bitbucket, mail)
//! - [`report`] - Report client: render the body and hand it to a destination
//! - [`api`] - Transport-agnostic request handlers (`/report`, `/report/preview`, `/fields`)
//! - [`cli`] - Command-line host for the handlers
//! - [`ui`] - Output and logging setup
//!
//! # Guarantees
//!
//! 1. A form without a title never reaches a destination
//! 2. Destination errors are passed through unchanged and mapped to one status each
//! 3. Credentials are never written to logs or `Debug` output

pub mod api;
pub mod cli;
pub mod core;
pub mod destination;
pub mod report;
pub mod ui;
