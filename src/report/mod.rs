//! report
//!
//! The report client: render the body, hand it to the destination.
//!
//! # Design
//!
//! `ReportClient` holds a destination chosen by the caller and the body
//! template. It keeps no per-call state, performs no retries and passes
//! destination errors through unchanged.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use reporter::core::form::FormData;
//! use reporter::core::template::Template;
//! use reporter::destination::mock::MockDestination;
//! use reporter::report::ReportClient;
//!
//! # tokio_test::block_on(async {
//! let client = ReportClient::new(
//!     Box::new(MockDestination::new()),
//!     Template::new("## {title}\n\n{description}"),
//! );
//!
//! let mut raw = HashMap::new();
//! raw.insert("title".to_string(), "Bug".to_string());
//! raw.insert("description".to_string(), "It crashes".to_string());
//!
//! let response = client.create_report(&FormData::new(raw).unwrap()).await.unwrap();
//! assert_eq!(response.status(), 201);
//! # });
//! ```

use crate::core::form::FormData;
use crate::core::template::Template;
use crate::destination::{ReportDestination, ReportError, ReportResponse};

/// Renders and delivers reports to one destination.
pub struct ReportClient {
    destination: Box<dyn ReportDestination>,
    template: Template,
}

impl std::fmt::Debug for ReportClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportClient")
            .field("destination", &self.destination.name())
            .field("template", &self.template)
            .finish()
    }
}

impl ReportClient {
    /// Create a client for `destination` using `template` for the body.
    pub fn new(destination: Box<dyn ReportDestination>, template: Template) -> Self {
        Self {
            destination,
            template,
        }
    }

    /// Name of the destination in use.
    pub fn destination_name(&self) -> &'static str {
        self.destination.name()
    }

    /// The body template.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Render the body for a form.
    pub fn render(&self, form: &FormData) -> String {
        self.template.render(form.fields())
    }

    /// Render the body and deliver it.
    ///
    /// # Errors
    ///
    /// Whatever the destination returns, unchanged.
    pub async fn create_report(&self, form: &FormData) -> Result<ReportResponse, ReportError> {
        let body = self.render(form);
        tracing::debug!(
            destination = self.destination.name(),
            bytes = body.len(),
            "delivering report"
        );

        match self.destination.report(form, &body).await {
            Ok(response) => {
                tracing::info!(
                    destination = self.destination.name(),
                    status = response.status(),
                    "report delivered"
                );
                Ok(response)
            }
            Err(err) => {
                tracing::warn!(destination = self.destination.name(), error = %err, "report failed");
                Err(err)
            }
        }
    }
}
