//! api
//!
//! The boundary the host calls into.
//!
//! # Routes
//!
//! | Method | Path              | Success                         |
//! |--------|-------------------|---------------------------------|
//! | POST   | `/report`         | 200/201 + `ReportResponse` JSON |
//! | POST   | `/report/preview` | 200 + rendered body, or 204     |
//! | GET    | `/fields`         | 200 + field definitions         |
//!
//! Handlers are transport-agnostic: they take a decoded request and return
//! an [`ApiResponse`] with a status code and an optional JSON body. Any
//! HTTP server (or the bundled CLI) can sit in front of them.
//!
//! # Errors
//!
//! Failures are answered with a JSON string message and a status that
//! mirrors the failure kind; see [`status_for`].
//!
//! # Lifecycle
//!
//! The destination is built afresh for every `/report` call, after the
//! form has been validated. An invalid form never reaches the network.

pub mod fields;

pub use fields::FieldSchema;

use serde_json::Value;

use crate::core::config::{Config, ConfigError};
use crate::core::form::{fields_from_json, FormData};
use crate::core::template::Template;
use crate::destination::{create_destination, ReportDestination, ReportError};
use crate::report::ReportClient;

/// Builds the destination for one report.
pub type DestinationFactory =
    Box<dyn Fn() -> Result<Box<dyn ReportDestination>, ReportError> + Send + Sync>;

/// Status and JSON body returned to the host.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// JSON body; `None` for 204
    pub body: Option<Value>,
}

impl ApiResponse {
    /// A JSON response.
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    /// An empty 204 response.
    pub fn no_content() -> Self {
        Self {
            status: 204,
            body: None,
        }
    }

    /// A failure carrying a single message string.
    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self::json(status, Value::String(message.into()))
    }

    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body as JSON text (empty for no content).
    pub fn body_text(&self) -> String {
        self.body
            .as_ref()
            .map(Value::to_string)
            .unwrap_or_default()
    }
}

impl From<ReportError> for ApiResponse {
    fn from(err: ReportError) -> Self {
        ApiResponse::error(status_for(&err), err.to_string())
    }
}

/// HTTP status for a delivery error.
pub fn status_for(err: &ReportError) -> u16 {
    match err {
        ReportError::Validation(_) => 400,
        ReportError::AuthenticationFailed(_) => 401,
        ReportError::RepositoryNotFound(_) => 404,
        ReportError::VendorRequest { .. }
        | ReportError::VendorResponse(_)
        | ReportError::Transport(_) => 502,
        ReportError::Delivery(_) | ReportError::Configuration(_) => 500,
    }
}

/// Request handlers bound to one configuration.
pub struct Reporter {
    enabled: bool,
    template: Template,
    fields: FieldSchema,
    destination: DestinationFactory,
}

impl std::fmt::Debug for Reporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reporter")
            .field("enabled", &self.enabled)
            .field("template", &self.template)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl Reporter {
    /// Create handlers from explicit parts.
    pub fn new(template: Template, fields: FieldSchema, destination: DestinationFactory) -> Self {
        Self {
            enabled: true,
            template,
            fields,
            destination,
        }
    }

    /// Create handlers from loaded configuration.
    ///
    /// Template and field blueprint are read now; the destination is built
    /// per report.
    ///
    /// # Errors
    ///
    /// Returns an error if the template or blueprint cannot be read.
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let template = config.template()?;
        let fields = match config.fields_path() {
            Some(path) => FieldSchema::load(&path)?,
            None => FieldSchema::empty(),
        };
        let enabled = config.enabled();

        let reporter = Self::new(
            template,
            fields,
            Box::new(move || create_destination(&config)),
        );
        Ok(reporter.with_enabled(enabled))
    }

    /// Switch all routes on or off.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Dispatch a request by method and path.
    ///
    /// An empty body is treated as `{}`.
    pub async fn handle(&self, method: &str, path: &str, body: &str) -> ApiResponse {
        if !self.enabled {
            return ApiResponse::error(404, "reporter is disabled");
        }

        let path = path.trim_end_matches('/');
        let method = method.to_ascii_uppercase();
        tracing::debug!(%method, path, "handling request");

        match (method.as_str(), path) {
            ("POST", "/report") => match parse_body(body) {
                Ok(value) => self.report(&value).await,
                Err(response) => response,
            },
            ("POST", "/report/preview") => match parse_body(body) {
                Ok(value) => self.preview(&value),
                Err(response) => response,
            },
            ("GET", "/fields") => self.fields(),
            (_, "/report" | "/report/preview" | "/fields") => {
                ApiResponse::error(405, "method not allowed")
            }
            _ => ApiResponse::error(404, "not found"),
        }
    }

    /// `POST /report`: validate, render, deliver.
    pub async fn report(&self, body: &Value) -> ApiResponse {
        if !self.enabled {
            return ApiResponse::error(404, "reporter is disabled");
        }

        let form = match FormData::from_json(body) {
            Ok(form) => form,
            Err(err) => return ReportError::from(err).into(),
        };

        let destination = match (self.destination)() {
            Ok(destination) => destination,
            Err(err) => return err.into(),
        };

        let client = ReportClient::new(destination, self.template.clone());
        match client.create_report(&form).await {
            Ok(response) => match serde_json::to_value(&response) {
                Ok(json) => ApiResponse::json(response.status(), json),
                Err(e) => ApiResponse::error(500, e.to_string()),
            },
            Err(err) => err.into(),
        }
    }

    /// `POST /report/preview`: render without delivering.
    pub fn preview(&self, body: &Value) -> ApiResponse {
        if !self.enabled {
            return ApiResponse::error(404, "reporter is disabled");
        }

        let fields = match fields_from_json(body) {
            Ok(fields) => fields,
            Err(err) => return ReportError::from(err).into(),
        };

        match self.template.preview(&fields) {
            Some(rendered) => ApiResponse::json(200, Value::String(rendered)),
            None => ApiResponse::no_content(),
        }
    }

    /// `GET /fields`: the field definitions.
    pub fn fields(&self) -> ApiResponse {
        if !self.enabled {
            return ApiResponse::error(404, "reporter is disabled");
        }
        ApiResponse::json(200, self.fields.as_json().clone())
    }
}

/// Decode a JSON request body.
fn parse_body(body: &str) -> Result<Value, ApiResponse> {
    if body.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_str(body)
        .map_err(|e| ApiResponse::error(400, format!("invalid JSON body: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::mock::MockDestination;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn reporter_with(mock: MockDestination) -> Reporter {
        Reporter::new(
            Template::new("{description}\n\n{browser}"),
            FieldSchema::empty(),
            Box::new(move || Ok(Box::new(mock.clone()) as Box<dyn ReportDestination>)),
        )
    }

    mod status_mapping {
        use super::*;

        #[test]
        fn each_kind() {
            assert_eq!(status_for(&ReportError::Validation("x".into())), 400);
            assert_eq!(status_for(&ReportError::AuthenticationFailed("x".into())), 401);
            assert_eq!(status_for(&ReportError::RepositoryNotFound("x".into())), 404);
            assert_eq!(
                status_for(&ReportError::VendorRequest {
                    status: 422,
                    body: String::new()
                }),
                502
            );
            assert_eq!(status_for(&ReportError::VendorResponse("x".into())), 502);
            assert_eq!(status_for(&ReportError::Transport("x".into())), 502);
            assert_eq!(status_for(&ReportError::Delivery("x".into())), 500);
            assert_eq!(status_for(&ReportError::Configuration("x".into())), 500);
        }

        #[test]
        fn error_body_is_message_string() {
            let response: ApiResponse = ReportError::Validation("no title".into()).into();
            assert_eq!(response.status, 400);
            assert_eq!(response.body, Some(json!("no title")));
            assert_eq!(response.body_text(), "\"no title\"");
        }
    }

    mod routes {
        use super::*;

        #[tokio::test]
        async fn report_success() {
            let mock = MockDestination::new();
            let reporter = reporter_with(mock.clone());

            let response = reporter
                .handle("POST", "/report", r#"{"title":"Bug","description":"It crashes"}"#)
                .await;

            assert_eq!(response.status, 201);
            assert_eq!(
                response.body,
                Some(json!({
                    "status": 201,
                    "issueUrl": "https://tracker.test/issues/1",
                    "issueId": 1
                }))
            );
            assert_eq!(mock.reports()[0].body, "It crashes\n\n{browser}");
        }

        #[tokio::test]
        async fn missing_title_never_builds_destination() {
            let built = Arc::new(AtomicUsize::new(0));
            let counter = built.clone();
            let reporter = Reporter::new(
                Template::default(),
                FieldSchema::empty(),
                Box::new(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(Box::new(MockDestination::new()) as Box<dyn ReportDestination>)
                }),
            );

            let response = reporter
                .handle("POST", "/report", r#"{"title":"","description":"x"}"#)
                .await;

            assert_eq!(response.status, 400);
            assert_eq!(response.body, Some(json!("You need to add at least a title.")));
            assert_eq!(built.load(Ordering::SeqCst), 0);
        }

        #[tokio::test]
        async fn destination_errors_map_to_status() {
            let reporter = reporter_with(MockDestination::failing(
                ReportError::AuthenticationFailed("401".into()),
            ));
            let response = reporter.handle("POST", "/report", r#"{"title":"Bug"}"#).await;
            assert_eq!(response.status, 401);
        }

        #[tokio::test]
        async fn configuration_errors_are_500() {
            let reporter = Reporter::new(
                Template::default(),
                FieldSchema::empty(),
                Box::new(|| Err(ReportError::Configuration("no destination".into()))),
            );
            let response = reporter.handle("POST", "/report", r#"{"title":"Bug"}"#).await;
            assert_eq!(response.status, 500);
        }

        #[tokio::test]
        async fn preview_with_description() {
            let reporter = reporter_with(MockDestination::new());
            let response = reporter
                .handle(
                    "POST",
                    "/report/preview",
                    r#"{"description":"  hi  ","browser":"Firefox"}"#,
                )
                .await;

            assert_eq!(response.status, 200);
            assert_eq!(response.body, Some(json!("hi  \n\nFirefox")));
        }

        #[tokio::test]
        async fn preview_without_description() {
            let reporter = reporter_with(MockDestination::new());
            let response = reporter
                .handle("POST", "/report/preview", r#"{"title":"Bug"}"#)
                .await;

            assert_eq!(response, ApiResponse::no_content());
            assert_eq!(response.body_text(), "");
        }

        #[tokio::test]
        async fn fields_passthrough() {
            let schema =
                FieldSchema::parse("fields:\n  browser:\n    type: text\n", "x.yml".as_ref())
                    .unwrap();
            let reporter = Reporter::new(
                Template::default(),
                schema,
                Box::new(|| Ok(Box::new(MockDestination::new()) as Box<dyn ReportDestination>)),
            );

            let response = reporter.handle("GET", "/fields", "").await;
            assert_eq!(response.status, 200);
            assert_eq!(response.body, Some(json!({ "browser": { "type": "text" } })));
        }

        #[tokio::test]
        async fn invalid_json_is_400() {
            let reporter = reporter_with(MockDestination::new());
            let response = reporter.handle("POST", "/report", "{not json").await;
            assert_eq!(response.status, 400);
        }

        #[tokio::test]
        async fn empty_body_is_missing_title() {
            let reporter = reporter_with(MockDestination::new());
            let response = reporter.handle("POST", "/report", "").await;
            assert_eq!(response.status, 400);
        }

        #[tokio::test]
        async fn unknown_routes() {
            let reporter = reporter_with(MockDestination::new());
            assert_eq!(reporter.handle("GET", "/nope", "").await.status, 404);
            assert_eq!(reporter.handle("GET", "/report", "").await.status, 405);
            assert_eq!(reporter.handle("post", "/report/preview/", "{}").await.status, 204);
        }

        #[tokio::test]
        async fn disabled_refuses_everything() {
            let mock = MockDestination::new();
            let reporter = reporter_with(mock.clone()).with_enabled(false);

            for (method, path) in [("POST", "/report"), ("POST", "/report/preview"), ("GET", "/fields")] {
                let response = reporter
                    .handle(method, path, r#"{"title":"Bug","description":"x"}"#)
                    .await;
                assert_eq!(response.status, 404);
            }
            assert!(mock.reports().is_empty());
        }
    }
}
