//! destination::request
//!
//! Thin HTTP helper shared by the vendor adapters.
//!
//! # Design
//!
//! One POST per call, no retry. Transport failures (DNS, refused
//! connection, TLS, timeout) become `ReportError::Transport`; any response
//! that arrives, whatever its status, is returned for the adapter to
//! classify with [`check_status`].

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::traits::ReportError;

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = concat!("reporter/", env!("CARGO_PKG_VERSION"));

/// Status and body of a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: String,
}

/// Issues authenticated JSON POSTs.
///
/// Cloning is cheap and shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct RequestHelper {
    client: Client,
}

impl RequestHelper {
    /// Create a helper with an optional overall request timeout.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Transport` if the HTTP client cannot be
    /// initialised (e.g. no TLS backend).
    pub fn new(timeout: Option<Duration>) -> Result<Self, ReportError> {
        let mut builder = Client::builder().user_agent(USER_AGENT_VALUE);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ReportError::Transport(e.to_string()))?;
        Ok(Self { client })
    }

    /// POST `body` as JSON to `url` with the given headers.
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
        headers: HeaderMap,
    ) -> Result<HttpResponse, ReportError> {
        tracing::debug!(url, "POST");

        let response = self
            .client
            .post(url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|e| ReportError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ReportError::Transport(e.to_string()))?;

        tracing::debug!(url, status, "response received");
        Ok(HttpResponse { status, body })
    }
}

/// Map a non-success status to the matching error.
///
/// `target` names the repository in not-found and auth messages.
pub fn check_status(response: &HttpResponse, target: &str) -> Result<(), ReportError> {
    let status = StatusCode::from_u16(response.status)
        .map_err(|_| ReportError::VendorResponse(format!("invalid status {}", response.status)))?;

    if status.is_success() {
        return Ok(());
    }

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ReportError::AuthenticationFailed(format!("{} for {}", status, target))
        }
        StatusCode::NOT_FOUND => ReportError::RepositoryNotFound(target.to_string()),
        _ => ReportError::VendorRequest {
            status: response.status,
            body: response.body.clone(),
        },
    })
}

/// Decode a successful response body.
pub fn parse_body<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ReportError> {
    serde_json::from_str(&response.body)
        .map_err(|e| ReportError::VendorResponse(format!("failed to parse response: {}", e)))
}

/// Build a header value from configuration text.
///
/// Tokens with control characters cannot be sent and are reported as a
/// configuration problem.
pub fn header_value(value: &str) -> Result<HeaderValue, ReportError> {
    let mut header = HeaderValue::from_str(value).map_err(|_| {
        ReportError::Configuration("token contains characters not allowed in headers".to_string())
    })?;
    header.set_sensitive(true);
    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn success_statuses_pass() {
        assert!(check_status(&response(200, ""), "o/r").is_ok());
        assert!(check_status(&response(201, ""), "o/r").is_ok());
    }

    #[test]
    fn auth_statuses() {
        assert!(matches!(
            check_status(&response(401, ""), "o/r"),
            Err(ReportError::AuthenticationFailed(_))
        ));
        assert!(matches!(
            check_status(&response(403, ""), "o/r"),
            Err(ReportError::AuthenticationFailed(_))
        ));
    }

    #[test]
    fn not_found_names_target() {
        assert_eq!(
            check_status(&response(404, "{}"), "o/r"),
            Err(ReportError::RepositoryNotFound("o/r".to_string()))
        );
    }

    #[test]
    fn other_statuses_carry_body() {
        assert_eq!(
            check_status(&response(422, "Validation Failed"), "o/r"),
            Err(ReportError::VendorRequest {
                status: 422,
                body: "Validation Failed".to_string()
            })
        );
        assert!(matches!(
            check_status(&response(500, ""), "o/r"),
            Err(ReportError::VendorRequest { status: 500, .. })
        ));
    }

    #[test]
    fn parse_body_reports_shape_errors() {
        #[derive(serde::Deserialize)]
        struct Shape {
            #[allow(dead_code)]
            id: u64,
        }

        assert!(parse_body::<Shape>(&response(201, r#"{"id": 1}"#)).is_ok());
        assert!(matches!(
            parse_body::<Shape>(&response(201, "not json")),
            Err(ReportError::VendorResponse(_))
        ));
        assert!(matches!(
            parse_body::<Shape>(&response(201, r#"{"number": 1}"#)),
            Err(ReportError::VendorResponse(_))
        ));
    }

    #[test]
    fn header_value_rejects_newlines() {
        assert!(header_value("Bearer abc").is_ok());
        assert!(matches!(
            header_value("abc\ndef"),
            Err(ReportError::Configuration(_))
        ));
    }

    #[test]
    fn new_with_timeout() {
        assert!(RequestHelper::new(Some(Duration::from_secs(3))).is_ok());
        assert!(RequestHelper::new(None).is_ok());
    }
}
