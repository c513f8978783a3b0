//! destination::github
//!
//! GitHub issue creation via the REST API.
//!
//! `POST {api}/repos/{owner}/{repo}/issues` with a bearer token. The issue
//! number and browser URL come from the flat `number` and `html_url`
//! fields of the response.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde::{Deserialize, Serialize};

use super::request::{check_status, header_value, parse_body, RequestHelper};
use super::traits::{ReportDestination, ReportError, ReportResponse};
use super::vendor::Vendor;
use crate::core::expand::{expand, values};
use crate::core::form::FormData;

/// Issue endpoint relative to the API base.
const URL_TEMPLATE: &str = "{api}/repos/{owner}/{repo}/issues";

/// GitHub adapter.
#[derive(Debug, Clone)]
pub struct GitHubReport {
    vendor: Vendor,
    http: RequestHelper,
}

impl GitHubReport {
    /// Create an adapter for the given repository.
    pub fn new(vendor: Vendor, http: RequestHelper) -> Self {
        Self { vendor, http }
    }

    /// Issue creation endpoint.
    fn issues_url(&self) -> String {
        expand(
            URL_TEMPLATE,
            &values([
                ("api", self.vendor.api_base()),
                ("owner", self.vendor.owner()),
                ("repo", self.vendor.repository()),
            ]),
        )
    }

    /// Build common headers for API requests.
    fn headers(&self) -> Result<HeaderMap, ReportError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            header_value(&format!("Bearer {}", self.vendor.token()))?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static("2022-11-28"),
        );
        Ok(headers)
    }
}

#[async_trait]
impl ReportDestination for GitHubReport {
    fn name(&self) -> &'static str {
        "github"
    }

    async fn report(&self, form: &FormData, body: &str) -> Result<ReportResponse, ReportError> {
        let request = CreateIssue {
            title: form.title(),
            body,
        };

        let response = self
            .http
            .post(&self.issues_url(), &request, self.headers()?)
            .await?;
        check_status(&response, &self.vendor.slug())?;

        let issue: GitHubIssue = parse_body(&response)?;
        tracing::info!(number = issue.number, "created GitHub issue");
        Ok(ReportResponse::issue(
            response.status,
            issue.number,
            issue.html_url,
        ))
    }
}

/// Request body for issue creation.
#[derive(Serialize)]
struct CreateIssue<'a> {
    title: &'a str,
    body: &'a str,
}

/// The parts of the created issue we read.
#[derive(Deserialize)]
struct GitHubIssue {
    number: u64,
    html_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::destination::Platform;

    fn adapter() -> GitHubReport {
        let vendor = Vendor::new(Platform::GitHub, "octocat", "hello-world", "ghp_x", None).unwrap();
        GitHubReport::new(vendor, RequestHelper::new(None).unwrap())
    }

    #[test]
    fn issues_url_format() {
        assert_eq!(
            adapter().issues_url(),
            "https://api.github.com/repos/octocat/hello-world/issues"
        );
    }

    #[test]
    fn bearer_header() {
        let headers = adapter().headers().unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer ghp_x");
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/vnd.github+json");
    }

    #[test]
    fn payload_shape() {
        let json = serde_json::to_value(CreateIssue {
            title: "Bug",
            body: "It crashes",
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "title": "Bug", "body": "It crashes" }));
    }
}
