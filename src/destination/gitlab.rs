//! destination::gitlab
//!
//! GitLab issue creation via the v4 REST API.
//!
//! # Design
//!
//! GitLab addresses projects by URL-encoded full path, so
//! `group/subgroup/project` becomes `group%2Fsubgroup%2Fproject` in
//! `POST {api}/projects/{project}/issues`. The project is pushed as a single
//! path segment onto the api base, so self-hosted prefixes survive.
//! Authentication uses the `private-token` header.
//!
//! The response exposes the project-scoped number as `iid` (not `id`, which
//! is global) and the browser URL as `web_url`.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use super::request::{check_status, header_value, parse_body, RequestHelper};
use super::traits::{ReportDestination, ReportError, ReportResponse};
use super::vendor::Vendor;
use crate::core::expand::{expand, values};
use crate::core::form::FormData;

/// Project collection relative to the API base.
const PROJECTS_TEMPLATE: &str = "{api}/projects";

/// Token header name.
const PRIVATE_TOKEN: &str = "private-token";

/// GitLab adapter.
#[derive(Debug, Clone)]
pub struct GitLabReport {
    vendor: Vendor,
    http: RequestHelper,
}

impl GitLabReport {
    /// Create an adapter for the given project.
    pub fn new(vendor: Vendor, http: RequestHelper) -> Self {
        Self { vendor, http }
    }

    /// Issue creation endpoint, with the project path as one encoded segment.
    fn issues_url(&self) -> Result<Url, ReportError> {
        let projects = expand(PROJECTS_TEMPLATE, &values([("api", self.vendor.api_base())]));
        let mut url = Url::parse(&projects).map_err(|e| {
            ReportError::Configuration(format!(
                "invalid api base '{}': {}",
                self.vendor.api_base(),
                e
            ))
        })?;

        url.path_segments_mut()
            .map_err(|_| {
                ReportError::Configuration(format!(
                    "api base '{}' cannot take a path",
                    self.vendor.api_base()
                ))
            })?
            .push(&self.vendor.slug())
            .push("issues");
        Ok(url)
    }

    fn headers(&self) -> Result<HeaderMap, ReportError> {
        let mut headers = HeaderMap::new();
        headers.insert(PRIVATE_TOKEN, header_value(self.vendor.token())?);
        Ok(headers)
    }
}

#[async_trait]
impl ReportDestination for GitLabReport {
    fn name(&self) -> &'static str {
        "gitlab"
    }

    async fn report(&self, form: &FormData, body: &str) -> Result<ReportResponse, ReportError> {
        let request = CreateIssue {
            title: form.title(),
            description: body,
        };

        let response = self
            .http
            .post(self.issues_url()?.as_str(), &request, self.headers()?)
            .await?;
        check_status(&response, &self.vendor.slug())?;

        let issue: GitLabIssue = parse_body(&response)?;
        tracing::info!(iid = issue.iid, "created GitLab issue");
        Ok(ReportResponse::issue(response.status, issue.iid, issue.web_url))
    }
}

/// Request body for issue creation.
#[derive(Serialize)]
struct CreateIssue<'a> {
    title: &'a str,
    description: &'a str,
}

/// The parts of the created issue we read.
#[derive(Deserialize)]
struct GitLabIssue {
    iid: u64,
    web_url: String,
}
