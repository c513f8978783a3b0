//! destination::bitbucket
//!
//! Bitbucket Cloud issue creation via the 2.0 REST API.
//!
//! # Design
//!
//! `POST {api}/repositories/{user}/{repo}/issues` authenticated with HTTP
//! Basic (`user:token`, base64). The issue tracker must be enabled on the
//! repository; otherwise Bitbucket answers 404.
//!
//! The response carries no browser URL for the issue itself. It is built
//! from the repository link at `repository.links.html.href` plus
//! `/issues/{id}`.

use async_trait::async_trait;
use base64::Engine;
use reqwest::header::{HeaderMap, AUTHORIZATION};
use serde::{Deserialize, Serialize};

use super::request::{check_status, header_value, parse_body, RequestHelper};
use super::traits::{ReportDestination, ReportError, ReportResponse};
use super::vendor::Vendor;
use crate::core::expand::{expand, values};
use crate::core::form::FormData;

/// Issue endpoint relative to the API base.
const URL_TEMPLATE: &str = "{api}/repositories/{user}/{repo}/issues";

/// Bitbucket adapter.
#[derive(Debug, Clone)]
pub struct BitbucketReport {
    vendor: Vendor,
    http: RequestHelper,
}

impl BitbucketReport {
    /// Create an adapter for the given repository.
    pub fn new(vendor: Vendor, http: RequestHelper) -> Self {
        Self { vendor, http }
    }

    /// Issue creation endpoint. `{user}` is the workspace owning the repo.
    fn issues_url(&self) -> String {
        expand(
            URL_TEMPLATE,
            &values([
                ("api", self.vendor.api_base()),
                ("user", self.vendor.owner()),
                ("repo", self.vendor.repository()),
            ]),
        )
    }

    fn headers(&self) -> Result<HeaderMap, ReportError> {
        let user = self.vendor.user().ok_or_else(|| {
            ReportError::Configuration(
                "option \"repository.user\" is required for Bitbucket".to_string(),
            )
        })?;
        let credentials = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", user, self.vendor.token()));

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, header_value(&format!("Basic {}", credentials))?);
        Ok(headers)
    }
}

#[async_trait]
impl ReportDestination for BitbucketReport {
    fn name(&self) -> &'static str {
        "bitbucket"
    }

    async fn report(&self, form: &FormData, body: &str) -> Result<ReportResponse, ReportError> {
        let request = CreateIssue {
            title: form.title(),
            content: Content { raw: body },
        };

        let response = self
            .http
            .post(&self.issues_url(), &request, self.headers()?)
            .await?;
        check_status(&response, &self.vendor.slug())?;

        let issue: BitbucketIssue = parse_body(&response)?;
        let url = format!(
            "{}/issues/{}",
            issue.repository.links.html.href.trim_end_matches('/'),
            issue.id
        );
        tracing::info!(id = issue.id, "created Bitbucket issue");
        Ok(ReportResponse::issue(response.status, issue.id, url))
    }
}

/// Request body for issue creation.
#[derive(Serialize)]
struct CreateIssue<'a> {
    title: &'a str,
    content: Content<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    raw: &'a str,
}

/// The parts of the created issue we read.
#[derive(Deserialize)]
struct BitbucketIssue {
    id: u64,
    repository: BitbucketRepository,
}

#[derive(Deserialize)]
struct BitbucketRepository {
    links: BitbucketLinks,
}

#[derive(Deserialize)]
struct BitbucketLinks {
    html: BitbucketLink,
}

#[derive(Deserialize)]
struct BitbucketLink {
    href: String,
}
