use std::time::Duration;

use reqwest::Url;

use super::{describe, http_client, ComplianceClient, Submission};
use crate::protocol::{ValidationPayload, ValidationResponse};

/// Error submitting commits to the ECA service or reading its answer.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("validation request to {url} failed: {detail}")]
    Request { url: Url, detail: String },
    #[error("validation service returned HTTP {status} with an unreadable body: {source}")]
    InvalidJson {
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

/// [`ComplianceClient`] that POSTs to the ECA validation endpoint.
#[derive(Debug)]
pub struct EcaClient {
    http: reqwest::blocking::Client,
    api_url: Url,
}

impl EcaClient {
    pub fn new(api_url: Url, timeout: Duration) -> Result<Self, ReportError> {
        Ok(EcaClient {
            http: http_client(timeout).map_err(ReportError::Client)?,
            api_url,
        })
    }
}

impl ComplianceClient for EcaClient {
    /// Any HTTP status is returned to the caller as long as the body parses;
    /// deciding what a status means is the report's job.
    fn submit_validation(&self, payload: &ValidationPayload) -> Result<Submission, ReportError> {
        tracing::debug!(
            url = %self.api_url,
            commits = payload.commits.len(),
            "submitting validation request"
        );

        let request_failed = |e: reqwest::Error| ReportError::Request {
            url: self.api_url.clone(),
            detail: describe(&e),
        };
        let response = self
            .http
            .post(self.api_url.clone())
            .json(payload)
            .send()
            .map_err(request_failed)?;
        let status = response.status().as_u16();
        let text = response.text().map_err(request_failed)?;

        let response: ValidationResponse = serde_json::from_str(&text)
            .map_err(|source| ReportError::InvalidJson { status, source })?;
        tracing::debug!(
            status,
            passed = ?response.passed,
            error_count = ?response.error_count,
            tracked_project = ?response.tracked_project,
            "validation response received"
        );
        Ok(Submission { status, response })
    }
}
