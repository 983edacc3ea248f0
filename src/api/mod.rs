//! Clients for the two remote services the hook talks to.
//!
//! Both are blocking and make exactly one request per call, with no retries.

pub mod eca;
pub mod gitlab;

use std::time::Duration;

use crate::domain::ProjectId;
use crate::protocol::{ValidationPayload, ValidationResponse};

pub use eca::{EcaClient, ReportError};
pub use gitlab::{GitlabClient, ProjectRecord, ResolveError};

/// Looks up the canonical URL of the project being pushed to.
pub trait ProjectResolver {
    fn resolve_project_url(&self, id: &ProjectId) -> Result<String, ResolveError>;
}

/// Raw outcome of a validation request: HTTP status plus parsed body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub status: u16,
    pub response: ValidationResponse,
}

/// Submits commits to the compliance service.
pub trait ComplianceClient {
    fn submit_validation(&self, payload: &ValidationPayload) -> Result<Submission, ReportError>;
}

fn http_client(timeout: Duration) -> Result<reqwest::blocking::Client, reqwest::Error> {
    reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Describe a transport failure, calling out timeouts explicitly.
fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        format!("connection failed: {err}")
    } else {
        err.to_string()
    }
}
