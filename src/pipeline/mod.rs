//! The validation workflow: range → commits → project URL → verdict report.
//!
//! Each step depends only on the collaborator traits, so the whole flow runs
//! against in-memory fakes in tests.

mod error;

pub use error::{ErrorKind, HookError};

use crate::api::{ComplianceClient, ProjectResolver};
use crate::domain::ProjectId;
use crate::git::CommitSource;
use crate::protocol::{CommitRecord, PushUpdate, Report, ValidationPayload};

/// The external services the workflow talks to.
pub struct Services<'a> {
    pub commits: &'a dyn CommitSource,
    pub projects: &'a dyn ProjectResolver,
    pub compliance: &'a dyn ComplianceClient,
}

/// Where the pushed-to project is identified: the locator value and the
/// prefix to strip from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub locator: String,
    pub prefix: String,
}

/// Validate one ref update and build the report to print.
///
/// Steps run strictly in order and the first failure aborts the run, so a
/// report is only ever built from a complete commit set. A push that
/// introduces no commits (branch deletion, or nothing new on the first-parent
/// line) makes no HTTP calls and yields an empty, passing report.
pub fn validate_push(
    update: &PushUpdate,
    repository: &Repository,
    services: &Services<'_>,
) -> Result<Report, HookError> {
    let range = update.range();
    let ids = services.commits.list_commits(&range)?;
    tracing::info!(%range, commits = ids.len(), "resolved pushed commits");
    if ids.is_empty() {
        return Ok(Report::empty());
    }

    let records = extract_commits(services.commits, &ids)?;

    let project = ProjectId::from_locator(&repository.locator, &repository.prefix)?;
    let repo_url = services.projects.resolve_project_url(&project)?;
    tracing::info!(%project, %repo_url, "resolved project");

    let payload = ValidationPayload::new(repo_url, records);
    let submission = services.compliance.submit_validation(&payload)?;
    let report = Report::new(submission.status, &submission.response);
    if report.exit_code != 0 {
        tracing::info!(status = submission.status, "push rejected by ECA service");
    }
    Ok(report)
}

/// Fetch metadata for every id, in order. Any failure discards the lot.
fn extract_commits(
    source: &dyn CommitSource,
    ids: &[String],
) -> Result<Vec<CommitRecord>, HookError> {
    ids.iter()
        .map(|id| -> Result<CommitRecord, HookError> {
            let record = source.commit_record(id)?;
            tracing::debug!(commit = %id, merge = record.is_merge(), "extracted commit");
            Ok(record)
        })
        .collect()
}
