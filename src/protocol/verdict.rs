use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

/// One line of feedback from the ECA service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StatusMessage {
    pub message: String,
    /// Service status code (positive for success kinds, negative for errors).
    #[serde(default)]
    pub code: Option<i64>,
}

/// The service's judgment for a single commit.
///
/// `messages` and `errors` default to empty, whether absent or `null`.
/// `warnings` stays `None` when the service version does not send it, which
/// the report treats as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VerdictEntry {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub messages: Vec<StatusMessage>,
    #[serde(default)]
    pub warnings: Option<Vec<StatusMessage>>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub errors: Vec<StatusMessage>,
}

impl VerdictEntry {
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    /// Warnings, with an absent list read as empty.
    pub fn warnings(&self) -> &[StatusMessage] {
        self.warnings.as_deref().unwrap_or_default()
    }
}

/// Body returned by the ECA validation endpoint.
///
/// Commits are keyed by hash and iterate in sorted order. The summary fields
/// are informational; the push outcome is decided by the HTTP status alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub commits: BTreeMap<String, VerdictEntry>,
    #[serde(default)]
    pub passed: Option<bool>,
    #[serde(default)]
    pub error_count: Option<u64>,
    #[serde(default)]
    pub tracked_project: Option<bool>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
