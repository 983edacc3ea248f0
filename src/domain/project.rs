/// Error deriving a project identifier from the repository locator.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProjectIdError {
    /// The locator does not start with the expected prefix.
    #[error("repository locator '{locator}' does not start with '{prefix}'")]
    MissingPrefix { locator: String, prefix: String },
    /// Nothing is left once the prefix is removed.
    #[error("repository locator '{0}' has no project identifier")]
    Empty(String),
}

/// GitLab project identifier: numeric id or `namespace/path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectId(pub(crate) String);

impl ProjectId {
    /// Strip `prefix` from a locator such as `project-42`.
    pub fn from_locator(locator: &str, prefix: &str) -> Result<Self, ProjectIdError> {
        let id = locator
            .strip_prefix(prefix)
            .ok_or_else(|| ProjectIdError::MissingPrefix {
                locator: locator.to_string(),
                prefix: prefix.to_string(),
            })?
            .trim();
        if id.is_empty() {
            return Err(ProjectIdError::Empty(locator.to_string()));
        }
        Ok(ProjectId(id.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
