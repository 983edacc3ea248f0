use std::path::{Path, PathBuf};

/// Error loading the GitLab API token.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("access token file not found: {0}")]
    NotFound(PathBuf),
    #[error("failed to read access token file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("access token file is empty: {0}")]
    Empty(PathBuf),
}

/// Bearer token for the GitLab API. `Debug` never shows the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Read a token from `path`, trimming surrounding whitespace.
    pub fn load(path: &Path) -> Result<Self, TokenError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TokenError::NotFound(path.to_path_buf())
            } else {
                TokenError::Unreadable {
                    path: path.to_path_buf(),
                    source: e,
                }
            }
        })?;
        let token = content.trim();
        if token.is_empty() {
            return Err(TokenError::Empty(path.to_path_buf()));
        }
        Ok(AccessToken(token.to_string()))
    }

    pub fn new(token: impl Into<String>) -> Self {
        AccessToken(token.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}
