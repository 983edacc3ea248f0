use crate::api::{ReportError, ResolveError};
use crate::config::ConfigError;
use crate::domain::ProjectIdError;
use crate::git::GitError;
use crate::protocol::InputError;
use crate::token::TokenError;

/// Broad failure classes. Every one of them aborts the hook with status 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing credential, environment, or a bad config file.
    FatalConfig,
    /// stdin did not carry a ref update.
    InvalidInput,
    /// git could not list or describe the pushed commits.
    Extraction,
    /// The project URL could not be determined.
    Resolution,
    /// The compliance service could not be reached or understood.
    Report,
}

/// Any error that stops the hook before a report is printed.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("ECA validation is not configured: {0}")]
    Token(#[from] TokenError),
    #[error("environment variable {0} is not set")]
    MissingEnv(String),
    #[error("failed to read stdin: {0}")]
    Stdin(#[source] std::io::Error),
    #[error("{0}")]
    Input(#[from] InputError),
    #[error("could not read pushed commits: {0}")]
    Extraction(#[from] GitError),
    #[error("could not determine project: {0}")]
    ProjectId(#[from] ProjectIdError),
    #[error("could not determine project: {0}")]
    Resolution(#[from] ResolveError),
    #[error("ECA validation failed: {0}")]
    Report(#[from] ReportError),
}

impl HookError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HookError::Config(_) | HookError::Token(_) | HookError::MissingEnv(_) => {
                ErrorKind::FatalConfig
            }
            HookError::Stdin(_) | HookError::Input(_) => ErrorKind::InvalidInput,
            HookError::Extraction(_) => ErrorKind::Extraction,
            HookError::ProjectId(_) | HookError::Resolution(_) => ErrorKind::Resolution,
            HookError::Report(_) => ErrorKind::Report,
        }
    }
}
