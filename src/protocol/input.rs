use crate::domain::CommitRange;

/// Error reading the ref update git hands the hook on stdin.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InputError {
    #[error("expected '<old-hash> <new-hash>' on stdin, got {0:?}")]
    Malformed(String),
}

/// One ref update as received by a `pre-receive` hook: `<old> <new> [<ref>]`.
///
/// Only the first update is validated; any further lines are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushUpdate {
    pub old: String,
    pub new: String,
    /// Ref name, when git supplied one (`refs/heads/main`).
    pub refname: Option<String>,
}

impl PushUpdate {
    /// Parse the hook's stdin.
    ///
    /// The first two whitespace-separated tokens are the old and new hash.
    /// A third token on the same line is taken as the ref name.
    pub fn parse(stdin: &str) -> Result<Self, InputError> {
        let first_line = stdin
            .lines()
            .find(|l| !l.trim().is_empty())
            .unwrap_or_default();
        let mut tokens = first_line.split_whitespace();
        match (tokens.next(), tokens.next()) {
            (Some(old), Some(new)) => Ok(PushUpdate {
                old: old.to_string(),
                new: new.to_string(),
                refname: tokens.next().map(String::from),
            }),
            _ => Err(InputError::Malformed(truncate(stdin))),
        }
    }

    /// Number of non-blank update lines after the first.
    pub fn ignored_updates(stdin: &str) -> usize {
        stdin
            .lines()
            .filter(|l| !l.trim().is_empty())
            .count()
            .saturating_sub(1)
    }

    /// The commit range this update introduces.
    pub fn range(&self) -> CommitRange {
        CommitRange::new(&self.old, &self.new)
    }
}

fn truncate(raw: &str) -> String {
    const LIMIT: usize = 120;
    let trimmed = raw.trim();
    match trimmed.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}…", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}
