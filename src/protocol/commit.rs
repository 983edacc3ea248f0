use serde::{Deserialize, Serialize};

/// Provider identifier sent with every validation request.
pub const PROVIDER: &str = "gitlab";

/// Name and mail of a commit's author or committer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitUser {
    pub name: String,
    pub mail: String,
}

/// Metadata for one pushed commit, in the shape the ECA service validates.
///
/// Built only through [`CommitRecord::new`], which strips line breaks from
/// the subject and body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    pub hash: String,
    pub parents: Vec<String>,
    pub author: GitUser,
    pub committer: GitUser,
    pub subject: String,
    pub body: String,
}

impl CommitRecord {
    pub fn new(
        hash: impl Into<String>,
        parents: Vec<String>,
        author: GitUser,
        committer: GitUser,
        subject: &str,
        body: &str,
    ) -> Self {
        CommitRecord {
            hash: hash.into(),
            parents,
            author,
            committer,
            subject: flatten_line_breaks(subject),
            body: flatten_line_breaks(body.trim_end_matches(['\n', '\r'])),
        }
    }

    /// Merge commits have more than one parent.
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}

/// Replace every `\n` and `\r` with a single space.
///
/// `"a\r\nb"` becomes `"a  b"`: each break character maps to one space.
pub fn flatten_line_breaks(text: &str) -> String {
    text.chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

/// Request body for the ECA validation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationPayload {
    pub repo_url: String,
    pub provider: &'static str,
    pub commits: Vec<CommitRecord>,
}

impl ValidationPayload {
    pub fn new(repo_url: impl Into<String>, commits: Vec<CommitRecord>) -> Self {
        ValidationPayload {
            repo_url: repo_url.into(),
            provider: PROVIDER,
            commits,
        }
    }
}
