//! Commit enumeration and metadata extraction.
//!
//! [`CommitSource`] is the narrow seam the pipeline depends on; [`GitCli`]
//! implements it by shelling out to `git` in the hook's working directory.

use std::path::PathBuf;
use std::process::Command;

use crate::domain::CommitRange;
use crate::protocol::{CommitRecord, GitUser};

/// Fields requested from `git show`, NUL-separated so free text can contain
/// any other character: hash, parents, author name/mail, committer
/// name/mail, subject, raw body.
const SHOW_FORMAT: &str = "--format=%H%x00%P%x00%an%x00%ae%x00%cn%x00%ce%x00%s%x00%B";
const SHOW_FIELDS: usize = 8;

/// Error talking to git or making sense of its output.
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("git {command} failed: {stderr}")]
    Failed { command: String, stderr: String },
    #[error("git {command} produced non-UTF-8 output")]
    NotUtf8 { command: String },
    #[error("unexpected output for commit {commit}: expected {expected} fields, got {actual}")]
    Malformed {
        commit: String,
        expected: usize,
        actual: usize,
    },
}

/// Where the pipeline gets commits from.
pub trait CommitSource {
    /// Commit ids in `range` along first-parent lineage, in git's order.
    fn list_commits(&self, range: &CommitRange) -> Result<Vec<String>, GitError>;

    /// Structured metadata for a single commit.
    fn commit_record(&self, id: &str) -> Result<CommitRecord, GitError>;
}

/// [`CommitSource`] backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
    repo_dir: Option<PathBuf>,
}

impl GitCli {
    /// Run `program` in the current directory (where GitLab starts the hook).
    pub fn new(program: impl Into<String>) -> Self {
        GitCli {
            program: program.into(),
            repo_dir: None,
        }
    }

    /// Run git inside `dir` instead of the current directory.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.repo_dir = Some(dir.into());
        self
    }

    fn run(&self, args: &[&str]) -> Result<String, GitError> {
        let command = args.first().copied().unwrap_or_default().to_string();
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        if let Some(dir) = &self.repo_dir {
            cmd.current_dir(dir);
        }
        tracing::debug!(program = %self.program, ?args, "running git");

        let output = cmd.output().map_err(|source| GitError::Spawn {
            program: self.program.clone(),
            source,
        })?;
        if !output.status.success() {
            let stderr = first_line(&String::from_utf8_lossy(&output.stderr));
            return Err(GitError::Failed { command, stderr });
        }
        String::from_utf8(output.stdout).map_err(|_| GitError::NotUtf8 { command })
    }
}

impl CommitSource for GitCli {
    fn list_commits(&self, range: &CommitRange) -> Result<Vec<String>, GitError> {
        let Some(expr) = range.expression() else {
            return Ok(Vec::new());
        };
        let stdout = self.run(&["rev-list", "--first-parent", expr.as_str(), "--"])?;
        Ok(stdout.split_whitespace().map(String::from).collect())
    }

    fn commit_record(&self, id: &str) -> Result<CommitRecord, GitError> {
        let stdout = self.run(&["show", "-s", "--no-color", SHOW_FORMAT, id, "--"])?;
        parse_show_output(id, &stdout)
    }
}

/// First non-blank line of git's stderr; later lines are hints.
fn first_line(stderr: &str) -> String {
    stderr
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default()
        .to_string()
}

/// Parse the NUL-separated output of `git show -s` with [`SHOW_FORMAT`].
fn parse_show_output(id: &str, stdout: &str) -> Result<CommitRecord, GitError> {
    // `--format` terminates the entry with a newline that is not part of the body.
    let stdout = stdout.strip_suffix('\n').unwrap_or(stdout);
    let fields: Vec<&str> = stdout.split('\0').collect();
    if fields.len() != SHOW_FIELDS {
        return Err(GitError::Malformed {
            commit: id.to_string(),
            expected: SHOW_FIELDS,
            actual: fields.len(),
        });
    }

    let parents = fields[1].split_whitespace().map(String::from).collect();
    let author = GitUser {
        name: fields[2].to_string(),
        mail: fields[3].to_string(),
    };
    let committer = GitUser {
        name: fields[4].to_string(),
        mail: fields[5].to_string(),
    };
    Ok(CommitRecord::new(
        fields[0],
        parents,
        author,
        committer,
        fields[6],
        fields[7],
    ))
}
