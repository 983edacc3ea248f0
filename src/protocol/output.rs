use super::commit::flatten_line_breaks;
use super::verdict::{ValidationResponse, VerdictEntry};

/// Line prefix GitLab shows to the pushing user as a hook rejection reason.
pub const HOOK_ERROR_PREFIX: &str = "GL-HOOK-ERR: ";

pub const PASS_GLYPH: &str = "✔";
pub const FAIL_GLYPH: &str = "X";

pub const ECA_NOTICE: &str = "This commit is compliant with the Eclipse Contributor Agreement (ECA).";
pub const ECA_REFERENCE_URL: &str = "https://www.eclipse.org/legal/ECA.php";

/// HTTP status with which the ECA service rejects a push.
pub const REJECTED_STATUS: u16 = 403;

/// Format a diagnostic so GitLab surfaces it to the pushing user.
///
/// GitLab only relays prefixed lines, so the message is kept on one line.
pub fn hook_error_line(message: impl std::fmt::Display) -> String {
    let message = flatten_line_breaks(&message.to_string());
    format!("{HOOK_ERROR_PREFIX}{}", message.trim())
}

/// The rendered per-commit report plus the process exit status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub lines: Vec<String>,
    pub exit_code: i32,
}

impl Report {
    /// Render the service's response and derive the exit status from `status`.
    ///
    /// Only a 403 fails the push. Per-commit errors in a response with any
    /// other status are printed but do not change the exit code.
    pub fn new(status: u16, response: &ValidationResponse) -> Self {
        Report {
            lines: render(response),
            exit_code: exit_code_for(status),
        }
    }

    /// A report with nothing to print, used when the push introduced no commits.
    pub fn empty() -> Self {
        Report {
            lines: Vec::new(),
            exit_code: 0,
        }
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

pub fn exit_code_for(status: u16) -> i32 {
    if status == REJECTED_STATUS {
        1
    } else {
        0
    }
}

/// Render every verdict in the response's key order.
pub fn render(response: &ValidationResponse) -> Vec<String> {
    let mut lines = Vec::new();
    for (hash, entry) in &response.commits {
        render_entry(&mut lines, hash, entry);
    }
    lines
}

fn render_entry(lines: &mut Vec<String>, hash: &str, entry: &VerdictEntry) {
    let glyph = if entry.passed() { PASS_GLYPH } else { FAIL_GLYPH };
    lines.push(format!("Commit: {hash}\t\t{glyph}"));
    lines.push(String::new());

    push_messages(lines, entry);
    for warning in entry.warnings() {
        lines.push(format!("\tWARNING: {}", warning.message));
    }

    if entry.passed() {
        if entry.warnings().is_empty() {
            // Clean commits repeat their messages before the ECA notice.
            push_messages(lines, entry);
            lines.push(String::new());
            lines.push(format!("\t{ECA_NOTICE}"));
            lines.push(format!("\tMore information: {ECA_REFERENCE_URL}"));
        }
    } else {
        lines.push(String::new());
        for error in &entry.errors {
            lines.push(hook_error_line(&error.message));
        }
    }
    lines.push(String::new());
}

fn push_messages(lines: &mut Vec<String>, entry: &VerdictEntry) {
    for msg in &entry.messages {
        lines.push(format!("\t{}", msg.message));
    }
}
