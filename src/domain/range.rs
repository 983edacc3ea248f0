/// Whether a hash is the all-zeros placeholder git sends for a ref that did
/// not exist before the push (as `old`) or is being deleted (as `new`).
pub fn is_null_hash(hash: &str) -> bool {
    !hash.is_empty() && hash.bytes().all(|b| b == b'0')
}

/// The set of commits a single ref update introduces, as git would select them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitRange {
    /// New ref: the tip commit and its first-parent ancestry.
    Tip(String),
    /// Existing ref: commits reachable from `new` but not from `old`.
    Between { old: String, new: String },
    /// Ref deletion: nothing new to validate.
    Empty,
}

impl CommitRange {
    /// Build the range for an `<old> <new>` pair.
    ///
    /// `0000… abc…` → `Tip("abc…")`, `aaa… bbb…` → `Between`, `aaa… 0000…` → `Empty`.
    pub fn new(old: &str, new: &str) -> Self {
        if is_null_hash(new) {
            CommitRange::Empty
        } else if is_null_hash(old) {
            CommitRange::Tip(new.to_string())
        } else {
            CommitRange::Between {
                old: old.to_string(),
                new: new.to_string(),
            }
        }
    }

    /// The revision argument to hand to `git rev-list`, or `None` when there
    /// is nothing to list.
    pub fn expression(&self) -> Option<String> {
        match self {
            CommitRange::Tip(new) => Some(new.clone()),
            CommitRange::Between { old, new } => Some(format!("{old}..{new}")),
            CommitRange::Empty => None,
        }
    }
}

impl std::fmt::Display for CommitRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.expression() {
            Some(expr) => write!(f, "{expr}"),
            None => write!(f, "(empty)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZERO: &str = "0000000000000000000000000000000000000000";
    const OLD: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const NEW: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    #[test]
    fn null_hash_detection() {
        assert!(is_null_hash(ZERO));
        assert!(is_null_hash("0"));
        assert!(!is_null_hash(""));
        assert!(!is_null_hash(OLD));
        assert!(!is_null_hash("000000a000"));
    }

    #[test]
    fn new_ref_selects_tip_unmodified() {
        let tip = "abc1230000000000000000000000000000000def";
        let range = CommitRange::new(ZERO, tip);
        assert_eq!(range, CommitRange::Tip(tip.to_string()));
        assert_eq!(range.expression().as_deref(), Some(tip));
    }

    #[test]
    fn existing_ref_selects_two_dot_range() {
        let range = CommitRange::new(OLD, NEW);
        assert_eq!(range.expression(), Some(format!("{OLD}..{NEW}")));
    }

    #[test]
    fn short_zero_run_counts_as_new_ref() {
        let range = CommitRange::new("0000", NEW);
        assert_eq!(range, CommitRange::Tip(NEW.to_string()));
    }

    #[test]
    fn deleted_ref_is_empty() {
        let range = CommitRange::new(OLD, ZERO);
        assert_eq!(range, CommitRange::Empty);
        assert!(range.expression().is_none());
    }

    #[test]
    fn display_shows_expression() {
        assert_eq!(CommitRange::new(OLD, NEW).to_string(), format!("{OLD}..{NEW}"));
        assert_eq!(CommitRange::Empty.to_string(), "(empty)");
    }
}
