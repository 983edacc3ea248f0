pub mod commit;
pub mod input;
pub mod output;
pub mod verdict;

pub use commit::{CommitRecord, GitUser, ValidationPayload};
pub use input::{InputError, PushUpdate};
pub use output::{hook_error_line, Report};
pub use verdict::{StatusMessage, ValidationResponse, VerdictEntry};
