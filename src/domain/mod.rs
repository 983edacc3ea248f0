pub mod project;
pub mod range;

pub use project::{ProjectId, ProjectIdError};
pub use range::{is_null_hash, CommitRange};
