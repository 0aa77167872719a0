pub mod error;
pub mod git;
pub mod traits;

pub use error::{Result, VcsError};
pub use git::GitVcs;
pub use traits::{VersionControl, IGNORE_FILE};
