use async_trait::async_trait;
use std::path::Path;

use crate::error::Result;

/// Ignore file consulted when listing ignored-but-present files.
pub const IGNORE_FILE: &str = ".gitignore";

/// Queries the analyzer needs from a version control backend.
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// List untracked files under `dir` that match the patterns in
    /// `ignore_file`, relative to `dir`.
    ///
    /// A failing query is an error, never an empty list.
    async fn ignored_untracked_files(&self, dir: &Path, ignore_file: &Path)
        -> Result<Vec<String>>;
}
