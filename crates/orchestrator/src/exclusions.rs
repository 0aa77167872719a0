//! Resolution of the paths every engine must skip.
//!
//! The exclusion set is the user's `exclude_paths` patterns, canonicalized,
//! followed by the untracked files the repository's ignore file matches.

use globset::Glob;
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use vcs::{VersionControl, IGNORE_FILE};

use crate::error::{OrchestratorError, Result};

/// Ordered, duplicate-free list of path patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    patterns: Vec<String>,
    seen: HashSet<String>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_patterns<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::new();
        set.extend(patterns.into_iter().map(Into::into));
        set
    }

    /// Append a pattern unless it is already present.
    pub fn insert(&mut self, pattern: String) -> bool {
        if !self.seen.insert(pattern.clone()) {
            return false;
        }
        self.patterns.push(pattern);
        true
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.seen.contains(pattern)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn to_value(&self) -> Value {
        Value::Array(self.patterns.iter().cloned().map(Value::String).collect())
    }
}

impl Extend<String> for ExclusionSet {
    fn extend<T: IntoIterator<Item = String>>(&mut self, iter: T) {
        for pattern in iter {
            self.insert(pattern);
        }
    }
}

/// Turns a user-declared exclusion pattern into canonical glob patterns.
pub trait PatternExpander: Send + Sync {
    fn expand(&self, pattern: &str) -> Result<Vec<String>>;
}

/// Canonicalizes patterns relative to the source root.
///
/// - surrounding whitespace, leading `./` and `/` are dropped
/// - a trailing `/` selects everything below the directory (`dir/**`)
/// - the result must parse as a glob
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobPatternExpander;

impl PatternExpander for GlobPatternExpander {
    fn expand(&self, pattern: &str) -> Result<Vec<String>> {
        let mut canonical = pattern.trim();
        loop {
            if let Some(rest) = canonical.strip_prefix("./") {
                canonical = rest;
            } else if let Some(rest) = canonical.strip_prefix('/') {
                canonical = rest;
            } else {
                break;
            }
        }

        if canonical.is_empty() {
            return Ok(Vec::new());
        }

        let canonical = if canonical.ends_with('/') {
            format!("{}**", canonical)
        } else {
            canonical.to_string()
        };

        Glob::new(&canonical).map_err(|e| OrchestratorError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.kind().to_string(),
        })?;

        Ok(vec![canonical])
    }
}

pub struct PathExclusionResolver {
    working_dir: PathBuf,
    vcs: Arc<dyn VersionControl>,
    expander: Arc<dyn PatternExpander>,
}

impl PathExclusionResolver {
    pub fn new(working_dir: impl Into<PathBuf>, vcs: Arc<dyn VersionControl>) -> Self {
        Self {
            working_dir: working_dir.into(),
            vcs,
            expander: Arc::new(GlobPatternExpander),
        }
    }

    pub fn with_expander(mut self, expander: Arc<dyn PatternExpander>) -> Self {
        self.expander = expander;
        self
    }

    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Expanded user patterns followed by ignored untracked files.
    ///
    /// A failing version control query is returned as an error.
    pub async fn resolve(&self, patterns: &[String]) -> Result<ExclusionSet> {
        let mut exclusions = ExclusionSet::new();

        for pattern in patterns {
            exclusions.extend(self.expander.expand(pattern)?);
        }
        let explicit = exclusions.len();

        exclusions.extend(self.ignored_paths().await?);

        debug!(
            explicit,
            ignored = exclusions.len() - explicit,
            "Exclusion set resolved"
        );
        Ok(exclusions)
    }

    async fn ignored_paths(&self) -> Result<Vec<String>> {
        if !self.working_dir.join(IGNORE_FILE).exists() {
            return Ok(Vec::new());
        }

        let paths = self
            .vcs
            .ignored_untracked_files(&self.working_dir, Path::new(IGNORE_FILE))
            .await?;
        Ok(paths)
    }
}
