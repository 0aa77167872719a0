use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Result, VcsError};
use crate::traits::VersionControl;

pub struct GitVcs {
    program: String,
}

impl GitVcs {
    pub fn new() -> Self {
        Self {
            program: "git".to_string(),
        }
    }

    /// Use a different git executable.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    async fn run_git(&self, args: &[&str], cwd: &Path) -> Result<Vec<u8>> {
        debug!("Running {} {:?} in {:?}", self.program, args, cwd);

        let output = Command::new(&self.program)
            .args(args)
            .current_dir(cwd)
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => VcsError::CommandNotFound(self.program.clone()),
                _ => VcsError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VcsError::CommandFailed(format!(
                "{} {} failed: {}",
                self.program,
                args.join(" "),
                stderr.trim()
            )));
        }

        Ok(output.stdout)
    }
}

impl Default for GitVcs {
    fn default() -> Self {
        Self::new()
    }
}

/// Split NUL-delimited command output into paths.
fn split_nul(stdout: &[u8]) -> Result<Vec<String>> {
    stdout
        .split(|byte| *byte == 0)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            String::from_utf8(entry.to_vec())
                .map_err(|e| VcsError::Parse(format!("non UTF-8 path in git output: {}", e)))
        })
        .collect()
}

#[async_trait]
impl VersionControl for GitVcs {
    async fn ignored_untracked_files(
        &self,
        dir: &Path,
        ignore_file: &Path,
    ) -> Result<Vec<String>> {
        let ignore_file = ignore_file
            .to_str()
            .ok_or_else(|| VcsError::Parse(format!("invalid path: {}", ignore_file.display())))?;

        let stdout = self
            .run_git(
                &["ls-files", "--others", "-i", "-z", "--exclude-from", ignore_file],
                dir,
            )
            .await?;

        let paths = split_nul(&stdout)?;
        debug!(count = paths.len(), "Listed ignored untracked files");
        Ok(paths)
    }
}
