//! Engines launched as local processes.
//!
//! The engine receives its configuration as JSON in `ENGINE_CONFIG` and
//! writes NUL-delimited JSON documents to stdout. Documents of type `issue`
//! are validated and forwarded to the reporter; anything else is ignored.

use analyzer_core::{EngineDescriptor, Issue, IssueValidations};
use async_trait::async_trait;
use orchestrator::{Engine, EngineError, EngineFactory, Reporter};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncReadExt, BufReader};
use tokio::process::{Child, Command};
use tracing::{debug, warn};

pub const ENGINE_CONFIG_ENV: &str = "ENGINE_CONFIG";
pub const ENGINE_LABEL_ENV: &str = "ENGINE_LABEL";

const DOCUMENT_DELIMITER: u8 = b'\0';

pub struct ProcessEngine {
    descriptor: EngineDescriptor,
    validations: IssueValidations,
}

impl ProcessEngine {
    pub fn new(descriptor: EngineDescriptor) -> Result<Self, EngineError> {
        if descriptor.metadata().command.is_empty() {
            return Err(EngineError::NotRunnable(format!(
                "engine '{}' has no command",
                descriptor.name()
            )));
        }

        let validations = IssueValidations::new(descriptor.source_dir());
        Ok(Self {
            descriptor,
            validations,
        })
    }

    fn spawn(&self) -> Result<Child, EngineError> {
        let (program, args) = self
            .descriptor
            .metadata()
            .command
            .split_first()
            .ok_or_else(|| EngineError::NotRunnable("empty command".to_string()))?;
        let config = self
            .descriptor
            .config()
            .to_json()
            .map_err(|e| EngineError::Other(format!("Failed to encode config: {}", e)))?;

        let child = Command::new(program)
            .args(args)
            .current_dir(self.descriptor.source_dir())
            .env(ENGINE_CONFIG_ENV, config)
            .env(ENGINE_LABEL_ENV, self.descriptor.label())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;
        Ok(child)
    }

    async fn execute(&self, reporter: &mut dyn Reporter) -> Result<(), EngineError> {
        let mut child = self.spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::Other("stdout not captured".to_string()))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| EngineError::Other("stderr not captured".to_string()))?;
        let stderr_task = tokio::spawn(async move {
            let mut output = String::new();
            if let Err(e) = stderr.read_to_string(&mut output).await {
                warn!(error = %e, "Failed to read engine stderr");
            }
            output
        });

        let mut reader = BufReader::new(stdout);
        let mut document = Vec::new();
        loop {
            document.clear();
            if reader.read_until(DOCUMENT_DELIMITER, &mut document).await? == 0 {
                break;
            }
            if document.last() == Some(&DOCUMENT_DELIMITER) {
                document.pop();
            }
            self.forward(&document, reporter)?;
        }

        let status = child.wait().await?;
        let stderr = stderr_task.await.unwrap_or_default();

        if !status.success() {
            return Err(EngineError::Exited {
                code: status.code(),
                stderr: stderr.trim().to_string(),
            });
        }
        Ok(())
    }

    fn forward(&self, document: &[u8], reporter: &mut dyn Reporter) -> Result<(), EngineError> {
        let text = std::str::from_utf8(document)
            .map_err(|e| EngineError::InvalidOutput(format!("not UTF-8: {}", e)))?;
        if text.trim().is_empty() {
            return Ok(());
        }

        let issue = Issue::parse(text).map_err(|e| EngineError::InvalidOutput(e.to_string()))?;
        if !issue.is_issue() {
            debug!(engine = %self.descriptor.name(), kind = ?issue.kind(), "Ignoring document");
            return Ok(());
        }

        let failures = self.validations.validate(&issue);
        if !failures.is_empty() {
            let messages: Vec<&str> = failures.iter().map(|v| v.message).collect();
            return Err(EngineError::InvalidOutput(format!(
                "invalid issue {}: {}",
                text,
                messages.join(", ")
            )));
        }

        reporter.write(issue)?;
        Ok(())
    }
}

#[async_trait]
impl Engine for ProcessEngine {
    fn descriptor(&self) -> &EngineDescriptor {
        &self.descriptor
    }

    async fn run(&self, reporter: &mut dyn Reporter) -> Result<(), EngineError> {
        match self.descriptor.metadata().timeout_secs {
            Some(seconds) => tokio::time::timeout(
                Duration::from_secs(seconds),
                self.execute(reporter),
            )
            .await
            .map_err(|_| EngineError::TimedOut { seconds })?,
            None => self.execute(reporter).await,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEngineFactory;

impl EngineFactory for ProcessEngineFactory {
    fn create(&self, descriptor: EngineDescriptor) -> Result<Box<dyn Engine>, EngineError> {
        Ok(Box::new(ProcessEngine::new(descriptor)?))
    }
}
