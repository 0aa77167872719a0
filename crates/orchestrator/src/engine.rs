use analyzer_core::EngineDescriptor;
use async_trait::async_trait;
use thiserror::Error;

use crate::reporter::{ReportError, Reporter};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("exited with status {code:?}: {stderr}")]
    Exited { code: Option<i32>, stderr: String },

    #[error("timed out after {seconds}s")]
    TimedOut { seconds: u64 },

    #[error("invalid output: {0}")]
    InvalidOutput(String),

    #[error("not runnable: {0}")]
    NotRunnable(String),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("{0}")]
    Other(String),
}

/// An engine instantiated for one run.
///
/// `run` writes findings to the reporter; a returned error aborts the
/// remaining engines of the run.
#[async_trait]
pub trait Engine: Send + Sync {
    fn descriptor(&self) -> &EngineDescriptor;

    async fn run(&self, reporter: &mut dyn Reporter) -> Result<(), EngineError>;
}

/// Turns descriptors into runnable engines.
pub trait EngineFactory: Send + Sync {
    fn create(&self, descriptor: EngineDescriptor) -> Result<Box<dyn Engine>, EngineError>;
}
