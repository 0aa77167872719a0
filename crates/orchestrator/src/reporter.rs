//! Sink for run lifecycle events and findings.

use analyzer_core::{EngineDescriptor, Issue};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Reporter already closed")]
    Closed,
}

/// Receives the lifecycle of one run and the findings engines emit.
///
/// The orchestrator drives the calls in the order
/// `started → (engine_started → write* → engine_finished)* → finished → close`.
/// `finished` is skipped when an engine fails; `close` never is.
pub trait Reporter: Send {
    fn started(&mut self) -> Result<(), ReportError>;

    /// Opens the bracket around one engine's run.
    fn engine_started(&mut self, engine: &EngineDescriptor) -> Result<(), ReportError>;

    fn write(&mut self, issue: Issue) -> Result<(), ReportError>;

    /// Closes the bracket, whether or not the engine succeeded.
    fn engine_finished(&mut self, engine: &EngineDescriptor) -> Result<(), ReportError>;

    fn finished(&mut self) -> Result<(), ReportError>;

    fn close(&mut self) -> Result<(), ReportError>;
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn started(&mut self) -> Result<(), ReportError> {
        (**self).started()
    }

    fn engine_started(&mut self, engine: &EngineDescriptor) -> Result<(), ReportError> {
        (**self).engine_started(engine)
    }

    fn write(&mut self, issue: Issue) -> Result<(), ReportError> {
        (**self).write(issue)
    }

    fn engine_finished(&mut self, engine: &EngineDescriptor) -> Result<(), ReportError> {
        (**self).engine_finished(engine)
    }

    fn finished(&mut self) -> Result<(), ReportError> {
        (**self).finished()
    }

    fn close(&mut self) -> Result<(), ReportError> {
        (**self).close()
    }
}
