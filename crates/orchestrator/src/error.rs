use thiserror::Error;

use crate::engine::EngineError;
use crate::reporter::ReportError;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("No enabled engines")]
    NoEnabledEngines,

    #[error("Invalid engine name '{name}': {reason}")]
    InvalidEngineName { name: String, reason: String },

    #[error("Engine '{0}' is not in the registry")]
    UnknownEngine(String),

    #[error("Invalid exclude pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Version control query failed: {0}")]
    Vcs(#[from] vcs::VcsError),

    #[error("Engine '{engine}' failed: {source}")]
    EngineFailed {
        engine: String,
        #[source]
        source: EngineError,
    },

    #[error("Reporter error: {0}")]
    Reporter(#[from] ReportError),

    #[error("Invalid state transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OrchestratorError {
    /// Create an invalid engine name error.
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEngineName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an engine failure error.
    pub fn engine_failed(engine: impl Into<String>, source: EngineError) -> Self {
        Self::EngineFailed {
            engine: engine.into(),
            source,
        }
    }

    /// Whether the error comes from user configuration rather than a fault
    /// during the run.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::NoEnabledEngines
                | Self::InvalidEngineName { .. }
                | Self::UnknownEngine(_)
                | Self::InvalidPattern { .. }
                | Self::Config(_)
        )
    }
}

impl From<serde_yaml::Error> for OrchestratorError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors() {
        assert!(OrchestratorError::NoEnabledEngines.is_configuration_error());
        assert!(OrchestratorError::invalid_name("Bad Name", "spaces").is_configuration_error());
        assert!(!OrchestratorError::engine_failed(
            "rubocop",
            EngineError::Other("boom".to_string())
        )
        .is_configuration_error());
    }

    #[test]
    fn test_engine_failed_display() {
        let err = OrchestratorError::engine_failed("rubocop", EngineError::Other("boom".to_string()));
        assert_eq!(err.to_string(), "Engine 'rubocop' failed: boom");
    }
}
