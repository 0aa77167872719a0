use std::path::PathBuf;
use thiserror::Error;

use orchestrator::OrchestratorError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Registry file not found: {0}")]
    RegistryNotFound(PathBuf),

    #[error("Invalid registry {path}: {reason}")]
    InvalidRegistry { path: PathBuf, reason: String },
}

/// Process exit code for a failed command.
pub fn exit_code(error: &anyhow::Error) -> u8 {
    if let Some(e) = error.downcast_ref::<OrchestratorError>() {
        return match e {
            OrchestratorError::NoEnabledEngines => 2,
            OrchestratorError::InvalidEngineName { .. } => 3,
            e if e.is_configuration_error() => 4,
            _ => 1,
        };
    }

    match error.downcast_ref::<CliError>() {
        Some(_) => 4,
        None => 1,
    }
}
