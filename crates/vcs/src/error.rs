use thiserror::Error;

#[derive(Debug, Error)]
pub enum VcsError {
    #[error("Command execution failed: {0}")]
    CommandFailed(String),

    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, VcsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VcsError::CommandNotFound("git".to_string());
        assert_eq!(err.to_string(), "Command not found: git");
    }
}
