use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid issue document: {0}")]
    InvalidIssue(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
