use thiserror::Error;

#[derive(Error, Debug)]
pub enum FdError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    #[error("Reviewer input closed before an answer was given")]
    ReviewerClosed,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FdError>;
