use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("snapshot I/O failed")]
    Io(#[from] std::io::Error),

    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid slot name '{0}'")]
    InvalidSlot(String),
}
