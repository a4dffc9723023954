//! Error types for the REST server

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RestError {
    #[error("Failed to bind REST server: {0}")]
    Bind(#[from] warp::Error),

    #[error("REST server failed to start")]
    NotReady,

    #[error("Command task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Path segment '{0}' is not valid UTF-8 after decoding")]
    InvalidSegment(String),
}

pub type Result<T> = std::result::Result<T, RestError>;
