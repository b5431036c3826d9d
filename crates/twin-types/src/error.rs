use thiserror::Error;

/// Errors from session store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(String),

    #[error("object storage error: {0}")]
    Backend(String),

    #[error("corrupt conversation log: {0}")]
    Decode(String),

    #[error("failed to encode conversation log: {0}")]
    Encode(String),
}

/// Classified failures of a chat turn.
///
/// This is the closed taxonomy the HTTP layer maps onto status codes.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("{0}")]
    StorageUnavailable(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    AccessDenied(String),

    #[error("{0}")]
    BackendFailure(String),

    #[error("unexpected response shape: {0}")]
    UnexpectedResponseShape(String),
}

impl From<StoreError> for ChatError {
    fn from(e: StoreError) -> Self {
        ChatError::StorageUnavailable(e.to_string())
    }
}
