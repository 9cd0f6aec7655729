use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors raised while reading, decoding or answering protocol messages.
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    /// The underlying stream failed.
    Io(#[from] io::Error),

    #[error("malformed JSON: {0}")]
    /// A message body was not valid JSON.
    Json(#[from] serde_json::Error),

    #[error("invalid params: {0}")]
    /// A request or notification carried params of the wrong shape.
    InvalidParams(String),

    #[error("missing Content-Length header")]
    /// A header block ended without `Content-Length`.
    MissingContentLength,

    #[error("message of {0} bytes exceeds the size limit")]
    /// `Content-Length` is larger than [`crate::transport::MAX_CONTENT_LENGTH`].
    MessageTooLarge(usize),
}

/// Result alias for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
