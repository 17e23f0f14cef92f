//! Session store error types

use thiserror::Error;

/// Result type for session store operations.
pub type StoreResult<T> = Result<T, SessionError>;

/// Errors that can occur during session store operations
#[derive(Debug, Error)]
pub enum SessionError {
    /// Malformed session ID, rejected before any I/O
    #[error("Invalid session ID: {0}")]
    InvalidSessionId(String),

    /// A record could not be encoded, or stored bytes could not be decoded
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Failure reported by the key-value client
    #[error("Session store error: {0}")]
    StoreError(String),

    /// Redis error (when redis-store feature is enabled)
    #[cfg(feature = "redis-store")]
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),
}

/// Broad category of a [`SessionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad session identifier
    Validation,
    /// Encode/decode failure
    Serialization,
    /// Underlying client failure (network, protocol, closed connection)
    Store,
}

impl SessionError {
    /// The category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SessionError::InvalidSessionId(_) => ErrorKind::Validation,
            SessionError::SerializationError(_) => ErrorKind::Serialization,
            SessionError::StoreError(_) => ErrorKind::Store,
            #[cfg(feature = "redis-store")]
            SessionError::RedisError(_) => ErrorKind::Store,
        }
    }

    /// Whether this error was raised by session ID validation.
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(err: serde_json::Error) -> Self {
        SessionError::SerializationError(err.to_string())
    }
}
