//! Error types for the messaging client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// User ID is not a valid identity
    #[error("Invalid user ID '{0}'")]
    InvalidUserId(String),

    /// The server rejected the register event
    #[error("Registration rejected: {0}")]
    RegistrationRejected(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}
