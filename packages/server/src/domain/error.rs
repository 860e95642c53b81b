//! ドメイン層のエラー型

use thiserror::Error;

/// Value Object の検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("user id must not be empty")]
    EmptyUserId,

    #[error("user id must be at most {max} characters")]
    UserIdTooLong { max: usize },

    #[error("user id '{0}' contains whitespace, control characters or '_'")]
    InvalidUserId(String),

    #[error("message content must not be empty")]
    EmptyContent,

    #[error("message content must be at most {max} characters")]
    ContentTooLong { max: usize },

    #[error("unknown message type '{0}'")]
    UnknownMessageKind(String),
}

/// Repository（外部ストア）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("user '{0}' not found")]
    UserNotFound(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// MessagePusher のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' not found")]
    ConnectionNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),

    #[error("failed to serialize notification: {0}")]
    Serialize(String),
}

/// ConnectionRegistry のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("connection '{connection}' is already registered to user '{owner}'")]
    HandleOwnedByOtherUser { connection: String, owner: String },
}
