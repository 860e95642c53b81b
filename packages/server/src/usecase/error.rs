//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{RegistryError, RepositoryError, ValueObjectError};

/// register イベントのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegisterError {
    #[error("invalid user id: {0}")]
    InvalidUserId(ValueObjectError),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// sendMessage イベントのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error("connection is not registered")]
    NotRegistered,

    #[error("sender '{actual}' does not match registered user '{expected}'")]
    SenderMismatch { expected: String, actual: String },

    #[error("invalid recipient id: {0}")]
    InvalidRecipient(ValueObjectError),

    #[error("invalid content: {0}")]
    InvalidContent(ValueObjectError),

    #[error("failed to save message: {0}")]
    Persistence(RepositoryError),
}

/// typing イベントのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypingError {
    #[error("connection is not registered")]
    NotRegistered,

    #[error("sender '{actual}' does not match registered user '{expected}'")]
    SenderMismatch { expected: String, actual: String },

    #[error("invalid recipient id: {0}")]
    InvalidRecipient(ValueObjectError),
}

/// REST 経由のメッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostMessageError {
    #[error("invalid recipient id: {0}")]
    InvalidRecipient(ValueObjectError),

    #[error("recipient not found")]
    RecipientNotFound,

    #[error("text message requires content")]
    MissingContent,

    #[error("image message requires an image url")]
    MissingImageUrl,

    #[error(transparent)]
    InvalidMessage(ValueObjectError),

    #[error("failed to save message: {0}")]
    Repository(RepositoryError),
}

/// 会話・履歴の取得と既読化のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversationError {
    #[error("invalid user id: {0}")]
    InvalidUserId(#[from] ValueObjectError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
