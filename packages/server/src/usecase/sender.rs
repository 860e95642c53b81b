//! 送信者の検証（sendMessage / typing 共通）

use crate::domain::{ConnectionId, ConnectionRegistry, UserId};

use super::error::{SendMessageError, TypingError};

/// 送信者検証の失敗
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SenderRejection {
    NotRegistered,
    Mismatch { expected: String, actual: String },
}

/// 接続が登録済みで、ペイロードの送信者が登録ユーザーと一致することを確認
pub(crate) async fn verify_sender(
    registry: &ConnectionRegistry,
    connection_id: &ConnectionId,
    sender_id: &str,
) -> Result<UserId, SenderRejection> {
    let owner = registry
        .owner_of(connection_id)
        .await
        .ok_or(SenderRejection::NotRegistered)?;
    if owner.as_str() != sender_id {
        return Err(SenderRejection::Mismatch {
            expected: owner.into_string(),
            actual: sender_id.to_string(),
        });
    }
    Ok(owner)
}

impl From<SenderRejection> for SendMessageError {
    fn from(rejection: SenderRejection) -> Self {
        match rejection {
            SenderRejection::NotRegistered => SendMessageError::NotRegistered,
            SenderRejection::Mismatch { expected, actual } => {
                SendMessageError::SenderMismatch { expected, actual }
            }
        }
    }
}

impl From<SenderRejection> for TypingError {
    fn from(rejection: SenderRejection) -> Self {
        match rejection {
            SenderRejection::NotRegistered => TypingError::NotRegistered,
            SenderRejection::Mismatch { expected, actual } => {
                TypingError::SenderMismatch { expected, actual }
            }
        }
    }
}
