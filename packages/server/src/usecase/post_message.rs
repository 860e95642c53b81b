//! UseCase: REST 経由のメッセージ送信
//!
//! 永続化のみ行い、WebSocket へのファンアウトはしない。

use std::sync::Arc;

use crate::domain::{
    Message, MessageContent, MessageKind, MessageRepository, NewMessage, RepositoryError,
    Timestamp, UserId, UserRepository,
};
use neighborly_shared::time::Clock;

use super::error::PostMessageError;

/// 画像メッセージの本文
const IMAGE_MESSAGE_CONTENT: &str = "Image";

/// REST 送信の入力
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMessageInput {
    pub recipient_id: String,
    pub message_type: String,
    pub content: Option<String>,
    pub image_url: Option<String>,
}

/// REST 経由のメッセージ送信のユースケース
pub struct PostMessageUseCase {
    user_repository: Arc<dyn UserRepository>,
    message_repository: Arc<dyn MessageRepository>,
    clock: Arc<dyn Clock>,
}

impl PostMessageUseCase {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        message_repository: Arc<dyn MessageRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repository,
            message_repository,
            clock,
        }
    }

    pub async fn execute(
        &self,
        sender_id: UserId,
        input: PostMessageInput,
    ) -> Result<Message, PostMessageError> {
        let kind = MessageKind::try_from(input.message_type.as_str())
            .map_err(PostMessageError::InvalidMessage)?;
        let recipient_id =
            UserId::new(input.recipient_id).map_err(PostMessageError::InvalidRecipient)?;

        let (content, image_url) = match kind {
            MessageKind::Text => {
                let content = input.content.ok_or(PostMessageError::MissingContent)?;
                (content, None)
            }
            MessageKind::Image => {
                let image_url = input
                    .image_url
                    .filter(|url| !url.trim().is_empty())
                    .ok_or(PostMessageError::MissingImageUrl)?;
                (IMAGE_MESSAGE_CONTENT.to_string(), Some(image_url))
            }
        };
        let content = MessageContent::new(content).map_err(PostMessageError::InvalidMessage)?;

        match self.user_repository.find_by_id(&recipient_id).await {
            Ok(_) => {}
            Err(RepositoryError::UserNotFound(_)) => {
                return Err(PostMessageError::RecipientNotFound);
            }
            Err(e) => return Err(PostMessageError::Repository(e)),
        }

        let message = self
            .message_repository
            .create(NewMessage {
                sender_id,
                recipient_id,
                content,
                kind,
                image_url,
                created_at: Timestamp::new(self.clock.now_millis()),
            })
            .await
            .map_err(PostMessageError::Repository)?;
        tracing::info!(
            "Stored {} message {} from '{}' to '{}'",
            message.kind.as_str(),
            message.id,
            message.sender_id,
            message.recipient_id
        );

        Ok(message)
    }
}
