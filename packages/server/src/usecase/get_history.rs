//! UseCase: 会話履歴の取得

use std::sync::Arc;

use crate::domain::{ConversationId, Message, MessageRepository, UserId};

use super::error::ConversationError;

/// 会話履歴取得のユースケース
pub struct GetHistoryUseCase {
    message_repository: Arc<dyn MessageRepository>,
}

impl GetHistoryUseCase {
    pub fn new(message_repository: Arc<dyn MessageRepository>) -> Self {
        Self { message_repository }
    }

    /// `user_id` と `peer_id` の会話の全メッセージ（古い順）
    pub async fn execute(
        &self,
        user_id: &UserId,
        peer_id: String,
    ) -> Result<Vec<Message>, ConversationError> {
        let peer_id = UserId::new(peer_id)?;
        let conversation_id = ConversationId::between(user_id, &peer_id);
        let messages = self
            .message_repository
            .list_by_conversation(&conversation_id)
            .await?;
        Ok(messages)
    }
}
