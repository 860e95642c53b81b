//! UseCase: 既読化

use std::sync::Arc;

use crate::domain::{MessageRepository, UserId};

use super::error::ConversationError;

/// 既読化のユースケース
pub struct MarkAsReadUseCase {
    message_repository: Arc<dyn MessageRepository>,
}

impl MarkAsReadUseCase {
    pub fn new(message_repository: Arc<dyn MessageRepository>) -> Self {
        Self { message_repository }
    }

    /// `peer_id` から `user_id` への未読メッセージを既読にし、件数を返す
    pub async fn execute(
        &self,
        user_id: &UserId,
        peer_id: String,
    ) -> Result<usize, ConversationError> {
        let peer_id = UserId::new(peer_id)?;
        let updated = self.message_repository.mark_read(&peer_id, user_id).await?;
        tracing::debug!(
            "Marked {} messages from '{}' to '{}' as read",
            updated,
            peer_id,
            user_id
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MockMessageRepository;

    #[tokio::test]
    async fn test_mark_as_read_marks_messages_from_peer() {
        // テスト項目: 相手から自分宛ての方向で既読化される
        // given (前提条件):
        let mut messages = MockMessageRepository::new();
        messages
            .expect_mark_read()
            .withf(|sender, recipient| sender.as_str() == "bob" && recipient.as_str() == "alice")
            .times(1)
            .returning(|_, _| Ok(3));
        let usecase = MarkAsReadUseCase::new(Arc::new(messages));
        let alice = UserId::new("alice".to_string()).unwrap();

        // when (操作):
        let result = usecase.execute(&alice, "bob".to_string()).await;

        // then (期待する結果):
        assert_eq!(result, Ok(3));
    }
}
