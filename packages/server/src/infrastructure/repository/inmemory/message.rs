//! InMemory Message Repository 実装

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{
    ConversationId, Message, MessageRepository, NewMessage, RepositoryError, UserId,
};

/// インメモリ Message Repository 実装
///
/// メッセージは作成順に保持する。
#[derive(Default)]
pub struct InMemoryMessageRepository {
    messages: RwLock<Vec<Message>>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 保存されているメッセージ数
    pub async fn count(&self) -> usize {
        self.messages.read().await.len()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn create(&self, new_message: NewMessage) -> Result<Message, RepositoryError> {
        let message = Message::create(new_message);
        self.messages.write().await.push(message.clone());
        Ok(message)
    }

    async fn mark_read(
        &self,
        sender_id: &UserId,
        recipient_id: &UserId,
    ) -> Result<usize, RepositoryError> {
        let mut messages = self.messages.write().await;
        let mut updated = 0;
        for message in messages.iter_mut().filter(|m| {
            !m.read && &m.sender_id == sender_id && &m.recipient_id == recipient_id
        }) {
            message.read = true;
            updated += 1;
        }
        Ok(updated)
    }

    async fn list_by_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<Message>, RepositoryError> {
        let messages = self.messages.read().await;
        let mut thread: Vec<Message> = messages
            .iter()
            .filter(|m| &m.conversation_id == conversation_id)
            .cloned()
            .collect();
        thread.sort_by_key(|m| m.created_at);
        Ok(thread)
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Message>, RepositoryError> {
        let messages = self.messages.read().await;
        let mut related: Vec<(usize, &Message)> = messages
            .iter()
            .enumerate()
            .filter(|(_, m)| &m.sender_id == user_id || &m.recipient_id == user_id)
            .collect();
        // 作成時刻の降順、同時刻は後に保存されたものが先
        related.sort_by(|(ia, a), (ib, b)| {
            b.created_at.cmp(&a.created_at).then_with(|| ib.cmp(ia))
        });
        Ok(related.into_iter().map(|(_, m)| m.clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MessageContent, Timestamp};

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn text(from: &str, to: &str, content: &str, at: i64) -> NewMessage {
        NewMessage::text(
            user(from),
            user(to),
            MessageContent::new(content.to_string()).unwrap(),
            Timestamp::new(at),
        )
    }

    #[tokio::test]
    async fn test_create_assigns_conversation_and_unread() {
        // テスト項目: 作成したメッセージは未読で会話 ID が付与される
        // given (前提条件):
        let repo = InMemoryMessageRepository::new();

        // when (操作):
        let message = repo.create(text("bob", "alice", "hi", 1000)).await.unwrap();

        // then (期待する結果):
        assert!(!message.read);
        assert_eq!(message.conversation_id.as_str(), "alice_bob");
        assert_eq!(repo.count().await, 1);
    }

    #[tokio::test]
    async fn test_list_by_conversation_oldest_first_both_directions() {
        // テスト項目: 会話の両方向のメッセージが古い順に返される
        // given (前提条件):
        let repo = InMemoryMessageRepository::new();
        repo.create(text("alice", "bob", "second", 2000)).await.unwrap();
        repo.create(text("bob", "alice", "first", 1000)).await.unwrap();
        repo.create(text("alice", "charlie", "other", 1500)).await.unwrap();

        // when (操作):
        let thread = repo
            .list_by_conversation(&ConversationId::between(&user("bob"), &user("alice")))
            .await
            .unwrap();

        // then (期待する結果):
        let contents: Vec<&str> = thread.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_mark_read_only_one_direction() {
        // テスト項目: 既読化は指定方向（送信者 → 受信者）の未読メッセージのみ
        // given (前提条件):
        let repo = InMemoryMessageRepository::new();
        repo.create(text("bob", "alice", "1", 1000)).await.unwrap();
        repo.create(text("bob", "alice", "2", 2000)).await.unwrap();
        repo.create(text("alice", "bob", "3", 3000)).await.unwrap();

        // when (操作):
        let updated = repo.mark_read(&user("bob"), &user("alice")).await.unwrap();
        let again = repo.mark_read(&user("bob"), &user("alice")).await.unwrap();

        // then (期待する結果):
        assert_eq!(updated, 2);
        assert_eq!(again, 0);
        let thread = repo
            .list_by_conversation(&ConversationId::between(&user("alice"), &user("bob")))
            .await
            .unwrap();
        let read_flags: Vec<bool> = thread.iter().map(|m| m.read).collect();
        assert_eq!(read_flags, vec![true, true, false]);
    }

    #[tokio::test]
    async fn test_list_for_user_newest_first() {
        // テスト項目: ユーザーの関係するメッセージが新しい順に返される
        // given (前提条件):
        let repo = InMemoryMessageRepository::new();
        repo.create(text("alice", "bob", "a", 1000)).await.unwrap();
        repo.create(text("charlie", "alice", "b", 3000)).await.unwrap();
        repo.create(text("bob", "charlie", "c", 4000)).await.unwrap();
        repo.create(text("bob", "alice", "d", 2000)).await.unwrap();

        // when (操作):
        let messages = repo.list_for_user(&user("alice")).await.unwrap();

        // then (期待する結果):
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["b", "d", "a"]);
    }

    #[tokio::test]
    async fn test_list_for_user_same_timestamp_latest_insert_first() {
        // テスト項目: 同時刻のメッセージは後に保存されたものが先に返される
        // given (前提条件):
        let repo = InMemoryMessageRepository::new();
        repo.create(text("alice", "bob", "first", 5000)).await.unwrap();
        repo.create(text("bob", "alice", "second", 5000)).await.unwrap();
        repo.create(text("alice", "charlie", "third", 5000)).await.unwrap();
        repo.create(text("charlie", "alice", "older", 1000)).await.unwrap();

        // when (操作):
        let messages = repo.list_for_user(&user("alice")).await.unwrap();

        // then (期待する結果):
        let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["third", "second", "first", "older"]);
    }
}
