//! UseCase: 入力中シグナルの中継（Typing Relay）
//!
//! 永続化しない。受信者が未接続なら何もせずに捨てる。

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, MessagePusher, Notification, UserId};

use super::{error::TypingError, sender::verify_sender};

/// 入力中シグナル中継のユースケース
pub struct NotifyTypingUseCase {
    registry: Arc<ConnectionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl NotifyTypingUseCase {
    pub fn new(registry: Arc<ConnectionRegistry>, message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// 受信者の接続数（シグナルが届いた数）を返す
    ///
    /// プロトコル違反の場合は `error` イベントを送信元の接続にだけ返す。
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        sender_id: &str,
        recipient_id: String,
    ) -> Result<usize, TypingError> {
        match self.relay(connection_id, sender_id, recipient_id).await {
            Ok(delivered) => Ok(delivered),
            Err(e) => {
                let rejection = Notification::Rejected {
                    event: "typing".to_string(),
                    error: e.to_string(),
                };
                if let Err(push_error) =
                    self.message_pusher.push_to(&connection_id, &rejection).await
                {
                    tracing::warn!(
                        "Failed to notify '{}' of rejected typing: {}",
                        connection_id,
                        push_error
                    );
                }
                Err(e)
            }
        }
    }

    async fn relay(
        &self,
        connection_id: ConnectionId,
        sender_id: &str,
        recipient_id: String,
    ) -> Result<usize, TypingError> {
        let sender = verify_sender(&self.registry, &connection_id, sender_id).await?;
        let recipient = UserId::new(recipient_id).map_err(TypingError::InvalidRecipient)?;

        let targets = self.registry.handles_for(&recipient).await;
        if targets.is_empty() {
            return Ok(0);
        }

        let signal = Notification::UserTyping { sender_id: sender };
        match self.message_pusher.push_to_many(&targets, &signal).await {
            Ok(delivered) => Ok(delivered),
            Err(e) => {
                tracing::warn!("Failed to relay typing to '{}': {}", recipient, e);
                Ok(0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;
    use crate::infrastructure::message_pusher::WebSocketMessagePusher;

    async fn connect_as(
        registry: &ConnectionRegistry,
        pusher: &WebSocketMessagePusher,
        user_id: &str,
    ) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let connection_id = ConnectionId::generate();
        let (tx, rx) = mpsc::unbounded_channel();
        pusher.attach(connection_id, tx).await;
        registry
            .register(UserId::new(user_id.to_string()).unwrap(), connection_id)
            .await
            .unwrap();
        (connection_id, rx)
    }

    #[tokio::test]
    async fn test_typing_reaches_all_recipient_connections() {
        // テスト項目: 入力中シグナルが受信者の全接続に届く
        // given (前提条件):
        let registry = Arc::new(ConnectionRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = NotifyTypingUseCase::new(registry.clone(), pusher.clone());
        let (h1, mut rx1) = connect_as(&registry, &pusher, "alice").await;
        let (_h3, mut rx3) = connect_as(&registry, &pusher, "bob").await;
        let (_h4, mut rx4) = connect_as(&registry, &pusher, "bob").await;

        // when (操作):
        let delivered = usecase.execute(h1, "alice", "bob".to_string()).await;

        // then (期待する結果):
        assert_eq!(delivered, Ok(2));
        for rx in [&mut rx3, &mut rx4] {
            let frame: serde_json::Value = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
            assert_eq!(frame["event"], "userTyping");
            assert_eq!(frame["data"]["senderId"], "alice");
        }
        assert!(rx1.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_typing_to_offline_recipient_is_dropped_silently() {
        // テスト項目: 未接続の受信者への入力中シグナルは黙って捨てられる
        // given (前提条件):
        let registry = Arc::new(ConnectionRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = NotifyTypingUseCase::new(registry.clone(), pusher.clone());
        let (h1, mut rx1) = connect_as(&registry, &pusher, "alice").await;

        // when (操作):
        let delivered = usecase.execute(h1, "alice", "bob".to_string()).await;

        // then (期待する結果):
        assert_eq!(delivered, Ok(0));
        assert!(rx1.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_typing_from_unregistered_connection_gets_error_event() {
        // テスト項目: 未登録の接続からの入力中シグナルには error イベントを返す
        // given (前提条件):
        let registry = Arc::new(ConnectionRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let usecase = NotifyTypingUseCase::new(registry, pusher.clone());
        let h1 = ConnectionId::generate();
        let (tx, mut rx1) = mpsc::unbounded_channel();
        pusher.attach(h1, tx).await;

        // when (操作):
        let result = usecase.execute(h1, "alice", "bob".to_string()).await;

        // then (期待する結果):
        assert_eq!(result, Err(TypingError::NotRegistered));
        let frame: serde_json::Value = serde_json::from_str(&rx1.try_recv().unwrap()).unwrap();
        assert_eq!(frame["event"], "error");
        assert_eq!(frame["data"]["event"], "typing");
    }
}
