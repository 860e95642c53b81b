//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ハンドルごとの `UnboundedSender` を管理
//! - `Notification` を JSON テキストフレームにシリアライズして送信
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われ、
//! この実装は生成された sender を受け取って送信だけを担当します。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ConnectionId, MessagePushError, MessagePusher, Notification, PusherChannel},
    infrastructure::dto::websocket::ServerEvent,
};

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// 接続中の WebSocket sender
    ///
    /// Key: ConnectionId
    /// Value: PusherChannel
    channels: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
        }
    }

    /// 接続中のチャンネル数
    pub async fn connection_count(&self) -> usize {
        self.channels.lock().await.len()
    }

    fn serialize(notification: &Notification) -> Result<String, MessagePushError> {
        serde_json::to_string(&ServerEvent::from(notification))
            .map_err(|e| MessagePushError::Serialize(e.to_string()))
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn attach(&self, connection_id: ConnectionId, channel: PusherChannel) {
        let mut channels = self.channels.lock().await;
        channels.insert(connection_id, channel);
        tracing::debug!("Connection '{}' attached to MessagePusher", connection_id);
    }

    async fn detach(&self, connection_id: &ConnectionId) {
        let mut channels = self.channels.lock().await;
        if channels.remove(connection_id).is_some() {
            tracing::debug!("Connection '{}' detached from MessagePusher", connection_id);
        }
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), MessagePushError> {
        let frame = Self::serialize(notification)?;
        let channels = self.channels.lock().await;

        let channel = channels
            .get(connection_id)
            .ok_or_else(|| MessagePushError::ConnectionNotFound(connection_id.to_string()))?;
        channel
            .send(frame)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed notification to connection '{}'", connection_id);
        Ok(())
    }

    async fn push_to_many(
        &self,
        connection_ids: &[ConnectionId],
        notification: &Notification,
    ) -> Result<usize, MessagePushError> {
        if connection_ids.is_empty() {
            return Ok(0);
        }

        let frame = Self::serialize(notification)?;
        let channels = self.channels.lock().await;

        let mut delivered = 0;
        for connection_id in connection_ids {
            match channels.get(connection_id) {
                // 複数送信では一部の送信失敗を許容
                Some(channel) => match channel.send(frame.clone()) {
                    Ok(()) => delivered += 1,
                    Err(e) => tracing::warn!(
                        "Failed to push notification to connection '{}': {}",
                        connection_id,
                        e
                    ),
                },
                None => tracing::warn!(
                    "Connection '{}' not found during fan-out, skipping",
                    connection_id
                ),
            }
        }

        Ok(delivered)
    }

    async fn broadcast(&self, notification: &Notification) -> Result<usize, MessagePushError> {
        let frame = Self::serialize(notification)?;
        let channels = self.channels.lock().await;

        let mut delivered = 0;
        for (connection_id, channel) in channels.iter() {
            if let Err(e) = channel.send(frame.clone()) {
                tracing::warn!(
                    "Failed to broadcast to connection '{}': {}",
                    connection_id,
                    e
                );
            } else {
                delivered += 1;
            }
        }
        tracing::debug!("Broadcasted notification to {} connections", delivered);

        Ok(delivered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - push_to: 特定の接続への送信
    // - push_to_many: 複数接続への送信（部分失敗の許容）
    // - broadcast: 全接続への送信
    // - detach 後は送信されないこと
    // ========================================

    fn typing_from(id: &str) -> Notification {
        Notification::UserTyping {
            sender_id: UserId::new(id.to_string()).unwrap(),
        }
    }

    const ALICE_TYPING: &str = r#"{"event":"userTyping","data":{"senderId":"alice"}}"#;

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定の接続に JSON フレームを送信できる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        let connection = ConnectionId::generate();
        pusher.attach(connection, tx).await;

        // when (操作):
        let result = pusher.push_to(&connection, &typing_from("alice")).await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some(ALICE_TYPING.to_string()));
    }

    #[tokio::test]
    async fn test_push_to_connection_not_found() {
        // テスト項目: 存在しない接続への送信はエラーを返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();

        // when (操作):
        let result = pusher
            .push_to(&ConnectionId::generate(), &typing_from("alice"))
            .await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(MessagePushError::ConnectionNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_push_to_many_partial_failure() {
        // テスト項目: 一部の接続が存在しなくても残りには届き、届いた数が返る
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, rx2) = mpsc::unbounded_channel();
        let h1 = ConnectionId::generate();
        let h2 = ConnectionId::generate();
        pusher.attach(h1, tx1).await;
        pusher.attach(h2, tx2).await;
        drop(rx2); // h2 の受信側は閉じている

        // when (操作):
        let targets = vec![h1, h2, ConnectionId::generate()];
        let result = pusher.push_to_many(&targets, &typing_from("alice")).await;

        // then (期待する結果):
        assert_eq!(result, Ok(1));
        assert_eq!(rx1.recv().await, Some(ALICE_TYPING.to_string()));
    }

    #[tokio::test]
    async fn test_push_to_many_empty_targets() {
        // テスト項目: 空のターゲットリストでもエラーにならない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();

        // when (操作):
        let result = pusher.push_to_many(&[], &typing_from("alice")).await;

        // then (期待する結果):
        assert_eq!(result, Ok(0));
    }

    #[tokio::test]
    async fn test_broadcast_reaches_every_attached_connection() {
        // テスト項目: broadcast は全接続に届く
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        pusher.attach(ConnectionId::generate(), tx1).await;
        pusher.attach(ConnectionId::generate(), tx2).await;

        // when (操作):
        let result = pusher.broadcast(&typing_from("alice")).await;

        // then (期待する結果):
        assert_eq!(result, Ok(2));
        assert_eq!(rx1.recv().await, Some(ALICE_TYPING.to_string()));
        assert_eq!(rx2.recv().await, Some(ALICE_TYPING.to_string()));
    }

    #[tokio::test]
    async fn test_detach_stops_delivery() {
        // テスト項目: detach した接続には送信されない（二重 detach も問題ない）
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let connection = ConnectionId::generate();
        pusher.attach(connection, tx).await;

        // when (操作):
        pusher.detach(&connection).await;
        pusher.detach(&connection).await;

        // then (期待する結果):
        assert_eq!(pusher.connection_count().await, 0);
        assert_eq!(pusher.broadcast(&typing_from("alice")).await, Ok(0));
    }
}
