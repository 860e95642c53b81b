//! UseCase: メッセージ送信処理（Message Relay）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 永続化、受信者の全接続へのファンアウト、送信元への messageSent
//!
//! ### なぜこのテストが必要か
//! - 受信者が複数デバイスから接続している場合に全接続へ届くことを保証
//! - 永続化失敗が送信元の接続にだけ通知されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：受信者が 2 接続、受信者が未接続
//! - 異常系：未登録の接続、送信者の不一致、空のメッセージ、永続化失敗

use std::sync::Arc;

use crate::domain::{
    ConnectionId, ConnectionRegistry, Message, MessageContent, MessagePusher, MessageRepository,
    NewMessage, Notification, Timestamp, UserId,
};
use neighborly_shared::time::Clock;

use super::{error::SendMessageError, sender::verify_sender};

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    registry: Arc<ConnectionRegistry>,
    /// Repository（データアクセス層の抽象化）
    message_repository: Arc<dyn MessageRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        message_repository: Arc<dyn MessageRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            message_repository,
            message_pusher,
            clock,
        }
    }

    /// メッセージ送信を実行
    ///
    /// 失敗した場合は `messageError` を送信元の接続にだけ返す。
    ///
    /// # Arguments
    ///
    /// * `connection_id` - sendMessage を送ってきた接続
    /// * `sender_id` - ペイロードの送信者 ID（登録ユーザーと一致する必要がある）
    /// * `recipient_id` - 受信者 ID（未検証）
    /// * `content` - メッセージ本文（未検証）
    ///
    /// # Returns
    ///
    /// * `Ok(Message)` - 永続化されたメッセージ
    /// * `Err(SendMessageError)` - 送信失敗
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        sender_id: &str,
        recipient_id: String,
        content: String,
    ) -> Result<Message, SendMessageError> {
        match self
            .relay(connection_id, sender_id, recipient_id, content)
            .await
        {
            Ok(message) => Ok(message),
            Err(e) => {
                let failure = Notification::MessageFailed {
                    error: e.to_string(),
                };
                if let Err(push_error) = self.message_pusher.push_to(&connection_id, &failure).await
                {
                    tracing::warn!(
                        "Failed to notify '{}' of send failure: {}",
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
        content: String,
    ) -> Result<Message, SendMessageError> {
        let sender = verify_sender(&self.registry, &connection_id, sender_id).await?;
        let recipient = UserId::new(recipient_id).map_err(SendMessageError::InvalidRecipient)?;
        let content = MessageContent::new(content).map_err(SendMessageError::InvalidContent)?;

        // 1. 永続化
        let new_message = NewMessage::text(
            sender,
            recipient,
            content,
            Timestamp::new(self.clock.now_millis()),
        );
        let message = self
            .message_repository
            .create(new_message)
            .await
            .map_err(SendMessageError::Persistence)?;

        // 2. 受信者の全接続へファンアウト
        let targets = self.registry.handles_for(&message.recipient_id).await;
        if targets.is_empty() {
            tracing::debug!(
                "'{}' has no live connections, message {} stored only",
                message.recipient_id,
                message.id
            );
        } else {
            match self
                .message_pusher
                .push_to_many(&targets, &Notification::MessageReceived(message.clone()))
                .await
            {
                Ok(delivered) => tracing::debug!(
                    "Delivered message {} to {}/{} connections of '{}'",
                    message.id,
                    delivered,
                    targets.len(),
                    message.recipient_id
                ),
                Err(e) => tracing::warn!("Failed to deliver message {}: {}", message.id, e),
            }
        }

        // 3. 送信元の接続にだけ送信確認
        if let Err(e) = self
            .message_pusher
            .push_to(&connection_id, &Notification::MessageSent(message.clone()))
            .await
        {
            tracing::warn!("Failed to acknowledge message {}: {}", message.id, e);
        }

        Ok(message)
    }
}
