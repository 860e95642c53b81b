//! UseCase: 接続の開始

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel};

/// 新しい WebSocket 接続の送信チャンネルを登録するユースケース
///
/// この時点ではまだユーザーに紐付かない。紐付けは `register` イベントで行う。
pub struct OpenConnectionUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl OpenConnectionUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    pub async fn execute(&self, connection_id: ConnectionId, channel: PusherChannel) {
        self.message_pusher.attach(connection_id, channel).await;
        tracing::info!("Connection '{}' opened", connection_id);
    }
}
