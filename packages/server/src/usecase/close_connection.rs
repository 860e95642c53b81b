//! UseCase: 接続の終了

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, MessagePusher, Removal};

use super::presence::PresenceTracker;

/// 接続終了のユースケース
///
/// 送信チャンネルの削除、レジストリからの登録解除、最後の接続なら
/// オフライン遷移を行う。同じ接続に対して 2 回呼んでも安全。
pub struct CloseConnectionUseCase {
    registry: Arc<ConnectionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
    presence: Arc<PresenceTracker>,
}

impl CloseConnectionUseCase {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
        presence: Arc<PresenceTracker>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
            presence,
        }
    }

    /// 登録済みの接続だった場合は登録解除の結果を返す
    pub async fn execute(&self, connection_id: &ConnectionId) -> Option<Removal> {
        self.message_pusher.detach(connection_id).await;

        let Some(removal) = self.registry.unregister(connection_id).await else {
            tracing::debug!("Connection '{}' closed before registering", connection_id);
            return None;
        };
        tracing::info!(
            "Connection '{}' of '{}' closed (last: {})",
            connection_id,
            removal.user_id,
            removal.last
        );

        self.presence.mark_offline_if_last(&removal).await;
        Some(removal)
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;
    use crate::{
        domain::UserId,
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryUserRepository,
        },
    };
    use neighborly_shared::time::FixedClock;

    fn user(id: &str) -> UserId {
        UserId::new(id.to_string()).unwrap()
    }

    fn offline_broadcasts(rx: &mut mpsc::UnboundedReceiver<String>) -> usize {
        let mut count = 0;
        while let Ok(frame) = rx.try_recv() {
            let value: serde_json::Value = serde_json::from_str(&frame).unwrap();
            if value["event"] == "userStatusChange" && value["data"]["online"] == false {
                count += 1;
            }
        }
        count
    }

    #[tokio::test]
    async fn test_close_twice_broadcasts_offline_once() {
        // テスト項目: 同じ接続を 2 回閉じてもオフラインは 1 回だけ
        // given (前提条件):
        let registry = Arc::new(ConnectionRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let presence = Arc::new(PresenceTracker::new(
            registry.clone(),
            Arc::new(InMemoryUserRepository::new()),
            pusher.clone(),
            Arc::new(FixedClock::new(0)),
        ));
        let (observer_tx, mut observer) = mpsc::unbounded_channel();
        pusher.attach(ConnectionId::generate(), observer_tx).await;

        let h1 = ConnectionId::generate();
        let (tx, _rx) = mpsc::unbounded_channel();
        pusher.attach(h1, tx).await;
        let registration = registry.register(user("bob"), h1).await.unwrap();
        presence.mark_online_if_first(&user("bob"), registration).await;

        let usecase = CloseConnectionUseCase::new(registry.clone(), pusher.clone(), presence);

        // when (操作):
        let first = usecase.execute(&h1).await;
        let second = usecase.execute(&h1).await;

        // then (期待する結果):
        assert_eq!(
            first,
            Some(Removal {
                user_id: user("bob"),
                last: true
            })
        );
        assert_eq!(second, None);
        assert_eq!(offline_broadcasts(&mut observer), 1);
        assert_eq!(pusher.connection_count().await, 1);
    }

    #[tokio::test]
    async fn test_close_unregistered_connection_only_detaches() {
        // テスト項目: register 前に閉じた接続は送信チャンネルの削除だけ行う
        // given (前提条件):
        let registry = Arc::new(ConnectionRegistry::new());
        let pusher = Arc::new(WebSocketMessagePusher::new());
        let presence = Arc::new(PresenceTracker::new(
            registry.clone(),
            Arc::new(InMemoryUserRepository::new()),
            pusher.clone(),
            Arc::new(FixedClock::new(0)),
        ));
        let h1 = ConnectionId::generate();
        let (tx, _rx) = mpsc::unbounded_channel();
        pusher.attach(h1, tx).await;
        let usecase = CloseConnectionUseCase::new(registry, pusher.clone(), presence);

        // when (操作):
        let removal = usecase.execute(&h1).await;

        // then (期待する結果):
        assert_eq!(removal, None);
        assert_eq!(pusher.connection_count().await, 0);
    }
}
