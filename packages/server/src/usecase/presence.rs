//! Presence Tracker
//!
//! ConnectionRegistry の占有状況からユーザーのオンライン / オフラインを導出し、
//! 遷移をユーザーレコードへ書き込んで全接続にブロードキャストする。
//!
//! ## 遷移の直列化
//!
//! 同じユーザーの遷移はユーザーごとのロックで直列化する。ロック内で
//! レジストリの現在の占有状況を読み直し、最後に公開した状態と異なる場合だけ
//! 公開する。接続と切断が競合しても、最終的な状態はレジストリと一致し、
//! 正味の遷移 1 回につきブロードキャストは最大 1 回になる。

use std::{collections::HashMap, sync::Arc};

use tokio::sync::Mutex;

use crate::domain::{
    ConnectionRegistry, MessagePusher, Notification, PresenceChange, PresenceUpdate,
    Registration, Removal, Timestamp, UserId, UserRepository,
};
use neighborly_shared::time::Clock;

/// 最後に公開したプレゼンス
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PresenceState {
    pub online: bool,
    pub last_seen: Option<Timestamp>,
}

/// プレゼンスの追跡
pub struct PresenceTracker {
    registry: Arc<ConnectionRegistry>,
    user_repository: Arc<dyn UserRepository>,
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
    /// ユーザーごとのエントリ。遅延作成し、削除しない
    entries: Mutex<HashMap<UserId, Arc<Mutex<PresenceState>>>>,
}

impl PresenceTracker {
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        user_repository: Arc<dyn UserRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            user_repository,
            message_pusher,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// 最初の接続ならオンラインにする
    ///
    /// 公開した遷移を返す。
    pub async fn mark_online_if_first(
        &self,
        user_id: &UserId,
        registration: Registration,
    ) -> Option<PresenceChange> {
        if !registration.first {
            return None;
        }
        self.reconcile(user_id).await
    }

    /// 最後の接続ならオフラインにする
    pub async fn mark_offline_if_last(&self, removal: &Removal) -> Option<PresenceChange> {
        if !removal.last {
            return None;
        }
        self.reconcile(&removal.user_id).await
    }

    /// 最後に公開したプレゼンス（未接続のユーザーはオフライン）
    pub async fn presence_of(&self, user_id: &UserId) -> PresenceState {
        let entry = {
            let entries = self.entries.lock().await;
            entries.get(user_id).cloned()
        };
        match entry {
            Some(entry) => *entry.lock().await,
            None => PresenceState::default(),
        }
    }

    async fn entry(&self, user_id: &UserId) -> Arc<Mutex<PresenceState>> {
        let mut entries = self.entries.lock().await;
        entries.entry(user_id.clone()).or_default().clone()
    }

    async fn reconcile(&self, user_id: &UserId) -> Option<PresenceChange> {
        let entry = self.entry(user_id).await;
        let mut state = entry.lock().await;

        let online = self.registry.is_connected(user_id).await;
        if state.online == online {
            tracing::debug!(
                "Presence of '{}' already published as online={}, skipping",
                user_id,
                online
            );
            return None;
        }

        let now = Timestamp::new(self.clock.now_millis());
        if let Err(e) = self
            .user_repository
            .update_presence(
                user_id,
                PresenceUpdate {
                    online,
                    last_seen: now,
                },
            )
            .await
        {
            tracing::warn!("Failed to persist presence of '{}': {}", user_id, e);
        }

        state.online = online;
        state.last_seen = Some(now);

        let change = PresenceChange {
            user_id: user_id.clone(),
            online,
            last_seen: (!online).then_some(now),
        };
        match self
            .message_pusher
            .broadcast(&Notification::PresenceChanged(change.clone()))
            .await
        {
            Ok(delivered) => tracing::info!(
                "User '{}' is now {} (notified {} connections)",
                user_id,
                if online { "online" } else { "offline" },
                delivered
            ),
            Err(e) => tracing::warn!("Failed to broadcast presence of '{}': {}", user_id, e),
        }

        Some(change)
    }
}
