//! UseCase: ユーザー登録（register イベント）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RegisterUserUseCase::execute() メソッド
//! - 接続ハンドルの登録、registered 応答、プレゼンス遷移
//!
//! ### どのような状況を想定しているか
//! - 正常系：最初の接続（オンライン遷移あり）、2 つ目の接続（遷移なし）
//! - 異常系：不正なユーザー ID、別ユーザーとして登録済みの接続

use std::sync::Arc;

use crate::domain::{
    ConnectionId, ConnectionRegistry, MessagePusher, Notification, Registration, UserId,
};

use super::{error::RegisterError, presence::PresenceTracker};

/// ユーザー登録のユースケース
pub struct RegisterUserUseCase {
    registry: Arc<ConnectionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
    presence: Arc<PresenceTracker>,
}

impl RegisterUserUseCase {
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

    /// 接続をユーザーに登録
    ///
    /// 失敗した場合は `error` イベントを登録しようとした接続にだけ返す。
    ///
    /// # Arguments
    ///
    /// * `connection_id` - register を送ってきた接続
    /// * `user_id` - ペイロードのユーザー ID（未検証）
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        user_id: String,
    ) -> Result<Registration, RegisterError> {
        let result = self.register(connection_id, user_id).await;

        if let Err(e) = &result {
            let rejection = Notification::Rejected {
                event: "register".to_string(),
                error: e.to_string(),
            };
            if let Err(push_error) = self.message_pusher.push_to(&connection_id, &rejection).await
            {
                tracing::warn!(
                    "Failed to notify '{}' of rejected register: {}",
                    connection_id,
                    push_error
                );
            }
        }

        result
    }

    async fn register(
        &self,
        connection_id: ConnectionId,
        user_id: String,
    ) -> Result<Registration, RegisterError> {
        let user_id = UserId::new(user_id).map_err(RegisterError::InvalidUserId)?;

        // 1. レジストリに登録（0 → 1 遷移の判定もここで行われる）
        let registration = self.registry.register(user_id.clone(), connection_id).await?;
        tracing::info!(
            "Connection '{}' registered as '{}' (first: {})",
            connection_id,
            user_id,
            registration.first
        );

        // 2. 登録した接続に応答
        let ack = Notification::Registered {
            user_id: user_id.clone(),
            online_users: self.registry.online_users().await,
        };
        if let Err(e) = self.message_pusher.push_to(&connection_id, &ack).await {
            tracing::warn!("Failed to acknowledge register of '{}': {}", connection_id, e);
        }

        // 3. プレゼンス遷移
        self.presence
            .mark_online_if_first(&user_id, registration)
            .await;

        Ok(registration)
    }
}
