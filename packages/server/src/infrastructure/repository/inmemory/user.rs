//! InMemory User Repository 実装

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{PresenceUpdate, RepositoryError, User, UserId, UserRepository};

/// インメモリ User Repository 実装
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 初期ユーザーを持つ Repository を作成
    pub fn with_users(users: Vec<User>) -> Self {
        let users = users
            .into_iter()
            .map(|user| (user.id.clone(), user))
            .collect();
        Self {
            users: RwLock::new(users),
        }
    }

    /// ユーザーを追加（同じ ID は上書き）
    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.id.clone(), user);
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, user_id: &UserId) -> Result<User, RepositoryError> {
        let users = self.users.read().await;
        users
            .get(user_id)
            .cloned()
            .ok_or_else(|| RepositoryError::UserNotFound(user_id.to_string()))
    }

    async fn update_presence(
        &self,
        user_id: &UserId,
        update: PresenceUpdate,
    ) -> Result<(), RepositoryError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(user_id)
            .ok_or_else(|| RepositoryError::UserNotFound(user_id.to_string()))?;
        user.online = update.online;
        user.last_seen = Some(update.last_seen);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<User>, RepositoryError> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(all)
    }
}
