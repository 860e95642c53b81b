//! UseCase: 会話一覧の取得
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - 相手ごとに最新メッセージと未読数がまとめられること
//! - 新しい会話が先に並ぶこと
//! - ユーザーレコードが存在しない相手が除外されること

use std::{collections::HashMap, sync::Arc};

use crate::domain::{
    ConversationSummary, Message, MessageRepository, RepositoryError, UserId, UserRepository,
};

use super::error::ConversationError;

/// 会話一覧取得のユースケース
pub struct ListConversationsUseCase {
    user_repository: Arc<dyn UserRepository>,
    message_repository: Arc<dyn MessageRepository>,
}

impl ListConversationsUseCase {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        message_repository: Arc<dyn MessageRepository>,
    ) -> Self {
        Self {
            user_repository,
            message_repository,
        }
    }

    /// `user_id` がメッセージを交わした相手ごとの会話（新しい順）
    pub async fn execute(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ConversationSummary>, ConversationError> {
        // 新しい順
        let messages = self.message_repository.list_for_user(user_id).await?;

        let mut peers: Vec<&UserId> = Vec::new();
        let mut latest: HashMap<&UserId, &Message> = HashMap::new();
        let mut unread: HashMap<&UserId, usize> = HashMap::new();
        for message in &messages {
            let peer = message.peer_of(user_id);
            if !latest.contains_key(peer) {
                peers.push(peer);
                latest.insert(peer, message);
            }
            if !message.read && &message.recipient_id == user_id && &message.sender_id == peer {
                *unread.entry(peer).or_default() += 1;
            }
        }

        let mut conversations = Vec::with_capacity(peers.len());
        for peer_id in peers {
            let peer = match self.user_repository.find_by_id(peer_id).await {
                Ok(peer) => peer,
                Err(RepositoryError::UserNotFound(_)) => {
                    tracing::debug!("Skipping conversation with unknown user '{}'", peer_id);
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            let Some(last) = latest.get(peer_id) else {
                continue;
            };
            conversations.push(ConversationSummary {
                peer,
                last_message: last.content.as_str().to_string(),
                last_message_at: last.created_at,
                unread_count: unread.get(peer_id).copied().unwrap_or(0),
            });
        }

        Ok(conversations)
    }
}
