//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::{
    ConversationId, Message, NewMessage, PresenceUpdate, RepositoryError, User, UserId,
};

/// User Repository trait
///
/// ユーザーレコードを所有する外部ストアへのインターフェース。
/// キー検索のみを前提とし、メッセージ永続化とのトランザクションは持たない。
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// ID でユーザーを取得
    async fn find_by_id(&self, user_id: &UserId) -> Result<User, RepositoryError>;

    /// プレゼンス（online, last_seen）を更新
    async fn update_presence(
        &self,
        user_id: &UserId,
        update: PresenceUpdate,
    ) -> Result<(), RepositoryError>;

    /// 全ユーザーを取得
    async fn list_all(&self) -> Result<Vec<User>, RepositoryError>;
}

/// Message Repository trait
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// メッセージを永続化して返す
    async fn create(&self, new_message: NewMessage) -> Result<Message, RepositoryError>;

    /// `sender_id` から `recipient_id` への未読メッセージを既読にする
    ///
    /// 変更した件数を返す。
    async fn mark_read(
        &self,
        sender_id: &UserId,
        recipient_id: &UserId,
    ) -> Result<usize, RepositoryError>;

    /// 会話のメッセージを古い順に取得
    async fn list_by_conversation(
        &self,
        conversation_id: &ConversationId,
    ) -> Result<Vec<Message>, RepositoryError>;

    /// ユーザーが送信または受信したメッセージを新しい順に取得
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Message>, RepositoryError>;
}
