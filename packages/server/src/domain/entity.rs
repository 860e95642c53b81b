//! Entity 定義

use serde::Serialize;

use super::value_object::{
    ConversationId, MessageContent, MessageId, MessageKind, Timestamp, UserId,
};

/// ダイレクトメッセージ
///
/// 作成後は `read` フラグ以外変更されない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub recipient_id: UserId,
    pub content: MessageContent,
    pub kind: MessageKind,
    /// `Image` メッセージの画像参照（アップロード済みのパス）
    pub image_url: Option<String>,
    pub read: bool,
    pub created_at: Timestamp,
}

impl Message {
    /// 新規メッセージを既読なしで作成
    pub fn create(new_message: NewMessage) -> Self {
        Self {
            id: MessageId::generate(),
            conversation_id: ConversationId::between(
                &new_message.sender_id,
                &new_message.recipient_id,
            ),
            sender_id: new_message.sender_id,
            recipient_id: new_message.recipient_id,
            content: new_message.content,
            kind: new_message.kind,
            image_url: new_message.image_url,
            read: false,
            created_at: new_message.created_at,
        }
    }

    /// `user_id` から見た会話相手
    pub fn peer_of(&self, user_id: &UserId) -> &UserId {
        if &self.sender_id == user_id {
            &self.recipient_id
        } else {
            &self.sender_id
        }
    }
}

/// 永続化前のメッセージ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub sender_id: UserId,
    pub recipient_id: UserId,
    pub content: MessageContent,
    pub kind: MessageKind,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
}

impl NewMessage {
    /// テキストメッセージを作成
    pub fn text(
        sender_id: UserId,
        recipient_id: UserId,
        content: MessageContent,
        created_at: Timestamp,
    ) -> Self {
        Self {
            sender_id,
            recipient_id,
            content,
            kind: MessageKind::Text,
            image_url: None,
            created_at,
        }
    }
}

/// ユーザーレコード（外部ストアが所有）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub profile_picture: Option<String>,
    pub online: bool,
    pub last_seen: Option<Timestamp>,
}

/// ユーザーレコードに書き込むプレゼンス
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceUpdate {
    pub online: bool,
    pub last_seen: Timestamp,
}

/// プレゼンス遷移（全接続にブロードキャストされる）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceChange {
    pub user_id: UserId,
    pub online: bool,
    /// オフライン遷移時のみ設定される
    pub last_seen: Option<Timestamp>,
}

/// 会話一覧の 1 行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationSummary {
    pub peer: User,
    pub last_message: String,
    pub last_message_at: Timestamp,
    pub unread_count: usize,
}
