//! サーバーから接続へ送る通知
//!
//! UseCase 層はこの列挙型だけを扱い、ワイヤー形式（JSON）への変換は
//! MessagePusher の実装が担当する。

use super::{Message, PresenceChange, UserId};

/// 接続に push される通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// register の応答（登録した接続のみ）
    Registered {
        user_id: UserId,
        online_users: Vec<UserId>,
    },
    /// 受信者の全接続へ配信されるメッセージ
    MessageReceived(Message),
    /// 送信元の接続への送信確認
    MessageSent(Message),
    /// 送信失敗（送信元の接続のみ）
    MessageFailed { error: String },
    /// 入力中シグナル
    UserTyping { sender_id: UserId },
    /// プレゼンス遷移（全接続）
    PresenceChanged(PresenceChange),
    /// プロトコル違反の拒否（違反した接続のみ）
    Rejected { event: String, error: String },
}
