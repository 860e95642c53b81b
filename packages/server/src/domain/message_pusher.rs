//! MessagePusher trait 定義
//!
//! 接続ハンドルごとの送信チャンネルを管理し、通知を届けるインターフェース。
//! MessagePusher が知っているのは接続だけで、ユーザーとの対応は
//! `ConnectionRegistry` が所有する。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, Notification};

/// 接続への送信チャンネル（シリアライズ済みのテキストフレーム）
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信チャンネルを登録
    async fn attach(&self, connection_id: ConnectionId, channel: PusherChannel);

    /// 接続の送信チャンネルを削除（存在しなければ何もしない）
    async fn detach(&self, connection_id: &ConnectionId);

    /// 特定の接続へ送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), MessagePushError>;

    /// 複数の接続へ送信
    ///
    /// 一部の接続への送信失敗は許容し、届いた接続数を返す。
    async fn push_to_many(
        &self,
        connection_ids: &[ConnectionId],
        notification: &Notification,
    ) -> Result<usize, MessagePushError>;

    /// 登録済みかどうかに関わらず全接続へ送信
    async fn broadcast(&self, notification: &Notification) -> Result<usize, MessagePushError>;
}
