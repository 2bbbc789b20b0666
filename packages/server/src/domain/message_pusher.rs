//! MessagePusher trait 定義
//!
//! 接続への送信と、部屋単位のブロードキャストグループを抽象化します。
//! WebSocket による実装は Infrastructure 層にあります。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, RoomId};

/// Outbound channel of one connection (serialized JSON frames)
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続を登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の登録を解除し、全てのブロードキャストグループから外す
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 部屋のブロードキャストグループに参加（冪等）
    async fn join_group(
        &self,
        room: &RoomId,
        connection_id: &ConnectionId,
    ) -> Result<(), MessagePushError>;

    /// 特定の接続に送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError>;

    /// 部屋のブロードキャストグループ全員に送信し、送信できた接続数を返す
    async fn broadcast_to_group(
        &self,
        room: &RoomId,
        content: &str,
    ) -> Result<usize, MessagePushError>;

    /// 部屋のブロードキャストグループのメンバー
    async fn group_members(&self, room: &RoomId) -> Vec<ConnectionId>;
}
