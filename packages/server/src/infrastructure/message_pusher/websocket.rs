//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - WebSocket の `UnboundedSender` を管理
//! - 部屋ごとのブロードキャストグループ（部屋 → 接続の集合）を管理
//! - クライアントへのメッセージ送信（push_to, broadcast_to_group）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `UnboundedSender` を受け取り、メッセージ送信に使用します。

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, PusherChannel, RoomId};

#[derive(Default)]
struct Registry {
    /// Key: connection id, Value: outbound channel
    clients: HashMap<ConnectionId, PusherChannel>,
    /// Key: room, Value: subscribed connections
    groups: HashMap<RoomId, HashSet<ConnectionId>>,
}

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let pusher = WebSocketMessagePusher::new();
/// pusher.register_client(connection_id.clone(), tx).await;
/// pusher.join_group(&room, &connection_id).await?;
/// pusher.broadcast_to_group(&room, "{\"event\":\"pointer_hide\",\"data\":{}}").await?;
/// ```
#[derive(Default)]
pub struct WebSocketMessagePusher {
    registry: Mutex<Registry>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut registry = self.registry.lock().await;
        tracing::debug!("Connection '{}' registered to MessagePusher", connection_id);
        registry.clients.insert(connection_id, sender);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut registry = self.registry.lock().await;
        registry.clients.remove(connection_id);
        registry.groups.retain(|_, members| {
            members.remove(connection_id);
            !members.is_empty()
        });
        tracing::debug!(
            "Connection '{}' unregistered from MessagePusher",
            connection_id
        );
    }

    async fn join_group(
        &self,
        room: &RoomId,
        connection_id: &ConnectionId,
    ) -> Result<(), MessagePushError> {
        let mut registry = self.registry.lock().await;
        if !registry.clients.contains_key(connection_id) {
            return Err(MessagePushError::ClientNotFound(
                connection_id.as_str().to_string(),
            ));
        }
        let newly_joined = registry
            .groups
            .entry(room.clone())
            .or_default()
            .insert(connection_id.clone());
        if newly_joined {
            tracing::debug!("Connection '{}' joined room '{}'", connection_id, room);
        }
        Ok(())
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let registry = self.registry.lock().await;

        if let Some(sender) = registry.clients.get(connection_id) {
            sender
                .send(content.to_string())
                .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
            tracing::debug!("Pushed message to connection '{}'", connection_id);
            Ok(())
        } else {
            Err(MessagePushError::ClientNotFound(
                connection_id.as_str().to_string(),
            ))
        }
    }

    async fn broadcast_to_group(
        &self,
        room: &RoomId,
        content: &str,
    ) -> Result<usize, MessagePushError> {
        let registry = self.registry.lock().await;
        let Some(members) = registry.groups.get(room) else {
            return Ok(0);
        };

        let mut delivered = 0;
        for member in members {
            match registry.clients.get(member) {
                // ブロードキャストでは一部の送信失敗を許容
                Some(sender) => match sender.send(content.to_string()) {
                    Ok(()) => delivered += 1,
                    Err(e) => {
                        tracing::warn!("Failed to push message to connection '{}': {}", member, e)
                    }
                },
                None => tracing::warn!(
                    "Connection '{}' not found during broadcast, skipping",
                    member
                ),
            }
        }
        tracing::debug!("Broadcasted message to {} connection(s) in room '{}'", delivered, room);

        Ok(delivered)
    }

    async fn group_members(&self, room: &RoomId) -> Vec<ConnectionId> {
        let registry = self.registry.lock().await;
        let mut members: Vec<ConnectionId> = registry
            .groups
            .get(room)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default();
        members.sort();
        members
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - push_to: 特定の接続への送信
    // - join_group / broadcast_to_group: 部屋単位のブロードキャスト
    // - unregister_client: 全グループからの離脱
    // ========================================

    fn room(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定の接続にメッセージを送信できる
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_client(conn("alice"), tx).await;

        // when (操作):
        let result = pusher.push_to(&conn("alice"), "Hello").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some("Hello".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_client_not_found() {
        // テスト項目: 存在しない接続への送信はエラーを返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();

        // when (操作):
        let result = pusher.push_to(&conn("nobody"), "Hello").await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::ClientNotFound(_))));
    }

    #[tokio::test]
    async fn test_join_group_requires_registration() {
        // テスト項目: 未登録の接続はグループに参加できない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();

        // when (操作):
        let result = pusher.join_group(&room("r1"), &conn("alice")).await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::ClientNotFound(_))));
        assert!(pusher.group_members(&room("r1")).await.is_empty());
    }

    #[tokio::test]
    async fn test_broadcast_only_reaches_group_members() {
        // テスト項目: ブロードキャストは部屋のメンバーにのみ届く
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx_a, mut rx_a) = mpsc::unbounded_channel();
        let (tx_b, mut rx_b) = mpsc::unbounded_channel();
        let (tx_c, mut rx_c) = mpsc::unbounded_channel();
        pusher.register_client(conn("alice"), tx_a).await;
        pusher.register_client(conn("bob"), tx_b).await;
        pusher.register_client(conn("charlie"), tx_c).await;
        pusher.join_group(&room("r1"), &conn("alice")).await.unwrap();
        pusher.join_group(&room("r1"), &conn("bob")).await.unwrap();
        pusher.join_group(&room("r2"), &conn("charlie")).await.unwrap();

        // when (操作):
        let delivered = pusher.broadcast_to_group(&room("r1"), "msg").await.unwrap();

        // then (期待する結果):
        assert_eq!(delivered, 2);
        assert_eq!(rx_a.recv().await, Some("msg".to_string()));
        assert_eq!(rx_b.recv().await, Some("msg".to_string()));
        assert!(rx_c.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_repeated_join_does_not_duplicate_delivery() {
        // テスト項目: 同じ部屋に複数回参加しても重複して届かない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        pusher.register_client(conn("alice"), tx).await;
        pusher.join_group(&room("r1"), &conn("alice")).await.unwrap();
        pusher.join_group(&room("r1"), &conn("alice")).await.unwrap();

        // when (操作):
        let delivered = pusher.broadcast_to_group(&room("r1"), "once").await.unwrap();

        // then (期待する結果):
        assert_eq!(delivered, 1);
        assert_eq!(rx.recv().await, Some("once".to_string()));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unregister_client_leaves_all_groups() {
        // テスト項目: 登録解除すると全ての部屋から外れ、空の部屋は削除される
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (tx_a, _rx_a) = mpsc::unbounded_channel();
        let (tx_b, _rx_b) = mpsc::unbounded_channel();
        pusher.register_client(conn("alice"), tx_a).await;
        pusher.register_client(conn("bob"), tx_b).await;
        pusher.join_group(&room("r1"), &conn("alice")).await.unwrap();
        pusher.join_group(&room("r2"), &conn("alice")).await.unwrap();
        pusher.join_group(&room("r2"), &conn("bob")).await.unwrap();

        // when (操作):
        pusher.unregister_client(&conn("alice")).await;

        // then (期待する結果):
        assert!(pusher.group_members(&room("r1")).await.is_empty());
        assert_eq!(pusher.group_members(&room("r2")).await, vec![conn("bob")]);
        assert_eq!(
            pusher.broadcast_to_group(&room("r1"), "x").await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_broadcast_to_unknown_room_is_ok() {
        // テスト項目: メンバーのいない部屋へのブロードキャストはエラーにならない
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();

        // when (操作):
        let result = pusher.broadcast_to_group(&room("empty"), "Message").await;

        // then (期待する結果):
        assert_eq!(result, Ok(0));
    }
}
