//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use std::time::Duration;

use async_trait::async_trait;

use super::{ConnectionId, RepositoryError, RoomId, TimerState, ViewState};

/// Ephemeral per-room view state store
///
/// Entries are created lazily with defaults on first reference. Implementations
/// may forget rooms (bounded capacity, idle eviction); a forgotten room simply
/// starts over from defaults.
#[async_trait]
pub trait ViewStateRepository: Send + Sync {
    /// 部屋の ViewState を取得（存在しなければデフォルト値で作成）
    async fn get_or_create(&self, room: &RoomId) -> ViewState;

    /// 部屋の ViewState を参照のみ行う（作成せず、LRU 順序も更新しない）
    async fn find(&self, room: &RoomId) -> Option<ViewState>;

    /// 部屋の ViewState を保存
    async fn save(&self, room: &RoomId, state: ViewState);

    /// 指定した接続がロックを保持している部屋の一覧
    async fn rooms_locked_by(&self, connection_id: &ConnectionId) -> Vec<RoomId>;

    /// `max_idle` 以上参照されていない部屋を破棄し、破棄した数を返す
    async fn evict_idle(&self, max_idle: Duration) -> usize;

    /// 保持している部屋の数
    async fn count_rooms(&self) -> usize;

    /// Release resources at shutdown. Nothing to do for in-memory stores.
    async fn teardown(&self) {}
}

/// Durable per-room timer store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TimerRepository: Send + Sync {
    /// 部屋のタイマーを取得（存在しなければ停止・0ms の行を作成）
    async fn get_timer(&self, room: &RoomId) -> Result<TimerState, RepositoryError>;

    /// 部屋のタイマーを参照のみ行う（行は作成しない）
    async fn find_timer(&self, room: &RoomId) -> Result<Option<TimerState>, RepositoryError>;

    /// 部屋のタイマーを保存
    async fn upsert_timer(&self, room: &RoomId, state: &TimerState)
    -> Result<(), RepositoryError>;
}

/// Directory of rooms managed outside this server (creation, passwords, membership)
#[async_trait]
pub trait RoomDirectory: Send + Sync {
    /// 部屋が存在するか
    async fn room_exists(&self, room: &RoomId) -> Result<bool, RepositoryError>;
}
