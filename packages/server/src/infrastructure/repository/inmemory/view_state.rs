//! InMemory ViewState Repository 実装
//!
//! 部屋ごとの ViewState を LRU キャッシュに保持します。
//!
//! - 容量を超えると最も長く参照されていない部屋から破棄されます
//! - `evict_idle` で一定時間参照されていない部屋を破棄できます
//! - ロック保持者の逆引きインデックス（ConnectionId → 部屋の集合）を持ち、
//!   切断時のロック解放で全部屋を走査しなくて済むようにしています

use std::{
    collections::{HashMap, HashSet},
    num::NonZeroUsize,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, RoomId, ViewState, ViewStateRepository};

struct Entry {
    state: ViewState,
    last_touched: Instant,
}

struct Inner {
    rooms: LruCache<RoomId, Entry>,
    /// Reverse index: lock holder -> rooms it currently holds
    lock_index: HashMap<ConnectionId, HashSet<RoomId>>,
}

impl Inner {
    fn index_lock(&mut self, room: &RoomId, state: &ViewState) {
        if let Some(holder) = state.locked_by() {
            self.lock_index
                .entry(holder.clone())
                .or_default()
                .insert(room.clone());
        }
    }

    fn unindex_lock(&mut self, room: &RoomId, state: &ViewState) {
        let Some(holder) = state.locked_by() else {
            return;
        };
        if let Some(rooms) = self.lock_index.get_mut(holder) {
            rooms.remove(room);
            if rooms.is_empty() {
                self.lock_index.remove(holder);
            }
        }
    }

    /// Insert or replace an entry, keeping the lock index consistent with
    /// whatever the cache displaced.
    fn put(&mut self, room: &RoomId, state: ViewState) {
        if let Some(previous) = self.rooms.pop(room) {
            self.unindex_lock(room, &previous.state);
        }
        self.index_lock(room, &state);
        let entry = Entry {
            state,
            last_touched: Instant::now(),
        };
        if let Some((evicted_room, evicted)) = self.rooms.push(room.clone(), entry) {
            tracing::debug!(
                "Room '{}' evicted from view state cache (capacity reached)",
                evicted_room
            );
            self.unindex_lock(&evicted_room, &evicted.state);
        }
    }
}

/// インメモリ ViewState Repository 実装
pub struct InMemoryViewStateRepository {
    inner: Mutex<Inner>,
}

impl InMemoryViewStateRepository {
    /// 新しい InMemoryViewStateRepository を作成
    ///
    /// # Arguments
    ///
    /// * `capacity` - 保持する部屋の最大数
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                rooms: LruCache::new(capacity),
                lock_index: HashMap::new(),
            }),
        }
    }
}

#[async_trait]
impl ViewStateRepository for InMemoryViewStateRepository {
    async fn get_or_create(&self, room: &RoomId) -> ViewState {
        let mut inner = self.inner.lock().await;
        if let Some(entry) = inner.rooms.get_mut(room) {
            entry.last_touched = Instant::now();
            return entry.state.clone();
        }
        let state = ViewState::new();
        inner.put(room, state.clone());
        tracing::debug!("View state for room '{}' created", room);
        state
    }

    async fn find(&self, room: &RoomId) -> Option<ViewState> {
        let inner = self.inner.lock().await;
        inner.rooms.peek(room).map(|entry| entry.state.clone())
    }

    async fn save(&self, room: &RoomId, state: ViewState) {
        let mut inner = self.inner.lock().await;
        inner.put(room, state);
    }

    async fn rooms_locked_by(&self, connection_id: &ConnectionId) -> Vec<RoomId> {
        let inner = self.inner.lock().await;
        let mut rooms: Vec<RoomId> = inner
            .lock_index
            .get(connection_id)
            .map(|rooms| rooms.iter().cloned().collect())
            .unwrap_or_default();
        rooms.sort();
        rooms
    }

    async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut inner = self.inner.lock().await;
        let idle: Vec<RoomId> = inner
            .rooms
            .iter()
            .filter(|(_, entry)| entry.last_touched.elapsed() >= max_idle)
            .map(|(room, _)| room.clone())
            .collect();

        for room in &idle {
            if let Some(entry) = inner.rooms.pop(room) {
                inner.unindex_lock(room, &entry.state);
            }
        }
        idle.len()
    }

    async fn count_rooms(&self) -> usize {
        let inner = self.inner.lock().await;
        inner.rooms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 未知の部屋はデフォルト値で作成されること
    // - save したロック保持者が逆引きインデックスに反映されること
    // - 容量超過・アイドル破棄時にインデックスからも削除されること
    // ========================================

    fn room(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    fn conn(id: &str) -> ConnectionId {
        ConnectionId::new(id.to_string()).unwrap()
    }

    fn create_test_repository(capacity: usize) -> InMemoryViewStateRepository {
        InMemoryViewStateRepository::new(NonZeroUsize::new(capacity).unwrap())
    }

    fn locked_view(holder: &ConnectionId) -> ViewState {
        let mut view = ViewState::new();
        view.lock(holder);
        view
    }

    #[tokio::test]
    async fn test_get_or_create_returns_defaults_for_unknown_room() {
        // テスト項目: 未知の部屋はデフォルト値で作成される
        // given (前提条件):
        let repo = create_test_repository(8);

        // when (操作):
        let view = repo.get_or_create(&room("r1")).await;

        // then (期待する結果):
        assert_eq!(view, ViewState::new());
        assert_eq!(repo.count_rooms().await, 1);
    }

    #[tokio::test]
    async fn test_find_does_not_create_room() {
        // テスト項目: find は未知の部屋を作成しない
        // given (前提条件):
        let repo = create_test_repository(8);

        // when (操作):
        let missing = repo.find(&room("r1")).await;
        repo.save(&room("r2"), locked_view(&conn("alice"))).await;
        let found = repo.find(&room("r2")).await;

        // then (期待する結果):
        assert_eq!(missing, None);
        assert_eq!(found, Some(locked_view(&conn("alice"))));
        assert_eq!(repo.count_rooms().await, 1);
    }

    #[tokio::test]
    async fn test_save_then_get_returns_saved_state() {
        // テスト項目: 保存した ViewState が取得できる
        // given (前提条件):
        let repo = create_test_repository(8);
        let mut view = ViewState::new();
        view.set_num_pages(12).unwrap();

        // when (操作):
        repo.save(&room("r1"), view.clone()).await;
        let loaded = repo.get_or_create(&room("r1")).await;

        // then (期待する結果):
        assert_eq!(loaded, view);
    }

    #[tokio::test]
    async fn test_rooms_locked_by_tracks_lock_changes() {
        // テスト項目: ロックの取得・奪取・解除が逆引きインデックスに反映される
        // given (前提条件):
        let repo = create_test_repository(8);
        let alice = conn("alice");
        let bob = conn("bob");
        repo.save(&room("r1"), locked_view(&alice)).await;
        repo.save(&room("r2"), locked_view(&alice)).await;

        // when (操作): r1 のロックを bob が奪い、r2 は解除される
        repo.save(&room("r1"), locked_view(&bob)).await;
        repo.save(&room("r2"), ViewState::new()).await;

        // then (期待する結果):
        assert!(repo.rooms_locked_by(&alice).await.is_empty());
        assert_eq!(repo.rooms_locked_by(&bob).await, vec![room("r1")]);
    }

    #[tokio::test]
    async fn test_resaving_same_holder_keeps_index() {
        // テスト項目: 同じ保持者で再保存してもインデックスが消えない
        // given (前提条件):
        let repo = create_test_repository(8);
        let alice = conn("alice");
        repo.save(&room("r1"), locked_view(&alice)).await;

        // when (操作):
        let mut view = locked_view(&alice);
        view.goto(&alice, 3).unwrap();
        repo.save(&room("r1"), view).await;

        // then (期待する結果):
        assert_eq!(repo.rooms_locked_by(&alice).await, vec![room("r1")]);
    }

    #[tokio::test]
    async fn test_capacity_eviction_drops_least_recently_used() {
        // テスト項目: 容量を超えると最も古い部屋が破棄され、インデックスも更新される
        // given (前提条件):
        let repo = create_test_repository(2);
        let alice = conn("alice");
        repo.save(&room("r1"), locked_view(&alice)).await;
        repo.get_or_create(&room("r2")).await;

        // when (操作):
        repo.get_or_create(&room("r3")).await;

        // then (期待する結果):
        assert_eq!(repo.count_rooms().await, 2);
        assert!(repo.rooms_locked_by(&alice).await.is_empty());
        assert_eq!(repo.get_or_create(&room("r1")).await, ViewState::new());
    }

    #[tokio::test]
    async fn test_evict_idle_removes_rooms_and_index() {
        // テスト項目: アイドル時間を超えた部屋が破棄される
        // given (前提条件):
        let repo = create_test_repository(8);
        let alice = conn("alice");
        repo.save(&room("r1"), locked_view(&alice)).await;
        repo.get_or_create(&room("r2")).await;

        // when (操作):
        let kept = repo.evict_idle(Duration::from_secs(3600)).await;
        let evicted = repo.evict_idle(Duration::ZERO).await;

        // then (期待する結果):
        assert_eq!(kept, 0);
        assert_eq!(evicted, 2);
        assert_eq!(repo.count_rooms().await, 0);
        assert!(repo.rooms_locked_by(&alice).await.is_empty());
    }
}
