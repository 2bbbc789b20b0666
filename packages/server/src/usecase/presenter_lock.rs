//! UseCase: 発表者ロック
//!
//! - `lock`: 常に成功し、既存の保持者からも奪取する
//! - `unlock`: 保持者のみ解除できる。それ以外は何もしない
//! - `force_unlock`: 保持者に関係なく解除する
//! - `release_all`: 切断時、その接続が保持する全ての部屋のロックを解除する

use std::sync::Arc;

use crate::domain::{ConnectionId, RoomId, ViewState, ViewStateRepository};

/// 発表者ロックのユースケース
pub struct PresenterLockUseCase {
    view_states: Arc<dyn ViewStateRepository>,
}

impl PresenterLockUseCase {
    /// 新しい PresenterLockUseCase を作成
    pub fn new(view_states: Arc<dyn ViewStateRepository>) -> Self {
        Self { view_states }
    }

    /// ロックを取得（既存の保持者がいても上書きする）
    pub async fn lock(&self, room: &RoomId, requester: &ConnectionId) -> ViewState {
        let mut view = self.view_states.get_or_create(room).await;
        if let Some(previous) = view.locked_by().filter(|holder| *holder != requester) {
            tracing::info!(
                "Lock on room '{}' taken over from '{}' by '{}'",
                room,
                previous,
                requester
            );
        }
        view.lock(requester);
        self.view_states.save(room, view.clone()).await;
        view
    }

    /// ロックを解除
    ///
    /// # Returns
    ///
    /// * `Some(ViewState)` - 要求者が保持者だった（部屋全体に sync する）
    /// * `None` - 保持者ではなかった（何もしない）
    pub async fn unlock(&self, room: &RoomId, requester: &ConnectionId) -> Option<ViewState> {
        let mut view = self.view_states.get_or_create(room).await;
        if !view.unlock(requester) {
            return None;
        }
        self.view_states.save(room, view.clone()).await;
        Some(view)
    }

    /// 保持者に関係なくロックを解除
    pub async fn force_unlock(&self, room: &RoomId) -> ViewState {
        let mut view = self.view_states.get_or_create(room).await;
        view.force_unlock();
        self.view_states.save(room, view.clone()).await;
        view
    }

    /// 切断した接続が保持していた全てのロックを解除
    ///
    /// # Returns
    ///
    /// 解除した部屋と、解除後の ViewState のリスト（各部屋に一度だけ sync する）
    pub async fn release_all(&self, connection_id: &ConnectionId) -> Vec<(RoomId, ViewState)> {
        let mut released = Vec::new();
        for room in self.view_states.rooms_locked_by(connection_id).await {
            let mut view = self.view_states.get_or_create(&room).await;
            if view.unlock(connection_id) {
                self.view_states.save(&room, view.clone()).await;
                released.push((room, view));
            }
        }
        released
    }
}
