//! UseCase: ポインター中継
//!
//! 状態を持たない中継です。部屋が他者にロックされている場合は黙って破棄します。

use std::sync::Arc;

use crate::domain::{ConnectionId, PointerPosition, RoomId, ViewStateRepository};

/// ポインター中継のユースケース
pub struct PointerRelayUseCase {
    view_states: Arc<dyn ViewStateRepository>,
}

impl PointerRelayUseCase {
    /// 新しい PointerRelayUseCase を作成
    pub fn new(view_states: Arc<dyn ViewStateRepository>) -> Self {
        Self { view_states }
    }

    /// ポインター移動
    ///
    /// # Returns
    ///
    /// * `Some(PointerPosition)` - 部屋全体に配信する位置（x, y はクランプ済み）
    /// * `None` - 他者がロック中のため破棄
    pub async fn move_pointer(
        &self,
        room: &RoomId,
        requester: &ConnectionId,
        x: f64,
        y: f64,
        page: i64,
    ) -> Option<PointerPosition> {
        self.may_relay(room, requester)
            .await
            .then(|| PointerPosition::clamped(x, y, page))
    }

    /// ポインター非表示。他者がロック中なら `false`（破棄）
    pub async fn hide_pointer(&self, room: &RoomId, requester: &ConnectionId) -> bool {
        self.may_relay(room, requester).await
    }

    async fn may_relay(&self, room: &RoomId, requester: &ConnectionId) -> bool {
        let allowed = self.view_states.get_or_create(room).await.can_act(requester);
        if !allowed {
            tracing::debug!(
                "Pointer event from '{}' dropped: room '{}' is locked by another connection",
                requester,
                room
            );
        }
        allowed
    }
}
