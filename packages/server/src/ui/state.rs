//! Server state shared by the HTTP and WebSocket handlers.

use std::sync::Arc;

use crate::usecase::GetRoomDetailUseCase;

use super::event_router::EventRouter;

/// Shared application state
pub struct AppState {
    /// EventRouter（リアルタイムイベントの振り分け）
    pub event_router: Arc<EventRouter>,
    /// GetRoomDetailUseCase（部屋詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
}
