//! Conversion logic from domain entities to wire DTOs.

use kamishibai_shared::time::millis_to_unix_seconds;

use crate::domain::{LockDenied, PointerPosition, TimerSnapshot, ViewState};
use crate::infrastructure::dto::{http::RoomDetailDto, websocket as dto};
use crate::usecase::RoomDetail;

impl From<&ViewState> for dto::SyncPayload {
    fn from(view: &ViewState) -> Self {
        Self {
            current_page: view.current_page(),
            num_pages: view.num_pages(),
            locked_by: view.locked_by().map(|id| id.as_str().to_string()),
        }
    }
}

impl From<&TimerSnapshot> for dto::TimerUpdatePayload {
    fn from(snapshot: &TimerSnapshot) -> Self {
        Self {
            running: snapshot.state.is_running(),
            start_ts: snapshot.state.start_ts().map(millis_to_unix_seconds),
            elapsed_ms: snapshot.state.elapsed_ms(),
            server_now: millis_to_unix_seconds(snapshot.server_now),
        }
    }
}

impl From<&LockDenied> for dto::LockDeniedPayload {
    fn from(denied: &LockDenied) -> Self {
        Self {
            locked_by: denied.locked_by.as_str().to_string(),
        }
    }
}

impl From<PointerPosition> for dto::PointerUpdatePayload {
    fn from(pointer: PointerPosition) -> Self {
        Self {
            x: pointer.x,
            y: pointer.y,
            page: pointer.page,
        }
    }
}

impl From<&RoomDetail> for RoomDetailDto {
    fn from(detail: &RoomDetail) -> Self {
        Self {
            room: detail.room.as_str().to_string(),
            connections: detail.connections,
            view: dto::SyncPayload::from(&detail.view),
            timer: dto::TimerUpdatePayload::from(&detail.timer),
        }
    }
}
