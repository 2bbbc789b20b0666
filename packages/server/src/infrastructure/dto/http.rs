//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::{SyncPayload, TimerUpdatePayload};

/// Response of `GET /api/rooms/{room_id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub room: String,
    /// Connections currently subscribed to the room's broadcast group
    pub connections: usize,
    pub view: SyncPayload,
    pub timer: TimerUpdatePayload,
}
