//! WebSocket message DTOs.
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}`, in both
//! directions. A frame whose event name is unknown or whose payload does not
//! match the expected shape fails to deserialize and is dropped by the router.

use serde::{Deserialize, Serialize};

use crate::domain::RoomId;

// ========================================
// Inbound (client → server)
// ========================================

/// Payload carrying only the room token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomPayload {
    pub room: RoomId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportNumPagesPayload {
    pub room: RoomId,
    pub num_pages: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GotoPayload {
    pub room: RoomId,
    pub page: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepPayload {
    pub room: RoomId,
    /// A missing delta means "no movement"
    #[serde(default)]
    pub delta: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerMovePayload {
    pub room: RoomId,
    pub x: f64,
    pub y: f64,
    pub page: i64,
}

/// Events a client may send
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    Join(RoomPayload),
    ReportNumPages(ReportNumPagesPayload),
    Goto(GotoPayload),
    Step(StepPayload),
    Lock(RoomPayload),
    Unlock(RoomPayload),
    ForceUnlock(RoomPayload),
    TimerStart(RoomPayload),
    TimerStop(RoomPayload),
    TimerReset(RoomPayload),
    PointerMove(PointerMovePayload),
    PointerHide(RoomPayload),
}

impl ClientEvent {
    /// Event name as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::Join(_) => "join",
            ClientEvent::ReportNumPages(_) => "report_num_pages",
            ClientEvent::Goto(_) => "goto",
            ClientEvent::Step(_) => "step",
            ClientEvent::Lock(_) => "lock",
            ClientEvent::Unlock(_) => "unlock",
            ClientEvent::ForceUnlock(_) => "force_unlock",
            ClientEvent::TimerStart(_) => "timer_start",
            ClientEvent::TimerStop(_) => "timer_stop",
            ClientEvent::TimerReset(_) => "timer_reset",
            ClientEvent::PointerMove(_) => "pointer_move",
            ClientEvent::PointerHide(_) => "pointer_hide",
        }
    }
}

// ========================================
// Outbound (server → client)
// ========================================

/// View snapshot `{current_page, num_pages, locked_by}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncPayload {
    pub current_page: i64,
    pub num_pages: Option<i64>,
    pub locked_by: Option<String>,
}

/// Timer snapshot. Timestamps are Unix seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerUpdatePayload {
    pub running: bool,
    pub start_ts: Option<f64>,
    pub elapsed_ms: i64,
    pub server_now: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LockDeniedPayload {
    pub locked_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerUpdatePayload {
    pub x: f64,
    pub y: f64,
    pub page: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerErrorPayload {
    pub message: String,
}

/// Serializes as `{}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmptyPayload {}

/// Events the server emits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    Sync(SyncPayload),
    TimerUpdate(TimerUpdatePayload),
    LockDenied(LockDeniedPayload),
    PointerUpdate(PointerUpdatePayload),
    PointerHide(EmptyPayload),
    TimerError(TimerErrorPayload),
}

impl ServerEvent {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
