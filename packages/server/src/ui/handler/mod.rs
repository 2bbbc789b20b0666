//! HTTP and WebSocket handlers.

pub mod http;
pub mod websocket;

pub use http::{get_room_detail, health_check};
pub use websocket::websocket_handler;
