//! Kamishibai server: real-time slide synchronization per room.
//!
//! Layers:
//! - `domain`: value objects, entities and the repository / pusher traits
//! - `usecase`: navigation, presenter lock, timer and pointer relay rules
//! - `infrastructure`: in-memory and SQLite stores, WebSocket pusher, wire DTOs
//! - `ui`: axum endpoints and the event router

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
