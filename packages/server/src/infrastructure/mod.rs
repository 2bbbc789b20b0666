//! Infrastructure layer: concrete stores, transports and wire DTOs.

pub mod dto;
pub mod message_pusher;
pub mod repository;
