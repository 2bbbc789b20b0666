//! Domain layer: value objects, entities and the interfaces the use cases depend on.
//!
//! 具体的な実装（インメモリ / SQLite / WebSocket）は Infrastructure 層が提供します。

pub mod entity;
pub mod error;
pub mod factory;
pub mod message_pusher;
pub mod repository;
pub mod value_object;

pub use entity::{PointerPosition, TimerSnapshot, TimerState, ViewState};
pub use error::{LockDenied, MessagePushError, RepositoryError, ValueObjectError, ViewStateError};
pub use factory::ConnectionIdFactory;
pub use message_pusher::{MessagePusher, PusherChannel};
pub use repository::{RoomDirectory, TimerRepository, ViewStateRepository};
pub use value_object::{ConnectionId, RoomId};
