//! Repository 実装
//!
//! - `inmemory`: ViewState（揮発）と開発用の Timer / RoomDirectory
//! - `sqlite`: 永続化が必要な Timer と、外部アプリが管理する rooms テーブルの参照

pub mod inmemory;
pub mod sqlite;

pub use inmemory::{InMemoryTimerRepository, InMemoryViewStateRepository, OpenRoomDirectory};
pub use sqlite::SqliteStore;
