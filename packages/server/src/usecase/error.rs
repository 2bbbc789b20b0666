//! UseCase errors.

use thiserror::Error;

use crate::domain::RepositoryError;

/// Errors from joining a room
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    /// The room directory does not know this room
    #[error("room '{0}' does not exist")]
    RoomNotFound(String),

    /// The room directory could not be queried
    #[error("room directory unavailable: {0}")]
    Directory(RepositoryError),
}

/// Errors from timer operations; always a durable store failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerUseCaseError {
    #[error("timer store failed: {0}")]
    Store(#[from] RepositoryError),
}
