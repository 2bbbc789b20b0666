//! Domain errors.

use thiserror::Error;

use super::value_object::ConnectionId;

/// Value object validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    /// Room token must not be empty
    #[error("room id must not be empty")]
    EmptyRoomId,

    /// Connection identifier must not be empty
    #[error("connection id must not be empty")]
    EmptyConnectionId,
}

/// ViewState mutation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewStateError {
    /// Page count must be a positive integer
    #[error("page count must be positive, got {0}")]
    InvalidPageCount(i64),
}

/// Returned when a connection tries to act on a room locked by someone else.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("room is locked by '{locked_by}'")]
pub struct LockDenied {
    pub locked_by: ConnectionId,
}

/// Repository errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// The backing store failed
    #[error("storage error: {0}")]
    Storage(String),

    /// A stored row could not be decoded
    #[error("corrupted record for room '{0}'")]
    CorruptedRecord(String),
}

/// Message push errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// The target connection is not registered
    #[error("connection '{0}' not found")]
    ClientNotFound(String),

    /// The outbound channel is closed
    #[error("failed to push message: {0}")]
    PushFailed(String),
}
