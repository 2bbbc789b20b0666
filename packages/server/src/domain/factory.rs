//! Identifier factories.

use uuid::Uuid;

use super::value_object::ConnectionId;

/// Generates per-socket connection identifiers
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// Generate a new random ConnectionId (UUID v4)
    pub fn generate() -> ConnectionId {
        ConnectionId::from(Uuid::new_v4())
    }
}
