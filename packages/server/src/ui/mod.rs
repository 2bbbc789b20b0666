//! UI layer: transport endpoints and the event router.

pub mod event_router;
pub mod handler;
pub mod server;
pub mod signal;
pub mod state;

pub use event_router::{EventRouter, EventRouterDeps};
pub use server::Server;
