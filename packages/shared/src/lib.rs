//! Shared utilities for the Kamishibai packages.

pub mod logger;
pub mod time;
