//! SQLite 実装

pub mod store;

pub use store::SqliteStore;
