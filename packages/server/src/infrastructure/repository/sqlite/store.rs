//! SQLite persistence for room timers and the shared room directory.
//!
//! The schema matches the one written by the room-management application, so
//! both processes can share one database file: `rooms` is only read here,
//! `timers` is owned by this server. `timers.start_ts` is stored in Unix
//! seconds (REAL).

use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use kamishibai_shared::time::{millis_to_unix_seconds, unix_seconds_to_millis};
use rusqlite::{Connection, OptionalExtension, params};

use crate::domain::{RepositoryError, RoomDirectory, RoomId, TimerRepository, TimerState};

impl From<rusqlite::Error> for RepositoryError {
    fn from(e: rusqlite::Error) -> Self {
        RepositoryError::Storage(e.to_string())
    }
}

/// SQLite-backed timer store and room directory.
///
/// rusqlite is synchronous, so every statement runs on tokio's blocking pool.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open (or create) a database at the given filesystem path and run migrations.
    pub fn open(path: &Path) -> Result<Self, RepositoryError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database. Useful for testing.
    pub fn open_in_memory() -> Result<Self, RepositoryError> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self, RepositoryError> {
        migrate(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn call<T, F>(&self, f: F) -> Result<T, RepositoryError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, RepositoryError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|_| RepositoryError::Storage("connection mutex poisoned".to_string()))?;
            f(&conn)
        })
        .await
        .map_err(|e| RepositoryError::Storage(e.to_string()))?
    }
}

/// Create the schema if it does not already exist.
fn migrate(conn: &Connection) -> Result<(), RepositoryError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS rooms (
            room          TEXT PRIMARY KEY,
            password_hash TEXT NOT NULL,
            guest_enabled INTEGER NOT NULL DEFAULT 0
        );
        CREATE TABLE IF NOT EXISTS timers (
            room       TEXT PRIMARY KEY,
            running    INTEGER NOT NULL DEFAULT 0,
            start_ts   REAL,
            elapsed_ms INTEGER NOT NULL DEFAULT 0
        );",
    )?;
    Ok(())
}

fn select_timer(conn: &Connection, room: &str) -> Result<Option<TimerState>, RepositoryError> {
    let row = conn
        .query_row(
            "SELECT running, start_ts, elapsed_ms FROM timers WHERE room = ?1",
            params![room],
            |row| {
                let running: i64 = row.get(0)?;
                let start_ts: Option<f64> = row.get(1)?;
                let elapsed_ms: i64 = row.get(2)?;
                Ok((running != 0, start_ts, elapsed_ms))
            },
        )
        .optional()?;
    Ok(row.map(|(running, start_ts, elapsed_ms)| {
        TimerState::restore(running, start_ts.map(unix_seconds_to_millis), elapsed_ms)
    }))
}

#[async_trait]
impl TimerRepository for SqliteStore {
    async fn get_timer(&self, room: &RoomId) -> Result<TimerState, RepositoryError> {
        let room = room.clone();
        self.call(move |conn| {
            if let Some(state) = select_timer(conn, room.as_str())? {
                return Ok(state);
            }
            conn.execute(
                "INSERT OR IGNORE INTO timers (room, running, start_ts, elapsed_ms)
                 VALUES (?1, 0, NULL, 0)",
                params![room.as_str()],
            )?;
            tracing::debug!("Timer row for room '{}' created", room);
            Ok(TimerState::new())
        })
        .await
    }

    async fn find_timer(&self, room: &RoomId) -> Result<Option<TimerState>, RepositoryError> {
        let room = room.clone();
        self.call(move |conn| select_timer(conn, room.as_str()))
            .await
    }

    async fn upsert_timer(
        &self,
        room: &RoomId,
        state: &TimerState,
    ) -> Result<(), RepositoryError> {
        let room = room.clone();
        let state = *state;
        self.call(move |conn| {
            conn.execute(
                "INSERT INTO timers (room, running, start_ts, elapsed_ms)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(room) DO UPDATE SET
                    running = excluded.running,
                    start_ts = excluded.start_ts,
                    elapsed_ms = excluded.elapsed_ms",
                params![
                    room.as_str(),
                    i64::from(state.is_running()),
                    state.start_ts().map(millis_to_unix_seconds),
                    state.elapsed_ms(),
                ],
            )?;
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl RoomDirectory for SqliteStore {
    async fn room_exists(&self, room: &RoomId) -> Result<bool, RepositoryError> {
        let room = room.clone();
        self.call(move |conn| {
            let found = conn
                .query_row(
                    "SELECT 1 FROM rooms WHERE room = ?1",
                    params![room.as_str()],
                    |_| Ok(()),
                )
                .optional()?;
            Ok(found.is_some())
        })
        .await
    }
}
