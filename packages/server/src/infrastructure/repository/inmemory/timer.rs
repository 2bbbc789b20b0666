//! InMemory Timer Repository 実装
//!
//! プロセス終了で失われるため、永続化が不要な実行（開発・テスト）向けです。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{RepositoryError, RoomId, TimerRepository, TimerState};

/// インメモリ Timer Repository 実装
#[derive(Default)]
pub struct InMemoryTimerRepository {
    timers: Mutex<HashMap<RoomId, TimerState>>,
}

impl InMemoryTimerRepository {
    /// 新しい InMemoryTimerRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TimerRepository for InMemoryTimerRepository {
    async fn get_timer(&self, room: &RoomId) -> Result<TimerState, RepositoryError> {
        let mut timers = self.timers.lock().await;
        Ok(*timers.entry(room.clone()).or_default())
    }

    async fn find_timer(&self, room: &RoomId) -> Result<Option<TimerState>, RepositoryError> {
        let timers = self.timers.lock().await;
        Ok(timers.get(room).copied())
    }

    async fn upsert_timer(
        &self,
        room: &RoomId,
        state: &TimerState,
    ) -> Result<(), RepositoryError> {
        let mut timers = self.timers.lock().await;
        timers.insert(room.clone(), *state);
        Ok(())
    }
}
