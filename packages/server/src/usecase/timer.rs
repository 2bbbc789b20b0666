//! UseCase: 経過時間タイマー
//!
//! サーバーは状態遷移のときだけスナップショットを配信し、実行中の経過時間は
//! 各クライアントが `elapsed_ms + (推定現在時刻 - start_ts)` で計算します。
//! そのためスナップショットには `server_now` を含めます。
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - start / stop / reset / snapshot
//!
//! ### どのような状況を想定しているか
//! - 正常系：start → 5000ms 後に stop で elapsed_ms = 5000
//! - エッジケース：実行中の start、停止中の stop（冪等・保存しない）
//! - 異常系：永続化ストアの障害

use std::sync::Arc;

use kamishibai_shared::time::Clock;

use crate::domain::{RoomId, TimerRepository, TimerSnapshot, TimerState};

use super::error::TimerUseCaseError;

/// タイマーのユースケース
pub struct TimerUseCase {
    timers: Arc<dyn TimerRepository>,
    clock: Arc<dyn Clock>,
}

impl TimerUseCase {
    /// 新しい TimerUseCase を作成
    pub fn new(timers: Arc<dyn TimerRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { timers, clock }
    }

    /// 現在のタイマー状態
    pub async fn snapshot(&self, room: &RoomId) -> Result<TimerSnapshot, TimerUseCaseError> {
        let state = self.timers.get_timer(room).await?;
        Ok(self.snapshot_of(state))
    }

    /// 現在のタイマー状態を参照のみ行う（未保存の部屋は停止・0ms として扱い、作成しない）
    pub async fn peek(&self, room: &RoomId) -> Result<TimerSnapshot, TimerUseCaseError> {
        let state = self.timers.find_timer(room).await?.unwrap_or_default();
        Ok(self.snapshot_of(state))
    }

    /// タイマーを開始（実行中なら何もしない）
    pub async fn start(&self, room: &RoomId) -> Result<TimerSnapshot, TimerUseCaseError> {
        self.transition(room, |timer, now| timer.start(now)).await
    }

    /// タイマーを停止し、経過時間を積算（停止中なら何もしない）
    pub async fn stop(&self, room: &RoomId) -> Result<TimerSnapshot, TimerUseCaseError> {
        self.transition(room, |timer, now| timer.stop(now)).await
    }

    /// タイマーを停止・0ms に戻す
    pub async fn reset(&self, room: &RoomId) -> Result<TimerSnapshot, TimerUseCaseError> {
        self.transition(room, |timer, _| {
            timer.reset();
            true
        })
        .await
    }

    /// Load, apply `apply` at the current time and persist only if it changed something.
    async fn transition<F>(&self, room: &RoomId, apply: F) -> Result<TimerSnapshot, TimerUseCaseError>
    where
        F: FnOnce(&mut TimerState, i64) -> bool + Send,
    {
        let mut state = self.timers.get_timer(room).await?;
        if apply(&mut state, self.clock.now_millis()) {
            self.timers.upsert_timer(room, &state).await?;
            tracing::debug!(
                "Timer for room '{}' updated (running: {}, elapsed_ms: {})",
                room,
                state.is_running(),
                state.elapsed_ms()
            );
        }
        Ok(self.snapshot_of(state))
    }

    fn snapshot_of(&self, state: TimerState) -> TimerSnapshot {
        TimerSnapshot {
            state,
            server_now: self.clock.now_millis(),
        }
    }
}
