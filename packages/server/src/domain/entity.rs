//! Domain entities.
//!
//! `ViewState` carries the navigation and presenter-lock rules, `TimerState` the
//! Stopped/Running state machine. Both are pure: callers supply the current time
//! and persist the result.

use super::{
    error::{LockDenied, ViewStateError},
    value_object::ConnectionId,
};

/// Ephemeral per-room navigation and lock state
///
/// Invariant: when `num_pages` is known, `1 <= current_page <= num_pages`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    current_page: i64,
    num_pages: Option<i64>,
    locked_by: Option<ConnectionId>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    /// Defaults for a room seen for the first time
    pub fn new() -> Self {
        Self {
            current_page: 1,
            num_pages: None,
            locked_by: None,
        }
    }

    pub fn current_page(&self) -> i64 {
        self.current_page
    }

    pub fn num_pages(&self) -> Option<i64> {
        self.num_pages
    }

    pub fn locked_by(&self) -> Option<&ConnectionId> {
        self.locked_by.as_ref()
    }

    /// `true` if the room is unlocked or locked by `requester`
    pub fn can_act(&self, requester: &ConnectionId) -> bool {
        match &self.locked_by {
            None => true,
            Some(holder) => holder == requester,
        }
    }

    /// Record the page count reported by a client. Not lock-gated.
    ///
    /// `current_page` is re-clamped so it never exceeds the new count.
    pub fn set_num_pages(&mut self, num_pages: i64) -> Result<(), ViewStateError> {
        if num_pages <= 0 {
            return Err(ViewStateError::InvalidPageCount(num_pages));
        }
        self.num_pages = Some(num_pages);
        self.current_page = self.clamp_page(self.current_page);
        Ok(())
    }

    /// Navigate to `page`, clamped into the valid range.
    pub fn goto(&mut self, requester: &ConnectionId, page: i64) -> Result<(), LockDenied> {
        self.ensure_can_act(requester)?;
        self.current_page = self.clamp_page(page);
        Ok(())
    }

    /// Target page for a relative move
    pub fn step_target(&self, delta: i64) -> i64 {
        self.current_page.saturating_add(delta)
    }

    /// Claim the presenter lock. Always succeeds, replacing any previous holder.
    pub fn lock(&mut self, requester: &ConnectionId) {
        self.locked_by = Some(requester.clone());
    }

    /// Release the lock if `requester` holds it. Returns whether the state changed.
    pub fn unlock(&mut self, requester: &ConnectionId) -> bool {
        if self.locked_by.as_ref() == Some(requester) {
            self.locked_by = None;
            true
        } else {
            false
        }
    }

    /// Clear the lock regardless of holder
    pub fn force_unlock(&mut self) {
        self.locked_by = None;
    }

    fn ensure_can_act(&self, requester: &ConnectionId) -> Result<(), LockDenied> {
        match &self.locked_by {
            Some(holder) if holder != requester => Err(LockDenied {
                locked_by: holder.clone(),
            }),
            _ => Ok(()),
        }
    }

    fn clamp_page(&self, page: i64) -> i64 {
        match self.num_pages {
            Some(num_pages) => page.clamp(1, num_pages),
            None => page.max(1),
        }
    }
}

/// Durable per-room elapsed-time record
///
/// All timestamps are Unix milliseconds. `running` implies `start_ts` is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimerState {
    running: bool,
    start_ts: Option<i64>,
    elapsed_ms: i64,
}

impl TimerState {
    /// A stopped timer with zero elapsed time
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a timer from stored fields, normalizing inconsistent combinations.
    ///
    /// A row marked running without a start timestamp is treated as stopped,
    /// a stopped row keeps no start timestamp and negative totals become zero.
    pub fn restore(running: bool, start_ts: Option<i64>, elapsed_ms: i64) -> Self {
        let elapsed_ms = elapsed_ms.max(0);
        match (running, start_ts) {
            (true, Some(start_ts)) => Self {
                running: true,
                start_ts: Some(start_ts),
                elapsed_ms,
            },
            _ => Self {
                running: false,
                start_ts: None,
                elapsed_ms,
            },
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start_ts(&self) -> Option<i64> {
        self.start_ts
    }

    pub fn elapsed_ms(&self) -> i64 {
        self.elapsed_ms
    }

    /// Stopped -> Running. Returns `false` (no change) if already running.
    pub fn start(&mut self, now_millis: i64) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.start_ts = Some(now_millis);
        true
    }

    /// Running -> Stopped, folding the running interval into `elapsed_ms`.
    /// Returns `false` (no change) if already stopped.
    ///
    /// A clock that went backwards contributes nothing, so `elapsed_ms` never decreases.
    pub fn stop(&mut self, now_millis: i64) -> bool {
        let Some(start_ts) = self.start_ts.filter(|_| self.running) else {
            return false;
        };
        let interval = now_millis.saturating_sub(start_ts).max(0);
        self.elapsed_ms = self.elapsed_ms.saturating_add(interval);
        self.running = false;
        self.start_ts = None;
        true
    }

    /// Back to a stopped, zeroed timer
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

/// Timer state paired with the server time it was read at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub server_now: i64,
}

/// Normalized pointer position on a page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
    pub page: i64,
}

impl PointerPosition {
    /// Clamp `x` and `y` into `[0.0, 1.0]`; `page` is passed through as-is.
    pub fn clamped(x: f64, y: f64, page: i64) -> Self {
        Self {
            x: x.clamp(0.0, 1.0),
            y: y.clamp(0.0, 1.0),
            page,
        }
    }
}
