//! Time-related utilities with clock abstraction for testability.
//!
//! All timestamps inside the server are Unix milliseconds (`i64`). The wire
//! format exposes Unix seconds as floats, so conversion helpers live here too.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp (milliseconds)
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        get_unix_timestamp_millis()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: fixed_time_millis,
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.fixed_time
    }
}

/// Manually driven clock for testing time-dependent state machines.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    /// Create a new manual clock starting at the given timestamp
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(start_millis),
        }
    }

    /// Move the clock forward (or backward, with a negative value)
    pub fn advance(&self, delta_millis: i64) {
        self.now.fetch_add(delta_millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Get current Unix timestamp (milliseconds)
pub fn get_unix_timestamp_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert Unix milliseconds to Unix seconds as a float
pub fn millis_to_unix_seconds(millis: i64) -> f64 {
    millis as f64 / 1000.0
}

/// Convert Unix seconds (float) to Unix milliseconds, rounded to the nearest millisecond
pub fn unix_seconds_to_millis(seconds: f64) -> i64 {
    (seconds * 1000.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_returns_increasing_timestamps() {
        // テスト項目: SystemClock が呼び出すたびに増加するタイムスタンプを返す
        // given (前提条件):
        let clock = SystemClock;

        // when (操作):
        let timestamp1 = clock.now_millis();
        std::thread::sleep(std::time::Duration::from_millis(10));
        let timestamp2 = clock.now_millis();

        // then (期待する結果):
        assert!(timestamp1 > 0);
        assert!(timestamp2 >= timestamp1);
    }

    #[test]
    fn test_fixed_clock_returns_fixed_timestamp() {
        // テスト項目: FixedClock が固定されたタイムスタンプを返す
        // given (前提条件):
        let clock = FixedClock::new(1234567890123);

        // when (操作):
        let timestamp1 = clock.now_millis();
        let timestamp2 = clock.now_millis();

        // then (期待する結果):
        assert_eq!(timestamp1, 1234567890123);
        assert_eq!(timestamp2, 1234567890123);
    }

    #[test]
    fn test_manual_clock_advance() {
        // テスト項目: ManualClock は advance で時刻を前後に動かせる
        // given (前提条件):
        let clock = ManualClock::new(1_000_000);

        // when (操作):
        clock.advance(5_000);
        let advanced = clock.now_millis();
        clock.advance(-1_000);

        // then (期待する結果):
        assert_eq!(advanced, 1_005_000);
        assert_eq!(clock.now_millis(), 1_004_000);
    }

    #[test]
    fn test_millis_seconds_conversion() {
        // テスト項目: ミリ秒と秒（浮動小数点）の相互変換
        // given (前提条件):
        let millis = 1_000_123;

        // when (操作):
        let seconds = millis_to_unix_seconds(millis);

        // then (期待する結果):
        assert!((seconds - 1000.123).abs() < 1e-9);
        assert_eq!(unix_seconds_to_millis(seconds), millis);
        assert_eq!(unix_seconds_to_millis(1005.0), 1_005_000);
    }
}
