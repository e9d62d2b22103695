//! Time source for cache freshness checks.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

/// Source of the current time in epoch milliseconds.
pub trait Clock: Send + Sync {
  fn now_millis(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now_millis(&self) -> i64 {
    Utc::now().timestamp_millis()
  }
}

/// Clock that only moves when told to. Used to test TTL boundaries.
#[derive(Debug, Default)]
pub struct ManualClock {
  now: AtomicI64,
}

impl ManualClock {
  pub fn new(start_millis: i64) -> Self {
    Self {
      now: AtomicI64::new(start_millis),
    }
  }

  pub fn set(&self, millis: i64) {
    self.now.store(millis, Ordering::SeqCst);
  }

  pub fn advance(&self, millis: i64) {
    self.now.fetch_add(millis, Ordering::SeqCst);
  }
}

impl Clock for ManualClock {
  fn now_millis(&self) -> i64 {
    self.now.load(Ordering::SeqCst)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_manual_clock() {
    let clock = ManualClock::new(1_000);
    clock.advance(500);
    assert_eq!(clock.now_millis(), 1_500);
    clock.set(10);
    assert_eq!(clock.now_millis(), 10);
  }

  #[test]
  fn test_system_clock_is_recent() {
    // 2020-01-01T00:00:00Z
    assert!(SystemClock.now_millis() > 1_577_836_800_000);
  }
}
