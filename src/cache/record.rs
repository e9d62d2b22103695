//! A single TTL cache slot.

use chrono::Duration;

/// Cached listing plus the time it was fetched.
///
/// `data` and `timestamp` are only ever written together.
#[derive(Debug, Clone)]
pub struct CacheRecord<T> {
  data: Option<Vec<T>>,
  timestamp: Option<i64>,
  max_age: Duration,
}

impl<T> CacheRecord<T> {
  /// An empty record; invalid until the first `replace`.
  pub fn new(max_age: Duration) -> Self {
    Self {
      data: None,
      timestamp: None,
      max_age,
    }
  }

  /// Valid iff data is present and `now - timestamp < max_age`.
  pub fn is_valid(&self, now_millis: i64) -> bool {
    match (&self.data, self.timestamp) {
      (Some(_), Some(ts)) => now_millis - ts < self.max_age.num_milliseconds(),
      _ => false,
    }
  }

  pub fn data(&self) -> Option<&[T]> {
    self.data.as_deref()
  }

  pub fn timestamp(&self) -> Option<i64> {
    self.timestamp
  }

  pub fn max_age(&self) -> Duration {
    self.max_age
  }

  /// Replace the contents and stamp them with `now_millis`.
  pub fn replace(&mut self, data: Vec<T>, now_millis: i64) {
    self.data = Some(data);
    self.timestamp = Some(now_millis);
  }

  pub fn clear(&mut self) {
    self.data = None;
    self.timestamp = None;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const MAX_AGE_MS: i64 = 5 * 60 * 1000;

  fn record() -> CacheRecord<u32> {
    CacheRecord::new(Duration::milliseconds(MAX_AGE_MS))
  }

  #[test]
  fn test_empty_record_is_invalid() {
    let record = record();
    assert!(!record.is_valid(0));
    assert!(record.data().is_none());
    assert!(record.timestamp().is_none());
  }

  #[test]
  fn test_invalid_without_data_regardless_of_timestamp() {
    let mut record = record();
    // Force a timestamp with no data through the private fields
    record.timestamp = Some(1_000);
    assert!(!record.is_valid(1_000));
    assert!(!record.is_valid(1_001));
    assert!(!record.is_valid(i64::MIN));
  }

  #[test]
  fn test_ttl_boundary() {
    let mut record = record();
    record.replace(vec![1, 2, 3], 10_000);

    assert!(record.is_valid(10_000));
    assert!(record.is_valid(10_000 + MAX_AGE_MS - 1));
    assert!(!record.is_valid(10_000 + MAX_AGE_MS));
    assert!(!record.is_valid(10_000 + MAX_AGE_MS + 1));
  }

  #[test]
  fn test_empty_list_is_still_valid() {
    let mut record = record();
    record.replace(Vec::new(), 0);
    assert!(record.is_valid(1));
  }

  #[test]
  fn test_clear_resets_both_fields() {
    let mut record = record();
    record.replace(vec![7], 0);
    record.clear();
    assert!(record.data().is_none());
    assert!(record.timestamp().is_none());
    assert!(!record.is_valid(1));
  }
}
