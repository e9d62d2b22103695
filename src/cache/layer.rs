//! TTL cache that fronts one listing endpoint.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, warn};

use crate::backend::api_types::ApiResponse;
use crate::error::Result;

use super::clock::Clock;
use super::record::CacheRecord;
use super::traits::{Listing, Transport};

/// Default validity window for listings.
pub fn default_max_age() -> Duration {
  Duration::minutes(5)
}

/// Cache for one entity list.
///
/// `load` never fails: fetch errors are logged and replaced by the entity's
/// fallback list, and the record is stamped either way so a failing endpoint
/// is not retried until the window passes.
pub struct TtlCache<T: Listing> {
  record: CacheRecord<T>,
  transport: Arc<dyn Transport>,
  clock: Arc<dyn Clock>,
}

impl<T: Listing> TtlCache<T> {
  pub fn new(transport: Arc<dyn Transport>, clock: Arc<dyn Clock>, max_age: Duration) -> Self {
    Self {
      record: CacheRecord::new(max_age),
      transport,
      clock,
    }
  }

  pub fn is_valid(&self) -> bool {
    self.record.is_valid(self.clock.now_millis())
  }

  pub fn record(&self) -> &CacheRecord<T> {
    &self.record
  }

  /// Current contents, fresh or not. Empty before the first load.
  pub fn data(&self) -> &[T] {
    self.record.data().unwrap_or(&[])
  }

  /// Return cached data if still valid, otherwise fetch and store it.
  pub async fn load(&mut self) -> &[T] {
    if self.is_valid() {
      debug!(entity = T::entity_type(), "cache hit");
      return self.data();
    }

    let data = match self.fetch().await {
      Ok(data) => {
        debug!(entity = T::entity_type(), count = data.len(), "cache refreshed");
        data
      }
      Err(e) => {
        warn!(
          entity = T::entity_type(),
          endpoint = T::endpoint(),
          error = %e,
          "fetch failed, serving fallback data"
        );
        T::fallback()
      }
    };

    self.record.replace(data, self.clock.now_millis());
    self.data()
  }

  /// Drop the cached data so the next `load` refetches.
  pub fn invalidate(&mut self) {
    debug!(entity = T::entity_type(), "cache invalidated");
    self.record.clear();
  }

  async fn fetch(&self) -> Result<Vec<T>> {
    let body = self.transport.get_json(T::endpoint()).await?;
    let wire: Vec<T::Wire> = ApiResponse::decode(body)?.into_result()?;
    Ok(wire.into_iter().map(Into::into).collect())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::types::{Company, EntityId, Project, Student};
  use crate::cache::testing::MockTransport;
  use crate::cache::ManualClock;
  use serde_json::json;

  const NOW: i64 = 1_700_000_000_000;

  fn setup<T: Listing>(transport: &Arc<MockTransport>) -> (TtlCache<T>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(NOW));
    let cache = TtlCache::new(transport.clone(), clock.clone(), default_max_age());
    (cache, clock)
  }

  #[tokio::test]
  async fn test_load_populates_and_stamps() {
    let transport = Arc::new(MockTransport::new().with_json(
      "/api/studenten",
      json!({ "success": true, "data": [{ "voornaam": "Jan", "achternaam": "Jansen", "opleiding": "IT" }] }),
    ));
    let (mut cache, _clock) = setup::<Student>(&transport);

    assert!(!cache.is_valid());
    let data = cache.load().await;
    assert_eq!(data.len(), 1);
    assert_eq!(data[0].full_name(), "Jan Jansen");
    assert_eq!(data[0].programme, "IT");

    assert_eq!(cache.record().timestamp(), Some(NOW));
    assert!(cache.is_valid());
  }

  #[tokio::test]
  async fn test_second_load_is_cache_hit() {
    let transport = Arc::new(MockTransport::new().with_json("/api/bedrijven", json!([])));
    let (mut cache, _clock) = setup::<Company>(&transport);

    cache.load().await;
    cache.load().await;
    assert_eq!(transport.calls("/api/bedrijven"), 1);
  }

  #[tokio::test]
  async fn test_refetch_after_expiry() {
    let transport = Arc::new(MockTransport::new().with_json("/api/bedrijven", json!([])));
    let (mut cache, clock) = setup::<Company>(&transport);

    cache.load().await;
    clock.advance(default_max_age().num_milliseconds() - 1);
    cache.load().await;
    assert_eq!(transport.calls("/api/bedrijven"), 1);

    clock.advance(1);
    cache.load().await;
    assert_eq!(transport.calls("/api/bedrijven"), 2);
    assert_eq!(
      cache.record().timestamp(),
      Some(NOW + default_max_age().num_milliseconds())
    );
  }

  #[tokio::test]
  async fn test_failed_projects_fall_back_to_placeholder() {
    let transport = Arc::new(MockTransport::new().with_status("/api/projecten", 503));
    let (mut cache, _clock) = setup::<Project>(&transport);

    let data = cache.load().await;
    assert_eq!(data.len(), 1);
    assert_eq!(data[0].id, EntityId::Text("static-1".to_string()));
    assert_eq!(cache.record().timestamp(), Some(NOW));
  }

  #[tokio::test]
  async fn test_failure_is_not_retried_within_window() {
    let transport = Arc::new(MockTransport::new().with_status("/api/bedrijven", 500));
    let (mut cache, clock) = setup::<Company>(&transport);

    assert!(cache.load().await.is_empty());
    clock.advance(1_000);
    assert!(cache.load().await.is_empty());
    assert_eq!(transport.calls("/api/bedrijven"), 1);
  }

  #[tokio::test]
  async fn test_rejected_envelope_falls_back() {
    let transport = Arc::new(MockTransport::new().with_json(
      "/api/studenten",
      json!({ "success": false, "message": "Databank niet bereikbaar" }),
    ));
    let (mut cache, _clock) = setup::<Student>(&transport);

    assert!(cache.load().await.is_empty());
    assert!(cache.is_valid());
  }

  #[tokio::test]
  async fn test_invalidate_forces_refetch() {
    let transport = Arc::new(MockTransport::new().with_json("/api/bedrijven", json!([])));
    let (mut cache, _clock) = setup::<Company>(&transport);

    cache.load().await;
    cache.invalidate();
    assert!(!cache.is_valid());
    assert!(cache.record().timestamp().is_none());

    cache.load().await;
    assert_eq!(transport.calls("/api/bedrijven"), 2);
  }
}
