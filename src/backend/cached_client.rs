//! Listing cache service: the three entity caches owned by one composer.

use std::sync::Arc;

use chrono::Duration;

use crate::cache::{Clock, Transport, TtlCache};
use crate::search::{self, SearchOutcome};

use super::cache::CacheKey;
use super::types::{Company, Project, Student};

/// Company, student and project listings with a shared TTL.
///
/// Writes made elsewhere (profile updates, reservations) are not observed;
/// callers that need fresh data call `invalidate` themselves.
pub struct ListingCaches {
  pub companies: TtlCache<Company>,
  pub students: TtlCache<Student>,
  pub projects: TtlCache<Project>,
}

impl ListingCaches {
  pub fn new(transport: Arc<dyn Transport>, clock: Arc<dyn Clock>, max_age: Duration) -> Self {
    Self {
      companies: TtlCache::new(transport.clone(), clock.clone(), max_age),
      students: TtlCache::new(transport.clone(), clock.clone(), max_age),
      projects: TtlCache::new(transport, clock, max_age),
    }
  }

  /// Load one slot; a no-op while that slot is still valid.
  pub async fn load(&mut self, key: CacheKey) {
    match key {
      CacheKey::Bedrijven => {
        self.companies.load().await;
      }
      CacheKey::Studenten => {
        self.students.load().await;
      }
      CacheKey::Projecten => {
        self.projects.load().await;
      }
    }
  }

  /// Load all slots concurrently. Each load only touches its own slot.
  pub async fn load_all(&mut self) {
    tokio::join!(
      self.companies.load(),
      self.students.load(),
      self.projects.load()
    );
  }

  pub fn is_valid(&self, key: CacheKey) -> bool {
    match key {
      CacheKey::Bedrijven => self.companies.is_valid(),
      CacheKey::Studenten => self.students.is_valid(),
      CacheKey::Projecten => self.projects.is_valid(),
    }
  }

  pub fn invalidate(&mut self, key: CacheKey) {
    match key {
      CacheKey::Bedrijven => self.companies.invalidate(),
      CacheKey::Studenten => self.students.invalidate(),
      CacheKey::Projecten => self.projects.invalidate(),
    }
  }

  pub fn invalidate_all(&mut self) {
    for key in CacheKey::ALL {
      self.invalidate(key);
    }
  }

  /// Search the current cache contents. Does not load anything.
  pub fn search(&self, term: &str) -> SearchOutcome<'_> {
    search::search(
      term,
      self.companies.data(),
      self.students.data(),
      self.projects.data(),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::testing::MockTransport;
  use crate::cache::{default_max_age, ManualClock};
  use crate::search::EntityKind;
  use serde_json::json;

  fn transport() -> Arc<MockTransport> {
    Arc::new(
      MockTransport::new()
        .with_json(
          "/api/bedrijven",
          json!({ "success": true, "data": [
            { "bedrijfId": 1, "naam": "BrusselsTech", "sector": "IT", "gemeente": "Brussel" },
            { "bedrijfId": 2, "naam": "Gentse Koffie", "sector": "Horeca", "gemeente": "Gent" }
          ] }),
        )
        .with_json(
          "/api/studenten",
          json!([{ "studentId": 8, "voornaam": "Bruno", "achternaam": "Claes", "opleiding": "IT", "gemeente": "Leuven" }]),
        )
        .with_status("/api/projecten", 500),
    )
  }

  fn caches(transport: &Arc<MockTransport>) -> ListingCaches {
    ListingCaches::new(
      transport.clone(),
      Arc::new(ManualClock::new(0)),
      default_max_age(),
    )
  }

  #[tokio::test]
  async fn test_load_all_fills_every_slot() {
    let transport = transport();
    let mut caches = caches(&transport);

    caches.load_all().await;
    assert_eq!(caches.companies.data().len(), 2);
    assert_eq!(caches.students.data().len(), 1);
    assert_eq!(caches.projects.data().len(), 1);
    for key in CacheKey::ALL {
      assert!(caches.is_valid(key));
    }
  }

  #[tokio::test]
  async fn test_invalidate_single_slot() {
    let transport = transport();
    let mut caches = caches(&transport);

    caches.load_all().await;
    caches.invalidate(CacheKey::Studenten);
    assert!(!caches.is_valid(CacheKey::Studenten));
    assert!(caches.is_valid(CacheKey::Bedrijven));

    caches.load_all().await;
    assert_eq!(transport.calls("/api/studenten"), 2);
    assert_eq!(transport.calls("/api/bedrijven"), 1);
  }

  #[tokio::test]
  async fn test_invalidate_all() {
    let transport = transport();
    let mut caches = caches(&transport);

    caches.load(CacheKey::Bedrijven).await;
    caches.invalidate_all();
    assert!(caches.companies.data().is_empty());
    assert!(CacheKey::ALL.iter().all(|k| !caches.is_valid(*k)));
  }

  #[tokio::test]
  async fn test_search_over_loaded_caches() {
    let transport = transport();
    let mut caches = caches(&transport);
    caches.load_all().await;

    let outcome = caches.search("bru");
    assert_eq!(outcome.suggestions, vec!["BrusselsTech", "Bruno Claes"]);
    let kinds: Vec<EntityKind> = outcome.results.iter().map(|h| h.kind()).collect();
    assert_eq!(kinds, vec![EntityKind::Company, EntityKind::Student]);

    assert_eq!(caches.search("").results.len(), 0);
  }
}
