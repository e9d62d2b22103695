//! Core traits for the listing cache.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;

/// Trait for entity types that are listed through a cached endpoint.
pub trait Listing: Clone + Send + Sync + 'static {
  /// Wire shape of one list element.
  type Wire: DeserializeOwned + Into<Self>;

  /// Endpoint returning the full list (e.g., "/api/bedrijven")
  fn endpoint() -> &'static str;

  /// Entity type name used in log output
  fn entity_type() -> &'static str;

  /// Data served when the list could not be fetched.
  fn fallback() -> Vec<Self> {
    Vec::new()
  }
}

/// Fetch dependency of the cache: a GET returning the decoded JSON body.
#[async_trait]
pub trait Transport: Send + Sync {
  async fn get_json(&self, endpoint: &str) -> Result<Value>;
}
