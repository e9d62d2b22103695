//! In-memory transport for cache tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ApiError, Result};

use super::traits::Transport;

#[derive(Debug, Clone)]
enum Reply {
  Json(Value),
  Status(u16),
}

/// Transport that serves canned replies per endpoint and counts calls.
#[derive(Debug, Default)]
pub struct MockTransport {
  replies: HashMap<String, Reply>,
  calls: Mutex<HashMap<String, usize>>,
}

impl MockTransport {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_json(mut self, endpoint: &str, body: Value) -> Self {
    self.replies.insert(endpoint.to_string(), Reply::Json(body));
    self
  }

  pub fn with_status(mut self, endpoint: &str, status: u16) -> Self {
    self.replies.insert(endpoint.to_string(), Reply::Status(status));
    self
  }

  pub fn calls(&self, endpoint: &str) -> usize {
    self
      .calls
      .lock()
      .unwrap()
      .get(endpoint)
      .copied()
      .unwrap_or(0)
  }
}

#[async_trait]
impl Transport for MockTransport {
  async fn get_json(&self, endpoint: &str) -> Result<Value> {
    *self
      .calls
      .lock()
      .unwrap()
      .entry(endpoint.to_string())
      .or_default() += 1;

    match self.replies.get(endpoint) {
      Some(Reply::Json(body)) => Ok(body.clone()),
      Some(Reply::Status(status)) => Err(ApiError::Status {
        status: *status,
        message: "mock failure".to_string(),
      }),
      None => Err(ApiError::Status {
        status: 404,
        message: format!("no mock reply for {}", endpoint),
      }),
    }
  }
}
