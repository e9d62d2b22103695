// Error types for the CareerLaunch API client.
// Covers transport failures, HTTP status errors, envelope rejections and client-side validation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
  #[error("Network error: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("Session expired or missing: please log in again")]
  Unauthorized,

  #[error("HTTP {status}: {message}")]
  Status { status: u16, message: String },

  #[error("{message}")]
  Rejected { message: String },

  #[error("{0}")]
  Validation(String),

  #[error("Invalid response body: {0}")]
  Json(#[from] serde_json::Error),

  #[error("Invalid API url: {0}")]
  Url(#[from] url::ParseError),

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),
}

impl ApiError {
  /// True for failures that never reached the application layer of the server.
  pub fn is_network(&self) -> bool {
    matches!(self, ApiError::Transport(_))
  }
}

pub type Result<T> = std::result::Result<T, ApiError>;
