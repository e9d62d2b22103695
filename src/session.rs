//! Persisted login session (the bearer token).

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::backend::types::Session;
use crate::error::Result;

/// File-backed store for the current session.
#[derive(Debug, Clone)]
pub struct SessionStore {
  path: PathBuf,
}

impl SessionStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  /// Store at the default location, `$XDG_DATA_HOME/careerlaunch/session.json`.
  pub fn open_default() -> Option<Self> {
    Self::default_path().map(Self::new)
  }

  fn default_path() -> Option<PathBuf> {
    dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .map(|dir| dir.join("careerlaunch").join("session.json"))
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  pub fn load(&self) -> Result<Option<Session>> {
    if !self.path.exists() {
      return Ok(None);
    }

    let contents = fs::read_to_string(&self.path)?;
    let session: Session = serde_json::from_str(&contents)?;
    Ok(Some(session))
  }

  pub fn save(&self, session: &Session) -> Result<()> {
    if let Some(parent) = self.path.parent() {
      fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(session)?;

    // Write atomically via temp file
    let temp_path = self.path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, &self.path)?;

    debug!(path = %self.path.display(), "session saved");
    Ok(())
  }

  pub fn clear(&self) -> Result<()> {
    if self.path.exists() {
      fs::remove_file(&self.path)?;
      debug!(path = %self.path.display(), "session cleared");
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::backend::types::UserKind;
  use tempfile::TempDir;

  fn session() -> Session {
    Session {
      token: "tok-123".to_string(),
      user_kind: Some(UserKind::Student),
      email: Some("jan@student.be".to_string()),
    }
  }

  #[test]
  fn test_save_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let store = SessionStore::new(temp_dir.path().join("nested").join("session.json"));

    store.save(&session()).unwrap();
    assert_eq!(store.load().unwrap(), Some(session()));
  }

  #[test]
  fn test_load_missing() {
    let temp_dir = TempDir::new().unwrap();
    let store = SessionStore::new(temp_dir.path().join("session.json"));
    assert_eq!(store.load().unwrap(), None);
  }

  #[test]
  fn test_clear() {
    let temp_dir = TempDir::new().unwrap();
    let store = SessionStore::new(temp_dir.path().join("session.json"));

    store.save(&session()).unwrap();
    store.clear().unwrap();
    assert!(!store.path().exists());

    // Clearing twice is fine
    store.clear().unwrap();
  }
}
