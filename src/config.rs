use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
  #[serde(default)]
  pub api: ApiConfig,
  #[serde(default)]
  pub cache: CacheConfig,
  #[serde(default)]
  pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
  /// Base url of the CareerLaunch server; a path prefix is kept
  #[serde(default = "default_url")]
  pub url: String,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      url: default_url(),
      timeout_secs: default_timeout_secs(),
    }
  }
}

fn default_url() -> String {
  "http://localhost:3000".to_string()
}

fn default_timeout_secs() -> u64 {
  10
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
  /// How long listings stay valid
  #[serde(default = "default_max_age_secs")]
  pub max_age_secs: u64,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      max_age_secs: default_max_age_secs(),
    }
  }
}

impl CacheConfig {
  /// `None` when `max_age_secs` does not fit a `chrono::Duration`.
  pub fn try_max_age(&self) -> Option<chrono::Duration> {
    i64::try_from(self.max_age_secs)
      .ok()
      .and_then(chrono::Duration::try_seconds)
  }

  /// Validity window of the listing caches. Out-of-range values are
  /// rejected by `Config::load`, so this only falls back for hand-built configs.
  pub fn max_age(&self) -> chrono::Duration {
    self
      .try_max_age()
      .unwrap_or_else(|| chrono::Duration::seconds(default_max_age_secs() as i64))
  }
}

fn default_max_age_secs() -> u64 {
  5 * 60
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
  /// Write logs to this file (rotated daily) instead of stderr
  pub file: Option<PathBuf>,
  #[serde(default = "default_level")]
  pub level: String,
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      file: None,
      level: default_level(),
    }
  }
}

fn default_level() -> String {
  "warn".to_string()
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./careerlaunch.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/careerlaunch/config.yaml
  ///
  /// Without a config file the defaults are used.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => {
        debug!("no config file found, using defaults");
        Ok(Self::default())
      }
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("careerlaunch.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("careerlaunch").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config = Self::parse(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;
    config.validate(path)?;
    Ok(config)
  }

  fn validate(&self, path: &Path) -> Result<()> {
    if self.cache.try_max_age().is_none() {
      return Err(eyre!(
        "Invalid cache.max_age_secs {} in {}: value out of range",
        self.cache.max_age_secs,
        path.display()
      ));
    }
    Ok(())
  }

  fn parse(contents: &str) -> std::result::Result<Self, serde_yaml::Error> {
    // An empty file deserializes to unit, not to an empty mapping
    if contents.trim().is_empty() {
      return Ok(Self::default());
    }
    serde_yaml::from_str(contents)
  }

  /// Get a bearer token from the environment, overriding the stored session.
  ///
  /// Checks CAREERLAUNCH_TOKEN.
  pub fn get_token() -> Option<String> {
    std::env::var("CAREERLAUNCH_TOKEN")
      .ok()
      .filter(|t| !t.trim().is_empty())
  }

  /// Get the account password from the environment.
  ///
  /// Checks CAREERLAUNCH_PASSWORD.
  pub fn get_password() -> Result<String> {
    std::env::var("CAREERLAUNCH_PASSWORD").map_err(|_| {
      eyre!("Password not given. Pass --password or set CAREERLAUNCH_PASSWORD.")
    })
  }
}
