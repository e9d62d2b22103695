//! Tracing subscriber setup.

use color_eyre::{eyre::eyre, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogConfig;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level. With `log.file` set, output goes
/// to a daily rolling file; keep the returned guard alive until exit so it is flushed.
pub fn init(config: &LogConfig) -> Result<Option<WorkerGuard>> {
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(format!("careerlaunch={}", config.level)));

  match &config.file {
    Some(path) => {
      let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."));
      let file_name = path
        .file_name()
        .ok_or_else(|| eyre!("Invalid log file path: {}", path.display()))?;

      let appender = tracing_appender::rolling::daily(dir, file_name);
      let (writer, guard) = tracing_appender::non_blocking(appender);

      tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .map_err(|e| eyre!("Failed to initialize logging: {}", e))?;

      Ok(Some(guard))
    }
    None => {
      tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| eyre!("Failed to initialize logging: {}", e))?;

      Ok(None)
    }
  }
}
