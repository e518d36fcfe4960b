//! Logging setup and console progress formatting

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Pretty,
    /// JSON lines for structured logging
    Json,
}

/// Logging configuration options
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    pub fn new(level: impl Into<String>, json: bool) -> Self {
        Self {
            level: level.into(),
            format: if json { LogFormat::Json } else { LogFormat::Pretty },
        }
    }

    /// Install the global subscriber. Logs go to stderr so stdout stays
    /// free for command output.
    pub fn initialize(&self) -> Result<()> {
        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(&self.level)
                .map_err(|e| anyhow!("Invalid log level '{}': {}", self.level, e))?,
        };

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr);

        match self.format {
            LogFormat::Pretty => builder.try_init(),
            LogFormat::Json => builder.json().try_init(),
        }
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

        tracing::debug!("Logging initialized: {:?}", self);
        Ok(())
    }
}

/// Log version and platform
pub fn log_system_info() {
    tracing::info!(
        "{} {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
    tracing::debug!(
        "Platform: {} {}",
        std::env::consts::OS,
        std::env::consts::ARCH
    );
}

const BAR_LENGTH: usize = 20;

/// `[ 40%] ########------------`
pub fn progress_line(percent: u8) -> String {
    let percent = percent.min(100);
    let filled = percent as usize * BAR_LENGTH / 100;
    format!(
        "[{:>3}%] {}{}",
        percent,
        "#".repeat(filled),
        "-".repeat(BAR_LENGTH - filled)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_line() {
        assert_eq!(progress_line(0), "[  0%] --------------------");
        assert_eq!(progress_line(40), "[ 40%] ########------------");
        assert_eq!(progress_line(100), "[100%] ####################");
        assert_eq!(progress_line(150), progress_line(100));
    }

    #[test]
    fn test_config_from_flags() {
        assert_eq!(LoggingConfig::new("debug", true).format, LogFormat::Json);
        assert_eq!(LoggingConfig::new("info", false).format, LogFormat::Pretty);
        assert_eq!(LoggingConfig::default().level, "info");
    }
}
