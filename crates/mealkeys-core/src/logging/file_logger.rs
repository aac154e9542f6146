//! File logging for troubleshooting
//!
//! The desktop shell has no visible stderr, so events go to a log file in
//! the temp directory. Secret values are never logged, only lengths.

use std::fmt;
use std::fs::File;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the configured filter
pub const LOG_ENV_VAR: &str = "MEALKEYS_LOG";

const LOG_FILE_NAME: &str = "mealkeys.log";

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

/// Keeps the background writer alive for the life of the process
static GUARD: OnceLock<(WorkerGuard, LogLevel)> = OnceLock::new();

/// Filter directive for `level`, unless `MEALKEYS_LOG` says otherwise
fn filter_for(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(format!("mealkeys_core={}", level)))
}

/// Install the global file subscriber
///
/// Returns `false` when logging was already initialized (by this function or
/// by the host installing its own subscriber); the existing setup is kept.
pub fn init(level: LogLevel) -> bool {
    if GUARD.get().is_some() {
        return false;
    }

    let appender = tracing_appender::rolling::never(std::env::temp_dir(), LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let installed = tracing_subscriber::registry()
        .with(filter_for(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .try_init()
        .is_ok();

    if installed {
        let _ = GUARD.set((guard, level));
        tracing::info!(path = %log_file_path().display(), %level, "logging initialized");
    }
    installed
}

/// Level passed to the [`init`] call that installed the file subscriber
pub fn installed_level() -> Option<LogLevel> {
    GUARD.get().map(|(_, level)| *level)
}

/// Get the path to the log file
pub fn log_file_path() -> PathBuf {
    std::env::temp_dir().join(LOG_FILE_NAME)
}

/// Truncate the log file
pub fn clear_log() -> std::io::Result<()> {
    File::create(log_file_path()).map(drop)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_levels_order() {
        assert!(LogLevel::Debug > LogLevel::Trace);
        assert!(LogLevel::Info > LogLevel::Debug);
        assert!(LogLevel::Warn > LogLevel::Info);
        assert!(LogLevel::Error > LogLevel::Warn);
    }

    #[test]
    fn test_parse_log_level() {
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for level in [
            LogLevel::Trace,
            LogLevel::Debug,
            LogLevel::Info,
            LogLevel::Warn,
            LogLevel::Error,
        ] {
            assert_eq!(level.to_string().parse::<LogLevel>().unwrap(), level);
        }
    }

    #[test]
    fn test_log_file_path() {
        let path = log_file_path();
        assert!(path.starts_with(std::env::temp_dir()));
        assert!(path.ends_with("mealkeys.log"));
    }

    #[test]
    fn test_init_is_idempotent() {
        // The first call may lose to a subscriber installed elsewhere; either
        // way a second call must not install again
        init(LogLevel::Debug);
        assert!(!init(LogLevel::Debug));
        tracing::debug!("logging smoke test");
    }

    #[test]
    fn test_clear_log_truncates() {
        clear_log().unwrap();
        let len = std::fs::metadata(log_file_path()).unwrap().len();
        // The non-blocking writer may flush a line right after truncation
        assert!(len < 4096);
    }
}
