// SPDX-License-Identifier: MIT
//
// Log setup.
//
// The terminal is in the alternate screen while drawing, so log lines go
// to a daily file under the system temp dir instead of stderr. Writing is
// non-blocking; the returned guard flushes the writer thread when dropped
// and must live until `main` returns.
//
// The filter comes from `RUST_LOG` when set, otherwise `DEFAULT_FILTER`.

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

pub const DEFAULT_FILTER: &str = "linecanvas=info,lc_canvas=info,lc_term=info";

/// Keeps the background log writer alive.
#[derive(Debug)]
pub struct LoggingGuard {
    _worker: WorkerGuard,
    log_dir: PathBuf,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

/// Where log files go: `$TMPDIR/linecanvas`.
#[must_use]
pub fn log_dir() -> PathBuf {
    std::env::temp_dir().join("linecanvas")
}

/// Install the global subscriber. Returns `None` if the log directory
/// cannot be created or a subscriber is already installed; the program
/// then runs without logging.
pub fn init() -> Option<LoggingGuard> {
    let dir = log_dir();
    std::fs::create_dir_all(&dir).ok()?;

    let appender = tracing_appender::rolling::daily(&dir, "linecanvas.log");
    let (writer, worker) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()
        .ok()?;

    tracing::info!(log_dir = %dir.display(), "logging initialized");
    Some(LoggingGuard {
        _worker: worker,
        log_dir: dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn default_filter_covers_every_crate() {
        for target in ["linecanvas=", "lc_canvas=", "lc_term="] {
            assert!(DEFAULT_FILTER.contains(target), "{target}");
        }
    }

    #[test]
    fn log_dir_is_under_temp() {
        assert!(log_dir().starts_with(std::env::temp_dir()));
        assert!(log_dir().ends_with("linecanvas"));
    }
}
