use std::any::Any;
use std::path::PathBuf;
use std::sync::OnceLock;

pub const LOG_FILTER_ENV: &str = "STOCKWATCH_LOG";
pub const LOG_DIR_ENV: &str = "STOCKWATCH_LOG_DIR";

const DEFAULT_FILTER: &str = "error,stockwatch=debug";

static ACTIVE_LOG_DIR: OnceLock<PathBuf> = OnceLock::new();

pub fn default_log_dir() -> PathBuf {
    if let Some(dir) = crate::path_env::dir_override(LOG_DIR_ENV) {
        return dir;
    }

    #[cfg(target_os = "macos")]
    {
        dirs::home_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("Library/Logs/StockWatch")
    }
    #[cfg(not(target_os = "macos"))]
    {
        crate::path_env::data_dir().join("logs")
    }
}

fn fallback_log_dir() -> PathBuf {
    std::env::temp_dir().join("stockwatch").join("logs")
}

/// Directory the running logger writes to
#[must_use]
pub fn active_log_dir() -> PathBuf {
    ACTIVE_LOG_DIR
        .get()
        .cloned()
        .unwrap_or_else(default_log_dir)
}

fn local_offset() -> time::UtcOffset {
    time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC)
}

fn filter_directives() -> String {
    std::env::var(LOG_FILTER_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

/// Install the file logger; keep the returned guard alive until exit
pub fn init() -> anyhow::Result<impl Any> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let primary_log_dir = default_log_dir();
    let log_dir = if std::fs::create_dir_all(&primary_log_dir).is_ok() {
        primary_log_dir
    } else {
        let fallback = fallback_log_dir();
        let _ = std::fs::create_dir_all(&fallback);
        fallback
    };

    let _ = ACTIVE_LOG_DIR.set(log_dir.clone());

    let writer = RollingFileAppender::builder()
        .filename_prefix("stockwatch")
        .filename_suffix("log")
        .max_log_files(5)
        .rotation(Rotation::DAILY)
        .build(&log_dir)
        .map_err(|err| anyhow::anyhow!("cannot open log directory {}: {err}", log_dir.display()))?;
    let (writer, guard) = tracing_appender::non_blocking(writer);

    let timer = fmt::time::OffsetTime::new(
        local_offset(),
        time::format_description::well_known::Rfc3339,
    );
    let file_line = cfg!(debug_assertions);

    let subscriber = fmt::layer()
        .with_ansi(false)
        .with_timer(timer)
        .with_thread_ids(true)
        .with_file(file_line)
        .with_line_number(file_line)
        .with_writer(writer)
        .with_filter(tracing_subscriber::EnvFilter::new(filter_directives()));

    tracing_subscriber::registry().with(subscriber).init();
    Ok(guard)
}
