use std::path::PathBuf;
use std::sync::OnceLock;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

const LOG_FILE_NAME: &str = "resultchain.jsonl";

static PANIC_HOOK_INSTALLED: OnceLock<()> = OnceLock::new();

/// Keeps the file writer alive; drop it only at process exit.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

pub fn logs_dir() -> PathBuf {
    crate::config::app_data_dir().join("logs")
}

pub fn log_path() -> PathBuf {
    logs_dir().join(LOG_FILE_NAME)
}

/// Installs stderr + JSONL file logging. `RUST_LOG` wins over `default_filter`.
pub fn init(default_filter: &str) -> Result<LoggingGuard, String> {
    let log_dir = logs_dir();
    std::fs::create_dir_all(&log_dir)
        .map_err(|e| format!("failed to create logs dir {}: {e}", log_dir.display()))?;

    let file_appender = tracing_appender::rolling::never(&log_dir, LOG_FILE_NAME);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|e| format!("invalid log filter '{default_filter}': {e}"))?;

    let json_layer = fmt::layer()
        .json()
        .with_writer(non_blocking_file)
        .with_target(true)
        .with_level(true);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| format!("failed to install subscriber: {e}"))?;

    install_panic_hook();
    tracing::info!(log_path = %log_path().display(), "logging initialized");

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

fn install_panic_hook() {
    let _ = PANIC_HOOK_INSTALLED.get_or_init(|| {
        let prior = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let location = panic_info
                .location()
                .map(|l| format!("{}:{}", l.file(), l.line()))
                .unwrap_or_else(|| "unknown".to_string());
            let payload = panic_info
                .payload()
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "panic payload unavailable".to_string());
            tracing::error!(%location, %payload, "panic");
            prior(panic_info);
        }));
    });
}
