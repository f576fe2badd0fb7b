use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config;

/// Environment variable holding the filter directives, e.g. `MOVER_LOG=debug`.
pub const LOG_ENV: &str = "MOVER_LOG";

/// Installs the global subscriber when [`LOG_ENV`] is set. Nothing is emitted
/// otherwise, so the child owns the console.
///
/// Keep the returned guard alive until exit so buffered file output is flushed.
pub fn init(log_to_file: bool) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_env(LOG_ENV).ok()?;

    if log_to_file {
        let log_dir = config::project_paths()
            .map(|p| p.log_dir)
            .unwrap_or_else(|_| ".".into());
        std::fs::create_dir_all(&log_dir).ok();
        let file_appender = tracing_appender::rolling::daily(&log_dir, "launcher.log");
        let (nb, guard) = tracing_appender::non_blocking(file_appender);
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(nb)
            .with_ansi(false)
            .try_init();
        Some(guard)
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
        None
    }
}
