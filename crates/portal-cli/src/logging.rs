use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_appender::rolling::Rotation;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "PORTAL_LOG";

/// Where log lines go. The chat UI owns the terminal, so it logs to a file.
pub enum LogTarget {
    Stderr,
    File,
}

pub fn log_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join("portal").join("logs"))
}

/// Installs the global subscriber. Keep the returned guard alive until exit
/// or buffered file output is lost.
pub fn init(target: LogTarget) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match target {
        LogTarget::File => {
            let Some(dir) = log_dir() else {
                let _ = registry.try_init();
                return None;
            };
            let appender = match RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("portal")
                .filename_suffix("log")
                .build(&dir)
            {
                Ok(appender) => appender,
                Err(err) => {
                    eprintln!("warning: cannot log to {}: {err}", dir.display());
                    let _ = registry.try_init();
                    return None;
                }
            };
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(writer)
                        .with_ansi(false)
                        .with_target(false),
                )
                .try_init();
            Some(guard)
        }
        LogTarget::Stderr => {
            let _ = registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(false)
                        .compact(),
                )
                .try_init();
            None
        }
    }
}
