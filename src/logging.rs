use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const LOG_FILE_NAME: &str = "stride.log";

/// Route `tracing` output to a file in `dir`; the terminal belongs to the TUI.
///
/// `RUST_LOG` takes precedence over `default_level`. Keep the returned guard
/// alive for the life of the program or buffered lines are lost on exit.
pub fn init(dir: &Path, default_level: &str) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(dir)?;
    let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("warn,stride={default_level}")))
        .unwrap_or_else(|_| EnvFilter::new("warn,stride=info"));

    // fails only when a global subscriber already exists; that one stays in charge
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .try_init();

    Ok(guard)
}
