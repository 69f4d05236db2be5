use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

const CRATES: &[&str] = &[
    "marquee",
    "marquee_core",
    "marquee_api",
    "marquee_runtime",
];

fn directives(level: &str) -> String {
    CRATES
        .iter()
        .map(|c| format!("{c}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Console logging to stderr plus a daily log file in `log_dir`.
///
/// `RUST_LOG` overrides the console filter. The returned guard flushes the
/// file writer on drop and must be kept alive for the whole run.
pub fn init(verbose: bool, log_dir: &Path) -> Option<WorkerGuard> {
    let console_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,{}",
            directives(if verbose { "debug" } else { "info" })
        ))
    });
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_filter(console_filter);

    let (file_layer, guard) = match std::fs::create_dir_all(log_dir) {
        Ok(()) => {
            let appender = tracing_appender::rolling::daily(log_dir, "marquee.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_filter(EnvFilter::new(format!("warn,{}", directives("debug"))));
            (Some(layer), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .init();

    if guard.is_none() {
        tracing::warn!(dir = %log_dir.display(), "could not create log directory, file logging disabled");
    }
    guard
}
