use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Environment variable naming a file to receive DEBUG logs instead of stderr
pub const LOG_FILE_ENV: &str = "GEORGIE_LOG_FILE";

/// Install the global subscriber.
///
/// Logs go to stderr filtered by `RUST_LOG` (default `warn`) so that stdout
/// stays clean JSON. With `GEORGIE_LOG_FILE` set, everything at DEBUG and
/// above is appended to that file instead.
pub fn init_tracing() {
    let file_logging = std::env::var(LOG_FILE_ENV).ok();

    if let Some(log_path) = file_logging {
        match OpenOptions::new().create(true).append(true).open(&log_path) {
            Ok(file) => {
                let file_layer = fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_target(true)
                    .with_filter(tracing_subscriber::filter::LevelFilter::DEBUG);
                tracing_subscriber::registry().with(file_layer).init();
                return;
            }
            Err(e) => {
                eprintln!("Warning: cannot open log file {}: {}", log_path, e);
            }
        }
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter);
    tracing_subscriber::registry().with(stderr_layer).init();
}
