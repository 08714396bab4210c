//! Registrar observability.
//!
//! Installs the global tracing subscriber:
//!
//! - a compact console layer filtered by `RUST_LOG`, or by `LOG_LEVEL`
//!   (default `info`) with noisy dependencies held at `warn`
//! - a daily-rolling JSON file layer in `LOG_DIR` (default `storage/logs`)
//!   for structured ingestion
//!
//! # Examples
//!
//! ```no_run
//! registrar_observability::init_tracing();
//! tracing::info!("Setting up the application");
//! ```

use std::fs;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const DEFAULT_LOG_DIR: &str = "storage/logs";

/// Default filter directive for a given level.
pub fn default_filter(level: &str) -> String {
    format!("{level},tower_http=warn,hyper=warn,h2=warn,sqlx=warn")
}

fn console_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        EnvFilter::new(default_filter(&level))
    })
}

pub fn init_tracing() {
    let console_layer = fmt::layer()
        .compact()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(console_filter());

    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| DEFAULT_LOG_DIR.to_string());

    // JSON file layer for structured logs
    let json_layer = match fs::create_dir_all(&log_dir) {
        Ok(()) => {
            let json_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "registrar.json");
            Some(
                fmt::layer()
                    .json()
                    .with_writer(json_appender)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_ansi(false)
                    .with_filter(EnvFilter::new(default_filter("info"))),
            )
        }
        Err(e) => {
            eprintln!("Failed to create log directory {log_dir}: {e}. Continuing with console logging only");
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(json_layer)
        .init();
}
