// YAM Log Relay - util/logging.rs
//
// Structured logging with runtime-selectable debug mode.
//
// Activation:
//   - Environment variable: RUST_LOG=debug (or trace)
//   - CLI flag: --debug
//   - Config file: [logging] level = "debug"
//
// Output layers:
//   - stderr, always (this is also the fallback channel for relay misuse
//     diagnostics);
//   - a plain-text file when [logging] file is set;
//   - the log window, through the relay bridge, at [log_window] capture_level.

use crate::app::bridge::RelayLayer;
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Initialise the logging subsystem.
///
/// `debug_flag` is true when the user passed --debug on the CLI.
/// `config_level` is the level from config.toml (if present).
/// `log_file` is the optional log file path from config.toml.
/// `capture_level` is the minimum level forwarded into the log window.
///
/// Priority: RUST_LOG env var > CLI --debug flag > config level > default "info".
pub fn init(
    debug_flag: bool,
    config_level: Option<&str>,
    log_file: Option<&str>,
    capture_level: &str,
) {
    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(build_filter(debug_flag, config_level));

    let mut file_error = None;
    let file_layer = log_file.and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_writer(Mutex::new(file))
                    .with_filter(build_filter(debug_flag, config_level)),
            ),
            Err(e) => {
                file_error = Some(format!("Cannot open log file '{path}': {e}"));
                None
            }
        }
    });

    let capture = capture_level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::INFO);
    let relay_layer = RelayLayer::global().with_filter(capture);

    if let Err(e) = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .with(relay_layer)
        .try_init()
    {
        eprintln!("Logging already initialised: {e}");
        return;
    }

    if let Some(msg) = file_error {
        tracing::warn!("{}", msg);
    }

    tracing::debug!(
        app = super::constants::APP_NAME,
        version = super::constants::APP_VERSION,
        capture = %capture,
        "Logging initialised"
    );
}

fn build_filter(debug_flag: bool, config_level: Option<&str>) -> EnvFilter {
    if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if debug_flag {
        EnvFilter::new("debug")
    } else if let Some(level) = config_level {
        EnvFilter::new(level)
    } else {
        EnvFilter::new(super::constants::DEFAULT_LOG_LEVEL)
    }
}
