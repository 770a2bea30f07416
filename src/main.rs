// YAM Log Relay - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading and logging initialisation
// 3. Relay construction on the main thread (the owner thread)
// 4. eframe GUI launch, or a headless stdout run

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` and other
// binary-side code can still use `crate::app::...`, `crate::core::...` etc.
pub use yam_logrelay::app;

pub use yam_logrelay::core;
pub use yam_logrelay::platform;
pub use yam_logrelay::ui;
pub use yam_logrelay::util;

use app::tee::TeeSink;
use app::traffic::BurstConfig;
use clap::Parser;
use core::relay::LogRelay;
use platform::config::AppConfig;
use platform::fs::FileSink;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use util::constants;

/// YAM Log - cross-thread log window.
///
/// Shows log lines emitted from any thread in a bounded, scrollable window.
/// Producer threads queue their lines; the UI thread renders them.
#[derive(Parser, Debug)]
#[command(name = "yam-logrelay", version, about)]
struct Cli {
    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,

    /// Run without a window: print the log to stdout and exit after one burst.
    #[arg(long)]
    headless: bool,

    /// Producer threads per traffic burst.
    #[arg(short = 't', long, default_value_t = constants::DEFAULT_BURST_THREADS)]
    threads: usize,

    /// Lines emitted by each producer thread per burst.
    #[arg(short = 'm', long, default_value_t = constants::DEFAULT_BURST_MESSAGES)]
    messages: usize,

    /// Override the configured line limit (0 or negative = unlimited).
    #[arg(short = 'l', long = "line-limit", allow_hyphen_values = true)]
    line_limit: Option<i64>,

    /// Directory holding config.toml (overrides the platform default).
    #[arg(long = "config-dir")]
    config_dir: Option<PathBuf>,

    /// Mirror the log window to yam.log in the data directory when the
    /// config names no mirror file.
    #[arg(long)]
    mirror: bool,
}

fn main() {
    let cli = Cli::parse();

    // Configuration is needed before logging can be initialised; its
    // warnings are replayed once the subscriber is up.
    let platform_paths = platform::config::PlatformPaths::resolve();
    let config_path = cli
        .config_dir
        .as_ref()
        .map(|dir| dir.join(constants::CONFIG_FILE_NAME))
        .unwrap_or_else(|| platform_paths.config_file());
    let (mut config, config_warnings) = platform::config::load_config(&config_path);
    if let Some(limit) = cli.line_limit {
        config.line_limit = limit;
    }
    config.mirror_file = match config.mirror_file.take() {
        Some(path) if path.is_relative() => Some(platform_paths.data_dir.join(path)),
        Some(path) => Some(path),
        None if cli.mirror => Some(platform_paths.data_dir.join(constants::MIRROR_FILE_NAME)),
        None => None,
    };

    util::logging::init(
        cli.debug,
        config.log_level.as_deref(),
        config.log_file.as_deref(),
        &config.capture_level,
    );

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        headless = cli.headless,
        config = %config_path.display(),
        "YAM log starting"
    );

    let threads = cli.threads.clamp(1, constants::MAX_BURST_THREADS);
    if threads != cli.threads {
        tracing::warn!(requested = cli.threads, using = threads, "Producer thread count clamped");
    }
    let burst = BurstConfig {
        threads,
        per_thread: cli.messages,
        interval: Duration::from_millis(constants::BURST_EMIT_INTERVAL_MS),
    };

    let mirror = open_mirror(&config);

    let code = if cli.headless {
        run_headless(&config, mirror, burst, &config_warnings)
    } else {
        run_gui(config, mirror, burst, config_warnings)
    };
    std::process::exit(code);
}

/// Open the file mirror named in the config, if any.
///
/// A mirror that cannot be opened is reported and skipped; the window still
/// works without it.
fn open_mirror(config: &AppConfig) -> Option<FileSink> {
    let path = config.mirror_file.as_deref()?;
    match FileSink::open(path) {
        Ok(sink) => {
            tracing::info!(path = sink.label(), "Mirroring log window to file");
            Some(sink)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Log mirror disabled");
            None
        }
    }
}

fn replay_config_warnings(warnings: &[String]) {
    for warning in warnings {
        tracing::warn!(warning = %warning, "Configuration warning");
    }
}

/// Run one traffic burst against a stdout relay owned by the main thread.
///
/// Returns the process exit code: non-zero when a producer thread panicked
/// or the relay could not be installed.
fn run_headless(
    config: &AppConfig,
    mirror: Option<FileSink>,
    burst: BurstConfig,
    warnings: &[String],
) -> i32 {
    let sink = TeeSink::new(platform::fs::stdout_sink(), mirror);
    let relay = Arc::new(LogRelay::new(sink, config.relay_config()));
    if let Err(e) = app::registry::install(relay.clone()) {
        tracing::error!(error = %e, "Cannot install log relay");
        return 1;
    }
    replay_config_warnings(warnings);

    let handle = app::traffic::spawn_burst(relay.clone(), burst);
    let interval = Duration::from_millis(constants::HEADLESS_FLUSH_INTERVAL_MS);
    while !handle.is_finished() {
        relay.flush();
        std::thread::sleep(interval);
    }
    let panicked = handle.join();
    relay.flush();

    let stats = relay.stats();
    tracing::info!(
        rendered = stats.rendered,
        trimmed = stats.trimmed,
        misuse = stats.misuse,
        "Headless run complete"
    );
    relay.flush();
    app::registry::uninstall();

    if panicked > 0 {
        tracing::error!(panicked, "Log producer threads panicked");
        1
    } else {
        0
    }
}

/// Apply theme and font size from config to the egui context.
fn apply_style(ctx: &egui::Context, config: &AppConfig) {
    ctx.set_visuals(if config.dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    });
    let size = config.font_size;
    ctx.style_mut(|style| {
        for (text_style, font_id) in style.text_styles.iter_mut() {
            match text_style {
                egui::TextStyle::Small => font_id.size = size * 0.8,
                egui::TextStyle::Heading => font_id.size = size * 1.4,
                _ => font_id.size = size,
            }
        }
    });
}

fn run_gui(
    config: AppConfig,
    mirror: Option<FileSink>,
    burst: BurstConfig,
    warnings: Vec<String>,
) -> i32 {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!("{} v{}", constants::APP_NAME, constants::APP_VERSION))
            .with_inner_size(ui::theme::WINDOW_SIZE)
            .with_min_inner_size(ui::theme::WINDOW_MIN_SIZE),
        ..Default::default()
    };

    let result = eframe::run_native(
        constants::APP_NAME,
        native_options,
        Box::new(move |cc| {
            apply_style(&cc.egui_ctx, &config);

            // The creator runs on the event-loop thread, which makes this
            // thread the relay owner.
            let repaint = cc.egui_ctx.clone();
            let sink = TeeSink::new(app::log_buffer::LogBuffer::new(), mirror);
            let relay = Arc::new(
                LogRelay::new(sink, config.relay_config())
                    .with_wakeup(move || repaint.request_repaint()),
            );
            if let Err(e) = app::registry::install(relay.clone()) {
                tracing::warn!(error = %e, "Log window not installed as global relay");
            }
            replay_config_warnings(&warnings);

            Ok(Box::new(gui::YamLogApp::new(relay, config, burst)))
        }),
    );

    match result {
        Ok(()) => 0,
        Err(e) => {
            tracing::error!(error = %e, "Failed to launch GUI");
            eprintln!("Error: Failed to launch {} GUI: {e}", constants::APP_NAME);
            1
        }
    }
}
