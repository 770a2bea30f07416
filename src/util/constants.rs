// YAM Log Relay - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "YAM Log";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "yam";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Log window limits
// =============================================================================

/// Default retained-line limit. Zero means unlimited.
pub const DEFAULT_LINE_LIMIT: i64 = 0;

/// Hard upper bound on the configurable line limit (prevents configuration
/// mistakes from turning the log window into an unbounded buffer by accident).
pub const MAX_LINE_LIMIT: i64 = 1_000_000;

/// Default share of the line limit dropped per trim pass.
///
/// With a limit of 500 this removes 25 lines per pass, which matches the
/// pacing of the old fixed batch while scaling with smaller limits.
pub const DEFAULT_TRIM_FRACTION: f64 = 0.05;

/// Smallest accepted trim fraction.
pub const MIN_TRIM_FRACTION: f64 = 0.01;

/// Largest accepted trim fraction (trim everything on overflow).
pub const MAX_TRIM_FRACTION: f64 = 1.0;

/// Minimum number of lines removed by a single trim pass.
pub const MIN_TRIM_BATCH: usize = 1;

/// Prefixes rendered in front of each log line by kind.
pub const PREFIX_MESSAGE: &str = "* ";
pub const PREFIX_WARNING: &str = "** ";
pub const PREFIX_ERROR: &str = "*** ";

/// strftime pattern for the per-line timestamp prefix.
pub const TIMESTAMP_FORMAT: &str = "[%H:%M:%S] ";

// =============================================================================
// Traffic generator
// =============================================================================

/// Default number of producer threads for a demo burst.
pub const DEFAULT_BURST_THREADS: usize = 4;

/// Default number of records emitted by each producer thread.
pub const DEFAULT_BURST_MESSAGES: usize = 100;

/// Upper bound on producer threads per burst.
pub const MAX_BURST_THREADS: usize = 64;

/// Pause between records emitted by a burst producer (ms). Keeps the GUI
/// demo readable; zero would flood the window in a single frame.
pub const BURST_EMIT_INTERVAL_MS: u64 = 5;

/// How often the headless host drains the relay (ms).
pub const HEADLESS_FLUSH_INTERVAL_MS: u64 = 50;

// =============================================================================
// UI defaults
// =============================================================================

/// Default UI body font size in points.
pub const DEFAULT_FONT_SIZE: f32 = 14.0;

/// Minimum user-configurable UI font size (points).
pub const MIN_FONT_SIZE: f32 = 10.0;

/// Maximum user-configurable UI font size (points).
pub const MAX_FONT_SIZE: f32 = 24.0;

// =============================================================================
// Logging
// =============================================================================

/// Default log level for the stderr subscriber.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default minimum level of tracing events forwarded into the log window.
pub const DEFAULT_CAPTURE_LEVEL: &str = "info";

/// Valid level names accepted in config.toml.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Tracing target for relay misuse diagnostics. Events under this target are
/// never forwarded back into the relay.
pub const DIAGNOSTIC_TARGET: &str = "yam_logrelay::diagnostic";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default file name for the log window mirror inside the data directory.
pub const MIRROR_FILE_NAME: &str = "yam.log";
