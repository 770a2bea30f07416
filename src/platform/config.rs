// YAM Log Relay - platform/config.rs
//
// Platform-specific configuration, data directory resolution, and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::model::{LineLimit, RelayConfig, TrimPolicy};
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for configuration and data.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/yam/ or %APPDATA%\yam\config\)
    pub config_dir: PathBuf,

    /// Data directory for the mirrored log file.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            let fallback = PathBuf::from(".");
            Self {
                config_dir: fallback.clone(),
                data_dir: fallback,
            }
        }
    }

    /// Location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[log_window]` section.
    pub log_window: LogWindowSection,
    /// `[ui]` section.
    pub ui: UiSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[log_window]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LogWindowSection {
    /// Maximum retained lines; 0 or negative = unlimited.
    pub line_limit: Option<i64>,
    /// Share of the limit dropped per trim pass.
    pub trim_fraction: Option<f64>,
    /// Fixed number of lines dropped per trim pass (overrides the fraction).
    pub trim_batch: Option<usize>,
    /// Prefix lines with `[HH:MM:SS]`.
    pub timestamps: Option<bool>,
    /// Mirror every window line to this file (empty = no mirror).
    pub mirror_file: Option<String>,
    /// Minimum tracing level shown in the window.
    pub capture_level: Option<String>,
}

/// `[ui]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// Theme: "dark" or "light".
    pub theme: Option<String>,
    /// Body font size in points.
    pub font_size: Option<f32>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Log window --
    /// Maximum retained lines; 0 = unlimited.
    pub line_limit: i64,
    /// Trim policy resolved from `trim_batch` / `trim_fraction`.
    pub trim: TrimPolicy,
    /// Prefix lines with the emit time.
    pub timestamps: bool,
    /// File mirroring the log window.
    pub mirror_file: Option<PathBuf>,
    /// Minimum tracing level forwarded into the window.
    pub capture_level: String,

    // -- UI --
    /// Dark mode (true) or light mode (false).
    pub dark_mode: bool,
    /// Body font size in points.
    pub font_size: f32,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            line_limit: constants::DEFAULT_LINE_LIMIT,
            trim: TrimPolicy::default(),
            timestamps: true,
            mirror_file: None,
            capture_level: constants::DEFAULT_CAPTURE_LEVEL.to_string(),
            dark_mode: true,
            font_size: constants::DEFAULT_FONT_SIZE,
            log_level: None,
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Render settings for the log relay.
    pub fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            line_limit: LineLimit::new(self.line_limit),
            trim: self.trim,
            timestamps: self.timestamps,
        }
    }
}

/// Read and parse config.toml without validating values.
pub fn read_raw(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load and validate `config.toml` at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first-run).
/// If the file is unreadable or unparseable, returns defaults with a warning
/// so the application still starts but the user is informed.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let raw = match read_raw(config_path) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let (config, value_errors) = validate(raw);
    warnings.extend(value_errors.iter().map(ToString::to_string));

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

fn out_of_range(field: &str, value: impl ToString, expected: String) -> ConfigError {
    ConfigError::ValueOutOfRange {
        field: field.to_string(),
        value: value.to_string(),
        expected,
    }
}

/// Validate each field against named constants, accumulating all errors.
fn validate(raw: RawConfig) -> (AppConfig, Vec<ConfigError>) {
    let mut config = AppConfig::default();
    let mut errors = Vec::new();
    let window = raw.log_window;

    // -- Log window: line_limit --
    if let Some(limit) = window.line_limit {
        if limit <= constants::MAX_LINE_LIMIT {
            config.line_limit = limit;
        } else {
            errors.push(out_of_range(
                "[log_window] line_limit",
                limit,
                format!(
                    "at most {} (0 or negative = unlimited); using default (unlimited)",
                    constants::MAX_LINE_LIMIT
                ),
            ));
        }
    }

    // -- Log window: trim_fraction --
    if let Some(fraction) = window.trim_fraction {
        if (constants::MIN_TRIM_FRACTION..=constants::MAX_TRIM_FRACTION).contains(&fraction) {
            config.trim = TrimPolicy::Fraction(fraction);
        } else {
            errors.push(out_of_range(
                "[log_window] trim_fraction",
                fraction,
                format!(
                    "{}-{}; using default ({})",
                    constants::MIN_TRIM_FRACTION,
                    constants::MAX_TRIM_FRACTION,
                    constants::DEFAULT_TRIM_FRACTION
                ),
            ));
        }
    }

    // -- Log window: trim_batch (wins over trim_fraction) --
    if let Some(batch) = window.trim_batch {
        if batch >= constants::MIN_TRIM_BATCH {
            config.trim = TrimPolicy::Fixed(batch);
        } else {
            errors.push(out_of_range(
                "[log_window] trim_batch",
                batch,
                format!("at least {}; using trim_fraction", constants::MIN_TRIM_BATCH),
            ));
        }
    }

    if let Some(timestamps) = window.timestamps {
        config.timestamps = timestamps;
    }

    if let Some(ref file) = window.mirror_file {
        if !file.is_empty() {
            config.mirror_file = Some(PathBuf::from(file));
        }
    }

    // -- Log window: capture_level --
    if let Some(ref level) = window.capture_level {
        let lower = level.to_lowercase();
        if constants::VALID_LOG_LEVELS.contains(&lower.as_str()) {
            config.capture_level = lower;
        } else {
            errors.push(out_of_range(
                "[log_window] capture_level",
                level,
                format!(
                    "one of {}; using default ({})",
                    constants::VALID_LOG_LEVELS.join(", "),
                    constants::DEFAULT_CAPTURE_LEVEL
                ),
            ));
        }
    }

    // -- UI: theme --
    if let Some(ref theme) = raw.ui.theme {
        match theme.to_lowercase().as_str() {
            "dark" => config.dark_mode = true,
            "light" => config.dark_mode = false,
            other => {
                errors.push(out_of_range(
                    "[ui] theme",
                    other,
                    "\"dark\" or \"light\"; using default (dark)".to_string(),
                ));
            }
        }
    }

    // -- UI: font_size --
    if let Some(size) = raw.ui.font_size {
        if (constants::MIN_FONT_SIZE..=constants::MAX_FONT_SIZE).contains(&size) {
            config.font_size = size;
        } else {
            errors.push(out_of_range(
                "[ui] font_size",
                size,
                format!(
                    "{}-{}; using default ({})",
                    constants::MIN_FONT_SIZE,
                    constants::MAX_FONT_SIZE,
                    constants::DEFAULT_FONT_SIZE
                ),
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            errors.push(out_of_range(
                "[logging] level",
                level,
                format!(
                    "one of {}; using default ({})",
                    constants::VALID_LOG_LEVELS.join(", "),
                    constants::DEFAULT_LOG_LEVEL
                ),
            ));
        }
    }

    // -- Logging: file --
    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    (config, errors)
}
