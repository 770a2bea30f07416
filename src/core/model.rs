// YAM Log Relay - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use crate::core::encoding;
use crate::util::constants::{
    DEFAULT_TRIM_FRACTION, MIN_TRIM_BATCH, PREFIX_ERROR, PREFIX_MESSAGE, PREFIX_WARNING,
    TIMESTAMP_FORMAT,
};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

// =============================================================================
// LogKind
// =============================================================================

/// Class of a log line. Drives the rendered prefix and style only; the relay
/// queues and orders every kind identically.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    #[default]
    Plain,
    Message,
    Warning,
    Error,
}

impl LogKind {
    /// Returns all variants in display order.
    pub fn all() -> &'static [LogKind] {
        &[
            LogKind::Plain,
            LogKind::Message,
            LogKind::Warning,
            LogKind::Error,
        ]
    }

    /// Marker rendered in front of the line text.
    pub fn prefix(&self) -> &'static str {
        match self {
            LogKind::Plain => "",
            LogKind::Message => PREFIX_MESSAGE,
            LogKind::Warning => PREFIX_WARNING,
            LogKind::Error => PREFIX_ERROR,
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            LogKind::Plain => "Plain",
            LogKind::Message => "Message",
            LogKind::Warning => "Warning",
            LogKind::Error => "Error",
        }
    }
}

impl std::fmt::Display for LogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl From<tracing::Level> for LogKind {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => LogKind::Error,
            tracing::Level::WARN => LogKind::Warning,
            tracing::Level::INFO => LogKind::Message,
            _ => LogKind::Plain,
        }
    }
}

// =============================================================================
// LogRecord
// =============================================================================

/// One queued log entry awaiting render.
///
/// The text is copied and sanitised at construction so the producer's buffer
/// can be reused immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub text: String,
    pub kind: LogKind,
    /// Wall-clock time at which the record was emitted (not rendered).
    pub timestamp: DateTime<Local>,
}

impl LogRecord {
    pub fn new(text: &str, kind: LogKind) -> Self {
        Self {
            text: encoding::sanitize_text(text).into_owned(),
            kind,
            timestamp: Local::now(),
        }
    }

    /// Build a record from raw bytes of unknown encoding.
    pub fn from_bytes(bytes: &[u8], kind: LogKind) -> Self {
        let decoded = encoding::sanitize_bytes(bytes);
        Self {
            text: encoding::sanitize_text(&decoded).into_owned(),
            kind,
            timestamp: Local::now(),
        }
    }

    /// The line as handed to a sink: optional timestamp, kind prefix, text.
    pub fn render_line(&self, timestamps: bool) -> String {
        let prefix = self.kind.prefix();
        if timestamps {
            format!(
                "{}{prefix}{}",
                self.timestamp.format(TIMESTAMP_FORMAT),
                self.text
            )
        } else {
            format!("{prefix}{}", self.text)
        }
    }
}

// =============================================================================
// Line limit and trim policy
// =============================================================================

/// Maximum number of lines a sink retains. Zero or negative input disables
/// trimming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineLimit(Option<usize>);

impl LineLimit {
    pub const UNLIMITED: LineLimit = LineLimit(None);

    pub fn new(raw: i64) -> Self {
        if raw > 0 {
            Self(usize::try_from(raw).ok())
        } else {
            Self::UNLIMITED
        }
    }

    pub fn get(&self) -> Option<usize> {
        self.0
    }

    pub fn is_unlimited(&self) -> bool {
        self.0.is_none()
    }
}

impl From<i64> for LineLimit {
    fn from(raw: i64) -> Self {
        Self::new(raw)
    }
}

/// How many of the oldest lines one trim pass removes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrimPolicy {
    /// A share of the line limit, rounded up.
    Fraction(f64),
    /// A fixed number of lines.
    Fixed(usize),
}

impl Default for TrimPolicy {
    fn default() -> Self {
        TrimPolicy::Fraction(DEFAULT_TRIM_FRACTION)
    }
}

impl TrimPolicy {
    /// Resolve the batch for `limit`. Always within `1..=limit`, so a single
    /// pass can never remove more lines than the limit allows.
    pub fn batch_for(&self, limit: usize) -> usize {
        let limit = limit.max(MIN_TRIM_BATCH);
        let raw = match *self {
            TrimPolicy::Fraction(f) if f.is_finite() && f > 0.0 => {
                (limit as f64 * f).ceil() as usize
            }
            TrimPolicy::Fraction(_) => MIN_TRIM_BATCH,
            TrimPolicy::Fixed(n) => n,
        };
        raw.clamp(MIN_TRIM_BATCH, limit)
    }
}

// =============================================================================
// RelayConfig
// =============================================================================

/// Render-side settings of a relay.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RelayConfig {
    pub line_limit: LineLimit,
    pub trim: TrimPolicy,
    /// Prefix each line with the emit time.
    pub timestamps: bool,
}

impl RelayConfig {
    /// Trim batch for the configured limit, `None` when unlimited.
    pub fn trim_batch(&self) -> Option<usize> {
        self.line_limit.get().map(|limit| self.trim.batch_for(limit))
    }
}

// =============================================================================
// RelayStats
// =============================================================================

/// Counters exposed for the status bar and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RelayStats {
    /// Lines appended to the sink since creation.
    pub rendered: u64,
    /// Lines removed by trim passes since creation.
    pub trimmed: u64,
    /// Off-thread or re-entrant calls that were refused.
    pub misuse: u64,
    /// Records currently waiting in the queue.
    pub pending: usize,
}
