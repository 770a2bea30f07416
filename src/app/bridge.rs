// YAM Log Relay - app/bridge.rs
//
// tracing -> relay bridge. Worker code logs with the ordinary `tracing`
// macros; this layer turns each event into a log window line.
//
// Level mapping: ERROR -> Error, WARN -> Warning, INFO -> Message,
// DEBUG/TRACE -> Plain. Which levels reach the window is decided by the
// per-layer filter in util::logging, not here.
//
// Events on DIAGNOSTIC_TARGET are never forwarded: they describe relay
// misuse and must not feed back into the relay.

use crate::app::registry;
use crate::core::model::LogKind;
use crate::core::relay::Emit;
use crate::util::constants::DIAGNOSTIC_TARGET;
use std::fmt::{self, Write as _};
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Layer forwarding tracing events into a log relay.
pub struct RelayLayer {
    /// Explicit target; `None` routes through the process-wide registry.
    emitter: Option<Arc<dyn Emit>>,
}

impl RelayLayer {
    pub fn new(emitter: Arc<dyn Emit>) -> Self {
        Self {
            emitter: Some(emitter),
        }
    }

    /// Forward to whatever relay is installed in the registry. Events before
    /// installation are skipped silently; the stderr layer still has them.
    pub fn global() -> Self {
        Self { emitter: None }
    }
}

impl<S: Subscriber> Layer<S> for RelayLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if meta.target() == DIAGNOSTIC_TARGET {
            return;
        }

        let mut line = LineVisitor::default();
        event.record(&mut line);
        let text = line.finish();
        let kind = LogKind::from(*meta.level());

        match &self.emitter {
            Some(emitter) => emitter.emit(&text, kind),
            None => {
                if let Some(relay) = registry::current() {
                    relay.emit(&text, kind);
                }
            }
        }
    }
}

/// Collects `message` followed by ` key=value` for every other field.
#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl LineVisitor {
    fn finish(mut self) -> String {
        if self.message.is_empty() {
            return self.fields.trim_start().to_string();
        }
        self.message.push_str(&self.fields);
        self.message
    }
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={value}", field.name());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            let _ = write!(self.fields, " {}={value:?}", field.name());
        }
    }
}
