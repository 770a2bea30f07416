// YAM Log Relay - core/sink.rs
//
// Rendering target abstraction. The relay only ever calls a sink from its
// owner thread, so implementations need no internal synchronisation.

use crate::core::model::LogKind;

/// A surface that log lines are rendered into: a log window buffer, a file,
/// stdout.
///
/// All operations are total. A sink that can fail internally (file I/O)
/// logs and swallows the failure itself.
pub trait Sink {
    /// Render one line. `text` already carries the kind prefix; `kind` is
    /// passed so the sink can pick a style.
    fn append(&mut self, text: &str, kind: LogKind);

    /// Number of lines currently retained.
    fn line_count(&self) -> usize;

    /// Remove the oldest `n` lines (fewer if fewer are retained).
    fn trim_oldest(&mut self, n: usize);

    /// Remove every retained line.
    fn clear(&mut self) {
        let retained = self.line_count();
        self.trim_oldest(retained);
    }

    /// Keep the newest line in view. Best effort.
    fn scroll_into_view(&mut self) {}

    /// Whether `scroll_into_view` is worth attempting.
    fn is_visible(&self) -> bool {
        false
    }
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn append(&mut self, text: &str, kind: LogKind) {
        (**self).append(text, kind);
    }

    fn line_count(&self) -> usize {
        (**self).line_count()
    }

    fn trim_oldest(&mut self, n: usize) {
        (**self).trim_oldest(n);
    }

    fn clear(&mut self) {
        (**self).clear();
    }

    fn scroll_into_view(&mut self) {
        (**self).scroll_into_view();
    }

    fn is_visible(&self) -> bool {
        (**self).is_visible()
    }
}
