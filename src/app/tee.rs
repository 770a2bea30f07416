// YAM Log Relay - app/tee.rs
//
// Sink combinator: everything shown in the log window is also written to a
// mirror (normally the on-disk log file). Line counting, trimming and
// visibility are the primary's; the mirror is append-only from the relay's
// point of view.

use crate::core::model::LogKind;
use crate::core::sink::Sink;

pub struct TeeSink<P, M> {
    primary: P,
    mirror: Option<M>,
}

impl<P: Sink, M: Sink> TeeSink<P, M> {
    pub fn new(primary: P, mirror: Option<M>) -> Self {
        Self { primary, mirror }
    }

    pub fn primary(&self) -> &P {
        &self.primary
    }

    pub fn primary_mut(&mut self) -> &mut P {
        &mut self.primary
    }

    pub fn mirror(&self) -> Option<&M> {
        self.mirror.as_ref()
    }

    /// Replace (or remove) the mirror, returning the previous one.
    pub fn set_mirror(&mut self, mirror: Option<M>) -> Option<M> {
        std::mem::replace(&mut self.mirror, mirror)
    }
}

impl<P: Sink, M: Sink> Sink for TeeSink<P, M> {
    fn append(&mut self, text: &str, kind: LogKind) {
        self.primary.append(text, kind);
        if let Some(mirror) = &mut self.mirror {
            mirror.append(text, kind);
        }
    }

    fn line_count(&self) -> usize {
        self.primary.line_count()
    }

    fn trim_oldest(&mut self, n: usize) {
        self.primary.trim_oldest(n);
    }

    fn clear(&mut self) {
        self.primary.clear();
    }

    fn scroll_into_view(&mut self) {
        self.primary.scroll_into_view();
    }

    fn is_visible(&self) -> bool {
        self.primary.is_visible()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::log_buffer::LogBuffer;

    #[test]
    fn test_mirror_receives_every_append_but_is_never_trimmed() {
        let mut tee = TeeSink::new(LogBuffer::new(), Some(LogBuffer::new()));
        tee.append("one", LogKind::Plain);
        tee.append("two", LogKind::Error);
        tee.trim_oldest(1);

        assert_eq!(tee.line_count(), 1);
        assert_eq!(tee.primary().line_count(), 1);
        assert_eq!(tee.mirror().map(|m| m.line_count()), Some(2));

        tee.clear();
        assert_eq!(tee.line_count(), 0);
        assert_eq!(tee.mirror().map(|m| m.line_count()), Some(2));
    }

    #[test]
    fn test_visibility_follows_primary() {
        let mut tee: TeeSink<LogBuffer, LogBuffer> = TeeSink::new(LogBuffer::new(), None);
        assert!(!tee.is_visible());
        tee.primary_mut().set_visible(true);
        assert!(tee.is_visible());
        tee.scroll_into_view();
        assert!(tee.primary_mut().take_scroll_request());
    }

    #[test]
    fn test_set_mirror_returns_previous() {
        let mut tee = TeeSink::new(LogBuffer::new(), Some(LogBuffer::new()));
        tee.append("kept", LogKind::Plain);
        let old = tee.set_mirror(None);
        assert_eq!(old.map(|m| m.line_count()), Some(1));
        tee.append("not mirrored", LogKind::Plain);
        assert!(tee.mirror().is_none());
    }
}
