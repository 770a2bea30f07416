// YAM Log Relay - app/log_buffer.rs
//
// In-memory backing store of the log window. The relay appends and trims;
// the UI reads `lines()` each frame and consumes the scroll request.

use crate::core::model::LogKind;
use crate::core::sink::Sink;
use std::collections::VecDeque;

/// One rendered line as shown in the log window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferedLine {
    /// Fully rendered text, including timestamp and kind prefix.
    pub text: String,
    pub kind: LogKind,
}

/// Line store for the log window.
#[derive(Debug, Default)]
pub struct LogBuffer {
    lines: VecDeque<BufferedLine>,
    visible: bool,
    scroll_requested: bool,
    appended_total: u64,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> impl ExactSizeIterator<Item = &BufferedLine> + '_ {
        self.lines.iter()
    }

    /// Line at `index`, oldest first.
    pub fn line(&self, index: usize) -> Option<&BufferedLine> {
        self.lines.get(index)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Lines appended since creation, including ones trimmed since.
    pub fn appended_total(&self) -> u64 {
        self.appended_total
    }

    /// Set by the UI when the log window is shown or hidden.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Returns `true` once after a newly appended line asked to be scrolled to.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }

    /// Full text of the buffer, one line per entry (for "copy all").
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(&line.text);
            out.push('\n');
        }
        out
    }
}

impl Sink for LogBuffer {
    fn append(&mut self, text: &str, kind: LogKind) {
        self.lines.push_back(BufferedLine {
            text: text.to_string(),
            kind,
        });
        self.appended_total += 1;
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn trim_oldest(&mut self, n: usize) {
        let n = n.min(self.lines.len());
        self.lines.drain(..n);
    }

    fn clear(&mut self) {
        self.lines.clear();
        self.scroll_requested = false;
    }

    fn scroll_into_view(&mut self) {
        self.scroll_requested = true;
    }

    fn is_visible(&self) -> bool {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_trim_keep_order() {
        let mut buffer = LogBuffer::new();
        for i in 0..5 {
            buffer.append(&format!("line {i}"), LogKind::Plain);
        }
        buffer.trim_oldest(2);
        let texts: Vec<_> = buffer.lines().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["line 2", "line 3", "line 4"]);
        assert_eq!(buffer.line(0).map(|l| l.text.as_str()), Some("line 2"));
        assert_eq!(buffer.len(), 3);
        assert_eq!(buffer.appended_total(), 5);
    }

    #[test]
    fn test_trim_more_than_retained_empties_buffer() {
        let mut buffer = LogBuffer::new();
        buffer.append("only", LogKind::Error);
        buffer.trim_oldest(25);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_scroll_request_is_consumed_once() {
        let mut buffer = LogBuffer::new();
        assert!(!buffer.take_scroll_request());
        buffer.scroll_into_view();
        assert!(buffer.take_scroll_request());
        assert!(!buffer.take_scroll_request());
    }

    #[test]
    fn test_clear_drops_lines_and_pending_scroll() {
        let mut buffer = LogBuffer::new();
        buffer.append("* fetched 3 messages", LogKind::Message);
        buffer.scroll_into_view();
        buffer.clear();
        assert!(buffer.is_empty());
        assert!(!buffer.take_scroll_request());
        assert_eq!(buffer.appended_total(), 1);
    }

    #[test]
    fn test_to_text_joins_lines() {
        let mut buffer = LogBuffer::new();
        buffer.append("* a", LogKind::Message);
        buffer.append("** b", LogKind::Warning);
        assert_eq!(buffer.to_text(), "* a\n** b\n");
    }
}
