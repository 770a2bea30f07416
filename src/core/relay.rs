// YAM Log Relay - core/relay.rs
//
// Cross-thread log delivery. Any thread may emit; only the owner thread
// (the one that created the relay, normally the UI thread) ever touches the
// sink.
//
// Architecture:
//   - `pending` is the only state shared between producers and the owner.
//     Producers push under a short lock and return immediately.
//   - The owner drains `pending` lazily: on its own `emit` (drain first, so
//     its line never overtakes older cross-thread lines) and on `flush`.
//     There is no background drain thread; an optional wake-up hook lets the
//     host schedule the next owner-thread call (e.g. an egui repaint).
//   - A drain swaps the whole queue out under the lock and renders with the
//     lock released, so a sink call can never deadlock against a producer.
//   - Render state sits behind its own mutex, which only the owner thread
//     ever locks. A sink that logs while being rendered into hits the held
//     lock; that record is queued and picked up by the same drain loop.
//
// Misuse (flush or sink access off the owner thread, re-entrant flush) is
// reported under DIAGNOSTIC_TARGET and counted, never returned.

use crate::core::model::{LogKind, LogRecord, RelayConfig, RelayStats};
use crate::core::sink::Sink;
use crate::util::constants::DIAGNOSTIC_TARGET;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError, TryLockError};
use std::thread::{self, ThreadId};

// =============================================================================
// Emit
// =============================================================================

/// Producer-side view of a relay with the sink type erased.
///
/// Producers hold an `Arc<dyn Emit>`; they never need to know what the log
/// window renders into.
pub trait Emit: Send + Sync {
    /// Submit one line. Never blocks on rendering and never fails.
    fn emit(&self, text: &str, kind: LogKind);

    /// Submit one line of unknown encoding; invalid sequences are repaired.
    fn emit_bytes(&self, bytes: &[u8], kind: LogKind);

    fn plain(&self, text: &str) {
        self.emit(text, LogKind::Plain);
    }

    fn message(&self, text: &str) {
        self.emit(text, LogKind::Message);
    }

    fn warning(&self, text: &str) {
        self.emit(text, LogKind::Warning);
    }

    fn error(&self, text: &str) {
        self.emit(text, LogKind::Error);
    }
}

// =============================================================================
// LogRelay
// =============================================================================

type Wakeup = Box<dyn Fn() + Send + Sync>;

/// Owner-thread state. Only ever locked from `LogRelay::owner`.
struct RenderState<S> {
    sink: S,
    config: RelayConfig,
    /// Resolved from `config`; `None` when the line limit is unlimited.
    trim_batch: Option<usize>,
}

/// Thread-safe log queue that renders into `S` on a single owner thread.
pub struct LogRelay<S> {
    owner: ThreadId,
    pending: Mutex<VecDeque<LogRecord>>,
    render: Mutex<RenderState<S>>,
    wakeup: Option<Wakeup>,
    rendered: AtomicU64,
    trimmed: AtomicU64,
    misuse: AtomicU64,
}

impl<S: Sink + Send> LogRelay<S> {
    /// Create a relay owned by the calling thread.
    pub fn new(sink: S, config: RelayConfig) -> Self {
        let owner = thread::current().id();
        tracing::debug!(
            owner = ?owner,
            line_limit = ?config.line_limit.get(),
            trim_batch = ?config.trim_batch(),
            timestamps = config.timestamps,
            "Log relay created"
        );
        Self {
            owner,
            pending: Mutex::new(VecDeque::new()),
            render: Mutex::new(RenderState {
                sink,
                config,
                trim_batch: config.trim_batch(),
            }),
            wakeup: None,
            rendered: AtomicU64::new(0),
            trimmed: AtomicU64::new(0),
            misuse: AtomicU64::new(0),
        }
    }

    /// Install a callback run after every cross-thread push. It runs on the
    /// producer's thread and must not block.
    pub fn with_wakeup(mut self, wakeup: impl Fn() + Send + Sync + 'static) -> Self {
        self.wakeup = Some(Box::new(wakeup));
        self
    }

    pub fn owner(&self) -> ThreadId {
        self.owner
    }

    pub fn is_owner_thread(&self) -> bool {
        thread::current().id() == self.owner
    }

    /// Submit a line from any thread.
    ///
    /// On the owner thread everything already queued is rendered first, then
    /// this line. On any other thread the line is queued for the next owner
    /// `emit` or `flush`.
    pub fn emit(&self, text: &str, kind: LogKind) {
        self.submit(LogRecord::new(text, kind));
    }

    /// Like `emit`, for bytes that may not be valid UTF-8.
    pub fn emit_bytes(&self, bytes: &[u8], kind: LogKind) {
        self.submit(LogRecord::from_bytes(bytes, kind));
    }

    /// Render every queued record, oldest first. Owner thread only.
    ///
    /// Returns the number of records rendered.
    pub fn flush(&self) -> usize {
        match self.lock_render("flush") {
            Some(mut state) => self.drain(&mut state),
            None => 0,
        }
    }

    /// Run `f` against the sink. Owner thread only; `None` otherwise.
    ///
    /// Lines emitted on the owner thread while `f` runs are queued and shown
    /// on the next `flush`.
    pub fn with_sink<R>(&self, f: impl FnOnce(&mut S) -> R) -> Option<R> {
        self.lock_render("with_sink")
            .map(|mut state| f(&mut state.sink))
    }

    /// Apply new render settings. Lines beyond a lowered limit are trimmed
    /// immediately. Owner thread only.
    pub fn reconfigure(&self, config: RelayConfig) {
        let Some(mut state) = self.lock_render("reconfigure") else {
            return;
        };
        state.config = config;
        state.trim_batch = config.trim_batch();

        if let Some(limit) = config.line_limit.get() {
            let retained = state.sink.line_count();
            if retained > limit {
                let excess = retained - limit;
                state.sink.trim_oldest(excess);
                self.trimmed.fetch_add(excess as u64, Ordering::Relaxed);
            }
        }

        tracing::debug!(
            line_limit = ?config.line_limit.get(),
            trim_batch = ?state.trim_batch,
            timestamps = config.timestamps,
            "Log relay reconfigured"
        );
    }

    /// Current render settings. Owner thread only.
    pub fn config(&self) -> Option<RelayConfig> {
        self.lock_render("config").map(|state| state.config)
    }

    /// Remove every rendered line from the sink. Queued records are kept.
    /// Owner thread only.
    pub fn clear(&self) {
        if let Some(mut state) = self.lock_render("clear") {
            state.sink.clear();
        }
    }

    /// Number of records waiting to be rendered. Callable from any thread.
    pub fn pending_len(&self) -> usize {
        self.lock_pending().len()
    }

    /// Counters snapshot. Callable from any thread.
    pub fn stats(&self) -> RelayStats {
        RelayStats {
            rendered: self.rendered.load(Ordering::Relaxed),
            trimmed: self.trimmed.load(Ordering::Relaxed),
            misuse: self.misuse.load(Ordering::Relaxed),
            pending: self.pending_len(),
        }
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn submit(&self, record: LogRecord) {
        if self.is_owner_thread() {
            if let Some(mut state) = self.try_lock_render() {
                self.drain(&mut state);
                self.render_record(&mut state, &record);
                // A sink that logged while rendering queued its lines.
                self.drain(&mut state);
                return;
            }
            // Re-entrant emit from inside a sink call: fall through and queue.
        }
        self.lock_pending().push_back(record);
        if let Some(wakeup) = &self.wakeup {
            wakeup();
        }
    }

    /// Render until the queue is observed empty.
    fn drain(&self, state: &mut RenderState<S>) -> usize {
        let mut count = 0;
        loop {
            // Swap the queue out; the guard is released before rendering.
            let batch = std::mem::take(&mut *self.lock_pending());
            if batch.is_empty() {
                return count;
            }
            for record in &batch {
                self.render_record(state, record);
                count += 1;
            }
        }
    }

    fn render_record(&self, state: &mut RenderState<S>, record: &LogRecord) {
        if let (Some(limit), Some(batch)) = (state.config.line_limit.get(), state.trim_batch) {
            let retained = state.sink.line_count();
            if retained >= limit {
                let n = batch.min(retained);
                state.sink.trim_oldest(n);
                self.trimmed.fetch_add(n as u64, Ordering::Relaxed);
            }
        }

        let line = record.render_line(state.config.timestamps);
        state.sink.append(&line, record.kind);
        self.rendered.fetch_add(1, Ordering::Relaxed);

        if state.sink.is_visible() {
            state.sink.scroll_into_view();
        }
    }

    fn lock_pending(&self) -> MutexGuard<'_, VecDeque<LogRecord>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Render state if this is the owner thread and nobody up the stack holds it.
    fn try_lock_render(&self) -> Option<MutexGuard<'_, RenderState<S>>> {
        match self.render.try_lock() {
            Ok(guard) => Some(guard),
            Err(TryLockError::Poisoned(poisoned)) => Some(poisoned.into_inner()),
            Err(TryLockError::WouldBlock) => None,
        }
    }

    fn lock_render(&self, operation: &'static str) -> Option<MutexGuard<'_, RenderState<S>>> {
        if !self.is_owner_thread() {
            self.report_misuse(operation, "called off the owner thread");
            return None;
        }
        let guard = self.try_lock_render();
        if guard.is_none() {
            self.report_misuse(operation, "re-entered from inside a sink call");
        }
        guard
    }

    fn report_misuse(&self, operation: &'static str, reason: &'static str) {
        self.misuse.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(
            target: DIAGNOSTIC_TARGET,
            operation,
            reason,
            thread = ?thread::current().id(),
            owner = ?self.owner,
            "Log relay misuse ignored"
        );
    }
}

impl<S: Sink + Send> Emit for LogRelay<S> {
    fn emit(&self, text: &str, kind: LogKind) {
        LogRelay::emit(self, text, kind);
    }

    fn emit_bytes(&self, bytes: &[u8], kind: LogKind) {
        LogRelay::emit_bytes(self, bytes, kind);
    }
}

impl<S> std::fmt::Debug for LogRelay<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogRelay")
            .field("owner", &self.owner)
            .field("rendered", &self.rendered.load(Ordering::Relaxed))
            .field("trimmed", &self.trimmed.load(Ordering::Relaxed))
            .field("misuse", &self.misuse.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Unit tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{LineLimit, TrimPolicy};
    use std::sync::atomic::AtomicUsize;
    use std::sync::{Arc, OnceLock, Weak};

    #[derive(Default)]
    struct RecordingSink {
        lines: Vec<(String, LogKind)>,
        visible: bool,
        scrolls: usize,
    }

    impl Sink for RecordingSink {
        fn append(&mut self, text: &str, kind: LogKind) {
            self.lines.push((text.to_string(), kind));
        }

        fn line_count(&self) -> usize {
            self.lines.len()
        }

        fn trim_oldest(&mut self, n: usize) {
            let n = n.min(self.lines.len());
            self.lines.drain(..n);
        }

        fn scroll_into_view(&mut self) {
            self.scrolls += 1;
        }

        fn is_visible(&self) -> bool {
            self.visible
        }
    }

    fn texts(relay: &LogRelay<RecordingSink>) -> Vec<String> {
        relay
            .with_sink(|sink| sink.lines.iter().map(|(t, _)| t.clone()).collect())
            .unwrap()
    }

    fn limited(limit: i64, trim: TrimPolicy) -> RelayConfig {
        RelayConfig {
            line_limit: LineLimit::new(limit),
            trim,
            timestamps: false,
        }
    }

    #[test]
    fn test_owner_emit_renders_immediately_with_prefix() {
        let relay = LogRelay::new(RecordingSink::default(), RelayConfig::default());
        relay.emit("Connecting to imap.example.org", LogKind::Message);
        relay.emit("Login failed", LogKind::Error);
        assert_eq!(
            texts(&relay),
            vec!["* Connecting to imap.example.org", "*** Login failed"]
        );
        let kinds = relay
            .with_sink(|s| s.lines.iter().map(|(_, k)| *k).collect::<Vec<_>>())
            .unwrap();
        assert_eq!(kinds, vec![LogKind::Message, LogKind::Error]);
    }

    #[test]
    fn test_cross_thread_emit_is_queued_until_flush() {
        let relay = Arc::new(LogRelay::new(RecordingSink::default(), RelayConfig::default()));
        let producer = Arc::clone(&relay);
        thread::spawn(move || producer.emit("from worker", LogKind::Plain))
            .join()
            .unwrap();

        assert!(texts(&relay).is_empty());
        assert_eq!(relay.pending_len(), 1);

        assert_eq!(relay.flush(), 1);
        assert_eq!(texts(&relay), vec!["from worker"]);
        assert_eq!(relay.pending_len(), 0);
    }

    #[test]
    fn test_owner_emit_drains_queue_first() {
        let relay = Arc::new(LogRelay::new(RecordingSink::default(), RelayConfig::default()));
        let producer = Arc::clone(&relay);
        thread::spawn(move || {
            producer.emit("a", LogKind::Plain);
            producer.emit("b", LogKind::Plain);
            producer.emit("c", LogKind::Plain);
        })
        .join()
        .unwrap();

        relay.emit("X", LogKind::Plain);
        assert_eq!(texts(&relay), vec!["a", "b", "c", "X"]);
    }

    #[test]
    fn test_flush_off_owner_thread_is_refused() {
        let relay = Arc::new(LogRelay::new(RecordingSink::default(), RelayConfig::default()));
        let other = Arc::clone(&relay);
        let rendered = thread::spawn(move || {
            other.emit("queued", LogKind::Plain);
            other.flush()
        })
        .join()
        .unwrap();

        assert_eq!(rendered, 0);
        assert_eq!(relay.stats().misuse, 1);
        assert_eq!(relay.pending_len(), 1);
    }

    #[test]
    fn test_sink_access_off_owner_thread_is_refused() {
        let relay = Arc::new(LogRelay::new(RecordingSink::default(), RelayConfig::default()));
        let other = Arc::clone(&relay);
        let seen = thread::spawn(move || {
            let lines = other.with_sink(|s| s.lines.len());
            other.clear();
            other.reconfigure(RelayConfig::default());
            lines
        })
        .join()
        .unwrap();
        assert_eq!(seen, None);
        assert_eq!(relay.stats().misuse, 3);
    }

    #[test]
    fn test_flush_on_empty_queue_is_noop() {
        let relay = LogRelay::new(RecordingSink::default(), RelayConfig::default());
        assert_eq!(relay.flush(), 0);
        assert_eq!(relay.stats(), RelayStats::default());
    }

    #[test]
    fn test_trim_at_limit_with_full_batch_leaves_one_line() {
        let relay = LogRelay::new(RecordingSink::default(), limited(25, TrimPolicy::Fixed(25)));
        for i in 0..25 {
            relay.emit(&format!("line {i}"), LogKind::Plain);
        }
        assert_eq!(relay.with_sink(|s| s.line_count()), Some(25));

        relay.emit("line 25", LogKind::Plain);
        assert_eq!(texts(&relay), vec!["line 25"]);
        assert_eq!(relay.stats().trimmed, 25);
    }

    #[test]
    fn test_fractional_trim_keeps_newest_lines() {
        // limit 10, fraction 0.25 -> batch 3
        let relay = LogRelay::new(
            RecordingSink::default(),
            limited(10, TrimPolicy::Fraction(0.25)),
        );
        for i in 0..11 {
            relay.emit(&i.to_string(), LogKind::Plain);
        }
        assert_eq!(texts(&relay), vec!["3", "4", "5", "6", "7", "8", "9", "10"]);
    }

    #[test]
    fn test_unlimited_never_trims() {
        let relay = LogRelay::new(RecordingSink::default(), limited(-1, TrimPolicy::Fixed(25)));
        for i in 0..200 {
            relay.emit(&i.to_string(), LogKind::Plain);
        }
        assert_eq!(relay.with_sink(|s| s.line_count()), Some(200));
        assert_eq!(relay.stats().trimmed, 0);
    }

    #[test]
    fn test_reconfigure_trims_excess_immediately() {
        let relay = LogRelay::new(RecordingSink::default(), RelayConfig::default());
        for i in 0..30 {
            relay.emit(&i.to_string(), LogKind::Plain);
        }
        relay.reconfigure(limited(20, TrimPolicy::Fixed(5)));
        assert_eq!(relay.with_sink(|s| s.line_count()), Some(20));
        assert_eq!(texts(&relay).first().map(String::as_str), Some("10"));
        assert_eq!(relay.config().map(|c| c.trim_batch()), Some(Some(5)));
    }

    #[test]
    fn test_clear_empties_sink_but_keeps_queue() {
        let relay = Arc::new(LogRelay::new(RecordingSink::default(), RelayConfig::default()));
        relay.emit("old", LogKind::Plain);
        let producer = Arc::clone(&relay);
        thread::spawn(move || producer.emit("new", LogKind::Plain))
            .join()
            .unwrap();

        relay.clear();
        assert!(texts(&relay).is_empty());
        relay.flush();
        assert_eq!(texts(&relay), vec!["new"]);
    }

    #[test]
    fn test_scroll_hook_only_when_visible() {
        let relay = LogRelay::new(RecordingSink::default(), RelayConfig::default());
        relay.emit("hidden", LogKind::Plain);
        assert_eq!(relay.with_sink(|s| s.scrolls), Some(0));

        relay.with_sink(|s| s.visible = true);
        relay.emit("shown", LogKind::Plain);
        assert_eq!(relay.with_sink(|s| s.scrolls), Some(1));
    }

    #[test]
    fn test_invalid_bytes_are_repaired_and_keep_kind() {
        let relay = LogRelay::new(RecordingSink::default(), RelayConfig::default());
        relay.emit_bytes(b"Subject: caf\xe9\xff", LogKind::Warning);
        let (text, kind) = relay.with_sink(|s| s.lines[0].clone()).unwrap();
        assert_eq!(kind, LogKind::Warning);
        assert!(text.starts_with("** Subject: caf"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_wakeup_runs_on_cross_thread_push_only() {
        let wakes = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&wakes);
        let relay = Arc::new(
            LogRelay::new(RecordingSink::default(), RelayConfig::default()).with_wakeup(
                move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                },
            ),
        );
        relay.emit("owner", LogKind::Plain);
        assert_eq!(wakes.load(Ordering::SeqCst), 0);

        let producer = Arc::clone(&relay);
        thread::spawn(move || {
            producer.emit("one", LogKind::Plain);
            producer.emit("two", LogKind::Plain);
        })
        .join()
        .unwrap();
        assert_eq!(wakes.load(Ordering::SeqCst), 2);
    }

    /// Sink that logs back into its own relay when it sees "ping".
    struct EchoSink {
        lines: Vec<String>,
        back: Arc<OnceLock<Weak<dyn Emit>>>,
    }

    impl Sink for EchoSink {
        fn append(&mut self, text: &str, _kind: LogKind) {
            self.lines.push(text.to_string());
            if text == "ping" {
                if let Some(relay) = self.back.get().and_then(Weak::upgrade) {
                    relay.emit("pong", LogKind::Plain);
                }
            }
        }

        fn line_count(&self) -> usize {
            self.lines.len()
        }

        fn trim_oldest(&mut self, n: usize) {
            let n = n.min(self.lines.len());
            self.lines.drain(..n);
        }
    }

    #[test]
    fn test_reentrant_emit_from_sink_does_not_deadlock() {
        let back = Arc::new(OnceLock::new());
        let relay = Arc::new(LogRelay::new(
            EchoSink {
                lines: Vec::new(),
                back: Arc::clone(&back),
            },
            RelayConfig::default(),
        ));
        let as_dyn: Arc<dyn Emit> = relay.clone();
        let _ = back.set(Arc::downgrade(&as_dyn));

        relay.emit("ping", LogKind::Plain);
        relay.emit("after", LogKind::Plain);

        let lines = relay.with_sink(|s| s.lines.clone()).unwrap();
        assert_eq!(lines, vec!["ping", "pong", "after"]);
        assert_eq!(relay.stats().misuse, 0);
    }

    #[test]
    fn test_emit_trait_shorthands_map_kinds() {
        let relay = Arc::new(LogRelay::new(RecordingSink::default(), RelayConfig::default()));
        let emitter: Arc<dyn Emit> = relay.clone();
        emitter.plain("p");
        emitter.message("m");
        emitter.warning("w");
        emitter.error("e");
        assert_eq!(texts(&relay), vec!["p", "* m", "** w", "*** e"]);
    }
}
