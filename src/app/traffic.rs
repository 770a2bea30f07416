// YAM Log Relay - app/traffic.rs
//
// Producer threads for exercising the log window: each emits numbered lines
// ("thread2-msg57") through an `Emit` handle, the way mail-check workers do.
//
// Architecture mirrors the scan/tail managers of the main application:
//   - `spawn_burst` starts the workers and returns a `BurstHandle`.
//   - An `Arc<AtomicBool>` cancel flag stops workers between lines.
//   - Workers never touch the sink; the owner thread drains on its own time.

use crate::core::model::LogKind;
use crate::core::relay::Emit;
use crate::util::constants::MAX_BURST_THREADS;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Shape of one burst.
#[derive(Debug, Clone, Copy)]
pub struct BurstConfig {
    pub threads: usize,
    pub per_thread: usize,
    /// Pause after each line; zero emits as fast as possible.
    pub interval: Duration,
}

/// Running burst of producer threads.
pub struct BurstHandle {
    workers: Vec<JoinHandle<()>>,
    cancel: Arc<AtomicBool>,
}

impl BurstHandle {
    /// Ask every worker to stop after its current line.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    pub fn is_finished(&self) -> bool {
        self.workers.iter().all(JoinHandle::is_finished)
    }

    /// Wait for all workers. Returns how many of them panicked.
    pub fn join(self) -> usize {
        self.workers
            .into_iter()
            .map(JoinHandle::join)
            .filter(Result::is_err)
            .count()
    }
}

/// Kind for line `i`: mostly plain protocol chatter, with every tenth line a
/// message, every 25th a warning and every 50th an error.
pub fn kind_for(i: usize) -> LogKind {
    if i % 50 == 49 {
        LogKind::Error
    } else if i % 25 == 24 {
        LogKind::Warning
    } else if i % 10 == 9 {
        LogKind::Message
    } else {
        LogKind::Plain
    }
}

/// Start `config.threads` workers emitting `config.per_thread` lines each.
pub fn spawn_burst(emitter: Arc<dyn Emit>, config: BurstConfig) -> BurstHandle {
    let threads = config.threads.clamp(1, MAX_BURST_THREADS);
    let cancel = Arc::new(AtomicBool::new(false));

    let workers = (0..threads)
        .map(|t| {
            let emitter = Arc::clone(&emitter);
            let cancel = Arc::clone(&cancel);
            std::thread::Builder::new()
                .name(format!("log-producer-{t}"))
                .spawn(move || run_producer(t, config, emitter.as_ref(), &cancel))
        })
        .filter_map(|spawned| match spawned {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to spawn log producer thread");
                None
            }
        })
        .collect::<Vec<_>>();

    tracing::info!(
        threads = workers.len(),
        per_thread = config.per_thread,
        "Log traffic burst started"
    );

    BurstHandle { workers, cancel }
}

fn run_producer(t: usize, config: BurstConfig, emitter: &dyn Emit, cancel: &AtomicBool) {
    for i in 0..config.per_thread {
        if cancel.load(Ordering::SeqCst) {
            tracing::debug!(thread = t, sent = i, "Log producer cancelled");
            return;
        }
        emitter.emit(&format!("thread{t}-msg{i}"), kind_for(i));
        if !config.interval.is_zero() {
            std::thread::sleep(config.interval);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Emitter that just collects lines, to test the producers in isolation.
    #[derive(Default)]
    struct Collector(Mutex<Vec<(String, LogKind)>>);

    impl Emit for Collector {
        fn emit(&self, text: &str, kind: LogKind) {
            self.0.lock().unwrap().push((text.to_string(), kind));
        }

        fn emit_bytes(&self, bytes: &[u8], kind: LogKind) {
            self.emit(&String::from_utf8_lossy(bytes), kind);
        }
    }

    #[test]
    fn test_burst_emits_every_line_once() {
        let collector = Arc::new(Collector::default());
        let burst = spawn_burst(
            collector.clone(),
            BurstConfig {
                threads: 3,
                per_thread: 20,
                interval: Duration::ZERO,
            },
        );
        assert_eq!(burst.join(), 0);

        let lines = collector.0.lock().unwrap();
        assert_eq!(lines.len(), 60);
        for t in 0..3 {
            let own: Vec<_> = lines
                .iter()
                .filter(|(text, _)| text.starts_with(&format!("thread{t}-")))
                .map(|(text, _)| text.clone())
                .collect();
            let expected: Vec<_> = (0..20).map(|i| format!("thread{t}-msg{i}")).collect();
            assert_eq!(own, expected);
        }
    }

    #[test]
    fn test_cancel_stops_workers() {
        let collector = Arc::new(Collector::default());
        let burst = spawn_burst(
            collector.clone(),
            BurstConfig {
                threads: 2,
                per_thread: 10_000,
                interval: Duration::from_millis(1),
            },
        );
        burst.cancel();
        assert_eq!(burst.join(), 0);
        assert!(collector.0.lock().unwrap().len() < 20_000);
    }

    #[test]
    fn test_kind_cycle() {
        assert_eq!(kind_for(0), LogKind::Plain);
        assert_eq!(kind_for(9), LogKind::Message);
        assert_eq!(kind_for(24), LogKind::Warning);
        assert_eq!(kind_for(49), LogKind::Error);
    }
}
