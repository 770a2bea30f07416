// YAM Log Relay - app/registry.rs
//
// Process-wide access point for code that cannot be handed a relay
// explicitly (the tracing bridge, deep call sites in protocol code).
//
// The registry is the relay's only "uninitialised" state: until `install`
// runs, `emit` drops the line and reports it on the diagnostic target.
// Code that can thread an `Arc<dyn Emit>` through should prefer that.

use crate::core::model::LogKind;
use crate::core::relay::Emit;
use crate::util::constants::DIAGNOSTIC_TARGET;
use crate::util::error::RegistryError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

static INSTALLED: RwLock<Option<Arc<dyn Emit>>> = RwLock::new(None);
static DROPPED: AtomicU64 = AtomicU64::new(0);

/// Make `relay` the process-wide emitter.
///
/// No tracing event may be emitted while `INSTALLED` is locked: the relay
/// bridge reads the slot from inside the subscriber.
pub fn install(relay: Arc<dyn Emit>) -> Result<(), RegistryError> {
    {
        let mut slot = INSTALLED.write().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return Err(RegistryError::AlreadyInstalled);
        }
        *slot = Some(relay);
    }
    tracing::debug!("Log relay installed");
    Ok(())
}

/// Remove the process-wide emitter, returning it. Used at teardown.
pub fn uninstall() -> Option<Arc<dyn Emit>> {
    INSTALLED
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take()
}

pub fn is_installed() -> bool {
    INSTALLED
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .is_some()
}

/// The installed emitter, if any.
pub fn current() -> Option<Arc<dyn Emit>> {
    INSTALLED
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Emit through the installed relay, or drop the line with a diagnostic if
/// none is installed yet.
pub fn emit(text: &str, kind: LogKind) {
    // Clone out so the registry lock is not held across the relay call.
    match current() {
        Some(relay) => relay.emit(text, kind),
        None => {
            DROPPED.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(
                target: DIAGNOSTIC_TARGET,
                kind = %kind,
                "Log line emitted before the relay was installed; dropped"
            );
        }
    }
}

/// Number of lines dropped because no relay was installed.
pub fn dropped_before_install() -> u64 {
    DROPPED.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::bridge::RelayLayer;
    use crate::app::log_buffer::LogBuffer;
    use crate::core::model::RelayConfig;
    use crate::core::relay::LogRelay;
    use crate::core::sink::Sink;
    use std::sync::mpsc;
    use std::time::Duration;
    use tracing_subscriber::filter::LevelFilter;
    use tracing_subscriber::prelude::*;

    // The registry is process-global, so its whole lifecycle is exercised in
    // one test to avoid interference between parallel test threads.
    #[test]
    fn test_registry_lifecycle() {
        let _ = uninstall();

        let before = dropped_before_install();
        emit("too early", LogKind::Warning);
        assert!(dropped_before_install() > before);

        // Install with the global bridge capturing debug events, as the app
        // does with `capture_level = "debug"`. The install announcement is
        // routed back through the registry, so it must not hold the slot.
        let relay = Arc::new(LogRelay::new(LogBuffer::new(), RelayConfig::default()));
        let (done_tx, done_rx) = mpsc::channel();
        let to_install: Arc<dyn Emit> = relay.clone();
        std::thread::spawn(move || {
            let subscriber = tracing_subscriber::registry()
                .with(RelayLayer::global().with_filter(LevelFilter::DEBUG));
            let result = tracing::subscriber::with_default(subscriber, || install(to_install));
            let _ = done_tx.send(result);
        });
        let result = done_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("install must return while the bridge captures debug events");
        assert_eq!(result, Ok(()));
        assert!(is_installed());

        let second = Arc::new(LogRelay::new(LogBuffer::new(), RelayConfig::default()));
        assert_eq!(install(second), Err(RegistryError::AlreadyInstalled));

        emit("on time", LogKind::Message);
        let lines: Vec<String> = relay
            .with_sink(|b| b.lines().map(|l| l.text.clone()).collect())
            .unwrap();
        assert_eq!(lines, vec!["Log relay installed", "* on time"]);
        assert_eq!(relay.with_sink(|b| b.line_count()), Some(2));

        assert!(uninstall().is_some());
        assert!(!is_installed());
    }
}
