// YAM Log Relay - app/mod.rs
//
// Application layer: concrete log window sink, sink combinators, the
// process-wide registry, the tracing bridge, and producer threads.
// Dependencies: core layer, tracing-subscriber.
// Must NOT depend on: ui, platform specifics.

pub mod bridge;
pub mod log_buffer;
pub mod registry;
pub mod tee;
pub mod traffic;
