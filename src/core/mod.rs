// YAM Log Relay - core/mod.rs
//
// Core layer: log data model, text repair, sink abstraction, and the
// cross-thread relay.
// Dependencies: util, chrono, tracing macros.
// Must NOT depend on: ui, platform, app, or any I/O.

pub mod encoding;
pub mod model;
pub mod relay;
pub mod sink;
