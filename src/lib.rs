// YAM Log Relay - lib.rs
//
// Library entry point, exposing all non-GUI modules for integration testing
// and for embedding the relay in other front-ends.
//
// The GUI host (`gui` module) lives beside `main.rs` and is not part of the
// library surface.

pub mod app;
pub mod core;
pub mod platform;
pub mod ui;
pub mod util;
