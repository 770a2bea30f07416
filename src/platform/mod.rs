// YAM Log Relay - platform/mod.rs
//
// Platform abstraction layer: directories, config.toml, file-backed sinks.
// Dependencies: util, core (sink trait and model), directories, toml.
// Must NOT depend on: app, ui.

pub mod config;
pub mod fs;
