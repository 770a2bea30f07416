// YAM Log Relay - util/mod.rs
//
// Utility modules: error types, named constants, logging setup.
// constants and error have no dependencies on other layers; logging wires
// the app-layer relay bridge into the subscriber.

pub mod constants;
pub mod error;
pub mod logging;
