// YAM Log Relay - ui/panels/mod.rs

pub mod log_window;
pub mod status_bar;
