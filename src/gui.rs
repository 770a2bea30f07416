// YAM Log Relay - gui.rs
//
// Top-level eframe::App implementation: the log window.
//
// The UI thread created the relay, so it is the owner: every frame starts
// with `flush()`, which renders whatever producer threads queued since the
// last frame. Producers wake the UI through the relay's wake-up hook
// (`request_repaint`), so the window updates without polling.

use crate::app::log_buffer::LogBuffer;
use crate::app::registry;
use crate::app::tee::TeeSink;
use crate::app::traffic::{self, BurstConfig, BurstHandle};
use crate::core::relay::LogRelay;
use crate::core::sink::Sink;
use crate::platform::config::AppConfig;
use crate::platform::fs::FileSink;
use crate::ui;
use std::sync::Arc;
use std::time::Duration;

/// Sink behind the log window: the on-screen buffer, optionally mirrored to
/// a file.
pub type WindowSink = TeeSink<LogBuffer, FileSink>;

/// The YAM log window application.
pub struct YamLogApp {
    relay: Arc<LogRelay<WindowSink>>,
    config: AppConfig,
    burst_config: BurstConfig,
    burst: Option<BurstHandle>,
    /// Log window shown (false = collapsed; lines still accumulate).
    show_log: bool,
    /// Jump to the newest line when one arrives.
    follow: bool,
}

impl YamLogApp {
    pub fn new(relay: Arc<LogRelay<WindowSink>>, config: AppConfig, burst_config: BurstConfig) -> Self {
        Self {
            relay,
            config,
            burst_config,
            burst: None,
            show_log: true,
            follow: true,
        }
    }

    fn start_burst(&mut self) {
        self.stop_burst();
        self.burst = Some(traffic::spawn_burst(self.relay.clone(), self.burst_config));
    }

    fn stop_burst(&mut self) {
        if let Some(burst) = self.burst.take() {
            burst.cancel();
            let panicked = burst.join();
            if panicked > 0 {
                tracing::error!(panicked, "Log producer threads panicked");
            }
        }
    }

    /// Reap a burst whose workers have all finished.
    fn poll_burst(&mut self) {
        if self.burst.as_ref().is_some_and(BurstHandle::is_finished) {
            self.stop_burst();
            tracing::info!("Log traffic burst finished");
        }
    }

    fn set_line_limit(&mut self, limit: i64) {
        self.config.line_limit = limit;
        self.relay.reconfigure(self.config.relay_config());
    }
}

impl eframe::App for YamLogApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Owner-thread drain of everything producers queued since last frame.
        self.relay.flush();
        self.poll_burst();

        // Menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Copy All").clicked() {
                        if let Some(text) = self.relay.with_sink(|s| s.primary().to_text()) {
                            ctx.copy_text(text);
                        }
                        ui.close_menu();
                    }
                    if ui.button("Clear").clicked() {
                        self.relay.clear();
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Exit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("Traffic", |ui| {
                    let running = self.burst.is_some();
                    let label = format!(
                        "Start Burst ({} threads \u{00d7} {} lines)",
                        self.burst_config.threads, self.burst_config.per_thread
                    );
                    if ui.add_enabled(!running, egui::Button::new(label)).clicked() {
                        self.start_burst();
                        ui.close_menu();
                    }
                    if ui.add_enabled(running, egui::Button::new("Stop Burst")).clicked() {
                        self.stop_burst();
                        ui.close_menu();
                    }
                });
                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.show_log, "Show Log Window");
                    ui.checkbox(&mut self.follow, "Follow Newest Line");
                    ui.separator();
                    ui.label("Line limit");
                    let mut limit = self.config.line_limit;
                    let changed = ui
                        .add(
                            egui::DragValue::new(&mut limit)
                                .range(0..=crate::util::constants::MAX_LINE_LIMIT)
                                .speed(10),
                        )
                        .on_hover_text("0 = unlimited")
                        .changed();
                    if changed {
                        self.set_line_limit(limit);
                    }
                });
            });
        });

        // Status bar
        let stats = self.relay.stats();
        let retained = self.relay.with_sink(|s| s.line_count()).unwrap_or(0);
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(ui::theme::STATUS_BAR_HEIGHT)
            .frame(egui::Frame::side_top_panel(&ctx.style()).fill(ui::theme::STATUS_BG))
            .show(ctx, |ui| {
                ui::panels::status_bar::render(ui, &stats, retained, self.burst.is_some());
            });

        // Log window body
        let dark_mode = self.config.dark_mode;
        let show_log = self.show_log;
        let follow = self.follow;
        egui::CentralPanel::default().show(ctx, |ui| {
            self.relay.with_sink(|sink| {
                let buffer = sink.primary_mut();
                buffer.set_visible(show_log);
                if show_log {
                    ui::panels::log_window::render(ui, buffer, dark_mode, follow);
                } else {
                    ui.centered_and_justified(|ui| {
                        ui.label("Log window hidden (View \u{2192} Show Log Window).");
                    });
                }
            });
        });

        // Producers request repaints through the wake-up hook; while a burst
        // runs, also poll so its completion is noticed.
        if self.burst.is_some() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.stop_burst();
        self.relay.flush();
        let _ = registry::uninstall();
        tracing::info!(stats = ?self.relay.stats(), "Log window closed");
    }
}
