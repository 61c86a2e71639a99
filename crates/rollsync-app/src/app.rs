use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::{unbounded, Receiver, Sender};
use eframe::egui;
use rollsync_engine::{LoopingSource, Playback, Speed, TransportState};
use rollsync_pianoroll::{Layout, NoteGenerator, Theme, ViewSync};
use tracing::{error, info};

use crate::commands::Command;
use crate::config::AppConfig;
use crate::fps::FrameCounter;
use crate::session::Session;
use crate::waker::EguiWaker;

pub struct RollSyncApp {
    session: Session<LoopingSource>,
    command_tx: Sender<Command>,
    command_rx: Receiver<Command>,
    frames: FrameCounter,
    fullscreen: bool,
    scrolled_to_bottom: bool,
    last_error: Option<String>,
}

impl RollSyncApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: &AppConfig) -> anyhow::Result<Self> {
        let waker = Arc::new(EguiWaker::new(cc.egui_ctx.clone()));
        let playback = Playback::from_config(&config.engine_config(), waker)?;
        playback.set_speed(config.speed());

        let song = match config.seed {
            Some(seed) => NoteGenerator::seeded(seed, config.song_length),
            None => NoteGenerator::from_entropy(config.song_length),
        }
        .song();
        let mut view = ViewSync::new(song, Theme::classic(), Layout::default());
        view.set_continuous_scroll(config.continuous_scroll);
        view.set_ticks_per_step(config.ticks_per_step);

        let (command_tx, command_rx) = unbounded();
        info!("piano roll ready");
        Ok(Self {
            session: Session::new(playback, view),
            command_tx,
            command_rx,
            frames: FrameCounter::new(Instant::now()),
            fullscreen: false,
            scrolled_to_bottom: false,
            last_error: None,
        })
    }

    fn send(&self, command: Command) {
        // Both ends live in `self`, so the channel cannot be disconnected.
        let _ = self.command_tx.send(command);
    }

    fn process_commands(&mut self, ctx: &egui::Context) {
        while let Ok(command) = self.command_rx.try_recv() {
            if command == Command::ToggleFullscreen {
                self.fullscreen = !self.fullscreen;
                ctx.send_viewport_cmd(egui::ViewportCommand::Fullscreen(self.fullscreen));
                continue;
            }
            match self.session.handle_command(command) {
                Ok(()) => self.last_error = None,
                Err(err) => {
                    error!(%err, %command, "command failed");
                    self.last_error = Some(err.to_string());
                }
            }
        }
    }

    fn handle_shortcuts(&self, ctx: &egui::Context) {
        let continuous = self.session.view().continuous_scroll();
        ctx.input(|input| {
            if input.key_pressed(egui::Key::Space) {
                self.send(Command::TogglePlayback);
            }
            if input.key_pressed(egui::Key::Escape) {
                self.send(Command::Stop);
            }
            if input.key_pressed(egui::Key::Backslash) {
                self.send(Command::SetContinuousScroll(!continuous));
            }
            if input.key_pressed(egui::Key::Home) {
                self.send(Command::CenterCursor);
            }
            if input.key_pressed(egui::Key::F11) {
                self.send(Command::ToggleFullscreen);
            }
        });
    }

    fn menu_bar(&self, ui: &mut egui::Ui) {
        let state = self.session.playback().state();
        egui::menu::bar(ui, |ui| {
            ui.menu_button("Play", |ui| {
                let label = if state == TransportState::Playing {
                    "Pause"
                } else {
                    "Play"
                };
                if menu_item(ui, label, Command::TogglePlayback, true) {
                    self.send(Command::TogglePlayback);
                    ui.close_menu();
                }
                if menu_item(ui, "Stop", Command::Stop, state != TransportState::Stopped) {
                    self.send(Command::Stop);
                    ui.close_menu();
                }
            });
            ui.menu_button("View", |ui| {
                let mut continuous = self.session.view().continuous_scroll();
                if ui.checkbox(&mut continuous, "Continuous scroll").changed() {
                    self.send(Command::SetContinuousScroll(continuous));
                    ui.close_menu();
                }
                if menu_item(ui, "Center on cursor", Command::CenterCursor, true) {
                    self.send(Command::CenterCursor);
                    ui.close_menu();
                }
                if menu_item(ui, "Full screen", Command::ToggleFullscreen, true) {
                    self.send(Command::ToggleFullscreen);
                    ui.close_menu();
                }
            });
        });
    }

    fn status_bar(&self, ui: &mut egui::Ui) {
        let playback = self.session.playback();
        ui.horizontal(|ui| {
            ui.label(format!("{}", playback.state()));
            ui.separator();

            let mut speed = playback.speed().get();
            let slider = egui::Slider::new(&mut speed, Speed::MIN.get()..=Speed::MAX.get())
                .text("Speed");
            if ui.add(slider).changed() {
                self.send(Command::SetSpeed(Speed::clamped(speed)));
            }
            ui.separator();

            let tick = self.session.view().current_highlighted_tick();
            if tick >= 0 {
                ui.label(format!("Tick {tick}"));
            } else {
                ui.label("Tick -");
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("{:.1} FPS", self.frames.fps()));
                if let Some(err) = &self.last_error {
                    ui.colored_label(ui.visuals().error_fg_color, err);
                }
            });
        });
    }
}

fn menu_item(ui: &mut egui::Ui, label: &str, command: Command, enabled: bool) -> bool {
    let mut button = egui::Button::new(label);
    if let Some(shortcut) = command.shortcut() {
        button = button.shortcut_text(shortcut);
    }
    ui.add_enabled(enabled, button).clicked()
}

impl eframe::App for RollSyncApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.viewport().close_requested()) {
            self.session.shutdown();
            return;
        }

        self.handle_shortcuts(ctx);
        self.process_commands(ctx);
        self.session.sync();
        if self.frames.frame(Instant::now()) {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("menu").show(ctx, |ui| self.menu_bar(ui));
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.status_bar(ui));
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                rollsync_pianoroll::render(ui, self.session.view_mut());
                if !self.scrolled_to_bottom {
                    self.session.view_mut().scroll_to_y_max();
                    self.scrolled_to_bottom = true;
                }
            });

        // Commands raised this frame are applied on the next one.
        if !self.command_rx.is_empty() {
            ctx.request_repaint();
        }
    }
}
