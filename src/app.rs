use std::time::Duration;

use crossbeam_channel::Receiver;
use eframe::egui;
use eframe::egui::{Align, Color32, FontId, Key, Layout, RichText, Visuals};
use tokio::{task, time};

use crate::command::{Command, CommandSender};
use crate::error::TrayError;
use crate::lifecycle::{Lifecycle, NativeWindow};
use crate::notify::{DesktopNotifier, Notifier};
use crate::settings::Settings;
use crate::stopwatch::ControlStates;
use crate::surface::{Effect, Surface};
use crate::tray::Tray;

const BUTTON_SIZE: egui::Vec2 = egui::vec2(200.0, 60.0);
const BUTTON_GAP: f32 = 20.0;

/// Everything that has to exist before the first frame: the tray and the
/// command channel it feeds.
pub struct Startup {
    pub tray: Tray,
    pub sender: CommandSender,
    pub commands: Receiver<Command>,
    pub window: NativeWindow,
}

/// When the tray gets created relative to the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayTiming {
    /// Before `run_native`, so a missing tray stops startup with no window.
    BeforeWindow,
    /// macOS refuses status items until the event loop runs.
    InEventLoop,
}

impl TrayTiming {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::InEventLoop
        } else {
            Self::BeforeWindow
        }
    }

    /// Runs `create` now if this timing allows it; `None` means the app
    /// creator has to do it.
    pub fn create_early<T>(
        self,
        create: impl FnOnce() -> Result<T, TrayError>,
    ) -> Result<Option<T>, TrayError> {
        match self {
            Self::BeforeWindow => create().map(Some),
            Self::InEventLoop => Ok(None),
        }
    }
}

/// Keys held or pressed during one frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShortcutKeys {
    pub escape: bool,
    pub alt: bool,
    pub s: bool,
    pub p: bool,
    pub t: bool,
}

impl ShortcutKeys {
    fn read(i: &egui::InputState) -> Self {
        Self {
            escape: i.key_pressed(Key::Escape),
            alt: i.modifiers.alt,
            s: i.key_pressed(Key::S),
            p: i.key_pressed(Key::P),
            t: i.key_pressed(Key::T),
        }
    }
}

/// Escape hides to the tray; Alt+S/P/T act like the buttons and obey the same
/// enablement.
pub fn shortcut_commands(visible: bool, controls: ControlStates, keys: ShortcutKeys) -> Vec<Command> {
    let mut out = vec![];
    if visible && keys.escape {
        out.push(Command::Close);
    }
    if keys.alt {
        if controls.start && keys.s {
            out.push(Command::Start);
        }
        if controls.pause && keys.p {
            out.push(Command::Pause);
        }
        if controls.stop && keys.t {
            out.push(Command::Stop);
        }
    }
    out
}

pub struct StopwatchApp {
    surface: Surface,
    settings: Settings,
    lifecycle: Lifecycle,
    commands: Receiver<Command>,
    tray: Tray,
    window: NativeWindow,
    notifier: Box<dyn Notifier>,
}

impl StopwatchApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings, startup: Startup) -> Self {
        let ctx = cc.egui_ctx.clone();
        let lifecycle = Lifecycle::new(ctx.clone());
        // tray events queued before this point get drained on the first frame
        startup.sender.attach(ctx.clone());

        ctx.set_visuals(Visuals::dark());
        spawn_refresh_tick(ctx, settings.refresh_interval);

        let notifier = Box::new(DesktopNotifier::new(
            settings.title,
            settings.notification_timeout,
        ));

        Self {
            surface: Surface::default(),
            settings,
            lifecycle,
            commands: startup.commands,
            tray: startup.tray,
            window: startup.window,
            notifier,
        }
    }

    fn dispatch(&mut self, command: Command) {
        for effect in self.surface.handle(command) {
            match effect {
                Effect::ShowWindow => self.lifecycle.show(),
                Effect::HideWindow => self.lifecycle.hide(),
                Effect::NotifyMinimized => self
                    .notifier
                    .notify(self.settings.title, self.settings.minimized_message),
                Effect::HideTray => self.tray.hide(),
                Effect::Exit => self.lifecycle.quit(),
            }
        }
    }

    fn keyboard_commands(&self, ctx: &egui::Context) -> Vec<Command> {
        let keys = ctx.input(ShortcutKeys::read);
        shortcut_commands(self.surface.is_visible(), self.surface.controls(), keys)
    }

    fn caption(&self) -> String {
        let phase = self.surface.phase().label();
        match self.surface.stopwatch().started_at() {
            Some(since) => format!("{} since {}", phase, since.format("%H:%M:%S")),
            None => phase.to_string(),
        }
    }

    fn show_main(&self, ctx: &egui::Context) -> Vec<Command> {
        let palette = &self.settings.palette;
        let display = self.surface.display();
        let caption = self.caption();
        let controls = self.surface.controls();
        let mut clicked = vec![];

        let main_frame = egui::Frame::none()
            .fill(palette.background)
            .inner_margin(40.0);

        egui::CentralPanel::default()
            .frame(main_frame)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    egui::Frame::none()
                        .fill(palette.panel)
                        .rounding(20.0)
                        .inner_margin(40.0)
                        .outer_margin(20.0)
                        .show(ui, |ui| {
                            ui.set_width(ui.available_width());
                            ui.vertical_centered(|ui| {
                                ui.label(
                                    RichText::new(display)
                                        .font(FontId::monospace(120.0))
                                        .strong()
                                        .color(palette.text),
                                );
                                ui.label(RichText::new(caption).size(18.0).color(Color32::GRAY));
                            });
                        });

                    ui.add_space(20.0);

                    ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                        ui.spacing_mut().item_spacing.x = BUTTON_GAP;
                        let row = 3.0 * BUTTON_SIZE.x + 2.0 * BUTTON_GAP;
                        ui.add_space(((ui.available_width() - row) / 2.0).max(0.0));
                        clicked.extend(self.action_buttons(ui, controls));
                    });
                });
            });

        clicked
    }

    fn action_buttons(&self, ui: &mut egui::Ui, controls: ControlStates) -> Vec<Command> {
        let palette = &self.settings.palette;
        let buttons = [
            (Command::Start, "Start", "Shortcut: Alt+S", palette.start, controls.start),
            (Command::Pause, "Pause", "Shortcut: Alt+P", palette.pause, controls.pause),
            (Command::Stop, "Stop", "Shortcut: Alt+T", palette.stop, controls.stop),
        ];

        let mut clicked = vec![];
        for (command, label, hint, color, enabled) in buttons {
            let button = egui::Button::new(
                RichText::new(label)
                    .size(24.0)
                    .strong()
                    .color(Color32::WHITE),
            )
            .fill(if enabled { color } else { palette.disabled })
            .rounding(10.0)
            .min_size(BUTTON_SIZE);

            if ui.add_enabled(enabled, button).on_hover_text(hint).clicked() {
                clicked.push(command);
            }
        }
        clicked
    }
}

/// Requests a repaint at a fixed rate so the label keeps moving. The displayed
/// value is recomputed from timestamps each frame.
fn spawn_refresh_tick(ctx: egui::Context, every: Duration) {
    task::spawn(async move {
        let mut interval = time::interval(every);
        interval.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            ctx.request_repaint();
        }
    });
}

impl eframe::App for StopwatchApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        self.window.capture(frame);

        let pending: Vec<Command> = self.commands.try_iter().collect();
        for command in pending {
            self.dispatch(command);
        }

        for command in self.keyboard_commands(ctx) {
            self.dispatch(command);
        }

        if ctx.input(|i| i.viewport().close_requested()) && !self.surface.allows_close() {
            self.lifecycle.cancel_close();
            self.dispatch(Command::Close);
        }

        for command in self.show_main(ctx) {
            self.dispatch(command);
        }
    }

    fn clear_color(&self, _visuals: &Visuals) -> [f32; 4] {
        self.settings.palette.background.to_normalized_gamma_f32()
    }
}

/// Stand-in app when the tray could not be created inside the event loop.
pub struct StartupFailed;

impl eframe::App for StartupFailed {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }
}
