//! Fixed presentation values. Nothing here is read from disk or the environment.

use std::time::Duration;

use eframe::egui::Color32;

pub struct Settings {
    pub title: &'static str,
    pub icon_file: &'static str,
    /// How often the label is re-rendered.
    pub refresh_interval: Duration,
    pub notification_timeout: Duration,
    pub tray_show_label: &'static str,
    pub tray_quit_label: &'static str,
    pub minimized_message: &'static str,
    pub palette: Palette,
}

pub struct Palette {
    pub background: Color32,
    pub panel: Color32,
    pub text: Color32,
    pub start: Color32,
    pub pause: Color32,
    pub stop: Color32,
    pub disabled: Color32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            title: "Stopwatch",
            icon_file: "icon.png",
            refresh_interval: Duration::from_millis(10),
            notification_timeout: Duration::from_millis(2000),
            tray_show_label: "Show",
            tray_quit_label: "Quit",
            minimized_message: "Stopwatch is still running in the system tray",
            palette: Palette::default(),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color32::from_rgb(0x1a, 0x1a, 0x1a),
            panel: Color32::from_rgb(0x2d, 0x2d, 0x2d),
            text: Color32::WHITE,
            start: Color32::from_rgb(0x00, 0xb8, 0x94),
            pause: Color32::from_rgb(0xfd, 0xcb, 0x6e),
            stop: Color32::from_rgb(0xd6, 0x30, 0x31),
            disabled: Color32::from_rgb(0x66, 0x66, 0x66),
        }
    }
}
