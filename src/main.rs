#![forbid(unsafe_code)]
#![cfg_attr(not(debug_assertions), deny(warnings))] // Forbid warnings in release builds
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]
#![warn(clippy::all, rust_2018_idioms)]

use std::cell::RefCell;
use std::process::ExitCode;
use std::rc::Rc;
use std::sync::Arc;

use desktop_stopwatch::command;
use desktop_stopwatch::error::{AppError, TrayError};
use desktop_stopwatch::lifecycle::NativeWindow;
use desktop_stopwatch::resources;
use desktop_stopwatch::settings::Settings;
use desktop_stopwatch::tray::{Tray, TrayLabels};
use desktop_stopwatch::{Startup, StartupFailed, StopwatchApp, TrayTiming};
use eframe::egui;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("desktop_stopwatch=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

fn run() -> Result<(), AppError> {
    let settings = Settings::default();
    let icon = resources::app_icon(settings.icon_file);

    let window = NativeWindow::default();
    let (sender, commands) = command::channel(Arc::new(window.clone()));
    let labels = TrayLabels::from(&settings);

    // A missing tray has to stop startup before any window exists.
    let early_tray = TrayTiming::current()
        .create_early(|| Tray::spawn(icon.as_ref(), labels.clone(), sender.clone()))?;

    let mut viewport = egui::ViewportBuilder::default()
        .with_title(settings.title)
        .with_maximized(true);
    if let Some(icon) = &icon {
        viewport = viewport.with_icon(icon.to_egui());
    }
    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    let tray_failure: Rc<RefCell<Option<TrayError>>> = Rc::new(RefCell::new(None));
    let failure_slot = Rc::clone(&tray_failure);
    let title = settings.title;

    eframe::run_native(
        title,
        native_options,
        Box::new(move |cc| -> Box<dyn eframe::App> {
            let tray = match early_tray {
                Some(tray) => Ok(tray),
                None => Tray::spawn(icon.as_ref(), labels, sender.clone()),
            };
            match tray {
                Ok(tray) => {
                    let startup = Startup {
                        tray,
                        sender,
                        commands,
                        window,
                    };
                    Box::new(StopwatchApp::new(cc, settings, startup))
                }
                Err(e) => {
                    *failure_slot.borrow_mut() = Some(e);
                    Box::new(StartupFailed)
                }
            }
        }),
    )?;

    match tray_failure.take() {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}
