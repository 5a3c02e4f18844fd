//! System tray icon with a Show / Quit menu.
//!
//! Tray and menu events come in through the tray library's global handlers,
//! which may fire off the UI frame; they are turned into [`Command`]s and sent
//! over the command channel.

use tray_icon::menu::{Menu, MenuEvent, MenuId, MenuItem, PredefinedMenuItem};
use tray_icon::{TrayIcon, TrayIconBuilder, TrayIconEvent};

use crate::command::{Command, CommandSender};
use crate::error::TrayError;
use crate::resources::IconPixels;
use crate::settings::Settings;

#[derive(Debug, Clone)]
pub struct TrayLabels {
    pub tooltip: String,
    pub show: String,
    pub quit: String,
}

impl From<&Settings> for TrayLabels {
    fn from(settings: &Settings) -> Self {
        Self {
            tooltip: settings.title.to_string(),
            show: settings.tray_show_label.to_string(),
            quit: settings.tray_quit_label.to_string(),
        }
    }
}

/// Menu item ids mapped back to commands.
#[derive(Debug, Clone)]
struct MenuIds {
    show: MenuId,
    quit: MenuId,
}

impl MenuIds {
    fn command_for(&self, id: &MenuId) -> Option<Command> {
        if *id == self.show {
            Some(Command::Restore)
        } else if *id == self.quit {
            Some(Command::Quit)
        } else {
            None
        }
    }
}

/// Only a double-click on the icon itself means anything; single clicks open
/// the menu on their own.
fn icon_command(event: &TrayIconEvent) -> Option<Command> {
    match event {
        TrayIconEvent::DoubleClick { .. } => Some(Command::Restore),
        _ => None,
    }
}

fn build_icon(icon: Option<&IconPixels>, labels: &TrayLabels) -> Result<(TrayIcon, MenuIds), TrayError> {
    let menu = Menu::new();
    let show = MenuItem::new(&labels.show, true, None);
    let quit = MenuItem::new(&labels.quit, true, None);
    menu.append_items(&[&show, &PredefinedMenuItem::separator(), &quit])?;

    let mut builder = TrayIconBuilder::new()
        .with_menu(Box::new(menu))
        .with_tooltip(&labels.tooltip);
    if let Some(icon) = icon.and_then(IconPixels::to_tray) {
        builder = builder.with_icon(icon);
    }
    let tray = builder.build()?;

    let ids = MenuIds {
        show: show.id().clone(),
        quit: quit.id().clone(),
    };
    Ok((tray, ids))
}

fn install_handlers(ids: MenuIds, commands: CommandSender) {
    let menu_commands = commands.clone();
    MenuEvent::set_event_handler(Some(move |event: MenuEvent| {
        match ids.command_for(&event.id) {
            Some(command) => menu_commands.send(command),
            None => tracing::debug!(id = ?event.id, "unknown tray menu item"),
        }
    }));

    TrayIconEvent::set_event_handler(Some(move |event: TrayIconEvent| {
        if let Some(command) = icon_command(&event) {
            commands.send(command);
        }
    }));
}

#[cfg(target_os = "linux")]
thread_local! {
    // Lives on the GTK thread, which is the only one allowed to touch it.
    static INDICATOR: std::cell::RefCell<Option<TrayIcon>> = const { std::cell::RefCell::new(None) };
}

#[cfg(target_os = "linux")]
const HIDE_TIMEOUT: std::time::Duration = std::time::Duration::from_millis(500);

pub struct Tray {
    #[cfg(not(target_os = "linux"))]
    icon: TrayIcon,
}

impl Tray {
    /// Creates the tray icon. Fails if the desktop has no tray to put it in.
    #[cfg(not(target_os = "linux"))]
    pub fn spawn(
        icon: Option<&IconPixels>,
        labels: TrayLabels,
        commands: CommandSender,
    ) -> Result<Self, TrayError> {
        let (icon, ids) = build_icon(icon, &labels)?;
        install_handlers(ids, commands);
        tracing::info!("tray icon ready");
        Ok(Self { icon })
    }

    /// Creates the tray icon on its own GTK thread and waits until it is up.
    #[cfg(target_os = "linux")]
    pub fn spawn(
        icon: Option<&IconPixels>,
        labels: TrayLabels,
        commands: CommandSender,
    ) -> Result<Self, TrayError> {
        use std::sync::mpsc;

        let icon = icon.cloned();
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<(), TrayError>>(1);

        std::thread::Builder::new()
            .name("tray".into())
            .spawn(move || {
                if let Err(e) = gtk::init() {
                    let _ = ready_tx.send(Err(TrayError::unavailable(e.to_string())));
                    return;
                }
                match build_icon(icon.as_ref(), &labels) {
                    Ok((indicator, ids)) => {
                        INDICATOR.with(|slot| *slot.borrow_mut() = Some(indicator));
                        install_handlers(ids, commands);
                        let _ = ready_tx.send(Ok(()));
                        gtk::main();
                    }
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                    }
                }
            })
            .map_err(|e| TrayError::unavailable(e.to_string()))?;

        ready_rx
            .recv()
            .map_err(|_| TrayError::unavailable("tray thread exited before reporting"))??;
        tracing::info!("tray icon ready");
        Ok(Self {})
    }

    #[cfg(not(target_os = "linux"))]
    pub fn hide(&self) {
        if let Err(e) = self.icon.set_visible(false) {
            tracing::warn!("failed to hide tray icon: {}", e);
        }
    }

    /// Hides the indicator on the GTK thread and waits briefly for it, so the
    /// icon is gone before the window closes.
    #[cfg(target_os = "linux")]
    pub fn hide(&self) {
        use std::sync::mpsc;

        let (done_tx, done_rx) = mpsc::sync_channel(1);
        gtk::glib::idle_add_once(move || {
            INDICATOR.with(|slot| {
                if let Some(indicator) = slot.borrow().as_ref() {
                    if let Err(e) = indicator.set_visible(false) {
                        tracing::warn!("failed to hide tray icon: {}", e);
                    }
                }
            });
            let _ = done_tx.send(());
        });
        if done_rx.recv_timeout(HIDE_TIMEOUT).is_err() {
            tracing::warn!("tray thread did not confirm hiding the icon");
        }
    }
}
