//! Window-level behavior of the stopwatch, independent of any toolkit.
//!
//! [`Surface::handle`] takes a [`Command`] and answers with the [`Effect`]s the
//! frontend has to carry out. The egui app applies them; tests inspect them.

use crate::command::Command;
use crate::stopwatch::{Clock, ControlStates, PhaseKind, Stopwatch, SystemClock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    ShowWindow,
    HideWindow,
    /// Tell the user the app went to the tray instead of exiting.
    NotifyMinimized,
    HideTray,
    Exit,
}

pub struct Surface<C: Clock = SystemClock> {
    stopwatch: Stopwatch<C>,
    visible: bool,
    quitting: bool,
}

impl Default for Surface<SystemClock> {
    fn default() -> Self {
        Self::new(Stopwatch::default())
    }
}

impl<C: Clock> Surface<C> {
    pub fn new(stopwatch: Stopwatch<C>) -> Self {
        Self {
            stopwatch,
            visible: true,
            quitting: false,
        }
    }

    pub fn handle(&mut self, command: Command) -> Vec<Effect> {
        match command {
            Command::Start => {
                let changed = self.stopwatch.start();
                tracing::debug!(changed, "start");
                vec![]
            }
            Command::Pause => {
                let changed = self.stopwatch.pause();
                tracing::debug!(changed, elapsed = ?self.stopwatch.elapsed(), "pause");
                vec![]
            }
            Command::Stop => {
                let changed = self.stopwatch.stop();
                tracing::debug!(changed, "stop");
                vec![]
            }
            Command::Close => {
                if !self.visible || self.quitting {
                    return vec![];
                }
                self.visible = false;
                tracing::info!("hiding to tray");
                vec![Effect::HideWindow, Effect::NotifyMinimized]
            }
            Command::Restore => {
                if self.quitting {
                    return vec![];
                }
                self.visible = true;
                tracing::info!("restoring window");
                vec![Effect::ShowWindow]
            }
            Command::Quit => {
                self.quitting = true;
                tracing::info!(phase = ?self.stopwatch.phase(), "quit requested");
                vec![Effect::HideTray, Effect::Exit]
            }
        }
    }

    /// Whether a close request from the window manager should go through.
    /// Only the tray's quit path lets it.
    pub fn allows_close(&self) -> bool {
        self.quitting
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn display(&self) -> String {
        self.stopwatch.display()
    }

    pub fn controls(&self) -> ControlStates {
        self.stopwatch.controls()
    }

    pub fn phase(&self) -> PhaseKind {
        self.stopwatch.phase()
    }

    pub fn stopwatch(&self) -> &Stopwatch<C> {
        &self.stopwatch
    }
}
