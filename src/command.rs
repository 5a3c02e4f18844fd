use std::sync::{Arc, OnceLock};

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::lifecycle::WindowRaiser;

/// A user action forwarded from the window, keyboard or tray to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Stop,
    /// Window close request or Escape: hide to the tray.
    Close,
    /// Tray "Show" or a double-click on the tray icon.
    Restore,
    /// Tray "Quit": the only real way out.
    Quit,
}

/// Sending half handed to event sources that live outside the UI frame,
/// such as the tray handlers. The tray may exist before the window does, so
/// the egui context is attached later; once it is, every send wakes the UI.
#[derive(Clone)]
pub struct CommandSender {
    tx: Sender<Command>,
    waker: Arc<OnceLock<egui::Context>>,
    raiser: Arc<dyn WindowRaiser>,
}

impl CommandSender {
    pub fn send(&self, command: Command) {
        if command == Command::Restore {
            self.raiser.raise();
        }
        if self.tx.send(command).is_err() {
            tracing::debug!(?command, "command dropped, ui is gone");
            return;
        }
        if let Some(ctx) = self.waker.get() {
            ctx.request_repaint();
        }
    }

    pub fn attach(&self, ctx: egui::Context) {
        if self.waker.set(ctx).is_err() {
            tracing::debug!("ui context already attached");
        }
    }
}

pub fn channel(raiser: Arc<dyn WindowRaiser>) -> (CommandSender, Receiver<Command>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    let sender = CommandSender {
        tx,
        waker: Arc::default(),
        raiser,
    };
    (sender, rx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingRaiser(AtomicUsize);

    impl WindowRaiser for CountingRaiser {
        fn raise(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn commands_arrive_in_order() {
        let (tx, rx) = channel(Arc::new(CountingRaiser::default()));
        tx.attach(egui::Context::default());
        tx.send(Command::Restore);
        tx.send(Command::Quit);
        assert_eq!(rx.try_iter().collect::<Vec<_>>(), vec![Command::Restore, Command::Quit]);
    }

    #[test]
    fn sends_before_attach_are_queued() {
        let (tx, rx) = channel(Arc::new(CountingRaiser::default()));
        tx.send(Command::Start);
        tx.attach(egui::Context::default());
        assert_eq!(rx.try_recv().ok(), Some(Command::Start));
    }

    #[test]
    fn restore_raises_the_window_and_still_reaches_the_ui() {
        let raiser = Arc::new(CountingRaiser::default());
        let (tx, rx) = channel(raiser.clone());

        // window hidden, no frame running to drain the queue yet
        tx.send(Command::Close);
        tx.send(Command::Restore);
        assert_eq!(raiser.0.load(Ordering::SeqCst), 1);

        tx.send(Command::Start);
        assert_eq!(raiser.0.load(Ordering::SeqCst), 1);
        assert_eq!(
            rx.try_iter().collect::<Vec<_>>(),
            vec![Command::Close, Command::Restore, Command::Start]
        );
    }

    #[test]
    fn send_after_receiver_dropped_is_quiet() {
        let (tx, rx) = channel(Arc::new(CountingRaiser::default()));
        drop(rx);
        tx.send(Command::Start);
    }
}
