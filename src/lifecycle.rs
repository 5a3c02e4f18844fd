use std::sync::atomic::{AtomicIsize, Ordering};
use std::sync::Arc;

use eframe::egui::{self, ViewportCommand};

/// Handle to the running application window, passed into the app at
/// construction so nothing reaches for a global.
#[derive(Clone)]
pub struct Lifecycle {
    ctx: egui::Context,
}

impl Lifecycle {
    pub fn new(ctx: egui::Context) -> Self {
        Self { ctx }
    }

    pub fn show(&self) {
        self.ctx.send_viewport_cmd(ViewportCommand::Visible(true));
        self.ctx.send_viewport_cmd(ViewportCommand::Minimized(false));
        self.ctx.send_viewport_cmd(ViewportCommand::Focus);
        self.ctx.request_repaint();
    }

    pub fn hide(&self) {
        self.ctx.send_viewport_cmd(ViewportCommand::Visible(false));
    }

    /// Keeps a close request from ending the process.
    pub fn cancel_close(&self) {
        self.ctx.send_viewport_cmd(ViewportCommand::CancelClose);
    }

    /// Ends the event loop; `run_native` returns afterwards.
    pub fn quit(&self) {
        self.ctx.send_viewport_cmd(ViewportCommand::Close);
        self.ctx.request_repaint();
    }
}

/// Puts the window back on screen without waiting for an egui frame.
///
/// A hidden window gets no redraws on some backends, so viewport commands
/// queued for it would never be applied.
pub trait WindowRaiser: Send + Sync {
    fn raise(&self);
}

/// Native handle of the root window, captured on the first frame.
#[derive(Clone, Default)]
pub struct NativeWindow {
    // 0 until captured
    handle: Arc<AtomicIsize>,
}

impl NativeWindow {
    pub fn capture(&self, frame: &eframe::Frame) {
        if self.handle.load(Ordering::Relaxed) != 0 {
            return;
        }
        if let Some(handle) = native_handle(frame) {
            tracing::debug!(handle, "captured native window");
            self.handle.store(handle, Ordering::Relaxed);
        }
    }

    fn handle(&self) -> Option<isize> {
        match self.handle.load(Ordering::Relaxed) {
            0 => None,
            handle => Some(handle),
        }
    }
}

impl WindowRaiser for NativeWindow {
    fn raise(&self) {
        match self.handle() {
            Some(handle) => show_native(handle),
            None => tracing::debug!("no native window yet, relying on repaint"),
        }
    }
}

#[cfg(windows)]
fn native_handle(frame: &eframe::Frame) -> Option<isize> {
    use raw_window_handle::{HasWindowHandle, RawWindowHandle};

    match frame.window_handle().ok()?.as_raw() {
        RawWindowHandle::Win32(win) => Some(win.hwnd.get()),
        _ => None,
    }
}

/// Other backends keep delivering redraws to hidden windows.
#[cfg(not(windows))]
fn native_handle(_frame: &eframe::Frame) -> Option<isize> {
    None
}

#[cfg(windows)]
#[allow(unsafe_code)]
fn show_native(handle: isize) {
    use windows::Win32::Foundation::HWND;
    use windows::Win32::UI::WindowsAndMessaging::{SetForegroundWindow, ShowWindow, SW_SHOW};

    let hwnd = HWND(handle as *mut core::ffi::c_void);
    // SAFETY: the handle belongs to the root viewport, which outlives the
    // tray; both calls only return FALSE on a stale handle.
    unsafe {
        let _ = ShowWindow(hwnd, SW_SHOW);
        let _ = SetForegroundWindow(hwnd);
    }
}

#[cfg(not(windows))]
fn show_native(_handle: isize) {}
