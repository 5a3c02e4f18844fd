#![deny(unsafe_code)]
#![warn(clippy::all, rust_2018_idioms)]

mod app;
pub mod command;
pub mod error;
pub mod lifecycle;
pub mod notify;
pub mod resources;
pub mod settings;
pub mod stopwatch;
pub mod surface;
pub mod tray;

pub use app::{Startup, StartupFailed, StopwatchApp, TrayTiming};
