use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrayError {
    #[error("system tray is not available: {reason}")]
    Unavailable { reason: String },

    #[error("failed to build tray menu: {0}")]
    Menu(#[from] tray_icon::menu::Error),

    #[error("failed to create tray icon: {0}")]
    Icon(#[from] tray_icon::Error),
}

impl TrayError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum IconError {
    #[error("icon file not found at {}", .0.display())]
    Missing(PathBuf),

    #[error("failed to decode icon {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Tray(#[from] TrayError),

    #[error("gui backend failed: {0}")]
    Gui(#[from] eframe::Error),
}

impl AppError {
    /// Process status for this failure. Each failure class gets its own code.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Tray(_) => 1,
            AppError::Gui(_) => 2,
        }
    }
}
