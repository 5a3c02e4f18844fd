//! Locating and decoding the application icon.

use std::env;
use std::path::{Path, PathBuf};

use eframe::egui;

use crate::error::IconError;

/// Decoded RGBA pixels, shared by the window icon and the tray icon.
#[derive(Clone, Debug)]
pub struct IconPixels {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl IconPixels {
    pub fn to_egui(&self) -> egui::IconData {
        egui::IconData {
            rgba: self.rgba.clone(),
            width: self.width,
            height: self.height,
        }
    }

    pub fn to_tray(&self) -> Option<tray_icon::Icon> {
        match tray_icon::Icon::from_rgba(self.rgba.clone(), self.width, self.height) {
            Ok(icon) => Some(icon),
            Err(e) => {
                tracing::warn!("icon rejected by tray: {}", e);
                None
            }
        }
    }
}

/// Resources directory of the app bundle the executable runs from, if any.
///
/// Only a `Foo.app/Contents/MacOS/<exe>` layout counts as a bundle.
pub fn bundle_root(exe: &Path) -> Option<PathBuf> {
    let macos = exe.parent()?;
    let contents = macos.parent()?;
    let bundle = contents.parent()?;
    let is_bundle = macos.file_name()? == "MacOS"
        && contents.file_name()? == "Contents"
        && bundle.extension()? == "app";
    is_bundle.then(|| contents.join("Resources"))
}

/// Picks the bundle copy of `name` when it exists, else the copy under `cwd`.
pub fn resolve_in(bundle: Option<&Path>, cwd: &Path, name: &str) -> PathBuf {
    if let Some(root) = bundle {
        let candidate = root.join(name);
        if candidate.exists() {
            return candidate;
        }
        tracing::debug!(path = %candidate.display(), "not in bundle, falling back to cwd");
    }
    cwd.join(name)
}

pub fn resolve_resource(name: &str) -> PathBuf {
    let bundle = env::current_exe().ok().and_then(|exe| bundle_root(&exe));
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let path = resolve_in(bundle.as_deref(), &cwd, name);
    tracing::info!(
        path = %path.display(),
        exists = path.exists(),
        bundled = bundle.is_some(),
        "resolved resource"
    );
    path
}

pub fn load_icon(path: &Path) -> Result<IconPixels, IconError> {
    if !path.exists() {
        return Err(IconError::Missing(path.to_path_buf()));
    }
    let image = image::open(path)
        .map_err(|source| IconError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .into_rgba8();
    let (width, height) = image.dimensions();
    Ok(IconPixels {
        rgba: image.into_raw(),
        width,
        height,
    })
}

/// Resolves and loads `name`; a missing or broken file just means no icon.
pub fn app_icon(name: &str) -> Option<IconPixels> {
    match load_icon(&resolve_resource(name)) {
        Ok(icon) => Some(icon),
        Err(e) => {
            tracing::warn!("running without icon: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn detects_app_bundle() {
        let exe = Path::new("/Applications/Stopwatch.app/Contents/MacOS/desktop_stopwatch");
        assert_eq!(
            bundle_root(exe),
            Some(PathBuf::from("/Applications/Stopwatch.app/Contents/Resources"))
        );
    }

    #[test]
    fn plain_binary_is_not_a_bundle() {
        assert_eq!(bundle_root(Path::new("/usr/local/bin/desktop_stopwatch")), None);
        assert_eq!(bundle_root(Path::new("/opt/MacOS/Contents/bin")), None);
        assert_eq!(bundle_root(Path::new("stopwatch")), None);
    }

    #[test]
    fn bundle_copy_wins() {
        let bundle = tempfile::tempdir().unwrap();
        let cwd = tempfile::tempdir().unwrap();
        fs::write(bundle.path().join("icon.png"), b"x").unwrap();
        fs::write(cwd.path().join("icon.png"), b"x").unwrap();

        let path = resolve_in(Some(bundle.path()), cwd.path(), "icon.png");
        assert_eq!(path, bundle.path().join("icon.png"));
    }

    #[test]
    fn falls_back_to_cwd() {
        let bundle = tempfile::tempdir().unwrap();
        let cwd = tempfile::tempdir().unwrap();

        let path = resolve_in(Some(bundle.path()), cwd.path(), "icon.png");
        assert_eq!(path, cwd.path().join("icon.png"));
        assert_eq!(resolve_in(None, cwd.path(), "icon.png"), cwd.path().join("icon.png"));
    }

    #[test]
    fn loads_png_pixels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icon.png");
        image::RgbaImage::from_pixel(3, 2, image::Rgba([255, 0, 0, 255]))
            .save(&path)
            .unwrap();

        let icon = load_icon(&path).unwrap();
        assert_eq!((icon.width, icon.height), (3, 2));
        assert_eq!(icon.rgba.len(), 3 * 2 * 4);
        assert_eq!(&icon.rgba[..4], &[255, 0, 0, 255]);
    }

    #[test]
    fn missing_icon_is_an_error_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_icon(&dir.path().join("icon.png")).unwrap_err();
        assert!(matches!(err, IconError::Missing(_)));
    }

    #[test]
    fn garbage_icon_fails_to_decode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("icon.png");
        fs::write(&path, b"definitely not a png").unwrap();
        assert!(matches!(load_icon(&path), Err(IconError::Decode { .. })));
    }
}
