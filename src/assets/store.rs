use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::assets::decode::decode_image;

/// Decoded image in premultiplied RGBA8, tightly packed, row-major.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    pub width: u32,
    pub height: u32,
    pub rgba8_premul: Arc<Vec<u8>>,
}

/// Pixels for a wallpaper background, or why they cannot be read back.
#[derive(Clone, Debug)]
pub enum WallpaperPixels {
    Ready(Arc<PreparedImage>),
    /// The capture step will fail with this reason (remote source, missing file, bad bytes).
    Unreadable(String),
}

/// Front-loads wallpaper IO so rendering never touches the filesystem.
///
/// Sources are resolved once and memoised, including failures.
#[derive(Debug)]
pub struct WallpaperCache {
    root: PathBuf,
    entries: HashMap<String, WallpaperPixels>,
}

impl WallpaperCache {
    /// Relative wallpaper paths resolve against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: HashMap::new(),
        }
    }

    pub fn resolve(&mut self, source: &str) -> WallpaperPixels {
        if let Some(hit) = self.entries.get(source) {
            return hit.clone();
        }
        let resolved = self.load(source);
        if let WallpaperPixels::Unreadable(reason) = &resolved {
            tracing::warn!(source, reason = reason.as_str(), "wallpaper unavailable");
        }
        self.entries.insert(source.to_string(), resolved.clone());
        resolved
    }

    /// Register already-decoded pixels under `source`.
    pub fn insert(&mut self, source: impl Into<String>, image: PreparedImage) {
        self.entries
            .insert(source.into(), WallpaperPixels::Ready(Arc::new(image)));
    }

    /// Number of cached sources, readable or not.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    fn load(&self, source: &str) -> WallpaperPixels {
        let lower = source.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return WallpaperPixels::Unreadable(format!(
                "remote wallpaper '{source}' cannot be read back as pixels"
            ));
        }
        let path = source.strip_prefix("file://").unwrap_or(source);
        let path = if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.root.join(path)
        };

        let bytes = match std::fs::read(&path) {
            Ok(b) => b,
            Err(e) => {
                return WallpaperPixels::Unreadable(format!(
                    "failed to read wallpaper '{}': {e}",
                    path.display()
                ));
            }
        };
        match decode_image(&bytes) {
            Ok(img) => WallpaperPixels::Ready(Arc::new(img)),
            Err(e) => WallpaperPixels::Unreadable(format!("wallpaper '{}': {e}", path.display())),
        }
    }
}

impl Default for WallpaperCache {
    fn default() -> Self {
        Self::new(".")
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
