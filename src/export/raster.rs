use std::path::{Path, PathBuf};

use base64::Engine as _;
use image::ImageEncoder as _;

use crate::{
    foundation::{
        error::{ShotframeError, ShotframeResult},
        math::{rgba8_len, unpremultiply_rgba8_in_place},
    },
    render::backend::FrameRGBA,
};

/// File name the exported composition is saved under.
pub const EXPORT_FILE_NAME: &str = "edited_screenshot.png";

/// A lossless export: straight-alpha pixels plus their PNG encoding.
#[derive(Clone, Debug)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub rgba: image::RgbaImage,
    pub png: Vec<u8>,
}

impl RasterImage {
    pub fn from_frame(frame: FrameRGBA) -> ShotframeResult<Self> {
        let FrameRGBA {
            width,
            height,
            mut data,
            premultiplied,
        } = frame;
        if Some(data.len()) != rgba8_len(width, height) {
            return Err(anyhow::anyhow!("captured frame byte length mismatch").into());
        }
        if premultiplied {
            unpremultiply_rgba8_in_place(&mut data);
        }

        let mut png = Vec::new();
        image::codecs::png::PngEncoder::new(&mut png)
            .write_image(&data, width, height, image::ExtendedColorType::Rgba8)
            .map_err(|e| anyhow::anyhow!("png encode failed: {e}"))?;

        let rgba = image::RgbaImage::from_raw(width, height, data)
            .ok_or_else(|| anyhow::anyhow!("rgba buffer does not match dimensions"))?;
        Ok(Self {
            width,
            height,
            rgba,
            png,
        })
    }

    /// `data:image/png;base64,...`, what a download link would point at.
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.png)
        )
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.rgba.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Write [`EXPORT_FILE_NAME`] into `dir`, creating it if needed.
    pub fn save_png(&self, dir: impl AsRef<Path>) -> ShotframeResult<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(|e| {
            ShotframeError::Other(anyhow::anyhow!(
                "create output dir '{}': {e}",
                dir.display()
            ))
        })?;
        let path = dir.join(EXPORT_FILE_NAME);
        self.save_png_to(&path)?;
        Ok(path)
    }

    pub fn save_png_to(&self, path: impl AsRef<Path>) -> ShotframeResult<()> {
        let path = path.as_ref();
        std::fs::write(path, &self.png).map_err(|e| {
            ShotframeError::Other(anyhow::anyhow!("write '{}': {e}", path.display()))
        })?;
        tracing::info!(path = %path.display(), bytes = self.png.len(), "png written");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/export/raster.rs"]
mod tests;
