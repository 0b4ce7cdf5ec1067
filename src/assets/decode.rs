use std::sync::Arc;

use base64::Engine as _;

use crate::{
    assets::store::PreparedImage,
    composition::params::ImageIntrinsics,
    foundation::error::{ShotframeError, ShotframeResult},
    foundation::math::premultiply_rgba8_in_place,
};

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> ShotframeResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| ShotframeError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(ShotframeError::decode("image has zero width or height"));
    }

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

/// A decoded upload: pixels, true dimensions and the data URI the view would display.
#[derive(Clone, Debug)]
pub struct Screenshot {
    pub image: Arc<PreparedImage>,
    pub intrinsics: ImageIntrinsics,
    pub mime: &'static str,
    pub data_uri: String,
}

impl Screenshot {
    /// Decode raw upload bytes. Anything that is not a raster image is a decode error.
    #[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
    pub fn decode(bytes: &[u8]) -> ShotframeResult<Self> {
        let format = image::guess_format(bytes)
            .map_err(|_| ShotframeError::decode("bytes are not a recognised image format"))?;
        let mime = format.to_mime_type();
        if !mime.starts_with("image/") {
            return Err(ShotframeError::decode(format!(
                "unsupported mime type '{mime}'"
            )));
        }

        let image = decode_image(bytes)?;
        let intrinsics = ImageIntrinsics::new(image.width, image.height)?;
        let data_uri = format!(
            "data:{mime};base64,{}",
            base64::engine::general_purpose::STANDARD.encode(bytes)
        );
        tracing::debug!(
            width = intrinsics.width_px,
            height = intrinsics.height_px,
            mime,
            "decoded screenshot"
        );

        Ok(Self {
            image: Arc::new(image),
            intrinsics,
            mime,
            data_uri,
        })
    }
}

/// Decode on the blocking pool so the caller's event loop stays responsive.
pub async fn load_image(bytes: Vec<u8>) -> ShotframeResult<Screenshot> {
    tokio::task::spawn_blocking(move || Screenshot::decode(&bytes))
        .await
        .map_err(|e| ShotframeError::decode(format!("decode task failed: {e}")))?
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
