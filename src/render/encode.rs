use std::io::Cursor;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assets::decode::unpremultiply_rgba8_in_place;
use crate::foundation::error::{LaurelError, LaurelResult};
use crate::render::surface::FrameRgba;

/// Default JPEG quality.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Output image container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JPEG, alpha dropped.
    #[default]
    Jpeg,
    /// Lossless PNG with alpha.
    Png,
}

impl OutputFormat {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }
}

/// Encode a frame. `quality` applies to JPEG only and is clamped to `1..=100`.
pub fn encode_frame(frame: &FrameRgba, format: OutputFormat, quality: u8) -> LaurelResult<Vec<u8>> {
    let expected = (frame.width as usize)
        .saturating_mul(frame.height as usize)
        .saturating_mul(4);
    if frame.data.len() != expected {
        return Err(LaurelError::encode_write(format!(
            "frame has {} bytes, expected {expected}",
            frame.data.len()
        )));
    }

    let mut rgba = frame.data.clone();
    if frame.premultiplied {
        unpremultiply_rgba8_in_place(&mut rgba);
    }

    let mut buf = Vec::new();
    match format {
        OutputFormat::Jpeg => {
            let rgb: Vec<u8> = rgba
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect();
            let mut encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
            encoder
                .encode(&rgb, frame.width, frame.height, image::ExtendedColorType::Rgb8)
                .map_err(|e| LaurelError::encode_write(format!("jpeg encode: {e}")))?;
        }
        OutputFormat::Png => {
            let img = image::RgbaImage::from_raw(frame.width, frame.height, rgba)
                .ok_or_else(|| LaurelError::encode_write("frame buffer does not fit dimensions"))?;
            image::DynamicImage::ImageRgba8(img)
                .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
                .map_err(|e| LaurelError::encode_write(format!("png encode: {e}")))?;
        }
    }
    Ok(buf)
}

/// Encode `frame` and write it to `path`, replacing any existing file.
pub fn write_frame(
    frame: &FrameRgba,
    path: &Path,
    format: OutputFormat,
    quality: u8,
) -> LaurelResult<()> {
    let bytes = encode_frame(frame, format, quality)?;
    std::fs::write(path, bytes)
        .map_err(|e| LaurelError::encode_write(format!("write '{}': {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/render/encode.rs"]
mod tests;
