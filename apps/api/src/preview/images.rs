//! Photo and logo uploads: decode, crop to the chosen rectangle, re-encode as an
//! inline JPEG data URL so the preview and the print document need no storage.

use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use serde::Deserialize;
use thiserror::Error;

const JPEG_QUALITY: u8 = 90;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Unsupported or corrupt image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Crop rectangle is empty")]
    EmptyCrop,

    #[error("Crop rectangle {x},{y} {width}x{height} exceeds the {image_width}x{image_height} image")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        image_width: u32,
        image_height: u32,
    },

    #[error("JPEG encoding failed: {0}")]
    Encode(#[source] image::ImageError),
}

/// Crop rectangle in source-image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Which personal-details image an upload replaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSlot {
    Photo,
    Logo,
}

impl ImageSlot {
    pub fn field(&self) -> &'static str {
        match self {
            ImageSlot::Photo => "photo",
            ImageSlot::Logo => "logo",
        }
    }
}

/// Crops `bytes` to `crop` (or keeps the whole image) and returns a
/// `data:image/jpeg;base64,…` URL.
pub fn crop_to_data_url(bytes: &[u8], crop: Option<CropRect>) -> Result<String, ImageError> {
    let image = image::load_from_memory(bytes).map_err(ImageError::Decode)?;

    let image = match crop {
        None => image,
        Some(rect) => {
            if rect.width == 0 || rect.height == 0 {
                return Err(ImageError::EmptyCrop);
            }
            let right = rect.x.checked_add(rect.width);
            let bottom = rect.y.checked_add(rect.height);
            let inside = matches!((right, bottom), (Some(r), Some(b)) if r <= image.width() && b <= image.height());
            if !inside {
                return Err(ImageError::OutOfBounds {
                    x: rect.x,
                    y: rect.y,
                    width: rect.width,
                    height: rect.height,
                    image_width: image.width(),
                    image_height: image.height(),
                });
            }
            image.crop_imm(rect.x, rect.y, rect.width, rect.height)
        }
    };

    // JPEG has no alpha channel.
    let rgb = image.to_rgb8();
    let mut jpeg = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY))
        .map_err(ImageError::Encode)?;

    Ok(format!(
        "data:image/jpeg;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&jpeg)
    ))
}
