//! Logo preparation for the overlay: decode, knock out background, fit.

use image::{RgbaImage, imageops::FilterType};

use crate::error::QrStyleError;
use crate::logo::decode_data_url;

/// Per-channel distance under which a pixel counts as background.
const BACKGROUND_TOLERANCE: i16 = 24;

/// Decode a data-URL logo into RGBA pixels.
pub fn decode(url: &str) -> Result<RgbaImage, QrStyleError> {
    let (_mime, bytes) = decode_data_url(url)?;
    let img = image::load_from_memory(&bytes)
        .map_err(|e| QrStyleError::Image(format!("Failed to decode logo: {}", e)))?;
    Ok(img.to_rgba8())
}

/// Make every pixel that matches the top-left pixel's color transparent.
pub fn remove_background(img: &mut RgbaImage) {
    if img.width() == 0 || img.height() == 0 {
        return;
    }
    let key = *img.get_pixel(0, 0);
    for pixel in img.pixels_mut() {
        let close = (0..3).all(|c| (pixel[c] as i16 - key[c] as i16).abs() <= BACKGROUND_TOLERANCE);
        if close {
            pixel[3] = 0;
        }
    }
}

/// Size that fits `(w, h)` inside a `side × side` box, keeping aspect.
pub fn fit_within(w: u32, h: u32, side: f32) -> (u32, u32) {
    if w == 0 || h == 0 || side <= 0.0 {
        return (0, 0);
    }
    let scale = (side / w as f32).min(side / h as f32);
    (
        ((w as f32 * scale).floor() as u32).max(1),
        ((h as f32 * scale).floor() as u32).max(1),
    )
}

pub fn resize(img: &RgbaImage, w: u32, h: u32) -> RgbaImage {
    image::imageops::resize(img, w, h, FilterType::Triangle)
}
