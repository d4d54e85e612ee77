//! Raster backend: paints a [`Scene`] into an RGBA image.
//!
//! Each shape is rasterized over its own bounding box with 4×4
//! supersampling for anti-aliased edges.

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage, imageops};
use std::io::Cursor;

use super::layout::Scene;
use super::paint::Paint;
use super::shapes::Shape;
use crate::error::QrStyleError;

const SUBSAMPLES: u32 = 4;

pub fn draw(scene: &Scene) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(scene.width, scene.height, scene.background.to_rgba());

    for layer in &scene.layers {
        for shape in &layer.shapes {
            fill_shape(&mut img, shape, &layer.paint);
        }
    }

    if let Some(logo) = &scene.logo {
        imageops::overlay(&mut img, &logo.image, logo.x as i64, logo.y as i64);
    }

    img
}

fn fill_shape(img: &mut RgbaImage, shape: &Shape, paint: &Paint) {
    let bounds = shape.bounds();
    let x0 = bounds.x.floor().max(0.0) as u32;
    let y0 = bounds.y.floor().max(0.0) as u32;
    let x1 = ((bounds.x + bounds.w).ceil().max(0.0) as u32).min(img.width());
    let y1 = ((bounds.y + bounds.h).ceil().max(0.0) as u32).min(img.height());
    let step = 1.0 / SUBSAMPLES as f32;
    let total = (SUBSAMPLES * SUBSAMPLES) as f32;

    for py in y0..y1 {
        for px in x0..x1 {
            let mut hits = 0u32;
            for sy in 0..SUBSAMPLES {
                for sx in 0..SUBSAMPLES {
                    let x = px as f32 + (sx as f32 + 0.5) * step;
                    let y = py as f32 + (sy as f32 + 0.5) * step;
                    if shape.contains(x, y) {
                        hits += 1;
                    }
                }
            }
            if hits == 0 {
                continue;
            }
            let color = paint.color_at(px as f32 + 0.5, py as f32 + 0.5);
            let coverage = hits as f32 / total;
            blend(img.get_pixel_mut(px, py), color.to_rgba(), coverage);
        }
    }
}

/// Source-over blend of `src` at `coverage` onto `dst`.
fn blend(dst: &mut Rgba<u8>, src: Rgba<u8>, coverage: f32) {
    let sa = src[3] as f32 / 255.0 * coverage;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        *dst = Rgba([0, 0, 0, 0]);
        return;
    }
    for c in 0..3 {
        let s = src[c] as f32 / 255.0;
        let d = dst[c] as f32 / 255.0;
        let v = (s * sa + d * da * (1.0 - sa)) / out_a;
        dst[c] = (v * 255.0).round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}

/// Encode an image in one of the raster export formats.
pub fn encode(img: &RgbaImage, format: ImageFormat) -> Result<Vec<u8>, QrStyleError> {
    let dynamic = match format {
        // JPEG has no alpha channel
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(img.clone()).to_rgb8()),
        _ => DynamicImage::ImageRgba8(img.clone()),
    };

    let mut bytes = Vec::new();
    dynamic
        .write_to(&mut Cursor::new(&mut bytes), format)
        .map_err(|e| QrStyleError::Image(format!("{:?} encoding failed: {}", format, e)))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormState;
    use crate::options::QrOptions;
    use crate::style::Color;

    fn render(form: &FormState) -> RgbaImage {
        draw(&Scene::build(&QrOptions::from_form(form)).unwrap())
    }

    #[test]
    fn test_output_dimensions() {
        let mut form = FormState::default();
        form.set_width(400);
        form.set_height(200);
        let img = render(&form);
        assert_eq!((img.width(), img.height()), (400, 200));
    }

    #[test]
    fn test_margin_is_background() {
        let mut form = FormState::default();
        form.set_background_color(Color::rgb(0, 255, 0));
        let img = render(&form);
        assert_eq!(*img.get_pixel(2, 2), Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn test_finder_uses_corner_color() {
        let mut form = FormState::default();
        let red = Color::rgb(255, 0, 0);
        // A gradient from red to red paints red regardless of geometry
        form.set_corner_square_gradient(crate::style::Gradient::linear(red, red));
        let scene = Scene::build(&QrOptions::from_form(&form)).unwrap();
        let img = draw(&scene);

        let outer = scene.layers[1].shapes[0].bounds();
        let px = (outer.x + scene.module_size / 2.0) as u32;
        let py = (outer.y + outer.h / 2.0) as u32;
        assert_eq!(*img.get_pixel(px, py), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_blend_full_coverage_replaces() {
        let mut px = Rgba([255, 255, 255, 255]);
        blend(&mut px, Rgba([0, 0, 0, 255]), 1.0);
        assert_eq!(px, Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_blend_half_coverage_mixes() {
        let mut px = Rgba([255, 255, 255, 255]);
        blend(&mut px, Rgba([0, 0, 0, 255]), 0.5);
        assert_eq!(px[0], 128);
        assert_eq!(px[3], 255);
    }

    #[test]
    fn test_encode_png_signature() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let bytes = encode(&img, ImageFormat::Png).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_encode_jpeg_drops_alpha() {
        let img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 128]));
        let bytes = encode(&img, ImageFormat::Jpeg).unwrap();
        assert_eq!(&bytes[..2], b"\xff\xd8");
    }
}
