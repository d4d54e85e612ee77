//! SVG backend: serializes a [`Scene`] as a standalone SVG document.

use std::fmt::Write;

use super::layout::Scene;
use super::paint::Paint;
use super::raster;
use crate::error::QrStyleError;
use crate::logo::encode_data_url;

pub fn write(scene: &Scene) -> Result<String, QrStyleError> {
    let mut defs = String::new();
    let mut body = String::new();

    let _ = write!(
        body,
        r#"<rect x="0" y="0" width="{}" height="{}" fill="{}""#,
        scene.width,
        scene.height,
        scene.background.to_rgb_hex()
    );
    if let Some(opacity) = Paint::Solid(scene.background).svg_opacity() {
        let _ = write!(body, r#" fill-opacity="{}""#, opacity);
    }
    body.push_str("/>");

    for layer in &scene.layers {
        if layer.shapes.is_empty() {
            continue;
        }
        let mut d = String::new();
        for shape in &layer.shapes {
            shape.write_svg_path(&mut d);
        }
        let fill = layer.paint.svg_fill(&format!("{}-fill", layer.id), &mut defs);
        let _ = write!(body, r#"<path fill="{}" fill-rule="evenodd""#, fill);
        if let Some(opacity) = layer.paint.svg_opacity() {
            let _ = write!(body, r#" fill-opacity="{}""#, opacity);
        }
        let _ = write!(body, r#" d="{}"/>"#, d);
    }

    if let Some(logo) = &scene.logo {
        // Embed the processed pixels so background removal shows up
        let png = raster::encode(&logo.image, image::ImageFormat::Png)?;
        let _ = write!(
            body,
            r#"<image x="{}" y="{}" width="{}" height="{}" href="{}"/>"#,
            logo.x,
            logo.y,
            logo.image.width(),
            logo.image.height(),
            encode_data_url(&png, "image/png")
        );
    }

    let mut svg = String::with_capacity(defs.len() + body.len() + 256);
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
        w = scene.width,
        h = scene.height
    );
    if !defs.is_empty() {
        let _ = write!(svg, "<defs>{}</defs>", defs);
    }
    svg.push_str(&body);
    svg.push_str("</svg>");
    Ok(svg)
}
