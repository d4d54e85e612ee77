//! Solid and gradient fills.
//!
//! A gradient is laid over a bounding box: the whole code area for data
//! modules, the individual finder box for corner elements. Raster and SVG
//! output use the same geometry so both exports look alike.

use std::fmt::Write;

use super::shapes::{Rect, num};
use crate::style::{Color, Gradient, GradientType};

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    Gradient { gradient: Gradient, bounds: Rect },
}

impl Paint {
    /// Gradient wins over the solid color whenever one is given.
    pub fn for_element(color: Color, gradient: Option<Gradient>, bounds: Rect) -> Paint {
        match gradient {
            Some(gradient) => Paint::Gradient { gradient, bounds },
            None => Paint::Solid(color),
        }
    }

    pub fn color_at(&self, px: f32, py: f32) -> Color {
        match self {
            Paint::Solid(color) => *color,
            Paint::Gradient { gradient, bounds } => {
                gradient.sample(gradient_position(gradient, bounds, px, py))
            }
        }
    }

    /// SVG `fill` attribute value, emitting a `<defs>` entry when needed.
    pub fn svg_fill(&self, id: &str, defs: &mut String) -> String {
        match self {
            Paint::Solid(color) => color.to_rgb_hex(),
            Paint::Gradient { gradient, bounds } => {
                write_svg_gradient(id, gradient, bounds, defs);
                format!("url(#{})", id)
            }
        }
    }

    /// Extra attributes for translucent solid fills.
    pub fn svg_opacity(&self) -> Option<f32> {
        match self {
            Paint::Solid(color) if color.a < 255 => Some(color.a as f32 / 255.0),
            _ => None,
        }
    }
}

/// Linear axis endpoints: centre ∓ direction × half-extent.
fn linear_axis(gradient: &Gradient, bounds: &Rect) -> ((f32, f32), (f32, f32)) {
    let theta = (gradient.rotation() as f32).to_radians();
    let (dx, dy) = (theta.cos(), theta.sin());
    let half = (bounds.w * dx.abs() + bounds.h * dy.abs()) / 2.0;
    let (cx, cy) = bounds.center();
    ((cx - dx * half, cy - dy * half), (cx + dx * half, cy + dy * half))
}

fn radial_radius(bounds: &Rect) -> f32 {
    bounds.w.hypot(bounds.h) / 2.0
}

fn gradient_position(gradient: &Gradient, bounds: &Rect, px: f32, py: f32) -> f32 {
    match gradient.kind() {
        GradientType::Linear => {
            let ((x1, y1), (x2, y2)) = linear_axis(gradient, bounds);
            let (ax, ay) = (x2 - x1, y2 - y1);
            let len2 = ax * ax + ay * ay;
            if len2 <= f32::EPSILON {
                return 0.0;
            }
            (((px - x1) * ax + (py - y1) * ay) / len2).clamp(0.0, 1.0)
        }
        GradientType::Radial => {
            let (cx, cy) = bounds.center();
            let r = radial_radius(bounds);
            if r <= f32::EPSILON {
                return 0.0;
            }
            ((px - cx).hypot(py - cy) / r).clamp(0.0, 1.0)
        }
    }
}

fn write_svg_gradient(id: &str, gradient: &Gradient, bounds: &Rect, defs: &mut String) {
    let stops = gradient.color_stops();
    let mut stop_tags = String::new();
    for stop in stops {
        let _ = write!(
            stop_tags,
            r#"<stop offset="{}" stop-color="{}""#,
            num(stop.offset),
            stop.color.to_rgb_hex()
        );
        if stop.color.a < 255 {
            let _ = write!(stop_tags, r#" stop-opacity="{}""#, num(stop.color.a as f32 / 255.0));
        }
        stop_tags.push_str("/>");
    }

    match gradient.kind() {
        GradientType::Linear => {
            let ((x1, y1), (x2, y2)) = linear_axis(gradient, bounds);
            let _ = write!(
                defs,
                r#"<linearGradient id="{}" gradientUnits="userSpaceOnUse" x1="{}" y1="{}" x2="{}" y2="{}">{}</linearGradient>"#,
                id,
                num(x1),
                num(y1),
                num(x2),
                num(y2),
                stop_tags
            );
        }
        GradientType::Radial => {
            let (cx, cy) = bounds.center();
            let _ = write!(
                defs,
                r#"<radialGradient id="{}" gradientUnits="userSpaceOnUse" cx="{}" cy="{}" r="{}">{}</radialGradient>"#,
                id,
                num(cx),
                num(cy),
                num(radial_radius(bounds)),
                stop_tags
            );
        }
    }
}
