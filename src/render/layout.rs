//! Module layout: turns options into positioned, painted shapes.
//!
//! The code is centered inside `width × height`. Module size is the drawing
//! area (`min(width, height) - 2 * margin`) divided by the module count and
//! floored to whole pixels, so a tight canvas can draw nothing at all.

use image::RgbaImage;
use qrcode::{QrCode, Version};
use tracing::warn;

use super::logo;
use super::paint::Paint;
use super::shapes::{Rect, Shape};
use crate::error::QrStyleError;
use crate::options::{ElementOptions, QrOptions};
use crate::style::{Color, CornerDotType, CornerSquareType, DotType};

/// Finder pattern edge in modules.
const FINDER: usize = 7;

/// A group of shapes sharing one paint.
#[derive(Debug, Clone)]
pub struct Layer {
    pub id: String,
    pub paint: Paint,
    pub shapes: Vec<Shape>,
}

#[derive(Debug, Clone)]
pub struct PlacedLogo {
    pub x: u32,
    pub y: u32,
    pub image: RgbaImage,
}

impl PlacedLogo {
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.x as f32,
            self.y as f32,
            self.image.width() as f32,
            self.image.height() as f32,
        )
    }
}

/// Everything a backend needs to draw one code.
#[derive(Debug, Clone)]
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub background: Color,
    pub module_count: usize,
    pub module_size: f32,
    pub layers: Vec<Layer>,
    pub logo: Option<PlacedLogo>,
}

struct Matrix {
    size: usize,
    dark: Vec<bool>,
}

impl Matrix {
    fn encode(options: &QrOptions) -> Result<Self, QrStyleError> {
        let ec = options.qr_options.error_correction_level.to_ec_level();
        let data = options.data.as_bytes();
        let code = match options.qr_options.type_number {
            0 => QrCode::with_error_correction_level(data, ec),
            n => QrCode::with_version(data, Version::Normal(n as i16), ec),
        }
        .map_err(|e| QrStyleError::Render(format!("QR code generation failed: {}", e)))?;

        let size = code.width();
        let dark = code
            .to_colors()
            .into_iter()
            .map(|c| c == qrcode::Color::Dark)
            .collect();
        Ok(Self { size, dark })
    }

    fn is_dark(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 || x as usize >= self.size || y as usize >= self.size {
            return false;
        }
        self.dark[y as usize * self.size + x as usize]
    }

    /// Top-left module of each finder pattern.
    fn finder_origins(&self) -> [(usize, usize); 3] {
        let far = self.size.saturating_sub(FINDER);
        [(0, 0), (far, 0), (0, far)]
    }

    fn in_finder(&self, x: usize, y: usize) -> bool {
        self.finder_origins()
            .iter()
            .any(|&(fx, fy)| x >= fx && x < fx + FINDER && y >= fy && y < fy + FINDER)
    }
}

impl Scene {
    pub fn build(options: &QrOptions) -> Result<Self, QrStyleError> {
        let matrix = Matrix::encode(options)?;
        let n = matrix.size;

        let draw_area = options
            .width
            .min(options.height)
            .saturating_sub(2 * options.margin);
        let module_size = (draw_area as usize / n.max(1)) as f32;
        let code_px = module_size * n as f32;
        let origin_x = ((options.width as f32 - code_px) / 2.0).floor();
        let origin_y = ((options.height as f32 - code_px) / 2.0).floor();
        let code_rect = Rect::square(origin_x, origin_y, code_px);

        let logo = if options.has_logo() && code_px > 0.0 {
            place_logo(options, &code_rect)
        } else {
            None
        };

        let hide_zone = logo
            .as_ref()
            .filter(|_| options.image_options.hide_background_dots)
            .map(|l| l.rect().expand(options.image_options.margin as f32));

        let cell = |x: usize, y: usize| {
            Rect::square(
                origin_x + x as f32 * module_size,
                origin_y + y as f32 * module_size,
                module_size,
            )
        };
        let hidden = |x: usize, y: usize| {
            hide_zone
                .as_ref()
                .is_some_and(|zone| zone.intersects(&cell(x, y)))
        };
        let drawn = |x: isize, y: isize| {
            matrix.is_dark(x, y)
                && !matrix.in_finder(x as usize, y as usize)
                && !hidden(x as usize, y as usize)
        };

        let mut layers = Vec::new();

        if module_size > 0.0 {
            let mut dot_shapes = Vec::new();
            for y in 0..n as isize {
                for x in 0..n as isize {
                    if !drawn(x, y) {
                        continue;
                    }
                    let rect = cell(x as usize, y as usize);
                    dot_shapes.push(dot_shape(options.dot_options.shape, rect, |dx, dy| {
                        drawn(x + dx, y + dy)
                    }));
                }
            }
            layers.push(layer("dots", &options.dot_options, code_rect, dot_shapes));

            for (i, &(fx, fy)) in matrix.finder_origins().iter().enumerate() {
                let outer = Rect::square(
                    origin_x + fx as f32 * module_size,
                    origin_y + fy as f32 * module_size,
                    FINDER as f32 * module_size,
                );
                let square = corner_square_shape(
                    options.corner_square_options.shape,
                    outer,
                    module_size,
                );
                layers.push(layer(
                    &format!("corner-square-{}", i),
                    &options.corner_square_options,
                    outer,
                    vec![square],
                ));

                let inner = outer.inset(2.0 * module_size);
                let dot = corner_dot_shape(options.corner_dot_options.shape, inner);
                layers.push(layer(
                    &format!("corner-dot-{}", i),
                    &options.corner_dot_options,
                    inner,
                    vec![dot],
                ));
            }
        }

        Ok(Scene {
            width: options.width,
            height: options.height,
            background: options.background_options.color,
            module_count: n,
            module_size,
            layers,
            logo,
        })
    }
}

fn layer<S>(id: &str, element: &ElementOptions<S>, bounds: Rect, shapes: Vec<Shape>) -> Layer {
    Layer {
        id: id.to_string(),
        paint: Paint::for_element(element.color, element.gradient, bounds),
        shapes,
    }
}

fn place_logo(options: &QrOptions, code_rect: &Rect) -> Option<PlacedLogo> {
    let mut img = match logo::decode(&options.image) {
        Ok(img) => img,
        Err(e) => {
            warn!(error = %e, "skipping logo overlay");
            return None;
        }
    };
    if options.image_options.remove_background {
        logo::remove_background(&mut img);
    }

    let side = options.image_options.image_size * code_rect.w;
    let (w, h) = logo::fit_within(img.width(), img.height(), side);
    if w == 0 || h == 0 {
        return None;
    }
    let (cx, cy) = code_rect.center();
    Some(PlacedLogo {
        x: (cx - w as f32 / 2.0).round().max(0.0) as u32,
        y: (cy - h as f32 / 2.0).round().max(0.0) as u32,
        image: logo::resize(&img, w, h),
    })
}

fn dot_shape(kind: DotType, rect: Rect, neighbor: impl Fn(isize, isize) -> bool) -> Shape {
    match kind {
        DotType::Square => Shape::Rect(rect),
        DotType::Dots => Shape::circle_in(rect),
        DotType::Rounded => {
            let r = rect.w / 2.0;
            let (left, right) = (neighbor(-1, 0), neighbor(1, 0));
            let (top, bottom) = (neighbor(0, -1), neighbor(0, 1));
            let round = |a: bool, b: bool| if a || b { 0.0 } else { r };
            Shape::RoundedRect {
                rect,
                radii: [
                    round(top, left),
                    round(top, right),
                    round(bottom, right),
                    round(bottom, left),
                ],
            }
        }
    }
}

fn corner_square_shape(kind: CornerSquareType, outer: Rect, module: f32) -> Shape {
    let inner = outer.inset(module);
    match kind {
        CornerSquareType::Square => Shape::ring(Shape::Rect(outer), Shape::Rect(inner)),
        CornerSquareType::Dot => Shape::ring(Shape::circle_in(outer), Shape::circle_in(inner)),
        CornerSquareType::ExtraRounded => Shape::ring(
            Shape::rounded(outer, 2.5 * module),
            Shape::rounded(inner, 1.5 * module),
        ),
    }
}

fn corner_dot_shape(kind: CornerDotType, rect: Rect) -> Shape {
    match kind {
        CornerDotType::Square => Shape::Rect(rect),
        CornerDotType::Dot => Shape::circle_in(rect),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormState;

    fn default_options() -> QrOptions {
        QrOptions::from_form(&FormState::default())
    }

    #[test]
    fn test_layout_centers_code() {
        let scene = Scene::build(&default_options()).unwrap();
        assert!(scene.module_count >= 21);
        assert!(scene.module_size >= 1.0);

        let code_px = scene.module_size * scene.module_count as f32;
        assert!(code_px <= 280.0);
    }

    #[test]
    fn test_layers_per_element() {
        let scene = Scene::build(&default_options()).unwrap();
        let ids: Vec<&str> = scene.layers.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids[0], "dots");
        assert_eq!(ids.iter().filter(|id| id.starts_with("corner-square")).count(), 3);
        assert_eq!(ids.iter().filter(|id| id.starts_with("corner-dot")).count(), 3);
        assert!(!scene.layers[0].shapes.is_empty());
    }

    #[test]
    fn test_zero_drawing_area_draws_nothing() {
        let mut form = FormState::default();
        form.set_width(100);
        form.set_height(100);
        form.set_margin(50);
        let scene = Scene::build(&QrOptions::from_form(&form)).unwrap();
        assert_eq!(scene.module_size, 0.0);
        assert!(scene.layers.is_empty());
    }

    #[test]
    fn test_empty_content_still_encodes() {
        let mut form = FormState::default();
        form.set_content("");
        assert!(Scene::build(&QrOptions::from_form(&form)).is_ok());
    }

    #[test]
    fn test_oversized_content_is_render_error() {
        let mut form = FormState::default();
        form.set_content("x".repeat(5000));
        let result = Scene::build(&QrOptions::from_form(&form));
        assert!(matches!(result, Err(QrStyleError::Render(_))));
    }

    #[test]
    fn test_undecodable_logo_is_skipped() {
        let mut form = FormState::default();
        form.set_logo_url("data:image/png;base64,AAAA");
        let scene = Scene::build(&QrOptions::from_form(&form)).unwrap();
        assert!(scene.logo.is_none());
    }

    #[test]
    fn test_isolated_rounded_dot_is_fully_round() {
        let shape = dot_shape(DotType::Rounded, Rect::square(0.0, 0.0, 10.0), |_, _| false);
        assert_eq!(
            shape,
            Shape::RoundedRect {
                rect: Rect::square(0.0, 0.0, 10.0),
                radii: [5.0; 4]
            }
        );
    }

    #[test]
    fn test_rounded_dot_flat_towards_neighbor() {
        let shape = dot_shape(DotType::Rounded, Rect::square(0.0, 0.0, 10.0), |dx, dy| {
            (dx, dy) == (1, 0)
        });
        match shape {
            Shape::RoundedRect { radii, .. } => assert_eq!(radii, [5.0, 0.0, 0.0, 5.0]),
            other => panic!("unexpected shape {:?}", other),
        }
    }
}
