//! Geometric primitives shared by the raster and SVG backends.
//!
//! Coordinates are in output pixels, floating point, origin top-left.

use std::fmt::Write;

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn square(x: f32, y: f32, size: f32) -> Self {
        Self::new(x, y, size, size)
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    pub fn inset(&self, amount: f32) -> Rect {
        Rect::new(
            self.x + amount,
            self.y + amount,
            (self.w - 2.0 * amount).max(0.0),
            (self.h - 2.0 * amount).max(0.0),
        )
    }

    pub fn expand(&self, amount: f32) -> Rect {
        self.inset(-amount)
    }
}

/// A fillable outline.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect(Rect),
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
    },
    /// Rectangle with per-corner radii: top-left, top-right, bottom-right, bottom-left.
    RoundedRect {
        rect: Rect,
        radii: [f32; 4],
    },
    /// `outer` minus `inner`.
    Ring {
        outer: Box<Shape>,
        inner: Box<Shape>,
    },
}

impl Shape {
    pub fn circle_in(rect: Rect) -> Shape {
        let (cx, cy) = rect.center();
        Shape::Circle {
            cx,
            cy,
            r: rect.w.min(rect.h) / 2.0,
        }
    }

    pub fn rounded(rect: Rect, radius: f32) -> Shape {
        Shape::RoundedRect {
            rect,
            radii: [radius; 4],
        }
    }

    pub fn ring(outer: Shape, inner: Shape) -> Shape {
        Shape::Ring {
            outer: Box::new(outer),
            inner: Box::new(inner),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Shape::Rect(rect) | Shape::RoundedRect { rect, .. } => *rect,
            Shape::Circle { cx, cy, r } => Rect::square(cx - r, cy - r, 2.0 * r),
            Shape::Ring { outer, .. } => outer.bounds(),
        }
    }

    pub fn contains(&self, px: f32, py: f32) -> bool {
        match self {
            Shape::Rect(rect) => rect.contains(px, py),
            Shape::Circle { cx, cy, r } => {
                let (dx, dy) = (px - cx, py - cy);
                dx * dx + dy * dy <= r * r
            }
            Shape::RoundedRect { rect, radii } => {
                if !rect.contains(px, py) {
                    return false;
                }
                let [tl, tr, br, bl] = *radii;
                let right = rect.x + rect.w;
                let bottom = rect.y + rect.h;
                let corners = [
                    (tl, rect.x + tl, rect.y + tl, px < rect.x + tl && py < rect.y + tl),
                    (tr, right - tr, rect.y + tr, px > right - tr && py < rect.y + tr),
                    (br, right - br, bottom - br, px > right - br && py > bottom - br),
                    (bl, rect.x + bl, bottom - bl, px < rect.x + bl && py > bottom - bl),
                ];
                corners.iter().all(|&(r, cx, cy, in_corner)| {
                    if r <= 0.0 || !in_corner {
                        return true;
                    }
                    let (dx, dy) = (px - cx, py - cy);
                    dx * dx + dy * dy <= r * r
                })
            }
            Shape::Ring { outer, inner } => outer.contains(px, py) && !inner.contains(px, py),
        }
    }

    /// Append SVG path data for this shape to `d`.
    ///
    /// Rings emit two subpaths and rely on `fill-rule="evenodd"`.
    pub fn write_svg_path(&self, d: &mut String) {
        match self {
            Shape::Rect(r) => {
                let _ = write!(
                    d,
                    "M{} {}h{}v{}h{}Z",
                    num(r.x),
                    num(r.y),
                    num(r.w),
                    num(r.h),
                    num(-r.w)
                );
            }
            Shape::Circle { cx, cy, r } => {
                let _ = write!(
                    d,
                    "M{} {}a{r} {r} 0 1 0 {d2} 0a{r} {r} 0 1 0 {nd2} 0Z",
                    num(cx - r),
                    num(*cy),
                    r = num(*r),
                    d2 = num(2.0 * r),
                    nd2 = num(-2.0 * r)
                );
            }
            Shape::RoundedRect { rect, radii } => {
                let [tl, tr, br, bl] = radii.map(num);
                let (x, y) = (rect.x, rect.y);
                let (right, bottom) = (rect.x + rect.w, rect.y + rect.h);
                let _ = write!(
                    d,
                    "M{} {}H{}A{tr} {tr} 0 0 1 {} {}V{}A{br} {br} 0 0 1 {} {}H{}A{bl} {bl} 0 0 1 {} {}V{}A{tl} {tl} 0 0 1 {} {}Z",
                    num(x + radii[0]),
                    num(y),
                    num(right - radii[1]),
                    num(right),
                    num(y + radii[1]),
                    num(bottom - radii[2]),
                    num(right - radii[2]),
                    num(bottom),
                    num(x + radii[3]),
                    num(x),
                    num(bottom - radii[3]),
                    num(y + radii[0]),
                    num(x + radii[0]),
                    num(y),
                );
            }
            Shape::Ring { outer, inner } => {
                outer.write_svg_path(d);
                inner.write_svg_path(d);
            }
        }
    }
}

/// Compact number formatting for SVG output.
pub(crate) fn num(v: f32) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        format!("{}", rounded)
    }
}
