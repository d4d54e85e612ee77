//! # Style Primitives
//!
//! Colors, two-stop gradients and the shape variants for the three
//! drawable elements of a QR code (dots, corner squares, corner dots).
//!
//! All types serialize to the same strings the web form uses
//! (`"#1a2b3c"`, `"extra-rounded"`, `"radial"`), so the same values flow
//! through the Rust API, the JSON API and the CLI.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QrStyleError;

// ============================================================================
// COLOR
// ============================================================================

/// An sRGB color with alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Linear interpolation between two colors, `t` in [0, 1].
    pub fn lerp(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// Hex form without alpha, as SVG `fill` expects.
    pub fn to_rgb_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }
}

impl FromStr for Color {
    type Err = QrStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || QrStyleError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let nibble = |i: usize| {
            u8::from_str_radix(&hex[i..i + 1], 16)
                .map(|n| n * 17)
                .map_err(|_| invalid())
        };

        match hex.len() {
            3 => Ok(Color::rgb(nibble(0)?, nibble(1)?, nibble(2)?)),
            6 => Ok(Color::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Color {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
                a: byte(6)?,
            }),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = QrStyleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "{}", self.to_rgb_hex())
        } else {
            write!(f, "{}{:02x}", self.to_rgb_hex(), self.a)
        }
    }
}

// ============================================================================
// GRADIENT
// ============================================================================

/// Gradient geometry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientType {
    #[default]
    Linear,
    Radial,
}

impl FromStr for GradientType {
    type Err = QrStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear" => Ok(GradientType::Linear),
            "radial" => Ok(GradientType::Radial),
            other => Err(QrStyleError::InvalidOption(format!(
                "unknown gradient type '{}' (expected linear or radial)",
                other
            ))),
        }
    }
}

/// One end of a gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    pub offset: f32,
    pub color: Color,
}

/// A two-stop gradient.
///
/// The stops always sit at offsets 0 and 1. Only their colors are editable,
/// and deserialization normalizes whatever offsets were sent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawGradient")]
pub struct Gradient {
    #[serde(rename = "type")]
    kind: GradientType,
    /// Rotation in degrees, 0..=360.
    rotation: u16,
    #[serde(rename = "colorStops")]
    color_stops: [ColorStop; 2],
}

#[derive(Deserialize)]
struct RawGradient {
    #[serde(rename = "type", default)]
    kind: GradientType,
    #[serde(default)]
    rotation: u16,
    #[serde(rename = "colorStops")]
    color_stops: [ColorStop; 2],
}

impl From<RawGradient> for Gradient {
    fn from(raw: RawGradient) -> Self {
        Gradient::new(raw.kind, raw.rotation, raw.color_stops[0].color, raw.color_stops[1].color)
    }
}

impl Default for Gradient {
    fn default() -> Self {
        Gradient::linear(Color::BLACK, Color::BLACK)
    }
}

impl Gradient {
    pub const MAX_ROTATION: u16 = 360;

    pub fn new(kind: GradientType, rotation: u16, start: Color, end: Color) -> Self {
        Self {
            kind,
            rotation: rotation.min(Self::MAX_ROTATION),
            color_stops: [
                ColorStop {
                    offset: 0.0,
                    color: start,
                },
                ColorStop {
                    offset: 1.0,
                    color: end,
                },
            ],
        }
    }

    pub fn linear(start: Color, end: Color) -> Self {
        Self::new(GradientType::Linear, 0, start, end)
    }

    pub fn radial(start: Color, end: Color) -> Self {
        Self::new(GradientType::Radial, 0, start, end)
    }

    pub fn kind(&self) -> GradientType {
        self.kind
    }

    pub fn rotation(&self) -> u16 {
        self.rotation
    }

    pub fn color_stops(&self) -> &[ColorStop; 2] {
        &self.color_stops
    }

    pub fn start_color(&self) -> Color {
        self.color_stops[0].color
    }

    pub fn end_color(&self) -> Color {
        self.color_stops[1].color
    }

    pub fn with_kind(self, kind: GradientType) -> Self {
        Self::new(kind, self.rotation, self.start_color(), self.end_color())
    }

    pub fn with_rotation(self, rotation: u16) -> Self {
        Self::new(self.kind, rotation, self.start_color(), self.end_color())
    }

    pub fn with_start_color(self, color: Color) -> Self {
        Self::new(self.kind, self.rotation, color, self.end_color())
    }

    pub fn with_end_color(self, color: Color) -> Self {
        Self::new(self.kind, self.rotation, self.start_color(), color)
    }

    /// Color at position `t` along the gradient.
    pub fn sample(&self, t: f32) -> Color {
        self.start_color().lerp(self.end_color(), t)
    }
}

// ============================================================================
// SHAPE VARIANTS
// ============================================================================

macro_rules! shape_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "kebab-case")]
        pub enum $name {
            #[default]
            $($variant),+
        }

        impl $name {
            /// Every variant, in form order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = QrStyleError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(QrStyleError::InvalidOption(format!(
                        "unknown {} '{}' (expected one of: {})",
                        $label,
                        other,
                        [$($text),+].join(", ")
                    ))),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

shape_enum! {
    /// Shape of the ordinary data modules.
    DotType, "dot style" {
        Square => "square",
        Dots => "dots",
        Rounded => "rounded",
    }
}

shape_enum! {
    /// Shape of the 7×7 outer ring of each finder pattern.
    CornerSquareType, "corner square style" {
        Square => "square",
        Dot => "dot",
        ExtraRounded => "extra-rounded",
    }
}

shape_enum! {
    /// Shape of the 3×3 centre of each finder pattern.
    CornerDotType, "corner dot style" {
        Square => "square",
        Dot => "dot",
    }
}
