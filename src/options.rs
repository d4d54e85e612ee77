//! # Options Synthesizer
//!
//! Turns the form state into the single configuration object a renderer is
//! built from. The JSON shape is the renderer's schema:
//!
//! ```json
//! {
//!   "width": 300, "height": 300, "renderType": "svg",
//!   "data": "https://example.com", "margin": 10,
//!   "qrOptions": {"typeNumber": 0, "mode": "Byte", "errorCorrectionLevel": "Q"},
//!   "dotOptions": {"type": "square", "color": "#000000", "gradient": {...}},
//!   "cornerSquareOptions": {...},
//!   "cornerDotOptions": {...},
//!   "backgroundOptions": {"color": "#ffffff"},
//!   "imageOptions": {"hideBackgroundDots": true, "imageSize": 0.2, ...},
//!   "image": ""
//! }
//! ```
//!
//! Both the solid color and the gradient of every element are always
//! included; the tab the user had open in the form is not.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::QrStyleError;
use crate::form::{FormState, StyleSpec};
use crate::style::{Color, CornerDotType, CornerSquareType, DotType, Gradient};

/// Output kind the renderer mounts into the target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderType {
    #[default]
    Svg,
    Canvas,
}

/// QR error-correction level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCorrectionLevel {
    L,
    M,
    #[default]
    Q,
    H,
}

impl ErrorCorrectionLevel {
    pub fn to_ec_level(self) -> qrcode::EcLevel {
        match self {
            ErrorCorrectionLevel::L => qrcode::EcLevel::L,
            ErrorCorrectionLevel::M => qrcode::EcLevel::M,
            ErrorCorrectionLevel::Q => qrcode::EcLevel::Q,
            ErrorCorrectionLevel::H => qrcode::EcLevel::H,
        }
    }
}

/// Encoder settings. `type_number` 0 means "smallest version that fits".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrEncodeOptions {
    pub type_number: u8,
    pub mode: String,
    pub error_correction_level: ErrorCorrectionLevel,
}

impl Default for QrEncodeOptions {
    fn default() -> Self {
        Self {
            type_number: 0,
            mode: "Byte".to_string(),
            error_correction_level: ErrorCorrectionLevel::Q,
        }
    }
}

/// Shape and paint for one element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementOptions<S> {
    #[serde(rename = "type")]
    pub shape: S,
    pub color: Color,
    #[serde(default)]
    pub gradient: Option<Gradient>,
}

impl<S: Copy> From<&StyleSpec<S>> for ElementOptions<S> {
    fn from(spec: &StyleSpec<S>) -> Self {
        Self {
            shape: spec.shape,
            color: spec.fill.color,
            gradient: Some(spec.fill.gradient),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackgroundOptions {
    pub color: Color,
}

/// Logo placement settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageOptions {
    pub hide_background_dots: bool,
    /// Logo edge as a fraction of the code's drawing area.
    pub image_size: f32,
    pub cross_origin: String,
    /// Gap around the logo, in pixels.
    pub margin: u32,
    #[serde(default)]
    pub remove_background: bool,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            hide_background_dots: true,
            image_size: 0.2,
            cross_origin: "anonymous".to_string(),
            margin: 0,
            remove_background: false,
        }
    }
}

/// Complete renderer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QrOptions {
    pub width: u32,
    pub height: u32,
    pub render_type: RenderType,
    pub data: String,
    pub margin: u32,
    #[serde(default)]
    pub qr_options: QrEncodeOptions,
    pub dot_options: ElementOptions<DotType>,
    pub corner_square_options: ElementOptions<CornerSquareType>,
    pub corner_dot_options: ElementOptions<CornerDotType>,
    pub background_options: BackgroundOptions,
    #[serde(default)]
    pub image_options: ImageOptions,
    /// Logo as a data URL; empty for none.
    #[serde(default)]
    pub image: String,
}

impl QrOptions {
    /// Build the renderer configuration for the current form state.
    pub fn from_form(form: &FormState) -> Self {
        Self {
            width: form.width,
            height: form.height,
            render_type: RenderType::Svg,
            data: form.content.clone(),
            margin: form.margin,
            qr_options: QrEncodeOptions::default(),
            dot_options: ElementOptions::from(&form.dots),
            corner_square_options: ElementOptions::from(&form.corner_square),
            corner_dot_options: ElementOptions::from(&form.corner_dot),
            background_options: BackgroundOptions {
                color: form.background,
            },
            image_options: ImageOptions {
                image_size: form.logo.size,
                remove_background: form.logo.remove_background,
                ..ImageOptions::default()
            },
            image: form.logo.url.clone(),
        }
    }

    /// Same options with a different output kind.
    pub fn with_render_type(mut self, render_type: RenderType) -> Self {
        self.render_type = render_type;
        self
    }

    pub fn has_logo(&self) -> bool {
        !self.image.is_empty()
    }
}

impl From<&FormState> for QrOptions {
    fn from(form: &FormState) -> Self {
        QrOptions::from_form(form)
    }
}

impl FromStr for RenderType {
    type Err = QrStyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "svg" => Ok(RenderType::Svg),
            "canvas" | "png" => Ok(RenderType::Canvas),
            other => Err(QrStyleError::InvalidOption(format!(
                "unknown render type '{}'",
                other
            ))),
        }
    }
}
