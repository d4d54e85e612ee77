//! Style catalog for the form's select and slider controls.

use axum::Json;
use serde::Serialize;

use crate::form::Slider;
use crate::render::FileExtension;
use crate::style::{CornerDotType, CornerSquareType, DotType, GradientType};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SliderCatalog {
    pub width: Slider,
    pub height: Slider,
    pub margin: Slider,
    pub logo_size: Slider,
    pub rotation: Slider,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleCatalog {
    pub dot_types: &'static [DotType],
    pub corner_square_types: &'static [CornerSquareType],
    pub corner_dot_types: &'static [CornerDotType],
    pub gradient_types: [GradientType; 2],
    pub download_formats: [FileExtension; 4],
    pub sliders: SliderCatalog,
}

/// GET /api/styles - Shape variants and slider bounds.
pub async fn catalog() -> Json<StyleCatalog> {
    Json(style_catalog())
}

pub fn style_catalog() -> StyleCatalog {
    StyleCatalog {
        dot_types: DotType::ALL,
        corner_square_types: CornerSquareType::ALL,
        corner_dot_types: CornerDotType::ALL,
        gradient_types: [GradientType::Linear, GradientType::Radial],
        download_formats: [
            FileExtension::Png,
            FileExtension::Jpeg,
            FileExtension::Webp,
            FileExtension::Svg,
        ],
        sliders: SliderCatalog {
            width: Slider::WIDTH,
            height: Slider::HEIGHT,
            margin: Slider::MARGIN,
            logo_size: Slider::LOGO_SIZE,
            rotation: Slider::ROTATION,
        },
    }
}
