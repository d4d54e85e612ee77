//! # Form State Store
//!
//! Every parameter the designer form exposes, with one setter per field.
//!
//! Setters never derive or cross-check fields: width and height are
//! independent, and nothing is compared against QR capacity. The only
//! shaping a value gets is the clamp/snap of the slider that edits it
//! (see [`Slider`]). Each setter returns `true` when the stored value
//! actually changed, which is what the designer uses to decide whether to
//! rebuild the preview.
//!
//! ## Example
//!
//! ```
//! use qrstyle::form::{FormEdit, FormState};
//! use qrstyle::style::DotType;
//!
//! let mut form = FormState::default();
//! assert!(form.set_width(420));
//! assert!(form.apply(FormEdit::DotStyle(DotType::Rounded)));
//! assert!(!form.apply(FormEdit::DotStyle(DotType::Rounded)));
//! ```

pub mod fill;

pub use fill::{FillControl, FillTab};

use serde::{Deserialize, Serialize};

use crate::style::{Color, CornerDotType, CornerSquareType, DotType, Gradient};
use fill::replace;

/// Default content shown when the form opens.
pub const DEFAULT_CONTENT: &str = "https://example.com";

/// Bounds and step of a slider control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Slider {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Slider {
    pub const WIDTH: Slider = Slider::new(100.0, 500.0, 10.0);
    pub const HEIGHT: Slider = Slider::new(100.0, 500.0, 10.0);
    pub const MARGIN: Slider = Slider::new(0.0, 50.0, 1.0);
    pub const LOGO_SIZE: Slider = Slider::new(0.1, 0.5, 0.05);
    pub const ROTATION: Slider = Slider::new(0.0, 360.0, 1.0);

    pub const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    /// Clamp into range and snap to the nearest step.
    pub fn snap(&self, value: f64) -> f64 {
        let clamped = value.clamp(self.min, self.max);
        let steps = ((clamped - self.min) / self.step).round();
        let snapped = self.min + steps * self.step;
        // Round off float noise so 0.1 + 2 * 0.05 compares equal to 0.2
        let snapped = (snapped * 1e6).round() / 1e6;
        snapped.clamp(self.min, self.max)
    }

    fn snap_u32(&self, value: u32) -> u32 {
        self.snap(value as f64) as u32
    }
}

/// Shape plus fill for one element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StyleSpec<S> {
    pub shape: S,
    #[serde(flatten)]
    pub fill: FillControl,
}

impl<S: Default> Default for StyleSpec<S> {
    fn default() -> Self {
        Self {
            shape: S::default(),
            fill: FillControl::default(),
        }
    }
}

/// Logo overlay settings. An empty `url` disables the overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogoState {
    pub url: String,
    pub size: f32,
    pub remove_background: bool,
}

impl Default for LogoState {
    fn default() -> Self {
        Self {
            url: String::new(),
            size: 0.2,
            remove_background: false,
        }
    }
}

/// All form fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormState {
    pub content: String,
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub dots: StyleSpec<DotType>,
    pub corner_square: StyleSpec<CornerSquareType>,
    pub corner_dot: StyleSpec<CornerDotType>,
    pub background: Color,
    pub logo: LogoState,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            content: DEFAULT_CONTENT.to_string(),
            width: 300,
            height: 300,
            margin: 10,
            dots: StyleSpec::default(),
            corner_square: StyleSpec::default(),
            corner_dot: StyleSpec::default(),
            background: Color::WHITE,
            logo: LogoState::default(),
        }
    }
}

impl FormState {
    pub fn set_content(&mut self, content: impl Into<String>) -> bool {
        replace(&mut self.content, content.into())
    }

    pub fn set_width(&mut self, width: u32) -> bool {
        replace(&mut self.width, Slider::WIDTH.snap_u32(width))
    }

    pub fn set_height(&mut self, height: u32) -> bool {
        replace(&mut self.height, Slider::HEIGHT.snap_u32(height))
    }

    pub fn set_margin(&mut self, margin: u32) -> bool {
        replace(&mut self.margin, Slider::MARGIN.snap_u32(margin))
    }

    pub fn set_dot_style(&mut self, shape: DotType) -> bool {
        replace(&mut self.dots.shape, shape)
    }

    pub fn set_dot_color(&mut self, color: Color) -> bool {
        self.dots.fill.set_color(color)
    }

    pub fn set_dot_gradient(&mut self, gradient: Gradient) -> bool {
        self.dots.fill.set_gradient(snap_rotation(gradient))
    }

    pub fn set_corner_square_style(&mut self, shape: CornerSquareType) -> bool {
        replace(&mut self.corner_square.shape, shape)
    }

    pub fn set_corner_square_color(&mut self, color: Color) -> bool {
        self.corner_square.fill.set_color(color)
    }

    pub fn set_corner_square_gradient(&mut self, gradient: Gradient) -> bool {
        self.corner_square.fill.set_gradient(snap_rotation(gradient))
    }

    pub fn set_corner_dot_style(&mut self, shape: CornerDotType) -> bool {
        replace(&mut self.corner_dot.shape, shape)
    }

    pub fn set_corner_dot_color(&mut self, color: Color) -> bool {
        self.corner_dot.fill.set_color(color)
    }

    pub fn set_corner_dot_gradient(&mut self, gradient: Gradient) -> bool {
        self.corner_dot.fill.set_gradient(snap_rotation(gradient))
    }

    pub fn set_background_color(&mut self, color: Color) -> bool {
        replace(&mut self.background, color)
    }

    pub fn set_logo_url(&mut self, url: impl Into<String>) -> bool {
        replace(&mut self.logo.url, url.into())
    }

    pub fn set_logo_size(&mut self, size: f32) -> bool {
        replace(&mut self.logo.size, Slider::LOGO_SIZE.snap(size as f64) as f32)
    }

    pub fn set_logo_remove_background(&mut self, remove: bool) -> bool {
        replace(&mut self.logo.remove_background, remove)
    }

    /// Apply one edit, returning whether the field changed.
    pub fn apply(&mut self, edit: FormEdit) -> bool {
        match edit {
            FormEdit::Content(v) => self.set_content(v),
            FormEdit::Width(v) => self.set_width(v),
            FormEdit::Height(v) => self.set_height(v),
            FormEdit::Margin(v) => self.set_margin(v),
            FormEdit::DotStyle(v) => self.set_dot_style(v),
            FormEdit::DotColor(v) => self.set_dot_color(v),
            FormEdit::DotGradient(v) => self.set_dot_gradient(v),
            FormEdit::DotTab(v) => self.dots.fill.select_tab(v),
            FormEdit::CornerSquareStyle(v) => self.set_corner_square_style(v),
            FormEdit::CornerSquareColor(v) => self.set_corner_square_color(v),
            FormEdit::CornerSquareGradient(v) => self.set_corner_square_gradient(v),
            FormEdit::CornerSquareTab(v) => self.corner_square.fill.select_tab(v),
            FormEdit::CornerDotStyle(v) => self.set_corner_dot_style(v),
            FormEdit::CornerDotColor(v) => self.set_corner_dot_color(v),
            FormEdit::CornerDotGradient(v) => self.set_corner_dot_gradient(v),
            FormEdit::CornerDotTab(v) => self.corner_dot.fill.select_tab(v),
            FormEdit::BackgroundColor(v) => self.set_background_color(v),
            FormEdit::LogoUrl(v) => self.set_logo_url(v),
            FormEdit::LogoSize(v) => self.set_logo_size(v),
            FormEdit::LogoRemoveBackground(v) => self.set_logo_remove_background(v),
        }
    }
}

fn snap_rotation(gradient: Gradient) -> Gradient {
    let degrees = Slider::ROTATION.snap(gradient.rotation() as f64) as u16;
    gradient.with_rotation(degrees)
}

/// A single-field edit, as sent by the web form.
///
/// ```json
/// {"field": "dot_style", "value": "rounded"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum FormEdit {
    Content(String),
    Width(u32),
    Height(u32),
    Margin(u32),
    DotStyle(DotType),
    DotColor(Color),
    DotGradient(Gradient),
    DotTab(FillTab),
    CornerSquareStyle(CornerSquareType),
    CornerSquareColor(Color),
    CornerSquareGradient(Gradient),
    CornerSquareTab(FillTab),
    CornerDotStyle(CornerDotType),
    CornerDotColor(Color),
    CornerDotGradient(Gradient),
    CornerDotTab(FillTab),
    BackgroundColor(Color),
    LogoUrl(String),
    LogoSize(f32),
    LogoRemoveBackground(bool),
}

impl FormEdit {
    /// Whether this field feeds the renderer options.
    ///
    /// Tab selection is local to the color/gradient control and never
    /// causes a rebuild.
    pub fn affects_render(&self) -> bool {
        !matches!(
            self,
            FormEdit::DotTab(_) | FormEdit::CornerSquareTab(_) | FormEdit::CornerDotTab(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let form = FormState::default();
        assert_eq!(form.content, "https://example.com");
        assert_eq!((form.width, form.height, form.margin), (300, 300, 10));
        assert_eq!(form.dots.shape, DotType::Square);
        assert_eq!(form.background, Color::WHITE);
        assert!(form.logo.url.is_empty());
        assert_eq!(form.logo.size, 0.2);
        assert!(!form.logo.remove_background);
    }

    #[test]
    fn test_slider_snap() {
        assert_eq!(Slider::WIDTH.snap(305.0), 310.0);
        assert_eq!(Slider::WIDTH.snap(42.0), 100.0);
        assert_eq!(Slider::WIDTH.snap(9000.0), 500.0);
        assert_eq!(Slider::MARGIN.snap(51.0), 50.0);
        assert_eq!(Slider::LOGO_SIZE.snap(0.26), 0.25);
        assert_eq!(Slider::LOGO_SIZE.snap(0.0), 0.1);
    }

    #[test]
    fn test_setter_touches_one_field() {
        let mut form = FormState::default();
        let before = form.clone();
        assert!(form.set_height(120));

        assert_eq!(form.height, 120);
        assert_eq!(form.width, before.width);
        assert_eq!(form.margin, before.margin);
        assert_eq!(form.content, before.content);
    }

    #[test]
    fn test_no_cross_field_validation() {
        let mut form = FormState::default();
        form.set_width(100);
        form.set_height(500);
        form.set_margin(50);
        assert_eq!((form.width, form.height, form.margin), (100, 500, 50));
    }

    #[test]
    fn test_unchanged_value_reports_false() {
        let mut form = FormState::default();
        assert!(!form.set_width(300));
        assert!(!form.set_content("https://example.com"));
        assert!(!form.set_background_color(Color::WHITE));
    }

    #[test]
    fn test_edit_json() {
        let edit: FormEdit =
            serde_json::from_str(r#"{"field": "corner_square_style", "value": "extra-rounded"}"#)
                .unwrap();
        assert_eq!(edit, FormEdit::CornerSquareStyle(CornerSquareType::ExtraRounded));

        let mut form = FormState::default();
        assert!(form.apply(edit));
        assert_eq!(form.corner_square.shape, CornerSquareType::ExtraRounded);
    }

    #[test]
    fn test_edit_json_rejects_bad_color() {
        let result =
            serde_json::from_str::<FormEdit>(r#"{"field": "dot_color", "value": "red"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_tab_edits_do_not_affect_render() {
        assert!(!FormEdit::DotTab(FillTab::Gradient).affects_render());
        assert!(FormEdit::DotColor(Color::BLACK).affects_render());
        assert!(FormEdit::LogoRemoveBackground(true).affects_render());
    }

    #[test]
    fn test_state_json_flattens_fill() {
        let json = serde_json::to_value(FormState::default()).unwrap();
        assert_eq!(json["dots"]["shape"], "square");
        assert_eq!(json["dots"]["color"], "#000000");
        assert_eq!(json["dots"]["tab"], "color");
        assert_eq!(json["dots"]["gradient"]["colorStops"][1]["offset"], 1.0);
    }
}
