//! Color/gradient sub-control.
//!
//! The web form shows a "Color" tab and a "Gradient" tab for each element.
//! Both values live side by side: switching tabs never discards the other
//! one, and the options synthesizer passes both on to the renderer.

use serde::{Deserialize, Serialize};

use crate::style::{Color, Gradient, GradientType};

/// Which editor tab is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillTab {
    #[default]
    Color,
    Gradient,
}

/// A solid color and a gradient, plus the tab the user last selected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillControl {
    #[serde(default)]
    pub tab: FillTab,
    pub color: Color,
    pub gradient: Gradient,
}

impl Default for FillControl {
    fn default() -> Self {
        Self {
            tab: FillTab::Color,
            color: Color::BLACK,
            gradient: Gradient::default(),
        }
    }
}

impl FillControl {
    pub fn select_tab(&mut self, tab: FillTab) -> bool {
        replace(&mut self.tab, tab)
    }

    pub fn set_color(&mut self, color: Color) -> bool {
        replace(&mut self.color, color)
    }

    pub fn set_gradient(&mut self, gradient: Gradient) -> bool {
        replace(&mut self.gradient, gradient)
    }

    pub fn set_gradient_kind(&mut self, kind: GradientType) -> bool {
        let next = self.gradient.with_kind(kind);
        replace(&mut self.gradient, next)
    }

    pub fn set_gradient_rotation(&mut self, degrees: u16) -> bool {
        let next = self.gradient.with_rotation(degrees);
        replace(&mut self.gradient, next)
    }

    pub fn set_gradient_start(&mut self, color: Color) -> bool {
        let next = self.gradient.with_start_color(color);
        replace(&mut self.gradient, next)
    }

    pub fn set_gradient_end(&mut self, color: Color) -> bool {
        let next = self.gradient.with_end_color(color);
        replace(&mut self.gradient, next)
    }
}

/// Store `value` in `slot`, returning whether it differed.
pub(crate) fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}
