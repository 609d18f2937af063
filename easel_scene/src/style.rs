// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Paint style and per-shape flags.

use easel_imaging::FillRule;
use kurbo::Stroke;
use peniko::{Brush, Color};

bitflags::bitflags! {
    /// Shape flags controlling painting and interaction.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ShapeFlags: u8 {
        /// The outline is filled.
        const FILL      = 0b0000_0001;
        /// The outline is stroked.
        const STROKE    = 0b0000_0010;
        /// A single pointer pressed on the shape drags it instead of panning.
        const DRAGGABLE = 0b0000_0100;
    }
}

/// Visual style of a shape.
///
/// Unset fields fall back to the scene's default style. The pick pass never
/// reads the brushes; it only keeps the stroke geometry (width, joins, caps,
/// dashes) so a thick line is as easy to hit as it looks.
#[derive(Clone, Debug, Default)]
pub struct Style {
    /// Brush used for fills.
    pub fill: Option<Brush>,
    /// Brush used for strokes.
    pub stroke: Option<Brush>,
    /// Stroke geometry.
    pub stroke_style: Option<Stroke>,
    /// Rule deciding the inside of filled outlines.
    pub fill_rule: Option<FillRule>,
}

impl Style {
    /// Style with every field set to the canvas defaults: black fill, black
    /// one-unit stroke.
    #[must_use]
    pub fn canvas_defaults() -> Self {
        Self {
            fill: Some(Brush::Solid(Color::BLACK)),
            stroke: Some(Brush::Solid(Color::BLACK)),
            stroke_style: Some(Stroke::new(1.0)),
            fill_rule: Some(FillRule::NonZero),
        }
    }

    /// Sets the fill brush.
    #[must_use]
    pub fn with_fill(mut self, brush: impl Into<Brush>) -> Self {
        self.fill = Some(brush.into());
        self
    }

    /// Sets the stroke brush.
    #[must_use]
    pub fn with_stroke(mut self, brush: impl Into<Brush>) -> Self {
        self.stroke = Some(brush.into());
        self
    }

    /// Sets the stroke geometry.
    #[must_use]
    pub fn with_stroke_style(mut self, stroke: Stroke) -> Self {
        self.stroke_style = Some(stroke);
        self
    }

    /// Sets the fill rule.
    #[must_use]
    pub fn with_fill_rule(mut self, rule: FillRule) -> Self {
        self.fill_rule = Some(rule);
        self
    }

    pub(crate) fn fill_rule_or(&self, defaults: &Self) -> FillRule {
        self.fill_rule.or(defaults.fill_rule).unwrap_or_default()
    }

    pub(crate) fn fill_or(&self, defaults: &Self) -> Brush {
        self.fill
            .clone()
            .or_else(|| defaults.fill.clone())
            .unwrap_or(Brush::Solid(Color::BLACK))
    }

    pub(crate) fn stroke_or(&self, defaults: &Self) -> Brush {
        self.stroke
            .clone()
            .or_else(|| defaults.stroke.clone())
            .unwrap_or(Brush::Solid(Color::BLACK))
    }

    pub(crate) fn stroke_style_or(&self, defaults: &Self) -> Stroke {
        self.stroke_style
            .clone()
            .or_else(|| defaults.stroke_style.clone())
            .unwrap_or_else(|| Stroke::new(1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_fields_fall_back_to_defaults() {
        let red = Color::from_rgba8(255, 0, 0, 255);
        let defaults = Style::canvas_defaults().with_fill(red);
        let own = Style::default().with_stroke_style(Stroke::new(4.0));

        assert_eq!(own.fill_or(&defaults), Brush::Solid(red));
        assert_eq!(own.stroke_or(&defaults), Brush::Solid(Color::BLACK));
        assert_eq!(own.stroke_style_or(&defaults).width, 4.0);
        assert_eq!(Style::default().stroke_style_or(&Style::default()).width, 1.0);
    }

    #[test]
    fn fill_rule_falls_back_to_nonzero() {
        let even_odd = Style::default().with_fill_rule(FillRule::EvenOdd);
        assert_eq!(Style::default().fill_rule_or(&even_odd), FillRule::EvenOdd);
        assert_eq!(
            Style::default().fill_rule_or(&Style::default()),
            FillRule::NonZero
        );
        assert_eq!(
            even_odd.fill_rule_or(&Style::canvas_defaults()),
            FillRule::EvenOdd,
            "own rule wins"
        );
    }
}
