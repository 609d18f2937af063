// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stage configuration loaded from TOML.

use easel_gesture::GestureConfig;
use easel_scene::Style;
use kurbo::Stroke;
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Errors from loading or validating a [`StageConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The TOML text did not parse into a configuration.
    #[error("failed to parse stage config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is out of range.
    #[error("invalid stage config: {0}")]
    Invalid(String),
    /// A color string is not `#rrggbb` or `#rrggbbaa`.
    #[error("invalid color {0:?}")]
    Color(String),
}

/// Stage configuration.
///
/// Every field has a default, so an empty document is a valid configuration:
///
/// ```rust
/// use easel_stage::StageConfig;
///
/// let config = StageConfig::from_toml_str(
///     r##"
///     zoomable = true
///     device_pixel_ratio = 2.0
///
///     [style]
///     fill = "#336699"
///     "##,
/// )
/// .unwrap();
/// assert!(config.zoomable);
/// assert!(!config.draggable);
/// assert_eq!(config.device_size(), (600, 400));
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// A single pointer on empty space pans the view.
    pub draggable: bool,
    /// Two pointers pinch-zoom the view.
    pub zoomable: bool,
    /// Lowest zoom a pinch can reach.
    pub min_zoom: f64,
    /// Highest zoom a pinch can reach.
    pub max_zoom: f64,
    /// Device pixels per logical pixel.
    pub device_pixel_ratio: f64,
    /// Logical surface width.
    pub width: u16,
    /// Logical surface height.
    pub height: u16,
    /// Style for shapes that leave fields unset.
    pub style: StyleConfig,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            draggable: false,
            zoomable: false,
            min_zoom: 0.1,
            max_zoom: 10.0,
            device_pixel_ratio: 1.0,
            width: 300,
            height: 200,
            style: StyleConfig::default(),
        }
    }
}

/// Default shape style.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Stroke width.
    pub line_width: f64,
    /// Fill color.
    pub fill: String,
    /// Stroke color.
    pub stroke: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            line_width: 1.0,
            fill: "#000000".into(),
            stroke: "#000000".into(),
        }
    }
}

impl StageConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks ranges and colors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_zoom.is_finite() && self.min_zoom > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "min_zoom must be positive, got {}",
                self.min_zoom
            )));
        }
        if !(self.max_zoom.is_finite() && self.max_zoom >= self.min_zoom) {
            return Err(ConfigError::Invalid(format!(
                "max_zoom must be at least min_zoom ({}), got {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "device_pixel_ratio must be positive, got {}",
                self.device_pixel_ratio
            )));
        }
        if !(self.style.line_width.is_finite() && self.style.line_width >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "line_width must be non-negative, got {}",
                self.style.line_width
            )));
        }
        self.default_style().map(|_| ())
    }

    /// Surface size in device pixels.
    #[must_use]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "saturating cast of a rounded, validated size"
    )]
    pub fn device_size(&self) -> (u16, u16) {
        let scale = |logical: u16| (f64::from(logical) * self.device_pixel_ratio).round() as u16;
        (scale(self.width), scale(self.height))
    }

    /// Gesture settings derived from this configuration.
    #[must_use]
    pub fn gesture_config(&self) -> GestureConfig {
        GestureConfig {
            pan: self.draggable,
            zoom: self.zoomable,
            min_zoom: self.min_zoom,
            max_zoom: self.max_zoom,
            device_pixel_ratio: self.device_pixel_ratio,
        }
    }

    /// Scene default style.
    pub fn default_style(&self) -> Result<Style, ConfigError> {
        Ok(Style::canvas_defaults()
            .with_fill(parse_color(&self.style.fill)?)
            .with_stroke(parse_color(&self.style.stroke)?)
            .with_stroke_style(Stroke::new(self.style.line_width)))
    }
}

/// Parses `#rrggbb` or `#rrggbbaa`.
fn parse_color(text: &str) -> Result<Color, ConfigError> {
    let invalid = || ConfigError::Color(text.to_owned());
    let hex = text.trim().strip_prefix('#').ok_or_else(invalid)?;
    if !(hex.len() == 6 || hex.len() == 8) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let channel = |at: usize| u8::from_str_radix(&hex[at..at + 2], 16).map_err(|_| invalid());
    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
    Ok(Color::from_rgba8(channel(0)?, channel(2)?, channel(4)?, alpha))
}
