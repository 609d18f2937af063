// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text shapes: glyph outlines measured and laid out with Skrifa.
//!
//! Text becomes a path of glyph outlines in the shape's own space, so it
//! paints like any other outline. There is no shaping. Each character maps to
//! one glyph through the font's character map and glyphs advance by their
//! horizontal metrics. Characters the font does not cover are skipped.

use core::fmt;

use kurbo::{BezPath, Point, Rect, Vec2};
use peniko::{Blob, Brush, FontData};
use skrifa::instance::{LocationRef, Size};
use skrifa::metrics::GlyphMetrics;
use skrifa::outline::OutlinePen;
use skrifa::{FontRef, GlyphId, MetadataProvider as _};

use crate::GeometryError;

/// A font face at a pixel size.
#[derive(Clone)]
pub struct Font {
    data: FontData,
    size: f32,
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("bytes", &self.data.data.data().len())
            .field("index", &self.data.index)
            .field("size", &self.size)
            .finish()
    }
}

impl Font {
    /// Font from the bytes of a font file; `index` selects a face in a
    /// collection.
    ///
    /// Fails when the bytes are not a font or `size` is not a positive,
    /// finite pixel size.
    pub fn new(bytes: impl Into<Blob<u8>>, index: u32, size: f32) -> Result<Self, GeometryError> {
        let data = FontData::new(bytes.into(), index);
        FontRef::from_index(data.data.data(), index)
            .map_err(|err| GeometryError::InvalidFont(err.to_string()))?;
        Self { data, size: 0.0 }.with_size(size)
    }

    /// Same face at another pixel size.
    pub fn with_size(mut self, size: f32) -> Result<Self, GeometryError> {
        if !(size.is_finite() && size > 0.0) {
            return Err(GeometryError::InvalidFont(format!("font size {size}")));
        }
        self.size = size;
        Ok(self)
    }

    /// Pixel size.
    #[must_use]
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Measures `text` laid out on one line at this size.
    #[must_use]
    pub fn measure(&self, text: &str) -> TextMetrics {
        let Some(face) = self.face() else {
            return TextMetrics::default();
        };
        let size = Size::new(self.size);
        let line = face.metrics(size, LocationRef::default());
        let glyph_metrics = GlyphMetrics::new(&face, size, LocationRef::default());
        let (glyphs, width) = self.run(&face, &glyph_metrics, text);

        let mut ink: Option<Rect> = None;
        for (glyph, x) in glyphs {
            let Some(b) = glyph_metrics.bounds(glyph) else {
                continue;
            };
            if b.x_max <= b.x_min || b.y_max <= b.y_min {
                continue;
            }
            // Font units are y-up; shape space is y-down.
            let rect = Rect::new(
                x + f64::from(b.x_min),
                -f64::from(b.y_max),
                x + f64::from(b.x_max),
                -f64::from(b.y_min),
            );
            ink = Some(ink.map_or(rect, |ink| ink.union(rect)));
        }
        let ascent = f64::from(line.ascent);
        TextMetrics {
            width,
            ink: ink.unwrap_or(Rect::ZERO),
            ascent,
            descent: f64::from(line.descent).abs(),
            cap_height: line.cap_height.map_or(ascent, f64::from),
        }
    }

    /// Advance width of `text`.
    fn advance(&self, text: &str) -> f64 {
        let Some(face) = self.face() else {
            return 0.0;
        };
        let glyph_metrics = GlyphMetrics::new(&face, Size::new(self.size), LocationRef::default());
        self.run(&face, &glyph_metrics, text).1
    }

    /// Glyph outlines of `text` with the pen starting at `origin` on the
    /// alphabetic baseline.
    fn outline(&self, text: &str, origin: Vec2) -> BezPath {
        let mut path = BezPath::new();
        let Some(face) = self.face() else {
            return path;
        };
        let size = Size::new(self.size);
        let glyph_metrics = GlyphMetrics::new(&face, size, LocationRef::default());
        let outlines = face.outline_glyphs();
        for (glyph, x) in self.run(&face, &glyph_metrics, text).0 {
            let Some(outline) = outlines.get(glyph) else {
                continue;
            };
            let mut pen = PathPen {
                path: &mut path,
                origin: origin + Vec2::new(x, 0.0),
            };
            if let Err(err) = outline.draw(size, &mut pen) {
                tracing::debug!(?glyph, %err, "glyph outline skipped");
            }
        }
        path
    }

    /// Glyphs of `text` with their pen x positions, and the total advance.
    fn run(
        &self,
        face: &FontRef<'_>,
        glyph_metrics: &GlyphMetrics<'_>,
        text: &str,
    ) -> (Vec<(GlyphId, f64)>, f64) {
        let charmap = face.charmap();
        let mut x = 0.0;
        let glyphs = text
            .chars()
            .filter_map(|c| charmap.map(c))
            .map(|glyph| {
                let at = x;
                let advance = glyph_metrics
                    .advance_width(glyph)
                    .unwrap_or(self.size * 0.6);
                x += f64::from(advance);
                (glyph, at)
            })
            .collect();
        (glyphs, x)
    }

    fn face(&self) -> Option<FontRef<'_>> {
        FontRef::from_index(self.data.data.data(), self.data.index).ok()
    }
}

/// Pen writing a glyph outline into a path, flipped to y-down and shifted to
/// the glyph's pen position.
struct PathPen<'a> {
    path: &'a mut BezPath,
    origin: Vec2,
}

impl PathPen<'_> {
    fn point(&self, x: f32, y: f32) -> Point {
        Point::new(f64::from(x), -f64::from(y)) + self.origin
    }
}

impl OutlinePen for PathPen<'_> {
    fn move_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.path.move_to(p);
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let p = self.point(x, y);
        self.path.line_to(p);
    }

    fn quad_to(&mut self, cx0: f32, cy0: f32, x: f32, y: f32) {
        let (c, p) = (self.point(cx0, cy0), self.point(x, y));
        self.path.quad_to(c, p);
    }

    fn curve_to(&mut self, cx0: f32, cy0: f32, cx1: f32, cy1: f32, x: f32, y: f32) {
        let (c0, c1, p) = (
            self.point(cx0, cy0),
            self.point(cx1, cy1),
            self.point(x, y),
        );
        self.path.curve_to(c0, c1, p);
    }

    fn close(&mut self) {
        self.path.close_path();
    }
}

/// Measurements of one line of text.
///
/// Positions are relative to the pen origin on the alphabetic baseline, with
/// y pointing down.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextMetrics {
    /// Advance width.
    pub width: f64,
    /// Bounds of the inked glyph boxes. Zero when nothing is inked.
    pub ink: Rect,
    /// Font ascent above the baseline.
    pub ascent: f64,
    /// Font descent below the baseline, as a positive distance.
    pub descent: f64,
    /// Cap height, or the ascent when the font does not record one.
    pub cap_height: f64,
}

impl TextMetrics {
    /// Width of the inked area.
    #[must_use]
    pub fn actual_width(&self) -> f64 {
        self.ink.width()
    }

    /// Font height: ascent plus descent.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.ascent + self.descent
    }
}

/// Vertical anchor of text at its position, as in a 2D canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextBaseline {
    /// Top of the em box.
    Top,
    /// Hanging baseline, taken as the cap height.
    Hanging,
    /// Middle of the em box.
    Middle,
    /// Alphabetic baseline.
    #[default]
    Alphabetic,
    /// Ideographic baseline, taken as the bottom of the em box.
    Ideographic,
    /// Bottom of the em box.
    Bottom,
}

impl TextBaseline {
    /// Distance from the anchor down to the alphabetic baseline.
    fn drop(self, metrics: &TextMetrics) -> f64 {
        match self {
            Self::Top => metrics.ascent,
            Self::Hanging => metrics.cap_height,
            Self::Middle => (metrics.ascent - metrics.descent) / 2.0,
            Self::Alphabetic => 0.0,
            Self::Ideographic | Self::Bottom => -metrics.descent,
        }
    }
}

/// Horizontal anchor of text at its position. Text runs left to right, so
/// `Start` is `Left` and `End` is `Right`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    /// Text starts at the position.
    #[default]
    Start,
    /// Text ends at the position.
    End,
    /// Same as `Start`.
    Left,
    /// Same as `End`.
    Right,
    /// Text is centered on the position.
    Center,
}

impl TextAlign {
    fn shift(self, width: f64) -> f64 {
        match self {
            Self::Start | Self::Left => 0.0,
            Self::End | Self::Right => -width,
            Self::Center => -width / 2.0,
        }
    }
}

/// One line of text anchored at the shape's position.
///
/// When a maximum width is set and the inked text is wider, the displayed
/// text is the longest prefix that, followed by the overflow marker, still
/// advances no further than the maximum. Layout is redone by every setter.
#[derive(Clone)]
pub struct TextShape {
    text: String,
    font: Font,
    baseline: TextBaseline,
    align: TextAlign,
    max_width: Option<f64>,
    overflow: String,
    /// Brush used for both fill and stroke instead of the style's brushes.
    pub color: Option<Brush>,
    /// Stroke width used instead of the style's.
    pub stroke_width: Option<f64>,
    layout: Layout,
}

#[derive(Clone, Debug)]
struct Layout {
    display: String,
    metrics: TextMetrics,
    offset: Vec2,
    outline: BezPath,
}

impl fmt::Debug for TextShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextShape")
            .field("text", &self.text)
            .field("display", &self.layout.display)
            .field("font", &self.font)
            .field("baseline", &self.baseline)
            .field("align", &self.align)
            .field("max_width", &self.max_width)
            .finish_non_exhaustive()
    }
}

impl TextShape {
    /// `text` in `font`, start-aligned on the alphabetic baseline.
    pub fn new(text: impl Into<String>, font: Font) -> Self {
        let mut shape = Self {
            text: text.into(),
            font,
            baseline: TextBaseline::default(),
            align: TextAlign::default(),
            max_width: None,
            overflow: String::new(),
            color: None,
            stroke_width: None,
            layout: Layout {
                display: String::new(),
                metrics: TextMetrics::default(),
                offset: Vec2::ZERO,
                outline: BezPath::new(),
            },
        };
        shape.relayout();
        shape
    }

    /// Sets the vertical anchor.
    #[must_use]
    pub fn with_baseline(mut self, baseline: TextBaseline) -> Self {
        self.set_baseline(baseline);
        self
    }

    /// Sets the horizontal anchor.
    #[must_use]
    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.set_align(align);
        self
    }

    /// Truncates to `max_width`, ending with `overflow` when cut.
    #[must_use]
    pub fn with_max_width(mut self, max_width: f64, overflow: impl Into<String>) -> Self {
        self.max_width = Some(max_width);
        self.overflow = overflow.into();
        self.relayout();
        self
    }

    /// Sets the brush for fill and stroke.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<Brush>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Full text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the text.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.relayout();
    }

    /// Font.
    #[must_use]
    pub fn font(&self) -> &Font {
        &self.font
    }

    /// Replaces the font.
    pub fn set_font(&mut self, font: Font) {
        self.font = font;
        self.relayout();
    }

    /// Vertical anchor.
    #[must_use]
    pub fn baseline(&self) -> TextBaseline {
        self.baseline
    }

    /// Changes the vertical anchor.
    pub fn set_baseline(&mut self, baseline: TextBaseline) {
        self.baseline = baseline;
        self.relayout();
    }

    /// Horizontal anchor.
    #[must_use]
    pub fn align(&self) -> TextAlign {
        self.align
    }

    /// Changes the horizontal anchor.
    pub fn set_align(&mut self, align: TextAlign) {
        self.align = align;
        self.relayout();
    }

    /// Maximum inked width, if any.
    #[must_use]
    pub fn max_width(&self) -> Option<f64> {
        self.max_width
    }

    /// Changes the maximum width. `None` or a non-positive width shows the
    /// full text.
    pub fn set_max_width(&mut self, max_width: Option<f64>) {
        self.max_width = max_width;
        self.relayout();
    }

    /// Marker appended to truncated text.
    #[must_use]
    pub fn overflow(&self) -> &str {
        &self.overflow
    }

    /// Changes the overflow marker.
    pub fn set_overflow(&mut self, overflow: impl Into<String>) {
        self.overflow = overflow.into();
        self.relayout();
    }

    /// Text as painted, after truncation.
    #[must_use]
    pub fn display_text(&self) -> &str {
        &self.layout.display
    }

    /// Metrics of the displayed text.
    #[must_use]
    pub fn metrics(&self) -> &TextMetrics {
        &self.layout.metrics
    }

    /// Offset from the shape's position to the pen origin.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.layout.offset
    }

    /// Pick box: the inked width by the font height, anchored like the text.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        let Layout {
            metrics, offset, ..
        } = &self.layout;
        if metrics.ink.is_zero_area() {
            return Rect::ZERO;
        }
        Rect::new(
            offset.x + metrics.ink.x0,
            offset.y - metrics.ascent,
            offset.x + metrics.ink.x1,
            offset.y + metrics.descent,
        )
    }

    pub(crate) fn outline(&self) -> &BezPath {
        &self.layout.outline
    }

    fn relayout(&mut self) {
        let display = self.fit();
        let metrics = self.font.measure(&display);
        let offset = Vec2::new(
            self.align.shift(metrics.width),
            self.baseline.drop(&metrics),
        );
        let outline = self.font.outline(&display, offset);
        self.layout = Layout {
            display,
            metrics,
            offset,
            outline,
        };
    }

    fn fit(&self) -> String {
        let Some(max) = self.max_width.filter(|max| *max > 0.0) else {
            return self.text.clone();
        };
        if self.font.measure(&self.text).actual_width() <= max {
            return self.text.clone();
        }
        let chars: Vec<char> = self.text.chars().collect();
        let candidate = |len: usize| {
            let mut s: String = chars[..len].iter().collect();
            s.push_str(&self.overflow);
            s
        };
        let (mut lo, mut hi) = (0, chars.len());
        let mut best = String::new();
        while lo <= hi {
            let mid = (lo + hi) / 2;
            let s = candidate(mid);
            if self.font.advance(&s) <= max {
                best = s;
                lo = mid + 1;
            } else if mid == 0 {
                break;
            } else {
                hi = mid - 1;
            }
        }
        best
    }
}
