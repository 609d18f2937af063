// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shapes: geometry plus placement, style, flags and a tap callback.

use core::fmt;

use easel_imaging::{Surface, SurfaceExt};
use easel_transform::{Matrix, TransformNode};
use kurbo::{BezPath, Point, RoundedRectRadii, Stroke, Vec2};
use peniko::Brush;

use crate::geometry::{
    ArcGeometry, Arrow, CustomPath, Geometry, Polyline, RectGeometry, parse_svg_path,
};
use crate::image::ImageShape;
use crate::style::{ShapeFlags, Style};
use crate::text::TextShape;
use crate::{GeometryError, ShapeKey};

type TapHandler = Box<dyn FnMut(ShapeKey)>;

/// Narrowest pick stroke, in device pixels.
///
/// Key colors only resolve on fully covered pixels, and a thinner stroke
/// covers none.
pub const MIN_HIT_STROKE_WIDTH: f64 = 3.0;

/// A drawable entity owned by a [`Scene`](crate::Scene).
///
/// A shape is placed by its position `(x, y)` in the space of the scene's view
/// transform, plus its own [`TransformNode`] for rotation, scale and skew about
/// that position. Its effective transform is
/// `view · translate(x, y) · local`.
///
/// Shapes are built with the constructor for their geometry followed by the
/// builder methods:
///
/// ```rust
/// use easel_scene::Shape;
/// use peniko::Color;
///
/// let square = Shape::rect(20.0, 20.0)
///     .at(10.0, 10.0)
///     .filled(Color::from_rgba8(200, 40, 40, 255))
///     .draggable(true);
/// assert!(square.is_draggable());
/// ```
pub struct Shape {
    pub(crate) key: Option<ShapeKey>,
    z_index: i32,
    position: Point,
    transform: TransformNode,
    flags: ShapeFlags,
    style: Style,
    geometry: Geometry,
    on_tap: Option<TapHandler>,
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shape")
            .field("key", &self.key)
            .field("z_index", &self.z_index)
            .field("position", &self.position)
            .field("transform", self.transform.matrix())
            .field("flags", &self.flags)
            .field("style", &self.style)
            .field("geometry", &self.geometry)
            .field("on_tap", &self.on_tap.is_some())
            .finish()
    }
}

impl Shape {
    /// Shape with the given geometry, at the origin, with no flags set.
    #[must_use]
    pub fn new(geometry: Geometry) -> Self {
        Self {
            key: None,
            z_index: 0,
            position: Point::ORIGIN,
            transform: TransformNode::new(),
            flags: ShapeFlags::empty(),
            style: Style::default(),
            geometry,
            on_tap: None,
        }
    }

    /// Rectangle with its top-left corner at the shape's position.
    #[must_use]
    pub fn rect(width: f64, height: f64) -> Self {
        Self::new(Geometry::Rect(RectGeometry {
            width,
            height,
            radii: None,
        }))
    }

    /// Rectangle with rounded corners.
    ///
    /// `radii` is either a single radius or four, clockwise from top-left.
    #[must_use]
    pub fn rounded_rect(width: f64, height: f64, radii: impl Into<RoundedRectRadii>) -> Self {
        Self::new(Geometry::Rect(RectGeometry {
            width,
            height,
            radii: Some(radii.into()),
        }))
    }

    /// Full circle centered on the shape's position.
    #[must_use]
    pub fn circle(radius: f64) -> Self {
        Self::new(Geometry::Circle(ArcGeometry::full(Vec2::new(radius, radius))))
    }

    /// Circular arc from `start` to `end` degrees.
    #[must_use]
    pub fn arc(radius: f64, start: f64, end: f64, anticlockwise: bool) -> Self {
        Self::new(Geometry::Circle(ArcGeometry {
            start_angle: start,
            end_angle: end,
            anticlockwise,
            ..ArcGeometry::full(Vec2::new(radius, radius))
        }))
    }

    /// Full ellipse centered on the shape's position.
    #[must_use]
    pub fn ellipse(radius_x: f64, radius_y: f64) -> Self {
        Self::new(Geometry::Ellipse(ArcGeometry::full(Vec2::new(
            radius_x, radius_y,
        ))))
    }

    /// Stroked polyline through a flat `[x0, y0, x1, y1, ..]` list.
    ///
    /// The shape is positioned at the first point. Fails on an empty or
    /// odd-length list.
    pub fn polyline(coords: &[f64]) -> Result<Self, GeometryError> {
        let (origin, line) = Polyline::from_flat(coords)?;
        Ok(Self::new(Geometry::Polyline(line))
            .at(origin.x, origin.y)
            .with_flags(ShapeFlags::STROKE))
    }

    /// Polyline with an arrowhead at its last point.
    pub fn arrow(coords: &[f64]) -> Result<Self, GeometryError> {
        let (origin, line) = Polyline::from_flat(coords)?;
        Ok(Self::new(Geometry::Arrow(Arrow::new(line)))
            .at(origin.x, origin.y)
            .with_flags(ShapeFlags::STROKE))
    }

    /// Shape outlined by SVG path data.
    pub fn svg_path(data: &str) -> Result<Self, GeometryError> {
        Ok(Self::path(parse_svg_path(data)?))
    }

    /// Shape outlined by `path`.
    #[must_use]
    pub fn path(path: BezPath) -> Self {
        Self::new(Geometry::Path(path))
    }

    /// Image shape.
    #[must_use]
    pub fn image(image: ImageShape) -> Self {
        Self::new(Geometry::Image(image))
    }

    /// Shape with a caller-built outline.
    #[must_use]
    pub fn custom(path: CustomPath) -> Self {
        Self::new(Geometry::Custom(path))
    }

    /// Filled text anchored at the shape's position.
    #[must_use]
    pub fn text(text: TextShape) -> Self {
        Self::new(Geometry::Text(text)).with_flags(ShapeFlags::FILL)
    }

    /// Places the shape at `(x, y)`.
    #[must_use]
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Point::new(x, y);
        self
    }

    /// Sets the z-order rank.
    #[must_use]
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Adds `flags`.
    #[must_use]
    pub fn with_flags(mut self, flags: ShapeFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Fills the outline with `brush`.
    #[must_use]
    pub fn filled(mut self, brush: impl Into<Brush>) -> Self {
        self.style.fill = Some(brush.into());
        self.flags |= ShapeFlags::FILL;
        self
    }

    /// Strokes the outline with `brush` at `width`.
    #[must_use]
    pub fn stroked(mut self, brush: impl Into<Brush>, width: f64) -> Self {
        self.style.stroke = Some(brush.into());
        let stroke = self.style.stroke_style.take().unwrap_or_default();
        self.style.stroke_style = Some(Stroke { width, ..stroke });
        self.flags |= ShapeFlags::STROKE;
        self
    }

    /// Dashes the stroke with `pattern`, lengths alternating on and off.
    #[must_use]
    pub fn dashed(mut self, offset: f64, pattern: &[f64]) -> Self {
        let stroke = self.style.stroke_style.take().unwrap_or_default();
        self.style.stroke_style = Some(stroke.with_dashes(offset, pattern.iter().copied()));
        self
    }

    /// Replaces the style.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Lets a single pointer drag this shape.
    #[must_use]
    pub fn draggable(mut self, draggable: bool) -> Self {
        self.set_draggable(draggable);
        self
    }

    /// Rotates the local transform by `degrees`.
    #[must_use]
    pub fn rotated(mut self, degrees: f64) -> Self {
        self.transform.rotate(degrees);
        self
    }

    /// Translates the local transform.
    #[must_use]
    pub fn translated(mut self, x: f64, y: f64) -> Self {
        self.transform.translate(x, y);
        self
    }

    /// Calls `handler` with this shape's key when it is tapped.
    #[must_use]
    pub fn on_tap(mut self, handler: impl FnMut(ShapeKey) + 'static) -> Self {
        self.on_tap = Some(Box::new(handler));
        self
    }

    /// Key assigned when the shape was added to a scene.
    #[must_use]
    pub fn key(&self) -> Option<ShapeKey> {
        self.key
    }

    /// Z-order rank. Higher ranks paint first.
    #[must_use]
    pub fn z_index(&self) -> i32 {
        self.z_index
    }

    /// Changes the z-order rank; paint order follows at the next full draw.
    pub fn set_z_index(&mut self, z_index: i32) {
        self.z_index = z_index;
    }

    /// Position in view space.
    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Moves the shape to `position`.
    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// Moves the shape by `delta`.
    pub fn move_by(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Local transform.
    #[must_use]
    pub fn transform(&self) -> &TransformNode {
        &self.transform
    }

    /// Mutable local transform.
    pub fn transform_mut(&mut self) -> &mut TransformNode {
        &mut self.transform
    }

    /// Paint and interaction flags.
    #[must_use]
    pub fn flags(&self) -> ShapeFlags {
        self.flags
    }

    /// `true` if a single pointer drags this shape.
    #[must_use]
    pub fn is_draggable(&self) -> bool {
        self.flags.contains(ShapeFlags::DRAGGABLE)
    }

    /// Enables or disables dragging.
    pub fn set_draggable(&mut self, draggable: bool) {
        self.flags.set(ShapeFlags::DRAGGABLE, draggable);
    }

    /// Visual style.
    #[must_use]
    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Mutable visual style.
    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    /// Geometry.
    #[must_use]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Mutable geometry.
    pub fn geometry_mut(&mut self) -> &mut Geometry {
        &mut self.geometry
    }

    /// Extends a polyline or arrow with a flat coordinate list given in the
    /// same space as the shape's position.
    ///
    /// Rejected lists leave the shape unchanged.
    pub fn append_points(&mut self, coords: &[f64]) -> Result<(), GeometryError> {
        let origin = self.position;
        let key = self.key;
        let line = match &mut self.geometry {
            Geometry::Polyline(line) => line,
            Geometry::Arrow(arrow) => &mut arrow.line,
            _ => return Err(GeometryError::NotAPolyline),
        };
        line.append(coords, origin).inspect_err(|err| {
            tracing::warn!(?key, error = %err, "rejected polyline append");
        })
    }

    /// Invokes the tap handler, if any. Returns `true` if one ran.
    pub fn tap(&mut self) -> bool {
        match (self.key, self.on_tap.as_mut()) {
            (Some(key), Some(handler)) => {
                handler(key);
                true
            }
            _ => false,
        }
    }

    /// Effective transform under `ambient`: `ambient · translate(x, y) · local`.
    #[must_use]
    pub fn effective_transform(&self, ambient: &Matrix) -> Matrix {
        let mut placed = *ambient;
        placed.translate_by(self.position.x, self.position.y);
        let mut out = Matrix::IDENTITY;
        self.transform.compose_under(&placed, &mut out);
        out
    }

    pub(crate) fn image_mut(&mut self) -> Option<&mut ImageShape> {
        match &mut self.geometry {
            Geometry::Image(image) => Some(image),
            _ => None,
        }
    }

    /// Paints the shape with its style.
    pub(crate) fn paint<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        ambient: &Matrix,
        defaults: &Style,
    ) {
        surface.set_transform(self.effective_transform(ambient).to_affine());
        surface.set_fill_rule(self.style.fill_rule_or(defaults));
        let stroke_style = self.style.stroke_style_or(defaults);
        match &self.geometry {
            Geometry::Image(image) => {
                if let Some(op) = image.draw_op() {
                    surface.draw(op);
                }
            }
            Geometry::Text(text) => {
                if self.flags.contains(ShapeFlags::FILL) {
                    let brush = text.color.clone();
                    surface.set_brush(brush.unwrap_or_else(|| self.style.fill_or(defaults)));
                    surface.fill_path(text.outline().clone());
                }
                if self.flags.contains(ShapeFlags::STROKE) {
                    let brush = text.color.clone();
                    surface.set_brush(brush.unwrap_or_else(|| self.style.stroke_or(defaults)));
                    let style = match text.stroke_width {
                        Some(width) => Stroke {
                            width,
                            ..stroke_style.clone()
                        },
                        None => stroke_style.clone(),
                    };
                    stroke(surface, text.outline().clone(), &style);
                }
            }
            Geometry::Polyline(line) => {
                surface.set_brush(self.style.stroke_or(defaults));
                stroke(surface, line.path(), &stroke_style);
            }
            Geometry::Arrow(arrow) => {
                let brush = self.style.stroke_or(defaults);
                surface.set_brush(brush);
                stroke(surface, arrow.line.path(), &stroke_style);
                surface.fill_path(arrow.heads_path());
            }
            geometry => {
                let Some(path) = outline(geometry) else {
                    return;
                };
                if self.flags.contains(ShapeFlags::FILL) {
                    surface.set_brush(self.style.fill_or(defaults));
                    surface.fill_path(path.clone());
                }
                if self.flags.contains(ShapeFlags::STROKE) {
                    surface.set_brush(self.style.stroke_or(defaults));
                    stroke(surface, path, &stroke_style);
                }
            }
        }
    }

    /// Paints the pick silhouette in the shape's key color.
    ///
    /// Brushes from the style are ignored. Strokes keep their geometry but are
    /// at least [`MIN_HIT_STROKE_WIDTH`] device pixels wide.
    pub(crate) fn paint_hit<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        ambient: &Matrix,
        defaults: &Style,
    ) {
        let Some(key) = self.key else {
            return;
        };
        let transform = self.effective_transform(ambient);
        surface.set_transform(transform.to_affine());
        surface.set_fill_rule(self.style.fill_rule_or(defaults));
        surface.set_brush(key.color());
        let stroke_style = hit_stroke(self.style.stroke_style_or(defaults), &transform);
        match &self.geometry {
            Geometry::Image(image) => {
                if let Some(rect) = image.hit_rect() {
                    surface.draw(easel_imaging::DrawOp::FillRect(rect));
                }
            }
            Geometry::Text(text) => {
                let bounds = text.bounds();
                if !bounds.is_zero_area() {
                    surface.draw(easel_imaging::DrawOp::FillRect(bounds));
                }
            }
            Geometry::Polyline(line) => stroke(surface, line.path(), &stroke_style),
            Geometry::Arrow(arrow) => {
                stroke(surface, arrow.line.path(), &stroke_style);
                surface.fill_path(arrow.heads_path());
            }
            geometry => {
                let path = match geometry {
                    Geometry::Custom(custom) => custom.hit_path(),
                    other => match outline(other) {
                        Some(path) => path,
                        None => return,
                    },
                };
                if self.flags.contains(ShapeFlags::FILL) {
                    surface.fill_path(path.clone());
                }
                if self.flags.contains(ShapeFlags::STROKE) {
                    stroke(surface, path, &stroke_style);
                }
            }
        }
    }
}

/// Closed-outline geometries as a path.
fn outline(geometry: &Geometry) -> Option<BezPath> {
    match geometry {
        Geometry::Rect(rect) => Some(rect.path()),
        Geometry::Circle(arc) | Geometry::Ellipse(arc) => Some(arc.path()),
        Geometry::Path(path) => Some(path.clone()),
        Geometry::Custom(custom) => Some(custom.path()),
        Geometry::Polyline(_) | Geometry::Arrow(_) | Geometry::Image(_) | Geometry::Text(_) => {
            None
        }
    }
}

/// Widens `style` so it covers at least [`MIN_HIT_STROKE_WIDTH`] device pixels
/// along both axes of `transform`.
fn hit_stroke(style: Stroke, transform: &Matrix) -> Stroke {
    let scale = transform.scale_x().abs().min(transform.scale_y().abs());
    if !(scale.is_finite() && scale > 0.0) {
        return style;
    }
    let min_width = MIN_HIT_STROKE_WIDTH / scale;
    if style.width >= min_width {
        return style;
    }
    Stroke {
        width: min_width,
        ..style
    }
}

/// Strokes `path`, applying the dash pattern here since surfaces stroke solid.
fn stroke<S: Surface + ?Sized>(surface: &mut S, path: BezPath, style: &Stroke) {
    let mut solid = style.clone();
    let path = if style.dash_pattern.is_empty() {
        path
    } else {
        solid.dash_pattern.clear();
        kurbo::dash(path.iter(), style.dash_offset, &style.dash_pattern).collect()
    };
    surface.set_stroke(solid);
    surface.stroke_path(path);
}
