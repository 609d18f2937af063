// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shape geometry: the closed set of outlines a shape can have.
//!
//! Every variant is expressed in the shape's own space, with the shape's
//! position as origin. Geometry only builds outlines; painting and pick
//! silhouettes are driven from [`Shape`](crate::Shape).

use core::f64::consts::TAU;
use core::fmt;

use easel_transform::Matrix;
use kurbo::{Arc, BezPath, Point, Rect, RoundedRect, RoundedRectRadii, Shape as _, Size, Vec2};

use crate::GeometryError;
use crate::image::ImageShape;
use crate::text::TextShape;

/// Flattening tolerance used when converting Kurbo shapes to paths.
pub const PATH_TOLERANCE: f64 = 0.1;

/// Outline of a shape.
pub enum Geometry {
    /// Axis-aligned rectangle with its top-left corner at the origin.
    Rect(RectGeometry),
    /// Circular arc (or full circle) centered on the origin.
    Circle(ArcGeometry),
    /// Elliptical arc (or full ellipse) centered on the origin.
    Ellipse(ArcGeometry),
    /// Open polyline, always stroked.
    Polyline(Polyline),
    /// Polyline with triangular arrowheads.
    Arrow(Arrow),
    /// Arbitrary Bézier path, for example parsed from SVG path data.
    Path(BezPath),
    /// Bitmap drawn into a rectangle at the origin.
    Image(ImageShape),
    /// Caller-supplied outline.
    Custom(CustomPath),
    /// One line of glyph outlines.
    Text(TextShape),
}

impl fmt::Debug for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rect(r) => f.debug_tuple("Rect").field(r).finish(),
            Self::Circle(a) => f.debug_tuple("Circle").field(a).finish(),
            Self::Ellipse(a) => f.debug_tuple("Ellipse").field(a).finish(),
            Self::Polyline(l) => f.debug_tuple("Polyline").field(l).finish(),
            Self::Arrow(a) => f.debug_tuple("Arrow").field(a).finish(),
            Self::Path(p) => f.debug_tuple("Path").field(&p.elements().len()).finish(),
            Self::Image(i) => f.debug_tuple("Image").field(i).finish(),
            Self::Custom(_) => f.write_str("Custom"),
            Self::Text(t) => f.debug_tuple("Text").field(t).finish(),
        }
    }
}

/// Rectangle with optional rounded corners.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectGeometry {
    /// Width in own-space units.
    pub width: f64,
    /// Height in own-space units.
    pub height: f64,
    /// Corner radii, clockwise from the top-left corner.
    pub radii: Option<RoundedRectRadii>,
}

impl RectGeometry {
    pub(crate) fn path(&self) -> BezPath {
        let rect = Rect::new(0.0, 0.0, self.width, self.height);
        match self.radii {
            Some(radii) => RoundedRect::from_rect(rect, radii).to_path(PATH_TOLERANCE),
            None => rect.to_path(PATH_TOLERANCE),
        }
    }
}

/// Circular or elliptical arc centered on the origin.
///
/// Angles are in degrees and follow canvas `arc`/`ellipse` semantics: sweep
/// clockwise (in y-down space) from `start_angle` to `end_angle`, or the
/// other way round when `anticlockwise` is set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcGeometry {
    /// Horizontal and vertical radii.
    pub radii: Vec2,
    /// Rotation of the ellipse axes, in degrees.
    pub rotation: f64,
    /// Start angle in degrees.
    pub start_angle: f64,
    /// End angle in degrees.
    pub end_angle: f64,
    /// Sweep direction.
    pub anticlockwise: bool,
}

impl ArcGeometry {
    /// Full circle or ellipse with the given radii.
    #[must_use]
    pub fn full(radii: Vec2) -> Self {
        Self {
            radii,
            rotation: 0.0,
            start_angle: 0.0,
            end_angle: 360.0,
            anticlockwise: false,
        }
    }

    /// Signed sweep in radians.
    pub(crate) fn sweep(&self) -> f64 {
        let start = self.start_angle.to_radians();
        let end = self.end_angle.to_radians();
        if self.anticlockwise {
            let span = start - end;
            if span >= TAU { -TAU } else { -span.rem_euclid(TAU) }
        } else {
            let span = end - start;
            if span >= TAU { TAU } else { span.rem_euclid(TAU) }
        }
    }

    pub(crate) fn path(&self) -> BezPath {
        let arc = Arc::new(
            Point::ORIGIN,
            self.radii,
            self.start_angle.to_radians(),
            self.sweep(),
            self.rotation.to_radians(),
        );
        arc.to_path(PATH_TOLERANCE)
    }
}

/// Open polyline through points relative to the shape's position.
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    points: Vec<Point>,
}

impl Polyline {
    /// Builds a polyline from a flat `[x0, y0, x1, y1, ..]` list.
    ///
    /// Returns the first point (which becomes the shape's position) and the
    /// polyline with every point made relative to it.
    pub fn from_flat(coords: &[f64]) -> Result<(Point, Self), GeometryError> {
        let absolute = pairs(coords)?;
        let origin = absolute[0];
        let points = absolute.into_iter().map(|p| (p - origin).to_point()).collect();
        Ok((origin, Self { points }))
    }

    /// Extends the line with a flat coordinate list.
    ///
    /// `coords` are in the same space as the shape's position; `origin` is the
    /// shape's current position. On error the line is left unchanged.
    pub fn append(&mut self, coords: &[f64], origin: Point) -> Result<(), GeometryError> {
        let extra = pairs(coords)?;
        self.points
            .extend(extra.into_iter().map(|p| (p - origin).to_point()));
        Ok(())
    }

    /// Points relative to the shape's position.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub(crate) fn path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut points = self.points.iter();
        if let Some(first) = points.next() {
            path.move_to(*first);
            for p in points {
                path.line_to(*p);
            }
        }
        path
    }
}

fn pairs(coords: &[f64]) -> Result<Vec<Point>, GeometryError> {
    if coords.is_empty() {
        return Err(GeometryError::NoPoints);
    }
    if coords.len() % 2 != 0 {
        return Err(GeometryError::OddPointCount(coords.len()));
    }
    Ok(coords
        .chunks_exact(2)
        .map(|xy| Point::new(xy[0], xy[1]))
        .collect())
}

/// Size of a triangular arrowhead.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArrowHead {
    /// Width across the base of the triangle.
    pub width: f64,
    /// Length from base to tip.
    pub height: f64,
}

impl Default for ArrowHead {
    fn default() -> Self {
        Self {
            width: 10.0,
            height: 20.0,
        }
    }
}

/// Polyline with optional arrowheads at either end.
///
/// The tail is the last point, the head is the first. By default only the
/// tail carries an arrowhead.
#[derive(Clone, Debug, PartialEq)]
pub struct Arrow {
    /// Line the arrowheads sit on.
    pub line: Polyline,
    /// Arrowhead at the first point.
    pub head: Option<ArrowHead>,
    /// Arrowhead at the last point.
    pub tail: Option<ArrowHead>,
}

impl Arrow {
    /// Arrow along `line` with the default tail arrowhead.
    #[must_use]
    pub fn new(line: Polyline) -> Self {
        Self {
            line,
            head: None,
            tail: Some(ArrowHead::default()),
        }
    }

    /// Filled triangles for the enabled arrowheads.
    ///
    /// An arrow with fewer than two points has no direction and gets none.
    pub(crate) fn heads_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let points = self.line.points();
        if let [first, second, ..] = points
            && let Some(head) = self.head
        {
            push_arrowhead(&mut path, *first, *second, head);
        }
        if let [.., before, last] = points
            && let Some(tail) = self.tail
        {
            push_arrowhead(&mut path, *last, *before, tail);
        }
        path
    }
}

/// Appends a triangle with its tip on `tip`, pointing away from `from`.
fn push_arrowhead(path: &mut BezPath, tip: Point, from: Point, head: ArrowHead) {
    let dir = tip - from;
    let mut placement = Matrix::IDENTITY;
    placement
        .translate_by(tip.x, tip.y)
        .rotate_by_radians(dir.y.atan2(dir.x));
    let half = head.width / 2.0;
    path.move_to(placement.transform_point(Point::ORIGIN));
    path.line_to(placement.transform_point(Point::new(-head.height, -half)));
    path.line_to(placement.transform_point(Point::new(-head.height, half)));
    path.close_path();
}

/// Parses SVG path data into a path.
///
/// The whole string must be path data. Kurbo's parser stops quietly at the
/// first byte that cannot start a command or a number, so such bytes are
/// rejected before parsing.
pub fn parse_svg_path(data: &str) -> Result<BezPath, GeometryError> {
    if let Some((at, c)) = stray_path_char(data) {
        return Err(GeometryError::InvalidPathData(format!(
            "unexpected {c:?} at byte {at}"
        )));
    }
    BezPath::from_svg(data).map_err(|err| GeometryError::InvalidPathData(err.to_string()))
}

/// First character that cannot appear in SVG path data at its position.
fn stray_path_char(data: &str) -> Option<(usize, char)> {
    let mut prev = ' ';
    for (at, c) in data.char_indices() {
        let ok = match c {
            'M' | 'm' | 'L' | 'l' | 'H' | 'h' | 'V' | 'v' | 'C' | 'c' | 'S' | 's' | 'Q' | 'q'
            | 'T' | 't' | 'A' | 'a' | 'Z' | 'z' | 'e' | 'E' | '.' | '-' | ',' => true,
            // Only an exponent sign; a leading `+` ends kurbo's command loop.
            '+' => matches!(prev, 'e' | 'E'),
            c => c.is_ascii_digit() || matches!(c, ' ' | '\t' | '\n' | '\x0C' | '\r'),
        };
        if !ok {
            return Some((at, c));
        }
        prev = c;
    }
    None
}

type PathFn = Box<dyn Fn(&mut BezPath)>;

/// Caller-supplied outline built by closures.
///
/// `draw` builds the visible outline. `hit`, when present, builds the pick
/// silhouette instead, for shapes whose clickable area differs from what is
/// drawn.
pub struct CustomPath {
    draw: PathFn,
    hit: Option<PathFn>,
}

impl fmt::Debug for CustomPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomPath")
            .field("has_hit", &self.hit.is_some())
            .finish_non_exhaustive()
    }
}

impl CustomPath {
    /// Outline built by `draw`, also used for picking.
    pub fn new(draw: impl Fn(&mut BezPath) + 'static) -> Self {
        Self {
            draw: Box::new(draw),
            hit: None,
        }
    }

    /// Uses `hit` to build the pick silhouette.
    #[must_use]
    pub fn with_hit(mut self, hit: impl Fn(&mut BezPath) + 'static) -> Self {
        self.hit = Some(Box::new(hit));
        self
    }

    pub(crate) fn path(&self) -> BezPath {
        let mut path = BezPath::new();
        (self.draw)(&mut path);
        path
    }

    pub(crate) fn hit_path(&self) -> BezPath {
        match &self.hit {
            Some(hit) => {
                let mut path = BezPath::new();
                hit(&mut path);
                path
            }
            None => self.path(),
        }
    }
}

/// Axis-aligned rectangle of the given size at the origin.
pub(crate) fn origin_rect(size: Size) -> Rect {
    Rect::from_origin_size(Point::ORIGIN, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::PathEl;

    const EPS: f64 = 1e-9;

    #[test]
    fn polyline_is_relative_to_first_point() {
        let (origin, line) = Polyline::from_flat(&[10.0, 20.0, 30.0, 20.0, 30.0, 50.0]).unwrap();
        assert_eq!(origin, Point::new(10.0, 20.0));
        assert_eq!(
            line.points(),
            [Point::ORIGIN, Point::new(20.0, 0.0), Point::new(20.0, 30.0)]
        );
    }

    #[test]
    fn polyline_rejects_bad_point_lists() {
        assert_eq!(
            Polyline::from_flat(&[1.0, 2.0, 3.0]),
            Err(GeometryError::OddPointCount(3))
        );
        assert_eq!(Polyline::from_flat(&[]), Err(GeometryError::NoPoints));

        let (origin, mut line) = Polyline::from_flat(&[0.0, 0.0]).unwrap();
        assert_eq!(
            line.append(&[5.0], origin),
            Err(GeometryError::OddPointCount(1))
        );
        assert_eq!(line.points().len(), 1, "failed append leaves the line alone");

        line.append(&[5.0, 5.0, 6.0, 6.0], Point::new(1.0, 1.0)).unwrap();
        assert_eq!(line.points()[2], Point::new(5.0, 5.0));
    }

    #[test]
    fn arc_sweep_follows_canvas_rules() {
        let full = ArcGeometry::full(Vec2::new(5.0, 5.0));
        assert!((full.sweep() - TAU).abs() < EPS, "default is a full turn");

        let quarter = ArcGeometry {
            end_angle: 90.0,
            ..full
        };
        assert!((quarter.sweep() - TAU / 4.0).abs() < EPS);

        let back = ArcGeometry {
            end_angle: 90.0,
            anticlockwise: true,
            ..full
        };
        assert!(
            (back.sweep() + 3.0 * TAU / 4.0).abs() < EPS,
            "anticlockwise goes the long way, got {}",
            back.sweep()
        );

        let wrapped = ArcGeometry {
            start_angle: 270.0,
            end_angle: 0.0,
            ..full
        };
        assert!((wrapped.sweep() - TAU / 4.0).abs() < EPS);
    }

    #[test]
    fn tail_arrowhead_points_along_last_segment() {
        let (_, line) = Polyline::from_flat(&[0.0, 0.0, 100.0, 0.0]).unwrap();
        let arrow = Arrow::new(line);
        let els = arrow.heads_path().elements().to_vec();
        let PathEl::MoveTo(tip) = els[0] else {
            panic!("arrowhead should start at its tip");
        };
        let PathEl::LineTo(corner) = els[1] else {
            panic!("expected a line to the first base corner");
        };
        assert!((tip - Point::new(100.0, 0.0)).hypot() < EPS, "tip at {tip:?}");
        assert!(
            (corner - Point::new(80.0, -5.0)).hypot() < EPS,
            "base corner at {corner:?}"
        );
    }

    #[test]
    fn single_point_arrow_has_no_heads() {
        let (_, line) = Polyline::from_flat(&[3.0, 3.0]).unwrap();
        let mut arrow = Arrow::new(line);
        arrow.head = Some(ArrowHead::default());
        assert!(arrow.heads_path().elements().is_empty());
    }

    #[test]
    fn svg_path_data_is_validated() {
        let path = parse_svg_path("M0 0 L10 0 L10 10 Z").unwrap();
        assert_eq!(path.elements().len(), 4);
        assert!(matches!(
            parse_svg_path("M0 0 L10 0 @ 5"),
            Err(GeometryError::InvalidPathData(_))
        ));
    }

    #[test]
    fn trailing_junk_in_path_data_is_rejected() {
        for data in ["M0 0 L10 0 @ 5", "M0 0 L10 0 +5 5", "M0 0 L10 0 #", "M0 0 L1 1 \u{e9}"] {
            assert!(
                matches!(parse_svg_path(data), Err(GeometryError::InvalidPathData(_))),
                "{data:?} should not parse"
            );
        }
        let path = parse_svg_path("M1e+1,0 L-2.5e-1 .5 z").unwrap();
        assert_eq!(path.elements().len(), 3, "exponent signs and commas are path data");
        assert_eq!(path.elements()[0], kurbo::PathEl::MoveTo(Point::new(10.0, 0.0)));
    }

    #[test]
    fn custom_hit_path_falls_back_to_draw() {
        let custom = CustomPath::new(|p| {
            p.move_to((0.0, 0.0));
            p.line_to((1.0, 1.0));
        });
        assert_eq!(custom.hit_path().elements().len(), 2);

        let custom = custom.with_hit(|p| p.move_to((0.0, 0.0)));
        assert_eq!(custom.hit_path().elements().len(), 1);
        assert_eq!(custom.path().elements().len(), 2);
    }
}
