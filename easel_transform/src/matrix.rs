// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::{Mul, MulAssign};

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point, Vec2};

use crate::DegenerateTransform;

/// A 2×3 affine matrix.
///
/// Maps `(x, y)` to `(a·x + c·y + e, b·x + d·y + f)`. The coefficient order is
/// the same as [`Affine::as_coeffs`] and a canvas `setTransform` call.
///
/// Mutating operations post-compose, so `m.translate_by(..).scale_by(..)`
/// applies the scale in the local space of the translation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix {
    /// Horizontal scaling component.
    pub a: f64,
    /// Vertical skewing component.
    pub b: f64,
    /// Horizontal skewing component.
    pub c: f64,
    /// Vertical scaling component.
    pub d: f64,
    /// Horizontal translation.
    pub e: f64,
    /// Vertical translation.
    pub f: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    /// The identity matrix `(1, 0, 0, 1, 0, 0)`.
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);

    /// Creates a matrix from its six coefficients.
    #[must_use]
    pub const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    /// Creates a matrix from `[a, b, c, d, e, f]`.
    #[must_use]
    pub const fn from_coeffs(coeffs: [f64; 6]) -> Self {
        let [a, b, c, d, e, f] = coeffs;
        Self::new(a, b, c, d, e, f)
    }

    /// Returns `[a, b, c, d, e, f]`.
    #[must_use]
    pub const fn coeffs(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    /// Resets this matrix to the identity.
    pub fn set_identity(&mut self) -> &mut Self {
        *self = Self::IDENTITY;
        self
    }

    /// Overwrites all six coefficients.
    pub fn set(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> &mut Self {
        *self = Self::new(a, b, c, d, e, f);
        self
    }

    /// Post-composes a translation. The linear part is untouched.
    pub fn translate_by(&mut self, x: f64, y: f64) -> &mut Self {
        self.e += self.a * x + self.c * y;
        self.f += self.b * x + self.d * y;
        self
    }

    /// Post-composes a non-uniform scale.
    pub fn scale_by(&mut self, x: f64, y: f64) -> &mut Self {
        self.a *= x;
        self.b *= x;
        self.c *= y;
        self.d *= y;
        self
    }

    /// Post-composes a rotation given in degrees.
    pub fn rotate_by(&mut self, degrees: f64) -> &mut Self {
        self.rotate_by_radians(degrees.to_radians())
    }

    /// Post-composes a rotation given in radians.
    pub fn rotate_by_radians(&mut self, radians: f64) -> &mut Self {
        let (sin, cos) = (radians.sin(), radians.cos());
        let Self { a, b, c, d, .. } = *self;
        self.a = a * cos + c * sin;
        self.b = b * cos + d * sin;
        self.c = -a * sin + c * cos;
        self.d = -b * sin + d * cos;
        self
    }

    /// Writes `left · right` into `out`: the transform that applies `right`
    /// first and then `left`.
    ///
    /// Neither input is modified, and `out` may not alias either of them.
    pub fn compose_onto(out: &mut Self, left: &Self, right: &Self) {
        out.a = left.a * right.a + left.c * right.b;
        out.b = left.b * right.a + left.d * right.b;
        out.c = left.a * right.c + left.c * right.d;
        out.d = left.b * right.c + left.d * right.d;
        out.e = left.a * right.e + left.c * right.f + left.e;
        out.f = left.b * right.e + left.d * right.f + left.f;
    }

    /// Returns `a·d - b·c`.
    #[must_use]
    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// Returns the inverse of this matrix.
    ///
    /// Fails with [`DegenerateTransform`] when the determinant is zero (or not
    /// finite), instead of producing NaN or infinite coefficients.
    pub fn invert(&self) -> Result<Self, DegenerateTransform> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(DegenerateTransform { determinant: det });
        }
        let Self { a, b, c, d, e, f } = *self;
        Ok(Self::new(
            d / det,
            -b / det,
            -c / det,
            a / det,
            (c * f - d * e) / det,
            (b * e - a * f) / det,
        ))
    }

    /// Horizontal scale factor: `sign(a)·sqrt(a² + c²)`.
    ///
    /// A zero `a` counts as positive, so a quarter-turn rotation reports a
    /// positive scale instead of zero.
    #[must_use]
    pub fn scale_x(&self) -> f64 {
        sign(self.a) * (self.a * self.a + self.c * self.c).sqrt()
    }

    /// Vertical scale factor: `sign(d)·sqrt(b² + d²)`.
    #[must_use]
    pub fn scale_y(&self) -> f64 {
        sign(self.d) * (self.b * self.b + self.d * self.d).sqrt()
    }

    /// Rotation angle in radians.
    ///
    /// Uses `atan2(-c, a)` when `a` is non-zero and `atan2(b, d)` when only `d`
    /// is. Returns `None` when both are zero, since the angle is undefined
    /// for such a matrix.
    #[must_use]
    pub fn rotation(&self) -> Option<f64> {
        if self.a != 0.0 {
            Some((-self.c).atan2(self.a))
        } else if self.d != 0.0 {
            Some(self.b.atan2(self.d))
        } else {
            None
        }
    }

    /// Rotation angle in degrees. See [`Matrix::rotation`].
    #[must_use]
    pub fn rotation_degrees(&self) -> Option<f64> {
        self.rotation().map(f64::to_degrees)
    }

    /// Returns the translation `(e, f)`.
    #[must_use]
    pub fn translation(&self) -> Vec2 {
        Vec2::new(self.e, self.f)
    }

    /// Maps a point through the full affine map.
    #[must_use]
    pub fn transform_point(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Maps a vector through the linear part only.
    #[must_use]
    pub fn transform_vector(&self, v: Vec2) -> Vec2 {
        Vec2::new(self.a * v.x + self.c * v.y, self.b * v.x + self.d * v.y)
    }

    /// Returns `true` if every coefficient is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.coeffs().iter().all(|v| v.is_finite())
    }

    /// Converts to a Kurbo [`Affine`].
    #[must_use]
    pub fn to_affine(&self) -> Affine {
        Affine::new(self.coeffs())
    }
}

fn sign(v: f64) -> f64 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

impl From<Affine> for Matrix {
    fn from(affine: Affine) -> Self {
        Self::from_coeffs(affine.as_coeffs())
    }
}

impl From<Matrix> for Affine {
    fn from(m: Matrix) -> Self {
        m.to_affine()
    }
}

impl Mul for Matrix {
    type Output = Self;

    /// `self * rhs` applies `rhs` first and then `self`.
    fn mul(self, rhs: Self) -> Self {
        let mut out = Self::IDENTITY;
        Self::compose_onto(&mut out, &self, &rhs);
        out
    }
}

impl MulAssign for Matrix {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<Point> for Matrix {
    type Output = Point;

    fn mul(self, rhs: Point) -> Point {
        self.transform_point(rhs)
    }
}
