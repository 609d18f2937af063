// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::cell::Cell;

use kurbo::{Point, Vec2};

use crate::{DegenerateTransform, Matrix};

/// An owned [`Matrix`] with memoized scale decomposition.
///
/// Every shape and the scene's view carry one of these. The scale factors
/// returned by [`TransformNode::scale_x`] and [`TransformNode::scale_y`] are
/// computed lazily and cached until the linear part `(a, b, c, d)` changes.
/// Translation-only mutations keep the cache.
///
/// The matrix is only reachable through `&`; all mutation goes through the
/// methods below so the cache can never go stale.
#[derive(Clone, Debug, Default)]
pub struct TransformNode {
    matrix: Matrix,
    scale_x: Cell<Option<f64>>,
    scale_y: Cell<Option<f64>>,
}

impl TransformNode {
    /// Creates an identity node.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a node holding `matrix`.
    #[must_use]
    pub fn from_matrix(matrix: Matrix) -> Self {
        Self {
            matrix,
            ..Self::default()
        }
    }

    /// Returns the current matrix.
    #[must_use]
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Replaces the matrix.
    pub fn set_matrix(&mut self, matrix: Matrix) -> &mut Self {
        self.matrix = matrix;
        self.invalidate_scale();
        self
    }

    /// Resets the matrix to the identity.
    pub fn reset(&mut self) -> &mut Self {
        self.set_matrix(Matrix::IDENTITY)
    }

    /// Post-composes a translation.
    pub fn translate(&mut self, x: f64, y: f64) -> &mut Self {
        self.matrix.translate_by(x, y);
        self
    }

    /// Overwrites the translation `(e, f)`, leaving the linear part alone.
    pub fn set_translation(&mut self, translation: Vec2) -> &mut Self {
        self.matrix.e = translation.x;
        self.matrix.f = translation.y;
        self
    }

    /// Post-composes a non-uniform scale.
    pub fn scale(&mut self, x: f64, y: f64) -> &mut Self {
        self.matrix.scale_by(x, y);
        self.invalidate_scale();
        self
    }

    /// Post-composes a rotation in degrees.
    pub fn rotate(&mut self, degrees: f64) -> &mut Self {
        self.matrix.rotate_by(degrees);
        self.invalidate_scale();
        self
    }

    /// Post-composes a rotation in radians.
    pub fn rotate_radians(&mut self, radians: f64) -> &mut Self {
        self.matrix.rotate_by_radians(radians);
        self.invalidate_scale();
        self
    }

    /// Rotates by `degrees` about `pivot`, given in this node's local space.
    ///
    /// Equivalent to `translate(pivot)`, `rotate(degrees)`, `translate(-pivot)`,
    /// in that order.
    pub fn rotate_at(&mut self, degrees: f64, pivot: Point) -> &mut Self {
        self.translate(pivot.x, pivot.y);
        self.rotate(degrees);
        self.translate(-pivot.x, -pivot.y)
    }

    /// Scales by `(x, y)` about `pivot`, given in this node's local space.
    ///
    /// The pivot's image under the matrix is unchanged.
    pub fn scale_at(&mut self, x: f64, y: f64, pivot: Point) -> &mut Self {
        self.translate(pivot.x, pivot.y);
        self.scale(x, y);
        self.translate(-pivot.x, -pivot.y)
    }

    /// Memoized horizontal scale. See [`Matrix::scale_x`].
    #[must_use]
    pub fn scale_x(&self) -> f64 {
        if let Some(v) = self.scale_x.get() {
            return v;
        }
        let v = self.matrix.scale_x();
        self.scale_x.set(Some(v));
        v
    }

    /// Memoized vertical scale. See [`Matrix::scale_y`].
    #[must_use]
    pub fn scale_y(&self) -> f64 {
        if let Some(v) = self.scale_y.get() {
            return v;
        }
        let v = self.matrix.scale_y();
        self.scale_y.set(Some(v));
        v
    }

    /// Rotation in degrees, or `None` for a matrix with no defined angle.
    #[must_use]
    pub fn rotation_degrees(&self) -> Option<f64> {
        self.matrix.rotation_degrees()
    }

    /// Returns the translation `(e, f)`.
    #[must_use]
    pub fn translation(&self) -> Vec2 {
        self.matrix.translation()
    }

    /// Returns the inverse matrix.
    pub fn invert(&self) -> Result<Matrix, DegenerateTransform> {
        self.matrix.invert()
    }

    /// Writes `ambient · self` into `out`.
    ///
    /// This is how a child's effective transform is formed from the transform
    /// it is drawn under.
    pub fn compose_under(&self, ambient: &Matrix, out: &mut Matrix) {
        Matrix::compose_onto(out, ambient, &self.matrix);
    }

    fn invalidate_scale(&mut self) {
        self.scale_x.set(None);
        self.scale_y.set(None);
    }
}

impl From<Matrix> for TransformNode {
    fn from(matrix: Matrix) -> Self {
        Self::from_matrix(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn translation_keeps_cached_scale() {
        let mut node = TransformNode::new();
        node.scale(2.0, 3.0);
        assert_eq!(node.scale_x(), 2.0);
        assert_eq!(node.scale_y(), 3.0);

        node.translate(40.0, -8.0);
        assert_eq!(node.scale_x.get(), Some(2.0), "translate must keep cache");
        assert_eq!(node.scale_y.get(), Some(3.0), "translate must keep cache");

        node.set_translation(Vec2::new(1.0, 1.0));
        assert_eq!(node.scale_x.get(), Some(2.0), "set_translation keeps cache");
    }

    #[test]
    fn linear_mutations_invalidate_cache() {
        let mut node = TransformNode::new();
        let _ = node.scale_x();
        let _ = node.scale_y();

        node.scale(4.0, 0.5);
        assert_eq!(node.scale_x.get(), None, "scale invalidates");
        assert_eq!(node.scale_x(), 4.0);
        assert_eq!(node.scale_y(), 0.5);

        node.rotate(180.0);
        assert_eq!(node.scale_y.get(), None, "rotate invalidates");
        assert!((node.scale_x() + 4.0).abs() < EPS, "half turn flips sign");

        node.set_matrix(Matrix::new(7.0, 0.0, 0.0, 1.0, 0.0, 0.0));
        assert_eq!(node.scale_x(), 7.0, "set_matrix recomputes");

        node.reset();
        assert_eq!(node.scale_x(), 1.0, "reset recomputes");
    }

    #[test]
    fn scale_at_keeps_pivot_fixed() {
        let mut node = TransformNode::new();
        node.translate(30.0, -10.0).scale(2.0, 2.0);
        let pivot = Point::new(5.0, 7.0);
        let before = node.matrix().transform_point(pivot);

        node.scale_at(1.5, 1.5, pivot);

        let after = node.matrix().transform_point(pivot);
        assert!((before - after).hypot() < EPS, "pivot moved: {before:?} -> {after:?}");
        assert!((node.scale_x() - 3.0).abs() < EPS, "scale_x = {}", node.scale_x());
    }

    #[test]
    fn rotate_at_keeps_pivot_fixed() {
        let mut node = TransformNode::new();
        let pivot = Point::new(10.0, 10.0);
        node.rotate_at(90.0, pivot);

        let p = node.matrix().transform_point(pivot);
        assert!((p - pivot).hypot() < EPS, "pivot moved to {p:?}");

        let q = node.matrix().transform_point(Point::new(20.0, 10.0));
        assert!(
            (q - Point::new(10.0, 20.0)).hypot() < EPS,
            "quarter turn about pivot, got {q:?}"
        );
    }

    #[test]
    fn compose_under_applies_local_first() {
        let mut view = TransformNode::new();
        view.scale(2.0, 2.0);
        let mut local = TransformNode::new();
        local.translate(5.0, 0.0);

        let mut out = Matrix::IDENTITY;
        local.compose_under(view.matrix(), &mut out);
        assert_eq!(out.transform_point(Point::ORIGIN), Point::new(10.0, 0.0));
    }
}
