// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transform actions and the targets that apply them.

use easel_scene::Shape;
use easel_transform::TransformNode;
use kurbo::{Point, Vec2};

/// A transform intent produced by a gesture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformAction {
    /// Translation.
    Pan(PanAction),
    /// Scaling.
    Scale(ScaleAction),
}

/// Translation operations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PanAction {
    /// Translate by an offset in the target's own space.
    By(Vec2),
}

/// Scaling operations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScaleAction {
    /// Scale about an anchor in the target's own space.
    ByAbout {
        /// Scale factors for X and Y axes.
        scale: Vec2,
        /// Point kept fixed by the scale.
        anchor: Point,
    },
}

/// Something a [`TransformAction`] can be applied to.
///
/// The view applies every action to its matrix. A shape pans by moving its
/// position and scales through its local transform.
pub trait TransformTarget {
    /// Applies `action`.
    fn apply(&mut self, action: TransformAction);
}

impl TransformTarget for TransformNode {
    fn apply(&mut self, action: TransformAction) {
        match action {
            TransformAction::Pan(PanAction::By(v)) => {
                self.translate(v.x, v.y);
            }
            TransformAction::Scale(ScaleAction::ByAbout { scale, anchor }) => {
                self.scale_at(scale.x, scale.y, anchor);
            }
        }
    }
}

impl TransformTarget for Shape {
    fn apply(&mut self, action: TransformAction) {
        match action {
            TransformAction::Pan(PanAction::By(v)) => self.move_by(v),
            scale @ TransformAction::Scale(_) => self.transform_mut().apply(scale),
        }
    }
}
