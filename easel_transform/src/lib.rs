// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easel Transform: affine matrices and transform nodes.
//!
//! This crate provides the two value types every drawable in Easel is built on:
//! - [`Matrix`]: a mutable 2×3 affine matrix with composition, inversion, and
//!   scale/rotation decomposition.
//! - [`TransformNode`]: an owned [`Matrix`] plus memoized scale decomposition,
//!   with translate/rotate/scale helpers, including pivot-relative variants.
//!
//! Matrices are plain values. Composition always writes into a matrix owned by
//! the caller, so a shape's local transform and the scene's view transform are
//! never shared by reference.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Point;
//! use easel_transform::{Matrix, TransformNode};
//!
//! // A view scaled by a device pixel ratio of 2.
//! let mut view = TransformNode::new();
//! view.scale(2.0, 2.0);
//!
//! // A shape rotated a quarter turn about its own (10, 0).
//! let mut local = TransformNode::new();
//! local.rotate_at(90.0, Point::new(10.0, 0.0));
//!
//! let mut effective = Matrix::IDENTITY;
//! Matrix::compose_onto(&mut effective, view.matrix(), local.matrix());
//!
//! let p = effective.transform_point(Point::new(10.0, 0.0));
//! assert!((p.x - 20.0).abs() < 1e-9 && p.y.abs() < 1e-9);
//!
//! let inverse = effective.invert().unwrap();
//! let back = inverse.transform_point(p);
//! assert!((back.x - 10.0).abs() < 1e-9);
//! ```

#![no_std]

mod matrix;
mod node;

pub use matrix::Matrix;
pub use node::TransformNode;

/// Error returned when inverting a matrix whose determinant is zero.
///
/// Inversion never yields NaN or infinite coefficients. Callers that map
/// pointer positions through an inverse get this error instead.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
#[error("transform is not invertible (determinant {determinant})")]
pub struct DegenerateTransform {
    /// Determinant of the matrix that failed to invert.
    pub determinant: f64,
}
