// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easel Imaging: the drawing-surface contract.
//!
//! Easel renders into immediate-mode surfaces in the style of a 2D canvas
//! context. This crate defines that contract without committing to a
//! rasterizer:
//!
//! - [`StateOp`] mutates the current drawing state (transform, brush, stroke,
//!   fill rule).
//! - [`DrawOp`] produces pixels given the current state.
//! - [`Surface`] accepts both, reports its device size, and reads pixels
//!   back as straight-alpha RGBA bytes.
//! - [`SurfaceExt`] adds canvas-like convenience calls on top of any
//!   [`Surface`].
//!
//! Paths are carried inline as Kurbo [`BezPath`] values. There is no
//! resource table: a shape that wants to be drawn builds its path and hands
//! it over.
//!
//! Concrete surfaces live in sibling crates: `easel_imaging_ref` records
//! operations for tests, and `easel_imaging_vello_cpu` rasterizes with
//! `vello_cpu`.
//!
//! # Example
//!
//! ```rust
//! use easel_imaging::{DrawOp, StateOp, Surface, SurfaceExt};
//! use kurbo::{Affine, Rect, Shape};
//! use peniko::Color;
//!
//! /// Counts the ops it receives.
//! #[derive(Default)]
//! struct Tally {
//!     states: usize,
//!     draws: usize,
//! }
//!
//! impl Surface for Tally {
//!     fn state(&mut self, _op: StateOp) {
//!         self.states += 1;
//!     }
//!     fn draw(&mut self, _op: DrawOp) {
//!         self.draws += 1;
//!     }
//!     fn width(&self) -> u32 {
//!         64
//!     }
//!     fn height(&self) -> u32 {
//!         64
//!     }
//!     fn read_pixels(&mut self, _x: u32, _y: u32, w: u32, h: u32) -> Vec<u8> {
//!         vec![0; w as usize * h as usize * 4]
//!     }
//! }
//!
//! let mut surface = Tally::default();
//! surface.reset_transform();
//! surface.clear();
//! surface.set_transform(Affine::scale(2.0));
//! surface.set_brush(Color::from_rgba8(255, 0, 0, 255));
//! surface.fill_path(Rect::new(10.0, 10.0, 30.0, 30.0).to_path(0.1));
//! assert_eq!((surface.states, surface.draws), (3, 2));
//! assert_eq!(surface.read_pixel(40, 40), [0; 4]);
//! ```

#![no_std]

extern crate alloc;

use alloc::vec::Vec;

pub use kurbo::{Affine, BezPath, Rect};
pub use peniko::{Brush, Color, ImageData, ImageSampler};

/// Stroke parameters used by [`StateOp::SetStroke`].
pub type StrokeStyle = kurbo::Stroke;

/// Fill rule used to decide the inside of a path.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FillRule {
    /// Non-zero winding.
    #[default]
    NonZero,
    /// Even-odd parity.
    EvenOdd,
}

/// State operations that mutate the current drawing state.
#[derive(Clone, Debug)]
pub enum StateOp {
    /// Set the current transform matrix. This replaces the transform; it does
    /// not compose with the previous one.
    SetTransform(Affine),
    /// Set the brush used by subsequent fills and strokes.
    SetBrush(Brush),
    /// Set the current stroke style.
    SetStroke(StrokeStyle),
    /// Set the current fill rule used by [`DrawOp::FillPath`].
    ///
    /// The default fill rule is [`FillRule::NonZero`].
    SetFillRule(FillRule),
}

/// Draw operations that produce pixels given the current state.
#[derive(Clone, Debug)]
pub enum DrawOp {
    /// Clear the whole surface to transparent black, ignoring the transform.
    Clear,
    /// Fill the given path with the current brush.
    FillPath(BezPath),
    /// Stroke the given path with the current stroke and brush.
    StrokePath(BezPath),
    /// Fill an axis-aligned rectangle (in user space) with the current brush.
    FillRect(Rect),
    /// Draw an image (or the `src` sub-rectangle of it) into `dst`.
    DrawImageRect {
        /// Image pixels.
        image: ImageData,
        /// Source rectangle in image pixels; `None` means the whole image.
        src: Option<Rect>,
        /// Destination rectangle in user space.
        dst: Rect,
        /// Sampler used when scaling the image.
        sampler: ImageSampler,
    },
}

/// An immediate-mode drawing surface.
///
/// Surfaces are single-owner and single-threaded; nothing here is `Sync`.
pub trait Surface {
    /// Apply a state operation.
    fn state(&mut self, op: StateOp);

    /// Apply a draw operation.
    fn draw(&mut self, op: DrawOp);

    /// Width of the surface in device pixels.
    fn width(&self) -> u32;

    /// Height of the surface in device pixels.
    fn height(&self) -> u32;

    /// Read back a `width` × `height` block of pixels starting at `(x, y)`.
    ///
    /// Returns straight (not premultiplied) RGBA8 bytes in row-major order.
    /// Pixels outside the surface read as `[0, 0, 0, 0]`, so the result
    /// always holds `width * height * 4` bytes.
    fn read_pixels(&mut self, x: u32, y: u32, width: u32, height: u32) -> Vec<u8>;
}

/// Canvas-style convenience calls for any [`Surface`].
pub trait SurfaceExt: Surface {
    /// Replace the current transform.
    #[inline]
    fn set_transform(&mut self, transform: Affine) {
        self.state(StateOp::SetTransform(transform));
    }

    /// Reset the current transform to the identity.
    #[inline]
    fn reset_transform(&mut self) {
        self.state(StateOp::SetTransform(Affine::IDENTITY));
    }

    /// Set the brush for subsequent fills and strokes.
    #[inline]
    fn set_brush(&mut self, brush: impl Into<Brush>) {
        self.state(StateOp::SetBrush(brush.into()));
    }

    /// Set the stroke style.
    #[inline]
    fn set_stroke(&mut self, stroke: StrokeStyle) {
        self.state(StateOp::SetStroke(stroke));
    }

    /// Set the fill rule for subsequent fills.
    #[inline]
    fn set_fill_rule(&mut self, rule: FillRule) {
        self.state(StateOp::SetFillRule(rule));
    }

    /// Clear the surface.
    #[inline]
    fn clear(&mut self) {
        self.draw(DrawOp::Clear);
    }

    /// Fill `path` with the current brush.
    #[inline]
    fn fill_path(&mut self, path: BezPath) {
        self.draw(DrawOp::FillPath(path));
    }

    /// Stroke `path` with the current brush and stroke.
    #[inline]
    fn stroke_path(&mut self, path: BezPath) {
        self.draw(DrawOp::StrokePath(path));
    }

    /// Read a single pixel as straight RGBA8.
    fn read_pixel(&mut self, x: u32, y: u32) -> [u8; 4] {
        let bytes = self.read_pixels(x, y, 1, 1);
        match bytes.as_slice() {
            [r, g, b, a, ..] => [*r, *g, *b, *a],
            _ => [0; 4],
        }
    }
}

impl<S: Surface + ?Sized> SurfaceExt for S {}
