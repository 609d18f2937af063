// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easel Scene: shapes, color keys and the z-ordered scene.
//!
//! A [`Scene`] owns an ordered collection of [`Shape`]s and a global view
//! transform. Every shape added to a scene receives a unique [`ShapeKey`], an
//! opaque RGB color used to paint the shape's silhouette on a hidden pick
//! surface. Reading one pixel back from that surface resolves which shape sits
//! under a point.
//!
//! - [`Scene::draw`] awaits pending images, sorts shapes by descending
//!   z-index and paints.
//! - [`Scene::paint`] repaints in the current order without sorting.
//! - [`Scene::paint_hit`] paints key-colored silhouettes for picking.
//!
//! ```rust
//! use easel_imaging_ref::RecordingSurface;
//! use easel_scene::{Scene, Shape};
//! use peniko::Color;
//!
//! let mut scene = Scene::new();
//! let key = scene
//!     .add(Shape::rect(20.0, 20.0).at(10.0, 10.0).filled(Color::BLACK))
//!     .unwrap();
//! assert_eq!(key.rgb(), [0, 0, 1]);
//!
//! let mut surface = RecordingSurface::new(100, 100);
//! scene.paint_hit(&mut surface);
//! assert_eq!(surface.draws().count(), 2); // clear + silhouette
//! ```
//!
//! Shapes never hold a reference to their scene; all mutation goes through
//! the scene by key.

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

mod geometry;
mod image;
mod key;
mod scene;
mod shape;
mod style;
mod text;

pub use geometry::{
    ArcGeometry, Arrow, ArrowHead, CustomPath, Geometry, PATH_TOLERANCE, Polyline, RectGeometry,
    parse_svg_path,
};
pub use image::{ImageFuture, ImageLoadError, ImageShape, ImageState};
pub use key::{KEY_CAPACITY, ShapeKey};
pub use scene::Scene;
pub use shape::{MIN_HIT_STROKE_WIDTH, Shape};
pub use style::{ShapeFlags, Style};
pub use text::{Font, TextAlign, TextBaseline, TextMetrics, TextShape};

/// Invalid shape geometry.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    /// A flat coordinate list had an odd number of values.
    #[error("point list has odd length {0}")]
    OddPointCount(usize),
    /// A flat coordinate list was empty.
    #[error("point list is empty")]
    NoPoints,
    /// SVG path data failed to parse.
    #[error("invalid path data: {0}")]
    InvalidPathData(String),
    /// Points were appended to a shape that is not a line.
    #[error("shape is not a polyline")]
    NotAPolyline,
    /// Font data failed to load or the size was unusable.
    #[error("invalid font: {0}")]
    InvalidFont(String),
}

/// Errors from scene management.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// Every pick color has been issued.
    #[error("all {KEY_CAPACITY} shape keys have been issued")]
    KeySpaceExhausted,
}
