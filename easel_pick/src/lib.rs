// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easel Pick: color-key hit testing.
//!
//! A [`Picker`] owns a hidden surface the size of the visible one. To find the
//! shape under a point it repaints every shape's silhouette in that shape's
//! unique key color (see [`Scene::paint_hit`]) and reads one pixel back.
//!
//! Picking is exact for any geometry the surface can rasterize, including
//! strokes, arcs and images, at the cost of one hit-surface repaint per query.
//! Only fully opaque pixels resolve, so anti-aliased silhouette edges and
//! translucent overlaps yield no shape.
//!
//! ```rust
//! use easel_imaging_vello_cpu::VelloCpuSurface;
//! use easel_pick::Picker;
//! use easel_scene::{Scene, Shape};
//! use kurbo::Point;
//! use peniko::Color;
//!
//! let mut scene = Scene::new();
//! let key = scene
//!     .add(Shape::rect(20.0, 20.0).at(10.0, 10.0).filled(Color::BLACK))
//!     .unwrap();
//!
//! let mut picker = Picker::new(VelloCpuSurface::new(64, 64));
//! assert_eq!(picker.pick(&scene, Point::new(15.0, 15.0)), Some(key));
//! assert_eq!(picker.pick(&scene, Point::new(50.0, 50.0)), None);
//! ```

use easel_imaging::{Surface, SurfaceExt};
use easel_scene::{Scene, ShapeKey};
use kurbo::Point;

/// Color-key picker over a hidden hit surface.
#[derive(Debug)]
pub struct Picker<S> {
    surface: S,
}

impl<S: Surface> Picker<S> {
    /// Picker painting into `surface`.
    pub fn new(surface: S) -> Self {
        Self { surface }
    }

    /// The hit surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The hit surface, mutably. Used to resize along with the visible surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Unwraps the hit surface.
    pub fn into_inner(self) -> S {
        self.surface
    }

    /// Repaints the silhouettes of `scene` on the hit surface.
    pub fn redraw(&mut self, scene: &Scene) {
        scene.paint_hit(&mut self.surface);
    }

    /// Shape under `point`, given in surface pixels.
    ///
    /// Always repaints the hit surface first so the answer reflects the
    /// current geometry and view.
    pub fn pick(&mut self, scene: &Scene, point: Point) -> Option<ShapeKey> {
        self.redraw(scene);
        self.sample(scene, point)
    }

    /// Shape under `point` on the hit surface as last painted.
    pub fn sample(&mut self, scene: &Scene, point: Point) -> Option<ShapeKey> {
        let (x, y) = pixel_at(point)?;
        let pixel = self.surface.read_pixel(x, y);
        let key = scene.resolve(pixel);
        tracing::debug!(x, y, ?pixel, ?key, "sampled hit surface");
        key
    }
}

/// Pixel containing `point`, or `None` if it lies above or left of the surface.
#[expect(
    clippy::cast_possible_truncation,
    reason = "floored and non-negative; far points saturate off-surface"
)]
fn pixel_at(point: Point) -> Option<(u32, u32)> {
    let x = point.x.floor();
    let y = point.y.floor();
    if !(x >= 0.0 && y >= 0.0) {
        return None;
    }
    Some((x as u32, y as u32))
}
