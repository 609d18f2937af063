// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use easel_imaging::Surface;
use easel_pick::Picker;
use easel_scene::{Scene, ShapeKey};
use easel_transform::DegenerateTransform;
use kurbo::{Point, Rect, Vec2};

use crate::{ContactTracker, PanAction, ScaleAction, TransformAction, TransformTarget};

/// What gestures are allowed and how pointer input maps to the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureConfig {
    /// A single pointer on empty space (or a non-draggable shape) pans the view.
    pub pan: bool,
    /// Two pointers pinch-zoom the view.
    pub zoom: bool,
    /// Lowest view zoom (view scale divided by device pixel ratio).
    pub min_zoom: f64,
    /// Highest view zoom.
    pub max_zoom: f64,
    /// Device pixels per page unit.
    pub device_pixel_ratio: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pan: false,
            zoom: false,
            min_zoom: 0.1,
            max_zoom: 10.0,
            device_pixel_ratio: 1.0,
        }
    }
}

/// Gesture state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GestureState {
    /// No gesture in progress, or one pointer down that has not moved.
    #[default]
    Idle,
    /// One pointer moving the view.
    Panning,
    /// One pointer moving a draggable shape.
    Dragging(ShapeKey),
    /// Two pointers zooming the view about a pivot.
    Pinching,
}

/// Pointer gesture state machine over a [`Scene`].
///
/// Pointer positions are in page space. `bounds` is the surface's rectangle
/// in page space, used to map a page point into device pixels on the surface.
///
/// Methods that change what is visible return `true`; the caller then
/// schedules a coalesced repaint (see [`FrameCoalescer`](crate::FrameCoalescer)).
#[derive(Clone, Debug, Default)]
pub struct GestureController {
    config: GestureConfig,
    state: GestureState,
    contact: ContactTracker,
    pivot: Option<Point>,
    last_distance: Option<f64>,
}

impl GestureController {
    /// Idle controller with `config`.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Replaces the configuration.
    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Scene-space pinch pivot while pinching.
    #[must_use]
    pub fn pivot(&self) -> Option<Point> {
        self.pivot
    }

    /// Maps a page point to device pixels on the surface.
    #[must_use]
    pub fn page_to_surface(&self, page: Point, bounds: Rect) -> Point {
        ((page - bounds.origin()) * self.config.device_pixel_ratio).to_point()
    }

    /// Maps a surface point into scene space through the inverse view.
    pub fn surface_to_scene(
        &self,
        scene: &Scene,
        surface: Point,
    ) -> Result<Point, DegenerateTransform> {
        Ok(scene.view().invert()? * surface)
    }

    /// Handles contacts going down.
    ///
    /// One contact picks the shape under it; a draggable shape starts a drag.
    /// Two contacts on a zoomable scene record the scene-space midpoint as the
    /// pinch pivot.
    pub fn pointer_down<S: Surface>(
        &mut self,
        scene: &Scene,
        picker: &mut Picker<S>,
        bounds: Rect,
        touches: &[Point],
    ) -> GestureState {
        match *touches {
            [page] => {
                self.reset();
                self.contact.start(page);
                let hit = picker.pick(scene, self.page_to_surface(page, bounds));
                let draggable = hit.filter(|key| scene.get(*key).is_some_and(|s| s.is_draggable()));
                if let Some(key) = draggable {
                    self.set_state(GestureState::Dragging(key));
                }
            }
            [a, b, ..] if self.config.zoom => {
                let mid = self.page_to_surface(a.midpoint(b), bounds);
                match self.surface_to_scene(scene, mid) {
                    Ok(pivot) => {
                        self.contact.end();
                        self.pivot = Some(pivot);
                        self.last_distance = None;
                        self.set_state(GestureState::Pinching);
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "ignoring pinch on a degenerate view");
                    }
                }
            }
            _ => {}
        }
        self.state
    }

    /// Handles contacts moving. Returns `true` if the scene changed.
    pub fn pointer_move(&mut self, scene: &mut Scene, touches: &[Point]) -> bool {
        match *touches {
            [page] => self.drag_or_pan(scene, page),
            [a, b, ..] => self.pinch(scene, a, b),
            [] => false,
        }
    }

    /// Handles contacts lifting. Always returns to [`GestureState::Idle`].
    pub fn pointer_up(&mut self) {
        self.reset();
    }

    /// Handles the host cancelling the gesture. Always returns to
    /// [`GestureState::Idle`].
    pub fn pointer_cancel(&mut self) {
        self.reset();
    }

    /// Resolves a tap and runs the tapped shape's handler.
    pub fn tap<S: Surface>(
        &mut self,
        scene: &mut Scene,
        picker: &mut Picker<S>,
        bounds: Rect,
        page: Point,
    ) -> Option<ShapeKey> {
        let key = picker.pick(scene, self.page_to_surface(page, bounds))?;
        let handled = scene.tap(key);
        tracing::debug!(%key, handled, "tap");
        Some(key)
    }

    /// Clears all transient gesture state.
    pub fn reset(&mut self) {
        self.contact.end();
        self.pivot = None;
        self.last_distance = None;
        self.set_state(GestureState::Idle);
    }

    fn drag_or_pan(&mut self, scene: &mut Scene, page: Point) -> bool {
        let Some(delta) = self.contact.update(page) else {
            return false;
        };
        let dpr = self.config.device_pixel_ratio;
        let view = scene.view();
        let offset = Vec2::new(delta.x * dpr / view.scale_x(), delta.y * dpr / view.scale_y());
        if !offset.is_finite() {
            return false;
        }
        let pan = TransformAction::Pan(PanAction::By(offset));
        match self.state {
            GestureState::Dragging(key) => {
                if let Some(shape) = scene.get_mut(key) {
                    shape.apply(pan);
                    true
                } else {
                    self.reset();
                    false
                }
            }
            GestureState::Idle | GestureState::Panning if self.config.pan => {
                self.set_state(GestureState::Panning);
                scene.view_mut().apply(pan);
                true
            }
            _ => false,
        }
    }

    fn pinch(&mut self, scene: &mut Scene, a: Point, b: Point) -> bool {
        if self.state != GestureState::Pinching {
            return false;
        }
        let Some(pivot) = self.pivot else {
            return false;
        };
        let distance = (a.x - b.x).abs() + (a.y - b.y).abs();
        let Some(last) = self.last_distance.replace(distance).filter(|d| *d > 0.0) else {
            return false;
        };
        let step = self.clamp_step(scene.view().scale_x(), distance / last);
        if step == 1.0 {
            return false;
        }
        scene.view_mut().apply(TransformAction::Scale(ScaleAction::ByAbout {
            scale: Vec2::new(step, step),
            anchor: pivot,
        }));
        true
    }

    /// Limits `step` so the resulting zoom stays within the configured range.
    fn clamp_step(&self, view_scale: f64, step: f64) -> f64 {
        let zoom = view_scale.abs() / self.config.device_pixel_ratio;
        if !(zoom.is_finite() && zoom > 0.0 && step.is_finite()) {
            return 1.0;
        }
        let target = (zoom * step).clamp(self.config.min_zoom, self.config.max_zoom);
        target / zoom
    }

    fn set_state(&mut self, next: GestureState) {
        if self.state != next {
            tracing::debug!(from = ?self.state, to = ?next, "gesture state");
            self.state = next;
        }
    }
}
