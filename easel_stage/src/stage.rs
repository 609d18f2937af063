// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use easel_gesture::{FrameCoalescer, FrameId, FrameScheduler, GestureController, GestureState};
use easel_imaging::Surface;
use easel_pick::Picker;
use easel_scene::{Scene, SceneError, Shape, ShapeKey};
use kurbo::Point;

use crate::{BoundsQuery, ConfigError, StageConfig};

/// Handle for a running animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AnimationId(u64);

type AnimationStep = Box<dyn FnMut(&mut Scene)>;

struct Animation {
    id: AnimationId,
    frame: FrameId,
    step: AnimationStep,
}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("id", &self.id)
            .field("frame", &self.frame)
            .finish_non_exhaustive()
    }
}

/// A scene wired to a visible surface, a hidden hit surface, a frame
/// scheduler and a bounds query.
///
/// The host forwards pointer events in page space to the `touch_*` methods
/// and calls [`Stage::on_frame`] whenever a frame requested from the
/// scheduler fires.
#[derive(Debug)]
pub struct Stage<S, H, F, B> {
    config: StageConfig,
    scene: Scene,
    surface: S,
    picker: Picker<H>,
    scheduler: F,
    bounds: B,
    gestures: GestureController,
    frames: FrameCoalescer,
    animations: Vec<Animation>,
    next_animation: u64,
}

impl<S, H, F, B> Stage<S, H, F, B>
where
    S: Surface,
    H: Surface,
    F: FrameScheduler,
    B: BoundsQuery,
{
    /// Builds a stage from a validated configuration.
    ///
    /// Both surfaces should be [`StageConfig::device_size`] pixels.
    pub fn new(
        config: StageConfig,
        surface: S,
        hit_surface: H,
        scheduler: F,
        bounds: B,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut scene = Scene::new();
        scene.set_default_style(config.default_style()?);
        scene.reset_view(config.device_pixel_ratio);
        tracing::info!(
            width = surface.width(),
            height = surface.height(),
            dpr = config.device_pixel_ratio,
            draggable = config.draggable,
            zoomable = config.zoomable,
            "created stage"
        );
        Ok(Self {
            gestures: GestureController::new(config.gesture_config()),
            config,
            scene,
            surface,
            picker: Picker::new(hit_surface),
            scheduler,
            bounds,
            frames: FrameCoalescer::default(),
            animations: Vec::new(),
            next_animation: 0,
        })
    }

    /// Configuration the stage was built with.
    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    /// The scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// The scene, mutably. Changes show after the next [`Stage::update`].
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The visible surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The visible surface, mutably.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The hidden hit surface.
    pub fn hit_surface(&self) -> &H {
        self.picker.surface()
    }

    /// The frame scheduler.
    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    /// The frame scheduler, mutably.
    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }

    /// Current gesture state.
    pub fn gesture_state(&self) -> GestureState {
        self.gestures.state()
    }

    /// Adds a shape.
    pub fn add_shape(&mut self, shape: Shape) -> Result<ShapeKey, SceneError> {
        self.scene.add(shape)
    }

    /// Removes a shape.
    pub fn remove_shape(&mut self, key: ShapeKey) -> Option<Shape> {
        self.scene.remove(key)
    }

    /// Removes every shape.
    pub fn clear_shapes(&mut self) {
        self.scene.clear();
    }

    /// Full redraw: awaits pending images, sorts by z-index and paints.
    pub async fn draw(&mut self) {
        self.scene.draw(&mut self.surface).await;
        tracing::info!(shapes = self.scene.len(), "drew stage");
    }

    /// Light repaint in the current order.
    pub fn update(&mut self) {
        self.scene.paint(&mut self.surface);
    }

    /// Resets the view to the device pixel ratio scale.
    pub fn reset_transform(&mut self) {
        self.scene.reset_view(self.config.device_pixel_ratio);
    }

    /// Maps a page point into scene space, or `None` on a degenerate view.
    pub fn position_on_canvas(&self, page: Point) -> Option<Point> {
        let surface = self
            .gestures
            .page_to_surface(page, self.bounds.bounding_rect());
        match self.gestures.surface_to_scene(&self.scene, surface) {
            Ok(point) => Some(point),
            Err(err) => {
                tracing::warn!(error = %err, "cannot map pointer through the view");
                None
            }
        }
    }

    /// Contacts went down.
    pub fn touch_start(&mut self, touches: &[Point]) -> GestureState {
        let bounds = self.bounds.bounding_rect();
        self.gestures
            .pointer_down(&self.scene, &mut self.picker, bounds, touches)
    }

    /// Contacts moved. A visible change requests one coalesced frame.
    pub fn touch_move(&mut self, touches: &[Point]) {
        if self.gestures.pointer_move(&mut self.scene, touches) {
            self.frames.request(&mut self.scheduler);
        }
    }

    /// Contacts lifted.
    pub fn touch_end(&mut self) {
        self.gestures.pointer_up();
    }

    /// The host cancelled the gesture.
    pub fn touch_cancel(&mut self) {
        self.gestures.pointer_cancel();
    }

    /// Tap at a page point. Runs the tapped shape's handler.
    pub fn tap(&mut self, page: Point) -> Option<ShapeKey> {
        let bounds = self.bounds.bounding_rect();
        self.gestures
            .tap(&mut self.scene, &mut self.picker, bounds, page)
    }

    /// A requested frame fired. Returns `true` if the stage repainted.
    pub fn on_frame(&mut self, id: FrameId) -> bool {
        let mut repaint = self.frames.fire(id);
        for animation in self.animations.iter_mut().filter(|a| a.frame == id) {
            (animation.step)(&mut self.scene);
            animation.frame = self.scheduler.request_frame();
            repaint = true;
        }
        if repaint {
            self.update();
        }
        repaint
    }

    /// Runs `step` against the scene on every frame until stopped.
    pub fn animate(&mut self, step: impl FnMut(&mut Scene) + 'static) -> AnimationId {
        self.next_animation += 1;
        let id = AnimationId(self.next_animation);
        let frame = self.scheduler.request_frame();
        self.animations.push(Animation {
            id,
            frame,
            step: Box::new(step),
        });
        tracing::debug!(?id, "started animation");
        id
    }

    /// Stops an animation. Returns `false` if it was not running.
    pub fn stop_animation(&mut self, id: AnimationId) -> bool {
        let Some(at) = self.animations.iter().position(|a| a.id == id) else {
            return false;
        };
        let animation = self.animations.remove(at);
        self.scheduler.cancel_frame(animation.frame);
        tracing::debug!(?id, "stopped animation");
        true
    }

    /// Unwraps the visible surface.
    pub fn into_surface(self) -> S {
        self.surface
    }
}
