// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easel Stage: the wiring layer.
//!
//! A [`Stage`] owns a [`Scene`](easel_scene::Scene), a visible surface, a
//! hidden hit surface for picking, a [`FrameScheduler`](easel_gesture::FrameScheduler)
//! and a [`BoundsQuery`], and routes page-space pointer events through the
//! gesture controller.
//!
//! ```rust
//! use easel_gesture::ManualScheduler;
//! use easel_imaging_ref::RecordingSurface;
//! use easel_scene::Shape;
//! use easel_stage::{Stage, StageConfig};
//! use kurbo::{Point, Rect};
//!
//! let config = StageConfig::from_toml_str("draggable = true").unwrap();
//! let (w, h) = config.device_size();
//! let mut stage = Stage::new(
//!     config,
//!     RecordingSurface::new(w.into(), h.into()),
//!     RecordingSurface::new(w.into(), h.into()),
//!     ManualScheduler::new(),
//!     Rect::new(0.0, 0.0, 300.0, 200.0),
//! )
//! .unwrap();
//!
//! stage.add_shape(Shape::rect(20.0, 20.0)).unwrap();
//! pollster::block_on(stage.draw());
//!
//! stage.touch_start(&[Point::new(100.0, 100.0)]);
//! stage.touch_move(&[Point::new(110.0, 100.0)]);
//! stage.touch_end();
//! for frame in stage.scheduler_mut().take_due() {
//!     stage.on_frame(frame);
//! }
//! assert_eq!(stage.position_on_canvas(Point::new(10.0, 0.0)), Some(Point::ORIGIN));
//! ```

mod bounds;
mod config;
mod stage;

pub use bounds::BoundsQuery;
pub use config::{ConfigError, StageConfig, StyleConfig};
pub use stage::{AnimationId, Stage};
