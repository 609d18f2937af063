// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easel Gesture: drag, pan and pinch zoom over a scene.
//!
//! [`GestureController`] is a small state machine:
//!
//! - **Idle**: nothing in progress.
//! - **Panning**: one pointer moving the view.
//! - **Dragging**: one pointer moving a draggable shape found by picking.
//! - **Pinching**: two pointers scaling the view about the scene-space
//!   midpoint recorded when they went down.
//!
//! Pointer deltas are scaled by the device pixel ratio and divided by the
//! view's current scale, so a dragged shape stays under the finger at any
//! zoom. Pinch steps compare the Manhattan distance between the two contacts
//! with the previous sample; the first sample is only a baseline. Lifting or
//! cancelling always returns to Idle.
//!
//! Moves are cheap; repaints are not. [`FrameCoalescer`] keeps at most one
//! frame pending on a [`FrameScheduler`], cancelling the previous request on
//! each new one.
//!
//! Transforms are expressed as [`TransformAction`]s applied to a
//! [`TransformTarget`]: the view's [`TransformNode`](easel_transform::TransformNode)
//! or a [`Shape`](easel_scene::Shape).

mod action;
mod contact;
mod controller;
mod frame;

pub use action::{PanAction, ScaleAction, TransformAction, TransformTarget};
pub use contact::ContactTracker;
pub use controller::{GestureConfig, GestureController, GestureState};
pub use frame::{FrameCoalescer, FrameId, FrameScheduler, ManualScheduler};
