// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easel Imaging Reference Surface.
//!
//! This crate provides [`RecordingSurface`], a small, stateful implementation
//! of [`Surface`] for **op recording and state tracing**.
//!
//! It is intentionally *not* a rasterizer:
//! - It does **not** produce pixels; read-back always yields transparent
//!   black.
//! - It is intended for tests and debugging that want to assert on emitted
//!   ops and the drawing state at the time each op is applied.

#![no_std]

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

use easel_imaging::{Affine, Brush, DrawOp, FillRule, StateOp, StrokeStyle, Surface};

/// Drawing state as the surface saw it at one point in the op stream.
#[derive(Clone, Debug)]
pub struct StateSnapshot {
    /// Transform in effect.
    pub transform: Affine,
    /// Brush in effect; `None` until the first [`StateOp::SetBrush`].
    pub brush: Option<Brush>,
    /// Stroke geometry in effect; `None` until the first [`StateOp::SetStroke`].
    pub stroke: Option<StrokeStyle>,
    /// Fill rule in effect.
    pub fill_rule: FillRule,
}

impl Default for StateSnapshot {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            brush: None,
            stroke: None,
            fill_rule: FillRule::NonZero,
        }
    }
}

/// One entry in the recording.
#[derive(Clone, Debug)]
pub enum Event {
    /// A state change.
    State {
        /// The op as received.
        op: StateOp,
        /// State once `op` took effect.
        state: StateSnapshot,
    },
    /// A draw.
    Draw {
        /// The op as received.
        op: DrawOp,
        /// State `op` was drawn under.
        state: StateSnapshot,
    },
}

/// Surface that records every op it receives.
#[derive(Debug)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    events: Vec<Event>,
    state: StateSnapshot,
    /// Number of [`DrawOp::Clear`] ops seen since creation.
    clears: usize,
}

impl RecordingSurface {
    /// Creates a recording surface reporting the given device size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            events: Vec::new(),
            state: StateSnapshot::default(),
            clears: 0,
        }
    }

    /// Everything recorded so far, oldest first.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Returns the draw ops paired with the state they were drawn under.
    pub fn draws(&self) -> impl Iterator<Item = (&DrawOp, &StateSnapshot)> + '_ {
        self.events.iter().filter_map(|event| match event {
            Event::Draw { op, state } => Some((op, state)),
            Event::State { .. } => None,
        })
    }

    /// Returns the current drawing state.
    pub fn state(&self) -> &StateSnapshot {
        &self.state
    }

    /// Number of clears since creation. Not reset by [`Self::forget`].
    pub fn clear_count(&self) -> usize {
        self.clears
    }

    /// Forgets the recording. The drawing state carries over.
    pub fn forget(&mut self) {
        self.events.clear();
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl Surface for RecordingSurface {
    fn state(&mut self, op: StateOp) {
        match &op {
            StateOp::SetTransform(xf) => self.state.transform = *xf,
            StateOp::SetBrush(brush) => self.state.brush = Some(brush.clone()),
            StateOp::SetStroke(style) => self.state.stroke = Some(style.clone()),
            StateOp::SetFillRule(rule) => self.state.fill_rule = *rule,
        }
        self.events.push(Event::State {
            op,
            state: self.state.clone(),
        });
    }

    fn draw(&mut self, op: DrawOp) {
        if matches!(op, DrawOp::Clear) {
            self.clears += 1;
        }
        self.events.push(Event::Draw {
            op,
            state: self.state.clone(),
        });
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn read_pixels(&mut self, _x: u32, _y: u32, width: u32, height: u32) -> Vec<u8> {
        vec![0; width as usize * height as usize * 4]
    }
}
