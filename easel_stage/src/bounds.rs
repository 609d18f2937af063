// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Rect;

/// Where the visible surface sits on the page.
///
/// Pointer events arrive in page space; the stage subtracts the origin of
/// this rectangle and scales by the device pixel ratio to reach surface
/// pixels. Hosts answer from their cached layout.
pub trait BoundsQuery {
    /// Surface rectangle in page space.
    fn bounding_rect(&self) -> Rect;
}

impl BoundsQuery for Rect {
    fn bounding_rect(&self) -> Rect {
        *self
    }
}

impl<F: Fn() -> Rect> BoundsQuery for F {
    fn bounding_rect(&self) -> Rect {
        self()
    }
}
