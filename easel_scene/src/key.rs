// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Color keys: the identity of a shape and its flat pick color.

use core::fmt;

use peniko::Color;

/// Number of distinct keys: every `(r, g, b)` with `b` in `1..=255`.
pub const KEY_CAPACITY: u32 = 256 * 256 * 255;

/// Identity of a shape inside a [`Scene`](crate::Scene).
///
/// A key is an opaque RGB triple with a non-zero blue channel. The same triple
/// is the flat color the shape's pick silhouette is drawn with, so a pixel
/// read back from the hit surface maps straight back to the shape.
///
/// Triples with `b == 0` are never issued; they stay free as the background
/// family.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeKey {
    r: u8,
    g: u8,
    b: u8,
}

impl ShapeKey {
    /// Returns the key for `(r, g, b)`, or `None` when `b` is zero.
    #[must_use]
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Option<Self> {
        (b != 0).then_some(Self { r, g, b })
    }

    /// Decodes a straight-alpha RGBA pixel read from a hit surface.
    ///
    /// Only fully opaque pixels decode. Partially covered edge pixels are a
    /// blend of two keys (or a key and the background) and would otherwise
    /// resolve to an unrelated shape.
    #[must_use]
    pub fn from_pixel([r, g, b, a]: [u8; 4]) -> Option<Self> {
        if a != u8::MAX {
            return None;
        }
        Self::from_rgb(r, g, b)
    }

    /// Returns `[r, g, b]`.
    #[must_use]
    pub fn rgb(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// The opaque pick color for this key.
    #[must_use]
    pub fn color(self) -> Color {
        Color::from_rgba8(self.r, self.g, self.b, u8::MAX)
    }
}

impl fmt::Display for ShapeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Hands out keys by walking the RGB cube in row-major `(r, g, b)` order,
/// blue fastest and starting at 1.
#[derive(Clone, Debug, Default)]
pub(crate) struct KeyGenerator {
    next: u32,
}

impl KeyGenerator {
    #[cfg(test)]
    pub(crate) fn starting_at(next: u32) -> Self {
        Self { next }
    }

    /// Returns the next unused key, or `None` once the space is spent.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "each channel is reduced below 256 before the cast"
    )]
    pub(crate) fn next_key(&mut self) -> Option<ShapeKey> {
        if self.next >= KEY_CAPACITY {
            return None;
        }
        let n = self.next;
        self.next += 1;
        Some(ShapeKey {
            r: (n / (256 * 255)) as u8,
            g: ((n / 255) % 256) as u8,
            b: (n % 255 + 1) as u8,
        })
    }

    /// Number of keys issued so far.
    pub(crate) fn issued(&self) -> u32 {
        self.next
    }
}
