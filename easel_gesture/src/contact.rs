// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Point, Vec2};

/// Tracks one pointer contact across move events.
#[derive(Clone, Debug, Default)]
pub struct ContactTracker {
    /// Whether a contact is down.
    pub is_down: bool,
    /// Last recorded position.
    pub last_pos: Option<Point>,
}

impl ContactTracker {
    /// Starts tracking a contact at `pos`.
    pub fn start(&mut self, pos: Point) {
        self.is_down = true;
        self.last_pos = Some(pos);
    }

    /// Records `pos` and returns the movement since the last position.
    ///
    /// A contact with no recorded position (for example, the finger left over
    /// from a pinch) only records `pos` and yields `None`.
    pub fn update(&mut self, pos: Point) -> Option<Vec2> {
        let last = self.last_pos.replace(pos);
        self.is_down = true;
        last.map(|last| pos - last)
    }

    /// Forgets the contact.
    pub fn end(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deltas_are_relative_to_the_previous_position() {
        let mut contact = ContactTracker::default();
        contact.start(Point::new(10.0, 10.0));
        assert_eq!(contact.update(Point::new(12.0, 9.0)), Some(Vec2::new(2.0, -1.0)));
        assert_eq!(contact.update(Point::new(15.0, 9.0)), Some(Vec2::new(3.0, 0.0)));
        assert_eq!(contact.last_pos, Some(Point::new(15.0, 9.0)));
    }

    #[test]
    fn first_update_without_start_only_records() {
        let mut contact = ContactTracker::default();
        assert_eq!(contact.update(Point::new(1.0, 1.0)), None);
        assert_eq!(contact.update(Point::new(2.0, 1.0)), Some(Vec2::new(1.0, 0.0)));
        contact.end();
        assert!(!contact.is_down);
        assert_eq!(contact.last_pos, None);
    }
}
