// Copyright 2025 the Easel Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Display-frame scheduling and latest-wins coalescing.

/// Handle for a requested display frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u64);

/// Host primitive deferring work to the next display refresh.
///
/// When a requested frame fires, the host calls back into the owner of the
/// scheduler with its [`FrameId`]. A cancelled frame must never fire.
pub trait FrameScheduler {
    /// Requests a callback on the next frame.
    fn request_frame(&mut self) -> FrameId;

    /// Cancels a frame that has not fired yet.
    fn cancel_frame(&mut self, id: FrameId);
}

/// Keeps at most one frame pending: each request cancels the previous one.
#[derive(Clone, Debug, Default)]
pub struct FrameCoalescer {
    pending: Option<FrameId>,
}

impl FrameCoalescer {
    /// Cancels any pending frame and requests a fresh one.
    pub fn request(&mut self, scheduler: &mut dyn FrameScheduler) -> FrameId {
        if let Some(stale) = self.pending.take() {
            scheduler.cancel_frame(stale);
        }
        let id = scheduler.request_frame();
        self.pending = Some(id);
        id
    }

    /// Marks `id` as fired. Returns `true` if it was the pending frame.
    pub fn fire(&mut self, id: FrameId) -> bool {
        if self.pending == Some(id) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Cancels the pending frame, if any.
    pub fn cancel(&mut self, scheduler: &mut dyn FrameScheduler) {
        if let Some(stale) = self.pending.take() {
            scheduler.cancel_frame(stale);
        }
    }

    /// The pending frame.
    #[must_use]
    pub fn pending(&self) -> Option<FrameId> {
        self.pending
    }
}

/// Deterministic scheduler for tests and headless hosts.
///
/// Frames fire only when the host drains them with
/// [`ManualScheduler::take_due`].
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    next: u64,
    due: Vec<FrameId>,
    cancelled: Vec<FrameId>,
}

impl ManualScheduler {
    /// Scheduler with nothing pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames requested and not cancelled, oldest first.
    #[must_use]
    pub fn due(&self) -> &[FrameId] {
        &self.due
    }

    /// Every frame cancelled so far.
    #[must_use]
    pub fn cancelled(&self) -> &[FrameId] {
        &self.cancelled
    }

    /// Number of frames requested so far.
    #[must_use]
    pub fn requested(&self) -> u64 {
        self.next
    }

    /// Drains the frames due to fire.
    pub fn take_due(&mut self) -> Vec<FrameId> {
        core::mem::take(&mut self.due)
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameId {
        self.next += 1;
        let id = FrameId(self.next);
        self.due.push(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        if let Some(at) = self.due.iter().position(|due| *due == id) {
            self.due.remove(at);
            self.cancelled.push(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bursts_keep_only_the_latest_frame() {
        let mut scheduler = ManualScheduler::new();
        let mut frames = FrameCoalescer::default();
        let first = frames.request(&mut scheduler);
        let second = frames.request(&mut scheduler);
        let third = frames.request(&mut scheduler);

        assert_eq!(scheduler.due(), &[third]);
        assert_eq!(scheduler.cancelled(), &[first, second]);
        assert_eq!(scheduler.requested(), 3);

        assert!(!frames.fire(first), "a cancelled frame is stale");
        assert!(frames.fire(third));
        assert_eq!(frames.pending(), None);
    }

    #[test]
    fn cancel_clears_the_pending_frame() {
        let mut scheduler = ManualScheduler::new();
        let mut frames = FrameCoalescer::default();
        let id = frames.request(&mut scheduler);
        frames.cancel(&mut scheduler);
        assert!(scheduler.take_due().is_empty());
        assert_eq!(scheduler.cancelled(), &[id]);
        assert!(!frames.fire(id));
    }
}
