use std::collections::BTreeSet;

use crate::animation::clock::{FrameRequest, FrameScheduler};

/// Hands out request ids and remembers which are still outstanding. The host decides when to
/// fire them.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    next: u64,
    outstanding: BTreeSet<FrameRequest>,
    cancelled: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outstanding(&self) -> impl Iterator<Item = FrameRequest> + '_ {
        self.outstanding.iter().copied()
    }

    /// Most recently requested frame that has not been fired or cancelled.
    pub fn latest(&self) -> Option<FrameRequest> {
        self.outstanding.last().copied()
    }

    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }

    /// Take the latest outstanding request for delivery.
    pub fn fire(&mut self) -> Option<FrameRequest> {
        self.outstanding.pop_last()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        self.next += 1;
        let request = FrameRequest(self.next);
        self.outstanding.insert(request);
        request
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        if self.outstanding.remove(&request) {
            self.cancelled += 1;
        }
    }
}

/// Offline scheduler: every fired request advances a synthetic clock by one frame at `fps`.
#[derive(Clone, Debug)]
pub struct FixedRateScheduler {
    fps: u32,
    frame: u64,
    inner: ManualScheduler,
}

impl FixedRateScheduler {
    pub fn new(fps: u32) -> Self {
        Self {
            fps: fps.max(1),
            frame: 0,
            inner: ManualScheduler::new(),
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Frames fired so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn frame_duration_ms(&self) -> f64 {
        1000.0 / f64::from(self.fps)
    }

    /// Timestamp the next fired frame will carry.
    pub fn now_ms(&self) -> f64 {
        self.frame as f64 * self.frame_duration_ms()
    }

    /// Deliver the pending request with its timestamp, if any.
    pub fn fire(&mut self) -> Option<(FrameRequest, f64)> {
        let request = self.inner.fire()?;
        let ts = self.now_ms();
        self.frame += 1;
        Some((request, ts))
    }
}

impl FrameScheduler for FixedRateScheduler {
    fn request_frame(&mut self) -> FrameRequest {
        self.inner.request_frame()
    }

    fn cancel_frame(&mut self, request: FrameRequest) {
        self.inner.cancel_frame(request);
    }
}
