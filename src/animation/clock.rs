use crate::params::store::ParamStore;

/// Handle for one requested frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameRequest(pub u64);

/// Host-side frame callback source (a display refresh, a timer, a test harness).
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameRequest;
    fn cancel_frame(&mut self, request: FrameRequest);
}

/// What the clock drives on each frame.
pub trait FrameTarget {
    fn params_mut(&mut self) -> &mut ParamStore;
    fn render(&mut self);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClockState {
    #[default]
    Idle,
    Running,
}

/// Advances parameters by their velocities once per frame while running.
#[derive(Clone, Debug, Default)]
pub struct AnimationClock {
    state: ClockState,
    pending: Option<FrameRequest>,
    last_timestamp_ms: Option<f64>,
    frames: u64,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    pub fn pending(&self) -> Option<FrameRequest> {
        self.pending
    }

    /// Frames processed since construction.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Label for the play control: what pressing it would do.
    pub fn play_label(&self) -> &'static str {
        match self.state {
            ClockState::Idle => "Play",
            ClockState::Running => "Pause",
        }
    }

    pub fn start(&mut self, scheduler: &mut impl FrameScheduler) {
        if self.is_running() {
            return;
        }
        self.state = ClockState::Running;
        self.last_timestamp_ms = None;
        self.pending = Some(scheduler.request_frame());
        tracing::debug!("animation started");
    }

    /// Idempotent. Cancels the outstanding frame request.
    pub fn stop(&mut self, scheduler: &mut impl FrameScheduler) {
        if let Some(request) = self.pending.take() {
            scheduler.cancel_frame(request);
        }
        if self.is_running() {
            self.state = ClockState::Idle;
            tracing::debug!(frames = self.frames, "animation stopped");
        }
        self.last_timestamp_ms = None;
    }

    pub fn toggle(&mut self, scheduler: &mut impl FrameScheduler) -> ClockState {
        match self.state {
            ClockState::Idle => self.start(scheduler),
            ClockState::Running => self.stop(scheduler),
        }
        self.state
    }

    /// Frame callback. Returns whether the frame was processed.
    ///
    /// Callbacks for a request that is no longer pending (cancelled or superseded) are ignored.
    /// The first frame after starting has zero elapsed time.
    pub fn on_frame(
        &mut self,
        request: FrameRequest,
        timestamp_ms: f64,
        target: &mut impl FrameTarget,
        scheduler: &mut impl FrameScheduler,
    ) -> bool {
        if !self.is_running() || self.pending != Some(request) {
            tracing::trace!(request = request.0, "ignoring stale frame callback");
            return false;
        }
        self.pending = None;

        let dt_secs = match self.last_timestamp_ms {
            Some(last) if timestamp_ms.is_finite() => ((timestamp_ms - last) / 1000.0).max(0.0),
            _ => 0.0,
        };
        if timestamp_ms.is_finite() {
            self.last_timestamp_ms = Some(timestamp_ms);
        }

        target.params_mut().advance(dt_secs);
        target.render();
        self.frames += 1;

        self.pending = Some(scheduler.request_frame());
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/clock.rs"]
mod tests;
