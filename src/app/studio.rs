use crate::{
    animation::{
        clock::{AnimationClock, ClockState, FrameRequest, FrameScheduler},
        scheduler::FixedRateScheduler,
    },
    capture::session::{CaptureOutcome, RecordControls},
    compose::{orchestrator::Orchestrator, surface::DrawingSurface},
    foundation::error::FractreeResult,
    params::store::Style,
    scene::tree::LayerView,
};

/// Application context: one orchestrator, one clock, one scheduler.
///
/// Front ends call the user actions on this value instead of reaching for shared globals.
pub struct Studio<D: DrawingSurface, S: FrameScheduler> {
    orchestrator: Orchestrator<D>,
    clock: AnimationClock,
    scheduler: S,
}

impl<D: DrawingSurface, S: FrameScheduler> Studio<D, S> {
    /// Wraps the orchestrator and renders the initial state once.
    pub fn new(mut orchestrator: Orchestrator<D>, scheduler: S) -> Self {
        orchestrator.render();
        Self {
            orchestrator,
            clock: AnimationClock::new(),
            scheduler,
        }
    }

    pub fn orchestrator(&self) -> &Orchestrator<D> {
        &self.orchestrator
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn set_param(&mut self, id: &str, raw: &str) -> FractreeResult<f64> {
        self.orchestrator.set_param_str(id, raw)
    }

    pub fn set_velocity(&mut self, id: &str, raw: &str) -> FractreeResult<()> {
        self.orchestrator.params_mut().set_velocity_str(id, raw)
    }

    pub fn set_style(&mut self, style: Style) {
        self.orchestrator.set_style(style);
    }

    pub fn toggle_play(&mut self) -> ClockState {
        self.clock.toggle(&mut self.scheduler)
    }

    pub fn play(&mut self) {
        self.clock.start(&mut self.scheduler);
    }

    pub fn pause(&mut self) {
        self.clock.stop(&mut self.scheduler);
    }

    pub fn play_label(&self) -> &'static str {
        self.clock.play_label()
    }

    /// Deliver a frame callback from the host.
    pub fn on_frame(&mut self, request: FrameRequest, timestamp_ms: f64) -> bool {
        self.clock.on_frame(
            request,
            timestamp_ms,
            &mut self.orchestrator,
            &mut self.scheduler,
        )
    }

    pub fn start_capture(&mut self, view: LayerView) -> CaptureOutcome {
        self.orchestrator.start_capture(view)
    }

    pub fn stop_capture(&mut self) -> CaptureOutcome {
        self.orchestrator.stop_capture()
    }

    pub fn record_controls(&self, view: LayerView) -> RecordControls {
        self.orchestrator.capture().controls(view)
    }

    /// Let an active capture pull frames due by `now_secs`.
    pub fn tick_capture(&mut self, now_secs: f64) -> u64 {
        self.orchestrator.pump_capture(now_secs)
    }

    /// Outcome of a recording that ended on its own because frames could not be written.
    pub fn take_interrupted_capture(&mut self) -> Option<CaptureOutcome> {
        self.orchestrator.take_interrupted_capture()
    }

    /// Stop animation and close any recording.
    pub fn shutdown(&mut self) -> CaptureOutcome {
        self.clock.stop(&mut self.scheduler);
        self.orchestrator.stop_capture()
    }
}

impl<D: DrawingSurface> Studio<D, FixedRateScheduler> {
    /// Fire the pending offline frame and pump capture at its timestamp.
    ///
    /// Returns `false` when the clock is not running.
    pub fn advance_frame(&mut self) -> bool {
        let Some((request, ts_ms)) = self.scheduler.fire() else {
            return false;
        };
        let processed = self.on_frame(request, ts_ms);
        if processed {
            self.tick_capture(ts_ms / 1000.0);
        }
        processed
    }
}
