/// Decides how many capture frames are due at a given time.
///
/// The capture rate is fixed and independent of the render cadence: the pump counts frame slots
/// since the first call, so slow renders repeat the latest snapshot and fast renders are simply
/// overwritten before the next slot.
#[derive(Clone, Debug)]
pub struct CapturePump {
    fps: u32,
    origin_secs: Option<f64>,
    emitted: u64,
}

impl CapturePump {
    pub fn new(fps: u32) -> Self {
        Self {
            fps: fps.max(1),
            origin_secs: None,
            emitted: 0,
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Frame slots that opened since the previous call. The first call opens slot 0.
    pub fn due_frames(&mut self, now_secs: f64) -> u64 {
        if !now_secs.is_finite() {
            return 0;
        }
        let origin = *self.origin_secs.get_or_insert(now_secs);
        let elapsed = (now_secs - origin).max(0.0);
        // Nudge by a small epsilon so slot boundaries computed from the same fps land inside.
        let slots = (elapsed * f64::from(self.fps) + 1e-9).floor() as u64 + 1;
        let due = slots.saturating_sub(self.emitted);
        self.emitted = self.emitted.max(slots);
        due
    }
}
