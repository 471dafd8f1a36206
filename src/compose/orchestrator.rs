use std::sync::Arc;

use crate::{
    animation::clock::FrameTarget,
    capture::session::{CaptureController, CaptureOutcome},
    compose::{frame::FrameValues, layers, surface::DrawingSurface},
    foundation::error::FractreeResult,
    params::store::{ParamStore, Style},
    scene::tree::LayerView,
};

/// Turns the current parameter values into the four layer views.
///
/// Every render rebuilds all views from scratch and hands each one to the surface as a full
/// replacement. When a capture session is active, the captured view is also snapshotted.
#[derive(Debug)]
pub struct Orchestrator<D: DrawingSurface> {
    params: ParamStore,
    style: Style,
    surface: D,
    capture: CaptureController,
    labels: Vec<(String, String)>,
    render_count: u64,
}

impl<D: DrawingSurface> Orchestrator<D> {
    pub fn new(params: ParamStore, style: Style, surface: D) -> Self {
        Self {
            labels: params.labels(),
            params,
            style,
            surface,
            capture: CaptureController::disabled(),
            render_count: 0,
        }
    }

    pub fn with_capture(mut self, capture: CaptureController) -> Self {
        self.capture = capture;
        self
    }

    pub fn params(&self) -> &ParamStore {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut ParamStore {
        &mut self.params
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn surface(&self) -> &D {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut D {
        &mut self.surface
    }

    pub fn capture(&self) -> &CaptureController {
        &self.capture
    }

    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    /// `(id, rounded value)` per parameter, refreshed on every render.
    pub fn labels(&self) -> &[(String, String)] {
        &self.labels
    }

    pub fn frame_values(&self) -> FrameValues {
        FrameValues::resolve(&self.params, &self.style)
    }

    #[tracing::instrument(skip(self), fields(render = self.render_count))]
    pub fn render(&mut self) {
        let values = self.frame_values();
        let capture_source = self.capture.source();

        for tree in layers::build_all(&values) {
            let tree = Arc::new(tree);
            if capture_source == Some(tree.view) {
                self.capture.snapshot(&tree);
            }
            self.surface.replace_view(tree);
        }

        self.labels = self.params.labels();
        self.render_count += 1;
        tracing::debug!(spokes = values.count, "views replaced");
    }

    /// Set a parameter (wrapped into range) and re-render. Rejected input leaves the last good
    /// value and skips the render.
    pub fn set_param(&mut self, id: &str, value: f64) -> FractreeResult<f64> {
        let applied = self.params.set(id, value)?;
        self.render();
        Ok(applied)
    }

    pub fn set_param_str(&mut self, id: &str, raw: &str) -> FractreeResult<f64> {
        let applied = self.params.set_str(id, raw)?;
        self.render();
        Ok(applied)
    }

    /// Velocities only take effect on the next animation frame; no render here.
    pub fn set_velocity(&mut self, id: &str, velocity: f64) -> FractreeResult<()> {
        self.params.set_velocity(id, velocity)
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
        self.render();
    }

    pub fn start_capture(&mut self, view: LayerView) -> CaptureOutcome {
        let outcome = self.capture.start(view);
        if matches!(outcome, CaptureOutcome::Started(_)) {
            // Seed the capture canvas with the current look.
            self.render();
        }
        outcome
    }

    pub fn stop_capture(&mut self) -> CaptureOutcome {
        self.capture.stop()
    }

    /// A recording the capture controller ended after a write failure, if any.
    pub fn take_interrupted_capture(&mut self) -> Option<CaptureOutcome> {
        self.capture.take_interrupted()
    }

    /// Let the capture pull due frames. Returns frames written.
    pub fn pump_capture(&mut self, now_secs: f64) -> u64 {
        self.capture.pump(now_secs)
    }
}

impl<D: DrawingSurface> FrameTarget for Orchestrator<D> {
    fn params_mut(&mut self) -> &mut ParamStore {
        &mut self.params
    }

    fn render(&mut self) {
        Orchestrator::render(self);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/orchestrator.rs"]
mod tests;
