use std::{collections::BTreeMap, fmt, path::PathBuf};

use crate::{
    foundation::error::FractreeResult,
    scene::tree::{LayerTree, LayerView},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(pub u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptureSession {
    pub id: SessionId,
    pub source: LayerView,
}

/// Enabled state of one view's record/stop controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordControls {
    pub start_enabled: bool,
    pub stop_enabled: bool,
}

impl RecordControls {
    pub const IDLE: Self = Self {
        start_enabled: true,
        stop_enabled: false,
    };
    pub const RECORDING: Self = Self {
        start_enabled: false,
        stop_enabled: true,
    };
}

impl Default for RecordControls {
    fn default() -> Self {
        Self::IDLE
    }
}

/// A finished recording ready for download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Download {
    pub path: PathBuf,
    pub frames: u64,
}

/// User-visible message about a capture request that could not be honored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notice {
    CaptureUnavailable(String),
    CaptureInProgress { active: LayerView },
    NotCapturable(LayerView),
    CaptureFailed(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CaptureUnavailable(reason) => write!(f, "Recording is not available: {reason}"),
            Self::CaptureInProgress { .. } => f.write_str("Another recording is already in progress."),
            Self::NotCapturable(view) => write!(f, "{view} cannot be recorded."),
            Self::CaptureFailed(reason) => write!(f, "Recording failed: {reason}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaptureOutcome {
    Started(SessionId),
    Stopped {
        session: CaptureSession,
        download: Option<Download>,
        notice: Option<Notice>,
    },
    /// Nothing to do, e.g. stopping with no active session.
    NoOp,
    Rejected(Notice),
}

/// The recording collaborator: turns snapshots of one view into a video file.
pub trait CaptureBackend {
    /// Fails when the platform lacks what recording needs.
    fn check_available(&self) -> FractreeResult<()>;

    fn start_capture(&mut self, source: LayerView) -> FractreeResult<()>;

    /// Rasterize the latest render of the captured view onto the capture canvas.
    fn snapshot_frame(&mut self, tree: &LayerTree) -> FractreeResult<()>;

    /// Pull due frames from the capture canvas at the capture rate. Returns frames written.
    fn pump(&mut self, now_secs: f64) -> FractreeResult<u64>;

    /// Close the recording. `None` when nothing was recorded.
    fn stop_capture(&mut self) -> FractreeResult<Option<Download>>;
}

/// Capture session bookkeeping: at most one session at a time, control enablement per view,
/// and graceful degradation when the backend fails.
pub struct CaptureController {
    backend: Option<Box<dyn CaptureBackend>>,
    session: Option<CaptureSession>,
    next_id: u64,
    controls: BTreeMap<LayerView, RecordControls>,
    interrupted: Option<CaptureOutcome>,
}

impl Default for CaptureController {
    fn default() -> Self {
        Self::disabled()
    }
}

impl fmt::Debug for CaptureController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureController")
            .field("has_backend", &self.backend.is_some())
            .field("session", &self.session)
            .field("controls", &self.controls)
            .field("interrupted", &self.interrupted)
            .finish()
    }
}

impl CaptureController {
    pub fn new(backend: Box<dyn CaptureBackend>) -> Self {
        Self {
            backend: Some(backend),
            ..Self::disabled()
        }
    }

    /// No backend: every start request is answered with an unavailability notice.
    pub fn disabled() -> Self {
        Self {
            backend: None,
            session: None,
            next_id: 1,
            controls: LayerView::ALL
                .into_iter()
                .filter(|v| v.is_capturable())
                .map(|v| (v, RecordControls::IDLE))
                .collect(),
            interrupted: None,
        }
    }

    pub fn session(&self) -> Option<&CaptureSession> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn source(&self) -> Option<LayerView> {
        self.session.as_ref().map(|s| s.source)
    }

    /// Control state for `view`; non-capturable views never enable either control.
    pub fn controls(&self, view: LayerView) -> RecordControls {
        self.controls.get(&view).copied().unwrap_or(RecordControls {
            start_enabled: false,
            stop_enabled: false,
        })
    }

    fn reset_controls(&mut self) {
        for c in self.controls.values_mut() {
            *c = RecordControls::IDLE;
        }
    }

    pub fn start(&mut self, view: LayerView) -> CaptureOutcome {
        if !view.is_capturable() {
            return CaptureOutcome::Rejected(Notice::NotCapturable(view));
        }
        if let Some(active) = &self.session {
            tracing::warn!(requested = %view, active = %active.source, "capture already running");
            return CaptureOutcome::Rejected(Notice::CaptureInProgress {
                active: active.source,
            });
        }

        let Some(backend) = self.backend.as_mut() else {
            return CaptureOutcome::Rejected(Notice::CaptureUnavailable(
                "no capture backend configured".to_string(),
            ));
        };
        if let Err(e) = backend.check_available() {
            tracing::warn!(error = %e, "capture unavailable");
            return CaptureOutcome::Rejected(Notice::CaptureUnavailable(e.to_string()));
        }
        if let Err(e) = backend.start_capture(view) {
            tracing::warn!(error = %e, view = %view, "failed to start capture");
            return CaptureOutcome::Rejected(Notice::CaptureFailed(e.to_string()));
        }

        let id = SessionId(self.next_id);
        self.next_id += 1;
        self.session = Some(CaptureSession { id, source: view });
        self.controls.insert(view, RecordControls::RECORDING);
        tracing::info!(session = id.0, view = %view, "capture started");
        CaptureOutcome::Started(id)
    }

    /// Stop the active session. Without one this only resets the controls.
    pub fn stop(&mut self) -> CaptureOutcome {
        self.reset_controls();
        match self.session.take() {
            Some(session) => self.close(session, None),
            None => CaptureOutcome::NoOp,
        }
    }

    /// Close the backend recording for `session`. `failure` is why the session ended early.
    fn close(&mut self, session: CaptureSession, failure: Option<Notice>) -> CaptureOutcome {
        let result = match self.backend.as_mut() {
            Some(backend) => backend.stop_capture(),
            None => Ok(None),
        };

        match result {
            Ok(download) => {
                match &download {
                    Some(d) => tracing::info!(
                        session = session.id.0,
                        path = %d.path.display(),
                        frames = d.frames,
                        "capture stopped"
                    ),
                    None => tracing::warn!(session = session.id.0, "no recorded data available"),
                }
                CaptureOutcome::Stopped {
                    session,
                    download,
                    notice: failure,
                }
            }
            Err(e) => {
                tracing::warn!(session = session.id.0, error = %e, "capture did not finish cleanly");
                CaptureOutcome::Stopped {
                    session,
                    download: None,
                    notice: failure.or(Some(Notice::CaptureFailed(e.to_string()))),
                }
            }
        }
    }

    /// Outcome of a session the controller ended on its own after a backend failure.
    ///
    /// Cleared once taken.
    pub fn take_interrupted(&mut self) -> Option<CaptureOutcome> {
        self.interrupted.take()
    }

    /// Hand a freshly rendered view to the backend if it is the one being captured.
    pub fn snapshot(&mut self, tree: &LayerTree) {
        if self.source() != Some(tree.view) {
            return;
        }
        if let Some(backend) = self.backend.as_mut()
            && let Err(e) = backend.snapshot_frame(tree)
        {
            tracing::warn!(view = %tree.view, error = %e, "snapshot failed, keeping previous frame");
        }
    }

    /// Let the backend write due frames. A write failure ends the session; its outcome is
    /// kept for [`CaptureController::take_interrupted`].
    pub fn pump(&mut self, now_secs: f64) -> u64 {
        if self.session.is_none() {
            return 0;
        }
        let result = match self.backend.as_mut() {
            Some(backend) => backend.pump(now_secs),
            None => return 0,
        };
        match result {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!(error = %e, "capture pump failed, ending the recording");
                self.reset_controls();
                if let Some(session) = self.session.take() {
                    let outcome = self.close(session, Some(Notice::CaptureFailed(e.to_string())));
                    self.interrupted = Some(outcome);
                }
                0
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/session.rs"]
mod tests;
