use std::{cell::RefCell, rc::Rc};

use super::*;
use crate::foundation::error::FractreeError;

#[derive(Debug, Default)]
struct Log {
    started: Vec<LayerView>,
    snapshots: Vec<LayerView>,
    stops: u32,
}

struct FakeBackend {
    log: Rc<RefCell<Log>>,
    available: bool,
    fail_snapshot: bool,
    fail_pump: bool,
    fail_stop: bool,
    frames: u64,
}

impl FakeBackend {
    fn new(log: &Rc<RefCell<Log>>) -> Self {
        Self {
            log: Rc::clone(log),
            available: true,
            fail_snapshot: false,
            fail_pump: false,
            fail_stop: false,
            frames: 3,
        }
    }
}

impl CaptureBackend for FakeBackend {
    fn check_available(&self) -> FractreeResult<()> {
        if self.available {
            Ok(())
        } else {
            Err(FractreeError::capture("no encoder"))
        }
    }

    fn start_capture(&mut self, source: LayerView) -> FractreeResult<()> {
        self.log.borrow_mut().started.push(source);
        Ok(())
    }

    fn snapshot_frame(&mut self, tree: &LayerTree) -> FractreeResult<()> {
        if self.fail_snapshot {
            return Err(FractreeError::capture("raster failed"));
        }
        self.log.borrow_mut().snapshots.push(tree.view);
        Ok(())
    }

    fn pump(&mut self, _now_secs: f64) -> FractreeResult<u64> {
        if self.fail_pump {
            return Err(FractreeError::encode("broken pipe"));
        }
        Ok(1)
    }

    fn stop_capture(&mut self) -> FractreeResult<Option<Download>> {
        self.log.borrow_mut().stops += 1;
        if self.fail_stop {
            return Err(FractreeError::encode("trailer not written"));
        }
        Ok((self.frames > 0).then(|| Download {
            path: PathBuf::from("fractree_svgMerged_1.mp4"),
            frames: self.frames,
        }))
    }
}

#[test]
fn start_and_stop_toggle_the_view_controls() {
    let log = Rc::new(RefCell::new(Log::default()));
    let mut c = CaptureController::new(Box::new(FakeBackend::new(&log)));
    assert_eq!(c.controls(LayerView::Merged), RecordControls::IDLE);

    assert_eq!(c.start(LayerView::Merged), CaptureOutcome::Started(SessionId(1)));
    assert_eq!(c.controls(LayerView::Merged), RecordControls::RECORDING);
    assert_eq!(c.controls(LayerView::AuxiliaryMasked), RecordControls::IDLE);
    assert_eq!(c.source(), Some(LayerView::Merged));

    let CaptureOutcome::Stopped {
        session,
        download,
        notice,
    } = c.stop()
    else {
        panic!("expected a stopped session");
    };
    assert_eq!(session.source, LayerView::Merged);
    assert_eq!(download.map(|d| d.frames), Some(3));
    assert_eq!(notice, None);
    assert_eq!(c.controls(LayerView::Merged), RecordControls::IDLE);
    assert!(!c.is_active());
    assert_eq!(log.borrow().started, vec![LayerView::Merged]);
}

#[test]
fn second_start_is_rejected_while_recording() {
    let log = Rc::new(RefCell::new(Log::default()));
    let mut c = CaptureController::new(Box::new(FakeBackend::new(&log)));
    c.start(LayerView::Merged);

    let outcome = c.start(LayerView::AuxiliaryMasked);
    let CaptureOutcome::Rejected(notice) = outcome else {
        panic!("expected rejection, got {outcome:?}");
    };
    assert_eq!(notice.to_string(), "Another recording is already in progress.");
    assert_eq!(c.source(), Some(LayerView::Merged));
    assert_eq!(c.controls(LayerView::AuxiliaryMasked), RecordControls::IDLE);
    assert_eq!(log.borrow().started.len(), 1);
}

#[test]
fn unavailable_backend_leaves_controls_idle() {
    let log = Rc::new(RefCell::new(Log::default()));
    let mut backend = FakeBackend::new(&log);
    backend.available = false;
    let mut c = CaptureController::new(Box::new(backend));

    assert!(matches!(
        c.start(LayerView::Merged),
        CaptureOutcome::Rejected(Notice::CaptureUnavailable(_))
    ));
    assert!(!c.is_active());
    assert_eq!(c.controls(LayerView::Merged), RecordControls::IDLE);

    let mut disabled = CaptureController::disabled();
    assert!(matches!(
        disabled.start(LayerView::AuxiliaryMasked),
        CaptureOutcome::Rejected(Notice::CaptureUnavailable(_))
    ));
}

#[test]
fn raw_layers_cannot_be_recorded() {
    let mut c = CaptureController::disabled();
    assert_eq!(
        c.start(LayerView::Front),
        CaptureOutcome::Rejected(Notice::NotCapturable(LayerView::Front))
    );
    let controls = c.controls(LayerView::Back);
    assert!(!controls.start_enabled && !controls.stop_enabled);
}

#[test]
fn stop_without_a_session_is_a_noop() {
    let log = Rc::new(RefCell::new(Log::default()));
    let mut c = CaptureController::new(Box::new(FakeBackend::new(&log)));
    assert_eq!(c.stop(), CaptureOutcome::NoOp);
    assert_eq!(log.borrow().stops, 0);
    assert_eq!(c.controls(LayerView::Merged), RecordControls::IDLE);
}

#[test]
fn empty_recording_yields_no_download() {
    let log = Rc::new(RefCell::new(Log::default()));
    let mut backend = FakeBackend::new(&log);
    backend.frames = 0;
    let mut c = CaptureController::new(Box::new(backend));
    c.start(LayerView::AuxiliaryMasked);
    assert!(matches!(
        c.stop(),
        CaptureOutcome::Stopped { download: None, notice: None, .. }
    ));
}

#[test]
fn snapshots_only_reach_the_backend_for_the_captured_view() {
    let log = Rc::new(RefCell::new(Log::default()));
    let mut c = CaptureController::new(Box::new(FakeBackend::new(&log)));

    c.snapshot(&LayerTree::new(LayerView::Merged));
    assert!(log.borrow().snapshots.is_empty());
    assert_eq!(c.pump(0.0), 0);

    c.start(LayerView::Merged);
    c.snapshot(&LayerTree::new(LayerView::Front));
    c.snapshot(&LayerTree::new(LayerView::Merged));
    assert_eq!(log.borrow().snapshots, vec![LayerView::Merged]);
    assert_eq!(c.pump(0.0), 1);
}

#[test]
fn failing_snapshot_keeps_the_session_alive() {
    let log = Rc::new(RefCell::new(Log::default()));
    let mut backend = FakeBackend::new(&log);
    backend.fail_snapshot = true;
    let mut c = CaptureController::new(Box::new(backend));
    c.start(LayerView::Merged);
    c.snapshot(&LayerTree::new(LayerView::Merged));
    assert!(c.is_active());
}

#[test]
fn failing_pump_closes_the_session() {
    let log = Rc::new(RefCell::new(Log::default()));
    let mut backend = FakeBackend::new(&log);
    backend.fail_pump = true;
    let mut c = CaptureController::new(Box::new(backend));
    c.start(LayerView::AuxiliaryMasked);

    assert_eq!(c.pump(0.1), 0);
    assert!(!c.is_active());
    assert_eq!(c.controls(LayerView::AuxiliaryMasked), RecordControls::IDLE);
    assert_eq!(log.borrow().stops, 1);

    let Some(CaptureOutcome::Stopped {
        download: Some(download),
        notice: Some(Notice::CaptureFailed(reason)),
        ..
    }) = c.take_interrupted()
    else {
        panic!("expected an interrupted session");
    };
    assert_eq!(download.frames, 3);
    assert!(reason.contains("broken pipe"), "{reason}");

    // The backend is not asked to stop twice.
    assert_eq!(c.stop(), CaptureOutcome::NoOp);
    assert_eq!(log.borrow().stops, 1);
}

#[test]
fn pump_failure_notice_wins_over_a_failed_close() {
    let log = Rc::new(RefCell::new(Log::default()));
    let mut backend = FakeBackend::new(&log);
    backend.fail_pump = true;
    backend.fail_stop = true;
    let mut c = CaptureController::new(Box::new(backend));
    c.start(LayerView::Merged);
    c.pump(0.1);

    let Some(CaptureOutcome::Stopped {
        download,
        notice: Some(Notice::CaptureFailed(reason)),
        ..
    }) = c.take_interrupted()
    else {
        panic!("expected an interrupted session");
    };
    assert_eq!(download, None);
    assert!(reason.contains("broken pipe"), "{reason}");
    assert!(c.take_interrupted().is_none());
}
