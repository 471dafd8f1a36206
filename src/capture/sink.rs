use std::{cell::RefCell, path::PathBuf, rc::Rc};

use crate::{
    capture::raster::FrameRgba,
    foundation::error::{FractreeError, FractreeResult},
};

/// Where and how a recording is written.
#[derive(Clone, Debug, PartialEq)]
pub struct SinkTarget {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub background_rgba: [u8; 4],
}

impl SinkTarget {
    /// Frame bytes per push: `width * height * 4`.
    pub fn frame_len(&self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }

    /// Sizes must be non-zero and even (yuv420p halves both axes), fps non-zero.
    pub fn validate(&self) -> FractreeResult<()> {
        let (w, h) = (self.width, self.height);
        if w == 0 || h == 0 {
            return Err(FractreeError::validation(format!(
                "recording size {w}x{h} has a zero side"
            )));
        }
        if !w.is_multiple_of(2) || !h.is_multiple_of(2) {
            return Err(FractreeError::validation(format!(
                "recording size {w}x{h} must be even on both sides"
            )));
        }
        if self.fps == 0 {
            return Err(FractreeError::validation("recording fps must be at least 1"));
        }
        Ok(())
    }
}

/// Consumes captured frames in order.
pub trait FrameSink {
    fn push_frame(&mut self, frame: &FrameRgba) -> FractreeResult<()>;

    /// Flush and close the recording.
    fn finish(self: Box<Self>) -> FractreeResult<()>;
}

/// Opens a [`FrameSink`] per capture session.
pub trait SinkFactory {
    /// Fails when the platform cannot record (for example, no encoder installed).
    fn check_available(&self) -> FractreeResult<()>;

    fn open(&mut self, target: &SinkTarget) -> FractreeResult<Box<dyn FrameSink>>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct Recording {
    pub target: SinkTarget,
    pub frames: Vec<FrameRgba>,
    pub finished: bool,
}

/// Keeps every recording in memory. Clones share the same storage.
#[derive(Clone, Debug, Default)]
pub struct MemorySinkFactory {
    recordings: Rc<RefCell<Vec<Recording>>>,
    unavailable: Option<String>,
}

impl MemorySinkFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory that reports the platform as unable to record.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            recordings: Rc::default(),
            unavailable: Some(reason.into()),
        }
    }

    pub fn recordings(&self) -> Vec<Recording> {
        self.recordings.borrow().clone()
    }
}

impl SinkFactory for MemorySinkFactory {
    fn check_available(&self) -> FractreeResult<()> {
        match &self.unavailable {
            Some(reason) => Err(FractreeError::capture(reason.clone())),
            None => Ok(()),
        }
    }

    fn open(&mut self, target: &SinkTarget) -> FractreeResult<Box<dyn FrameSink>> {
        self.check_available()?;
        target.validate()?;
        let mut recordings = self.recordings.borrow_mut();
        recordings.push(Recording {
            target: target.clone(),
            frames: Vec::new(),
            finished: false,
        });
        Ok(Box::new(MemorySink {
            recordings: Rc::clone(&self.recordings),
            index: recordings.len() - 1,
        }))
    }
}

struct MemorySink {
    recordings: Rc<RefCell<Vec<Recording>>>,
    index: usize,
}

impl FrameSink for MemorySink {
    fn push_frame(&mut self, frame: &FrameRgba) -> FractreeResult<()> {
        let mut recordings = self.recordings.borrow_mut();
        let rec = recordings
            .get_mut(self.index)
            .ok_or_else(|| FractreeError::capture("memory recording vanished"))?;
        if rec.finished {
            return Err(FractreeError::capture("memory recording is already finished"));
        }
        rec.frames.push(frame.clone());
        Ok(())
    }

    fn finish(self: Box<Self>) -> FractreeResult<()> {
        let mut recordings = self.recordings.borrow_mut();
        let rec = recordings
            .get_mut(self.index)
            .ok_or_else(|| FractreeError::capture("memory recording vanished"))?;
        rec.finished = true;
        Ok(())
    }
}
