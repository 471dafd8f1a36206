use std::{
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use crate::{
    capture::{
        pump::CapturePump,
        raster::{FrameRgba, rasterize_tree},
        session::{CaptureBackend, Download},
        settings::CaptureSettings,
        sink::{FrameSink, SinkFactory, SinkTarget},
    },
    foundation::error::{FractreeError, FractreeResult},
    scene::tree::{LayerTree, LayerView},
};

/// `fractree_<elementId>_<unix-millis>.mp4`
pub fn recording_file_name(view: LayerView, unix_millis: u128) -> String {
    format!("fractree_{}_{unix_millis}.mp4", view.element_id())
}

fn unix_millis_now() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

struct ActiveRecording {
    source: LayerView,
    path: PathBuf,
    sink: Box<dyn FrameSink>,
    pump: CapturePump,
    latest: Option<FrameRgba>,
    frames: u64,
}

/// Records one view to a video file through a [`SinkFactory`].
///
/// Renders land on an off-screen canvas (`latest`); the pump copies that canvas into the sink at
/// the capture rate.
pub struct VideoCapture<F: SinkFactory> {
    settings: CaptureSettings,
    out_dir: PathBuf,
    factory: F,
    active: Option<ActiveRecording>,
}

impl<F: SinkFactory> VideoCapture<F> {
    pub fn new(
        settings: CaptureSettings,
        out_dir: impl Into<PathBuf>,
        factory: F,
    ) -> FractreeResult<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            out_dir: out_dir.into(),
            factory,
            active: None,
        })
    }

    pub fn settings(&self) -> &CaptureSettings {
        &self.settings
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Output path of the recording in progress.
    pub fn active_path(&self) -> Option<&Path> {
        self.active.as_ref().map(|a| a.path.as_path())
    }
}

impl<F: SinkFactory> CaptureBackend for VideoCapture<F> {
    fn check_available(&self) -> FractreeResult<()> {
        self.factory.check_available()
    }

    fn start_capture(&mut self, source: LayerView) -> FractreeResult<()> {
        if let Some(active) = &self.active {
            return Err(FractreeError::capture(format!(
                "already recording {}",
                active.source
            )));
        }

        let (width, height) = self.settings.frame_size();
        let path = self
            .out_dir
            .join(recording_file_name(source, unix_millis_now()));
        let target = SinkTarget {
            path: path.clone(),
            width,
            height,
            fps: self.settings.fps,
            background_rgba: self.settings.background_rgba,
        };
        let sink = self.factory.open(&target)?;
        tracing::debug!(path = %path.display(), width, height, fps = target.fps, "recording opened");

        self.active = Some(ActiveRecording {
            source,
            path,
            sink,
            pump: CapturePump::new(self.settings.fps),
            latest: None,
            frames: 0,
        });
        Ok(())
    }

    fn snapshot_frame(&mut self, tree: &LayerTree) -> FractreeResult<()> {
        let Some(active) = self.active.as_mut() else {
            return Ok(());
        };
        if tree.view != active.source {
            return Ok(());
        }
        active.latest = Some(rasterize_tree(tree, &self.settings)?);
        Ok(())
    }

    fn pump(&mut self, now_secs: f64) -> FractreeResult<u64> {
        let Some(active) = self.active.as_mut() else {
            return Ok(0);
        };
        let due = active.pump.due_frames(now_secs);
        // Slots before the first snapshot stay empty.
        let Some(frame) = active.latest.as_ref() else {
            return Ok(0);
        };
        // Count as we go so a failing sink still reports what reached the file.
        for written in 0..due {
            if let Err(e) = active.sink.push_frame(frame) {
                tracing::warn!(written, due, error = %e, "sink rejected a capture frame");
                return Err(e);
            }
            active.frames += 1;
        }
        Ok(due)
    }

    fn stop_capture(&mut self) -> FractreeResult<Option<Download>> {
        let Some(active) = self.active.take() else {
            return Ok(None);
        };

        if active.frames == 0 {
            if let Err(e) = active.sink.finish() {
                tracing::debug!(error = %e, "closing empty recording");
            }
            if active.path.exists()
                && let Err(e) = std::fs::remove_file(&active.path)
            {
                tracing::debug!(path = %active.path.display(), error = %e, "could not remove empty recording");
            }
            tracing::warn!(view = %active.source, "no recorded data available");
            return Ok(None);
        }

        active.sink.finish()?;
        Ok(Some(Download {
            path: active.path,
            frames: active.frames,
        }))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/video.rs"]
mod tests;
