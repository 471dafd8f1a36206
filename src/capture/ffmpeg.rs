use std::{
    ffi::OsString,
    io::Write as _,
    process::{Child, ChildStdin, Command, Stdio},
};

use anyhow::Context as _;

use crate::{
    capture::{
        raster::FrameRgba,
        sink::{FrameSink, SinkFactory, SinkTarget},
    },
    foundation::error::{FractreeError, FractreeResult},
};

const FFMPEG: &str = "ffmpeg";

/// Command line for one recording: raw RGBA on stdin, H.264 yuv420p MP4 out.
pub fn ffmpeg_args(target: &SinkTarget, overwrite: bool) -> Vec<OsString> {
    let size = format!("{}x{}", target.width, target.height);
    let rate = target.fps.to_string();
    let mut args: Vec<OsString> = [
        if overwrite { "-y" } else { "-n" },
        "-loglevel",
        "error",
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgba",
        "-s",
        size.as_str(),
        "-r",
        rate.as_str(),
        "-i",
        "pipe:0",
        "-an",
        "-c:v",
        "libx264",
        "-pix_fmt",
        "yuv420p",
        "-movflags",
        "+faststart",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    args.push(target.path.clone().into_os_string());
    args
}

/// Runs `ffmpeg -version`; any spawn failure or non-zero exit counts as missing.
fn ffmpeg_version_ok() -> bool {
    let status = Command::new(FFMPEG)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    matches!(status, Ok(s) if s.success())
}

/// Streams frames into the system `ffmpeg` binary.
///
/// Each frame is flattened onto the target background first, since yuv420p has no alpha.
pub struct FfmpegSink {
    target: SinkTarget,
    child: Child,
    stdin: Option<ChildStdin>,
    opaque: Vec<u8>,
}

impl FfmpegSink {
    pub fn spawn(target: &SinkTarget, overwrite: bool) -> FractreeResult<Self> {
        target.validate()?;

        let path = &target.path;
        if !overwrite && path.exists() {
            return Err(FractreeError::validation(format!(
                "refusing to replace '{}'",
                path.display()
            )));
        }
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create recording directory '{}'", dir.display()))?;
        }

        let mut child = Command::new(FFMPEG)
            .args(ffmpeg_args(target, overwrite))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| FractreeError::encode(format!("could not start ffmpeg: {e}")))?;
        let Some(stdin) = child.stdin.take() else {
            return Err(FractreeError::encode("ffmpeg started without a stdin pipe"));
        };

        tracing::debug!(
            path = %path.display(),
            width = target.width,
            height = target.height,
            fps = target.fps,
            "ffmpeg recording"
        );
        Ok(Self {
            opaque: vec![0; target.frame_len()],
            target: target.clone(),
            child,
            stdin: Some(stdin),
        })
    }
}

impl FrameSink for FfmpegSink {
    fn push_frame(&mut self, frame: &FrameRgba) -> FractreeResult<()> {
        let t = &self.target;
        if (frame.width, frame.height) != (t.width, t.height) {
            return Err(FractreeError::validation(format!(
                "frame is {}x{}, recording is {}x{}",
                frame.width, frame.height, t.width, t.height
            )));
        }
        composite_over(
            &mut self.opaque,
            &frame.data,
            frame.premultiplied,
            t.background_rgba,
        )?;

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(FractreeError::encode("ffmpeg input already closed"));
        };
        stdin
            .write_all(&self.opaque)
            .map_err(|e| FractreeError::encode(format!("ffmpeg stopped accepting frames: {e}")))
    }

    fn finish(mut self: Box<Self>) -> FractreeResult<()> {
        // Closing stdin is ffmpeg's end-of-stream.
        self.stdin = None;
        let out = self
            .child
            .wait_with_output()
            .map_err(|e| FractreeError::encode(format!("waiting on ffmpeg: {e}")))?;
        if out.status.success() {
            return Ok(());
        }
        Err(FractreeError::encode(format!(
            "ffmpeg failed ({}): {}",
            out.status,
            String::from_utf8_lossy(&out.stderr).trim()
        )))
    }
}

/// Opens an [`FfmpegSink`] per recording.
#[derive(Clone, Debug)]
pub struct FfmpegSinkFactory {
    pub overwrite: bool,
}

impl Default for FfmpegSinkFactory {
    fn default() -> Self {
        Self { overwrite: true }
    }
}

impl SinkFactory for FfmpegSinkFactory {
    fn check_available(&self) -> FractreeResult<()> {
        if ffmpeg_version_ok() {
            return Ok(());
        }
        Err(FractreeError::capture(
            "recording needs ffmpeg, but it was not found on PATH",
        ))
    }

    fn open(&mut self, target: &SinkTarget) -> FractreeResult<Box<dyn FrameSink>> {
        Ok(Box::new(FfmpegSink::spawn(target, self.overwrite)?))
    }
}

/// `a * b / 255`, rounded.
fn scale255(a: u8, b: u8) -> u32 {
    (u32::from(a) * u32::from(b) + 127) / 255
}

/// Writes `src` composited over the opaque `background` into `out`. Output alpha is always 255.
fn composite_over(
    out: &mut [u8],
    src: &[u8],
    premultiplied: bool,
    background: [u8; 4],
) -> FractreeResult<()> {
    if out.len() != src.len() || !src.len().is_multiple_of(4) {
        return Err(FractreeError::validation(format!(
            "expected {} RGBA bytes, got {}",
            out.len(),
            src.len()
        )));
    }

    for (px, s) in out.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let alpha = s[3];
        let cover = 255 - alpha;
        for ch in 0..3 {
            let fg = if premultiplied {
                u32::from(s[ch])
            } else {
                scale255(s[ch], alpha)
            };
            px[ch] = (fg + scale255(background[ch], cover)).min(255) as u8;
        }
        px[3] = 255;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/capture/ffmpeg.rs"]
mod tests;
