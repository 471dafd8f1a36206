use crate::foundation::{
    core::VIEW_SIZE,
    error::{FractreeError, FractreeResult},
};

pub const ENV_CAPTURE_FPS: &str = "FRACTREE_CAPTURE_FPS";
pub const ENV_CAPTURE_SCALE: &str = "FRACTREE_CAPTURE_SCALE";

const MAX_DIM: u32 = 8192;

/// How captured frames are sampled and rasterized.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CaptureSettings {
    /// Capture rate, independent of how often the logo is rendered.
    pub fps: u32,
    /// Raster scale relative to the 400×400 view.
    pub scale: f32,
    /// Straight RGBA8 color painted under every snapshot.
    pub background_rgba: [u8; 4],
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            fps: 30,
            scale: 1.0,
            background_rgba: [255, 255, 255, 255],
        }
    }
}

impl CaptureSettings {
    /// Defaults with `FRACTREE_CAPTURE_FPS` / `FRACTREE_CAPTURE_SCALE` applied.
    pub fn from_env() -> FractreeResult<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> FractreeResult<Self> {
        if let Some(raw) = lookup(ENV_CAPTURE_FPS) {
            self.fps = raw.trim().parse().map_err(|_| {
                FractreeError::config(format!("{ENV_CAPTURE_FPS} must be an integer, got '{raw}'"))
            })?;
        }
        if let Some(raw) = lookup(ENV_CAPTURE_SCALE) {
            self.scale = raw.trim().parse().map_err(|_| {
                FractreeError::config(format!("{ENV_CAPTURE_SCALE} must be a number, got '{raw}'"))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> FractreeResult<()> {
        if self.fps == 0 {
            return Err(FractreeError::validation("capture fps must be non-zero"));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(FractreeError::validation(
                "capture scale must be finite and > 0",
            ));
        }
        let (w, h) = self.frame_size();
        if w == 0 || h == 0 || w > MAX_DIM || h > MAX_DIM {
            return Err(FractreeError::validation(format!(
                "capture frame size {w}x{h} is out of range (max {MAX_DIM}x{MAX_DIM})"
            )));
        }
        Ok(())
    }

    /// Pixel size of a captured frame, rounded down to even dimensions for yuv420p output.
    pub fn frame_size(&self) -> (u32, u32) {
        let side = (VIEW_SIZE as f32 * self.scale).round().max(0.0) as u32;
        let side = side - side % 2;
        (side, side)
    }
}
