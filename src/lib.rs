//! Fractree is a parametric generator for a radial "fractree" logo.
//!
//! Bounded numeric parameters drive two rings of radial spokes and the half-plane lens masks
//! that interleave them. Every render produces four layered views:
//!
//! - [`LayerView::Front`] and [`LayerView::Back`]: one ring each
//! - [`LayerView::Merged`]: both rings, each revealed on its own side
//! - [`LayerView::AuxiliaryMasked`]: the merged rings clipped to a lens
//!
//! Views are immutable [`LayerTree`]s handed to a [`DrawingSurface`]. They serialize to
//! standalone SVG, rasterize through `resvg`, and can be recorded to MP4 through `ffmpeg`.
//! [`Studio`] ties the pieces together with an [`AnimationClock`] that moves parameters by
//! their velocities once per frame.
#![forbid(unsafe_code)]

pub mod animation;
pub mod app;
pub mod capture;
pub mod compose;
pub mod foundation;
pub mod geometry;
pub mod params;
pub mod scene;

pub use animation::{
    clock::{AnimationClock, ClockState, FrameRequest, FrameScheduler, FrameTarget},
    scheduler::{FixedRateScheduler, ManualScheduler},
};
pub use app::studio::Studio;
pub use capture::{
    ffmpeg::FfmpegSinkFactory,
    raster::FrameRgba,
    session::{CaptureBackend, CaptureController, CaptureOutcome, Download, Notice, RecordControls},
    settings::CaptureSettings,
    sink::{FrameSink, MemorySinkFactory, SinkFactory},
    video::VideoCapture,
};
pub use compose::{
    frame::FrameValues,
    orchestrator::Orchestrator,
    surface::{DrawingSurface, RetainedSurface},
};
pub use foundation::{
    core::Rgb8,
    error::{FractreeError, FractreeResult},
};
pub use params::{
    registry::Parameter,
    store::{ParamStore, Style},
};
pub use scene::tree::{LayerTree, LayerView};
