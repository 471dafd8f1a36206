pub mod ffmpeg;
pub mod pump;
pub mod raster;
pub mod session;
pub mod settings;
pub mod sink;
pub mod video;
