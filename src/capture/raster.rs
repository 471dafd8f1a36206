use crate::{
    capture::settings::CaptureSettings,
    foundation::error::{FractreeError, FractreeResult},
    scene::tree::LayerTree,
};

/// A rasterized frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRgba {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRgba {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        self.data.get(i..i + 4).map(|p| [p[0], p[1], p[2], p[3]])
    }
}

/// Rasterize an SVG document to `width`×`height`, stretched to fill, over an optional
/// straight-alpha background.
pub fn rasterize_svg(
    svg: &str,
    width: u32,
    height: u32,
    background_rgba: Option<[u8; 4]>,
) -> FractreeResult<FrameRgba> {
    let tree = usvg::Tree::from_str(svg, &usvg::Options::default())
        .map_err(|e| FractreeError::capture(format!("failed to parse svg snapshot: {e}")))?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| FractreeError::capture(format!("failed to allocate {width}x{height} pixmap")))?;

    if let Some([r, g, b, a]) = background_rgba {
        pixmap.fill(resvg::tiny_skia::Color::from_rgba8(r, g, b, a));
    }

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );

    Ok(FrameRgba {
        width,
        height,
        data: pixmap.take(),
        premultiplied: true,
    })
}

/// Serialize and rasterize one view the way a capture snapshot sees it.
#[tracing::instrument(skip(tree, settings), fields(view = %tree.view))]
pub fn rasterize_tree(tree: &LayerTree, settings: &CaptureSettings) -> FractreeResult<FrameRgba> {
    let (width, height) = settings.frame_size();
    rasterize_svg(&tree.to_svg(), width, height, Some(settings.background_rgba))
}

#[cfg(test)]
#[path = "../../tests/unit/capture/raster.rs"]
mod tests;
