use crate::foundation::core::{PixelPos, Rgba8};
use crate::foundation::error::BannerResult;
use crate::raster::buffer::RasterBuffer;

/// Rendered extent of one line of text at a given size.
///
/// `height` is the full line box (`ascent + descent`), not the ink extent, so vertically centered
/// text does not drift with the glyphs used.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TextBox {
    /// Advance width in whole pixels.
    pub width: u32,
    /// Line box height in whole pixels.
    pub height: u32,
    /// Distance from the box top to the baseline.
    pub ascent: f32,
    /// Distance from the baseline to the box bottom.
    pub descent: f32,
}

/// A rasterizable typeface. Together with a pixel size it forms a font face.
///
/// Origins passed to [`Typeface::draw`] are the top-left corner of the line box; the baseline sits
/// `ascent` pixels below it. Drawing composites onto `target` and clips at its bounds.
pub trait Typeface {
    /// Logical name the face was loaded under.
    fn name(&self) -> &str;

    /// `true` for the embedded fallback face.
    fn is_builtin(&self) -> bool {
        false
    }

    /// Measure `text` as a single line at `size_px`.
    fn measure(&mut self, text: &str, size_px: f32) -> BannerResult<TextBox>;

    /// Draw `text` once at each of `origins` into an RGBA `target`.
    fn draw(
        &mut self,
        text: &str,
        size_px: f32,
        origins: &[PixelPos],
        fill: Rgba8,
        target: &mut RasterBuffer,
    ) -> BannerResult<()>;
}
