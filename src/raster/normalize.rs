use image::imageops::FilterType;

use crate::foundation::core::Canvas;
use crate::foundation::error::{BannerError, BannerResult};
use crate::raster::buffer::RasterBuffer;

/// Stretch `img` onto `canvas` with Lanczos3 resampling.
///
/// Aspect ratio is not preserved. Alpha is dropped; the result is always RGB.
pub fn normalize_to_canvas(img: &image::DynamicImage, canvas: Canvas) -> BannerResult<RasterBuffer> {
    if img.width() == 0 || img.height() == 0 {
        return Err(BannerError::UnsupportedDimensions {
            width: img.width(),
            height: img.height(),
        });
    }
    let canvas = canvas.validate()?;

    let rgb = img.to_rgb8();
    let resized = if rgb.dimensions() == (canvas.width, canvas.height) {
        rgb
    } else {
        image::imageops::resize(&rgb, canvas.width, canvas.height, FilterType::Lanczos3)
    };
    tracing::debug!(
        src_w = img.width(),
        src_h = img.height(),
        dst_w = canvas.width,
        dst_h = canvas.height,
        "normalized input to canvas"
    );
    RasterBuffer::from_rgb_image(resized)
}

#[cfg(test)]
#[path = "../../tests/unit/raster/normalize.rs"]
mod tests;
