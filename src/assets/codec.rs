use std::io::Cursor;

use crate::foundation::error::{BannerError, BannerResult};
use crate::raster::buffer::{PixelLayout, RasterBuffer};

/// Decode encoded image bytes (PNG, JPEG, ...) into a color image.
pub fn decode_image(bytes: &[u8]) -> BannerResult<image::DynamicImage> {
    let img = image::load_from_memory(bytes).map_err(|e| BannerError::decode(e.to_string()))?;
    if img.width() == 0 || img.height() == 0 {
        return Err(BannerError::UnsupportedDimensions {
            width: img.width(),
            height: img.height(),
        });
    }
    Ok(img)
}

/// Serialize a raster as PNG bytes, keeping its channel layout.
pub fn encode_png(buf: &RasterBuffer) -> BannerResult<Vec<u8>> {
    let color = match buf.layout() {
        PixelLayout::Rgb => image::ExtendedColorType::Rgb8,
        PixelLayout::Rgba => image::ExtendedColorType::Rgba8,
    };
    let mut out = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(Cursor::new(&mut out));
    image::ImageEncoder::write_image(encoder, buf.data(), buf.width(), buf.height(), color)
        .map_err(|e| BannerError::encode(e.to_string()))?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/codec.rs"]
mod tests;
