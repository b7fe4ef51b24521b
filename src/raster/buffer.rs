use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{BannerError, BannerResult};

/// Channel layout of a [`RasterBuffer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PixelLayout {
    /// Three 8-bit channels, implicitly opaque.
    Rgb,
    /// Four 8-bit channels with straight alpha.
    Rgba,
}

impl PixelLayout {
    /// Bytes per pixel.
    pub fn channels(self) -> usize {
        match self {
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }
}

/// Owned, row-major 8-bit pixel grid.
///
/// A buffer is moved from stage to stage; operations that need the pre-transform pixels clone
/// explicitly. Alpha, when present, is straight (not premultiplied).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    layout: PixelLayout,
    data: Vec<u8>,
}

impl RasterBuffer {
    /// Zero-filled buffer. For RGBA this is fully transparent black.
    pub fn new(width: u32, height: u32, layout: PixelLayout) -> BannerResult<Self> {
        let len = byte_len(width, height, layout)?;
        Ok(Self {
            width,
            height,
            layout,
            data: vec![0; len],
        })
    }

    /// Fully transparent RGBA buffer covering `canvas`.
    pub fn transparent(canvas: Canvas) -> BannerResult<Self> {
        Self::new(canvas.width, canvas.height, PixelLayout::Rgba)
    }

    /// RGBA buffer with every pixel set to `color`.
    pub fn filled(width: u32, height: u32, color: Rgba8) -> BannerResult<Self> {
        let mut out = Self::new(width, height, PixelLayout::Rgba)?;
        for px in out.data.chunks_exact_mut(4) {
            px.copy_from_slice(&color.to_array());
        }
        Ok(out)
    }

    /// Wrap existing bytes, checking the length against the shape.
    pub fn from_raw(
        width: u32,
        height: u32,
        layout: PixelLayout,
        data: Vec<u8>,
    ) -> BannerResult<Self> {
        let len = byte_len(width, height, layout)?;
        if data.len() != len {
            return Err(BannerError::validation(format!(
                "raster byte len {} does not match {width}x{height}x{}",
                data.len(),
                layout.channels()
            )));
        }
        Ok(Self {
            width,
            height,
            layout,
            data,
        })
    }

    /// Take ownership of an `image` RGB buffer.
    pub fn from_rgb_image(img: image::RgbImage) -> BannerResult<Self> {
        let (w, h) = img.dimensions();
        Self::from_raw(w, h, PixelLayout::Rgb, img.into_raw())
    }

    /// Take ownership of an `image` RGBA buffer.
    pub fn from_rgba_image(img: image::RgbaImage) -> BannerResult<Self> {
        let (w, h) = img.dimensions();
        Self::from_raw(w, h, PixelLayout::Rgba, img.into_raw())
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Channel layout.
    pub fn layout(&self) -> PixelLayout {
        self.layout
    }

    /// Bytes per pixel.
    pub fn channels(&self) -> usize {
        self.layout.channels()
    }

    /// Dimensions as a [`Canvas`].
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Bytes per row.
    pub fn row_stride(&self) -> usize {
        (self.width as usize) * self.channels()
    }

    /// Raw pixel bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw pixel bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Release the raw pixel bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(((y as usize) * (self.width as usize) + (x as usize)) * self.channels())
    }

    /// Read one pixel. RGB buffers report alpha 255. Out-of-bounds reads return `None`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        let i = self.offset(x, y)?;
        let d = &self.data;
        Some(match self.layout {
            PixelLayout::Rgb => Rgba8::new(d[i], d[i + 1], d[i + 2], 255),
            PixelLayout::Rgba => Rgba8::new(d[i], d[i + 1], d[i + 2], d[i + 3]),
        })
    }

    /// Write one pixel; RGB buffers drop the alpha. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, px: Rgba8) {
        let Some(i) = self.offset(x, y) else {
            return;
        };
        let n = self.channels();
        self.data[i..i + n].copy_from_slice(&px.to_array()[..n]);
    }

    /// Read a single channel value.
    pub fn channel(&self, x: u32, y: u32, c: usize) -> Option<u8> {
        if c >= self.channels() {
            return None;
        }
        self.offset(x, y).map(|i| self.data[i + c])
    }

    /// Write a single channel value.
    pub fn set_channel(&mut self, x: u32, y: u32, c: usize, v: u8) {
        if c >= self.channels() {
            return;
        }
        if let Some(i) = self.offset(x, y) {
            self.data[i + c] = v;
        }
    }

    /// `true` when both buffers have the same width, height and layout.
    pub fn same_shape(&self, other: &Self) -> bool {
        self.width == other.width && self.height == other.height && self.layout == other.layout
    }

    /// Convert to RGBA, adding an opaque alpha channel when missing.
    pub fn into_rgba(self) -> Self {
        match self.layout {
            PixelLayout::Rgba => self,
            PixelLayout::Rgb => {
                let mut data = Vec::with_capacity(self.data.len() / 3 * 4);
                for px in self.data.chunks_exact(3) {
                    data.extend_from_slice(&[px[0], px[1], px[2], 255]);
                }
                Self {
                    width: self.width,
                    height: self.height,
                    layout: PixelLayout::Rgba,
                    data,
                }
            }
        }
    }

    /// Convert to RGB, discarding alpha.
    pub fn into_rgb(self) -> Self {
        match self.layout {
            PixelLayout::Rgb => self,
            PixelLayout::Rgba => {
                let mut data = Vec::with_capacity(self.data.len() / 4 * 3);
                for px in self.data.chunks_exact(4) {
                    data.extend_from_slice(&px[..3]);
                }
                Self {
                    width: self.width,
                    height: self.height,
                    layout: PixelLayout::Rgb,
                    data,
                }
            }
        }
    }

    /// Hand the pixels to the `image` crate as RGBA.
    pub fn into_rgba_image(self) -> BannerResult<image::RgbaImage> {
        let rgba = self.into_rgba();
        let (w, h) = (rgba.width, rgba.height);
        image::RgbaImage::from_raw(w, h, rgba.data)
            .ok_or_else(|| BannerError::validation("rgba raster does not fit image buffer"))
    }
}

fn byte_len(width: u32, height: u32, layout: PixelLayout) -> BannerResult<usize> {
    if width == 0 || height == 0 {
        return Err(BannerError::UnsupportedDimensions { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(layout.channels()))
        .ok_or_else(|| BannerError::validation("raster buffer size overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/raster/buffer.rs"]
mod tests;
