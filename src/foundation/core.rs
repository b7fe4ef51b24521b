use crate::foundation::error::{BannerError, BannerResult};

/// Banner width in pixels.
pub const BANNER_WIDTH: u32 = 2000;
/// Banner height in pixels.
pub const BANNER_HEIGHT: u32 = 133;

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// The fixed 2000x133 banner canvas.
    pub const BANNER: Canvas = Canvas {
        width: BANNER_WIDTH,
        height: BANNER_HEIGHT,
    };

    /// Reject degenerate canvases.
    pub fn validate(self) -> BannerResult<Self> {
        if self.width == 0 || self.height == 0 {
            return Err(BannerError::UnsupportedDimensions {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }

    /// Number of pixels covered by the canvas.
    pub fn pixel_count(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::BANNER
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Construct from channel values.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque black.
    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    /// Fully transparent black.
    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Return the color with its alpha replaced.
    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Channel array in RGBA order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Integer pixel position; may lie outside the canvas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelPos {
    /// Horizontal offset from the left edge.
    pub x: i32,
    /// Vertical offset from the top edge.
    pub y: i32,
}

impl PixelPos {
    /// Construct a position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
