use crate::effects::composite::over;
use crate::foundation::core::{PixelPos, Rgba8};
use crate::foundation::error::{BannerError, BannerResult};
use crate::raster::buffer::{PixelLayout, RasterBuffer};
use crate::text::typeface::{TextBox, Typeface};

const GLYPH_W: u32 = 5;
const GLYPH_H: u32 = 7;
const ADVANCE: u32 = GLYPH_W + 1;
const LINE_H: u32 = GLYPH_H + 1;

/// Name reported by [`BuiltinTypeface`].
pub const BUILTIN_FONT_NAME: &str = "builtin-5x7";

/// Embedded 5x7 bitmap face, scaled by whole pixels.
///
/// Covers ASCII letters (lowercase drawn as uppercase), digits and common punctuation. Anything
/// else draws as a hollow box.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinTypeface;

impl BuiltinTypeface {
    /// Integer pixel scale used for `size_px`; one unit of the 8-row line box per scale step.
    pub fn scale_for(size_px: f32) -> u32 {
        if !size_px.is_finite() {
            return 1;
        }
        ((size_px / LINE_H as f32).round() as u32).max(1)
    }
}

impl Typeface for BuiltinTypeface {
    fn name(&self) -> &str {
        BUILTIN_FONT_NAME
    }

    fn is_builtin(&self) -> bool {
        true
    }

    fn measure(&mut self, text: &str, size_px: f32) -> BannerResult<TextBox> {
        let s = Self::scale_for(size_px);
        let n = text.chars().count() as u32;
        // Huge sizes saturate instead of wrapping; the layout then overflows the canvas.
        let width = if n == 0 {
            0
        } else {
            n.saturating_mul(ADVANCE).saturating_sub(1).saturating_mul(s)
        };
        Ok(TextBox {
            width,
            height: LINE_H.saturating_mul(s),
            ascent: GLYPH_H as f32 * s as f32,
            descent: s as f32,
        })
    }

    fn draw(
        &mut self,
        text: &str,
        size_px: f32,
        origins: &[PixelPos],
        fill: Rgba8,
        target: &mut RasterBuffer,
    ) -> BannerResult<()> {
        if target.layout() != PixelLayout::Rgba {
            return Err(BannerError::validation("text target must be rgba"));
        }
        let s = Self::scale_for(size_px) as i64;
        let (tw, th) = (i64::from(target.width()), i64::from(target.height()));
        let color = fill.to_array();

        for origin in origins {
            for (i, ch) in text.chars().enumerate() {
                let gx = i64::from(origin.x) + (i as i64) * i64::from(ADVANCE) * s;
                if gx >= tw {
                    break;
                }
                for (row, bits) in glyph_rows(ch).iter().enumerate() {
                    for col in 0..GLYPH_W {
                        if bits & (1 << (GLYPH_W - 1 - col)) == 0 {
                            continue;
                        }
                        let x0 = gx + i64::from(col) * s;
                        let y0 = i64::from(origin.y) + (row as i64) * s;
                        for y in y0.max(0)..(y0 + s).min(th) {
                            for x in x0.max(0)..(x0 + s).min(tw) {
                                let (x, y) = (x as u32, y as u32);
                                if let Some(dst) = target.pixel(x, y) {
                                    let out = over(dst.to_array(), color);
                                    target.set_pixel(
                                        x,
                                        y,
                                        Rgba8::new(out[0], out[1], out[2], out[3]),
                                    );
                                }
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Row bitmaps (bit 4 = leftmost column) for one character.
fn glyph_rows(ch: char) -> [u8; 7] {
    match ch.to_ascii_uppercase() {
        ' ' => [0; 7],
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'B' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110],
        'C' => [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110],
        'D' => [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'G' => [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111],
        'H' => [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        'I' => [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'J' => [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100],
        'K' => [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'M' => [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001],
        'N' => [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'P' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000],
        'Q' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101],
        'R' => [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001],
        'S' => [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110],
        'T' => [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100],
        'U' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'V' => [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'W' => [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010],
        'X' => [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001],
        'Y' => [0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100],
        'Z' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        '!' => [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00000, 0b00100],
        '?' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b00000, 0b00100],
        '.' => [0, 0, 0, 0, 0, 0b01100, 0b01100],
        ',' => [0, 0, 0, 0, 0b01100, 0b00100, 0b01000],
        ':' => [0, 0b01100, 0b01100, 0, 0b01100, 0b01100, 0],
        ';' => [0, 0b01100, 0b01100, 0, 0b01100, 0b00100, 0b01000],
        '-' => [0, 0, 0, 0b11111, 0, 0, 0],
        '+' => [0, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0],
        '=' => [0, 0, 0b11111, 0, 0b11111, 0, 0],
        '_' => [0, 0, 0, 0, 0, 0, 0b11111],
        '\'' => [0b01100, 0b00100, 0b01000, 0, 0, 0, 0],
        '"' => [0b01010, 0b01010, 0b01010, 0, 0, 0, 0],
        '/' => [0, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0],
        '(' => [0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010],
        ')' => [0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000],
        '*' => [0, 0b00100, 0b10101, 0b01110, 0b10101, 0b00100, 0],
        '#' => [0b01010, 0b01010, 0b11111, 0b01010, 0b11111, 0b01010, 0b01010],
        '$' => [0b00100, 0b01111, 0b10100, 0b01110, 0b00101, 0b11110, 0b00100],
        '%' => [0b11000, 0b11001, 0b00010, 0b00100, 0b01000, 0b10011, 0b00011],
        '&' => [0b01100, 0b10010, 0b10100, 0b01000, 0b10101, 0b10010, 0b01101],
        '@' => [0b01110, 0b10001, 0b00001, 0b01101, 0b10101, 0b10101, 0b01110],
        _ => [0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111],
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/builtin.rs"]
mod tests;
