use rayon::prelude::*;

use crate::foundation::error::{BannerError, BannerResult};
use crate::foundation::math::clamp_round_u8;
use crate::raster::buffer::RasterBuffer;

/// Mid-gray pivot used by [`ToneOp::Contrast`].
pub const CONTRAST_PIVOT: f32 = 128.0;
/// Default near-black threshold for [`key_transparency`].
pub const DEFAULT_KEY_THRESHOLD: u8 = 30;

/// Per-channel multipliers of the sepia tint.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SepiaFactors {
    /// Red multiplier.
    pub r: f32,
    /// Green multiplier.
    pub g: f32,
    /// Blue multiplier.
    pub b: f32,
}

impl Default for SepiaFactors {
    fn default() -> Self {
        Self {
            r: 1.2,
            g: 1.0,
            b: 0.8,
        }
    }
}

/// One color/tone transform. Order matters; see [`apply_tone_ops`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ToneOp {
    /// Replace each pixel by its luma, replicated to R=G=B.
    Grayscale,
    /// Multiply all color channels by `factor`.
    Brightness {
        /// Scalar multiplier, e.g. `1.1`.
        factor: f32,
    },
    /// Scale each channel's distance from mid-gray by `factor`.
    Contrast {
        /// Scalar multiplier, e.g. `0.9`.
        factor: f32,
    },
    /// Independent per-channel tint.
    Sepia {
        /// Channel multipliers.
        #[serde(default)]
        factors: SepiaFactors,
    },
    /// Make near-black pixels fully transparent.
    Key {
        /// Pixels with R, G and B all below this become transparent.
        #[serde(default = "default_key_threshold")]
        threshold: u8,
    },
}

fn default_key_threshold() -> u8 {
    DEFAULT_KEY_THRESHOLD
}

impl ToneOp {
    /// Reject factors that are negative or not finite.
    pub fn validate(&self) -> BannerResult<()> {
        let check = |name: &str, v: f32| {
            if !v.is_finite() || v < 0.0 {
                return Err(BannerError::validation(format!(
                    "{name} factor must be finite and >= 0, got {v}"
                )));
            }
            Ok(())
        };
        match *self {
            Self::Grayscale | Self::Key { .. } => Ok(()),
            Self::Brightness { factor } => check("brightness", factor),
            Self::Contrast { factor } => check("contrast", factor),
            Self::Sepia { factors } => {
                check("sepia red", factors.r)?;
                check("sepia green", factors.g)?;
                check("sepia blue", factors.b)
            }
        }
    }
}

/// ITU-R 601-2 luma in 16-bit fixed point. Weights sum to 65536, so gray input maps to itself.
pub fn luma(r: u8, g: u8, b: u8) -> u8 {
    let l = u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471;
    ((l + 0x8000) >> 16) as u8
}

/// Apply `op` to an owned buffer and hand it back.
pub fn apply_tone(buf: RasterBuffer, op: ToneOp) -> RasterBuffer {
    match op {
        ToneOp::Grayscale => grayscale(buf),
        ToneOp::Brightness { factor } => brightness(buf, factor),
        ToneOp::Contrast { factor } => contrast(buf, factor),
        ToneOp::Sepia { factors } => sepia(buf, factors),
        ToneOp::Key { threshold } => key_transparency(buf, threshold),
    }
}

/// Apply `ops` left to right.
pub fn apply_tone_ops(buf: RasterBuffer, ops: &[ToneOp]) -> RasterBuffer {
    ops.iter().fold(buf, |acc, op| apply_tone(acc, *op))
}

/// Luminosity conversion; the layout is kept (RGB stays RGB).
pub fn grayscale(buf: RasterBuffer) -> RasterBuffer {
    map_rgb(buf, |[r, g, b]| {
        let l = luma(r, g, b);
        [l, l, l]
    })
}

/// Multiply every color channel by `factor`, saturating.
pub fn brightness(buf: RasterBuffer, factor: f32) -> RasterBuffer {
    map_rgb(buf, move |px| px.map(|c| clamp_round_u8(f32::from(c) * factor)))
}

/// Scale the deviation from mid-gray (128) by `factor`, saturating.
pub fn contrast(buf: RasterBuffer, factor: f32) -> RasterBuffer {
    map_rgb(buf, move |px| {
        px.map(|c| clamp_round_u8((f32::from(c) - CONTRAST_PIVOT) * factor + CONTRAST_PIVOT))
    })
}

/// Multiply channels independently in float, then round and saturate.
pub fn sepia(buf: RasterBuffer, f: SepiaFactors) -> RasterBuffer {
    map_rgb(buf, move |[r, g, b]| {
        [
            clamp_round_u8(f32::from(r) * f.r),
            clamp_round_u8(f32::from(g) * f.g),
            clamp_round_u8(f32::from(b) * f.b),
        ]
    })
}

/// Set alpha to 0 wherever R, G and B are all below `threshold`.
///
/// The buffer is promoted to RGBA first; other pixels keep their alpha. This mutates the owned
/// buffer in place and depends on no neighboring pixel.
pub fn key_transparency(buf: RasterBuffer, threshold: u8) -> RasterBuffer {
    let mut buf = buf.into_rgba();
    let stride = buf.row_stride();
    buf.data_mut().par_chunks_mut(stride).for_each(|row| {
        for px in row.chunks_exact_mut(4) {
            if px[0] < threshold && px[1] < threshold && px[2] < threshold {
                px[3] = 0;
            }
        }
    });
    buf
}

fn map_rgb<F>(mut buf: RasterBuffer, f: F) -> RasterBuffer
where
    F: Fn([u8; 3]) -> [u8; 3] + Sync,
{
    let stride = buf.row_stride();
    let n = buf.channels();
    buf.data_mut().par_chunks_mut(stride).for_each(|row| {
        for px in row.chunks_exact_mut(n) {
            let out = f([px[0], px[1], px[2]]);
            px[..3].copy_from_slice(&out);
        }
    });
    buf
}

#[cfg(test)]
#[path = "../../tests/unit/effects/tone.rs"]
mod tests;
