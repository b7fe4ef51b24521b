use rayon::prelude::*;

use crate::foundation::error::{BannerError, BannerResult};
use crate::foundation::math::clamp_round_u8;
use crate::raster::buffer::RasterBuffer;

/// Upper bound on the kernel half-width, in pixels.
pub const MAX_KERNEL_RADIUS: u32 = 512;

/// Kernel half-width for a Gaussian of standard deviation `sigma` (3σ, rounded up).
pub fn kernel_radius(sigma: f32) -> u32 {
    if !sigma.is_finite() || sigma <= 0.0 {
        return 0;
    }
    ((sigma * 3.0).ceil() as u32).min(MAX_KERNEL_RADIUS)
}

/// Separable Gaussian blur with standard deviation `sigma`.
///
/// Samples outside the buffer clamp to the nearest edge pixel. All channels, alpha included, are
/// filtered. Rows are processed in parallel; each output row depends only on the source, so the
/// result is independent of scheduling.
pub fn gaussian_blur(src: &RasterBuffer, sigma: f32) -> RasterBuffer {
    let radius = kernel_radius(sigma);
    if radius == 0 {
        return src.clone();
    }

    let kernel = gaussian_kernel_q16(radius, sigma);
    let mut tmp = src.clone();
    let mut out = src.clone();
    horizontal_pass(src, &mut tmp, &kernel);
    vertical_pass(&tmp, &mut out, &kernel);
    out
}

/// Linear mix: `(1 - alpha) * original + alpha * blurred`, per channel.
pub fn blend(
    original: &RasterBuffer,
    blurred: &RasterBuffer,
    alpha: f32,
) -> BannerResult<RasterBuffer> {
    if !original.same_shape(blurred) {
        return Err(BannerError::validation(
            "blend expects buffers of identical shape",
        ));
    }
    let alpha = if alpha.is_finite() {
        alpha.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let mut out = original.clone();
    for (o, b) in out.data_mut().iter_mut().zip(blurred.data()) {
        *o = clamp_round_u8((1.0 - alpha) * f32::from(*o) + alpha * f32::from(*b));
    }
    Ok(out)
}

/// Blur `src` and mix the result back over it at weight `alpha`.
pub fn blur_blend(src: &RasterBuffer, sigma: f32, alpha: f32) -> BannerResult<RasterBuffer> {
    let blurred = gaussian_blur(src, sigma);
    blend(src, &blurred, alpha)
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> Vec<u32> {
    let r = radius as i32;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    // Center weight is 1.0, so the sum is never zero.
    let sum: f64 = weights_f.iter().sum();

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }
    weights
}

fn horizontal_pass(src: &RasterBuffer, dst: &mut RasterBuffer, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = src.width() as i32;
    let n = src.channels();
    let stride = src.row_stride();
    let src_bytes = src.data();
    dst.data_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            let src_row = &src_bytes[y * stride..(y + 1) * stride];
            for x in 0..w {
                let mut acc = [0u64; 4];
                for (ki, &kw) in k.iter().enumerate() {
                    let sx = (x + ki as i32 - radius).clamp(0, w - 1);
                    let idx = (sx as usize) * n;
                    for c in 0..n {
                        acc[c] += u64::from(kw) * u64::from(src_row[idx + c]);
                    }
                }
                let out_idx = (x as usize) * n;
                for c in 0..n {
                    row[out_idx + c] = q16_to_u8(acc[c]);
                }
            }
        });
}

fn vertical_pass(src: &RasterBuffer, dst: &mut RasterBuffer, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let h = src.height() as i32;
    let stride = src.row_stride();
    let src_bytes = src.data();
    dst.data_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| {
            let mut acc = vec![0u64; stride];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y as i32 + ki as i32 - radius).clamp(0, h - 1) as usize;
                let src_row = &src_bytes[sy * stride..(sy + 1) * stride];
                for (a, &v) in acc.iter_mut().zip(src_row) {
                    *a += u64::from(kw) * u64::from(v);
                }
            }
            for (o, a) in row.iter_mut().zip(acc) {
                *o = q16_to_u8(a);
            }
        });
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    (v.min(255)) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
