use crate::foundation::core::Canvas;
use crate::foundation::error::{BannerError, BannerResult};
use crate::foundation::math::{mul_div255_u8, unit_to_u8};
use crate::raster::buffer::{PixelLayout, RasterBuffer};

/// What a layer contributes to the banner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerRole {
    /// Normalized, tone-mapped photo.
    Base,
    /// Photo mixed with its Gaussian-blurred copy.
    Blur,
    /// Sepia-tinted photo.
    Tint,
    /// Transparent layer carrying the ad text.
    Text,
}

/// A raster with a compositing role and a uniform opacity in `[0, 1]`.
#[derive(Clone, Debug)]
pub struct Layer {
    /// Compositing role.
    pub role: LayerRole,
    /// Pixels; RGB layers are treated as opaque.
    pub buffer: RasterBuffer,
    /// Uniform opacity multiplier applied to the alpha channel before compositing.
    pub opacity: f32,
}

impl Layer {
    /// Fully opaque layer.
    pub fn new(role: LayerRole, buffer: RasterBuffer) -> Self {
        Self {
            role,
            buffer,
            opacity: 1.0,
        }
    }

    /// Replace the uniform opacity.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Bake the uniform opacity into per-pixel alpha and return an RGBA raster.
    pub fn flatten(self) -> RasterBuffer {
        let mut buf = self.buffer.into_rgba();
        let op = if self.opacity.is_finite() {
            unit_to_u8(self.opacity.clamp(0.0, 1.0))
        } else {
            0
        };
        if op < 255 {
            for px in buf.data_mut().chunks_exact_mut(4) {
                px[3] = mul_div255_u8(u16::from(px[3]), u16::from(op));
            }
        }
        buf
    }
}

/// Porter-Duff "over" on straight-alpha RGBA8 pixels.
///
/// Computed in `[0, 1]`: `a = ta + ba*(1-ta)` and `rgb = (t*ta + b*ba*(1-ta)) / a`, then
/// re-quantized. A fully transparent result has zero color.
pub fn over(bottom: [u8; 4], top: [u8; 4]) -> [u8; 4] {
    if top[3] == 255 {
        return top;
    }
    if top[3] == 0 {
        return bottom;
    }
    let ta = f32::from(top[3]) / 255.0;
    let ba = f32::from(bottom[3]) / 255.0;
    let bw = ba * (1.0 - ta);
    let oa = ta + bw;
    if oa <= 0.0 {
        return [0, 0, 0, 0];
    }

    let mut out = [0u8; 4];
    for c in 0..3 {
        let t = f32::from(top[c]) / 255.0;
        let b = f32::from(bottom[c]) / 255.0;
        out[c] = unit_to_u8((t * ta + b * bw) / oa);
    }
    out[3] = unit_to_u8(oa);
    out
}

/// Composite `src` over `dst`; both must be RGBA of identical size.
pub fn over_in_place(dst: &mut RasterBuffer, src: &RasterBuffer) -> BannerResult<()> {
    if !dst.same_shape(src) || dst.layout() != PixelLayout::Rgba {
        return Err(BannerError::validation(
            "over_in_place expects equal-shape rgba8 buffers",
        ));
    }
    for (d, s) in dst
        .data_mut()
        .chunks_exact_mut(4)
        .zip(src.data().chunks_exact(4))
    {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]]);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Fold `layers` (bottom first) into one RGBA raster with [`over`].
///
/// Every layer must cover exactly `canvas`. Uniform opacities are baked into alpha before any
/// blending happens.
pub fn composite_stack(layers: Vec<Layer>, canvas: Canvas) -> BannerResult<RasterBuffer> {
    for layer in &layers {
        if layer.buffer.canvas() != canvas {
            return Err(BannerError::validation(format!(
                "{:?} layer is {}x{}, canvas is {}x{}",
                layer.role,
                layer.buffer.width(),
                layer.buffer.height(),
                canvas.width,
                canvas.height
            )));
        }
    }

    let mut flattened = layers.into_iter().map(Layer::flatten);
    let mut acc = flattened
        .next()
        .ok_or_else(|| BannerError::validation("layer stack must not be empty"))?;
    for top in flattened {
        over_in_place(&mut acc, &top)?;
    }
    Ok(acc)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
