use crate::assets::codec::{decode_image, encode_png};
use crate::effects::blur::blur_blend;
use crate::effects::composite::{Layer, LayerRole, composite_stack};
use crate::effects::tone::{apply_tone_ops, key_transparency, sepia};
use crate::foundation::error::{BannerError, BannerResult};
use crate::pipeline::config::PipelineConfig;
use crate::raster::buffer::RasterBuffer;
use crate::raster::normalize::normalize_to_canvas;
use crate::text::layout::{TextLayoutResult, layout_text, render_text_layer};
use crate::text::provider::{FontProvider, resolve_typeface};

/// Result of one banner invocation.
#[derive(Debug)]
pub struct BannerOutput {
    /// Final RGBA raster covering the canvas.
    pub image: RasterBuffer,
    /// Text placement, when the stack contains a text layer.
    pub layout: Option<TextLayoutResult>,
    /// Name of the typeface that actually drew the text.
    pub font_used: Option<String>,
    /// Recovered problems, e.g. [`BannerError::FontUnavailable`].
    pub warnings: Vec<BannerError>,
}

/// A validated configuration bound to a font source.
pub struct BannerPipeline {
    config: PipelineConfig,
    fonts: Box<dyn FontProvider>,
}

/// Intermediate buffers, each produced at most once per invocation.
#[derive(Default)]
struct RoleBuffers {
    base: Option<RasterBuffer>,
    blur: Option<RasterBuffer>,
    tint: Option<RasterBuffer>,
    text: Option<RasterBuffer>,
}

impl RoleBuffers {
    fn get(&self, role: LayerRole) -> Option<&RasterBuffer> {
        match role {
            LayerRole::Base => self.base.as_ref(),
            LayerRole::Blur => self.blur.as_ref(),
            LayerRole::Tint => self.tint.as_ref(),
            LayerRole::Text => self.text.as_ref(),
        }
    }
}

impl BannerPipeline {
    /// Validate `config` and bind it to `fonts`.
    pub fn new(config: PipelineConfig, fonts: Box<dyn FontProvider>) -> BannerResult<Self> {
        config.validate()?;
        Ok(Self { config, fonts })
    }

    /// The active configuration.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the full chain on a decoded image.
    #[tracing::instrument(skip(self, input), fields(src_w = input.width(), src_h = input.height()))]
    pub fn render(&self, input: &image::DynamicImage) -> BannerResult<BannerOutput> {
        let cfg = &self.config;
        let canvas = cfg.canvas;

        let base = normalize_to_canvas(input, canvas)?;
        let base = apply_tone_ops(base, &cfg.tone);
        tracing::debug!(ops = cfg.tone.len(), "applied tone ops");

        let mut buffers = RoleBuffers::default();
        if cfg.uses(LayerRole::Blur) {
            buffers.blur = Some(blur_blend(&base, cfg.blur_radius, cfg.blend_weight)?);
            tracing::debug!(
                radius = cfg.blur_radius,
                weight = cfg.blend_weight,
                "built blur layer"
            );
        }
        if cfg.uses(LayerRole::Tint) {
            buffers.tint = Some(sepia(base.clone(), cfg.sepia));
        }

        let mut warnings = Vec::new();
        let mut layout = None;
        let mut font_used = None;
        if cfg.uses(LayerRole::Text) {
            let (mut face, warning) = resolve_typeface(self.fonts.as_ref(), &cfg.text.font);
            warnings.extend(warning);
            let placed = layout_text(face.as_mut(), &cfg.text.text, cfg.text.policy, canvas)?;
            buffers.text = Some(render_text_layer(
                face.as_mut(),
                &placed,
                cfg.text.fill,
                canvas,
            )?);
            font_used = Some(face.name().to_string());
            layout = Some(placed);
        }
        if cfg.uses(LayerRole::Base) {
            buffers.base = Some(base);
        }

        let mut layers = Vec::with_capacity(cfg.stack.len());
        for entry in &cfg.stack {
            let buf = buffers
                .get(entry.role)
                .cloned()
                .ok_or_else(|| BannerError::validation(format!("{:?} layer missing", entry.role)))?;
            let buf = if entry.key {
                key_transparency(buf, cfg.key_threshold)
            } else {
                buf
            };
            layers.push(Layer::new(entry.role, buf).with_opacity(entry.opacity));
        }

        let image = composite_stack(layers, canvas)?;
        tracing::debug!(
            layers = cfg.stack.len(),
            warnings = warnings.len(),
            "composited banner"
        );
        Ok(BannerOutput {
            image,
            layout,
            font_used,
            warnings,
        })
    }

    /// Host entry point: encoded input bytes in, PNG bytes out.
    pub fn render_bytes(&self, input: &[u8]) -> BannerResult<(Vec<u8>, BannerOutput)> {
        let img = decode_image(input)?;
        let out = self.render(&img)?;
        let png = encode_png(&out.image)?;
        Ok((png, out))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/run.rs"]
mod tests;
