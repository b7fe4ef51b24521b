use std::path::Path;

use anyhow::Context as _;

use crate::effects::composite::LayerRole;
use crate::effects::tone::{DEFAULT_KEY_THRESHOLD, SepiaFactors, ToneOp};
use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{BannerError, BannerResult};
use crate::text::layout::TextPolicy;

/// Default ad string.
pub const DEFAULT_AD_TEXT: &str = "FLUORINES COOL CLOTHING SHOP!!";
/// Default logical font name.
pub const DEFAULT_FONT: &str = "DejaVuSans-Bold.ttf";
/// Default fixed font size in pixels.
pub const DEFAULT_FONT_SIZE_PX: f32 = 95.0;

/// One entry of the layer stack.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerSpec {
    /// Which buffer feeds this layer.
    pub role: LayerRole,
    /// Uniform opacity in `[0, 1]`, baked into alpha before compositing.
    #[serde(default = "one")]
    pub opacity: f32,
    /// Key near-black pixels of this layer to transparent.
    #[serde(default)]
    pub key: bool,
}

fn one() -> f32 {
    1.0
}

impl LayerSpec {
    /// Opaque, unkeyed layer.
    pub fn new(role: LayerRole) -> Self {
        Self {
            role,
            opacity: 1.0,
            key: false,
        }
    }

    /// Replace the opacity.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Enable transparency keying.
    pub fn keyed(mut self) -> Self {
        self.key = true;
        self
    }
}

/// Ad text settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// String to render.
    pub text: String,
    /// Logical font name requested from the font provider.
    pub font: String,
    /// Placement policy.
    pub policy: TextPolicy,
    /// Fill color with straight alpha.
    pub fill: Rgba8,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            text: DEFAULT_AD_TEXT.to_string(),
            font: DEFAULT_FONT.to_string(),
            policy: TextPolicy::Centered {
                size_px: DEFAULT_FONT_SIZE_PX,
            },
            fill: Rgba8::black(),
        }
    }
}

/// Every knob of the banner pipeline.
///
/// Missing JSON fields fall back to [`Preset::Classic`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Output canvas; only the 2000x133 banner is supported.
    pub canvas: Canvas,
    /// Tone ops applied, in order, to the normalized photo. The result is the `base` layer and
    /// the source of `blur` and `tint`.
    pub tone: Vec<ToneOp>,
    /// Multipliers of the `tint` layer.
    pub sepia: SepiaFactors,
    /// Gaussian standard deviation of the `blur` layer, in pixels.
    pub blur_radius: f32,
    /// Weight of the blurred copy in the `blur` layer mix.
    pub blend_weight: f32,
    /// Threshold for layers with `key` set.
    pub key_threshold: u8,
    /// Ad text settings.
    pub text: TextConfig,
    /// Layers bottom to top.
    pub stack: Vec<LayerSpec>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Preset::Classic.config()
    }
}

impl PipelineConfig {
    /// Parse a JSON document layered over the defaults.
    pub fn from_json_str(s: &str) -> BannerResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| BannerError::validation(format!("invalid pipeline config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read and parse a JSON config file.
    pub fn from_path(path: impl AsRef<Path>) -> BannerResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read pipeline config '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Pretty JSON form.
    pub fn to_json_pretty(&self) -> BannerResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| BannerError::Other(e.into()))
    }

    /// Check every knob; the pipeline refuses to start on a bad config.
    pub fn validate(&self) -> BannerResult<()> {
        if self.canvas != Canvas::BANNER {
            return Err(BannerError::validation(format!(
                "canvas must be {}x{}, got {}x{}",
                Canvas::BANNER.width,
                Canvas::BANNER.height,
                self.canvas.width,
                self.canvas.height
            )));
        }
        for op in &self.tone {
            op.validate()?;
        }
        ToneOp::Sepia {
            factors: self.sepia,
        }
        .validate()?;
        if !self.blur_radius.is_finite() || self.blur_radius < 0.0 {
            return Err(BannerError::validation(
                "blur_radius must be finite and >= 0",
            ));
        }
        if !(0.0..=1.0).contains(&self.blend_weight) {
            return Err(BannerError::validation("blend_weight must be in [0, 1]"));
        }
        self.text.policy.validate()?;
        if self.stack.is_empty() {
            return Err(BannerError::validation("layer stack must not be empty"));
        }
        for layer in &self.stack {
            if !(0.0..=1.0).contains(&layer.opacity) {
                return Err(BannerError::validation(format!(
                    "{:?} layer opacity must be in [0, 1], got {}",
                    layer.role, layer.opacity
                )));
            }
        }
        Ok(())
    }

    /// `true` when some layer consumes `role`.
    pub fn uses(&self, role: LayerRole) -> bool {
        self.stack.iter().any(|l| l.role == role)
    }
}

/// Named pipeline variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Preset {
    /// Text at the bottom under opaque tint and blur layers, blur 10 at weight 0.48.
    Classic,
    /// Text on top of tint and blur.
    Overlay,
    /// Text at the bottom, image layers partially transparent so it shows through.
    Underlay,
    /// Overlay with the text grown to fill the banner.
    AutoFit,
    /// Semi-transparent repeating text over a heavier blur.
    Tiled,
    /// Text at the bottom, near-black image pixels keyed out.
    Keyed,
}

impl Preset {
    /// Every preset, in display order.
    pub const ALL: [Preset; 6] = [
        Preset::Classic,
        Preset::Overlay,
        Preset::Underlay,
        Preset::AutoFit,
        Preset::Tiled,
        Preset::Keyed,
    ];

    /// Lowercase name used on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Self::Classic => "classic",
            Self::Overlay => "overlay",
            Self::Underlay => "underlay",
            Self::AutoFit => "auto-fit",
            Self::Tiled => "tiled",
            Self::Keyed => "keyed",
        }
    }

    /// Build the configuration for this preset.
    pub fn config(self) -> PipelineConfig {
        let mut cfg = PipelineConfig {
            canvas: Canvas::BANNER,
            tone: vec![
                ToneOp::Grayscale,
                ToneOp::Brightness { factor: 1.1 },
                ToneOp::Contrast { factor: 0.9 },
            ],
            sepia: SepiaFactors::default(),
            blur_radius: 10.0,
            blend_weight: 0.48,
            key_threshold: DEFAULT_KEY_THRESHOLD,
            text: TextConfig::default(),
            stack: vec![
                LayerSpec::new(LayerRole::Text),
                LayerSpec::new(LayerRole::Tint),
                LayerSpec::new(LayerRole::Blur),
            ],
        };
        let above = vec![
            LayerSpec::new(LayerRole::Tint),
            LayerSpec::new(LayerRole::Blur),
            LayerSpec::new(LayerRole::Text),
        ];

        match self {
            Self::Classic => {}
            Self::Overlay => {
                cfg.stack = above;
                cfg.text.fill = Rgba8::new(255, 255, 255, 255);
            }
            Self::Underlay => {
                cfg.stack = vec![
                    LayerSpec::new(LayerRole::Text),
                    LayerSpec::new(LayerRole::Tint).with_opacity(0.6),
                    LayerSpec::new(LayerRole::Blur).with_opacity(0.5),
                ];
            }
            Self::AutoFit => {
                cfg.stack = above;
                cfg.text.fill = Rgba8::new(255, 255, 255, 255);
                cfg.text.policy = TextPolicy::AutoFit {
                    start_px: 10.0,
                    step_px: 2.0,
                    max_px: None,
                    fill_ratio: 0.98,
                };
            }
            Self::Tiled => {
                cfg.stack = above;
                cfg.blur_radius = 17.0;
                cfg.blend_weight = 0.5;
                cfg.text.fill = Rgba8::new(0, 0, 0, 150);
                cfg.text.policy = TextPolicy::Tiled {
                    size_px: 40.0,
                    margin_px: 30,
                };
            }
            Self::Keyed => {
                cfg.stack = vec![
                    LayerSpec::new(LayerRole::Text),
                    LayerSpec::new(LayerRole::Tint).keyed(),
                    LayerSpec::new(LayerRole::Blur).keyed().with_opacity(0.5),
                ];
            }
        }
        cfg
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Preset {
    type Err = BannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|p| p.name() == key || (key == "autofit" && *p == Self::AutoFit))
            .ok_or_else(|| BannerError::validation(format!("unknown preset '{s}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/config.rs"]
mod tests;
