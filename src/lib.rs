//! Bannerforge turns an arbitrary photo into a 2000x133 ad banner.
//!
//! The pipeline is a fixed chain of CPU raster stages:
//!
//! - Decode the input and stretch it onto the banner canvas ([`raster::normalize`])
//! - Apply tone ops such as grayscale, brightness, contrast, sepia and keying ([`effects::tone`])
//! - Build a blurred copy blended with the original ([`effects::blur`])
//! - Lay out and draw the ad text ([`text`])
//! - Stack the layers with Porter-Duff "over" ([`effects::composite`])
//!
//! [`BannerPipeline`] ties the stages together from a [`PipelineConfig`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Image decoding and PNG encoding.
pub mod assets;
/// Tone, blur and compositing stages.
pub mod effects;
/// Configuration, presets and the orchestrator.
pub mod pipeline;
/// Owned pixel buffers and canvas normalization.
pub mod raster;
/// Typefaces, font lookup and text layout.
pub mod text;

pub use crate::foundation::core::{BANNER_HEIGHT, BANNER_WIDTH, Canvas, PixelPos, Rgba8};
pub use crate::foundation::error::{BannerError, BannerResult};

pub use crate::effects::composite::LayerRole;
pub use crate::pipeline::config::{LayerSpec, PipelineConfig, Preset, TextConfig};
pub use crate::pipeline::run::{BannerOutput, BannerPipeline};
pub use crate::raster::buffer::{PixelLayout, RasterBuffer};
pub use crate::text::layout::{TextLayoutResult, TextPolicy};
pub use crate::text::provider::{BuiltinFontProvider, DirFontProvider, FontProvider};
