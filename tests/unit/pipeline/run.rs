use super::*;
use crate::effects::tone::ToneOp;
use crate::foundation::core::Rgba8;
use crate::pipeline::config::{LayerSpec, Preset};
use crate::raster::buffer::PixelLayout;
use crate::text::builtin::BUILTIN_FONT_NAME;
use crate::text::layout::TextPolicy;
use crate::text::provider::{BuiltinFontProvider, DirFontProvider};

fn solid_input(w: u32, h: u32, v: u8) -> image::DynamicImage {
    image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(w, h, image::Rgb([v, v, v])))
}

fn fast(mut cfg: PipelineConfig) -> PipelineConfig {
    cfg.blur_radius = 1.0;
    cfg
}

fn builtin(cfg: PipelineConfig) -> BannerPipeline {
    BannerPipeline::new(cfg, Box::new(BuiltinFontProvider)).unwrap()
}

#[test]
fn black_input_is_fully_keyed_after_tone_stage() {
    let mut cfg = PipelineConfig::default();
    cfg.tone = vec![ToneOp::Key { threshold: 30 }];
    cfg.stack = vec![LayerSpec::new(LayerRole::Base)];

    let out = builtin(cfg).render(&solid_input(100, 50, 0)).unwrap();
    assert_eq!((out.image.width(), out.image.height()), (2000, 133));
    assert!(out.image.data().chunks_exact(4).all(|p| p[3] == 0));
    assert!(out.layout.is_none());
    assert!(out.warnings.is_empty());
}

#[test]
fn classic_output_is_opaque_banner() {
    let out = builtin(fast(Preset::Classic.config()))
        .render(&solid_input(640, 480, 90))
        .unwrap();
    assert_eq!((out.image.width(), out.image.height()), (2000, 133));
    assert_eq!(out.image.layout(), PixelLayout::Rgba);
    assert!(out.image.data().chunks_exact(4).all(|p| p[3] == 255));
    assert_eq!(out.font_used.as_deref(), Some(BUILTIN_FONT_NAME));
}

#[test]
fn overlay_text_is_visible_on_top() {
    let mut cfg = fast(Preset::Overlay.config());
    cfg.text.text = "AD".to_string();
    cfg.text.fill = Rgba8::new(255, 0, 0, 255);
    let out = builtin(cfg).render(&solid_input(10, 10, 128)).unwrap();

    let layout = out.layout.unwrap();
    let origin = layout.placements[0].origin;
    assert!(origin.x > 0 && origin.y >= 0);
    assert!(
        out.image
            .data()
            .chunks_exact(4)
            .any(|p| p == [255, 0, 0, 255])
    );
}

#[test]
fn text_below_opaque_layers_is_hidden() {
    let mut cfg = fast(Preset::Classic.config());
    cfg.text.fill = Rgba8::new(255, 0, 0, 255);
    let out = builtin(cfg).render(&solid_input(10, 10, 128)).unwrap();
    assert!(out.layout.is_some());
    assert!(!out.image.data().chunks_exact(4).any(|p| p == [255, 0, 0, 255]));
}

#[test]
fn missing_font_degrades_without_failing() {
    let dir = std::path::PathBuf::from("target").join("pipeline_no_fonts");
    std::fs::create_dir_all(&dir).unwrap();
    let mut cfg = fast(Preset::Overlay.config());
    cfg.text.font = "NoSuchFace-Bold.ttf".to_string();

    let pipeline = BannerPipeline::new(cfg, Box::new(DirFontProvider::new([dir]))).unwrap();
    let out = pipeline.render(&solid_input(30, 30, 60)).unwrap();
    assert_eq!((out.image.width(), out.image.height()), (2000, 133));
    assert_eq!(out.warnings.len(), 1);
    assert!(!out.warnings[0].is_fatal());
    assert_eq!(out.font_used.as_deref(), Some(BUILTIN_FONT_NAME));
}

#[test]
fn tiled_layout_flows_through_pipeline() {
    let mut cfg = fast(Preset::Tiled.config());
    cfg.text.text = "SALE".to_string();
    cfg.text.policy = TextPolicy::Tiled {
        size_px: 16.0,
        margin_px: 20,
    };
    let out = builtin(cfg).render(&solid_input(50, 20, 200)).unwrap();
    let layout = out.layout.unwrap();
    // builtin at 16px: 46x16 box, pitch 66x36.
    assert_eq!(layout.grid, (31, 4));
    assert_eq!(layout.placements.len(), 31 * 4);
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let mut cfg = PipelineConfig::default();
    cfg.blend_weight = 2.0;
    assert!(BannerPipeline::new(cfg, Box::new(BuiltinFontProvider)).is_err());
}

#[test]
fn render_bytes_reports_decode_errors() {
    let err = builtin(PipelineConfig::default())
        .render_bytes(b"\x89PNG but not really")
        .err()
        .unwrap();
    assert!(matches!(err, BannerError::Decode(_)));
}

#[test]
fn oversized_fallback_text_still_renders() {
    let mut cfg = fast(Preset::Overlay.config());
    cfg.text.policy = TextPolicy::Centered { size_px: 1.0e9 };
    let out = builtin(cfg).render(&solid_input(8, 8, 100)).unwrap();
    assert_eq!((out.image.width(), out.image.height()), (2000, 133));
    assert_eq!(out.layout.unwrap().text_box.width, u32::MAX);
}
