use super::*;

#[test]
fn default_is_the_classic_banner() {
    let cfg = PipelineConfig::default();
    assert_eq!(cfg, Preset::Classic.config());
    assert_eq!(cfg.canvas, Canvas::BANNER);
    assert_eq!(cfg.blur_radius, 10.0);
    assert_eq!(cfg.blend_weight, 0.48);
    assert_eq!(cfg.text.text, DEFAULT_AD_TEXT);
    assert_eq!(cfg.text.font, DEFAULT_FONT);
    assert_eq!(
        cfg.stack.iter().map(|l| l.role).collect::<Vec<_>>(),
        vec![LayerRole::Text, LayerRole::Tint, LayerRole::Blur]
    );
    cfg.validate().unwrap();
}

#[test]
fn every_preset_validates() {
    for preset in Preset::ALL {
        preset.config().validate().unwrap();
        assert_eq!(preset.name().parse::<Preset>().unwrap(), preset);
    }
    assert_eq!("AutoFit".parse::<Preset>().unwrap(), Preset::AutoFit);
    assert_eq!("auto_fit".parse::<Preset>().unwrap(), Preset::AutoFit);
    assert!("sparkly".parse::<Preset>().is_err());
}

#[test]
fn partial_json_overlays_defaults() {
    let cfg = PipelineConfig::from_json_str(
        r#"{
            "blur_radius": 17,
            "text": { "text": "SALE", "policy": { "policy": "tiled", "size_px": 30, "margin_px": 20 } },
            "stack": [ { "role": "tint" }, { "role": "text", "opacity": 0.5 } ]
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.blur_radius, 17.0);
    assert_eq!(cfg.blend_weight, 0.48);
    assert_eq!(cfg.text.text, "SALE");
    assert_eq!(cfg.text.font, DEFAULT_FONT);
    assert_eq!(
        cfg.text.policy,
        TextPolicy::Tiled {
            size_px: 30.0,
            margin_px: 20
        }
    );
    assert_eq!(cfg.stack[1], LayerSpec::new(LayerRole::Text).with_opacity(0.5));
}

#[test]
fn json_round_trips_through_pretty_form() {
    let cfg = Preset::Tiled.config();
    let json = cfg.to_json_pretty().unwrap();
    assert_eq!(PipelineConfig::from_json_str(&json).unwrap(), cfg);
}

#[test]
fn validation_rejects_out_of_range_knobs() {
    let mut cfg = PipelineConfig::default();
    cfg.blend_weight = 1.5;
    assert!(cfg.validate().is_err());

    let mut cfg = PipelineConfig::default();
    cfg.stack.clear();
    assert!(cfg.validate().is_err());

    let mut cfg = PipelineConfig::default();
    cfg.stack[0].opacity = -0.1;
    assert!(cfg.validate().is_err());

    let mut cfg = PipelineConfig::default();
    cfg.canvas = Canvas {
        width: 800,
        height: 133,
    };
    assert!(cfg.validate().is_err());

    let mut cfg = PipelineConfig::default();
    cfg.blur_radius = f32::INFINITY;
    assert!(cfg.validate().is_err());

    let mut cfg = PipelineConfig::default();
    cfg.tone.push(ToneOp::Brightness { factor: -2.0 });
    assert!(cfg.validate().is_err());
}

#[test]
fn malformed_json_is_a_validation_error() {
    let err = PipelineConfig::from_json_str("{ nope").unwrap_err();
    assert!(matches!(err, BannerError::Validation(_)));
}

#[test]
fn missing_config_file_is_reported() {
    let err = PipelineConfig::from_path("target/definitely/missing.json").unwrap_err();
    assert!(err.to_string().contains("missing.json"));
}

#[test]
fn uses_reports_stack_roles() {
    let cfg = Preset::Classic.config();
    assert!(cfg.uses(LayerRole::Text));
    assert!(!cfg.uses(LayerRole::Base));
}
