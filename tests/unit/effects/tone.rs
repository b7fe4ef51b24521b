use super::*;
use crate::raster::buffer::PixelLayout;

fn rgb(data: &[u8]) -> RasterBuffer {
    RasterBuffer::from_raw((data.len() / 3) as u32, 1, PixelLayout::Rgb, data.to_vec()).unwrap()
}

fn gradient() -> RasterBuffer {
    let data: Vec<u8> = (0..=255u8)
        .flat_map(|v| [v, v.wrapping_mul(7), 255 - v])
        .collect();
    RasterBuffer::from_raw(16, 16, PixelLayout::Rgb, data).unwrap()
}

#[test]
fn grayscale_produces_equal_channels() {
    let out = grayscale(gradient());
    assert!(out.data().chunks_exact(3).all(|p| p[0] == p[1] && p[1] == p[2]));
    assert_eq!(grayscale(rgb(&[255, 0, 0])).data(), &[76, 76, 76]);
}

#[test]
fn grayscale_is_idempotent() {
    let once = grayscale(gradient());
    let twice = grayscale(once.clone());
    assert_eq!(once, twice);
}

#[test]
fn brightness_scales_and_saturates() {
    let out = brightness(rgb(&[0, 100, 250]), 1.1);
    assert_eq!(out.data(), &[0, 110, 255]);
}

#[test]
fn contrast_pivots_on_mid_gray() {
    let out = contrast(rgb(&[128, 28, 228]), 0.9);
    assert_eq!(out.data(), &[128, 38, 218]);
    let hard = contrast(rgb(&[0, 255, 128]), 10.0);
    assert_eq!(hard.data(), &[0, 255, 128]);
}

#[test]
fn sepia_multiplies_channels_independently() {
    let out = sepia(rgb(&[100, 100, 100, 240, 10, 1]), SepiaFactors::default());
    assert_eq!(out.data(), &[120, 100, 80, 255, 10, 1]);
}

#[test]
fn tone_ops_keep_alpha_untouched() {
    let buf = RasterBuffer::from_raw(1, 1, PixelLayout::Rgba, vec![10, 20, 30, 77]).unwrap();
    let out = apply_tone_ops(
        buf,
        &[
            ToneOp::Grayscale,
            ToneOp::Brightness { factor: 3.0 },
            ToneOp::Contrast { factor: 2.0 },
        ],
    );
    assert_eq!(out.data()[3], 77);
}

#[test]
fn every_op_stays_in_range_for_extreme_factors() {
    let ops = [
        ToneOp::Brightness { factor: 1e6 },
        ToneOp::Contrast { factor: 1e6 },
        ToneOp::Sepia {
            factors: SepiaFactors {
                r: 9.0,
                g: 0.0,
                b: 100.0,
            },
        },
    ];
    for op in ops {
        let out = apply_tone(gradient(), op);
        assert_eq!(out.data().len(), 16 * 16 * 3);
    }

    let src = gradient();
    let out = brightness(src.clone(), 1e6);
    for (s, o) in src.data().iter().zip(out.data()) {
        assert_eq!(*o, if *s == 0 { 0 } else { 255 });
    }
}

#[test]
fn keying_clears_alpha_of_near_black_only() {
    let out = key_transparency(rgb(&[0, 0, 0, 29, 29, 29, 30, 0, 0, 200, 200, 200]), 30);
    assert_eq!(out.layout(), PixelLayout::Rgba);
    let alphas: Vec<u8> = out.data().chunks_exact(4).map(|p| p[3]).collect();
    assert_eq!(alphas, vec![0, 0, 255, 255]);
}

#[test]
fn keying_preserves_existing_alpha_elsewhere() {
    let buf =
        RasterBuffer::from_raw(2, 1, PixelLayout::Rgba, vec![5, 5, 5, 200, 90, 90, 90, 150])
            .unwrap();
    let out = key_transparency(buf, DEFAULT_KEY_THRESHOLD);
    assert_eq!(out.data(), &[5, 5, 5, 0, 90, 90, 90, 150]);
}

#[test]
fn validate_rejects_bad_factors() {
    assert!(ToneOp::Brightness { factor: -1.0 }.validate().is_err());
    assert!(ToneOp::Contrast { factor: f32::NAN }.validate().is_err());
    assert!(ToneOp::Brightness { factor: 1.1 }.validate().is_ok());
}

#[test]
fn tone_ops_deserialize_from_tagged_json() {
    let ops: Vec<ToneOp> = serde_json::from_str(
        r#"[{"op":"grayscale"},{"op":"brightness","factor":1.1},{"op":"key"},{"op":"sepia"}]"#,
    )
    .unwrap();
    assert_eq!(ops[0], ToneOp::Grayscale);
    assert_eq!(ops[1], ToneOp::Brightness { factor: 1.1 });
    assert_eq!(ops[2], ToneOp::Key { threshold: 30 });
    assert_eq!(
        ops[3],
        ToneOp::Sepia {
            factors: SepiaFactors::default()
        }
    );
}
