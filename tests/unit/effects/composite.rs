use super::*;
use crate::foundation::core::Rgba8;

fn solid(w: u32, h: u32, px: [u8; 4]) -> RasterBuffer {
    RasterBuffer::filled(w, h, Rgba8::new(px[0], px[1], px[2], px[3])).unwrap()
}

fn small() -> Canvas {
    Canvas {
        width: 3,
        height: 2,
    }
}

#[test]
fn over_transparent_top_is_noop() {
    assert_eq!(over([10, 20, 30, 40], [255, 255, 255, 0]), [10, 20, 30, 40]);
}

#[test]
fn over_opaque_top_replaces_bottom() {
    assert_eq!(over([0, 0, 0, 255], [255, 0, 0, 255]), [255, 0, 0, 255]);
}

#[test]
fn over_transparent_bottom_returns_top() {
    assert_eq!(over([0, 0, 0, 0], [100, 110, 120, 200]), [100, 110, 120, 200]);
}

#[test]
fn over_half_alpha_on_opaque_mixes_evenly() {
    let out = over([0, 0, 0, 255], [255, 255, 255, 128]);
    assert_eq!(out[3], 255);
    assert_eq!(out[0], 128);
}

#[test]
fn over_two_semi_transparent_layers_accumulates_alpha() {
    // 0.502 + 0.502 * 0.498 ~= 0.752
    let out = over([0, 0, 255, 128], [255, 0, 0, 128]);
    assert_eq!(out[3], 192);
    assert!(out[0] > out[2]);
}

#[test]
fn flatten_bakes_uniform_opacity_into_alpha() {
    let layer = Layer::new(LayerRole::Tint, solid(1, 1, [9, 9, 9, 255])).with_opacity(0.5);
    assert_eq!(layer.flatten().data(), &[9, 9, 9, 128]);

    let rgb = RasterBuffer::new(1, 1, PixelLayout::Rgb).unwrap();
    let flat = Layer::new(LayerRole::Base, rgb).flatten();
    assert_eq!(flat.data(), &[0, 0, 0, 255]);
}

#[test]
fn stack_fold_matches_pairwise_composition() {
    let a = solid(3, 2, [200, 10, 10, 255]);
    let b = solid(3, 2, [10, 200, 10, 90]);
    let c = solid(3, 2, [10, 10, 200, 150]);

    let folded = composite_stack(
        vec![
            Layer::new(LayerRole::Base, a.clone()),
            Layer::new(LayerRole::Tint, b.clone()),
            Layer::new(LayerRole::Text, c.clone()),
        ],
        small(),
    )
    .unwrap();

    let mut ab = a;
    over_in_place(&mut ab, &b).unwrap();
    over_in_place(&mut ab, &c).unwrap();
    assert_eq!(folded, ab);
}

#[test]
fn binary_alpha_stacks_are_associative() {
    let a = solid(3, 2, [200, 10, 10, 255]);
    let b = solid(3, 2, [10, 200, 10, 0]);
    let c = solid(3, 2, [10, 10, 200, 255]);

    let mut left = a.clone();
    over_in_place(&mut left, &b).unwrap();
    over_in_place(&mut left, &c).unwrap();

    let mut bc = b;
    over_in_place(&mut bc, &c).unwrap();
    let mut right = a;
    over_in_place(&mut right, &bc).unwrap();

    assert_eq!(left, right);
}

#[test]
fn opacity_is_applied_before_compositing() {
    let base = solid(3, 2, [0, 0, 0, 255]);
    let top = solid(3, 2, [255, 255, 255, 255]);
    let out = composite_stack(
        vec![
            Layer::new(LayerRole::Base, base),
            Layer::new(LayerRole::Blur, top).with_opacity(0.5),
        ],
        small(),
    )
    .unwrap();
    assert_eq!(out.pixel(0, 0), Some(Rgba8::new(128, 128, 128, 255)));
}

#[test]
fn stack_rejects_empty_and_mismatched_layers() {
    assert!(composite_stack(vec![], small()).is_err());
    let wrong = Layer::new(LayerRole::Base, solid(4, 2, [0, 0, 0, 255]));
    assert!(matches!(
        composite_stack(vec![wrong], small()).unwrap_err(),
        BannerError::Validation(_)
    ));
}
