use super::*;

fn ink(buf: &RasterBuffer) -> usize {
    buf.data().chunks_exact(4).filter(|p| p[3] != 0).count()
}

#[test]
fn scale_tracks_requested_size() {
    assert_eq!(BuiltinTypeface::scale_for(8.0), 1);
    assert_eq!(BuiltinTypeface::scale_for(1.0), 1);
    assert_eq!(BuiltinTypeface::scale_for(95.0), 12);
    assert_eq!(BuiltinTypeface::scale_for(f32::NAN), 1);
}

#[test]
fn measure_uses_fixed_advance_and_line_box() {
    let mut face = BuiltinTypeface;
    let b = face.measure("AD", 16.0).unwrap();
    assert_eq!((b.width, b.height), (22, 16));
    assert_eq!(b.ascent + b.descent, 16.0);
    assert_eq!(face.measure("", 16.0).unwrap().width, 0);
}

#[test]
fn draw_inks_only_glyph_cells() {
    let mut face = BuiltinTypeface;
    let mut buf = RasterBuffer::new(10, 10, PixelLayout::Rgba).unwrap();
    face.draw("I", 8.0, &[PixelPos::new(0, 0)], Rgba8::black(), &mut buf)
        .unwrap();
    // 'I' has 3 + 1*5 + 3 lit cells.
    assert_eq!(ink(&buf), 11);
    assert_eq!(buf.pixel(2, 3), Some(Rgba8::black()));
    assert_eq!(buf.pixel(0, 3), Some(Rgba8::transparent()));
}

#[test]
fn lowercase_matches_uppercase_and_unknown_is_boxed() {
    let mut face = BuiltinTypeface;
    let mut lower = RasterBuffer::new(12, 8, PixelLayout::Rgba).unwrap();
    let mut upper = lower.clone();
    face.draw("ab", 8.0, &[PixelPos::new(0, 0)], Rgba8::black(), &mut lower)
        .unwrap();
    face.draw("AB", 8.0, &[PixelPos::new(0, 0)], Rgba8::black(), &mut upper)
        .unwrap();
    assert_eq!(lower, upper);

    let mut boxed = RasterBuffer::new(6, 8, PixelLayout::Rgba).unwrap();
    face.draw("\u{263A}", 8.0, &[PixelPos::new(0, 0)], Rgba8::black(), &mut boxed)
        .unwrap();
    assert_eq!(ink(&boxed), 5 + 5 + 2 * 5);
}

#[test]
fn draw_clips_partially_visible_glyphs() {
    let mut face = BuiltinTypeface;
    let mut buf = RasterBuffer::new(4, 4, PixelLayout::Rgba).unwrap();
    face.draw(
        "HH",
        16.0,
        &[PixelPos::new(-3, -3), PixelPos::new(2, 2)],
        Rgba8::new(255, 0, 0, 255),
        &mut buf,
    )
    .unwrap();
    assert!(ink(&buf) > 0);
    assert!(
        buf.data()
            .chunks_exact(4)
            .all(|p| p[3] == 0 || p == [255, 0, 0, 255])
    );
}

#[test]
fn draw_requires_rgba_target() {
    let mut face = BuiltinTypeface;
    let mut buf = RasterBuffer::new(4, 4, PixelLayout::Rgb).unwrap();
    assert!(
        face.draw("A", 8.0, &[PixelPos::new(0, 0)], Rgba8::black(), &mut buf)
            .is_err()
    );
}

#[test]
fn huge_sizes_saturate_instead_of_overflowing() {
    let b = BuiltinTypeface
        .measure("FLUORINES COOL CLOTHING SHOP!!", 1.0e9)
        .unwrap();
    assert_eq!(b.width, u32::MAX);
    assert_eq!(b.height, 8 * 125_000_000);

    let b = BuiltinTypeface.measure("AD", f32::MAX).unwrap();
    assert_eq!((b.width, b.height), (u32::MAX, u32::MAX));
}
