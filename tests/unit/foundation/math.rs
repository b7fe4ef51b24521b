use super::*;

#[test]
fn mul_div255_rounds_to_nearest() {
    assert_eq!(mul_div255_u8(255, 255), 255);
    assert_eq!(mul_div255_u8(128, 255), 128);
    assert_eq!(mul_div255_u8(0, 200), 0);
    assert_eq!(mul_div255_u16(100, 128), 50);
}

#[test]
fn float_channels_saturate() {
    assert_eq!(clamp_round_u8(-3.0), 0);
    assert_eq!(clamp_round_u8(300.0), 255);
    assert_eq!(clamp_round_u8(127.5), 128);
    assert_eq!(clamp_round_u8(f32::NAN), 0);
    assert_eq!(unit_to_u8(1.0), 255);
    assert_eq!(unit_to_u8(0.5), 128);
}
