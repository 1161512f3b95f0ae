use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn clamped_progress_bounds() {
    assert_eq!(clamped_progress(0, 10), 0.0);
    assert_eq!(clamped_progress(5, 10), 0.5);
    assert_eq!(clamped_progress(20, 10), 1.0);
    assert_eq!(clamped_progress(3, 0), 0.0);
}

#[test]
fn unit_to_u8_endpoints() {
    assert_eq!(unit_to_u8(0.0), 0);
    assert_eq!(unit_to_u8(1.0), 255);
    assert_eq!(unit_to_u8(2.0), 255);
    assert_eq!(unit_to_u8(-1.0), 0);
}
