use std::sync::Arc;

use super::*;

fn solid(width: u32, height: u32, px: [u8; 4]) -> PreparedImage {
    PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(px.repeat((width * height) as usize)),
    }
}

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src, 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_half_alpha_mixes() {
    let dst = [0, 0, 255, 255];
    let src = [128, 0, 0, 128];
    let out = over(dst, src, 1.0);
    assert_eq!(out[3], 255);
    assert_eq!(out[0], 128);
    assert_eq!(out[2], 127);
}

#[test]
fn over_in_place_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4], 1.0).is_err());
    over_in_place(&mut dst, &[9, 9, 9, 255, 0, 0, 0, 0], 1.0).unwrap();
    assert_eq!(dst, [9, 9, 9, 255, 0, 0, 0, 0]);
}

#[test]
fn blit_over_places_and_clips() {
    let mut frame = FrameRGBA::filled(4, 4, [0, 0, 0, 255]);
    let red = solid(2, 2, [255, 0, 0, 255]);

    blit_over(&mut frame, &red, 3, -1);
    assert_eq!(frame.pixel(3, 0), [255, 0, 0, 255]);
    assert_eq!(frame.pixel(2, 0), [0, 0, 0, 255]);
    assert_eq!(frame.pixel(3, 1), [0, 0, 0, 255]);

    blit_over(&mut frame, &red, 1, 1);
    assert_eq!(frame.pixel(1, 1), [255, 0, 0, 255]);
    assert_eq!(frame.pixel(2, 2), [255, 0, 0, 255]);
    assert_eq!(frame.pixel(0, 0), [0, 0, 0, 255]);

    // Fully outside is a no-op.
    let before = frame.clone();
    blit_over(&mut frame, &red, 10, 10);
    blit_over(&mut frame, &red, -5, 0);
    assert_eq!(frame.data, before.data);
}
