use crate::{
    assets::decode::PreparedImage,
    foundation::{
        core::Rgba8Premul,
        error::{CarfitError, CarfitResult},
    },
    render::compositor::FrameRGBA,
};

/// Source-over for premultiplied pixels.
pub fn over(dst: Rgba8Premul, src: Rgba8Premul, opacity: f32) -> Rgba8Premul {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Composite a same-sized buffer over `dst`.
pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> CarfitResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(CarfitError::asset(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Composite `src` over `dst` with its top-left corner at `(x, y)`, clipping to `dst`.
pub fn blit_over(dst: &mut FrameRGBA, src: &PreparedImage, x: i64, y: i64) {
    let dst_w = i64::from(dst.width);
    let dst_h = i64::from(dst.height);
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + i64::from(src.width)).min(dst_w);
    let y1 = (y + i64::from(src.height)).min(dst_h);
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let src_w = src.width as usize;
    let run = (x1 - x0) as usize * 4;
    for dy in y0..y1 {
        let sy = (dy - y) as usize;
        let sx = (x0 - x) as usize;
        let s_start = (sy * src_w + sx) * 4;
        let d_start = (dy as usize * dst.width as usize + x0 as usize) * 4;
        let s_row = &src.rgba8_premul[s_start..s_start + run];
        let d_row = &mut dst.data[d_start..d_start + run];
        for (d, s) in d_row.chunks_exact_mut(4).zip(s_row.chunks_exact(4)) {
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], 1.0);
            d.copy_from_slice(&out);
        }
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/blend.rs"]
mod tests;
