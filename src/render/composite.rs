use crate::foundation::{
    error::ShotframeResult,
    math::{mul_div255_u8, mul_div255_u16},
};

pub type PremulRgba8 = [u8; 4];

pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

fn check_pair(a: &[u8], b: &[u8], what: &str) -> ShotframeResult<()> {
    if a.len() != b.len() || !a.len().is_multiple_of(4) {
        return Err(anyhow::anyhow!("{what} expects equal-length rgba8 buffers").into());
    }
    Ok(())
}

pub fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) -> ShotframeResult<()> {
    check_pair(dst, src, "over_in_place")?;
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
        d.copy_from_slice(&out);
    }
    Ok(())
}

/// Keep `dst` only where `mask` has coverage (destination-in).
pub fn mask_in_place(dst: &mut [u8], mask: &[u8]) -> ShotframeResult<()> {
    check_pair(dst, mask, "mask_in_place")?;
    for (d, m) in dst.chunks_exact_mut(4).zip(mask.chunks_exact(4)) {
        let a = u16::from(m[3]);
        if a == 255 {
            continue;
        }
        for c in d.iter_mut() {
            *c = mul_div255_u16(u16::from(*c), a) as u8;
        }
    }
    Ok(())
}

/// Remove `dst` wherever `mask` has coverage (destination-out).
pub fn knockout_in_place(dst: &mut [u8], mask: &[u8]) -> ShotframeResult<()> {
    check_pair(dst, mask, "knockout_in_place")?;
    for (d, m) in dst.chunks_exact_mut(4).zip(mask.chunks_exact(4)) {
        let inv = 255u16 - u16::from(m[3]);
        if inv == 255 {
            continue;
        }
        for c in d.iter_mut() {
            *c = mul_div255_u16(u16::from(*c), inv) as u8;
        }
    }
    Ok(())
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
