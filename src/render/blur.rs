use rayon::prelude::*;

use crate::foundation::{
    error::{ShotframeError, ShotframeResult},
    math::rgba8_len,
};

/// Above this sigma the exact kernel gets expensive; three box passes approximate it.
const BOX_BLUR_SIGMA_THRESHOLD: f32 = 6.0;

/// Gaussian blur of a premultiplied RGBA8 buffer with clamped edges.
pub fn blur_rgba8_premul(
    src: &[u8],
    width: u32,
    height: u32,
    sigma: f32,
) -> ShotframeResult<Vec<u8>> {
    let expected_len =
        rgba8_len(width, height).ok_or_else(|| anyhow::anyhow!("blur buffer size overflow"))?;
    if src.len() != expected_len {
        return Err(anyhow::anyhow!("blur_rgba8_premul expects src matching width*height*4").into());
    }
    if !sigma.is_finite() || sigma < 0.0 {
        return Err(ShotframeError::validation("blur sigma must be finite and >= 0"));
    }
    if sigma < 0.5 || width == 0 || height == 0 {
        return Ok(src.to_vec());
    }

    if sigma > BOX_BLUR_SIGMA_THRESHOLD {
        return Ok(box_blur_3(src, width as usize, height as usize, sigma));
    }

    let radius = (sigma * 3.0).ceil() as u32;
    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    horizontal_pass(src, &mut tmp, width as usize, &kernel);
    vertical_pass(&tmp, &mut out, width as usize, height as usize, &kernel);
    Ok(out)
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> ShotframeResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(ShotframeError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    // Push rounding drift into the centre tap so the kernel sums to exactly 1.0.
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: usize, k: &[u32]) {
    let radius = (k.len() / 2) as isize;
    let row_len = width * 4;
    dst.par_chunks_mut(row_len)
        .zip(src.par_chunks(row_len))
        .for_each(|(out_row, in_row)| {
            for x in 0..width as isize {
                let mut acc = [0u64; 4];
                for (ki, &kw) in k.iter().enumerate() {
                    let sx = (x + ki as isize - radius).clamp(0, width as isize - 1) as usize;
                    let idx = sx * 4;
                    for c in 0..4 {
                        acc[c] += u64::from(kw) * u64::from(in_row[idx + c]);
                    }
                }
                let o = x as usize * 4;
                for c in 0..4 {
                    out_row[o + c] = q16_to_u8(acc[c]);
                }
            }
        });
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: usize, height: usize, k: &[u32]) {
    let radius = (k.len() / 2) as isize;
    let row_len = width * 4;
    dst.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, out_row)| {
            for x in 0..width {
                let mut acc = [0u64; 4];
                for (ki, &kw) in k.iter().enumerate() {
                    let sy =
                        (y as isize + ki as isize - radius).clamp(0, height as isize - 1) as usize;
                    let idx = (sy * width + x) * 4;
                    for c in 0..4 {
                        acc[c] += u64::from(kw) * u64::from(src[idx + c]);
                    }
                }
                for c in 0..4 {
                    out_row[x * 4 + c] = q16_to_u8(acc[c]);
                }
            }
        });
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    (v.min(255)) as u8
}

/// Widths of three successive box filters whose convolution approximates a Gaussian.
fn box_sizes_for_gauss(sigma: f32) -> [usize; 3] {
    let n = 3.0f64;
    let sigma = f64::from(sigma);
    let w_ideal = (12.0 * sigma * sigma / n + 1.0).sqrt();
    let mut wl = w_ideal.floor() as i64;
    if wl % 2 == 0 {
        wl -= 1;
    }
    let wu = wl + 2;
    let wl_f = wl as f64;
    let m_ideal =
        (12.0 * sigma * sigma - n * wl_f * wl_f - 4.0 * n * wl_f - 3.0 * n) / (-4.0 * wl_f - 4.0);
    let m = m_ideal.round() as i64;

    let mut sizes = [0usize; 3];
    for (i, s) in sizes.iter_mut().enumerate() {
        *s = if (i as i64) < m { wl } else { wu }.max(1) as usize;
    }
    sizes
}

fn box_blur_3(src: &[u8], width: usize, height: usize, sigma: f32) -> Vec<u8> {
    let sizes = box_sizes_for_gauss(sigma);
    let mut a = src.to_vec();
    let mut b = vec![0u8; a.len()];

    for &size in &sizes {
        let r = (size - 1) / 2;
        box_rows(&a, &mut b, width, r);
        let t = transpose(&b, width, height);
        let mut t_out = vec![0u8; t.len()];
        box_rows(&t, &mut t_out, height, r);
        a = transpose(&t_out, height, width);
    }
    a
}

/// Sliding-window box filter of radius `r` along each row, edges clamped.
fn box_rows(src: &[u8], dst: &mut [u8], width: usize, r: usize) {
    let row_len = width * 4;
    let window = (2 * r + 1) as u32;
    dst.par_chunks_mut(row_len)
        .zip(src.par_chunks(row_len))
        .for_each(|(out_row, in_row)| {
            let px = |i: isize, c: usize| -> u32 {
                let x = i.clamp(0, width as isize - 1) as usize;
                u32::from(in_row[x * 4 + c])
            };
            let mut acc = [0u32; 4];
            for (c, slot) in acc.iter_mut().enumerate() {
                for i in -(r as isize)..=(r as isize) {
                    *slot += px(i, c);
                }
            }
            for x in 0..width {
                for c in 0..4 {
                    out_row[x * 4 + c] = ((acc[c] + window / 2) / window).min(255) as u8;
                    let add = px(x as isize + r as isize + 1, c);
                    let sub = px(x as isize - r as isize, c);
                    acc[c] = acc[c] + add - sub;
                }
            }
        });
}

fn transpose(src: &[u8], width: usize, height: usize) -> Vec<u8> {
    let mut out = vec![0u8; src.len()];
    for y in 0..height {
        for x in 0..width {
            let s = (y * width + x) * 4;
            let d = (x * height + y) * 4;
            out[d..d + 4].copy_from_slice(&src[s..s + 4]);
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
