use super::*;

fn impulse(w: u32, h: u32) -> Vec<u8> {
    let mut src = vec![0u8; (w * h * 4) as usize];
    let center = (((h / 2) * w + w / 2) * 4) as usize;
    src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);
    src
}

#[test]
fn tiny_sigma_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    let out = blur_rgba8_premul(&src, 1, 2, 0.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn constant_image_is_identity_for_both_paths() {
    let (w, h) = (16u32, 12u32);
    let px = [10u8, 20u8, 30u8, 40u8];
    let src = px.repeat((w * h) as usize);
    for sigma in [2.0, 9.0] {
        let out = blur_rgba8_premul(&src, w, h, sigma).unwrap();
        assert_eq!(out, src, "sigma {sigma}");
    }
}

#[test]
fn gaussian_path_spreads_and_conserves_energy() {
    let (w, h) = (15u32, 15u32);
    let out = blur_rgba8_premul(&impulse(w, h), w, h, 1.2).unwrap();

    let nonzero = out.chunks_exact(4).filter(|px| px[3] != 0).count();
    assert!(nonzero > 1);

    let sum_a: u32 = out.chunks_exact(4).map(|px| u32::from(px[3])).sum();
    assert!((sum_a as i32 - 255).abs() <= 12, "sum {sum_a}");
}

#[test]
fn box_path_spreads_a_block_symmetrically() {
    let (w, h) = (64u32, 64u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    for y in 24..40 {
        for x in 24..40 {
            let i = ((y * w + x) * 4) as usize;
            src[i..i + 4].copy_from_slice(&[200, 200, 200, 200]);
        }
    }
    let out = blur_rgba8_premul(&src, w, h, 8.0).unwrap();

    let alpha = |x: u32, y: u32| out[((y * w + x) * 4 + 3) as usize];
    assert!(alpha(32, 32) > alpha(32, 20));
    assert!(alpha(32, 20) > 0);
    assert!(alpha(20, 32).abs_diff(alpha(32, 20)) <= 2);

    let before: u32 = src.chunks_exact(4).map(|px| u32::from(px[3])).sum();
    let after: u32 = out.chunks_exact(4).map(|px| u32::from(px[3])).sum();
    let drift = (before as f64 - after as f64).abs() / before as f64;
    assert!(drift < 0.05, "drift {drift}");
}

#[test]
fn box_sizes_are_odd_and_close_to_sigma() {
    for sigma in [6.5f32, 10.0, 20.0, 40.0] {
        let sizes = box_sizes_for_gauss(sigma);
        for s in sizes {
            assert_eq!(s % 2, 1);
        }
        let var: f64 = sizes
            .iter()
            .map(|&s| ((s * s) as f64 - 1.0) / 12.0)
            .sum();
        assert!((var.sqrt() - f64::from(sigma)).abs() < 1.0);
    }
}

#[test]
fn rejects_mismatched_buffers_and_bad_sigma() {
    assert!(blur_rgba8_premul(&[0u8; 7], 1, 2, 1.0).is_err());
    assert!(blur_rgba8_premul(&[0u8; 8], 1, 2, f32::NAN).is_err());
}
