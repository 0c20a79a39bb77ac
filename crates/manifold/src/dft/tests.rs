//! End-to-end 2D DFT scenarios.

use num_complex::{Complex, Complex32};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{DeviceLimits, DftVector};

fn dft_2d(width: usize, height: usize, data: &mut [Complex32], inverse: bool) {
    let mut dft = DftVector::new(DeviceLimits::default());
    dft.create_buffers(width, height).unwrap();
    dft.exec(inverse, data).unwrap();
}

/// Double-precision reference DFT, direct O(n²) evaluation.
fn reference_dft_2d(width: usize, height: usize, data: &[Complex32]) -> Vec<Complex<f64>> {
    let mut res = vec![Complex::new(0.0, 0.0); width * height];
    for ky in 0..height {
        for kx in 0..width {
            let mut acc = Complex::new(0.0, 0.0);
            for y in 0..height {
                for x in 0..width {
                    let v = data[y * width + x];
                    let angle = -std::f64::consts::TAU
                        * ((kx * x) as f64 / width as f64 + (ky * y) as f64 / height as f64);
                    acc += Complex::new(f64::from(v.re), f64::from(v.im))
                        * Complex::from_polar(1.0, angle);
                }
            }
            res[ky * width + kx] = acc;
        }
    }
    res
}

fn random_grid(width: usize, height: usize, seed: u64) -> Vec<Complex32> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..width * height)
        .map(|_| Complex32::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
        .collect()
}

#[test]
fn impulse_16x16() {
    let (w, h) = (16, 16);
    let mut data = vec![Complex32::new(0.0, 0.0); w * h];
    data[0] = Complex32::new(1.0, 0.0);

    dft_2d(w, h, &mut data, false);
    for v in &data {
        assert!((v - Complex32::new(1.0, 0.0)).norm() < 1e-5, "{v}");
    }

    dft_2d(w, h, &mut data, true);
    assert!((data[0] - Complex32::new(1.0, 0.0)).norm() < 1e-5);
    for v in &data[1..] {
        assert!(v.norm() < 1e-5);
    }
}

#[test]
fn non_power_of_two_7x13() {
    let (w, h) = (7, 13);
    let input = random_grid(w, h, 7 * 13);

    let mut data = input.clone();
    dft_2d(w, h, &mut data, false);

    let reference = reference_dft_2d(w, h, &input);
    for (got, want) in data.iter().zip(&reference) {
        let d = Complex::new(f64::from(got.re) - want.re, f64::from(got.im) - want.im);
        assert!(d.norm() < 1e-4 * (1.0 + want.norm()), "{got} vs {want}");
    }

    dft_2d(w, h, &mut data, true);
    for (got, want) in data.iter().zip(&input) {
        assert!((got - want).norm() < 1e-5);
    }
}

#[test]
fn linearity_1024() {
    let n = 1024;
    let x = random_grid(n, 1, 11);
    let y = random_grid(n, 1, 12);

    let mut lhs: Vec<Complex32> = x
        .iter()
        .zip(&y)
        .map(|(&a, &b)| 2.0 * a - 3.0 * b)
        .collect();
    dft_2d(n, 1, &mut lhs, false);

    let mut fx = x.clone();
    let mut fy = y.clone();
    dft_2d(n, 1, &mut fx, false);
    dft_2d(n, 1, &mut fy, false);

    for ((l, &a), &b) in lhs.iter().zip(&fx).zip(&fy) {
        let rhs = 2.0 * a - 3.0 * b;
        assert!((l - rhs).norm() < 1e-3 * (1.0 + rhs.norm()), "{l} vs {rhs}");
    }
}

#[test]
fn parseval_equality() {
    let (w, h) = (12, 10);
    let input = random_grid(w, h, 1210);
    let mut data = input.clone();
    dft_2d(w, h, &mut data, false);

    let sum_x: f64 = input.iter().map(|v| f64::from(v.norm_sqr())).sum();
    let sum_big_x: f64 = data.iter().map(|v| f64::from(v.norm_sqr())).sum();
    let n = (w * h) as f64;
    assert!(
        (sum_x - sum_big_x / n).abs() < 1e-3 * sum_x,
        "{sum_x} vs {}",
        sum_big_x / n
    );
}

#[test]
fn real_even_input_has_real_spectrum() {
    let (w, h) = (9, 8);
    let mut input = vec![Complex32::new(0.0, 0.0); w * h];
    let mut rng = StdRng::seed_from_u64(98);
    for y in 0..h {
        for x in 0..w {
            if input[y * w + x].re != 0.0 {
                continue;
            }
            let v = Complex32::new(rng.gen_range(-1.0f32..1.0), 0.0);
            input[y * w + x] = v;
            // even symmetry: x(-t) = x(t) modulo the grid
            input[((h - y) % h) * w + (w - x) % w] = v;
        }
    }
    let mut data = input.clone();
    dft_2d(w, h, &mut data, false);
    for v in &data {
        assert!(v.im.abs() < 1e-3, "imaginary part {v}");
    }
}

#[test]
fn real_odd_input_has_imaginary_spectrum() {
    let (w, h) = (8, 7);
    let mut input = vec![Complex32::new(0.0, 0.0); w * h];
    let mut rng = StdRng::seed_from_u64(87);
    for y in 0..h {
        for x in 0..w {
            let (mx, my) = ((w - x) % w, (h - y) % h);
            if (mx, my) == (x, y) || input[y * w + x].re != 0.0 {
                continue;
            }
            let v = rng.gen_range(-1.0f32..1.0);
            input[y * w + x] = Complex32::new(v, 0.0);
            input[my * w + mx] = Complex32::new(-v, 0.0);
        }
    }
    let mut data = input.clone();
    dft_2d(w, h, &mut data, false);
    for v in &data {
        assert!(v.re.abs() < 1e-3, "real part {v}");
    }
}

#[test]
fn degenerate_axes() {
    // 1×1: the output equals the input.
    let mut data = vec![Complex32::new(2.5, -1.5)];
    dft_2d(1, 1, &mut data, false);
    assert_eq!(data[0], Complex32::new(2.5, -1.5));

    // 1×n: only the column axis transforms.
    let input = random_grid(1, 5, 15);
    let mut data = input.clone();
    dft_2d(1, 5, &mut data, false);
    let reference = reference_dft_2d(1, 5, &input);
    for (got, want) in data.iter().zip(&reference) {
        assert!((f64::from(got.re) - want.re).abs() < 1e-4);
        assert!((f64::from(got.im) - want.im).abs() < 1e-4);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn forward_inverse_round_trip(width in 1usize..24, height in 1usize..24, seed in 0u64..1000) {
        let input = random_grid(width, height, seed);
        let mut data = input.clone();
        let mut dft = DftVector::new(DeviceLimits::default());
        dft.create_buffers(width, height).unwrap();
        dft.exec(false, &mut data).unwrap();
        dft.exec(true, &mut data).unwrap();
        for (got, want) in data.iter().zip(&input) {
            prop_assert!((got - want).norm() < 1e-4);
        }
    }
}
