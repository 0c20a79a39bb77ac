//! Size selection and Bluestein chirp construction.
//!
//! Reference: Chu, George, INSIDE the FFT BLACK BOX, chapter 13. The `h2`
//! embedding uses the corrected padding: zeros on `[n, m − n]`, reflection on
//! `[m − n + 1, m − 1]` (the book's 13.11/13.23–13.25 are off by one).

use std::f64::consts::PI;
use std::mem::size_of;

use num_complex::{Complex, Complex32};

use super::DeviceLimits;
use crate::error::{Error, Result};

/// Power-of-two convolution length for a Bluestein transform of size `n`:
/// `n` itself when it is a power of two, the next power of two at or above
/// `2n − 2` otherwise (the symmetric embedding makes `2n − 2` sufficient).
pub fn compute_m(n: usize) -> Result<usize> {
    if n < 1 {
        return Err(Error::FftSizeNotPositive { size: n });
    }
    if n.is_power_of_two() {
        return Ok(n);
    }
    Ok((2 * n - 2).next_power_of_two())
}

/// The chirp `h(l) = coef · e^{±iπ l²/n}` (13.4, 13.22); the sign is opposite
/// to the transform direction. `l²/n` is reduced modulo 2 so the angle stays
/// within one turn for any `l`.
pub fn bluestein_h(n: usize, inverse: bool, coef: f64) -> Vec<Complex<f64>> {
    let mut h = Vec::with_capacity(n);
    for l in 0..n as i64 {
        let dividend = l * l;
        let quotient = dividend / n as i64;
        let remainder = dividend - quotient * n as i64;
        // factor = (l²/n) mod 2 = (quotient mod 2) + remainder/n.
        let factor = (quotient & 1) as f64 + remainder as f64 / n as f64;
        let angle = if inverse { -PI } else { PI } * factor;
        h.push(Complex::from_polar(coef, angle));
    }
    h
}

/// Embed `h` into the length-`m` circulant `h2`.
pub fn bluestein_h2(n: usize, m: usize, h: &[Complex<f64>]) -> Vec<Complex<f64>> {
    debug_assert_eq!(h.len(), n);
    debug_assert!(m >= n);
    let mut h2 = vec![Complex::new(0.0, 0.0); m];
    h2[..n].copy_from_slice(h);
    for l in m - n + 1..m {
        h2[l] = h[m - l];
    }
    h2
}

/// Largest power of two not above `x`.
fn bit_floor(x: usize) -> usize {
    if x == 0 {
        0
    } else {
        1 << x.ilog2()
    }
}

/// Elements a single work group can transform on-chip: the requested size
/// (at least 128, one thread per two elements, so a group keeps at least 64
/// threads) capped by shared memory and by twice the group-size limits.
pub fn shared_size(dft_size: usize, limits: &DeviceLimits) -> usize {
    let requested = dft_size.max(128);
    let memory_cap = bit_floor(limits.max_shared_memory_size / size_of::<Complex32>());
    let group_cap = 2 * limits.max_group_size.min(limits.max_group_invocations);
    requested.min(memory_cap).min(bit_floor(group_cap))
}

/// Threads of a shared-pass work group: one per two elements, capped by the
/// device group limits.
pub fn group_size(dft_size: usize, limits: &DeviceLimits) -> usize {
    let max_threads_required = shared_size(dft_size, limits) / 2;
    let max_threads_supported = limits.max_group_size.min(limits.max_group_invocations);
    max_threads_required.min(max_threads_supported)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn m_for_powers_of_two_and_others() {
        assert_eq!(compute_m(1).unwrap(), 1);
        assert_eq!(compute_m(8).unwrap(), 8);
        assert_eq!(compute_m(7).unwrap(), 16);
        assert_eq!(compute_m(9).unwrap(), 16); // 2n-2 = 16 is already a power of two
        assert_eq!(compute_m(13).unwrap(), 32);
        assert!(matches!(
            compute_m(0),
            Err(Error::FftSizeNotPositive { size: 0 })
        ));
    }

    #[test]
    fn h2_layout_for_n6_m16() {
        let n = 6;
        let m = 16;
        let h = bluestein_h(n, false, 1.0);
        let h2 = bluestein_h2(n, m, &h);
        // h0..h5, zeros on [6, 10], reflection h5..h1 on [11, 15].
        for l in 0..n {
            assert_eq!(h2[l], h[l]);
        }
        for l in n..=m - n {
            assert_eq!(h2[l], Complex::new(0.0, 0.0));
        }
        for l in m - n + 1..m {
            assert_eq!(h2[l], h[m - l]);
        }
    }

    #[test]
    fn chirp_angle_reduction_matches_direct_formula() {
        let n = 7;
        let h = bluestein_h(n, true, 1.0);
        for (l, v) in h.iter().enumerate() {
            let direct = Complex::from_polar(1.0, -PI * (l * l) as f64 / n as f64);
            assert!((v - direct).norm() < 1e-12);
        }
    }

    #[test]
    fn shared_and_group_sizes() {
        let limits = DeviceLimits::default();
        // 32 KiB of 8-byte complex values, capped by 2 * 1024 threads.
        assert_eq!(shared_size(256, &limits), 256);
        assert_eq!(shared_size(1 << 16, &limits), 2048);
        assert_eq!(shared_size(2, &limits), 128);
        assert_eq!(group_size(256, &limits), 128);
        assert_eq!(group_size(1 << 16, &limits), 1024);
    }
}
