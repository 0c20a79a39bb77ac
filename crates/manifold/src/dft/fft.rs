//! Power-of-two 1D FFT plan.
//!
//! Two dispatch shapes, chosen by size against the device limits: transforms
//! that fit a work group's shared memory run as a single shared pass with
//! load-time bit reversal; larger ones run a bit-reversal dispatch, a shared
//! dispatch without internal reversal, and `log2(n) − log2(n_shared)`
//! global-memory butterfly dispatches. The pass sequence is planned once and
//! replayed on every run.

use std::f32::consts::PI;

use num_complex::Complex32;

use super::function::shared_size;
use super::kernels::{bit_reverse_rows, fft_global_pass, fft_shared_pass};
use super::DeviceLimits;
use crate::error::{Error, Result};

pub struct Fft {
    n: usize,
    data_size: usize,
    n_shared: usize,
    only_shared: bool,
    /// `(m/2, 2π/m)` uniforms of the global passes, in dispatch order.
    global_passes: Vec<(usize, f32)>,
}

impl Fft {
    /// Plan a transform of `count` batches of length `n`.
    pub fn new(limits: &DeviceLimits, count: usize, n: usize) -> Result<Self> {
        if n == 0 {
            return Err(Error::FftSizeNotPositive { size: n });
        }
        if !n.is_power_of_two() {
            return Err(Error::FftSizeNotPowerOfTwo { size: n });
        }
        if n == 1 {
            // Nothing to transform.
            return Ok(Self {
                n,
                data_size: count,
                n_shared: 0,
                only_shared: true,
                global_passes: Vec::new(),
            });
        }

        let n_shared = shared_size(n, limits);
        let only_shared = n <= n_shared;

        let mut global_passes = Vec::new();
        if !only_shared {
            let mut m_div_2 = n_shared;
            let mut two_pi_div_m = PI / n_shared as f32;
            while m_div_2 < n {
                global_passes.push((m_div_2, two_pi_div_m));
                two_pi_div_m /= 2.0;
                m_div_2 <<= 1;
            }
            debug_assert_eq!(n, n_shared << global_passes.len());
        }

        Ok(Self {
            n,
            data_size: count * n,
            n_shared,
            only_shared,
            global_passes,
        })
    }

    pub fn data_size(&self) -> usize {
        self.data_size
    }

    /// Transform every batch of `data` in place.
    pub fn run(&self, inverse: bool, data: &mut [Complex32]) -> Result<()> {
        if self.n == 1 {
            return Ok(());
        }
        if data.len() != self.data_size {
            return Err(Error::BufferSizeMismatch {
                expected: self.data_size,
                actual: data.len(),
            });
        }

        if self.only_shared {
            fft_shared_pass(data, self.n, self.n_shared, inverse, true);
            return Ok(());
        }

        // n exceeds the shared span: reverse first, then compute, because
        // the butterflies work in place.
        bit_reverse_rows(data, self.n);
        fft_shared_pass(data, self.n, self.n_shared, inverse, false);
        for &(m_div_2, two_pi_div_m) in &self.global_passes {
            fft_global_pass(data, m_div_2, two_pi_div_m, inverse);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_shapes() {
        let limits = DeviceLimits::default();
        let small = Fft::new(&limits, 4, 256).unwrap();
        assert!(small.only_shared);
        assert!(small.global_passes.is_empty());
        assert_eq!(small.data_size(), 1024);

        let large = Fft::new(&limits, 1, 1 << 14).unwrap();
        assert!(!large.only_shared);
        assert_eq!(large.n_shared, 2048);
        assert_eq!(large.global_passes.len(), 3);
        assert_eq!(large.global_passes[0].0, 2048);

        assert!(matches!(
            Fft::new(&limits, 1, 12),
            Err(Error::FftSizeNotPowerOfTwo { size: 12 })
        ));
        assert!(matches!(
            Fft::new(&limits, 1, 0),
            Err(Error::FftSizeNotPositive { size: 0 })
        ));
    }

    #[test]
    fn large_transform_round_trip() {
        // Forces the bit-reverse + shared + global path.
        let limits = DeviceLimits {
            max_shared_memory_size: 2048, // 256 complex values
            ..DeviceLimits::default()
        };
        let n = 1024;
        let fft = Fft::new(&limits, 2, n).unwrap();
        assert!(!fft.only_shared);

        let x: Vec<Complex32> = (0..2 * n)
            .map(|i| Complex32::new((i as f32 * 0.13).sin(), (i as f32 * 0.29).cos()))
            .collect();
        let mut data = x.clone();
        fft.run(false, &mut data).unwrap();
        fft.run(true, &mut data).unwrap();
        for (a, b) in data.iter().zip(&x) {
            assert!((a - b).norm() < 1e-3);
        }
    }

    #[test]
    fn wrong_buffer_size_is_rejected() {
        let limits = DeviceLimits::default();
        let fft = Fft::new(&limits, 1, 16).unwrap();
        let mut data = vec![Complex32::new(0.0, 0.0); 8];
        assert!(matches!(
            fft.run(false, &mut data),
            Err(Error::BufferSizeMismatch {
                expected: 16,
                actual: 8
            })
        ));
    }
}
