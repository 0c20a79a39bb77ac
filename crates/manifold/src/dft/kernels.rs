//! Pass kernels of the power-of-two FFT.
//!
//! Each function is one dispatch: work groups run in parallel over disjoint
//! regions of the buffer, and returning from the function is the barrier
//! before the next pass. Inverse butterflies fold in a factor 1/2 per layer,
//! so a complete inverse transform carries 1/n.

use num_complex::Complex32;
use rayon::prelude::*;

/// Bit-reversal permutation of each length-`n` row of `data`.
pub fn bit_reverse_rows(data: &mut [Complex32], n: usize) {
    debug_assert!(n.is_power_of_two());
    if n <= 1 {
        return;
    }
    debug_assert_eq!(data.len() % n, 0);
    let shift = usize::BITS - n.trailing_zeros();
    data.par_chunks_mut(n).for_each(|row| {
        for i in 0..n {
            let r = i.reverse_bits() >> shift;
            if r > i {
                row.swap(i, r);
            }
        }
    });
}

/// Shared-memory pass: each work group loads `n_shared` contiguous elements
/// and runs all butterfly layers up to `min(n, n_shared)` on them.
/// `reverse_input` applies the load-time bit reversal (the whole transform
/// fits the group); otherwise a [`bit_reverse_rows`] dispatch came first.
pub fn fft_shared_pass(
    data: &mut [Complex32],
    n: usize,
    n_shared: usize,
    inverse: bool,
    reverse_input: bool,
) {
    let span = n.min(n_shared);
    debug_assert!(span.is_power_of_two());
    debug_assert_eq!(data.len() % span, 0);

    data.par_chunks_mut(n_shared).for_each(|chunk| {
        for block in chunk.chunks_mut(span) {
            if reverse_input {
                for i in 0..span {
                    let r = i.reverse_bits() >> (usize::BITS - span.trailing_zeros());
                    if r > i {
                        block.swap(i, r);
                    }
                }
            }
            butterfly_layers(block, inverse);
        }
    });
}

/// One global-memory butterfly layer with the per-pass `(m/2, 2π/m)`
/// uniform. Blocks of `m = 2·m_div_2` elements are independent, which is
/// why no ordering is needed inside the pass.
pub fn fft_global_pass(data: &mut [Complex32], m_div_2: usize, two_pi_div_m: f32, inverse: bool) {
    let m = 2 * m_div_2;
    debug_assert_eq!(data.len() % m, 0);
    data.par_chunks_mut(m).for_each(|block| {
        for k in 0..m_div_2 {
            let angle = two_pi_div_m * k as f32;
            let w = Complex32::from_polar(1.0, if inverse { angle } else { -angle });
            let a = block[k];
            let b = block[k + m_div_2] * w;
            block[k] = a + b;
            block[k + m_div_2] = a - b;
        }
        if inverse {
            for v in block.iter_mut() {
                *v *= 0.5;
            }
        }
    });
}

/// Radix-2 butterfly ladder over one bit-reversed block.
fn butterfly_layers(block: &mut [Complex32], inverse: bool) {
    let n = block.len();
    let mut m = 2;
    while m <= n {
        let m_half = m / 2;
        let angle_step = if inverse { 1.0 } else { -1.0 } * std::f32::consts::TAU / m as f32;
        for base in (0..n).step_by(m) {
            for k in 0..m_half {
                let w = Complex32::from_polar(1.0, angle_step * k as f32);
                let a = block[base + k];
                let b = block[base + k + m_half] * w;
                block[base + k] = a + b;
                block[base + k + m_half] = a - b;
            }
        }
        if inverse {
            for v in block.iter_mut() {
                *v *= 0.5;
            }
        }
        m <<= 1;
    }
}
