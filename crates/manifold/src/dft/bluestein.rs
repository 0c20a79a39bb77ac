//! 2D DFT of arbitrary size via Bluestein's chirp-z embedding.
//!
//! A length-`n` axis is convolved against a precomputed chirp diagonal
//! through length-`m` power-of-two FFTs (13.2, 13.13, 13.26 in Chu, George,
//! INSIDE the FFT BLACK BOX): scatter with the chirp prefactor, FFT, multiply
//! the diagonal, inverse FFT, gather with the chirp again. Rows transform in
//! place of the scratch buffer; columns transpose into it first, so the 1D
//! FFT always runs over contiguous rows. For a power-of-two axis `m == n`
//! and the same path degenerates to a plain FFT sandwich.
//!
//! The pass sequence is fixed at `create_buffers` time and replayed by every
//! `exec`, mirroring a command buffer recorded once and submitted per call.

use log::debug;
use num_complex::Complex32;
use rayon::prelude::*;

use super::fft::Fft;
use super::function::{bluestein_h, bluestein_h2, compute_m};
use super::DeviceLimits;
use crate::error::{Error, Result};

/// Bluestein diagonals of both axes and directions: the length-`m` forward
/// (or inverse) FFT of the embedded chirp. The inverse diagonal carries the
/// `m/n` factor that, together with the 1/m of the inverse FFT, yields the
/// 1/n normalisation of the inverse DFT.
struct Diagonals {
    d1_fwd: Vec<Complex32>,
    d1_inv: Vec<Complex32>,
    d2_fwd: Vec<Complex32>,
    d2_inv: Vec<Complex32>,
}

impl Diagonals {
    fn new(limits: &DeviceLimits, n1: usize, n2: usize, m1: usize, m2: usize) -> Result<Self> {
        Ok(Self {
            d1_fwd: compute_diagonal(limits, n1, m1, false)?,
            d1_inv: compute_diagonal(limits, n1, m1, true)?,
            d2_fwd: compute_diagonal(limits, n2, m2, false)?,
            d2_inv: compute_diagonal(limits, n2, m2, true)?,
        })
    }
}

fn compute_diagonal(
    limits: &DeviceLimits,
    n: usize,
    m: usize,
    inverse: bool,
) -> Result<Vec<Complex32>> {
    let coef = if inverse { m as f64 / n as f64 } else { 1.0 };
    let h = bluestein_h(n, inverse, coef);
    let h2 = bluestein_h2(n, m, &h);
    let mut buffer: Vec<Complex32> = h2
        .iter()
        .map(|c| Complex32::new(c.re as f32, c.im as f32))
        .collect();
    Fft::new(limits, 1, m)?.run(inverse, &mut buffer)?;
    Ok(buffer)
}

/// In-place 2D DFT over a row-major `width × height` complex buffer.
pub struct DftVector {
    limits: DeviceLimits,
    width: usize,
    height: usize,
    m1: usize,
    m2: usize,
    plan: Option<Plan>,
}

struct Plan {
    diagonals: Diagonals,
    /// Forward chirp `h` per axis; the pre/post factor of direction `d` is
    /// `conj(h)` for the forward DFT and `h` itself for the inverse.
    chirp1: Vec<Complex32>,
    chirp2: Vec<Complex32>,
    fft_rows: Fft,
    fft_columns: Fft,
    buffer: Vec<Complex32>,
}

impl DftVector {
    pub fn new(limits: DeviceLimits) -> Self {
        Self {
            limits,
            width: 0,
            height: 0,
            m1: 0,
            m2: 0,
            plan: None,
        }
    }

    /// Plan the pipeline for a `width × height` buffer.
    pub fn create_buffers(&mut self, width: usize, height: usize) -> Result<()> {
        let m1 = compute_m(width)?;
        let m2 = compute_m(height)?;
        debug!("dft {width}x{height}, convolution sizes {m1}x{m2}");

        let diagonals = Diagonals::new(&self.limits, width, height, m1, m2)?;
        let chirp1 = to_f32(&bluestein_h(width, false, 1.0));
        let chirp2 = to_f32(&bluestein_h(height, false, 1.0));

        // Rows: n2 batches of length m1; columns: n1 batches of length m2.
        let fft_rows = Fft::new(&self.limits, height, m1)?;
        let fft_columns = Fft::new(&self.limits, width, m2)?;

        let buffer = vec![Complex32::new(0.0, 0.0); (m1 * height).max(m2 * width)];

        self.width = width;
        self.height = height;
        self.m1 = m1;
        self.m2 = m2;
        self.plan = Some(Plan {
            diagonals,
            chirp1,
            chirp2,
            fft_rows,
            fft_columns,
            buffer,
        });
        Ok(())
    }

    /// Forward or inverse 2D DFT of `data`, which must hold
    /// `width · height` row-major samples.
    pub fn exec(&mut self, inverse: bool, data: &mut [Complex32]) -> Result<()> {
        let plan = self.plan.as_mut().expect("create_buffers before exec");
        if data.len() != self.width * self.height {
            return Err(Error::BufferSizeMismatch {
                expected: self.width * self.height,
                actual: data.len(),
            });
        }

        if self.width > 1 {
            rows_pass(
                data, plan, self.width, self.height, self.m1, inverse,
            )?;
        }
        if self.height > 1 {
            columns_pass(
                data, plan, self.width, self.height, self.m2, inverse,
            )?;
        }
        Ok(())
    }
}

fn to_f32(h: &[num_complex::Complex<f64>]) -> Vec<Complex32> {
    h.iter()
        .map(|c| Complex32::new(c.re as f32, c.im as f32))
        .collect()
}

#[inline]
fn chirp_factor(chirp: &[Complex32], l: usize, inverse: bool) -> Complex32 {
    if inverse {
        chirp[l]
    } else {
        chirp[l].conj()
    }
}

fn rows_pass(
    data: &mut [Complex32],
    plan: &mut Plan,
    n1: usize,
    n2: usize,
    m1: usize,
    inverse: bool,
) -> Result<()> {
    let buffer = &mut plan.buffer[..m1 * n2];
    let chirp = &plan.chirp1;

    // rows to buffer: scatter with the chirp prefactor, zero the tail.
    buffer
        .par_chunks_mut(m1)
        .zip(data.par_chunks(n1))
        .for_each(|(brow, drow)| {
            for l in 0..m1 {
                brow[l] = if l < n1 {
                    drow[l] * chirp_factor(chirp, l, inverse)
                } else {
                    Complex32::new(0.0, 0.0)
                };
            }
        });

    plan.fft_rows.run(inverse, buffer)?;

    let d = if inverse {
        &plan.diagonals.d1_inv
    } else {
        &plan.diagonals.d1_fwd
    };
    buffer.par_chunks_mut(m1).for_each(|brow| {
        for (v, dv) in brow.iter_mut().zip(d) {
            *v *= dv;
        }
    });

    plan.fft_rows.run(!inverse, buffer)?;

    // rows from buffer: gather the first n1 entries with the chirp again.
    data.par_chunks_mut(n1)
        .zip(buffer.par_chunks(m1))
        .for_each(|(drow, brow)| {
            for k in 0..n1 {
                drow[k] = brow[k] * chirp_factor(chirp, k, inverse);
            }
        });
    Ok(())
}

fn columns_pass(
    data: &mut [Complex32],
    plan: &mut Plan,
    n1: usize,
    n2: usize,
    m2: usize,
    inverse: bool,
) -> Result<()> {
    let buffer = &mut plan.buffer[..m2 * n1];
    let chirp = &plan.chirp2;

    // columns to buffer: transpose each column into a buffer row, chirped.
    let data_in: &[Complex32] = data;
    buffer
        .par_chunks_mut(m2)
        .enumerate()
        .for_each(|(i, brow)| {
            for l in 0..m2 {
                brow[l] = if l < n2 {
                    data_in[l * n1 + i] * chirp_factor(chirp, l, inverse)
                } else {
                    Complex32::new(0.0, 0.0)
                };
            }
        });

    plan.fft_columns.run(inverse, buffer)?;

    let d = if inverse {
        &plan.diagonals.d2_inv
    } else {
        &plan.diagonals.d2_fwd
    };
    buffer.par_chunks_mut(m2).for_each(|brow| {
        for (v, dv) in brow.iter_mut().zip(d) {
            *v *= dv;
        }
    });

    plan.fft_columns.run(!inverse, buffer)?;

    // columns from buffer: transpose back, chirped.
    let buffer = &plan.buffer[..m2 * n1];
    data.par_chunks_mut(n1)
        .enumerate()
        .for_each(|(k, drow)| {
            for (i, v) in drow.iter_mut().enumerate() {
                *v = buffer[i * m2 + k] * chirp_factor(chirp, k, inverse);
            }
        });
    Ok(())
}
