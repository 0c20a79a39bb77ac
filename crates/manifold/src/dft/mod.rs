//! 2D discrete Fourier transform pipeline.
//!
//! Arbitrary (not necessarily power-of-two) sizes are reduced to
//! power-of-two 1D FFTs with Bluestein's chirp-z embedding, organised as a
//! fixed sequence of dispatches over shared buffers: each dispatch runs its
//! work groups in parallel over disjoint regions, and the boundary between
//! dispatches is the barrier. The dispatch sizing follows a compute device's
//! limits through [`DeviceLimits`].
//!
//! Reference: Chu, George, INSIDE the FFT BLACK BOX. Serial and Parallel
//! Fast Fourier Transform Algorithms, CRC Press, 2000.

mod bluestein;
mod fft;
mod function;
mod image;
mod kernels;

#[cfg(test)]
mod tests;

pub use bluestein::DftVector;
pub use fft::Fft;
pub use function::{bluestein_h, bluestein_h2, compute_m, group_size, shared_size};
pub use image::{GrayImage, ImageDft, PixelRegion, RgbaImage};

/// Limits of the compute device the dispatches are sized for. The defaults
/// model a common GPU: 32 KiB of work-group shared memory and 1024-wide
/// groups.
#[derive(Clone, Copy, Debug)]
pub struct DeviceLimits {
    pub max_shared_memory_size: usize,
    pub max_group_size: usize,
    pub max_group_invocations: usize,
}

impl Default for DeviceLimits {
    fn default() -> Self {
        Self {
            max_shared_memory_size: 32 * 1024,
            max_group_size: 1024,
            max_group_invocations: 1024,
        }
    }
}
