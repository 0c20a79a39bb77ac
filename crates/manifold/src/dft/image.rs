//! Forward DFT of an image region.
//!
//! Takes the luminance of a source rectangle, runs the forward 2D DFT and
//! writes the modulus, scaled by `1/(width·height)`, into a single-channel
//! output of the rectangle's size.

use num_complex::Complex32;

use super::bluestein::DftVector;
use super::DeviceLimits;
use crate::error::{Error, Result};

/// Rectangle of an image, in pixels.
#[derive(Clone, Copy, Debug)]
pub struct PixelRegion {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

/// RGBA image with `f32` channels, row-major.
pub struct RgbaImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<[f32; 4]>,
}

/// Single-channel `f32` image, row-major.
pub struct GrayImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<f32>,
}

impl GrayImage {
    pub fn zeroed(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0.0; width * height],
        }
    }
}

/// Forward-DFT pipeline over an image rectangle; buffers and the dispatch
/// sequence are planned once per rectangle.
pub struct ImageDft {
    dft: DftVector,
    region: Option<PixelRegion>,
    buffer: Vec<Complex32>,
}

impl ImageDft {
    pub fn new(limits: DeviceLimits) -> Self {
        Self {
            dft: DftVector::new(limits),
            region: None,
            buffer: Vec::new(),
        }
    }

    pub fn create_buffers(&mut self, region: PixelRegion) -> Result<()> {
        self.dft.create_buffers(region.width, region.height)?;
        self.buffer = vec![Complex32::new(0.0, 0.0); region.width * region.height];
        self.region = Some(region);
        Ok(())
    }

    /// Luminance of `input` clipped to the rectangle → forward DFT →
    /// modulus into `output`, normalised by the sample count.
    pub fn compute(&mut self, input: &RgbaImage, output: &mut GrayImage) -> Result<()> {
        let region = self.region.expect("create_buffers before compute");
        assert!(region.x + region.width <= input.width);
        assert!(region.y + region.height <= input.height);
        debug_assert_eq!(input.pixels.len(), input.width * input.height);

        if output.width != region.width || output.height != region.height {
            return Err(Error::BufferSizeMismatch {
                expected: region.width * region.height,
                actual: output.width * output.height,
            });
        }

        // copy input: BT.601 luminance of the clipped rectangle.
        for row in 0..region.height {
            for col in 0..region.width {
                let p = input.pixels[(region.y + row) * input.width + (region.x + col)];
                let luminance = 0.299 * p[0] + 0.587 * p[1] + 0.114 * p[2];
                self.buffer[row * region.width + col] = Complex32::new(luminance, 0.0);
            }
        }

        self.dft.exec(false, &mut self.buffer)?;

        // copy output: modulus scaled by 1/(width·height).
        let to_mul = 1.0 / (region.width as f32 * region.height as f32);
        for (out, v) in output.pixels.iter_mut().zip(&self.buffer) {
            *out = v.norm() * to_mul;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_image_concentrates_at_dc() {
        let (w, h) = (8, 6);
        let input = RgbaImage {
            width: w,
            height: h,
            pixels: vec![[1.0, 1.0, 1.0, 1.0]; w * h],
        };
        let mut output = GrayImage::zeroed(w, h);
        let mut dft = ImageDft::new(DeviceLimits::default());
        dft.create_buffers(PixelRegion {
            x: 0,
            y: 0,
            width: w,
            height: h,
        })
        .unwrap();
        dft.compute(&input, &mut output).unwrap();

        // DC bin holds the mean luminance (0.299 + 0.587 + 0.114 = 1).
        assert!((output.pixels[0] - 1.0).abs() < 1e-4);
        for &v in &output.pixels[1..] {
            assert!(v.abs() < 1e-4, "non-DC bin {v}");
        }
    }

    #[test]
    fn output_size_is_checked() {
        let input = RgbaImage {
            width: 4,
            height: 4,
            pixels: vec![[0.0; 4]; 16],
        };
        let mut output = GrayImage::zeroed(3, 3);
        let mut dft = ImageDft::new(DeviceLimits::default());
        dft.create_buffers(PixelRegion {
            x: 0,
            y: 0,
            width: 4,
            height: 4,
        })
        .unwrap();
        assert!(matches!(
            dft.compute(&input, &mut output),
            Err(Error::BufferSizeMismatch { .. })
        ));
    }
}
