//! Quantisation of floating-point input onto an integer lattice.
//!
//! Input points are mapped affinely into `[0, max_value]^N`, rounded half to
//! even, deduplicated, and randomly permuted by a generator seeded from the
//! deduplicated count, so a given point multiset always produces the same
//! insertion order. The index map back to the caller's array survives both
//! steps.

use std::collections::HashSet;

use nalgebra::SVector;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{Error, Result};

/// Lattice width of the convex hull input.
pub const CONVEX_HULL_BITS: u32 = 30;
/// Lattice width of the Delaunay input, narrower to leave room for the
/// paraboloid lift.
pub const DELAUNAY_BITS: u32 = 24;

#[inline]
pub const fn max_lattice_value(bits: u32) -> i64 {
    (1i64 << bits) - 1
}

/// Deduplicated, shuffled lattice points with the inverse index map.
#[derive(Debug)]
pub struct QuantizedPoints<const N: usize> {
    points: Vec<[i64; N]>,
    map: Vec<u32>,
}

impl<const N: usize> QuantizedPoints<N> {
    pub fn new(source: &[SVector<f32, N>], max_value: i64) -> Result<Self> {
        assert!(max_value > 0);
        if source.is_empty() {
            return Err(Error::InputTooFewPoints {
                dimension: N,
                count: 0,
            });
        }

        let mut min = source[0];
        let mut max = source[0];
        for p in &source[1..] {
            min = min.inf(p);
            max = max.sup(p);
        }
        let max_d = (max - min)
            .iter()
            .fold(0.0f64, |acc, &d| acc.max(f64::from(d)));
        if !(max_d > 0.0) {
            return Err(Error::InputAllEqual);
        }
        let scale = max_value as f64 / max_d;

        let mut points = Vec::with_capacity(source.len());
        let mut map = Vec::with_capacity(source.len());
        let mut set: HashSet<[i64; N]> = HashSet::with_capacity(source.len());
        for (index, p) in source.iter().enumerate() {
            let mut value = [0i64; N];
            for i in 0..N {
                let v = (f64::from(p[i] - min[i]) * scale).round_ties_even();
                if !(v >= 0.0 && v <= max_value as f64) {
                    return Err(Error::InputOutOfRange {
                        value: v as i64,
                        max: max_value,
                    });
                }
                value[i] = v as i64;
            }
            if set.insert(value) {
                points.push(value);
                map.push(index as u32);
            }
        }

        // Deterministic permutation; the seed depends only on the point count.
        let mut order: Vec<u32> = (0..points.len() as u32).collect();
        order.shuffle(&mut StdRng::seed_from_u64(points.len() as u64));
        let points = order.iter().map(|&i| points[i as usize]).collect();
        let map = order.iter().map(|&i| map[i as usize]).collect();

        Ok(Self { points, map })
    }

    pub fn points(&self) -> &[[i64; N]] {
        &self.points
    }

    /// Index into the caller's original array for a shuffled index.
    pub fn restore_index(&self, index: usize) -> u32 {
        self.map[index]
    }

    pub fn restore_indices<const M: usize>(&self, indices: &[u32; M]) -> [u32; M] {
        std::array::from_fn(|i| self.map[indices[i] as usize])
    }
}
