//! Voronoi vertex of a Delaunay cell.
//!
//! The centre of the circumsphere through the cell's vertices is the
//! intersection of the perpendicular bisector hyperplanes. For vertices
//! `v(0)` and `v(r)`, `x · (2 (v(r) − v(0))) = v(r)·v(r) − v(0)·v(0)`, which
//! is row `r − 1` of the linear system solved here.
//!
//! Reference: Devadoss, O'Rourke, Discrete and Computational Geometry, 4.1.

use nalgebra::SVector;

use crate::error::{Error, Result};
use crate::numerical::solve_linear;

pub fn compute_voronoi_vertex<const N: usize, const NP: usize>(
    points: &[SVector<f64, N>],
    vertices: &[u32; NP],
) -> Result<SVector<f64, N>> {
    const { assert!(NP == N + 1) };

    let p0 = &points[vertices[0] as usize];
    let dot0 = p0.dot(p0);

    let mut a = [[0.0; N]; N];
    let mut b = [0.0; N];
    for row in 0..N {
        let p = &points[vertices[row + 1] as usize];
        for col in 0..N {
            a[row][col] = 2.0 * (p[col] - p0[col]);
        }
        b[row] = p.dot(p) - dot0;
    }

    let voronoi_vertex = solve_linear(a, b).ok_or(Error::VoronoiVertexUndefined)?;
    if !voronoi_vertex.iter().all(|c| c.is_finite()) {
        return Err(Error::VoronoiVertexUndefined);
    }
    Ok(voronoi_vertex)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn circumcentre_is_equidistant() {
        let points = vec![
            vector![0.0, 0.0, 0.0],
            vector![2.0, 0.0, 0.0],
            vector![0.0, 2.0, 0.0],
            vector![0.0, 0.0, 2.0],
        ];
        let c = compute_voronoi_vertex::<3, 4>(&points, &[0, 1, 2, 3]).unwrap();
        let d0 = (points[0] - c).norm();
        for p in &points[1..] {
            assert!(((p - c).norm() - d0).abs() < 1e-12);
        }
        assert!((c - vector![1.0, 1.0, 1.0]).norm() < 1e-12);
    }

    #[test]
    fn degenerate_cell_is_an_error() {
        let points = vec![
            vector![0.0, 0.0],
            vector![1.0, 0.0],
            vector![2.0, 0.0], // collinear
        ];
        let err = compute_voronoi_vertex::<2, 3>(&points, &[0, 1, 2]).unwrap_err();
        assert_eq!(err, Error::VoronoiVertexUndefined);
    }
}
