//! Exact outward orthogonal complement of a facet.
//!
//! The complement of the facet's edge vectors is computed in the exact
//! compute scalar; orientation is resolved against a direction point that is
//! known to lie off the hyperplane, or, when it happens to lie on it, against
//! an already-oriented direction facet.

use nalgebra::SVector;

use crate::error::{Error, Result};
use crate::exact::{dot_product_sign, orthogonal_complement, to_exact_vector, ExactScalar};

#[derive(Clone, Debug)]
pub struct FacetOrtho<C: ExactScalar, const N: usize> {
    ortho: [C; N],
}

impl<C: ExactScalar, const N: usize> FacetOrtho<C, N> {
    /// Ortho oriented away from `direction_point`. Errors when the direction
    /// point lies exactly on the facet hyperplane.
    pub fn oriented(
        points: &[[i64; N]],
        vertices: &[u32; N],
        direction_point: u32,
    ) -> Result<Self> {
        match Self::build(points, vertices, direction_point) {
            Oriented::Done(res) => Ok(res),
            Oriented::OnPlane(_) => Err(Error::DirectionOnFacetPlane),
        }
    }

    /// Ortho oriented away from `direction_point`, falling back to matching
    /// `direction_facet` componentwise when the point is on the hyperplane.
    /// The fallback makes this constructor total.
    pub fn oriented_by_facet(
        points: &[[i64; N]],
        vertices: &[u32; N],
        direction_point: u32,
        direction_facet: &Self,
    ) -> Self {
        match Self::build(points, vertices, direction_point) {
            Oriented::Done(res) => res,
            Oriented::OnPlane(mut res) => {
                if are_opposite(&res.ortho, &direction_facet.ortho) {
                    negate(&mut res.ortho);
                }
                res
            }
        }
    }

    fn build(points: &[[i64; N]], vertices: &[u32; N], direction_point: u32) -> Oriented<C, N> {
        let origin = &points[vertices[0] as usize];
        let vectors: Vec<[C; N]> = vertices[1..]
            .iter()
            .map(|&v| to_exact_vector(&points[v as usize], origin))
            .collect();
        let mut ortho = orthogonal_complement(&vectors);
        debug_assert!(
            ortho.iter().any(|c| !c.is_zero()),
            "facet ortho is zero, vertices are affinely dependent"
        );

        let sign = dot_product_sign(
            &ortho,
            points,
            vertices[0] as usize,
            direction_point as usize,
        );
        if sign > 0 {
            // The direction point sees the facet; flip the ortho outward.
            negate(&mut ortho);
        }
        let res = Self { ortho };
        if sign == 0 {
            Oriented::OnPlane(res)
        } else {
            Oriented::Done(res)
        }
    }

    /// Sign of `ortho · (points[to] - points[from])`.
    pub fn dot_sign(&self, points: &[[i64; N]], from: u32, to: u32) -> i32 {
        dot_product_sign(&self.ortho, points, from as usize, to as usize)
    }

    /// Strictly positive dot product means the point sees the facet.
    pub fn visible_from_point(&self, points: &[[i64; N]], facet_vertex: u32, point: u32) -> bool {
        self.dot_sign(points, facet_vertex, point) > 0
    }

    /// Unit normal in `f64`. Components are exact to 53 bits before the
    /// normalisation, which the bit budgets keep well inside `f64` range.
    pub fn to_unit(&self) -> SVector<f64, N> {
        let v = SVector::<f64, N>::from_fn(|i, _| self.ortho[i].to_f64());
        v.normalize()
    }

    /// Lower-hull filter for the Delaunay lifting.
    pub fn last_coordinate_is_negative(&self) -> bool {
        self.ortho[N - 1].signum() < 0
    }
}

enum Oriented<C: ExactScalar, const N: usize> {
    Done(FacetOrtho<C, N>),
    OnPlane(FacetOrtho<C, N>),
}

fn negate<C: ExactScalar, const N: usize>(v: &mut [C; N]) {
    for c in v.iter_mut() {
        *c = c.neg();
    }
}

/// True if some component pair has strictly opposite signs.
fn are_opposite<C: ExactScalar, const N: usize>(a: &[C; N], b: &[C; N]) -> bool {
    (0..N).any(|i| a[i].signum() * b[i].signum() == -1)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Unit square corners plus its centre in 2D.
    fn points() -> Vec<[i64; 2]> {
        vec![[0, 0], [4, 0], [0, 4], [4, 4], [2, 2]]
    }

    #[test]
    fn orientation_away_from_direction_point() {
        let points = points();
        // Facet {0, 1} is the bottom edge; centre as direction point.
        let ortho = FacetOrtho::<i128, 2>::oriented(&points, &[0, 1], 4).unwrap();
        // Outward normal points to negative y: the top corner must not see it.
        assert!(!ortho.visible_from_point(&points, 0, 3));
        assert!(ortho.dot_sign(&points, 0, 3) < 0);
        assert_eq!(ortho.dot_sign(&points, 0, 1), 0);
        let unit = ortho.to_unit();
        assert!((unit[0] - 0.0).abs() < 1e-12 && (unit[1] + 1.0).abs() < 1e-12);
    }

    #[test]
    fn direction_point_on_plane_is_an_error() {
        let points = points();
        let err = FacetOrtho::<i128, 2>::oriented(&points, &[0, 1], 1).unwrap_err();
        assert_eq!(err, Error::DirectionOnFacetPlane);
    }

    #[test]
    fn direction_facet_resolves_on_plane_case() {
        let points = points();
        let reference = FacetOrtho::<i128, 2>::oriented(&points, &[0, 1], 4).unwrap();
        // Direction point 1 lies on the facet plane of {0, 1}; the already
        // oriented facet settles the sign.
        let ortho = FacetOrtho::<i128, 2>::oriented_by_facet(&points, &[0, 1], 1, &reference);
        assert!((ortho.to_unit() - reference.to_unit()).norm() < 1e-12);
    }
}
