//! Pruning of cocone facets incident to sharp ridges.
//!
//! A ridge whose incident facets all fit inside an open 90° dihedral wedge
//! cannot be part of a well-sampled surface; its facets are unflagged and the
//! ridges they leave behind are re-examined, until no sharp ridge remains.
//! Ridges touching a boundary (non-interior) vertex are exempt.
//!
//! Reference: Dey, Curve and Surface Reconstruction, 4.1.3.

use std::collections::{HashMap, HashSet};

use nalgebra::{SVector, Vector2};

use crate::core::ridge::{
    add_to_ridge_map, add_to_ridge_set, remove_from_ridge_map, Ridge, RidgeFacetList,
};
use crate::core::DelaunayFacet;
use crate::error::Result;
use crate::numerical::orthogonal_complement;

type RidgeMap<const N: usize> = HashMap<Ridge<N>, RidgeFacetList>;
type RidgeSet<const N: usize> = HashSet<Ridge<N>>;

/// Orthonormal basis of the 2D orthogonal complement of a ridge.
struct RidgeComplement<const N: usize> {
    e0: SVector<f64, N>,
    e1: SVector<f64, N>,
}

impl<const N: usize> RidgeComplement<N> {
    /// `e0` completes the ridge plus one incident point to a hyperplane;
    /// `e1` completes the ridge plus `e0`.
    fn new(points: &[SVector<f64, N>], ridge_vertices: &[u32], point: u32) -> Self {
        debug_assert_eq!(ridge_vertices.len(), N - 1);
        let origin = &points[ridge_vertices[0] as usize];

        let mut vectors: Vec<SVector<f64, N>> = Vec::with_capacity(N - 1);
        for &v in &ridge_vertices[1..] {
            vectors.push(points[v as usize] - origin);
        }
        vectors.push(points[point as usize] - origin);

        let e0 = orthogonal_complement(&vectors).normalize();
        vectors[N - 2] = e0;
        let e1 = orthogonal_complement(&vectors).normalize();
        Self { e0, e1 }
    }

    fn coordinates(&self, v: &SVector<f64, N>) -> Vector2<f64> {
        Vector2::new(self.e0.dot(v), self.e1.dot(v)).normalize()
    }
}

/// Extremal deviation angles of the incident facets from the first facet,
/// split by the sign of the sine (the two half-planes of the wedge).
struct Angles {
    cos_plus: f64,
    cos_minus: f64,
    sin_plus: f64,
    sin_minus: f64,
}

fn compute_angles<const N: usize>(
    points: &[SVector<f64, N>],
    ridge: &Ridge<N>,
    facets: &[(usize, u32)],
) -> Angles {
    debug_assert!(facets.len() >= 2);

    let basis = RidgeComplement::new(points, ridge.vertices(), facets[0].1);
    let origin = &points[ridge.vertices()[0] as usize];

    let base = basis.coordinates(&(points[facets[0].1 as usize] - origin));
    debug_assert!(base.iter().all(|c| c.is_finite()));

    let mut res = Angles {
        cos_plus: 1.0,
        cos_minus: 1.0,
        sin_plus: 0.0,
        sin_minus: 0.0,
    };

    for &(_, point) in &facets[1..] {
        let v = basis.coordinates(&(points[point as usize] - origin));
        debug_assert!(v.iter().all(|c| c.is_finite()));

        let sine = base.x * v.y - base.y * v.x;
        let cosine = base.dot(&v);

        if sine >= 0.0 {
            if cosine < res.cos_plus {
                res.cos_plus = cosine;
                res.sin_plus = sine;
            }
        } else if cosine < res.cos_minus {
            res.cos_minus = cosine;
            res.sin_minus = sine;
        }
    }

    res
}

fn boundary_ridge<const N: usize>(interior_vertices: &[bool], ridge: &Ridge<N>) -> bool {
    ridge
        .vertices()
        .iter()
        .any(|&v| !interior_vertices[v as usize])
}

/// Sharp iff all incident facets fit in an open 90° wedge: both extremal
/// angles under 90° and their sum under 90°, via
/// `cos(a + b) = cos(a)cos(b) − sin(a)|sin(b)|` (`sin_minus ≤ 0`).
fn sharp_ridge<const N: usize>(
    points: &[SVector<f64, N>],
    interior_vertices: &[bool],
    ridge: &Ridge<N>,
    facets: &[(usize, u32)],
) -> bool {
    debug_assert!(!facets.is_empty());

    if boundary_ridge(interior_vertices, ridge) {
        return false;
    }

    if facets.len() == 1 {
        // A dangling facet is sharp by default.
        return true;
    }

    let angles = compute_angles(points, ridge, facets);

    if angles.cos_plus <= 0.0 || angles.cos_minus <= 0.0 {
        return false;
    }

    debug_assert!(angles.sin_plus >= 0.0 && angles.sin_minus <= 0.0);
    let cos_a_plus_b =
        angles.cos_plus * angles.cos_minus - (angles.sin_plus * angles.sin_minus).abs();
    cos_a_plus_b > 0.0
}

fn prune<const N: usize>(
    points: &[SVector<f64, N>],
    delaunay_facets: &[DelaunayFacet<N>],
    interior_vertices: &[bool],
    suspicious_ridges: &RidgeSet<N>,
    cocone_facets: &mut [bool],
    ridge_map: &mut RidgeMap<N>,
) -> RidgeSet<N> {
    let mut next_ridges = RidgeSet::new();

    for ridge in suspicious_ridges {
        let Some(ridge_facets) = ridge_map.get(ridge) else {
            continue;
        };

        // (facet index, external vertex) pairs of the incident facets.
        let incident: Vec<(usize, u32)> = ridge_facets
            .iter()
            .map(|r| {
                (
                    r.facet,
                    delaunay_facets[r.facet].vertices()[r.external_index],
                )
            })
            .collect();

        if !sharp_ridge(points, interior_vertices, ridge, &incident) {
            continue;
        }

        for &(facet, external_point) in &incident {
            add_to_ridge_set(&mut next_ridges, delaunay_facets[facet].vertices(), external_point);
            cocone_facets[facet] = false;
        }
        for &(facet, _) in &incident {
            remove_from_ridge_map(ridge_map, facet, delaunay_facets[facet].vertices());
        }
    }

    next_ridges
}

/// Unflag every cocone facet incident to a sharp ridge, iterating as the
/// removals orphan further ridges.
pub fn prune_facets_incident_to_sharp_ridges<const N: usize>(
    points: &[SVector<f64, N>],
    delaunay_facets: &[DelaunayFacet<N>],
    interior_vertices: &[bool],
    cocone_facets: &mut [bool],
) -> Result<()> {
    debug_assert!(!delaunay_facets.is_empty());
    debug_assert_eq!(delaunay_facets.len(), cocone_facets.len());
    debug_assert_eq!(points.len(), interior_vertices.len());

    let mut ridge_map: RidgeMap<N> = RidgeMap::new();
    for (i, facet) in delaunay_facets.iter().enumerate() {
        if cocone_facets[i] {
            add_to_ridge_map(&mut ridge_map, i, facet.vertices())?;
        }
    }

    let mut suspicious: RidgeSet<N> = ridge_map.keys().copied().collect();
    while !suspicious.is_empty() {
        suspicious = prune(
            points,
            delaunay_facets,
            interior_vertices,
            &suspicious,
            cocone_facets,
            &mut ridge_map,
        );
    }
    Ok(())
}
