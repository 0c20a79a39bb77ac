//! Interior-vertex detection for BoundCocone.
//!
//! A vertex is interior when its Voronoi cell is flat enough: the cocone
//! radius is small against the cell height and the positive poles of its
//! cocone neighbourhood agree in direction. An initial strict phase seeds the
//! set; an expansion phase grows it through neighbours until stable.
//!
//! Reference: Dey, Curve and Surface Reconstruction, chapter 5
//! (undersampling), definition 5.4.

use log::info;

use super::structure::{ManifoldFacet, ManifoldVertex};
use crate::core::DelaunayFacet;

// Definition 5.4 (i).
fn ratio_condition<const N: usize>(vertex: &ManifoldVertex<N>, rho: f64) -> bool {
    vertex.radius <= rho * vertex.height
}

// Definition 5.4 (ii). The absolute value is taken because the positive
// poles of adjacent cells can point to opposite sides of the surface.
fn normal_condition<const N: usize>(
    v1: &ManifoldVertex<N>,
    v2: &ManifoldVertex<N>,
    cos_of_alpha: f64,
) -> bool {
    v1.positive_norm.dot(&v2.positive_norm).abs() >= cos_of_alpha
}

fn initial_phase<const N: usize>(
    rho: f64,
    cos_of_alpha: f64,
    vertices: &[ManifoldVertex<N>],
    interior: &mut [bool],
) -> usize {
    let mut count = 0;
    for (v, vertex) in vertices.iter().enumerate() {
        if !ratio_condition(vertex, rho) {
            continue;
        }
        let flat = vertex
            .cocone_neighbors
            .iter()
            .all(|&index| normal_condition(vertex, &vertices[index as usize], cos_of_alpha));
        if flat {
            interior[v] = true;
            count += 1;
        }
    }
    count
}

fn expansion_phase<const N: usize>(
    rho: f64,
    cos_of_alpha: f64,
    vertices: &[ManifoldVertex<N>],
    interior: &mut [bool],
) -> usize {
    let mut count = 0;
    for v in 0..vertices.len() {
        if interior[v] {
            continue;
        }
        let vertex = &vertices[v];
        if !ratio_condition(vertex, rho) {
            continue;
        }
        for &index in &vertex.cocone_neighbors {
            if !interior[index as usize] {
                continue;
            }
            if normal_condition(vertex, &vertices[index as usize], cos_of_alpha) {
                interior[v] = true;
                count += 1;
                break;
            }
        }
    }
    count
}

pub fn find_interior_vertices<const N: usize>(
    rho: f64,
    cos_of_alpha: f64,
    vertices: &[ManifoldVertex<N>],
) -> Vec<bool> {
    let mut interior = vec![false; vertices.len()];

    let mut interior_count = initial_phase(rho, cos_of_alpha, vertices, &mut interior);
    info!(
        "interior vertices initial phase: {interior_count} of {}",
        vertices.len()
    );
    if interior_count == 0 {
        return interior;
    }

    loop {
        let count = expansion_phase(rho, cos_of_alpha, vertices, &mut interior);
        if count == 0 {
            break;
        }
        interior_count += count;
    }
    info!(
        "interior vertices expansion phase: {interior_count} of {}",
        vertices.len()
    );

    interior
}

/// A facet is kept when every vertex is either boundary, or interior with
/// the facet inside its cocone, and at least one vertex is of the second
/// kind.
fn interior_facet<const N: usize>(
    delaunay_facets: &[DelaunayFacet<N>],
    manifold_facets: &[ManifoldFacet<N>],
    interior_vertices: &[bool],
    facet: usize,
) -> bool {
    let mut found = false;
    for v in 0..N {
        let interior = interior_vertices[delaunay_facets[facet].vertices()[v] as usize];
        let interior_cocone = interior && manifold_facets[facet].cocone_vertex[v];
        let boundary = !interior;
        if !(interior_cocone || boundary) {
            return false;
        }
        found = found || interior_cocone;
    }
    found
}

pub fn find_interior_facets<const N: usize>(
    delaunay_facets: &[DelaunayFacet<N>],
    facet_data: &[ManifoldFacet<N>],
    interior_vertices: &[bool],
) -> Vec<bool> {
    debug_assert_eq!(delaunay_facets.len(), facet_data.len());
    (0..facet_data.len())
        .map(|i| interior_facet(delaunay_facets, facet_data, interior_vertices, i))
        .collect()
}
