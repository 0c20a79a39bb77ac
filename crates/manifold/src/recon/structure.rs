//! Per-vertex poles, heights, cocone radii and per-facet cocone flags.
//!
//! For every sample vertex: the positive pole (outward normal direction of
//! its Voronoi cell), the height (distance to the negative pole) and the
//! cocone radius (farthest cocone point of any incident Voronoi edge). For
//! every Delaunay facet: one flag per vertex recording whether the facet's
//! Voronoi edge intersects that vertex's cocone.
//!
//! Reference: Dey, Curve and Surface Reconstruction, definitions 4.1 and 5.3.

use nalgebra::SVector;

use super::functions::{
    cocone_inside_or_equal, intersect_cocone_max_distance, voronoi_edge_intersects_cocone,
};
use crate::core::{DelaunayFacet, DelaunayObject};
use crate::error::{Error, Result};

// Cosine thresholds of the degenerate-intersection classification.
const LIMIT_COSINE_FOR_INTERSECTION_PA_POLE: f64 = 0.99;
const LIMIT_COSINE_FOR_INTERSECTION_PA_AB: f64 = -0.9999;

const MAX_VORONOI_EDGE_RADIUS: f64 = f64::MAX;

/// Reconstruction data of one sample vertex.
#[derive(Clone, Debug)]
pub struct ManifoldVertex<const N: usize> {
    pub positive_norm: SVector<f64, N>,
    pub height: f64,
    pub radius: f64,
    pub cocone_neighbors: Vec<u32>,
}

impl<const N: usize> ManifoldVertex<N> {
    fn new(positive_norm: SVector<f64, N>, height: f64, radius: f64) -> Self {
        Self {
            positive_norm,
            height,
            radius,
            cocone_neighbors: Vec::new(),
        }
    }
}

/// Per-facet cocone flags, one per facet vertex.
#[derive(Clone, Copy, Debug)]
pub struct ManifoldFacet<const N: usize> {
    pub cocone_vertex: [bool; N],
}

impl<const N: usize> Default for ManifoldFacet<N> {
    fn default() -> Self {
        Self {
            cocone_vertex: [false; N],
        }
    }
}

pub struct ManifoldData<const N: usize> {
    pub vertices: Vec<ManifoldVertex<N>>,
    pub facets: Vec<ManifoldFacet<N>>,
}

/// Incidences of one vertex: the Delaunay cells containing it and, for each
/// incident facet, the vertex's slot inside that facet.
#[derive(Default)]
struct VertexConnections {
    objects: Vec<u32>,
    facets: Vec<ConnectionFacet>,
}

struct ConnectionFacet {
    facet_index: u32,
    facet_vertex_index: u32,
}

fn vertex_connections<const N: usize, const NP: usize>(
    vertex_count: usize,
    objects: &[DelaunayObject<N, NP>],
    facets: &[DelaunayFacet<N>],
) -> Vec<VertexConnections> {
    let mut connections: Vec<VertexConnections> = Vec::new();
    connections.resize_with(vertex_count, VertexConnections::default);

    for (facet_index, facet) in facets.iter().enumerate() {
        for (local_index, &vertex) in facet.vertices().iter().enumerate() {
            debug_assert!((vertex as usize) < vertex_count);
            connections[vertex as usize].facets.push(ConnectionFacet {
                facet_index: facet_index as u32,
                facet_vertex_index: local_index as u32,
            });
        }
    }
    for (object_index, object) in objects.iter().enumerate() {
        for &vertex in &object.vertices {
            debug_assert!((vertex as usize) < vertex_count);
            connections[vertex as usize]
                .objects
                .push(object_index as u32);
        }
    }
    connections
}

fn is_unbounded<const N: usize>(
    delaunay_facets: &[DelaunayFacet<N>],
    connections: &VertexConnections,
) -> bool {
    connections
        .facets
        .iter()
        .any(|f| delaunay_facets[f.facet_index as usize].one_sided())
}

/// Positive pole of a vertex: for an unbounded Voronoi cell the average
/// outward direction of its hull facets, otherwise the direction of the
/// farthest Voronoi vertex.
fn voronoi_positive_norm<const N: usize, const NP: usize>(
    vertex: &SVector<f64, N>,
    delaunay_objects: &[DelaunayObject<N, NP>],
    delaunay_facets: &[DelaunayFacet<N>],
    connections: &VertexConnections,
) -> Result<SVector<f64, N>> {
    let positive_norm = if is_unbounded(delaunay_facets, connections) {
        let mut sum = SVector::<f64, N>::zeros();
        for f in &connections.facets {
            let facet = &delaunay_facets[f.facet_index as usize];
            if facet.one_sided() {
                sum += facet.ortho();
            }
        }
        sum.normalize()
    } else {
        let mut max_distance = f64::MIN;
        let mut max_vector = SVector::<f64, N>::zeros();
        for &object_index in &connections.objects {
            let vp = delaunay_objects[object_index as usize].voronoi_vertex - vertex;
            let distance = vp.norm_squared();
            if distance > max_distance {
                max_distance = distance;
                max_vector = vp;
            }
        }
        max_vector.normalize()
    };

    if !positive_norm.iter().all(|c| c.is_finite()) {
        return Err(Error::PositivePoleNotFinite);
    }
    Ok(positive_norm)
}

/// Height of the Voronoi cell: distance to the farthest Voronoi vertex on
/// the opposite side of the tangent plane (the negative pole).
fn voronoi_height<const N: usize, const NP: usize>(
    vertex: &SVector<f64, N>,
    delaunay_objects: &[DelaunayObject<N, NP>],
    positive_pole_norm: &SVector<f64, N>,
    vertex_objects: &[u32],
) -> Result<f64> {
    let mut max_distance = f64::MIN;
    let mut found = false;

    for &object_index in vertex_objects {
        let vp = delaunay_objects[object_index as usize].voronoi_vertex - vertex;
        if vp.dot(positive_pole_norm) >= 0.0 {
            continue;
        }
        let distance = vp.norm_squared();
        if distance > max_distance {
            max_distance = distance;
            found = true;
        }
    }

    if !found {
        return Err(Error::NegativePoleNotFound);
    }
    let len = max_distance.sqrt();
    if !len.is_finite() {
        return Err(Error::NegativePoleNotFinite);
    }
    Ok(len)
}

struct EdgePoint<const N: usize> {
    v: SVector<f64, N>,
    length: f64,
    cos: f64,
}

fn compute_edge_point<const N: usize, const NP: usize>(
    index: usize,
    vertex: &SVector<f64, N>,
    delaunay_objects: &[DelaunayObject<N, NP>],
    positive_pole: &SVector<f64, N>,
    facet: &DelaunayFacet<N>,
) -> EdgePoint<N> {
    let v = delaunay_objects[facet.cell(index)].voronoi_vertex - vertex;
    let length = v.norm();
    let cos = positive_pole.dot(&v) / length;
    EdgePoint { v, length, cos }
}

/// Classify a missing cone intersection: tolerated when the edge start is
/// both close to the pole axis and directed back at the vertex, fatal
/// otherwise.
fn check_close_to_vertex<const N: usize>(
    one_sided: bool,
    pa: &SVector<f64, N>,
    pa_length: f64,
    cos_n_a: f64,
    a_to_b: &SVector<f64, N>,
) -> Result<()> {
    if cos_n_a.abs() > LIMIT_COSINE_FOR_INTERSECTION_PA_POLE {
        let a_to_b_length = if one_sided { 1.0 } else { a_to_b.norm() };
        let cos_pa_ab = pa.dot(a_to_b) / (pa_length * a_to_b_length);
        if cos_pa_ab < LIMIT_COSINE_FOR_INTERSECTION_PA_AB {
            // The edge immediately re-enters near the vertex itself.
            return Ok(());
        }
        return Err(Error::CoconeIntersectionNotFound { near_pole: true });
    }
    Err(Error::CoconeIntersectionNotFound { near_pole: false })
}

fn voronoi_edge_radius<const N: usize, const NP: usize>(
    delaunay_objects: &[DelaunayObject<N, NP>],
    facet: &DelaunayFacet<N>,
    positive_pole: &SVector<f64, N>,
    pa: &EdgePoint<N>,
    pb_length: f64,
    cos_n_b: f64,
) -> Result<f64> {
    if facet.one_sided() && cocone_inside_or_equal(cos_n_b) {
        // The unbounded edge runs inside the cocone forever.
        return Ok(MAX_VORONOI_EDGE_RADIUS);
    }

    if !facet.one_sided() && cocone_inside_or_equal(pa.cos) && cocone_inside_or_equal(cos_n_b) {
        return Ok(pa.length.max(pb_length));
    }

    // The Voronoi vertices differ here (equal ones are both inside the
    // cocone), so the edge vector is non-zero.
    let a_to_b = if facet.one_sided() {
        *facet.ortho()
    } else {
        delaunay_objects[facet.cell(1)].voronoi_vertex
            - delaunay_objects[facet.cell(0)].voronoi_vertex
    };

    let max_distance = match intersect_cocone_max_distance(positive_pole, &pa.v, &a_to_b) {
        Some(d) => d,
        None => {
            check_close_to_vertex(facet.one_sided(), &pa.v, pa.length, pa.cos, &a_to_b)?;
            0.0
        }
    };

    if !max_distance.is_finite() {
        return Err(Error::CoconeIntersectionNotFinite);
    }

    if cocone_inside_or_equal(pa.cos) {
        return Ok(pa.length.max(max_distance));
    }
    Ok(max_distance)
}

/// Walk the vertex's incident facets once: flag cocone intersections and,
/// when asked, accumulate the cocone radius.
fn cocone_facets_and_voronoi_radius<const N: usize, const NP: usize>(
    vertex: &SVector<f64, N>,
    delaunay_objects: &[DelaunayObject<N, NP>],
    delaunay_facets: &[DelaunayFacet<N>],
    positive_pole: &SVector<f64, N>,
    connections: &VertexConnections,
    facet_data: &mut [ManifoldFacet<N>],
    find_radius: bool,
) -> Result<f64> {
    debug_assert_eq!(delaunay_facets.len(), facet_data.len());

    let mut radius: f64 = 0.0;

    for vertex_facet in &connections.facets {
        let facet = &delaunay_facets[vertex_facet.facet_index as usize];

        let pa = compute_edge_point(0, vertex, delaunay_objects, positive_pole, facet);
        let (pb_length, pb_cos) = if facet.one_sided() {
            (0.0, positive_pole.dot(facet.ortho()))
        } else {
            let pb = compute_edge_point(1, vertex, delaunay_objects, positive_pole, facet);
            (pb.length, pb.cos)
        };

        if !voronoi_edge_intersects_cocone(pa.cos, pb_cos) {
            continue;
        }

        // The facet becomes a cocone facet only if the edge intersects the
        // cocones of all N facet vertices; this records the one found here.
        facet_data[vertex_facet.facet_index as usize].cocone_vertex
            [vertex_facet.facet_vertex_index as usize] = true;

        if find_radius && radius != MAX_VORONOI_EDGE_RADIUS {
            let edge_radius = voronoi_edge_radius(
                delaunay_objects,
                facet,
                positive_pole,
                &pa,
                pb_length,
                pb_cos,
            )?;
            radius = radius.max(edge_radius);
        }
    }

    debug_assert!(!find_radius || (radius > 0.0 && radius <= MAX_VORONOI_EDGE_RADIUS));

    Ok(radius)
}

/// Cocone neighbours: vertices sharing a flagged facet vertex with this one.
fn cocone_neighbors<const N: usize>(
    delaunay_facets: &[DelaunayFacet<N>],
    facet_data: &[ManifoldFacet<N>],
    connections: &[VertexConnections],
    vertex_data: &mut [ManifoldVertex<N>],
) {
    debug_assert_eq!(delaunay_facets.len(), facet_data.len());
    debug_assert_eq!(connections.len(), vertex_data.len());

    for (vertex_index, connection) in connections.iter().enumerate() {
        for vertex_facet in &connection.facets {
            let facet_index = vertex_facet.facet_index as usize;
            let skip_index = vertex_facet.facet_vertex_index as usize;
            for i in 0..N {
                if i == skip_index {
                    debug_assert_eq!(
                        delaunay_facets[facet_index].vertices()[i] as usize,
                        vertex_index
                    );
                    continue;
                }
                if facet_data[facet_index].cocone_vertex[i] {
                    vertex_data[vertex_index]
                        .cocone_neighbors
                        .push(delaunay_facets[facet_index].vertices()[i]);
                }
            }
        }
        let neighbors = &mut vertex_data[vertex_index].cocone_neighbors;
        neighbors.sort_unstable();
        neighbors.dedup();
    }
}

/// Build the per-vertex and per-facet reconstruction data in one pass over
/// the vertex-facet incidences. Heights, radii and neighbours are only
/// needed by BoundCocone and are skipped in plain cocone mode.
pub fn find_manifold_data<const N: usize, const NP: usize>(
    find_cocone_neighbors: bool,
    points: &[SVector<f64, N>],
    objects: &[DelaunayObject<N, NP>],
    facets: &[DelaunayFacet<N>],
) -> Result<ManifoldData<N>> {
    let connections = vertex_connections(points.len(), objects, facets);

    let mut vertex_data: Vec<ManifoldVertex<N>> = Vec::with_capacity(points.len());
    let mut facet_data: Vec<ManifoldFacet<N>> = vec![ManifoldFacet::default(); facets.len()];

    for (v, connection) in connections.iter().enumerate() {
        if connection.facets.is_empty() && connection.objects.is_empty() {
            // Not every input point is a Delaunay vertex: quantisation can
            // drop duplicates and the hull can skip coincident points.
            vertex_data.push(ManifoldVertex::new(SVector::zeros(), 0.0, 0.0));
            continue;
        }
        debug_assert!(!connection.facets.is_empty() && !connection.objects.is_empty());

        let positive_norm = voronoi_positive_norm(&points[v], objects, facets, connection)?;

        if !find_cocone_neighbors {
            cocone_facets_and_voronoi_radius(
                &points[v],
                objects,
                facets,
                &positive_norm,
                connection,
                &mut facet_data,
                false,
            )?;
            vertex_data.push(ManifoldVertex::new(positive_norm, 0.0, 0.0));
        } else {
            let height = voronoi_height(&points[v], objects, &positive_norm, &connection.objects)?;
            let radius = cocone_facets_and_voronoi_radius(
                &points[v],
                objects,
                facets,
                &positive_norm,
                connection,
                &mut facet_data,
                true,
            )?;
            vertex_data.push(ManifoldVertex::new(positive_norm, height, radius));
        }
    }

    if find_cocone_neighbors {
        cocone_neighbors(facets, &facet_data, &connections, &mut vertex_data);
    }

    debug_assert_eq!(vertex_data.len(), points.len());

    Ok(ManifoldData {
        vertices: vertex_data,
        facets: facet_data,
    })
}
