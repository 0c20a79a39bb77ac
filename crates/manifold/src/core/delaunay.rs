//! Delaunay triangulation and its facet complex via paraboloid lifting.
//!
//! Every quantised point `p` is lifted to `(p, p·p)`; the convex hull of the
//! lifted points is computed in `N + 1` dimensions, and the facets whose
//! outward ortho has a strictly negative last coordinate (the lower envelope
//! of the paraboloid) project back onto the Delaunay cells. Cell facet
//! orthos are recomputed exactly in the original space, and each cell gets
//! its Voronoi vertex (circumcentre).
//!
//! Reference: Devadoss, O'Rourke, Discrete and Computational Geometry, 4.4.

use std::collections::HashMap;

use log::{debug, info};
use nalgebra::SVector;

use super::hull::compute_integer_hull;
use super::ortho::FacetOrtho;
use super::points::{max_lattice_value, QuantizedPoints, DELAUNAY_BITS};
use super::ridge::{add_to_ridge_map, Ridge, RidgePair};
use super::voronoi::compute_voronoi_vertex;
use super::{DelaunaySpace, Dim};
use crate::error::Result;
use crate::progress::Progress;

/// Delaunay cell as produced by the lifting: vertex indices into the
/// caller's point array and one outward ortho per cell facet (slot `r`
/// corresponds to dropping vertex `r`).
#[derive(Clone, Debug)]
pub struct DelaunaySimplex<const N: usize, const NP: usize> {
    pub vertices: [u32; NP],
    pub orthos: [SVector<f64, N>; NP],
}

/// Delaunay cell with its Voronoi vertex.
#[derive(Clone, Debug)]
pub struct DelaunayObject<const N: usize, const NP: usize> {
    pub vertices: [u32; NP],
    pub voronoi_vertex: SVector<f64, N>,
}

/// Facet between one or two Delaunay cells. One-sided facets lie on the
/// convex hull of the input and carry the outward-pointing ortho.
#[derive(Clone, Debug)]
pub struct DelaunayFacet<const N: usize> {
    vertices: [u32; N],
    ortho: SVector<f64, N>,
    cells: [i32; 2],
}

impl<const N: usize> DelaunayFacet<N> {
    pub fn vertices(&self) -> &[u32; N] {
        &self.vertices
    }

    pub fn ortho(&self) -> &SVector<f64, N> {
        &self.ortho
    }

    pub fn one_sided(&self) -> bool {
        self.cells[1] < 0
    }

    /// Incident cell 0 or 1; index 1 requires a two-sided facet.
    pub fn cell(&self, index: usize) -> usize {
        debug_assert!(index == 0 || (index == 1 && self.cells[1] >= 0));
        self.cells[index] as usize
    }
}

/// Output of [`compute_delaunay`]: the quantised points in `f64` (indexed
/// like the caller's array, zero where a duplicate was dropped) and the
/// cells.
#[derive(Debug)]
pub struct DelaunayData<const N: usize, const NP: usize> {
    pub points: Vec<SVector<f64, N>>,
    pub simplices: Vec<DelaunaySimplex<N, NP>>,
}

/// Delaunay triangulation of `points`; call as `compute_delaunay::<N, { N + 1 }>`.
pub fn compute_delaunay<const N: usize, const NP: usize>(
    points: &[SVector<f32, N>],
    progress: &Progress,
) -> Result<DelaunayData<N, NP>>
where
    Dim<N>: DelaunaySpace,
{
    const { assert!(NP == N + 1) };

    info!("delaunay in {NP}D integer, {} points", points.len());
    debug!("{}", super::delaunay_type_description::<N>());
    let quantized = QuantizedPoints::new(points, max_lattice_value(DELAUNAY_BITS))?;

    let lifted = lift_to_paraboloid::<N, NP>(quantized.points());
    let hull_facets = compute_integer_hull::<<Dim<N> as DelaunaySpace>::ParaboloidCompute, NP>(
        &lifted, progress,
    )?;

    let simplices =
        lower_hull_simplices::<N, NP>(&quantized, &hull_facets)?;
    debug!("delaunay in {NP}D done, {} cells", simplices.len());

    let mut result_points = vec![SVector::<f64, N>::zeros(); points.len()];
    for (i, p) in quantized.points().iter().enumerate() {
        result_points[quantized.restore_index(i) as usize] =
            SVector::from_fn(|k, _| p[k] as f64);
    }

    Ok(DelaunayData {
        points: result_points,
        simplices,
    })
}

fn lift_to_paraboloid<const N: usize, const NP: usize>(points: &[[i64; N]]) -> Vec<[i64; NP]> {
    points
        .iter()
        .map(|p| {
            let mut lifted = [0i64; NP];
            for i in 0..N {
                lifted[i] = p[i];
                lifted[NP - 1] += p[i] * p[i];
            }
            lifted
        })
        .collect()
}

fn lower_hull_simplices<const N: usize, const NP: usize>(
    quantized: &QuantizedPoints<N>,
    hull_facets: &[super::hull::HullFacet<
        <Dim<N> as DelaunaySpace>::ParaboloidCompute,
        NP,
    >],
) -> Result<Vec<DelaunaySimplex<N, NP>>>
where
    Dim<N>: DelaunaySpace,
{
    let points = quantized.points();
    let mut res = Vec::with_capacity(hull_facets.len());
    for facet in hull_facets {
        if !facet.ortho.last_coordinate_is_negative() {
            // Not the lower convex hull.
            continue;
        }
        let vertices = &facet.vertices;
        let mut orthos = [SVector::<f64, N>::zeros(); NP];
        for r in 0..NP {
            // The cell facet that drops vertex `r`, oriented away from it.
            let mut cell_facet = [0u32; N];
            let mut k = 0;
            for (i, &v) in vertices.iter().enumerate() {
                if i != r {
                    cell_facet[k] = v;
                    k += 1;
                }
            }
            let ortho = FacetOrtho::<<Dim<N> as DelaunaySpace>::Compute, N>::oriented(
                points,
                &super::arrays::sorted(cell_facet),
                vertices[r],
            )?;
            orthos[r] = ortho.to_unit();
        }
        res.push(DelaunaySimplex {
            vertices: quantized.restore_indices(vertices),
            orthos,
        });
    }
    Ok(res)
}

/// Pair each cell with its circumcentre.
pub fn create_delaunay_objects<const N: usize, const NP: usize>(
    points: &[SVector<f64, N>],
    simplices: &[DelaunaySimplex<N, NP>],
) -> Result<Vec<DelaunayObject<N, NP>>> {
    let mut res = Vec::with_capacity(simplices.len());
    for simplex in simplices {
        res.push(DelaunayObject {
            vertices: simplex.vertices,
            voronoi_vertex: compute_voronoi_vertex::<N, NP>(points, &simplex.vertices)?,
        });
    }
    Ok(res)
}

/// Derive the facet complex: one facet per distinct cell ridge, carrying the
/// ortho of the first incident cell and the indices of both cells when the
/// ridge is interior.
pub fn create_delaunay_facets<const N: usize, const NP: usize>(
    simplices: &[DelaunaySimplex<N, NP>],
) -> Result<Vec<DelaunayFacet<N>>> {
    const { assert!(NP == N + 1) };

    let mut ridges: HashMap<Ridge<NP>, RidgePair> = HashMap::with_capacity(simplices.len());
    for (i, simplex) in simplices.iter().enumerate() {
        add_to_ridge_map(&mut ridges, i, &simplex.vertices)?;
    }

    let mut res = Vec::with_capacity(ridges.len());
    for (ridge, pair) in &ridges {
        let first = pair.first();
        let ortho = simplices[first.facet].orthos[first.external_index];
        let vertices: [u32; N] = std::array::from_fn(|i| ridge.vertices()[i]);

        let cells = match pair.second() {
            None => [first.facet as i32, -1],
            Some(second) => {
                debug_assert!(
                    (ortho + simplices[second.facet].orthos[second.external_index]).norm() < 1e-9,
                    "two-sided facet orthos are not opposite"
                );
                [first.facet as i32, second.facet as i32]
            }
        };
        res.push(DelaunayFacet {
            vertices,
            ortho,
            cells,
        });
    }
    Ok(res)
}
