//! Cocone and BoundCocone surface reconstruction.
//!
//! The constructor computes the Delaunay complex of the samples once and
//! derives the per-vertex pole data; `cocone` and `bound_cocone` then share
//! the prune → extract → emit backbone, differing only in which vertices
//! count as interior. BoundCocone needs the heights, radii and neighbour
//! sets, so a cocone-only constructor skips them and rejects `bound_cocone`.
//!
//! Reference: Dey, Curve and Surface Reconstruction: Algorithms with
//! Mathematical Analysis, chapters 4 and 5.

mod extract;
mod functions;
mod interior;
mod prune;
mod structure;


pub use structure::{ManifoldFacet, ManifoldVertex};

use log::info;
use nalgebra::SVector;

use crate::core::{
    compute_delaunay, create_delaunay_facets, create_delaunay_objects, DelaunayFacet,
    DelaunayObject, DelaunaySpace, Dim,
};
use crate::error::{Error, Result};
use crate::progress::Progress;
use extract::extract_manifold;
use interior::{find_interior_facets, find_interior_vertices};
use prune::prune_facets_incident_to_sharp_ridges;
use structure::{find_manifold_data, ManifoldData};

const RHO_MIN: f64 = 0.0;
const RHO_MAX: f64 = 1.0;
const ALPHA_MIN: f64 = 0.0;
const ALPHA_MAX: f64 = 1.0;

fn all_false(data: &[bool]) -> bool {
    !data.iter().any(|&v| v)
}

fn cocone_facet<const N: usize>(facet: &ManifoldFacet<N>) -> bool {
    facet.cocone_vertex.iter().all(|&v| v)
}

fn find_cocone_facets<const N: usize>(facets: &[ManifoldFacet<N>]) -> Vec<bool> {
    facets.iter().map(cocone_facet).collect()
}

fn create_facets<const N: usize>(
    delaunay_facets: &[DelaunayFacet<N>],
    cocone_facets: &[bool],
) -> Vec<[u32; N]> {
    delaunay_facets
        .iter()
        .zip(cocone_facets)
        .filter(|(_, &keep)| keep)
        .map(|(facet, _)| *facet.vertices())
        .collect()
}

fn check_rho_and_alpha(rho: f64, alpha: f64) -> Result<()> {
    if !(rho > RHO_MIN && rho < RHO_MAX) {
        return Err(Error::RhoOutOfRange { rho });
    }
    if !(alpha > ALPHA_MIN && alpha < ALPHA_MAX) {
        return Err(Error::AlphaOutOfRange { alpha });
    }
    Ok(())
}

/// Reconstructor handle; call as `ManifoldConstructor::<N, { N + 1 }>`.
pub struct ManifoldConstructor<const N: usize, const NP: usize> {
    cocone_only: bool,
    source_points: Vec<SVector<f32, N>>,
    points: Vec<SVector<f64, N>>,
    delaunay_objects: Vec<DelaunayObject<N, NP>>,
    delaunay_facets: Vec<DelaunayFacet<N>>,
    vertex_data: Vec<ManifoldVertex<N>>,
    facet_data: Vec<ManifoldFacet<N>>,
}

impl<const N: usize, const NP: usize> ManifoldConstructor<N, NP>
where
    Dim<N>: DelaunaySpace,
{
    fn new(source_points: &[SVector<f32, N>], cocone_only: bool, progress: &Progress) -> Result<Self> {
        const { assert!(NP == N + 1) };

        if source_points.len() < N + 2 {
            return Err(Error::InputTooFewPoints {
                dimension: N,
                count: source_points.len(),
            });
        }

        info!("computing delaunay...");
        let delaunay = compute_delaunay::<N, NP>(source_points, progress)?;

        info!("creating delaunay objects...");
        let delaunay_objects = create_delaunay_objects(&delaunay.points, &delaunay.simplices)?;

        info!("creating delaunay facets...");
        let delaunay_facets = create_delaunay_facets(&delaunay.simplices)?;

        let ManifoldData { vertices, facets } = find_manifold_data(
            !cocone_only,
            &delaunay.points,
            &delaunay_objects,
            &delaunay_facets,
        )?;

        debug_assert_eq!(source_points.len(), delaunay.points.len());
        debug_assert_eq!(source_points.len(), vertices.len());

        Ok(Self {
            cocone_only,
            source_points: source_points.to_vec(),
            points: delaunay.points,
            delaunay_objects,
            delaunay_facets,
            vertex_data: vertices,
            facet_data: facets,
        })
    }

    fn compute_facets(
        &self,
        interior_vertices: &[bool],
        mut cocone_facets: Vec<bool>,
        progress: &Progress,
    ) -> Result<Vec<[u32; N]>> {
        progress.set(1, 4);
        info!("prune facets...");
        prune_facets_incident_to_sharp_ridges(
            &self.points,
            &self.delaunay_facets,
            interior_vertices,
            &mut cocone_facets,
        )?;
        if all_false(&cocone_facets) {
            return Err(Error::NoCoconeFacets { stage: "prune" });
        }

        progress.set(2, 4);
        info!("extract manifold...");
        let cocone_facets = extract_manifold(
            &self.delaunay_objects,
            &self.delaunay_facets,
            &cocone_facets,
        );
        if all_false(&cocone_facets) {
            return Err(Error::NoManifoldAfterExtraction);
        }

        progress.set(3, 4);
        info!("create result...");
        Ok(create_facets(&self.delaunay_facets, &cocone_facets))
    }

    /// Cocone reconstruction: every vertex counts as interior.
    pub fn cocone(&self, progress: &Progress) -> Result<Vec<[u32; N]>> {
        progress.set(0, 4);

        let interior_vertices = vec![true; self.vertex_data.len()];
        let cocone_facets = find_cocone_facets(&self.facet_data);
        if all_false(&cocone_facets) {
            return Err(Error::NoCoconeFacets { stage: "initial" });
        }

        self.compute_facets(&interior_vertices, cocone_facets, progress)
    }

    /// BoundCocone reconstruction for an ε-sample with boundaries.
    /// Typical parameters: `rho = 1.3 ε` with `ε = 0.1`, `alpha = 0.14`.
    pub fn bound_cocone(&self, rho: f64, alpha: f64, progress: &Progress) -> Result<Vec<[u32; N]>> {
        if self.cocone_only {
            return Err(Error::CoconeOnlyConstructor);
        }
        check_rho_and_alpha(rho, alpha)?;

        progress.set(0, 4);

        let interior_vertices =
            find_interior_vertices(rho, alpha.cos(), &self.vertex_data);
        if all_false(&interior_vertices) {
            return Err(Error::NoInteriorVertices);
        }

        let cocone_facets =
            find_interior_facets(&self.delaunay_facets, &self.facet_data, &interior_vertices);
        if all_false(&cocone_facets) {
            return Err(Error::NoCoconeFacets { stage: "interior" });
        }

        self.compute_facets(&interior_vertices, cocone_facets, progress)
    }

    /// The source samples, as given.
    pub fn points(&self) -> &[SVector<f32, N>] {
        &self.source_points
    }

    /// Vertex tuples of the Delaunay cells.
    pub fn delaunay_objects(&self) -> Vec<[u32; NP]> {
        self.delaunay_objects.iter().map(|o| o.vertices).collect()
    }

    /// Per-vertex positive pole unit vectors; zero for vertices the Delaunay
    /// complex does not use.
    pub fn normals(&self) -> Vec<SVector<f64, N>> {
        self.vertex_data
            .iter()
            .map(|v| v.positive_norm)
            .collect()
    }
}

/// Constructor for both Cocone and BoundCocone.
pub fn create_manifold_constructor<const N: usize, const NP: usize>(
    source_points: &[SVector<f32, N>],
    progress: &Progress,
) -> Result<ManifoldConstructor<N, NP>>
where
    Dim<N>: DelaunaySpace,
{
    ManifoldConstructor::new(source_points, false, progress)
}

/// Constructor for Cocone only; skips the height/radius/neighbour data.
pub fn create_manifold_constructor_cocone<const N: usize, const NP: usize>(
    source_points: &[SVector<f32, N>],
    progress: &Progress,
) -> Result<ManifoldConstructor<N, NP>>
where
    Dim<N>: DelaunaySpace,
{
    ManifoldConstructor::new(source_points, true, progress)
}
