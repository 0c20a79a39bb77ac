//! Randomized incremental convex hull over exact integer points.
//!
//! The algorithm follows the conflict-list formulation: every facet knows the
//! points that see it and every pending point knows the facets it sees. An
//! insertion marks the visible facets, walks their boundary to find the
//! horizon ridges, creates one new facet per horizon ridge and rewires
//! neighbour links, then updates the conflict lists and drops the old facets.
//!
//! The horizon step is parallel: new-facet creation is partitioned over the
//! horizon ridges (each ridge names exactly one new facet and one link-facet
//! slot, so the work items are disjoint), and conflict-list maintenance is
//! partitioned over contiguous point ranges, so no two workers touch the same
//! per-point set. The neighbour-slot writes on the link facets are applied
//! when the created facets are committed, between the two parallel phases.
//!
//! References: de Berg, Cheong, van Kreveld, Overmars, Computational
//! Geometry, chapter 11; Devadoss, O'Rourke, Discrete and Computational
//! Geometry, chapter 4.

use std::collections::HashMap;

use log::{debug, info};
use nalgebra::SVector;
use rayon::prelude::*;

use super::arrays::{is_strictly_sorted, set_elem, sorted};
use super::ortho::FacetOrtho;
use super::points::{max_lattice_value, QuantizedPoints, CONVEX_HULL_BITS};
use super::pool::{FacetKey, FacetPool, NULL_KEY};
use super::ridge::Ridge;
use super::simplex::find_simplex_points;
use super::{Dim, HullSpace};
use crate::error::{Error, Result};
use crate::exact::ExactScalar;
use crate::progress::Progress;

/// Hull facet over the quantised points, kept exact for reuse by the
/// Delaunay derivation.
#[derive(Debug)]
pub(crate) struct HullFacet<C: ExactScalar, const N: usize> {
    pub vertices: [u32; N],
    pub ortho: FacetOrtho<C, N>,
}

/// Facet of the public convex hull API: indices into the caller's point
/// array plus the outward unit normal.
#[derive(Clone, Debug)]
pub struct ConvexHullSimplex<const N: usize> {
    pub vertices: [u32; N],
    pub ortho: SVector<f64, N>,
}

/// Convex hull of `points` as a list of oriented `(N-1)`-simplices.
///
/// The input is quantised onto a 30-bit lattice; every predicate afterwards
/// is exact, so the output orientation is reliable for any input within the
/// lattice resolution.
pub fn compute_convex_hull<const N: usize>(
    points: &[SVector<f32, N>],
    progress: &Progress,
) -> Result<Vec<ConvexHullSimplex<N>>>
where
    Dim<N>: HullSpace,
{
    info!("convex hull in {N}D, {} points", points.len());
    debug!("{}", super::hull_type_description::<N>());
    let quantized = QuantizedPoints::new(points, max_lattice_value(CONVEX_HULL_BITS))?;
    let facets = compute_integer_hull::<<Dim<N> as HullSpace>::Compute, N>(
        quantized.points(),
        progress,
    )?;
    debug!("convex hull in {N}D done, {} facets", facets.len());
    Ok(facets
        .into_iter()
        .map(|f| ConvexHullSimplex {
            vertices: quantized.restore_indices(&f.vertices),
            ortho: f.ortho.to_unit(),
        })
        .collect())
}

struct Facet<C: ExactScalar, const N: usize> {
    vertices: [u32; N],
    ortho: FacetOrtho<C, N>,
    conflicts: Vec<u32>,
    links: [FacetKey; N],
    visible: bool,
}

impl<C: ExactScalar, const N: usize> Facet<C, N> {
    fn oriented(points: &[[i64; N]], vertices: [u32; N], direction_point: u32) -> Result<Self> {
        let vertices = sorted(vertices);
        let ortho = FacetOrtho::oriented(points, &vertices, direction_point)?;
        Ok(Self::with_ortho(vertices, ortho))
    }

    fn with_direction_facet(
        points: &[[i64; N]],
        vertices: [u32; N],
        direction_point: u32,
        direction_facet: &FacetOrtho<C, N>,
    ) -> Self {
        let vertices = sorted(vertices);
        let ortho =
            FacetOrtho::oriented_by_facet(points, &vertices, direction_point, direction_facet);
        Self::with_ortho(vertices, ortho)
    }

    fn with_ortho(vertices: [u32; N], ortho: FacetOrtho<C, N>) -> Self {
        debug_assert!(is_strictly_sorted(&vertices));
        Self {
            vertices,
            ortho,
            conflicts: Vec::new(),
            links: [NULL_KEY; N],
            visible: false,
        }
    }

    fn visible_from(&self, points: &[[i64; N]], point: u32) -> bool {
        self.ortho.visible_from_point(points, self.vertices[0], point)
    }

    fn find_index_for_point(&self, point: u32) -> usize {
        self.vertices
            .iter()
            .position(|&v| v == point)
            .expect("local index not found for point")
    }

    fn find_link_index(&self, key: FacetKey) -> usize {
        self.links
            .iter()
            .position(|&l| l == key)
            .expect("link index not found for facet")
    }
}

/// Pairs facets along shared ridges and wires their neighbour slots.
/// Every ridge must be matched exactly twice; the counter check at the end
/// guards the complex's integrity.
struct FacetConnector<const N: usize> {
    map: HashMap<Ridge<N>, (FacetKey, usize)>,
    expected: usize,
    connected: usize,
}

impl<const N: usize> FacetConnector<N> {
    fn new(expected_ridge_count: usize) -> Self {
        Self {
            map: HashMap::with_capacity(expected_ridge_count),
            expected: expected_ridge_count,
            connected: 0,
        }
    }

    fn connect<C: ExactScalar>(
        &mut self,
        pool: &mut FacetPool<Facet<C, N>>,
        key: FacetKey,
        exclude_point: Option<u32>,
    ) {
        let vertices = pool.get(key).vertices;
        for r in 0..N {
            if Some(vertices[r]) == exclude_point {
                // The horizon ridge; the facet was connected across it at
                // creation time.
                continue;
            }
            let ridge = Ridge::excluding(&vertices, r);
            match self.map.remove(&ridge) {
                None => {
                    self.map.insert(ridge, (key, r));
                }
                Some((link_key, link_r)) => {
                    pool.get_mut(key).links[r] = link_key;
                    pool.get_mut(link_key).links[link_r] = key;
                    self.connected += 1;
                }
            }
        }
    }

    fn finish(self) {
        assert!(
            self.map.is_empty() && self.connected == self.expected,
            "facet connector: {} of {} ridges connected, {} unmatched",
            self.connected,
            self.expected,
            self.map.len()
        );
    }
}

/// One horizon ridge: a visible facet, the slot of the ridge in it, and the
/// link facet on the other side with the slot pointing back.
struct HorizonItem {
    facet: FacetKey,
    ridge_index: usize,
    link: FacetKey,
    link_index: usize,
}

pub(crate) fn compute_integer_hull<C: ExactScalar, const N: usize>(
    points: &[[i64; N]],
    progress: &Progress,
) -> Result<Vec<HullFacet<C, N>>> {
    if points.len() < N + 1 {
        return Err(Error::InputTooFewPoints {
            dimension: N,
            count: points.len(),
        });
    }

    let simplex = find_simplex_points::<C, N>(points)?;
    debug_assert_eq!(simplex.len(), N + 1);

    let mut pool: FacetPool<Facet<C, N>> = FacetPool::new();
    create_initial_convex_hull(points, &simplex, &mut pool)?;

    let mut enabled = vec![true; points.len()];
    for &v in &simplex {
        enabled[v as usize] = false;
    }

    let mut point_conflicts: Vec<Vec<FacetKey>> = vec![Vec::new(); points.len()];
    create_initial_conflict_lists(points, &enabled, &mut pool, &mut point_conflicts);

    let mut processed = N + 1;
    for i in 0..points.len() {
        if !enabled[i] {
            continue;
        }
        progress.set(processed, points.len());
        processed += 1;
        add_point_to_convex_hull(points, i as u32, &mut pool, &mut point_conflicts)?;
    }

    debug_assert!(pool.iter().all(|(_, f)| f.conflicts.is_empty()));

    Ok(pool
        .into_values()
        .map(|f| HullFacet {
            vertices: f.vertices,
            ortho: f.ortho,
        })
        .collect())
}

fn create_initial_convex_hull<C: ExactScalar, const N: usize>(
    points: &[[i64; N]],
    simplex: &[u32],
    pool: &mut FacetPool<Facet<C, N>>,
) -> Result<()> {
    let mut keys = Vec::with_capacity(N + 1);
    for i in 0..N + 1 {
        let mut vertices = [0u32; N];
        let mut k = 0;
        for (j, &v) in simplex.iter().enumerate() {
            if j != i {
                vertices[k] = v;
                k += 1;
            }
        }
        let facet = Facet::oriented(points, vertices, simplex[i])?;
        keys.push(pool.insert(facet));
    }

    // The initial simplex has C(N + 1, 2) ridges.
    let ridge_count = (N + 1) * N / 2;
    let mut connector = FacetConnector::new(ridge_count);
    for &key in &keys {
        connector.connect(pool, key, None);
    }
    connector.finish();
    Ok(())
}

fn create_initial_conflict_lists<C: ExactScalar, const N: usize>(
    points: &[[i64; N]],
    enabled: &[bool],
    pool: &mut FacetPool<Facet<C, N>>,
    point_conflicts: &mut [Vec<FacetKey>],
) {
    let keys: Vec<FacetKey> = pool.iter().map(|(k, _)| k).collect();
    for key in keys {
        let mut conflicts = Vec::new();
        {
            let facet = pool.get(key);
            for (p, &en) in enabled.iter().enumerate() {
                if en && facet.visible_from(points, p as u32) {
                    conflicts.push(p as u32);
                }
            }
        }
        for &p in &conflicts {
            point_conflicts[p as usize].push(key);
        }
        pool.get_mut(key).conflicts = conflicts;
    }
}

fn add_point_to_convex_hull<C: ExactScalar, const N: usize>(
    points: &[[i64; N]],
    point: u32,
    pool: &mut FacetPool<Facet<C, N>>,
    point_conflicts: &mut [Vec<FacetKey>],
) -> Result<()> {
    let visible = std::mem::take(&mut point_conflicts[point as usize]);
    if visible.is_empty() {
        // The point is inside the convex hull.
        return Ok(());
    }
    if visible.len() >= pool.len() {
        return Err(Error::AllFacetsVisible);
    }

    for &k in &visible {
        pool.get_mut(k).visible = true;
    }

    let items = collect_horizon_items(pool, &visible);
    debug_assert!(!items.is_empty(), "horizon of a visible region is empty");

    // Horizon facet creation, partitioned over the horizon ridges. The pool
    // is read-only here; each worker carries a scratch bitmap over the point
    // set to merge the two parent conflict lists without quadratic scans.
    let pool_ref = &*pool;
    let created: Vec<Facet<C, N>> = items
        .par_iter()
        .map_init(
            || vec![false; points.len()],
            |scratch, item| create_horizon_facet(points, point, pool_ref, item, scratch),
        )
        .collect();

    // Commit the new facets: insert, point them at their link facet across
    // the horizon ridge, and patch the link facet's slot back.
    let mut new_keys = Vec::with_capacity(created.len());
    for (item, mut facet) in items.iter().zip(created) {
        let point_index = facet.find_index_for_point(point);
        facet.links[point_index] = item.link;
        let key = pool.insert(facet);
        pool.get_mut(item.link).links[item.link_index] = key;
        new_keys.push(key);
    }

    // Connect the new facets among themselves along non-horizon ridges. All
    // of them share `point`, so every such ridge belongs to exactly two.
    let ridge_count = (N - 1) * new_keys.len() / 2;
    let mut connector = FacetConnector::new(ridge_count);
    for &key in &new_keys {
        connector.connect(pool, key, Some(point));
    }
    connector.finish();

    update_conflict_lists(pool, point, &visible, &new_keys, point_conflicts);

    for &k in &visible {
        pool.remove(k);
    }
    Ok(())
}

fn collect_horizon_items<C: ExactScalar, const N: usize>(
    pool: &FacetPool<Facet<C, N>>,
    visible: &[FacetKey],
) -> Vec<HorizonItem> {
    let mut items = Vec::new();
    for &k in visible {
        for r in 0..N {
            let link = pool.get(k).links[r];
            if pool.get(link).visible {
                continue;
            }
            items.push(HorizonItem {
                facet: k,
                ridge_index: r,
                link,
                link_index: pool.get(link).find_link_index(k),
            });
        }
    }
    items
}

fn create_horizon_facet<C: ExactScalar, const N: usize>(
    points: &[[i64; N]],
    point: u32,
    pool: &FacetPool<Facet<C, N>>,
    item: &HorizonItem,
    scratch: &mut [bool],
) -> Facet<C, N> {
    let facet = pool.get(item.facet);
    let link = pool.get(item.link);

    let vertices = set_elem(&facet.vertices, item.ridge_index, point);
    let mut new_facet = Facet::with_direction_facet(
        points,
        vertices,
        link.vertices[item.link_index],
        &link.ortho,
    );

    // Conflict candidates are the union of the two parent lists.
    for &p in &facet.conflicts {
        scratch[p as usize] = true;
        if p != point && new_facet.visible_from(points, p) {
            new_facet.conflicts.push(p);
        }
    }
    for &p in &link.conflicts {
        if scratch[p as usize] {
            continue;
        }
        if p != point && new_facet.visible_from(points, p) {
            new_facet.conflicts.push(p);
        }
    }
    for &p in &facet.conflicts {
        scratch[p as usize] = false;
    }

    new_facet
}

fn update_conflict_lists<C: ExactScalar, const N: usize>(
    pool: &FacetPool<Facet<C, N>>,
    point: u32,
    visible: &[FacetKey],
    new_keys: &[FacetKey],
    point_conflicts: &mut [Vec<FacetKey>],
) {
    // Partitioned over contiguous point ranges so every per-point set has a
    // single owner; the shuffle makes the ranges statistically even.
    let thread_count = rayon::current_num_threads().max(1);
    let chunk = point_conflicts.len().div_ceil(thread_count);
    point_conflicts
        .par_chunks_mut(chunk)
        .enumerate()
        .for_each(|(chunk_index, sets)| {
            let lo = (chunk_index * chunk) as u32;
            let hi = lo + sets.len() as u32;
            // Erase first, then add; this keeps the searches short.
            for &vk in visible {
                for &p in &pool.get(vk).conflicts {
                    if p != point && p >= lo && p < hi {
                        erase_key(&mut sets[(p - lo) as usize], vk);
                    }
                }
            }
            for &nk in new_keys {
                for &p in &pool.get(nk).conflicts {
                    debug_assert!(p != point);
                    if p >= lo && p < hi {
                        sets[(p - lo) as usize].push(nk);
                    }
                }
            }
        });
}

fn erase_key(set: &mut Vec<FacetKey>, key: FacetKey) {
    let pos = set
        .iter()
        .position(|&k| k == key)
        .expect("facet not found in conflict storage");
    set.swap_remove(pos);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_square_hull() {
        // Unit square corners plus interior points.
        let points: Vec<[i64; 2]> = vec![[0, 0], [8, 0], [0, 8], [8, 8], [4, 4], [2, 3]];
        let progress = Progress::new();
        let facets = compute_integer_hull::<i128, 2>(&points, &progress).unwrap();
        assert_eq!(facets.len(), 4);
        // Every point is on the non-positive side of every facet.
        for f in &facets {
            for p in 0..points.len() as u32 {
                assert!(f.ortho.dot_sign(&points, f.vertices[0], p) <= 0);
            }
        }
        // Interior points appear in no facet.
        for f in &facets {
            assert!(!f.vertices.contains(&4) && !f.vertices.contains(&5));
        }
    }

    #[test]
    fn too_few_points() {
        let points: Vec<[i64; 3]> = vec![[0, 0, 0], [1, 0, 0], [0, 1, 0]];
        let progress = Progress::new();
        let err = compute_integer_hull::<i128, 3>(&points, &progress).unwrap_err();
        assert!(matches!(err, Error::InputTooFewPoints { count: 3, .. }));
    }

    #[test]
    fn every_hull_ridge_has_two_facets() {
        use std::collections::HashMap;
        let points: Vec<[i64; 3]> = vec![
            [0, 0, 0],
            [10, 0, 0],
            [0, 10, 0],
            [0, 0, 10],
            [10, 10, 0],
            [10, 0, 10],
            [0, 10, 10],
            [10, 10, 10],
            [5, 5, 5],
            [3, 2, 1],
        ];
        let progress = Progress::new();
        let facets = compute_integer_hull::<i128, 3>(&points, &progress).unwrap();
        assert_eq!(facets.len(), 12, "cube boundary triangulates into 12 facets");
        let mut ridge_degree: HashMap<Ridge<3>, usize> = HashMap::new();
        for f in &facets {
            for r in 0..3 {
                *ridge_degree.entry(Ridge::excluding(&f.vertices, r)).or_default() += 1;
            }
        }
        assert!(ridge_degree.values().all(|&d| d == 2));
    }
}
