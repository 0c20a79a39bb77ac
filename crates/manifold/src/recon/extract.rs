//! Manifold extraction by an outside-in walk over the Delaunay cells.
//!
//! Starting from the hull boundary facets, the walk crosses every facet that
//! is not cocone-flagged into the unvisited cell behind it and pushes that
//! cell's facets. Flagged facets stop the walk and are kept; what remains is
//! the outermost closed shell of the flagged set.

use crate::core::{DelaunayFacet, DelaunayObject};

fn find_delaunay_object_facets<const N: usize, const NP: usize>(
    delaunay_objects: &[DelaunayObject<N, NP>],
    delaunay_facets: &[DelaunayFacet<N>],
) -> Vec<Vec<u32>> {
    let mut res = vec![Vec::new(); delaunay_objects.len()];
    for (i, facet) in delaunay_facets.iter().enumerate() {
        res[facet.cell(0)].push(i as u32);
        if !facet.one_sided() {
            res[facet.cell(1)].push(i as u32);
        }
    }
    res
}

fn find_external_facets<const N: usize>(delaunay_facets: &[DelaunayFacet<N>]) -> Vec<u32> {
    (0..delaunay_facets.len() as u32)
        .filter(|&i| delaunay_facets[i as usize].one_sided())
        .collect()
}

/// The unvisited cell behind the facet, if any.
fn cell_to_visit<const N: usize>(
    facet: &DelaunayFacet<N>,
    visited: &[bool],
) -> Option<usize> {
    if facet.one_sided() {
        if visited[facet.cell(0)] {
            return None;
        }
        return Some(facet.cell(0));
    }
    match (visited[facet.cell(0)], visited[facet.cell(1)]) {
        (true, true) => None,
        (true, false) => Some(facet.cell(1)),
        (false, true) => Some(facet.cell(0)),
        (false, false) => {
            unreachable!("crossing a facet with both cells unvisited")
        }
    }
}

/// Keep the cocone facets reachable from outside without crossing another
/// cocone facet.
pub fn extract_manifold<const N: usize, const NP: usize>(
    delaunay_objects: &[DelaunayObject<N, NP>],
    delaunay_facets: &[DelaunayFacet<N>],
    cocone_facets: &[bool],
) -> Vec<bool> {
    let object_facets = find_delaunay_object_facets(delaunay_objects, delaunay_facets);

    let mut visited_cocone_facets = vec![false; cocone_facets.len()];
    let mut visited_objects = vec![false; delaunay_objects.len()];

    let mut next_facets = find_external_facets(delaunay_facets);

    while let Some(facet) = next_facets.pop() {
        if cocone_facets[facet as usize] {
            visited_cocone_facets[facet as usize] = true;
            continue;
        }

        let Some(cell) = cell_to_visit(&delaunay_facets[facet as usize], &visited_objects)
        else {
            continue;
        };
        visited_objects[cell] = true;

        for &f in &object_facets[cell] {
            if f != facet {
                next_facets.push(f);
            }
        }
    }

    visited_cocone_facets
}
