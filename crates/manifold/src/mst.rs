//! Minimum spanning tree over the Delaunay 1-skeleton.
//!
//! Kruskal with a weighted quick-union: the MST of a Euclidean point set is
//! a subset of the Delaunay edges, so the candidate set is the union of all
//! cell edges. Weights compare squared lengths.

use std::collections::HashSet;

use log::debug;
use nalgebra::SVector;

/// Union-find with union by size.
struct WeightedQuickUnion {
    parent: Vec<u32>,
    size: Vec<u32>,
}

impl WeightedQuickUnion {
    fn new(count: usize) -> Self {
        Self {
            parent: (0..count as u32).collect(),
            size: vec![1; count],
        }
    }

    fn find(&self, mut p: u32) -> u32 {
        while p != self.parent[p as usize] {
            p = self.parent[p as usize];
        }
        p
    }

    /// Join the components of `p` and `q`; false if already joined.
    fn connect(&mut self, p: u32, q: u32) -> bool {
        let i = self.find(p);
        let j = self.find(q);
        if i == j {
            return false;
        }
        if self.size[i as usize] < self.size[j as usize] {
            self.parent[i as usize] = j;
            self.size[j as usize] += self.size[i as usize];
        } else {
            self.parent[j as usize] = i;
            self.size[i as usize] += self.size[j as usize];
        }
        true
    }
}

/// Edges of the Euclidean minimum spanning tree, as sorted vertex pairs.
/// `cells` are Delaunay cell vertex tuples; vertices absent from every cell
/// do not participate.
pub fn minimum_spanning_tree<const N: usize, const NP: usize>(
    points: &[SVector<f64, N>],
    cells: &[[u32; NP]],
) -> Vec<[u32; 2]> {
    let mut edge_set: HashSet<[u32; 2]> = HashSet::new();
    for cell in cells {
        for i in 0..NP {
            for j in i + 1..NP {
                let (a, b) = (cell[i].min(cell[j]), cell[i].max(cell[j]));
                edge_set.insert([a, b]);
            }
        }
    }

    let mut edges: Vec<(f64, [u32; 2])> = edge_set
        .into_iter()
        .map(|e| {
            let line = points[e[1] as usize] - points[e[0] as usize];
            (line.norm_squared(), e)
        })
        .collect();
    edges.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    let vertex_count: usize = cells
        .iter()
        .flat_map(|c| c.iter())
        .map(|&v| v as usize + 1)
        .max()
        .unwrap_or(0);

    let mut union = WeightedQuickUnion::new(vertex_count);
    let mut res = Vec::new();
    for (_, edge) in edges {
        if union.connect(edge[0], edge[1]) {
            res.push(edge);
        }
    }
    debug!("mst: {} edges", res.len());
    res
}
