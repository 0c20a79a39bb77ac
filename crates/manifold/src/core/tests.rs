//! End-to-end convex hull and Delaunay scenarios.

use std::collections::HashSet;

use nalgebra::{vector, SVector};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{
    compute_convex_hull, compute_delaunay, create_delaunay_facets, create_delaunay_objects,
};
use crate::error::Error;
use crate::mst::minimum_spanning_tree;
use crate::progress::Progress;

fn random_points<const N: usize>(count: usize, seed: u64) -> Vec<SVector<f32, N>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| SVector::from_fn(|_, _| rng.gen_range(-1.0f32..1.0)))
        .collect()
}

/// Count the distinct `k`-faces of a simplicial complex given its
/// top-dimensional facets, for k = 0..D-1.
fn face_counts<const D: usize>(facets: &[[u32; D]]) -> Vec<usize> {
    let mut faces: Vec<HashSet<Vec<u32>>> = vec![HashSet::new(); D];
    for facet in facets {
        // Every non-empty subset of the facet's vertices is a face.
        for mask in 1u32..(1 << D) {
            let mut subset: Vec<u32> = (0..D)
                .filter(|&i| mask & (1 << i) != 0)
                .map(|i| facet[i])
                .collect();
            subset.sort_unstable();
            faces[subset.len() - 1].insert(subset);
        }
    }
    faces.iter().map(|s| s.len()).collect()
}

fn euler_characteristic<const D: usize>(facets: &[[u32; D]]) -> i64 {
    face_counts(facets)
        .iter()
        .enumerate()
        .map(|(k, &count)| if k % 2 == 0 { count as i64 } else { -(count as i64) })
        .sum()
}

#[test]
fn hull_2d_triangle() {
    let points = vec![
        vector![0.0f32, 0.0],
        vector![1.0, 0.0],
        vector![0.0, 1.0],
        vector![0.25, 0.25],
    ];
    let progress = Progress::new();
    let facets = compute_convex_hull::<2>(&points, &progress).unwrap();
    assert_eq!(facets.len(), 3);

    let mut edges: Vec<[u32; 2]> = facets
        .iter()
        .map(|f| {
            let mut v = f.vertices;
            v.sort_unstable();
            v
        })
        .collect();
    edges.sort_unstable();
    assert_eq!(edges, vec![[0, 1], [0, 2], [1, 2]]);

    // The interior point is strictly inside every facet's half-plane.
    let p3 = vector![0.25f64, 0.25];
    for f in &facets {
        let v0 = points[f.vertices[0] as usize];
        let v0 = vector![f64::from(v0[0]), f64::from(v0[1])];
        assert!(f.ortho.dot(&(p3 - v0)) < 0.0);
    }
}

#[test]
fn hull_3d_tetrahedron() {
    let points = vec![
        vector![0.0f32, 0.0, 0.0],
        vector![1.0, 0.0, 0.0],
        vector![0.0, 1.0, 0.0],
        vector![0.0, 0.0, 1.0],
        vector![0.25, 0.25, 0.25], // centroid, interior
    ];
    let progress = Progress::new();
    let facets = compute_convex_hull::<3>(&points, &progress).unwrap();
    assert_eq!(facets.len(), 4);
    for f in &facets {
        assert!(!f.vertices.contains(&4));
        assert!((f.ortho.norm() - 1.0).abs() < 1e-12);
    }
}

#[test]
fn hull_contains_all_points() {
    let points = random_points::<3>(300, 42);
    let progress = Progress::new();
    let facets = compute_convex_hull::<3>(&points, &progress).unwrap();

    // Universal invariant: dot(ortho, p - facet_vertex) <= eps for a small
    // eps relative to the bounding box diameter (here about 2).
    let eps = 1e-5;
    for f in &facets {
        let v0 = points[f.vertices[0] as usize].map(f64::from);
        for p in &points {
            let d = f.ortho.dot(&(p.map(f64::from) - v0));
            assert!(d <= eps, "point {d} outside facet");
        }
    }
}

#[test]
fn hull_euler_characteristic_3d() {
    let points = random_points::<3>(120, 7);
    let progress = Progress::new();
    let facets = compute_convex_hull::<3>(&points, &progress).unwrap();
    let tuples: Vec<[u32; 3]> = facets.iter().map(|f| f.vertices).collect();
    // Boundary of a 3-polytope is a 2-sphere.
    assert_eq!(euler_characteristic(&tuples), 2);
    // Every ridge has exactly two incident facets.
    let counts = face_counts(&tuples);
    assert_eq!(3 * tuples.len(), 2 * counts[1], "edge-facet incidences");
}

#[test]
fn hull_euler_characteristic_4d() {
    let points = random_points::<4>(60, 8);
    let progress = Progress::new();
    let facets = compute_convex_hull::<4>(&points, &progress).unwrap();
    let tuples: Vec<[u32; 4]> = facets.iter().map(|f| f.vertices).collect();
    // Boundary of a 4-polytope is a 3-sphere.
    assert_eq!(euler_characteristic(&tuples), 0);
}

#[test]
fn hull_euler_characteristic_5d() {
    // Exercises the BigInt compute path.
    let points = random_points::<5>(24, 9);
    let progress = Progress::new();
    let facets = compute_convex_hull::<5>(&points, &progress).unwrap();
    let tuples: Vec<[u32; 5]> = facets.iter().map(|f| f.vertices).collect();
    // Boundary of a 5-polytope is a 4-sphere.
    assert_eq!(euler_characteristic(&tuples), 2);
}

#[test]
fn delaunay_collinear_reject() {
    let points = vec![
        vector![0.0f32, 0.0, 0.0],
        vector![1.0, 1.0, 1.0],
        vector![2.0, 2.0, 2.0],
        vector![3.0, 3.0, 3.0],
    ];
    let progress = Progress::new();
    let err = compute_delaunay::<3, 4>(&points, &progress).unwrap_err();
    assert!(matches!(err, Error::SimplexNotFound { .. }));
}

#[test]
fn delaunay_2d_properties() {
    let points = random_points::<2>(80, 11);
    let progress = Progress::new();
    let delaunay = compute_delaunay::<2, 3>(&points, &progress).unwrap();
    assert!(!delaunay.simplices.is_empty());

    let objects = create_delaunay_objects(&delaunay.points, &delaunay.simplices).unwrap();
    for object in &objects {
        // The Voronoi vertex is equidistant from the cell's vertices.
        let d0 = (delaunay.points[object.vertices[0] as usize] - object.voronoi_vertex).norm();
        for &v in &object.vertices[1..] {
            let d = (delaunay.points[v as usize] - object.voronoi_vertex).norm();
            assert!((d - d0).abs() < 1e-6 * (1.0 + d0));
        }
    }

    let facets = create_delaunay_facets(&delaunay.simplices).unwrap();
    // Each facet has one or two incident cells, and the incident cells
    // contain the facet's vertices.
    for facet in &facets {
        let sides = if facet.one_sided() { 1 } else { 2 };
        for s in 0..sides {
            let cell = &delaunay.simplices[facet.cell(s)];
            for v in facet.vertices() {
                assert!(cell.vertices.contains(v));
            }
        }
        assert!((facet.ortho().norm() - 1.0).abs() < 1e-9);
    }
}

#[test]
fn delaunay_cells_cover_square_area() {
    // Quantisation maps a unit square onto the lattice; the triangulated
    // area must match the bounding box of the quantised points.
    let mut points = vec![
        vector![0.0f32, 0.0],
        vector![1.0, 0.0],
        vector![0.0, 1.0],
        vector![1.0, 1.0],
    ];
    points.extend(random_points::<2>(30, 12).iter().map(|p| p * 0.4 + vector![0.5, 0.5]));
    let progress = Progress::new();
    let delaunay = compute_delaunay::<2, 3>(&points, &progress).unwrap();

    let total: f64 = delaunay
        .simplices
        .iter()
        .map(|s| {
            let a = delaunay.points[s.vertices[0] as usize];
            let b = delaunay.points[s.vertices[1] as usize];
            let c = delaunay.points[s.vertices[2] as usize];
            ((b - a).x * (c - a).y - (b - a).y * (c - a).x).abs() / 2.0
        })
        .sum();
    let side = crate::core::points::max_lattice_value(crate::core::points::DELAUNAY_BITS) as f64;
    assert!((total - side * side).abs() < 1e-6 * side * side);
}

#[test]
fn mst_of_delaunay_spans_all_vertices() {
    let points = random_points::<2>(50, 13);
    let progress = Progress::new();
    let delaunay = compute_delaunay::<2, 3>(&points, &progress).unwrap();
    let cells: Vec<[u32; 3]> = delaunay.simplices.iter().map(|s| s.vertices).collect();
    let mst = minimum_spanning_tree(&delaunay.points, &cells);

    let used: HashSet<u32> = cells.iter().flat_map(|c| c.iter().copied()).collect();
    assert_eq!(mst.len(), used.len() - 1);

    // The tree connects every used vertex.
    let touched: HashSet<u32> = mst.iter().flat_map(|e| e.iter().copied()).collect();
    assert_eq!(touched, used);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn hull_2d_no_point_outside(seed in 0u64..500, count in 5usize..40) {
        let points = random_points::<2>(count, seed);
        let progress = Progress::new();
        let facets = match compute_convex_hull::<2>(&points, &progress) {
            Ok(facets) => facets,
            // Degenerate draws may legitimately fail the simplex search.
            Err(Error::SimplexNotFound { .. }) => return Ok(()),
            Err(e) => panic!("unexpected hull failure: {e}"),
        };
        for f in &facets {
            let v0 = points[f.vertices[0] as usize].map(f64::from);
            for p in &points {
                prop_assert!(f.ortho.dot(&(p.map(f64::from) - v0)) <= 1e-5);
            }
        }
    }
}
