//! Cocone membership predicates and the cone-edge intersection.
//!
//! The cocone of a sample is the complement of the open double cone of
//! half-opening 3π/8 about the positive-pole axis. All predicates work on
//! cosines against the unit axis.
//!
//! Reference: Dey, Curve and Surface Reconstruction, chapters 4 and 5.

use nalgebra::SVector;

use crate::numerical::quadratic_equation;

/// cos(3π/8), the opening angle of the excluded double cone with the axis.
pub const COS_OF_OPENING_ANGLE: f64 = 0.382_683_432_365_089_77;

/// Does the Voronoi edge `(a, b)` intersect the cocone? `cos_n_pa` and
/// `cos_n_pb` are the cosines of the edge endpoints against the pole axis.
pub fn voronoi_edge_intersects_cocone(cos_n_pa: f64, cos_n_pb: f64) -> bool {
    if cos_n_pa.abs() < COS_OF_OPENING_ANGLE || cos_n_pb.abs() < COS_OF_OPENING_ANGLE {
        return true;
    }
    // Both endpoints are inside the excluded cone; the edge still crosses
    // the cocone when they are on opposite sides of the apex.
    (cos_n_pa < 0.0 && cos_n_pb > 0.0) || (cos_n_pa > 0.0 && cos_n_pb < 0.0)
}

/// Point with this cosine lies inside the cocone or on its boundary.
pub fn cocone_inside_or_equal(cos_n_p: f64) -> bool {
    cos_n_p.abs() <= COS_OF_OPENING_ANGLE
}

/// Intersection of the ray family `PA + t·AB`, `t ≥ 0`, with the double-cone
/// boundary `(x·n / |x|)² = cos²(3π/8)`; returns the distance from the apex
/// to the farthest feasible intersection, or `None` when the quadratic has no
/// feasible root.
///
/// Derivation: squaring `((a + t·ab)/|a + t·ab|)·n = ±cos` gives
/// `t²(n·ab² − cos²·ab²) + 2t((a·n)(n·ab) − (a·ab)cos²) + (a·n² − a²cos²) = 0`.
pub fn intersect_cocone_max_distance<const N: usize>(
    normalized_cone_axis: &SVector<f64, N>,
    from_apex_to_point_a: &SVector<f64, N>,
    vector_from_point_a: &SVector<f64, N>,
) -> Option<f64> {
    let cos_squared = COS_OF_OPENING_ANGLE * COS_OF_OPENING_ANGLE;

    let vec_a = from_apex_to_point_a;
    let vec_ab = vector_from_point_a;
    let vec_norm = normalized_cone_axis;

    let n_ab = vec_norm.dot(vec_ab);
    let a_n = vec_a.dot(vec_norm);
    let square_a = vec_a.dot(vec_a);
    let square_ab = vec_ab.dot(vec_ab);
    let a_ab = vec_a.dot(vec_ab);

    let a = n_ab * n_ab - cos_squared * square_ab;
    let b = 2.0 * (a_n * n_ab - a_ab * cos_squared);
    let c = a_n * a_n - square_a * cos_squared;

    let (t1, t2) = quadratic_equation(a, b, c)?;

    let t1_ok = t1 >= 0.0 && t1 <= f64::MAX;
    let t2_ok = t2 >= 0.0 && t2 <= f64::MAX;

    match (t1_ok, t2_ok) {
        (false, false) => None,
        (true, false) => Some((vec_a + t1 * vec_ab).norm()),
        (false, true) => Some((vec_a + t2 * vec_ab).norm()),
        (true, true) => {
            let d1 = (vec_a + t1 * vec_ab).norm_squared();
            let d2 = (vec_a + t2 * vec_ab).norm_squared();
            Some(d1.max(d2).sqrt())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn edge_intersection_cases() {
        let c = COS_OF_OPENING_ANGLE;
        // One endpoint inside the cocone.
        assert!(voronoi_edge_intersects_cocone(0.1, 0.9));
        // Both endpoints in the excluded cone, same side.
        assert!(!voronoi_edge_intersects_cocone(0.9, c + 0.01));
        // Straddling the apex.
        assert!(voronoi_edge_intersects_cocone(0.9, -0.9));
        assert!(voronoi_edge_intersects_cocone(-0.5, 0.5));
    }

    #[test]
    fn cone_intersection_along_axis_plane() {
        // Axis = z. Start on the cone axis above the apex, direction into
        // the xy-plane: the segment leaves the excluded cone at a finite t.
        let axis = vector![0.0, 0.0, 1.0];
        let pa = vector![0.0, 0.0, 1.0];
        let ab = vector![1.0, 0.0, 0.0];
        let d = intersect_cocone_max_distance(&axis, &pa, &ab).unwrap();
        // Boundary: z/|x| = cos(3π/8) with z = 1 fixed: |x| = 1/cos.
        assert!((d - 1.0 / COS_OF_OPENING_ANGLE).abs() < 1e-9);
    }

    #[test]
    fn cone_intersection_infeasible() {
        // Direction parallel to the axis starting on it: never crosses the
        // cone boundary at t >= 0 going up.
        let axis = vector![0.0, 0.0, 1.0];
        let pa = vector![0.0, 0.0, 1.0];
        let ab = vector![0.0, 0.0, 1.0];
        assert!(intersect_cocone_max_distance(&axis, &pa, &ab).is_none());
    }
}
