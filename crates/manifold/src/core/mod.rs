//! Geometry core: exact convex hull and the Delaunay/Voronoi derivation.
//!
//! The public entry points are generic over the space dimension through
//! [`Dim`]: each supported dimension picks the narrowest exact compute scalar
//! that the determinant bit budgets allow (`i128` up to 127 bits, `BigInt`
//! above). Delaunay additionally needs the dimension of the lifted space, so
//! its functions take both `N` and `NP = N + 1` as const parameters, checked
//! at monomorphization time.

pub mod arrays;
pub mod delaunay;
pub mod hull;
pub mod points;
pub mod ridge;
pub mod simplex;
pub mod voronoi;

mod ortho;
mod pool;

#[cfg(test)]
mod tests;

pub use delaunay::{
    compute_delaunay, create_delaunay_facets, create_delaunay_objects, DelaunayData,
    DelaunayFacet, DelaunayObject, DelaunaySimplex,
};
pub use hull::{compute_convex_hull, ConvexHullSimplex};

use num_bigint::BigInt;

use crate::exact::bits::{max_determinant, max_determinant_paraboloid, max_paraboloid};
use crate::exact::ExactScalar;
use points::{CONVEX_HULL_BITS, DELAUNAY_BITS};

/// Marker for a space dimension; carries the per-dimension type choices.
pub struct Dim<const N: usize>;

/// Exact compute scalar of the convex hull in `N` dimensions.
pub trait HullSpace {
    type Compute: ExactScalar;
}

/// Exact compute scalars of the Delaunay derivation in `N` dimensions: one
/// for the hull of the lifted points in `N + 1` dimensions, one for the facet
/// orthos recomputed back in the original space.
pub trait DelaunaySpace {
    type ParaboloidCompute: ExactScalar;
    type Compute: ExactScalar;
}

// Budget checks for every `i128` choice below. The paraboloid coordinate must
// also fit the `i64` lattice points.
const _: () = {
    assert!(max_determinant(2, CONVEX_HULL_BITS) <= 127);
    assert!(max_determinant(3, CONVEX_HULL_BITS) <= 127);
    assert!(max_determinant(4, CONVEX_HULL_BITS) <= 127);
    assert!(max_determinant(5, CONVEX_HULL_BITS) > 127); // 5D hull needs BigInt
    assert!(max_determinant_paraboloid(3, DELAUNAY_BITS) <= 127);
    assert!(max_determinant_paraboloid(4, DELAUNAY_BITS) <= 127);
    assert!(max_determinant_paraboloid(5, DELAUNAY_BITS) > 127);
    assert!(max_determinant(5, DELAUNAY_BITS) <= 127);
    assert!(max_paraboloid(6, DELAUNAY_BITS) <= 63);
};

impl HullSpace for Dim<2> {
    type Compute = i128;
}
impl HullSpace for Dim<3> {
    type Compute = i128;
}
impl HullSpace for Dim<4> {
    type Compute = i128;
}
impl HullSpace for Dim<5> {
    type Compute = BigInt;
}

impl DelaunaySpace for Dim<2> {
    type ParaboloidCompute = i128;
    type Compute = i128;
}
impl DelaunaySpace for Dim<3> {
    type ParaboloidCompute = i128;
    type Compute = i128;
}
impl DelaunaySpace for Dim<4> {
    type ParaboloidCompute = BigInt;
    type Compute = i128;
}
impl DelaunaySpace for Dim<5> {
    type ParaboloidCompute = BigInt;
    type Compute = i128;
}

/// Human-readable summary of the integer types of a hull computation.
pub fn hull_type_description<const N: usize>() -> String
where
    Dim<N>: HullSpace,
{
    format!(
        "convex hull {N}D: {} data bits, {} compute bits, {}",
        CONVEX_HULL_BITS,
        max_determinant(N, CONVEX_HULL_BITS),
        std::any::type_name::<<Dim<N> as HullSpace>::Compute>()
    )
}

/// Human-readable summary of the integer types of a Delaunay computation.
pub fn delaunay_type_description<const N: usize>() -> String
where
    Dim<N>: DelaunaySpace,
{
    format!(
        "delaunay {N}D: {} data bits, lifted compute {} bits ({}), compute {} bits ({})",
        DELAUNAY_BITS,
        max_determinant_paraboloid(N + 1, DELAUNAY_BITS),
        std::any::type_name::<<Dim<N> as DelaunaySpace>::ParaboloidCompute>(),
        max_determinant(N, DELAUNAY_BITS),
        std::any::type_name::<<Dim<N> as DelaunaySpace>::Compute>()
    )
}
