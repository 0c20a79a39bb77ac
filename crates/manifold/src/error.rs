//! Errors surfaced by the geometry and DFT pipelines.
//!
//! Every error is fatal to the call that produced it; partial results are
//! discarded by construction. Invariant violations discovered mid-computation
//! are bugs and assert instead of returning one of these.

use std::fmt;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure conditions of the public operations.
#[derive(Clone, Debug, PartialEq)]
pub enum Error {
    /// Fewer input points than required for the operation in this dimension.
    InputTooFewPoints { dimension: usize, count: usize },
    /// All input points map to the same lattice point (zero bounding box).
    InputAllEqual,
    /// A quantised coordinate fell outside the admissible lattice range.
    InputOutOfRange { value: i64, max: i64 },
    /// The initial-simplex scan exhausted the input at the given rank.
    SimplexNotFound { rank: usize, dimension: usize },
    /// A point sees every hull facet (degenerate input).
    AllFacetsVisible,
    /// An orientation point lies exactly on the facet hyperplane and no
    /// direction facet was available to disambiguate.
    DirectionOnFacetPlane,
    /// The circumcentre linear system produced a non-finite solution.
    VoronoiVertexUndefined,
    /// The positive pole of a Voronoi cell is not a finite unit vector.
    PositivePoleNotFinite,
    /// No Voronoi vertex lies on the negative side of the tangent plane.
    NegativePoleNotFound,
    /// The negative pole distance is not finite.
    NegativePoleNotFinite,
    /// A Voronoi edge expected to cross the cocone boundary does not.
    /// `near_pole` records whether the edge start was close to the pole axis.
    CoconeIntersectionNotFound { near_pole: bool },
    /// The cocone intersection distance is not finite.
    CoconeIntersectionNotFinite,
    /// No cocone facets remain at the named reconstruction stage.
    NoCoconeFacets { stage: &'static str },
    /// BoundCocone found no interior vertices.
    NoInteriorVertices,
    /// The outside-in walk kept no facets.
    NoManifoldAfterExtraction,
    /// The constructor was created for Cocone only and cannot run BoundCocone.
    CoconeOnlyConstructor,
    /// FFT size is zero.
    FftSizeNotPositive { size: usize },
    /// FFT size is not an integral power of two.
    FftSizeNotPowerOfTwo { size: usize },
    /// A data slice does not match the planned buffer size.
    BufferSizeMismatch { expected: usize, actual: usize },
    /// BoundCocone `rho` outside (0, 1).
    RhoOutOfRange { rho: f64 },
    /// BoundCocone `alpha` outside (0, 1).
    AlphaOutOfRange { alpha: f64 },
    /// A third facet arrived on a ridge that admits at most two.
    TooManyFacetsOnRidge,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InputTooFewPoints { dimension, count } => {
                write!(f, "error point count {count} in {dimension}D space")
            }
            Error::InputAllEqual => write!(f, "no distinct points found"),
            Error::InputOutOfRange { value, max } => {
                write!(f, "quantised value {value} is not in the range [0, {max}]")
            }
            Error::SimplexNotFound { rank, dimension } => {
                write!(f, "point {} of {dimension}-simplex not found", rank + 1)
            }
            Error::AllFacetsVisible => write!(f, "all facets are visible from the point"),
            Error::DirectionOnFacetPlane => write!(f, "direction point is on the facet plane"),
            Error::VoronoiVertexUndefined => write!(f, "voronoi vertex is not finite"),
            Error::PositivePoleNotFinite => write!(f, "positive pole vector is not finite"),
            Error::NegativePoleNotFound => write!(f, "negative pole vector not found"),
            Error::NegativePoleNotFinite => write!(f, "negative pole vector is not finite"),
            Error::CoconeIntersectionNotFound { near_pole: true } => {
                write!(f, "cocone intersection not found, edge is close to the positive pole")
            }
            Error::CoconeIntersectionNotFound { near_pole: false } => {
                write!(f, "cocone intersection not found, edge is far from the positive pole")
            }
            Error::CoconeIntersectionNotFinite => {
                write!(f, "cocone intersection distance is not finite")
            }
            Error::NoCoconeFacets { stage } => {
                write!(f, "cocone facets not found ({stage}), manifold is not reconstructable")
            }
            Error::NoInteriorVertices => {
                write!(f, "interior vertices not found, manifold is not reconstructable")
            }
            Error::NoManifoldAfterExtraction => {
                write!(f, "cocone facets not found after manifold extraction")
            }
            Error::CoconeOnlyConstructor => {
                write!(f, "manifold constructor created for cocone and not for bound cocone")
            }
            Error::FftSizeNotPositive { size } => write!(f, "FFT size {size} is not positive"),
            Error::FftSizeNotPowerOfTwo { size } => {
                write!(f, "FFT size {size} is not an integral power of 2")
            }
            Error::BufferSizeMismatch { expected, actual } => {
                write!(f, "buffer size {actual} does not match data size {expected}")
            }
            Error::RhoOutOfRange { rho } => {
                write!(f, "rho ({rho}) must be in the interval (0, 1)")
            }
            Error::AlphaOutOfRange { alpha } => {
                write!(f, "alpha ({alpha}) must be in the interval (0, 1)")
            }
            Error::TooManyFacetsOnRidge => {
                write!(f, "too many facets exist in the ridge link")
            }
        }
    }
}

impl std::error::Error for Error {}
