//! Exact computational geometry and a 2D DFT pipeline.
//!
//! Two loosely coupled cores:
//!
//! - [`core`] and [`recon`]: an integer-arithmetic randomized incremental
//!   convex hull for 2 to 5 dimensions, Delaunay/Voronoi derivation by
//!   paraboloid lifting, and Cocone/BoundCocone surface reconstruction of an
//!   unorganised point sample. Every geometric predicate is exact; floating
//!   point only appears in the outputs.
//! - [`dft`]: forward and inverse 2D DFTs of arbitrary size, composed from
//!   power-of-two radix-2 FFTs plus Bluestein's chirp-z embedding, organised
//!   as parallel dispatches with explicit pass barriers.
//!
//! Dimension-generic entry points take the space dimension as a const
//! parameter; Delaunay-based ones also take the lifted dimension, e.g.
//! `compute_delaunay::<3, 4>`.

pub mod core;
pub mod dft;
pub mod error;
pub mod exact;
pub mod mst;
pub mod numerical;
pub mod progress;
pub mod recon;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::core::{
        compute_convex_hull, compute_delaunay, ConvexHullSimplex, DelaunayData,
    };
    pub use crate::dft::{DeviceLimits, DftVector, ImageDft};
    pub use crate::error::{Error, Result};
    pub use crate::mst::minimum_spanning_tree;
    pub use crate::progress::Progress;
    pub use crate::recon::{
        create_manifold_constructor, create_manifold_constructor_cocone, ManifoldConstructor,
    };
}
