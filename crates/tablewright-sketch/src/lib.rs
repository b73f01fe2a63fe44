#![warn(missing_docs)]

//! Sketch-based solid construction for tablewright.
//!
//! Closed 2D profiles are turned into [`SolidMesh`] solids by extrusion,
//! by lofting a stack of perimeter rings, or by turning a radius profile
//! on a lathe.
//!
//! # Example
//!
//! ```
//! use tablewright_sketch::{extrude, SketchProfile};
//! use tablewright_math::{Point3, Vec3};
//!
//! // Rounded 20 x 10 slab, 1 thick, lying in the XZ plane.
//! let profile = SketchProfile::rounded_rectangle(
//!     Point3::origin(),
//!     Vec3::z(),
//!     Vec3::x(),
//!     10.0,
//!     20.0,
//!     2.0,
//! )
//! .unwrap();
//! let slab = extrude(&profile, Vec3::new(0.0, 1.0, 0.0), 8).unwrap();
//! slab.validate().unwrap();
//! ```
//!
//! [`SolidMesh`]: tablewright_mesh::SolidMesh

mod extrude;
mod loft;
mod profile;
mod revolve;
mod triangulate;

pub use extrude::extrude;
pub use loft::loft;
pub use profile::{SketchProfile, SketchSegment};
pub use revolve::{lathe, LatheSample};
pub use triangulate::{ear_clip, signed_area, simplify_polygon};

use thiserror::Error;

/// Errors from sketch-based operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SketchError {
    /// The profile is not closed (gap between consecutive segments).
    #[error("profile is not closed: gap of {0:.6} in")]
    NotClosed(f64),

    /// A segment is degenerate (zero length).
    #[error("degenerate segment at index {0}")]
    DegenerateSegment(usize),

    /// Profile has no segments.
    #[error("profile has no segments")]
    EmptyProfile,

    /// Fewer than three distinct, non-collinear vertices remain.
    #[error("profile collapses to {0} vertices")]
    TooFewVertices(usize),

    /// Extrusion direction has zero length.
    #[error("extrusion direction is zero")]
    ZeroExtrusion,

    /// Ear clipping found no ear (self-intersecting outline).
    #[error("profile cannot be triangulated")]
    Triangulation,

    /// Loft rings differ in vertex count.
    #[error("loft ring {ring} has {found} vertices, expected {expected}")]
    RingMismatch {
        /// Offending ring.
        ring: usize,
        /// Vertex count of the first ring.
        expected: usize,
        /// Vertex count of the offending ring.
        found: usize,
    },

    /// A lathe sample has a non-positive radius.
    #[error("lathe sample {0} has non-positive radius")]
    InvalidRadius(usize),

    /// Lathe samples are not ordered from top to bottom.
    #[error("lathe sample {0} is above its predecessor")]
    NotMonotonic(usize),
}
