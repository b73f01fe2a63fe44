#![warn(missing_docs)]

//! Part geometry for tablewright.
//!
//! Each builder turns a small, already-resolved spec into a closed
//! [`SolidMesh`] in the part's own frame. Out-of-range inputs are clamped to
//! something buildable and reported as [`ConstraintViolation`]s on the
//! returned [`BuiltPart`]; only geometry that cannot be built at all is an
//! error.
//!
//! # Example
//!
//! ```
//! use tablewright_parts::{build_leg, LegSpec};
//! use tablewright_angles::LegCorner;
//!
//! let spec = LegSpec::square(LegCorner::FrontLeft, 2.5, 28.0);
//! let leg = build_leg(&spec).unwrap();
//! assert_eq!(leg.mesh.num_vertices(), 8);
//! assert!((leg.mesh.volume() - 2.5 * 2.5 * 28.0).abs() < 1e-9);
//! ```

mod leg;
mod member;
mod shelf;
mod top;
mod trestle;

pub use leg::{build_leg, CrossSection, FaceAxis, Leg, LegSpec};
pub use member::{build_member, MemberSpec, SpanAxis};
pub use shelf::{build_shelf, ShelfSpec};
pub use top::{build_top, TopSpec};
pub use trestle::{build_foot, build_post, build_shoulder, foot_outline, shoulder_outline};

use tablewright_math::Point3;
use tablewright_mesh::{MeshError, SolidMesh};
use tablewright_params::ConstraintViolation;
use tablewright_sketch::SketchError;
use thiserror::Error;
use tracing::warn;

/// Chords per quarter turn for rounded outlines.
pub const ARC_SEGMENTS: u32 = 8;

/// Geometry that cannot be built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// A profile could not be swept, lofted or turned.
    #[error("profile: {0}")]
    Sketch(#[from] SketchError),

    /// The finished mesh is not a closed solid.
    #[error("mesh: {0}")]
    Mesh(#[from] MeshError),

    /// Three or more corners of a face coincide.
    #[error("degenerate face on {0}")]
    DegenerateFace(&'static str),

    /// A member end plane runs parallel to the member.
    #[error("end plane of {0} is parallel to the member")]
    ParallelEnd(&'static str),

    /// Member ends cross over one another.
    #[error("{part} is {length} long between its end planes")]
    NonPositiveLength {
        /// Part being built.
        part: &'static str,
        /// Signed length along the member.
        length: f64,
    },
}

/// A finished part mesh plus whatever had to be clamped to build it.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltPart {
    /// Closed mesh in part-local coordinates.
    pub mesh: SolidMesh,
    /// Inputs adjusted to keep the geometry valid.
    pub violations: Vec<ConstraintViolation>,
}

impl BuiltPart {
    /// Validate `mesh` and wrap it.
    pub(crate) fn checked(
        mesh: SolidMesh,
        violations: Vec<ConstraintViolation>,
    ) -> Result<Self, GeometryError> {
        mesh.validate()?;
        Ok(Self { mesh, violations })
    }
}

/// Clamp `value` into `[lo, hi]`, recording a violation when it moves.
pub(crate) fn clamp_into(
    value: f64,
    lo: f64,
    hi: f64,
    field: &str,
    violations: &mut Vec<ConstraintViolation>,
) -> f64 {
    let hi = hi.max(lo);
    let clamped = if value.is_nan() { lo } else { value.clamp(lo, hi) };
    if clamped != value {
        warn!(param = field, value, clamped, "clamped part dimension");
        violations.push(ConstraintViolation::new(
            field,
            format!("{value} adjusted to {clamped} to keep geometry valid"),
        ));
    }
    clamped
}

/// Hexahedron from two rings of four corners, both counter-clockwise seen
/// from above.
pub(crate) fn hexahedron(bottom: [Point3; 4], top: [Point3; 4]) -> SolidMesh {
    let mut mesh = SolidMesh::new();
    for p in bottom.iter().chain(top.iter()) {
        mesh.add_vertex(*p);
    }
    mesh.add_prism_faces(0, 4, 4);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_into_reports_only_changes() {
        let mut v = Vec::new();
        assert_eq!(clamp_into(1.0, 0.0, 2.0, "a", &mut v), 1.0);
        assert!(v.is_empty());
        assert_eq!(clamp_into(3.0, 0.0, 2.0, "a", &mut v), 2.0);
        assert_eq!(clamp_into(f64::NAN, 0.5, 2.0, "b", &mut v), 0.5);
        assert_eq!(v.len(), 2);
        assert_eq!(v[1].field, "b");
    }

    #[test]
    fn test_hexahedron_matches_cuboid() {
        let ring = |y: f64| {
            [
                Point3::new(-1.0, y, -2.0),
                Point3::new(-1.0, y, 2.0),
                Point3::new(1.0, y, 2.0),
                Point3::new(1.0, y, -2.0),
            ]
        };
        let mesh = hexahedron(ring(0.0), ring(3.0));
        let report = mesh.validate().unwrap();
        assert!((report.volume - 24.0).abs() < 1e-12);
    }
}
