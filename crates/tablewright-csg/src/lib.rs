#![warn(missing_docs)]

//! Mortise cutting for tablewright.
//!
//! Parts are cut by boolean difference: each [`MortiseSpec`] becomes a
//! rotated box and is subtracted from the part, one cavity at a time. The
//! boolean capability sits behind [`CsgKernel`]; [`BspKernel`] is the
//! polygon BSP implementation used in practice.
//!
//! The kernel must be initialised once per process with [`init_kernel`]
//! before [`cut`] will run.
//!
//! # Example
//!
//! ```
//! use tablewright_csg::{cut, init_kernel, MortiseSpec};
//! use tablewright_math::{Point3, Vec3};
//! use tablewright_mesh::SolidMesh;
//!
//! init_kernel();
//! let leg = SolidMesh::cuboid_between(Point3::new(-1.0, -20.0, -1.0), Point3::new(1.0, 0.0, 1.0));
//! let pocket = MortiseSpec::into_face(Point3::new(1.0, -3.0, 0.0), Vec3::x(), 0.5, 3.0, 1.0);
//! let outcome = cut(&leg, &[pocket]).unwrap();
//! assert!(outcome.errors.is_empty());
//! assert!((outcome.mesh.volume() - (80.0 - 1.5)).abs() < 1e-6);
//! ```

mod bsp;
mod kernel;
mod mortise;
mod repair;

pub use kernel::{BspKernel, BspSolid, CsgKernel, MIN_VOLUME};
pub use mortise::{MortiseSpec, OVERSHOOT};
pub use repair::WELD_TOLERANCE;

use std::sync::OnceLock;

use tablewright_mesh::{MeshError, SolidMesh};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Errors from the cutting engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CsgError {
    /// [`init_kernel`] has not been called.
    #[error("boolean kernel is not initialised")]
    NotReady,

    /// The part to cut is not a closed solid.
    #[error("input is not a closed solid: {0}")]
    NonManifoldInput(MeshError),

    /// The part to cut has no volume.
    #[error("input has zero volume ({0})")]
    ZeroVolume(f64),

    /// A subtraction left something that is not a closed solid.
    #[error("subtraction produced an invalid solid: {0}")]
    Subtraction(MeshError),

    /// One cavity could not be cut; the part keeps its previous shape.
    #[error("cavity {index}: {source}")]
    Cavity {
        /// Position of the cavity in the request.
        index: usize,
        /// What went wrong.
        source: Box<CsgError>,
    },
}

static KERNEL: OnceLock<BspKernel> = OnceLock::new();

/// Make the kernel available. Safe to call any number of times.
pub fn init_kernel() -> &'static BspKernel {
    KERNEL.get_or_init(|| {
        info!("boolean kernel ready");
        BspKernel
    })
}

/// The process-wide kernel, once initialised.
pub fn kernel() -> Result<&'static BspKernel, CsgError> {
    KERNEL.get().ok_or(CsgError::NotReady)
}

/// Whether [`init_kernel`] has run.
pub fn is_ready() -> bool {
    KERNEL.get().is_some()
}

/// A cut part plus the cavities that could not be cut.
#[derive(Debug, Clone, PartialEq)]
pub struct CutOutcome {
    /// The part with every successful cavity removed.
    pub mesh: SolidMesh,
    /// One entry per cavity that was skipped because it failed.
    pub errors: Vec<CsgError>,
}

/// Cut `cavities` out of `solid` with the process-wide kernel.
pub fn cut(solid: &SolidMesh, cavities: &[MortiseSpec]) -> Result<CutOutcome, CsgError> {
    cut_with(kernel()?, solid, cavities)
}

/// Cut `cavities` out of `solid` with `kernel`.
///
/// An invalid `solid` is an error. After that, each cavity is subtracted
/// in order and the result validated; a cavity that fails is recorded and
/// the part carries on from its last valid shape. Cavities whose bounds
/// miss the part are skipped.
#[instrument(skip_all, fields(cavities = cavities.len()))]
pub fn cut_with<K: CsgKernel>(
    kernel: &K,
    solid: &SolidMesh,
    cavities: &[MortiseSpec],
) -> Result<CutOutcome, CsgError> {
    let mut current = kernel.build_from_mesh(solid)?;
    let mut mesh = solid.clone();
    let mut errors = Vec::new();

    for (index, spec) in cavities.iter().enumerate() {
        let cavity_mesh = spec.cavity_mesh();
        if !mesh.bounding_box().overlaps(&cavity_mesh.bounding_box()) {
            debug!(index, "cavity misses the part");
            continue;
        }
        let attempt = kernel.build_from_mesh(&cavity_mesh).and_then(|cavity| {
            let next = kernel.subtract(current.clone(), &cavity);
            let next_mesh = kernel.to_mesh(&next);
            next_mesh.validate().map_err(CsgError::Subtraction)?;
            Ok((next, next_mesh))
        });
        match attempt {
            Ok((next, next_mesh)) => {
                current = next;
                mesh = next_mesh;
            }
            Err(source) => {
                warn!(index, error = %source, "cavity not cut");
                errors.push(CsgError::Cavity {
                    index,
                    source: Box::new(source),
                });
            }
        }
    }

    debug!(
        vertices = mesh.num_vertices(),
        failed = errors.len(),
        "cut finished"
    );
    Ok(CutOutcome { mesh, errors })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tablewright_math::{Point3, Vec3};

    fn leg() -> SolidMesh {
        SolidMesh::cuboid_between(Point3::new(-1.25, -28.0, -1.25), Point3::new(1.25, 0.0, 1.25))
    }

    #[test]
    fn test_two_mortises_on_adjacent_faces() {
        let x = MortiseSpec::into_face(Point3::new(1.25, -2.5, 0.0), Vec3::x(), 0.375, 3.0, 1.0);
        let z = MortiseSpec::into_face(Point3::new(0.0, -2.5, 1.25), Vec3::z(), 0.375, 3.0, 1.0);
        let outcome = cut_with(&BspKernel, &leg(), &[x, z]).unwrap();
        assert!(outcome.errors.is_empty());
        let expected = 2.5 * 2.5 * 28.0 - 2.0 * 0.375 * 3.0;
        assert_relative_eq!(outcome.mesh.volume(), expected, epsilon = 1e-6);
        assert!(outcome.mesh.validate().is_ok());
    }

    #[test]
    fn test_mortise_and_haunch_overlap() {
        let m = MortiseSpec::into_face(Point3::new(1.25, -3.0, 0.0), Vec3::x(), 0.5, 3.0, 1.0);
        let h = MortiseSpec::into_face(Point3::new(1.25, -1.5, 0.0), Vec3::x(), 0.5, 1.0, 0.5);
        let outcome = cut_with(&BspKernel, &leg(), &[m, h]).unwrap();
        // The haunch overlaps the top half inch of the mortise.
        let removed = 0.5 * 3.0 * 1.0 + 0.5 * 0.5 * 0.5;
        assert_relative_eq!(outcome.mesh.volume(), 175.0 - removed, epsilon = 1e-6);
    }

    #[test]
    fn test_missing_cavity_is_skipped() {
        let far = MortiseSpec::into_face(Point3::new(50.0, 0.0, 0.0), Vec3::x(), 1.0, 1.0, 1.0);
        let outcome = cut_with(&BspKernel, &leg(), &[far]).unwrap();
        assert_eq!(outcome.mesh, leg());
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn test_degenerate_cavity_is_recorded() {
        let flat = MortiseSpec::into_face(Point3::new(1.25, -3.0, 0.0), Vec3::x(), 0.0, 3.0, 1.0);
        let good = MortiseSpec::into_face(Point3::new(1.25, -10.0, 0.0), Vec3::x(), 0.5, 2.0, 1.0);
        let outcome = cut_with(&BspKernel, &leg(), &[flat, good]).unwrap();
        assert_eq!(outcome.errors.len(), 1);
        assert!(matches!(outcome.errors[0], CsgError::Cavity { index: 0, .. }));
        assert_relative_eq!(outcome.mesh.volume(), 175.0 - 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_open_input_fails() {
        let mut open = leg();
        open.triangles.truncate(10);
        assert!(matches!(
            cut_with(&BspKernel, &open, &[]),
            Err(CsgError::NonManifoldInput(_))
        ));
    }
}
