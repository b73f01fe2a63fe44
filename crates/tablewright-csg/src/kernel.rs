//! The boolean capability behind cutting.

use tablewright_math::Point3;
use tablewright_mesh::{MeshError, MeshReport, SolidMesh};
use tracing::trace;

use crate::bsp::{self, Polygon};
use crate::repair::polygons_to_mesh;
use crate::CsgError;

/// Smallest volume treated as a solid.
pub const MIN_VOLUME: f64 = 1e-9;

/// Solid difference and mesh conversion.
///
/// Solids are opaque to callers; they only go in as meshes and come back
/// out as meshes.
pub trait CsgKernel: Send + Sync {
    /// Kernel-side solid representation.
    type Solid: Clone + Send;

    /// Axis-aligned box between two corners.
    fn build_box(&self, min: Point3, max: Point3) -> Self::Solid;

    /// Solid bounded by `mesh`, which must be closed with positive volume.
    fn build_from_mesh(&self, mesh: &SolidMesh) -> Result<Self::Solid, CsgError>;

    /// `a` with `b` removed.
    fn subtract(&self, a: Self::Solid, b: &Self::Solid) -> Self::Solid;

    /// Indexed mesh of `solid`.
    fn to_mesh(&self, solid: &Self::Solid) -> SolidMesh;

    /// Check that `solid` is still a closed solid.
    fn validate(&self, solid: &Self::Solid) -> Result<MeshReport, CsgError> {
        self.to_mesh(solid).validate().map_err(CsgError::Subtraction)
    }
}

/// Polygon BSP kernel.
#[derive(Debug, Default, Clone, Copy)]
pub struct BspKernel;

/// A solid held by [`BspKernel`]: its boundary polygons.
#[derive(Debug, Clone, PartialEq)]
pub struct BspSolid {
    polygons: Vec<Polygon>,
}

impl BspSolid {
    /// Number of boundary polygons.
    pub fn num_polygons(&self) -> usize {
        self.polygons.len()
    }
}

impl CsgKernel for BspKernel {
    type Solid = BspSolid;

    fn build_box(&self, min: Point3, max: Point3) -> BspSolid {
        let mesh = SolidMesh::cuboid_between(min, max);
        BspSolid {
            polygons: mesh_polygons(&mesh),
        }
    }

    fn build_from_mesh(&self, mesh: &SolidMesh) -> Result<BspSolid, CsgError> {
        let report = mesh.validate().map_err(|e| match e {
            MeshError::NonPositiveVolume(v) => CsgError::ZeroVolume(v),
            other => CsgError::NonManifoldInput(other),
        })?;
        if report.volume < MIN_VOLUME {
            return Err(CsgError::ZeroVolume(report.volume));
        }
        Ok(BspSolid {
            polygons: mesh_polygons(mesh),
        })
    }

    fn subtract(&self, a: BspSolid, b: &BspSolid) -> BspSolid {
        let polygons = bsp::difference(a.polygons, b.polygons.clone());
        trace!(polygons = polygons.len(), "difference");
        BspSolid { polygons }
    }

    fn to_mesh(&self, solid: &BspSolid) -> SolidMesh {
        polygons_to_mesh(&solid.polygons)
    }
}

fn mesh_polygons(mesh: &SolidMesh) -> Vec<Polygon> {
    (0..mesh.num_triangles())
        .filter_map(|i| Polygon::new(mesh.triangle_points(i).to_vec()))
        .collect()
}
