//! Collecting placed parts and their diagnostics into a [`TableModel`].

use tablewright_csg::{cut, MortiseSpec};
use tablewright_math::{Placement, Plane, Point3, Vec3};
use tablewright_mesh::SolidMesh;
use tablewright_params::ConstraintViolation;
use tablewright_parts::{BuiltPart, GeometryError};
use tracing::{debug, warn};

use crate::model::{CutFailure, PartDimensions, PartFailure, PartGeometry, PartId, TableModel};

/// Accumulates a table part by part. One failing part never stops the
/// others; failures land in the diagnostics instead.
#[derive(Debug, Default)]
pub(crate) struct Assembly {
    model: TableModel,
}

impl Assembly {
    pub fn new(violations: Vec<ConstraintViolation>) -> Self {
        let mut a = Self::default();
        a.note_violations(violations);
        a
    }

    pub fn model_mut(&mut self) -> &mut TableModel {
        &mut self.model
    }

    /// Record clamped inputs, skipping ones already reported.
    pub fn note_violations(&mut self, violations: Vec<ConstraintViolation>) {
        let seen = &mut self.model.diagnostics.violations;
        for v in violations {
            if !seen.contains(&v) {
                seen.push(v);
            }
        }
    }

    /// Record a part that could not be built.
    pub fn fail(&mut self, id: PartId, error: GeometryError) {
        warn!(part = %id, %error, "part not built");
        self.model
            .diagnostics
            .geometry
            .push(PartFailure { id, error });
    }

    /// Keep the built part, or record why it is missing.
    pub fn take(&mut self, id: PartId, built: Result<BuiltPart, GeometryError>) -> Option<SolidMesh> {
        match built {
            Ok(part) => {
                self.note_violations(part.violations);
                Some(part.mesh)
            }
            Err(error) => {
                self.fail(id, error);
                None
            }
        }
    }

    /// Cut `cavities` from `mesh`. Whatever cannot be cut is recorded and
    /// the part keeps its last valid shape.
    pub fn cut(&mut self, id: PartId, mesh: SolidMesh, cavities: &[MortiseSpec]) -> SolidMesh {
        if cavities.is_empty() {
            return mesh;
        }
        match cut(&mesh, cavities) {
            Ok(outcome) => {
                for error in outcome.errors {
                    self.cut_failed(id, error);
                }
                outcome.mesh
            }
            Err(error) => {
                self.cut_failed(id, error);
                mesh
            }
        }
    }

    fn cut_failed(&mut self, id: PartId, error: tablewright_csg::CsgError) {
        warn!(part = %id, %error, "joinery not cut");
        self.model.diagnostics.cuts.push(CutFailure { id, error });
    }

    /// Add a finished part.
    pub fn place(&mut self, id: PartId, mesh: SolidMesh, placement: Placement) {
        debug!(part = %id, triangles = mesh.num_triangles(), "placed");
        self.model.dimensions.push(PartDimensions::of(id, &mesh));
        self.model.parts.push(PartGeometry {
            id,
            mesh,
            placement,
        });
    }

    /// The finished model, parts in id order.
    pub fn finish(mut self) -> TableModel {
        self.model.parts.sort_by_key(|p| p.id);
        self.model.dimensions.sort_by_key(|d| d.id);
        self.model
    }
}

/// Plane through `point` facing along `normal`.
pub(crate) fn plane_at(point: Point3, normal: Vec3) -> Plane {
    Plane::from_point_normal(&point, &normal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PartKind;

    #[test]
    fn test_repeated_violations_are_kept_once() {
        let v = ConstraintViolation::new("legs.thickness", "too thin");
        let mut a = Assembly::new(vec![v.clone()]);
        a.note_violations(vec![v.clone(), v]);
        assert_eq!(a.finish().diagnostics.violations.len(), 1);
    }

    #[test]
    fn test_parts_come_out_in_id_order() {
        let mut a = Assembly::new(Vec::new());
        let mesh = SolidMesh::cuboid(1.0, 1.0, 1.0);
        a.place(PartId::new(PartKind::Apron, 1), mesh.clone(), Placement::default());
        a.place(PartId::new(PartKind::Leg, 0), mesh.clone(), Placement::default());
        a.place(PartId::new(PartKind::Top, 0), mesh, Placement::default());
        let kinds: Vec<_> = a.finish().parts.iter().map(|p| p.id.kind).collect();
        assert_eq!(kinds, vec![PartKind::Top, PartKind::Leg, PartKind::Apron]);
    }

    #[test]
    fn test_failed_build_is_recorded() {
        let mut a = Assembly::new(Vec::new());
        let id = PartId::new(PartKind::Shelf, 0);
        assert!(a.take(id, Err(GeometryError::DegenerateFace("shelf"))).is_none());
        let model = a.finish();
        assert_eq!(model.diagnostics.geometry.len(), 1);
        assert!(!model.diagnostics.is_clean());
    }

    #[test]
    fn test_no_cavities_skips_the_kernel() {
        let mut a = Assembly::new(Vec::new());
        let mesh = SolidMesh::cuboid(1.0, 1.0, 1.0);
        let out = a.cut(PartId::new(PartKind::Leg, 0), mesh.clone(), &[]);
        assert_eq!(out, mesh);
        assert!(a.finish().diagnostics.is_clean());
    }
}
