//! Cavity descriptions and their box meshes.

use serde::{Deserialize, Serialize};
use tablewright_math::{align_rotation, Point3, Transform, Vec3};
use tablewright_mesh::SolidMesh;

/// How far a cavity runs past the face it opens through, so the cut never
/// leaves a skin coplanar with that face.
pub const OVERSHOOT: f64 = 0.05;

/// A rectangular pocket cut into a part, in the part's local frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MortiseSpec {
    /// Centre of the pocket.
    pub position: Point3,
    /// Width, height and depth of the pocket.
    pub size: Vec3,
    /// Direction the pocket opens toward, out of the part.
    pub normal: Vec3,
}

impl MortiseSpec {
    /// Pocket opening through the face at `face_point`, running `depth`
    /// into the part.
    pub fn into_face(face_point: Point3, normal: Vec3, width: f64, height: f64, depth: f64) -> Self {
        let n = normal.normalize();
        Self {
            position: face_point - n * (depth / 2.0),
            size: Vec3::new(width, height, depth),
            normal: n,
        }
    }

    /// Pocket running right through a member `thickness` deep, opening at
    /// `face_point` and leaving through the opposite face.
    pub fn through(face_point: Point3, normal: Vec3, width: f64, height: f64, thickness: f64) -> Self {
        Self::into_face(face_point, normal, width, height, thickness + OVERSHOOT)
    }

    /// Placement of the canonical box: its +Z turned onto `normal`, then
    /// moved to `position`.
    pub fn transform(&self) -> Transform {
        let q = align_rotation(&Vec3::z(), &self.normal);
        Transform::translation(self.position.x, self.position.y, self.position.z)
            .then(&Transform::rotation(&q))
    }

    /// Closed box mesh of the cavity, extended by [`OVERSHOOT`] out of the
    /// opening face.
    pub fn cavity_mesh(&self) -> SolidMesh {
        let (w, h, d) = (self.size.x / 2.0, self.size.y / 2.0, self.size.z / 2.0);
        SolidMesh::cuboid_between(Point3::new(-w, -h, -d), Point3::new(w, h, d + OVERSHOOT))
            .transformed(&self.transform())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pocket_opens_along_normal() {
        let m = MortiseSpec::into_face(Point3::new(1.25, -3.0, 0.0), Vec3::x(), 0.375, 3.0, 1.0);
        assert_relative_eq!(m.position, Point3::new(0.75, -3.0, 0.0), epsilon = 1e-12);
        let bb = m.cavity_mesh().bounding_box();
        assert_relative_eq!(bb.min.x, 0.25, epsilon = 1e-9);
        assert_relative_eq!(bb.max.x, 1.25 + OVERSHOOT, epsilon = 1e-9);
        assert_relative_eq!(bb.size().z, 0.375, epsilon = 1e-9);
    }

    #[test]
    fn test_downward_opening() {
        let m = MortiseSpec::into_face(Point3::origin(), -Vec3::y(), 1.0, 2.0, 0.5);
        let bb = m.cavity_mesh().bounding_box();
        assert_relative_eq!(bb.min.y, -OVERSHOOT, epsilon = 1e-9);
        assert_relative_eq!(bb.max.y, 0.5, epsilon = 1e-9);
        assert!(m.cavity_mesh().validate().is_ok());
    }

    #[test]
    fn test_through_pocket_clears_both_faces() {
        let m = MortiseSpec::through(Point3::new(0.0, 0.0, 1.0), Vec3::z(), 1.0, 1.0, 2.0);
        let bb = m.cavity_mesh().bounding_box();
        assert_relative_eq!(bb.min.z, -1.0 - OVERSHOOT, epsilon = 1e-9);
        assert_relative_eq!(bb.max.z, 1.0 + OVERSHOOT, epsilon = 1e-9);
    }
}
