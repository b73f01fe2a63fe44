//! Lower shelf panel.

use tablewright_math::{Placement, Plane, Point3, Vec3};
use tracing::instrument;

use crate::{clamp_into, hexahedron, BuiltPart, GeometryError};

/// A shelf bounded by the inside faces of the four legs.
#[derive(Debug, Clone, PartialEq)]
pub struct ShelfSpec {
    /// Height of the shelf underside above the floor.
    pub elevation: f64,
    /// Panel thickness.
    pub thickness: f64,
    /// Inside face of the left legs.
    pub left: Plane,
    /// Inside face of the right legs.
    pub right: Plane,
    /// Inside face of the front legs.
    pub front: Plane,
    /// Inside face of the back legs.
    pub back: Plane,
}

/// Build the shelf panel, placed at its elevation.
#[instrument(skip(spec), fields(elevation = spec.elevation))]
pub fn build_shelf(spec: &ShelfSpec) -> Result<(BuiltPart, Placement), GeometryError> {
    let mut violations = Vec::new();
    let t = clamp_into(spec.thickness, 0.25, f64::MAX, "shelf.thickness", &mut violations);
    let origin = Point3::new(0.0, spec.elevation, 0.0);

    let ring = |y: f64| -> Result<[Point3; 4], GeometryError> {
        let level = Plane::from_point_normal(&Point3::new(0.0, y, 0.0), &Vec3::y());
        let corner = |a: &Plane, b: &Plane| {
            Plane::intersect_three(a, b, &level)
                .map(|p| p - origin.coords)
                .ok_or(GeometryError::DegenerateFace("shelf"))
        };
        Ok([
            corner(&spec.left, &spec.front)?,
            corner(&spec.left, &spec.back)?,
            corner(&spec.right, &spec.back)?,
            corner(&spec.right, &spec.front)?,
        ])
    };
    let bottom = ring(spec.elevation)?;
    let top = ring(spec.elevation + t)?;
    if bottom[2].x <= bottom[0].x || bottom[2].z <= bottom[0].z {
        return Err(GeometryError::DegenerateFace("shelf"));
    }

    Ok((
        BuiltPart::checked(hexahedron(bottom, top), violations)?,
        Placement::at(origin),
    ))
}
