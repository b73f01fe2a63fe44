//! Extrude operation: sweep a profile along a direction.

use tablewright_math::Vec3;
use tablewright_mesh::SolidMesh;

use crate::{ear_clip, signed_area, SketchError, SketchProfile};

/// Extrude a closed profile along `direction` (magnitude = distance).
///
/// Arcs are sampled with `arc_segments` chords per quarter turn. The result
/// has one ring of vertices on the sketch plane and one translated by
/// `direction`, side quads between them and ear-clipped caps, wound
/// outward whichever side of the sketch plane `direction` points to.
///
/// # Errors
///
/// `ZeroExtrusion` for a zero direction, `TooFewVertices` or
/// `Triangulation` if the outline cannot be capped.
pub fn extrude(
    profile: &SketchProfile,
    direction: Vec3,
    arc_segments: u32,
) -> Result<SolidMesh, SketchError> {
    if direction.norm() < 1e-12 {
        return Err(SketchError::ZeroExtrusion);
    }

    let mut outline = profile.outline(arc_segments);
    if outline.len() < 3 {
        return Err(SketchError::TooFewVertices(outline.len()));
    }
    if signed_area(&outline) < 0.0 {
        outline.reverse();
    }
    let caps = ear_clip(&outline)?;

    let k = outline.len() as u32;
    let mut mesh = SolidMesh::new();
    for p in &outline {
        mesh.add_vertex(profile.to_3d(*p));
    }
    for p in &outline {
        mesh.add_vertex(profile.to_3d(*p) + direction);
    }

    // Laid out as if `direction` follows the sketch normal.
    mesh.add_ring_band(0, k, k);
    for &[a, b, c] in &caps {
        mesh.add_triangle(a as u32, c as u32, b as u32);
        mesh.add_triangle(k + a as u32, k + b as u32, k + c as u32);
    }

    if profile.normal.dot(&direction) < 0.0 {
        for t in &mut mesh.triangles {
            t.swap(1, 2);
        }
    }
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tablewright_math::{Point2, Point3};

    #[test]
    fn test_extrude_box() {
        let profile = SketchProfile::rounded_rectangle(
            Point3::origin(),
            Vec3::x(),
            Vec3::y(),
            10.0,
            5.0,
            0.0,
        )
        .unwrap();
        let mesh = extrude(&profile, Vec3::new(0.0, 0.0, 20.0), 8).unwrap();
        assert_eq!(mesh.num_vertices(), 8);
        assert_eq!(mesh.num_triangles(), 12);
        assert_relative_eq!(mesh.volume(), 1000.0, epsilon = 1e-9);
        mesh.validate().unwrap();
    }

    #[test]
    fn test_extrude_against_normal_is_outward() {
        let profile = SketchProfile::rounded_rectangle(
            Point3::origin(),
            Vec3::x(),
            Vec3::y(),
            2.0,
            2.0,
            0.5,
        )
        .unwrap();
        let mesh = extrude(&profile, Vec3::new(0.0, 0.0, -3.0), 4).unwrap();
        let report = mesh.validate().unwrap();
        assert!(report.volume > 0.0);
        assert!(mesh.bounding_box().min.z < -2.9);
    }

    #[test]
    fn test_extrude_clockwise_polygon() {
        let pts = [
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 2.0),
            Point2::new(3.0, 2.0),
            Point2::new(3.0, 0.0),
        ];
        let profile = SketchProfile::polygon(Point3::origin(), Vec3::x(), Vec3::y(), &pts).unwrap();
        let mesh = extrude(&profile, Vec3::new(0.0, 0.0, 1.0), 4).unwrap();
        assert_relative_eq!(mesh.validate().unwrap().volume, 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_direction() {
        let profile = SketchProfile::rounded_rectangle(
            Point3::origin(),
            Vec3::x(),
            Vec3::y(),
            1.0,
            1.0,
            0.0,
        )
        .unwrap();
        assert_eq!(
            extrude(&profile, Vec3::zeros(), 4),
            Err(SketchError::ZeroExtrusion)
        );
    }
}
