//! Trestle feet, shoulders and posts.
//!
//! Feet and shoulders are side profiles extruded through their thickness
//! along +Z, then turned a quarter about Y so they run across the table.
//! In the finished frame the profile length lies along Z and the thickness
//! along X; `y = 0` is the underside.

use std::f64::consts::FRAC_PI_2;

use tablewright_math::{Point2, Point3, Transform, Vec3};
use tablewright_mesh::SolidMesh;
use tablewright_params::{ConstraintViolation, ProfileParams};
use tablewright_sketch::{extrude, SketchProfile};
use tracing::instrument;

use crate::{clamp_into, BuiltPart, GeometryError, ARC_SEGMENTS};

fn clamp_profile(p: &ProfileParams, name: &str, v: &mut Vec<ConstraintViolation>) -> ProfileParams {
    let length = clamp_into(p.length, 1.0, f64::MAX, &format!("trestle.{name}.length"), v);
    let height = clamp_into(p.height, 0.25, f64::MAX, &format!("trestle.{name}.height"), v);
    ProfileParams {
        length,
        height,
        end_height: clamp_into(
            p.end_height,
            0.1_f64.min(height),
            height,
            &format!("trestle.{name}.end_height"),
            v,
        ),
        flat_length: clamp_into(p.flat_length, 0.0, length, &format!("trestle.{name}.flat_length"), v),
        thickness: clamp_into(p.thickness, 0.25, f64::MAX, &format!("trestle.{name}.thickness"), v),
    }
}

/// Side outline of a foot: flat on top in the middle, sloping down to the
/// ends, with a shallow relief under the middle so it stands on its ends.
pub fn foot_outline(p: &ProfileParams, dado_length: f64, dado_depth: f64) -> Vec<Point2> {
    let (hl, hf) = (p.length / 2.0, p.flat_length / 2.0);
    let mut pts = vec![Point2::new(-hl, 0.0)];
    if dado_length > 1e-9 && dado_depth > 1e-9 {
        let hd = dado_length / 2.0;
        pts.extend([
            Point2::new(-hd, 0.0),
            Point2::new(-hd, dado_depth),
            Point2::new(hd, dado_depth),
            Point2::new(hd, 0.0),
        ]);
    }
    pts.extend([
        Point2::new(hl, 0.0),
        Point2::new(hl, p.end_height),
        Point2::new(hf, p.height),
        Point2::new(-hf, p.height),
        Point2::new(-hl, p.end_height),
    ]);
    pts
}

/// Side outline of a shoulder: the foot turned upside down, flat along its
/// top edge, without a relief.
pub fn shoulder_outline(p: &ProfileParams) -> Vec<Point2> {
    let (hl, hf) = (p.length / 2.0, p.flat_length / 2.0);
    let drop = p.height - p.end_height;
    vec![
        Point2::new(-hf, 0.0),
        Point2::new(hf, 0.0),
        Point2::new(hl, drop),
        Point2::new(hl, p.height),
        Point2::new(-hl, p.height),
        Point2::new(-hl, drop),
    ]
}

fn extrude_across(outline: &[Point2], thickness: f64) -> Result<SolidMesh, GeometryError> {
    let origin = Point3::new(0.0, 0.0, -thickness / 2.0);
    let profile = SketchProfile::polygon(origin, Vec3::x(), Vec3::y(), outline)?;
    let mut mesh = extrude(&profile, Vec3::new(0.0, 0.0, thickness), ARC_SEGMENTS)?;
    // Extrusion runs along Z; swap so the length runs across the table.
    mesh.transform(&Transform::rotation_y(FRAC_PI_2));
    Ok(mesh)
}

/// Build a trestle foot.
#[instrument(skip(profile))]
pub fn build_foot(
    profile: &ProfileParams,
    dado_length: f64,
    dado_depth: f64,
) -> Result<BuiltPart, GeometryError> {
    let mut v = Vec::new();
    let p = clamp_profile(profile, "foot", &mut v);
    let dado_length = clamp_into(dado_length, 0.0, 0.9 * p.length, "trestle.dado_length", &mut v);
    let dado_depth = clamp_into(dado_depth, 0.0, 0.5 * p.end_height, "trestle.dado_depth", &mut v);
    let mesh = extrude_across(&foot_outline(&p, dado_length, dado_depth), p.thickness)?;
    BuiltPart::checked(mesh, v)
}

/// Build a trestle shoulder.
#[instrument(skip(profile))]
pub fn build_shoulder(profile: &ProfileParams) -> Result<BuiltPart, GeometryError> {
    let mut v = Vec::new();
    let p = clamp_profile(profile, "shoulder", &mut v);
    let mesh = extrude_across(&shoulder_outline(&p), p.thickness)?;
    BuiltPart::checked(mesh, v)
}

/// Build a trestle post: `thickness` along X, `width` along Z, standing on
/// `y = 0`.
pub fn build_post(width: f64, thickness: f64, height: f64) -> Result<BuiltPart, GeometryError> {
    let mut v = Vec::new();
    let w = clamp_into(width, 0.5, f64::MAX, "trestle.post_width", &mut v);
    let t = clamp_into(thickness, 0.5, f64::MAX, "trestle.post_thickness", &mut v);
    let h = clamp_into(height, 1.0, f64::MAX, "trestle.post_height", &mut v);
    let mesh = SolidMesh::cuboid_between(
        Point3::new(-t / 2.0, 0.0, -w / 2.0),
        Point3::new(t / 2.0, h, w / 2.0),
    );
    BuiltPart::checked(mesh, v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use tablewright_sketch::signed_area;

    fn foot() -> ProfileParams {
        ProfileParams {
            length: 28.0,
            height: 3.0,
            end_height: 1.5,
            flat_length: 10.0,
            thickness: 2.5,
        }
    }

    #[test]
    fn test_foot_outline_with_relief() {
        let pts = foot_outline(&foot(), 16.0, 0.25);
        assert_eq!(pts.len(), 10);
        assert!(signed_area(&pts) > 0.0);
        assert_eq!(foot_outline(&foot(), 0.0, 0.25).len(), 6);
    }

    #[test]
    fn test_foot_runs_across_table() {
        let part = build_foot(&foot(), 16.0, 0.25).unwrap();
        assert!(part.violations.is_empty());
        let bb = part.mesh.bounding_box();
        assert_relative_eq!(bb.max.z, 14.0, epsilon = 1e-9);
        assert_relative_eq!(bb.max.x, 1.25, epsilon = 1e-9);
        assert_relative_eq!(bb.max.y, 3.0, epsilon = 1e-9);
        let area = signed_area(&foot_outline(&foot(), 16.0, 0.25));
        assert_relative_eq!(part.mesh.volume(), area * 2.5, epsilon = 1e-9);
    }

    #[test]
    fn test_shoulder_is_flat_on_top() {
        let p = ProfileParams {
            length: 26.0,
            height: 2.5,
            end_height: 1.25,
            flat_length: 10.0,
            thickness: 2.5,
        };
        let part = build_shoulder(&p).unwrap();
        let top: Vec<_> = part
            .mesh
            .positions
            .iter()
            .filter(|q| (q.y - 2.5).abs() < 1e-12)
            .collect();
        assert_eq!(top.len(), 4);
        assert!(top.iter().all(|q| (q.z.abs() - 13.0).abs() < 1e-9));
    }

    #[test]
    fn test_deep_relief_is_clamped() {
        let part = build_foot(&foot(), 40.0, 1.0).unwrap();
        let fields: Vec<_> = part.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, ["trestle.dado_length", "trestle.dado_depth"]);
    }

    #[test]
    fn test_post() {
        let part = build_post(5.0, 2.5, 20.0).unwrap();
        assert_relative_eq!(part.mesh.volume(), 250.0, epsilon = 1e-9);
        let bb = part.mesh.bounding_box();
        assert_relative_eq!(bb.max.z, 2.5);
        assert_relative_eq!(bb.max.x, 1.25);
    }
}
