//! Table top.

use std::f64::consts::FRAC_PI_2;

use tablewright_math::{deg, Point3, Vec3};
use tablewright_mesh::SolidMesh;
use tablewright_params::{ChamferEdge, FurnitureParameters};
use tablewright_sketch::{extrude, loft, SketchProfile};
use tracing::{debug, instrument};

use crate::{clamp_into, BuiltPart, GeometryError, ARC_SEGMENTS};

/// Top outline and edge treatment.
#[derive(Debug, Clone, PartialEq)]
pub struct TopSpec {
    /// Size along X.
    pub length: f64,
    /// Size along Z.
    pub width: f64,
    /// Vertical size.
    pub thickness: f64,
    /// Plan-view corner radius; zero for square corners.
    pub corner_radius: f64,
    /// Which edges are chamfered.
    pub chamfer_edge: ChamferEdge,
    /// Vertical size of each chamfer.
    pub chamfer_size: f64,
    /// Chamfer angle from the horizontal face, degrees.
    pub chamfer_angle: f64,
}

impl TopSpec {
    /// The top of a table described by `params`.
    pub fn from_params(params: &FurnitureParameters) -> Self {
        let top = &params.top;
        Self {
            length: params.length,
            width: params.width,
            thickness: top.thickness,
            corner_radius: top.corner_radius,
            chamfer_edge: top.chamfer.edge,
            chamfer_size: top.chamfer.size,
            chamfer_angle: top.chamfer.angle,
        }
    }
}

/// Build the top with its underside at `y = 0`, centred on the origin.
///
/// Square corners without a chamfer give a box, rounded corners alone an
/// extruded outline, and any chamfer a loft through perimeter rings inset
/// by the chamfer run.
#[instrument(skip(spec), fields(length = spec.length, width = spec.width))]
pub fn build_top(spec: &TopSpec) -> Result<BuiltPart, GeometryError> {
    let mut v = Vec::new();
    let l = clamp_into(spec.length, 1.0, f64::MAX, "length", &mut v);
    let w = clamp_into(spec.width, 1.0, f64::MAX, "width", &mut v);
    let t = clamp_into(spec.thickness, 0.25, f64::MAX, "top.thickness", &mut v);
    let short = l.min(w);
    let r = clamp_into(spec.corner_radius, 0.0, 0.45 * short, "top.corner_radius", &mut v);

    let (v_bottom, v_top, run) = match spec.chamfer_edge {
        ChamferEdge::None => (0.0, 0.0, 0.0),
        edge => {
            let angle = clamp_into(spec.chamfer_angle, 10.0, 80.0, "top.chamfer.angle", &mut v);
            let tan = deg(angle).tan();
            let vertical = if edge == ChamferEdge::Both { 0.45 * t } else { 0.9 * t };
            // Rounded corners keep at least a tenth of their radius inside the chamfer.
            let max_run = if r > 0.0 { 0.9 * r } else { 0.45 * short };
            let size = clamp_into(
                spec.chamfer_size,
                0.0,
                vertical.min(max_run * tan),
                "top.chamfer.size",
                &mut v,
            );
            let run = size / tan;
            match edge {
                ChamferEdge::Top => (0.0, size, run),
                ChamferEdge::Bottom => (size, 0.0, run),
                _ => (size, size, run),
            }
        }
    };

    let mesh = if v_bottom <= 1e-9 && v_top <= 1e-9 {
        if r <= 1e-9 {
            SolidMesh::cuboid_between(
                Point3::new(-l / 2.0, 0.0, -w / 2.0),
                Point3::new(l / 2.0, t, w / 2.0),
            )
        } else {
            // Sketch X runs along Z and sketch Y along X, so the normal is +Y.
            let profile =
                SketchProfile::rounded_rectangle(Point3::origin(), Vec3::z(), Vec3::x(), w, l, r)?;
            extrude(&profile, Vec3::new(0.0, t, 0.0), ARC_SEGMENTS)?
        }
    } else {
        let mut rings = Vec::with_capacity(4);
        rings.push(perimeter(l, w, r, if v_bottom > 0.0 { run } else { 0.0 }, 0.0));
        if v_bottom > 0.0 {
            rings.push(perimeter(l, w, r, 0.0, v_bottom));
        }
        if v_top > 0.0 {
            rings.push(perimeter(l, w, r, 0.0, t - v_top));
        }
        rings.push(perimeter(l, w, r, if v_top > 0.0 { run } else { 0.0 }, t));
        loft(&rings)?
    };
    debug!(vertices = mesh.num_vertices(), "top built");
    BuiltPart::checked(mesh, v)
}

/// Outline of the top inset by `inset`, at height `y`, counter-clockwise
/// seen from above. Rounded outlines keep their corner centres and shrink
/// the radius, so every ring has the same vertex count.
fn perimeter(l: f64, w: f64, r: f64, inset: f64, y: f64) -> Vec<Point3> {
    let (hx, hz) = (l / 2.0, w / 2.0);
    if r <= 1e-9 {
        let (x, z) = (hx - inset, hz - inset);
        return vec![
            Point3::new(-x, y, -z),
            Point3::new(-x, y, z),
            Point3::new(x, y, z),
            Point3::new(x, y, -z),
        ];
    }
    let ri = r - inset;
    // Corner centres in plan (z, x), counter-clockwise from the +Z −X corner.
    let centres = [
        (hz - r, -hx + r),
        (hz - r, hx - r),
        (-hz + r, hx - r),
        (-hz + r, -hx + r),
    ];
    let n = ARC_SEGMENTS;
    let mut ring = Vec::with_capacity(4 * (n as usize + 1));
    for (k, (cz, cx)) in centres.iter().enumerate() {
        let a0 = -FRAC_PI_2 + k as f64 * FRAC_PI_2;
        for j in 0..=n {
            let a = a0 + FRAC_PI_2 * j as f64 / n as f64;
            ring.push(Point3::new(cx + ri * a.sin(), y, cz + ri * a.cos()));
        }
    }
    ring
}
