//! Aprons and stretchers.
//!
//! A member is a rectangular bar whose two ends lie on the faces it butts
//! against. Each long edge of the bar is extended to its end plane, so the
//! ends come out square against square legs and angled against tapered or
//! splayed ones.

use std::f64::consts::FRAC_PI_2;

use tablewright_math::{EulerAngles, Placement, Plane, Point3, Vec3};
use tracing::{debug, instrument};

use crate::{clamp_into, hexahedron, BuiltPart, GeometryError};

const MIN_SECTION: f64 = 0.125;

/// Direction a member runs in the table frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanAxis {
    /// Along the table length (front and back members).
    X,
    /// Across the table (side members).
    Z,
}

impl SpanAxis {
    /// Unit vector along the axis.
    pub fn direction(self) -> Vec3 {
        match self {
            SpanAxis::X => Vec3::x(),
            SpanAxis::Z => Vec3::z(),
        }
    }
}

/// A member between two faces, in table coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberSpec {
    /// Name used in diagnostics.
    pub name: &'static str,
    /// Direction the member runs.
    pub axis: SpanAxis,
    /// Any point on the member's centre line.
    pub centre: Point3,
    /// Vertical size.
    pub height: f64,
    /// Horizontal size across the member.
    pub thickness: f64,
    /// Face at the low end along `axis`.
    pub start: Plane,
    /// Face at the high end along `axis`.
    pub end: Plane,
}

/// Build a member and the placement that puts it back in the table frame.
///
/// The local frame has the member along +X, centred between its ends.
/// Members along Z are placed with a quarter turn about Y.
#[instrument(skip(spec), fields(member = spec.name))]
pub fn build_member(spec: &MemberSpec) -> Result<(BuiltPart, Placement), GeometryError> {
    let mut violations = Vec::new();
    let h = clamp_into(spec.height, MIN_SECTION, f64::MAX, "member.height", &mut violations);
    let t = clamp_into(spec.thickness, MIN_SECTION, f64::MAX, "member.thickness", &mut violations);

    let dir = spec.axis.direction();
    let a = spec
        .start
        .intersect_line(&spec.centre, &dir)
        .ok_or(GeometryError::ParallelEnd(spec.name))?;
    let b = spec
        .end
        .intersect_line(&spec.centre, &dir)
        .ok_or(GeometryError::ParallelEnd(spec.name))?;
    let length = (b - a).dot(&dir);
    if length <= 1e-6 {
        return Err(GeometryError::NonPositiveLength {
            part: spec.name,
            length,
        });
    }

    let mid = a + (b - a) / 2.0;
    let placement = match spec.axis {
        SpanAxis::X => Placement::at(mid),
        SpanAxis::Z => Placement::rotated(mid, EulerAngles::new(0.0, -FRAC_PI_2, 0.0)),
    };
    let to_local = placement
        .to_transform()
        .inverse()
        .ok_or(GeometryError::DegenerateFace(spec.name))?;
    let start = spec.start.transformed(&to_local);
    let end = spec.end.transformed(&to_local);

    let corner = |plane: &Plane, y: f64, z: f64| {
        plane
            .intersect_line(&Point3::new(0.0, y, z), &Vec3::x())
            .ok_or(GeometryError::ParallelEnd(spec.name))
    };
    let ring = |y: f64| -> Result<[Point3; 4], GeometryError> {
        Ok([
            corner(&start, y, -t / 2.0)?,
            corner(&start, y, t / 2.0)?,
            corner(&end, y, t / 2.0)?,
            corner(&end, y, -t / 2.0)?,
        ])
    };
    let bottom = ring(-h / 2.0)?;
    let top = ring(h / 2.0)?;

    for r in [&bottom, &top] {
        for (s, e) in [(r[0], r[3]), (r[1], r[2])] {
            if e.x - s.x <= 1e-6 {
                return Err(GeometryError::NonPositiveLength {
                    part: spec.name,
                    length: e.x - s.x,
                });
            }
        }
    }

    debug!(length, "member ends resolved");
    Ok((
        BuiltPart::checked(hexahedron(bottom, top), violations)?,
        placement,
    ))
}
