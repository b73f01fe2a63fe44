#![warn(missing_docs)]

//! Compound-angle solver for table legs.
//!
//! Splayed legs are modelled in a leg-local frame with the top centre at
//! the origin and the body running down −Y, then rotated by
//! `Rx(rotation_x) · Rz(rotation_z)`. Before rotation every vertex is lifted
//! by [`y_offset`] so the top and bottom faces come out level.
//!
//! # Example
//!
//! ```
//! use tablewright_angles::{solve, LegCorner, LegSection};
//!
//! let section = LegSection { top_half: 1.125, bottom_half: 0.5, height: 26.75 };
//! let angle = solve(LegCorner::FrontLeft, 8.0, &section);
//! assert!(angle.rotation_x > 0.0 && angle.rotation_z < 0.0);
//! assert!(angle.length_factor > 1.0);
//! ```

mod corner;

pub use corner::{InteriorAxes, LegCorner};

use std::f64::consts::FRAC_PI_4;
use tablewright_math::{deg, EulerAngles, Point3, Transform, Vec3};

/// Rotation `(rx, rz)` in radians for a leg at `corner` splayed by `splay_deg`.
///
/// Front corners tilt about X by +θ and back corners by −θ; left corners
/// tilt about Z by −θ and right corners by +θ. With front at −Z and left at
/// −X every foot moves away from the table centre.
pub fn splay_rotation(corner: LegCorner, splay_deg: f64) -> (f64, f64) {
    let theta = deg(splay_deg);
    let rx = if corner.is_front() { theta } else { -theta };
    let rz = if corner.is_left() { -theta } else { theta };
    (rx, rz)
}

/// Small-angle lift applied to a vertex at `(x, z)` before rotation.
pub fn y_offset(x: f64, z: f64, rx: f64, rz: f64) -> f64 {
    -x * rz.sin() + z * rx.sin()
}

/// Exact lift that makes a rotated vertex keep its original height.
///
/// Solves `(Rx · Rz · (x, y + d, z)).y = y · cos rx · cos rz` for `d`; used to
/// bound the error of [`y_offset`].
pub fn exact_y_offset(x: f64, z: f64, rx: f64, rz: f64) -> f64 {
    (z * rx.tan() - x * rz.sin()) / rz.cos()
}

/// Cross-section of a leg: half-widths at top and floor, and length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegSection {
    /// Half of the top cross-section size.
    pub top_half: f64,
    /// Half of the floor cross-section size.
    pub bottom_half: f64,
    /// Leg length along its own axis.
    pub height: f64,
}

/// The eight corners of a splayed leg before rotation.
///
/// Both rings run counter-clockwise seen from above, starting at the
/// −X −Z corner: `(−,−) (−,+) (+,+) (+,−)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplayedCorners {
    /// Top ring, around `y = 0`.
    pub top: [Point3; 4],
    /// Bottom ring, around `y = −height`.
    pub bottom: [Point3; 4],
}

const RING_SIGNS: [(f64, f64); 4] = [(-1.0, -1.0), (-1.0, 1.0), (1.0, 1.0), (1.0, -1.0)];

/// Ring indices `(i, i + 1)` of the side face whose outward normal points
/// along `sign` on the X axis (`along_x`) or the Z axis.
pub fn side_face(along_x: bool, sign: f64) -> (usize, usize) {
    match (along_x, sign > 0.0) {
        (true, true) => (2, 3),
        (true, false) => (0, 1),
        (false, true) => (1, 2),
        (false, false) => (3, 0),
    }
}

/// Corner positions of a splayed leg, each lifted by [`y_offset`].
pub fn splayed_corners(section: &LegSection, rx: f64, rz: f64) -> SplayedCorners {
    let ring = |half: f64, y: f64| {
        RING_SIGNS.map(|(sx, sz)| {
            let (x, z) = (sx * half, sz * half);
            Point3::new(x, y + y_offset(x, z, rx, rz), z)
        })
    };
    SplayedCorners {
        top: ring(section.top_half, 0.0),
        bottom: ring(section.bottom_half, -section.height),
    }
}

/// Unit normal of the triangle `a b c` (counter-clockwise from outside).
pub fn face_normal(a: &Point3, b: &Point3, c: &Point3) -> Vec3 {
    (b - a).cross(&(c - a)).normalize()
}

/// Compound miter and bevel (radians) for a corner joint splayed by `splay_deg`.
pub fn compound_miter(splay_deg: f64) -> (f64, f64) {
    let t = deg(splay_deg).tan();
    let miter = (t * FRAC_PI_4.cos()).atan();
    let bevel = (t * FRAC_PI_4.sin()).atan();
    (miter, bevel)
}

/// Outward normals of the two inside faces of a leg, in the leg's frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceNormals {
    /// The face looking along the interior X direction.
    pub x_face: Vec3,
    /// The face looking along the interior Z direction.
    pub z_face: Vec3,
}

/// Angles describing one splayed leg.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompoundAngle {
    /// Corner the leg stands at.
    pub corner: LegCorner,
    /// Rotation about X (radians).
    pub rotation_x: f64,
    /// Rotation about Z (radians).
    pub rotation_z: f64,
    /// Inside-face normals from the offset vertices.
    pub face_normals: FaceNormals,
    /// Top-face normal from the offset vertices.
    pub top_normal: Vec3,
    /// Compound miter (radians).
    pub miter_angle: f64,
    /// Compound bevel (radians).
    pub bevel_angle: f64,
    /// Leg length per unit of vertical drop, `1 / (cos rx · cos rz)`.
    pub length_factor: f64,
}

impl CompoundAngle {
    /// Placement rotation for the leg.
    pub fn rotation(&self) -> EulerAngles {
        EulerAngles::new(self.rotation_x, 0.0, self.rotation_z)
    }

    /// Map a leg-local direction into the table frame.
    pub fn to_world(&self, v: &Vec3) -> Vec3 {
        self.rotation().to_transform().apply_vec(v)
    }
}

/// Solve the compound angles of a leg at `corner`.
pub fn solve(corner: LegCorner, splay_deg: f64, section: &LegSection) -> CompoundAngle {
    let (rx, rz) = splay_rotation(corner, splay_deg);
    let c = splayed_corners(section, rx, rz);
    let interior = corner.interior_axes();

    let side_normal = |along_x: bool, sign: f64| {
        let (i, j) = side_face(along_x, sign);
        face_normal(&c.bottom[i], &c.bottom[j], &c.top[j])
    };
    let (miter, bevel) = compound_miter(splay_deg);

    CompoundAngle {
        corner,
        rotation_x: rx,
        rotation_z: rz,
        face_normals: FaceNormals {
            x_face: side_normal(true, interior.x),
            z_face: side_normal(false, interior.z),
        },
        top_normal: face_normal(&c.top[0], &c.top[1], &c.top[2]),
        miter_angle: miter,
        bevel_angle: bevel,
        length_factor: 1.0 / (rx.cos() * rz.cos()),
    }
}

/// Rotation of a leg as a transform (convenience for callers without
/// a [`CompoundAngle`]).
pub fn leg_transform(rx: f64, rz: f64) -> Transform {
    EulerAngles::new(rx, 0.0, rz).to_transform()
}
