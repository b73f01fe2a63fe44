#![warn(missing_docs)]

//! Math types for the tablewright geometry engine.
//!
//! nalgebra aliases plus the few geometric types the builders share:
//! affine transforms, Euler placements, planes and tolerances. Lengths are
//! inches, angles radians.

use nalgebra::{Matrix4, Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// Unit-length direction.
pub type Dir3 = Unit<Vector3<f64>>;

/// A point on a sketch plane.
pub type Point2 = nalgebra::Point2<f64>;

/// A unit quaternion rotation.
pub type Rotation = UnitQuaternion<f64>;

/// Convert degrees to radians.
pub fn deg(degrees: f64) -> f64 {
    degrees.to_radians()
}

/// Affine map on table coordinates, stored as a homogeneous matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Homogeneous matrix; points are columns.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            matrix: Matrix4::new_translation(&Vec3::new(dx, dy, dz)),
        }
    }

    fn about(axis: Vec3, angle: f64) -> Self {
        Self {
            matrix: Matrix4::from_axis_angle(&Unit::new_unchecked(axis), angle),
        }
    }

    /// Right-handed turn of `angle` radians about +X.
    pub fn rotation_x(angle: f64) -> Self {
        Self::about(Vec3::x(), angle)
    }

    /// Right-handed turn of `angle` radians about +Y.
    pub fn rotation_y(angle: f64) -> Self {
        Self::about(Vec3::y(), angle)
    }

    /// Right-handed turn of `angle` radians about +Z.
    pub fn rotation_z(angle: f64) -> Self {
        Self::about(Vec3::z(), angle)
    }

    /// Turn by a unit quaternion.
    pub fn rotation(q: &Rotation) -> Self {
        Self {
            matrix: q.to_homogeneous(),
        }
    }

    /// `self · other`: applies `other` first.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Map a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        self.matrix.transform_point(p)
    }

    /// Map a direction; translation does not apply.
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        self.matrix.transform_vector(v)
    }

    /// `None` when the matrix is singular.
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|matrix| Self { matrix })
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }
}

/// Euler rotation in radians, applied in XYZ order (matrix `Rx · Ry · Rz`,
/// so Z acts first on a vector).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EulerAngles {
    /// Rotation about X.
    pub x: f64,
    /// Rotation about Y.
    pub y: f64,
    /// Rotation about Z.
    pub z: f64,
}

impl EulerAngles {
    /// Create a new rotation.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The rotation as a 4x4 transform.
    pub fn to_transform(&self) -> Transform {
        Transform::rotation_x(self.x)
            .then(&Transform::rotation_y(self.y))
            .then(&Transform::rotation_z(self.z))
    }
}

/// World-space placement of a part: a translation plus an optional rotation
/// about the part's local origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Placement {
    /// Location of the part's local origin in world space.
    pub position: Point3,
    /// Rotation applied before translation.
    pub rotation: Option<EulerAngles>,
}

impl Placement {
    /// Placement with translation only.
    pub fn at(position: Point3) -> Self {
        Self {
            position,
            rotation: None,
        }
    }

    /// Placement with translation and rotation.
    pub fn rotated(position: Point3, rotation: EulerAngles) -> Self {
        Self {
            position,
            rotation: Some(rotation),
        }
    }

    /// Local-to-world transform.
    pub fn to_transform(&self) -> Transform {
        let t = Transform::translation(self.position.x, self.position.y, self.position.z);
        match &self.rotation {
            Some(r) => t.then(&r.to_transform()),
            None => t,
        }
    }

    /// World-to-local transform. A placement is rigid, so this always
    /// exists: the rotation transposed, after the translation undone.
    pub fn inverse_transform(&self) -> Transform {
        let back = Transform::translation(-self.position.x, -self.position.y, -self.position.z);
        match &self.rotation {
            Some(r) => Transform {
                matrix: r.to_transform().matrix.transpose(),
            }
            .then(&back),
            None => back,
        }
    }
}

/// An oriented plane `normal · p = offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal.
    pub normal: Vec3,
    /// Signed distance from the origin along `normal`.
    pub offset: f64,
}

impl Plane {
    /// Plane through `point` with the given normal (normalized here).
    pub fn from_point_normal(point: &Point3, normal: &Vec3) -> Self {
        let n = normal.normalize();
        Self {
            normal: n,
            offset: n.dot(&point.coords),
        }
    }

    /// Plane through three counter-clockwise points, or `None` if they are collinear.
    pub fn from_points(a: &Point3, b: &Point3, c: &Point3) -> Option<Self> {
        let n = (b - a).cross(&(c - a));
        if n.norm() < 1e-12 {
            return None;
        }
        Some(Self::from_point_normal(a, &n))
    }

    /// Signed distance of a point from the plane.
    pub fn signed_distance(&self, p: &Point3) -> f64 {
        self.normal.dot(&p.coords) - self.offset
    }

    /// A point lying on the plane.
    pub fn origin(&self) -> Point3 {
        Point3::from(self.normal * self.offset)
    }

    /// The same plane with its normal reversed.
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            offset: -self.offset,
        }
    }

    /// Map the plane through an affine transform.
    pub fn transformed(&self, t: &Transform) -> Self {
        let p = t.apply_point(&self.origin());
        // Normals map by the inverse transpose of the linear part.
        let n = t
            .matrix
            .fixed_view::<3, 3>(0, 0)
            .try_inverse()
            .map_or(self.normal, |inv| inv.transpose() * self.normal);
        Self::from_point_normal(&p, &n)
    }

    /// Intersect the line `p + s·dir` with the plane.
    ///
    /// Returns `None` when the line is parallel to the plane.
    pub fn intersect_line(&self, p: &Point3, dir: &Vec3) -> Option<Point3> {
        let denom = self.normal.dot(dir);
        if denom.abs() < 1e-12 {
            return None;
        }
        let s = -self.signed_distance(p) / denom;
        Some(p + dir * s)
    }

    /// The single point shared by three planes, or `None` when two of them
    /// are parallel.
    pub fn intersect_three(a: &Plane, b: &Plane, c: &Plane) -> Option<Point3> {
        let bc = b.normal.cross(&c.normal);
        let det = a.normal.dot(&bc);
        if det.abs() < 1e-12 {
            return None;
        }
        let p = bc * a.offset
            + c.normal.cross(&a.normal) * b.offset
            + a.normal.cross(&b.normal) * c.offset;
        Some(Point3::from(p / det))
    }
}

/// Shortest-arc rotation carrying `from` onto `to`.
///
/// Antiparallel vectors get a half turn about whichever of Y or X is
/// perpendicular to `from`, so the result is always defined.
pub fn align_rotation(from: &Vec3, to: &Vec3) -> Rotation {
    if let Some(q) = UnitQuaternion::rotation_between(from, to) {
        return q;
    }
    let axis = if from.cross(&Vec3::y()).norm() > 1e-9 {
        Vec3::y()
    } else {
        Vec3::x()
    };
    UnitQuaternion::from_axis_angle(&Unit::new_normalize(axis), std::f64::consts::PI)
}

/// Comparison epsilon shared by the sketch builders.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Distances below this are zero (inches).
    pub linear: f64,
}

impl Tolerance {
    /// 1e-6 in.
    pub const DEFAULT: Self = Self { linear: 1e-6 };
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}
