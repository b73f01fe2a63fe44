//! Leg solids.
//!
//! Legs are built in a local frame with the top centre at the origin and the
//! body running down −Y. Square, tapered and splayed legs are stacks of
//! four-corner rings; turned legs are a lathe profile.

use std::f64::consts::PI;

use tablewright_angles::{side_face, solve, splay_rotation, splayed_corners, CompoundAngle, LegCorner, LegSection};
use tablewright_math::{EulerAngles, Plane, Point3, Vec3};
use tablewright_mesh::SolidMesh;
use tablewright_params::{ConstraintViolation, FurnitureParameters, LegStyle, TaperMode};
use tablewright_sketch::{lathe, loft, LatheSample};
use tracing::{debug, instrument};

use crate::{clamp_into, hexahedron, BuiltPart, GeometryError};

/// Segments around a turned leg.
pub const TURN_RADIAL_SEGMENTS: u32 = 16;
/// Segments down the shaped part of a turned leg.
pub const TURN_HEIGHT_SEGMENTS: u32 = 32;

const MIN_SECTION: f64 = 0.25;
const MIN_HEIGHT: f64 = 1.0;
const MAX_SPLAY: f64 = 15.0;

// Turned profile zones, as fractions of the shaped length.
const SWELL_END: f64 = 0.2;
const FOOT_START: f64 = 0.85;

/// Horizontal axis of a leg face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceAxis {
    /// The face looking along X (receives members running along X).
    X,
    /// The face looking along Z.
    Z,
}

/// Everything needed to build one leg.
#[derive(Debug, Clone, PartialEq)]
pub struct LegSpec {
    /// Corner the leg stands at.
    pub corner: LegCorner,
    /// Construction style.
    pub style: LegStyle,
    /// Square stock size at the top.
    pub thickness: f64,
    /// Vertical drop from the underside of the top to the floor.
    pub height: f64,
    /// Bottom chamfer on square legs.
    pub foot_chamfer: f64,
    /// Which faces taper.
    pub taper_mode: TaperMode,
    /// Size at the floor for tapered and splayed legs.
    pub taper_end: f64,
    /// Distance below the top where the taper begins.
    pub taper_start: f64,
    /// Length of the full-size block at the top of a turned leg.
    pub pommel_length: f64,
    /// Outward tilt of splayed legs, degrees.
    pub splay_angle: f64,
}

impl LegSpec {
    /// A plain square leg.
    pub fn square(corner: LegCorner, thickness: f64, height: f64) -> Self {
        Self {
            corner,
            style: LegStyle::Square,
            thickness,
            height,
            foot_chamfer: 0.0,
            taper_mode: TaperMode::InsideOnly,
            taper_end: thickness,
            taper_start: 0.0,
            pommel_length: 0.0,
            splay_angle: 0.0,
        }
    }

    /// The leg at `corner` of a table described by `params`.
    pub fn from_params(params: &FurnitureParameters, corner: LegCorner) -> Self {
        let legs = &params.legs;
        Self {
            corner,
            style: legs.style,
            thickness: legs.thickness,
            height: params.leg_height(),
            foot_chamfer: legs.foot_chamfer,
            taper_mode: legs.taper.mode,
            taper_end: legs.taper.end_size,
            taper_start: legs.taper.start_from_top,
            pommel_length: legs.pommel_length,
            splay_angle: legs.splay_angle,
        }
    }
}

/// Horizontal extent of a leg at one height, in the leg frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossSection {
    /// Lowest X.
    pub min_x: f64,
    /// Highest X.
    pub max_x: f64,
    /// Lowest Z.
    pub min_z: f64,
    /// Highest Z.
    pub max_z: f64,
}

impl CrossSection {
    fn centred(half: f64) -> Self {
        Self {
            min_x: -half,
            max_x: half,
            min_z: -half,
            max_z: half,
        }
    }

    /// Size along X.
    pub fn width_x(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Size along Z.
    pub fn width_z(&self) -> f64 {
        self.max_z - self.min_z
    }

    fn ring(&self, y: f64) -> [Point3; 4] {
        [
            Point3::new(self.min_x, y, self.min_z),
            Point3::new(self.min_x, y, self.max_z),
            Point3::new(self.max_x, y, self.max_z),
            Point3::new(self.max_x, y, self.min_z),
        ]
    }
}

/// A leg spec with its inputs clamped and its splay solved.
#[derive(Debug, Clone, PartialEq)]
pub struct Leg {
    spec: LegSpec,
    length: f64,
    angle: Option<CompoundAngle>,
}

impl Leg {
    /// Clamp `spec` into buildable ranges.
    pub fn resolve(spec: &LegSpec) -> (Self, Vec<ConstraintViolation>) {
        let mut v = Vec::new();
        let mut s = spec.clone();
        s.thickness = clamp_into(s.thickness, MIN_SECTION, f64::MAX, "legs.thickness", &mut v);
        s.height = clamp_into(s.height, MIN_HEIGHT, f64::MAX, "legs.height", &mut v);
        let t = s.thickness;

        match s.style {
            LegStyle::Square => {
                let limit = (0.4 * t).min(0.5 * s.height);
                s.foot_chamfer = clamp_into(s.foot_chamfer, 0.0, limit, "legs.foot_chamfer", &mut v);
            }
            LegStyle::Tapered => {
                s.taper_end =
                    clamp_into(s.taper_end, MIN_SECTION.min(t), t, "legs.taper.end_size", &mut v);
                s.taper_start = clamp_into(
                    s.taper_start,
                    0.0,
                    s.height - 0.5 * MIN_HEIGHT,
                    "legs.taper.start_from_top",
                    &mut v,
                );
            }
            LegStyle::Turned => {
                s.pommel_length =
                    clamp_into(s.pommel_length, 0.0, 0.5 * s.height, "legs.pommel_length", &mut v);
            }
            LegStyle::Splayed => {
                s.taper_end =
                    clamp_into(s.taper_end, MIN_SECTION.min(t), t, "legs.taper.end_size", &mut v);
                s.splay_angle =
                    clamp_into(s.splay_angle, 0.0, MAX_SPLAY, "legs.splay_angle", &mut v);
            }
        }

        let (length, angle) = if s.style == LegStyle::Splayed {
            let (rx, rz) = splay_rotation(s.corner, s.splay_angle);
            let length = s.height / (rx.cos() * rz.cos());
            let section = LegSection {
                top_half: t / 2.0,
                bottom_half: s.taper_end / 2.0,
                height: length,
            };
            (length, Some(solve(s.corner, s.splay_angle, &section)))
        } else {
            (s.height, None)
        };

        (
            Self {
                spec: s,
                length,
                angle,
            },
            v,
        )
    }

    /// The clamped spec.
    pub fn spec(&self) -> &LegSpec {
        &self.spec
    }

    /// Length along the leg's own axis.
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Solved angles of a splayed leg.
    pub fn compound_angle(&self) -> Option<&CompoundAngle> {
        self.angle.as_ref()
    }

    /// Placement rotation: splayed legs only.
    pub fn rotation(&self) -> Option<EulerAngles> {
        self.angle.map(|a| a.rotation())
    }

    /// Leg-frame depth below the top matching a vertical drop in the table.
    pub fn local_depth(&self, drop: f64) -> f64 {
        drop * self.length / self.spec.height
    }

    /// Cross-section at leg-frame height `y` (zero at the top, negative below).
    ///
    /// Sizes never grow toward the floor and equal the stock size above
    /// any taper, chamfer or turning.
    pub fn section_at(&self, y: f64) -> CrossSection {
        let s = &self.spec;
        let half = s.thickness / 2.0;
        let d = (-y).clamp(0.0, self.length);
        match s.style {
            LegStyle::Square => {
                let chamfer_top = self.length - s.foot_chamfer;
                if s.foot_chamfer > 0.0 && d > chamfer_top {
                    CrossSection::centred(half - (d - chamfer_top))
                } else {
                    CrossSection::centred(half)
                }
            }
            LegStyle::Tapered => {
                let size = self.taper_size(d);
                match s.taper_mode {
                    TaperMode::AllSides => CrossSection::centred(size / 2.0),
                    TaperMode::InsideOnly => {
                        let axes = s.corner.interior_axes();
                        let (x0, x1) = (-axes.x * half, axes.x * (size - half));
                        let (z0, z1) = (-axes.z * half, axes.z * (size - half));
                        CrossSection {
                            min_x: x0.min(x1),
                            max_x: x0.max(x1),
                            min_z: z0.min(z1),
                            max_z: z0.max(z1),
                        }
                    }
                }
            }
            LegStyle::Turned => CrossSection::centred(self.turned_radius(d)),
            LegStyle::Splayed => {
                let bottom = s.taper_end / 2.0;
                CrossSection::centred(half + (bottom - half) * d / self.length)
            }
        }
    }

    /// Plane of the interior face along `axis` at leg-frame height `y`,
    /// taken from the leg's actual corner positions.
    pub fn inside_face(&self, axis: FaceAxis, y: f64) -> Result<Plane, GeometryError> {
        let interior = self.spec.corner.interior_axes();
        let along_x = axis == FaceAxis::X;
        let sign = if along_x { interior.x } else { interior.z };

        if self.spec.style == LegStyle::Turned {
            let n = if along_x { Vec3::x() } else { Vec3::z() } * sign;
            let r = self.turned_radius((-y).clamp(0.0, self.length));
            let p = Point3::new(0.0, y, 0.0) + n * r;
            return Ok(Plane::from_point_normal(&p, &n));
        }

        let rings = self.rings();
        let d = (-y).clamp(0.0, self.length);
        let k = rings
            .windows(2)
            .position(|w| d <= w[1].0)
            .unwrap_or(rings.len() - 2);
        let (upper, lower) = (&rings[k].1, &rings[k + 1].1);
        let (i, j) = side_face(along_x, sign);
        Plane::from_points(&lower[i], &lower[j], &upper[j]).ok_or(GeometryError::DegenerateFace("leg"))
    }

    fn taper_size(&self, d: f64) -> f64 {
        let s = &self.spec;
        if d <= s.taper_start {
            return s.thickness;
        }
        let f = ((d - s.taper_start) / (self.length - s.taper_start)).min(1.0);
        s.thickness - (s.thickness - s.taper_end) * f
    }

    fn turned_radius(&self, d: f64) -> f64 {
        let r0 = self.spec.thickness / 2.0;
        let p = self.spec.pommel_length;
        if d <= p {
            return r0;
        }
        r0 * turned_profile(((d - p) / (self.length - p)).clamp(0.0, 1.0))
    }

    /// Corner rings from the top down, each with its depth below the top.
    fn rings(&self) -> Vec<(f64, [Point3; 4])> {
        let s = &self.spec;
        let mut depths = vec![0.0];
        match s.style {
            LegStyle::Splayed => {
                if let Some(a) = &self.angle {
                    let section = LegSection {
                        top_half: s.thickness / 2.0,
                        bottom_half: s.taper_end / 2.0,
                        height: self.length,
                    };
                    let c = splayed_corners(&section, a.rotation_x, a.rotation_z);
                    return vec![(0.0, c.top), (self.length, c.bottom)];
                }
            }
            LegStyle::Square if s.foot_chamfer > 1e-9 => depths.push(self.length - s.foot_chamfer),
            LegStyle::Tapered if s.taper_start > 1e-9 => depths.push(s.taper_start),
            _ => {}
        }
        depths.push(self.length);
        depths
            .into_iter()
            .map(|d| (d, self.section_at(-d).ring(-d)))
            .collect()
    }

    fn turned_samples(&self) -> Vec<LatheSample> {
        let r0 = self.spec.thickness / 2.0;
        let p = self.spec.pommel_length;
        let n = TURN_HEIGHT_SEGMENTS;
        let mut samples = Vec::with_capacity(n as usize + 3);
        if p > 1e-6 {
            samples.push(LatheSample::new(0.0, r0));
            samples.push(LatheSample::new(-p, r0));
        }
        for k in 0..=n {
            let u = k as f64 / n as f64;
            samples.push(LatheSample::new(
                -(p + u * (self.length - p)),
                r0 * turned_profile(u),
            ));
        }
        samples
    }

    /// Build the leg mesh in its local frame.
    #[instrument(skip(self), fields(corner = self.spec.corner.label(), style = ?self.spec.style))]
    pub fn build(&self) -> Result<SolidMesh, GeometryError> {
        let mesh = match self.spec.style {
            LegStyle::Turned => lathe(&self.turned_samples(), TURN_RADIAL_SEGMENTS)?,
            LegStyle::Splayed => {
                let rings = self.rings();
                hexahedron(rings[1].1, rings[0].1)
            }
            LegStyle::Square | LegStyle::Tapered => {
                let rings: Vec<Vec<Point3>> =
                    self.rings().iter().rev().map(|(_, r)| r.to_vec()).collect();
                loft(&rings)?
            }
        };
        debug!(vertices = mesh.num_vertices(), triangles = mesh.num_triangles(), "leg built");
        Ok(mesh)
    }
}

/// Turned radius as a fraction of the pommel radius, `u` running from the
/// pommel (0) to the floor (1): a swell, a straight taper and a small flare.
fn turned_profile(u: f64) -> f64 {
    if u < SWELL_END {
        0.8 + 0.15 * (PI * u / SWELL_END).sin()
    } else if u < FOOT_START {
        0.8 - 0.25 * (u - SWELL_END) / (FOOT_START - SWELL_END)
    } else {
        let k = (u - FOOT_START) / (1.0 - FOOT_START);
        0.55 + 0.1 * k * k
    }
}

/// Resolve and build a leg.
pub fn build_leg(spec: &LegSpec) -> Result<BuiltPart, GeometryError> {
    let (leg, violations) = Leg::resolve(spec);
    BuiltPart::checked(leg.build()?, violations)
}
