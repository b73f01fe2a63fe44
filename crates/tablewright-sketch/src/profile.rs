//! Closed outlines drawn on a plane.

use std::f64::consts::{FRAC_PI_2, PI};
use tablewright_math::{Dir3, Point2, Point3, Tolerance, Vec3};

use crate::{simplify_polygon, SketchError};

/// One piece of an outline.
#[derive(Debug, Clone, PartialEq)]
pub enum SketchSegment {
    /// Straight edge.
    Line {
        /// First point.
        start: Point2,
        /// Last point.
        end: Point2,
    },
    /// Circular arc about `center`.
    Arc {
        /// First point.
        start: Point2,
        /// Last point.
        end: Point2,
        /// Arc centre; both ends sit on the same radius.
        center: Point2,
        /// Counter-clockwise sweep when true.
        ccw: bool,
    },
}

impl SketchSegment {
    /// First point.
    pub fn start(&self) -> Point2 {
        match self {
            SketchSegment::Line { start, .. } | SketchSegment::Arc { start, .. } => *start,
        }
    }

    /// Last point.
    pub fn end(&self) -> Point2 {
        match self {
            SketchSegment::Line { end, .. } | SketchSegment::Arc { end, .. } => *end,
        }
    }

    /// True for zero-length lines and zero-radius or zero-chord arcs.
    pub fn is_degenerate(&self) -> bool {
        let eps = Tolerance::DEFAULT.linear;
        match self {
            SketchSegment::Line { start, end } => (end - start).norm() < eps,
            SketchSegment::Arc {
                start, end, center, ..
            } => {
                (start - center).norm() < eps
                    || (end - center).norm() < eps
                    || (end - start).norm() < eps
            }
        }
    }

    /// Swept angle of an arc (signed, counter-clockwise positive); zero for lines.
    pub fn sweep(&self) -> f64 {
        match self {
            SketchSegment::Line { .. } => 0.0,
            SketchSegment::Arc {
                start,
                end,
                center,
                ccw,
            } => {
                let (a, b) = (start - center, end - center);
                let mut angle = b.y.atan2(b.x) - a.y.atan2(a.x);
                if *ccw {
                    if angle < 0.0 {
                        angle += 2.0 * PI;
                    }
                } else if angle > 0.0 {
                    angle -= 2.0 * PI;
                }
                angle
            }
        }
    }

    /// Points along the segment, excluding its end point.
    ///
    /// Arcs are split into `arc_segments` chords per quarter turn.
    pub fn sample(&self, arc_segments: u32, out: &mut Vec<Point2>) {
        match self {
            SketchSegment::Line { start, .. } => out.push(*start),
            SketchSegment::Arc { start, center, .. } => {
                let sweep = self.sweep();
                let steps = ((sweep.abs() / FRAC_PI_2) * arc_segments.max(1) as f64)
                    .ceil()
                    .max(1.0) as u32;
                let r = (start - center).norm();
                let a0 = (start.y - center.y).atan2(start.x - center.x);
                out.push(*start);
                for k in 1..steps {
                    let a = a0 + sweep * k as f64 / steps as f64;
                    out.push(Point2::new(center.x + r * a.cos(), center.y + r * a.sin()));
                }
            }
        }
    }
}

/// A closed outline on a plane in space.
///
/// Outline points are 2D; `to_3d` places them on the plane spanned by
/// `x_dir` and `y_dir` through `origin`.
#[derive(Debug, Clone)]
pub struct SketchProfile {
    /// Plane origin.
    pub origin: Point3,
    /// Direction of outline +x.
    pub x_dir: Dir3,
    /// Direction of outline +y.
    pub y_dir: Dir3,
    /// `x_dir × y_dir`.
    pub normal: Dir3,
    /// Outline, each segment starting where the previous one ends.
    pub segments: Vec<SketchSegment>,
}

impl SketchProfile {
    /// Profile from explicit segments.
    ///
    /// Fails on an empty list, a degenerate segment, or a gap between
    /// neighbouring segments (including last to first).
    pub fn new(
        origin: Point3,
        x_dir: Vec3,
        y_dir: Vec3,
        segments: Vec<SketchSegment>,
    ) -> Result<Self, SketchError> {
        let (Some(first), Some(last)) = (segments.first(), segments.last()) else {
            return Err(SketchError::EmptyProfile);
        };

        if let Some(i) = segments.iter().position(SketchSegment::is_degenerate) {
            return Err(SketchError::DegenerateSegment(i));
        }

        let eps = Tolerance::DEFAULT.linear;
        let closing = (last.end() - first.start()).norm();
        if let Some(gap) = std::iter::once(closing)
            .chain(segments.windows(2).map(|w| (w[1].start() - w[0].end()).norm()))
            .find(|&g| g > eps)
        {
            return Err(SketchError::NotClosed(gap));
        }

        Ok(Self {
            origin,
            x_dir: Dir3::new_normalize(x_dir),
            y_dir: Dir3::new_normalize(y_dir),
            normal: Dir3::new_normalize(x_dir.cross(&y_dir)),
            segments,
        })
    }

    /// Closed polygon through `points`; repeated points are skipped.
    pub fn polygon(
        origin: Point3,
        x_dir: Vec3,
        y_dir: Vec3,
        points: &[Point2],
    ) -> Result<Self, SketchError> {
        let tol = Tolerance::DEFAULT;
        let mut pts: Vec<Point2> = Vec::with_capacity(points.len());
        for p in points {
            if pts.last().map_or(true, |q| (p - q).norm() >= tol.linear) {
                pts.push(*p);
            }
        }
        while pts.len() > 1 && (pts[0] - pts[pts.len() - 1]).norm() < tol.linear {
            pts.pop();
        }
        if pts.len() < 3 {
            return Err(SketchError::TooFewVertices(pts.len()));
        }
        let n = pts.len();
        let segments = (0..n)
            .map(|i| SketchSegment::Line {
                start: pts[i],
                end: pts[(i + 1) % n],
            })
            .collect();
        Self::new(origin, x_dir, y_dir, segments)
    }

    /// Rectangle centred on the origin with optionally rounded corners.
    ///
    /// `width` runs along `x_dir`, `height` along `y_dir`. The radius is
    /// limited to half the shorter side; zero gives square corners.
    pub fn rounded_rectangle(
        origin: Point3,
        x_dir: Vec3,
        y_dir: Vec3,
        width: f64,
        height: f64,
        radius: f64,
    ) -> Result<Self, SketchError> {
        let (hw, hh) = (width / 2.0, height / 2.0);
        let r = radius.clamp(0.0, hw.min(hh));
        if r <= Tolerance::DEFAULT.linear {
            return Self::polygon(
                origin,
                x_dir,
                y_dir,
                &[
                    Point2::new(-hw, -hh),
                    Point2::new(hw, -hh),
                    Point2::new(hw, hh),
                    Point2::new(-hw, hh),
                ],
            );
        }

        // Corner centres counter-clockwise from bottom-right.
        let centres = [
            Point2::new(hw - r, -hh + r),
            Point2::new(hw - r, hh - r),
            Point2::new(-hw + r, hh - r),
            Point2::new(-hw + r, -hh + r),
        ];
        let mut segments = Vec::with_capacity(8);
        for (k, c) in centres.iter().enumerate() {
            let a0 = -FRAC_PI_2 + k as f64 * FRAC_PI_2;
            let a1 = a0 + FRAC_PI_2;
            let start = Point2::new(c.x + r * a0.cos(), c.y + r * a0.sin());
            let end = Point2::new(c.x + r * a1.cos(), c.y + r * a1.sin());
            let arc = SketchSegment::Arc {
                start,
                end,
                center: *c,
                ccw: true,
            };
            if let Some(prev_end) = segments.last().map(SketchSegment::end) {
                let line = SketchSegment::Line {
                    start: prev_end,
                    end: start,
                };
                if !line.is_degenerate() {
                    segments.push(line);
                }
            }
            segments.push(arc);
        }
        let closing = SketchSegment::Line {
            start: segments[segments.len() - 1].end(),
            end: segments[0].start(),
        };
        if !closing.is_degenerate() {
            segments.push(closing);
        }
        // Snap endpoints exactly so closure checks see no rounding gap.
        for i in 0..segments.len() {
            let next_start = segments[(i + 1) % segments.len()].start();
            match &mut segments[i] {
                SketchSegment::Line { end, .. } | SketchSegment::Arc { end, .. } => {
                    *end = next_start
                }
            }
        }
        Self::new(origin, x_dir, y_dir, segments)
    }

    /// Outline point placed on the plane.
    pub fn to_3d(&self, p: Point2) -> Point3 {
        self.origin + self.x_dir.into_inner() * p.x + self.y_dir.into_inner() * p.y
    }

    /// Sampled outline with duplicate and collinear points removed.
    pub fn outline(&self, arc_segments: u32) -> Vec<Point2> {
        let mut pts = Vec::new();
        for seg in &self.segments {
            seg.sample(arc_segments, &mut pts);
        }
        simplify_polygon(&pts)
    }

    /// Segment count.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false for a constructed profile.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signed_area;
    use approx::assert_relative_eq;

    fn xy(points: &[Point2]) -> Result<SketchProfile, SketchError> {
        SketchProfile::polygon(Point3::origin(), Vec3::x(), Vec3::y(), points)
    }

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> SketchSegment {
        SketchSegment::Line {
            start: Point2::new(x0, y0),
            end: Point2::new(x1, y1),
        }
    }

    fn on_xy(segments: Vec<SketchSegment>) -> Result<SketchProfile, SketchError> {
        SketchProfile::new(Point3::origin(), Vec3::x(), Vec3::y(), segments)
    }

    #[test]
    fn test_open_outline_is_rejected() {
        let open = vec![line(0.0, 0.0, 6.0, 0.0), line(6.0, 0.0, 6.0, 3.0)];
        assert!(matches!(on_xy(open), Err(SketchError::NotClosed(_))));
        let gap = vec![
            line(0.0, 0.0, 6.0, 0.0),
            line(6.0, 0.5, 6.0, 3.0),
            line(6.0, 3.0, 0.0, 0.0),
        ];
        assert!(matches!(on_xy(gap), Err(SketchError::NotClosed(g)) if (g - 0.5).abs() < 1e-12));
    }

    #[test]
    fn test_bad_segments_are_rejected() {
        assert!(matches!(
            on_xy(vec![line(1.0, 1.0, 1.0, 1.0)]),
            Err(SketchError::DegenerateSegment(0))
        ));
        assert!(matches!(on_xy(Vec::new()), Err(SketchError::EmptyProfile)));
    }

    #[test]
    fn test_polygon_skips_repeats() {
        let p = xy(&[
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 0.0),
        ])
        .unwrap();
        assert_eq!(p.len(), 3);
        assert!(matches!(
            xy(&[Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)]),
            Err(SketchError::TooFewVertices(2))
        ));
    }

    #[test]
    fn test_quarter_arc_length() {
        let arc = SketchSegment::Arc {
            start: Point2::new(5.0, 0.0),
            end: Point2::new(0.0, 5.0),
            center: Point2::origin(),
            ccw: true,
        };
        assert_relative_eq!(arc.sweep(), PI / 2.0, epsilon = 1e-12);
        let mut pts = Vec::new();
        arc.sample(4, &mut pts);
        assert_eq!(pts.len(), 4);
        assert_relative_eq!((pts[2] - Point2::origin()).norm(), 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rounded_rectangle_area() {
        let p = SketchProfile::rounded_rectangle(
            Point3::origin(),
            Vec3::x(),
            Vec3::y(),
            10.0,
            6.0,
            1.0,
        )
        .unwrap();
        assert_eq!(p.len(), 8);
        let exact = 60.0 - (4.0 - PI);
        let sampled = signed_area(&p.outline(16));
        assert!(sampled > 0.0);
        assert!((sampled - exact).abs() < 0.01);
    }

    #[test]
    fn test_full_radius_drops_short_sides() {
        let p = SketchProfile::rounded_rectangle(
            Point3::origin(),
            Vec3::x(),
            Vec3::y(),
            4.0,
            4.0,
            5.0,
        )
        .unwrap();
        assert_eq!(p.len(), 4);
        assert!(p.segments.iter().all(|s| matches!(s, SketchSegment::Arc { .. })));
    }

    #[test]
    fn test_to_3d_mapping() {
        let p = SketchProfile::rounded_rectangle(
            Point3::new(0.0, 2.0, 0.0),
            Vec3::z(),
            Vec3::x(),
            4.0,
            8.0,
            0.0,
        )
        .unwrap();
        assert_eq!(p.normal.into_inner(), Vec3::y());
        let q = p.to_3d(Point2::new(1.0, 3.0));
        assert_relative_eq!(q, Point3::new(3.0, 2.0, 1.0), epsilon = 1e-12);
    }
}
