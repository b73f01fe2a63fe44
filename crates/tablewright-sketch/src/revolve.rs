//! Lathe operation: turn a radius profile around the Y axis.

use std::f64::consts::PI;

use tablewright_math::Point3;
use tablewright_mesh::SolidMesh;

use crate::SketchError;

/// One station of a lathe profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatheSample {
    /// Height on the axis.
    pub y: f64,
    /// Turned radius at that height.
    pub radius: f64,
}

impl LatheSample {
    /// Create a sample.
    pub fn new(y: f64, radius: f64) -> Self {
        Self { y, radius }
    }
}

/// Revolve a radius profile a full turn about the Y axis.
///
/// `samples` run from the top of the turning down, with non-increasing
/// `y`. Two samples at the same height make a horizontal step (shoulder).
/// Each sample becomes a ring of `radial_segments` vertices; the ends are
/// closed with centre-vertex fans.
///
/// # Errors
///
/// `TooFewVertices` for fewer than two distinct samples or three radial
/// segments, `InvalidRadius` for a non-positive radius, `NotMonotonic` if
/// the profile climbs.
pub fn lathe(samples: &[LatheSample], radial_segments: u32) -> Result<SolidMesh, SketchError> {
    if radial_segments < 3 {
        return Err(SketchError::TooFewVertices(radial_segments as usize));
    }
    if let Some(i) = samples.iter().position(|s| !(s.radius > 0.0)) {
        return Err(SketchError::InvalidRadius(i));
    }
    if let Some(i) = (1..samples.len()).find(|&i| samples[i].y > samples[i - 1].y) {
        return Err(SketchError::NotMonotonic(i));
    }

    let mut stations: Vec<LatheSample> = Vec::with_capacity(samples.len());
    for s in samples {
        let repeat = stations
            .last()
            .is_some_and(|p| (p.y - s.y).abs() < 1e-12 && (p.radius - s.radius).abs() < 1e-12);
        if !repeat {
            stations.push(*s);
        }
    }
    if stations.len() < 2 || stations[0].y - stations[stations.len() - 1].y < 1e-12 {
        return Err(SketchError::TooFewVertices(stations.len()));
    }

    let n = radial_segments;
    let mut mesh = SolidMesh::new();
    for s in &stations {
        for k in 0..n {
            // Angle grows counter-clockwise seen from above.
            let phi = 2.0 * PI * k as f64 / n as f64;
            mesh.add_vertex(Point3::new(s.radius * phi.cos(), s.y, -s.radius * phi.sin()));
        }
    }
    for i in 0..stations.len() as u32 - 1 {
        mesh.add_ring_band((i + 1) * n, i * n, n);
    }

    let top = mesh.add_vertex(Point3::new(0.0, stations[0].y, 0.0));
    for k in 0..n {
        mesh.add_triangle(top, k, (k + 1) % n);
    }
    let last = (stations.len() as u32 - 1) * n;
    let bottom = mesh.add_vertex(Point3::new(0.0, stations[stations.len() - 1].y, 0.0));
    for k in 0..n {
        mesh.add_triangle(bottom, last + (k + 1) % n, last + k);
    }
    Ok(mesh)
}
