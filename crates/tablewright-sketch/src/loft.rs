//! Ring loft: a solid through a vertical stack of perimeter rings.

use tablewright_math::{Point2, Point3};
use tablewright_mesh::SolidMesh;

use crate::{ear_clip, SketchError};

/// Build a solid through `rings`, ordered bottom to top.
///
/// Every ring must have the same vertex count and run counter-clockwise
/// seen from above (right-handed about +Y). Vertex `i` of one ring is
/// joined to vertex `i` of the next; the first and last rings are capped.
pub fn loft(rings: &[Vec<Point3>]) -> Result<SolidMesh, SketchError> {
    let Some(first) = rings.first() else {
        return Err(SketchError::EmptyProfile);
    };
    let n = first.len();
    if n < 3 {
        return Err(SketchError::TooFewVertices(n));
    }
    if rings.len() < 2 {
        return Err(SketchError::TooFewVertices(rings.len()));
    }
    if let Some((ring, r)) = rings.iter().enumerate().find(|(_, r)| r.len() != n) {
        return Err(SketchError::RingMismatch {
            ring,
            expected: n,
            found: r.len(),
        });
    }

    let mut mesh = SolidMesh::new();
    for ring in rings {
        for p in ring {
            mesh.add_vertex(*p);
        }
    }
    let n32 = n as u32;
    for k in 0..rings.len() as u32 - 1 {
        mesh.add_ring_band(k * n32, (k + 1) * n32, n32);
    }

    // Plan view as (z, x) keeps right-handed-about-Y rings counter-clockwise.
    let plan = |ring: &[Point3]| ring.iter().map(|p| Point2::new(p.z, p.x)).collect::<Vec<_>>();
    let bottom = ear_clip(&plan(first))?;
    let last = rings.len() as u32 - 1;
    let top = ear_clip(&plan(&rings[last as usize]))?;
    for [a, b, c] in bottom {
        mesh.add_triangle(a as u32, c as u32, b as u32);
    }
    for [a, b, c] in top {
        let o = last * n32;
        mesh.add_triangle(o + a as u32, o + b as u32, o + c as u32);
    }
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(half: f64, y: f64) -> Vec<Point3> {
        vec![
            Point3::new(-half, y, -half),
            Point3::new(-half, y, half),
            Point3::new(half, y, half),
            Point3::new(half, y, -half),
        ]
    }

    #[test]
    fn test_frustum_volume() {
        let mesh = loft(&[square(2.0, 0.0), square(1.0, 3.0)]).unwrap();
        mesh.validate().unwrap();
        // (h/3)(A1 + A2 + sqrt(A1 A2)) = 1 * (16 + 4 + 8)
        assert_relative_eq!(mesh.volume(), 28.0, epsilon = 1e-9);
    }

    #[test]
    fn test_three_level_stack() {
        let mesh = loft(&[square(1.0, 0.0), square(1.5, 0.25), square(1.5, 1.0)]).unwrap();
        let report = mesh.validate().unwrap();
        assert_eq!(report.vertex_count, 12);
        assert_eq!(report.triangle_count, 2 * 8 + 4);
    }

    #[test]
    fn test_ring_mismatch() {
        let mut short = square(1.0, 1.0);
        short.pop();
        assert_eq!(
            loft(&[square(1.0, 0.0), short]),
            Err(SketchError::RingMismatch {
                ring: 1,
                expected: 4,
                found: 3
            })
        );
    }
}
