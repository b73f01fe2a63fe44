//! Polygon clean-up and ear-clipping triangulation.

use tablewright_math::Point2;

use crate::SketchError;

/// Relative sine below which three points count as collinear.
const COLLINEAR_SIN: f64 = 1e-10;

fn cross(o: &Point2, a: &Point2, b: &Point2) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Signed area of a closed polygon (positive when counter-clockwise).
pub fn signed_area(poly: &[Point2]) -> f64 {
    let n = poly.len();
    let mut sum = 0.0;
    for i in 0..n {
        let (p, q) = (poly[i], poly[(i + 1) % n]);
        sum += p.x * q.y - q.x * p.y;
    }
    sum / 2.0
}

/// Drop repeated points and vertices lying on the line through their neighbours.
pub fn simplify_polygon(poly: &[Point2]) -> Vec<Point2> {
    let mut pts: Vec<Point2> = poly.to_vec();
    loop {
        let n = pts.len();
        if n < 3 {
            return pts;
        }
        let removable = (0..n).find(|&i| {
            let a = &pts[(i + n - 1) % n];
            let b = &pts[i];
            let c = &pts[(i + 1) % n];
            let ab = (b - a).norm();
            let bc = (c - b).norm();
            ab < 1e-12 || bc < 1e-12 || cross(a, b, c).abs() <= COLLINEAR_SIN * ab * bc
        });
        match removable {
            Some(i) => {
                pts.remove(i);
            }
            None => return pts,
        }
    }
}

fn point_in_triangle(p: &Point2, a: &Point2, b: &Point2, c: &Point2) -> bool {
    let v0 = c - a;
    let v1 = b - a;
    let v2 = p - a;

    let dot00 = v0.dot(&v0);
    let dot01 = v0.dot(&v1);
    let dot02 = v0.dot(&v2);
    let dot11 = v1.dot(&v1);
    let dot12 = v1.dot(&v2);

    let inv_denom = 1.0 / (dot00 * dot11 - dot01 * dot01);
    let u = (dot11 * dot02 - dot01 * dot12) * inv_denom;
    let v = (dot00 * dot12 - dot01 * dot02) * inv_denom;

    let eps = 1e-10;
    u > eps && v > eps && (u + v) < 1.0 - eps
}

/// Triangulate a simple polygon by ear clipping.
///
/// Triangles keep the polygon's own winding. The polygon should already be
/// free of collinear vertices (see [`simplify_polygon`]).
pub fn ear_clip(poly: &[Point2]) -> Result<Vec<[usize; 3]>, SketchError> {
    if poly.len() < 3 {
        return Err(SketchError::TooFewVertices(poly.len()));
    }
    let orientation = signed_area(poly).signum();
    let mut remaining: Vec<usize> = (0..poly.len()).collect();
    let mut out = Vec::with_capacity(poly.len() - 2);

    while remaining.len() > 3 {
        let n = remaining.len();
        let ear = (0..n).find(|&i| {
            let prev = remaining[(i + n - 1) % n];
            let cur = remaining[i];
            let next = remaining[(i + 1) % n];
            let (a, b, c) = (&poly[prev], &poly[cur], &poly[next]);
            if cross(a, b, c) * orientation <= 0.0 {
                return false;
            }
            !remaining
                .iter()
                .filter(|&&j| j != prev && j != cur && j != next)
                .any(|&j| point_in_triangle(&poly[j], a, b, c))
        });
        let Some(i) = ear else {
            return Err(SketchError::Triangulation);
        };
        out.push([remaining[(i + n - 1) % n], remaining[i], remaining[(i + 1) % n]]);
        remaining.remove(i);
    }
    out.push([remaining[0], remaining[1], remaining[2]]);
    Ok(out)
}
