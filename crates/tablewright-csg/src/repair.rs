//! Turning BSP output back into an indexed solid.
//!
//! BSP fragments share positions but not vertices, and a face split on one
//! side of an edge leaves the other side whole. The steps here are:
//! - weld nearby positions into shared vertices
//! - drop repeated and collinear corners
//! - insert vertices lying on another polygon's edge (T-junctions)
//! - triangulate each polygon
//!
//! Every step walks vectors in input order, so output is deterministic.

use std::collections::HashMap;

use tablewright_math::Point3;
use tablewright_mesh::SolidMesh;

use crate::bsp::Polygon;

/// Distance within which positions are merged and points count as lying
/// on an edge.
pub const WELD_TOLERANCE: f64 = 1e-5;

/// Indexed mesh of `polygons`, with T-junctions resolved.
pub fn polygons_to_mesh(polygons: &[Polygon]) -> SolidMesh {
    let (positions, mut loops) = weld(polygons, WELD_TOLERANCE);
    for l in &mut loops {
        drop_repeats(l);
        drop_collinear(l, &positions, WELD_TOLERANCE);
    }
    loops.retain(|l| l.len() >= 3);

    let mut mesh = SolidMesh::from_parts(positions, Vec::new());
    let on_edges = EdgeIndex::new(&mesh.positions, &loops);
    for l in &loops {
        let (ring, inserted) = on_edges.split_edges(l, &mesh.positions, WELD_TOLERANCE);
        triangulate(&mut mesh, &ring, inserted);
    }
    mesh
}

/// Merge positions closer than `tol`. Returns the shared positions and each
/// polygon as a loop of indices.
fn weld(polygons: &[Polygon], tol: f64) -> (Vec<Point3>, Vec<Vec<u32>>) {
    let key = |p: &Point3| {
        [
            (p.x / tol).floor() as i64,
            (p.y / tol).floor() as i64,
            (p.z / tol).floor() as i64,
        ]
    };
    let mut grid: HashMap<[i64; 3], Vec<u32>> = HashMap::new();
    let mut positions: Vec<Point3> = Vec::new();
    let mut loops = Vec::with_capacity(polygons.len());

    for poly in polygons {
        let mut l = Vec::with_capacity(poly.vertices.len());
        for p in &poly.vertices {
            let k = key(p);
            let mut found = None;
            'cells: for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        let Some(cell) = grid.get(&[k[0] + dx, k[1] + dy, k[2] + dz]) else {
                            continue;
                        };
                        if let Some(&i) =
                            cell.iter().find(|&&i| (positions[i as usize] - p).norm() <= tol)
                        {
                            found = Some(i);
                            break 'cells;
                        }
                    }
                }
            }
            let index = found.unwrap_or_else(|| {
                let i = positions.len() as u32;
                positions.push(*p);
                grid.entry(k).or_default().push(i);
                i
            });
            l.push(index);
        }
        loops.push(l);
    }
    (positions, loops)
}

fn drop_repeats(l: &mut Vec<u32>) {
    l.dedup();
    while l.len() > 1 && l.first() == l.last() {
        l.pop();
    }
}

/// Remove corners lying on the segment between their neighbours.
fn drop_collinear(l: &mut Vec<u32>, positions: &[Point3], tol: f64) {
    let mut i = 0;
    while l.len() >= 3 && i < l.len() {
        let n = l.len();
        let prev = positions[l[(i + n - 1) % n] as usize];
        let here = positions[l[i] as usize];
        let next = positions[l[(i + 1) % n] as usize];
        if on_segment(&here, &prev, &next, tol).is_some() {
            l.remove(i);
            i = i.saturating_sub(1);
        } else {
            i += 1;
        }
    }
}

/// Parameter of `p` along `a → b` when it lies strictly inside the segment.
fn on_segment(p: &Point3, a: &Point3, b: &Point3, tol: f64) -> Option<f64> {
    let ab = b - a;
    let len2 = ab.norm_squared();
    if len2 <= tol * tol {
        return None;
    }
    let t = (p - a).dot(&ab) / len2;
    let len = len2.sqrt();
    if t * len <= tol || (1.0 - t) * len <= tol {
        return None;
    }
    let closest = a + ab * t;
    ((p - closest).norm() <= tol).then_some(t)
}

/// Referenced vertices sorted by x, for finding points on an edge.
struct EdgeIndex {
    by_x: Vec<u32>,
}

impl EdgeIndex {
    fn new(positions: &[Point3], loops: &[Vec<u32>]) -> Self {
        let mut used = vec![false; positions.len()];
        for &i in loops.iter().flatten() {
            used[i as usize] = true;
        }
        let mut by_x: Vec<u32> = (0..positions.len() as u32)
            .filter(|&i| used[i as usize])
            .collect();
        by_x.sort_by(|&a, &b| {
            positions[a as usize]
                .x
                .total_cmp(&positions[b as usize].x)
                .then(a.cmp(&b))
        });
        Self { by_x }
    }

    /// The loop with every vertex lying inside one of its edges inserted in
    /// order along that edge. The flag is set when anything was inserted.
    fn split_edges(&self, l: &[u32], positions: &[Point3], tol: f64) -> (Vec<u32>, bool) {
        let mut ring = Vec::with_capacity(l.len());
        let mut inserted = false;
        for (k, &ia) in l.iter().enumerate() {
            let ib = l[(k + 1) % l.len()];
            let (a, b) = (positions[ia as usize], positions[ib as usize]);
            ring.push(ia);

            let (lo, hi) = (a.x.min(b.x) - tol, a.x.max(b.x) + tol);
            let start = self.by_x.partition_point(|&i| positions[i as usize].x < lo);
            let mut hits: Vec<(f64, u32)> = self.by_x[start..]
                .iter()
                .take_while(|&&i| positions[i as usize].x <= hi)
                .filter(|&&i| i != ia && i != ib)
                .filter_map(|&i| on_segment(&positions[i as usize], &a, &b, tol).map(|t| (t, i)))
                .collect();
            if hits.is_empty() {
                continue;
            }
            hits.sort_by(|x, y| x.0.total_cmp(&y.0).then(x.1.cmp(&y.1)));
            hits.dedup_by_key(|h| h.1);
            ring.extend(hits.into_iter().map(|(_, i)| i));
            inserted = true;
        }
        (ring, inserted)
    }
}

/// Triangulate a convex loop. Loops that gained edge vertices are fanned
/// from their centroid so no triangle spans three collinear points.
fn triangulate(mesh: &mut SolidMesh, ring: &[u32], inserted: bool) {
    if ring.len() == 3 {
        mesh.add_triangle(ring[0], ring[1], ring[2]);
    } else if !inserted {
        for k in 1..ring.len() - 1 {
            mesh.add_triangle(ring[0], ring[k], ring[k + 1]);
        }
    } else {
        let sum = ring
            .iter()
            .fold(Point3::origin().coords, |acc, &i| acc + mesh.positions[i as usize].coords);
        let c = mesh.add_vertex(Point3::from(sum / ring.len() as f64));
        for k in 0..ring.len() {
            mesh.add_triangle(c, ring[k], ring[(k + 1) % ring.len()]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poly(points: &[[f64; 3]]) -> Polygon {
        Polygon::new(points.iter().map(|p| Point3::new(p[0], p[1], p[2])).collect()).unwrap()
    }

    #[test]
    fn test_weld_merges_close_points() {
        let a = poly(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        let b = poly(&[[1.0 + 1e-7, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]);
        let (positions, loops) = weld(&[a, b], WELD_TOLERANCE);
        assert_eq!(positions.len(), 4);
        assert_eq!(loops[1][0], 1);
        assert_eq!(loops[1][2], 2);
    }

    #[test]
    fn test_collinear_corner_removed() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        let mut l = vec![0, 1, 2, 3];
        drop_collinear(&mut l, &positions, WELD_TOLERANCE);
        assert_eq!(l, vec![0, 2, 3]);
    }

    #[test]
    fn test_repeats_removed() {
        let mut l = vec![4, 4, 5, 6, 4];
        drop_repeats(&mut l);
        assert_eq!(l, vec![4, 5, 6]);
    }

    #[test]
    fn test_t_junction_is_split() {
        // A unit square beside two half-height squares: the left square's
        // right edge gains the middle vertex.
        let left = poly(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]]);
        let low = poly(&[[1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [2.0, 0.5, 0.0], [1.0, 0.5, 0.0]]);
        let high = poly(&[[1.0, 0.5, 0.0], [2.0, 0.5, 0.0], [2.0, 1.0, 0.0], [1.0, 1.0, 0.0]]);
        let mesh = polygons_to_mesh(&[left, low, high]);
        // Eight welded corners plus one centroid for the split square.
        assert_eq!(mesh.num_vertices(), 9);
        assert_eq!(mesh.num_triangles(), 5 + 2 + 2);
        let area: f64 = (0..mesh.num_triangles())
            .map(|i| mesh.triangle_cross(i).norm() / 2.0)
            .sum();
        assert!((area - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_endpoints_are_not_on_segment() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(1.0, 0.0, 0.0);
        assert!(on_segment(&a, &a, &b, WELD_TOLERANCE).is_none());
        assert!(on_segment(&Point3::new(0.5, 1e-3, 0.0), &a, &b, WELD_TOLERANCE).is_none());
        let t = on_segment(&Point3::new(0.25, 0.0, 0.0), &a, &b, WELD_TOLERANCE).unwrap();
        assert!((t - 0.25).abs() < 1e-12);
    }
}
