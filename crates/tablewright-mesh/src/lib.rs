#![warn(missing_docs)]

//! Indexed solid meshes for the tablewright geometry engine.
//!
//! A [`SolidMesh`] is shared-vertex topology: a position buffer plus a
//! triangle index buffer with counter-clockwise winding seen from outside.
//! Normals are not stored; [`shade`] derives flat or smooth normals for
//! rendering as a separate pass.
//!
//! # Example
//!
//! ```
//! use tablewright_mesh::SolidMesh;
//!
//! let block = SolidMesh::cuboid(2.0, 3.0, 4.0);
//! assert_eq!(block.num_vertices(), 8);
//! assert_eq!(block.num_triangles(), 12);
//! assert!((block.volume() - 24.0).abs() < 1e-12);
//! block.validate().unwrap();
//! ```

mod bbox;
mod normals;
mod stl;
mod validate;

pub use bbox::Aabb3;
pub use normals::{shade, NormalMode, ShadedMesh};
pub use stl::stl_bytes;
pub use validate::MeshReport;

use std::collections::HashMap;
use tablewright_math::{Point3, Transform, Vec3};
use thiserror::Error;

/// Reasons a mesh is not a closed, consistently wound 2-manifold.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    /// The mesh has no triangles.
    #[error("mesh is empty")]
    Empty,

    /// A triangle refers to a vertex that does not exist.
    #[error("triangle {triangle} references missing vertex {index}")]
    IndexOutOfRange {
        /// Triangle index.
        triangle: usize,
        /// Offending vertex index.
        index: u32,
    },

    /// Triangles with repeated vertices or zero area.
    #[error("{0} degenerate triangles")]
    DegenerateTriangles(usize),

    /// Edges used by only one triangle.
    #[error("{0} boundary edges (mesh is not closed)")]
    BoundaryEdges(usize),

    /// Edges used by more than two triangles.
    #[error("{0} non-manifold edges")]
    NonManifoldEdges(usize),

    /// Edges traversed twice in the same direction.
    #[error("{0} edges with inconsistent winding")]
    InconsistentWinding(usize),

    /// Enclosed volume is zero or negative (inside-out).
    #[error("enclosed volume {0} is not positive")]
    NonPositiveVolume(f64),
}

/// Indexed triangle mesh with shared vertices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SolidMesh {
    /// Vertex positions.
    pub positions: Vec<Point3>,
    /// Triangles as vertex index triples, counter-clockwise from outside.
    pub triangles: Vec<[u32; 3]>,
}

impl SolidMesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh from raw buffers.
    pub fn from_parts(positions: Vec<Point3>, triangles: Vec<[u32; 3]>) -> Self {
        Self {
            positions,
            triangles,
        }
    }

    /// Axis-aligned box of the given size centred on the origin.
    pub fn cuboid(sx: f64, sy: f64, sz: f64) -> Self {
        let (hx, hy, hz) = (sx / 2.0, sy / 2.0, sz / 2.0);
        Self::cuboid_between(Point3::new(-hx, -hy, -hz), Point3::new(hx, hy, hz))
    }

    /// Axis-aligned box spanning two opposite corners.
    pub fn cuboid_between(min: Point3, max: Point3) -> Self {
        let mut mesh = Self::new();
        for &y in &[min.y, max.y] {
            for &(x, z) in &[(min.x, min.z), (min.x, max.z), (max.x, max.z), (max.x, min.z)] {
                mesh.add_vertex(Point3::new(x, y, z));
            }
        }
        mesh.add_prism_faces(0, 4, 4);
        mesh
    }

    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// True when the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Append a vertex and return its index.
    pub fn add_vertex(&mut self, p: Point3) -> u32 {
        self.positions.push(p);
        (self.positions.len() - 1) as u32
    }

    /// Append a triangle.
    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.triangles.push([a, b, c]);
    }

    /// Append a planar quad `a b c d` (counter-clockwise) as two triangles.
    pub fn add_quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.triangles.push([a, b, c]);
        self.triangles.push([a, c, d]);
    }

    /// Close a prism between two rings of `n` vertices.
    ///
    /// `lower` and `upper` are the first indices of two rings that run
    /// counter-clockwise seen from above (right-handed about +Y, so from
    /// `-X,-Z` toward `-X,+Z` first); `upper` is the higher ring.
    /// Adds the side quads and fan-triangulated end caps, so the rings must
    /// be convex.
    pub fn add_prism_faces(&mut self, lower: u32, upper: u32, n: u32) {
        self.add_ring_band(lower, upper, n);
        // Bottom cap faces down: reverse ring order.
        for i in 1..n - 1 {
            self.add_triangle(lower, lower + i + 1, lower + i);
        }
        for i in 1..n - 1 {
            self.add_triangle(upper, upper + i, upper + i + 1);
        }
    }

    /// Side quads between two rings of `n` vertices (see [`add_prism_faces`]).
    ///
    /// [`add_prism_faces`]: SolidMesh::add_prism_faces
    pub fn add_ring_band(&mut self, lower: u32, upper: u32, n: u32) {
        for i in 0..n {
            let j = (i + 1) % n;
            self.add_quad(lower + i, lower + j, upper + j, upper + i);
        }
    }

    /// Corner positions of triangle `i`.
    pub fn triangle_points(&self, i: usize) -> [Point3; 3] {
        let [a, b, c] = self.triangles[i];
        [
            self.positions[a as usize],
            self.positions[b as usize],
            self.positions[c as usize],
        ]
    }

    /// Unnormalized face normal of triangle `i` (length is twice the area).
    pub fn triangle_cross(&self, i: usize) -> Vec3 {
        let [a, b, c] = self.triangle_points(i);
        (b - a).cross(&(c - a))
    }

    /// Append another mesh, offsetting its indices.
    pub fn merge(&mut self, other: &SolidMesh) {
        let offset = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.triangles.extend(
            other
                .triangles
                .iter()
                .map(|t| [t[0] + offset, t[1] + offset, t[2] + offset]),
        );
    }

    /// Apply a rigid transform to every vertex in place.
    pub fn transform(&mut self, t: &Transform) {
        for p in &mut self.positions {
            *p = t.apply_point(p);
        }
    }

    /// A transformed copy.
    pub fn transformed(&self, t: &Transform) -> Self {
        let mut out = self.clone();
        out.transform(t);
        out
    }

    /// Signed enclosed volume (positive for outward winding).
    pub fn volume(&self) -> f64 {
        let mut six_v = 0.0;
        for i in 0..self.triangles.len() {
            let [a, b, c] = self.triangle_points(i);
            six_v += a.coords.dot(&b.coords.cross(&c.coords));
        }
        six_v / 6.0
    }

    /// Total surface area.
    pub fn surface_area(&self) -> f64 {
        (0..self.triangles.len())
            .map(|i| self.triangle_cross(i).norm() / 2.0)
            .sum()
    }

    /// Bounding box of all vertices.
    pub fn bounding_box(&self) -> Aabb3 {
        let mut bb = Aabb3::empty();
        for p in &self.positions {
            bb.include_point(p);
        }
        bb
    }

    /// Merge vertices closer than `tol` and drop triangles that collapse.
    ///
    /// Vertices keep their first-seen order, so the result is deterministic.
    pub fn welded(&self, tol: f64) -> SolidMesh {
        let cell = tol.max(1e-12);
        let key = |p: &Point3| {
            [
                (p.x / cell).floor() as i64,
                (p.y / cell).floor() as i64,
                (p.z / cell).floor() as i64,
            ]
        };
        let mut grid: HashMap<[i64; 3], Vec<u32>> = HashMap::new();
        let mut out = SolidMesh::new();
        let mut remap = Vec::with_capacity(self.positions.len());

        for p in &self.positions {
            let k = key(p);
            let mut found = None;
            'search: for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        let Some(bucket) = grid.get(&[k[0] + dx, k[1] + dy, k[2] + dz]) else {
                            continue;
                        };
                        for &idx in bucket {
                            if (out.positions[idx as usize] - p).norm() <= tol {
                                found = Some(idx);
                                break 'search;
                            }
                        }
                    }
                }
            }
            let idx = match found {
                Some(idx) => idx,
                None => {
                    let idx = out.add_vertex(*p);
                    grid.entry(k).or_default().push(idx);
                    idx
                }
            };
            remap.push(idx);
        }

        for t in &self.triangles {
            let [a, b, c] = t.map(|i| remap[i as usize]);
            if a != b && b != c && a != c {
                out.add_triangle(a, b, c);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cuboid_topology() {
        let m = SolidMesh::cuboid(2.5, 28.0, 2.5);
        assert_eq!(m.num_vertices(), 8);
        assert_eq!(m.num_triangles(), 12);
        assert_relative_eq!(m.volume(), 2.5 * 2.5 * 28.0, epsilon = 1e-9);
        assert_relative_eq!(m.surface_area(), 2.0 * (2.5 * 2.5) + 4.0 * (2.5 * 28.0), epsilon = 1e-9);
    }

    #[test]
    fn test_cuboid_between_bounds() {
        let m = SolidMesh::cuboid_between(Point3::new(1.0, 2.0, 3.0), Point3::new(2.0, 4.0, 6.0));
        let bb = m.bounding_box();
        assert_eq!(bb.min, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(bb.max, Point3::new(2.0, 4.0, 6.0));
        assert_relative_eq!(m.volume(), 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_merge_offsets_indices() {
        let mut a = SolidMesh::cuboid(1.0, 1.0, 1.0);
        let b = SolidMesh::cuboid(1.0, 1.0, 1.0)
            .transformed(&Transform::translation(5.0, 0.0, 0.0));
        a.merge(&b);
        assert_eq!(a.num_vertices(), 16);
        assert_eq!(a.num_triangles(), 24);
        assert!(a.triangles[12..].iter().all(|t| t.iter().all(|&i| i >= 8)));
        assert_relative_eq!(a.volume(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_transform_preserves_volume() {
        let m = SolidMesh::cuboid(1.0, 2.0, 3.0)
            .transformed(&Transform::rotation_x(0.3).then(&Transform::rotation_z(-0.2)));
        assert_relative_eq!(m.volume(), 6.0, epsilon = 1e-9);
    }

    #[test]
    fn test_welded_merges_duplicates() {
        let a = SolidMesh::cuboid(1.0, 1.0, 1.0);
        // Split the same cube into per-triangle vertices.
        let mut soup = SolidMesh::new();
        for i in 0..a.num_triangles() {
            let [p, q, r] = a.triangle_points(i);
            let base = soup.add_vertex(p);
            soup.add_vertex(q + Vec3::new(1e-9, 0.0, 0.0));
            soup.add_vertex(r);
            soup.add_triangle(base, base + 1, base + 2);
        }
        let w = soup.welded(1e-6);
        assert_eq!(w.num_vertices(), 8);
        assert_eq!(w.num_triangles(), 12);
        w.validate().unwrap();
    }

    #[test]
    fn test_welded_drops_collapsed_triangles() {
        let mut m = SolidMesh::cuboid(1.0, 1.0, 1.0);
        let a = m.add_vertex(Point3::new(0.0, 0.0, 0.0));
        let b = m.add_vertex(Point3::new(0.0, 0.0, 1e-9));
        let c = m.add_vertex(Point3::new(1.0, 1.0, 1.0));
        m.add_triangle(a, b, c);
        let w = m.welded(1e-6);
        assert_eq!(w.num_triangles(), 12);
    }
}
