//! Render buffers with generated normals.
//!
//! Solid construction emits shared-vertex topology only. Faceted or smooth
//! shading is chosen here, after modelling, by either splitting vertices
//! per triangle or averaging face normals at shared vertices.

use tablewright_math::Vec3;

use crate::SolidMesh;

/// How vertex normals are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NormalMode {
    /// One normal per triangle; vertices are duplicated per face.
    #[default]
    Flat,
    /// Area-weighted average of adjacent face normals at each shared vertex.
    Smooth,
}

/// Flat f32 buffers ready for upload to a renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShadedMesh {
    /// Vertex positions: `[x0, y0, z0, x1, ...]`.
    pub vertices: Vec<f32>,
    /// Vertex normals, same length as `vertices`.
    pub normals: Vec<f32>,
    /// Triangle indices.
    pub indices: Vec<u32>,
}

impl ShadedMesh {
    /// Number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Number of triangles.
    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    fn push(&mut self, p: [f64; 3], n: &Vec3) {
        self.vertices.extend(p.iter().map(|&c| c as f32));
        self.normals.extend([n.x as f32, n.y as f32, n.z as f32]);
    }
}

fn unit_or_up(v: Vec3) -> Vec3 {
    v.try_normalize(1e-20).unwrap_or_else(Vec3::y)
}

/// Generate render buffers for `mesh`.
pub fn shade(mesh: &SolidMesh, mode: NormalMode) -> ShadedMesh {
    let mut out = ShadedMesh::default();
    match mode {
        NormalMode::Flat => {
            for i in 0..mesh.num_triangles() {
                let n = unit_or_up(mesh.triangle_cross(i));
                let base = out.num_vertices() as u32;
                for p in mesh.triangle_points(i) {
                    out.push([p.x, p.y, p.z], &n);
                }
                out.indices.extend([base, base + 1, base + 2]);
            }
        }
        NormalMode::Smooth => {
            let mut acc = vec![Vec3::zeros(); mesh.num_vertices()];
            for (i, tri) in mesh.triangles.iter().enumerate() {
                // Unnormalized cross product weights by area.
                let n = mesh.triangle_cross(i);
                for &v in tri {
                    acc[v as usize] += n;
                }
            }
            for (p, n) in mesh.positions.iter().zip(acc) {
                out.push([p.x, p.y, p.z], &unit_or_up(n));
            }
            out.indices
                .extend(mesh.triangles.iter().flat_map(|t| t.iter().copied()));
        }
    }
    out
}
