//! Manifold validation and health reporting.
//!
//! A valid solid has every undirected edge used by exactly two triangles,
//! traversed once in each direction, no zero-area triangles and a
//! positive enclosed volume.

use std::collections::HashMap;
use std::fmt;

use crate::{MeshError, SolidMesh};

/// Twice-area below which a triangle counts as degenerate (square inches).
const DEGENERATE_CROSS: f64 = 1e-14;

/// Edge and volume statistics for a mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshReport {
    /// Total number of vertices.
    pub vertex_count: usize,
    /// Total number of triangles.
    pub triangle_count: usize,
    /// Number of distinct undirected edges.
    pub edge_count: usize,
    /// Edges used by one triangle.
    pub boundary_edge_count: usize,
    /// Edges used by more than two triangles.
    pub non_manifold_edge_count: usize,
    /// Edges traversed more than once in the same direction.
    pub inconsistent_edge_count: usize,
    /// Triangles with a repeated index or near-zero area.
    pub degenerate_triangle_count: usize,
    /// Signed enclosed volume.
    pub volume: f64,
}

impl MeshReport {
    /// Build the report without judging it.
    pub fn of(mesh: &SolidMesh) -> Self {
        let mut directed: HashMap<(u32, u32), u32> = HashMap::new();
        let mut undirected: HashMap<(u32, u32), u32> = HashMap::new();
        let mut degenerate = 0;

        for (i, &[a, b, c]) in mesh.triangles.iter().enumerate() {
            if a == b || b == c || a == c || mesh.triangle_cross(i).norm() < DEGENERATE_CROSS {
                degenerate += 1;
            }
            for (u, v) in [(a, b), (b, c), (c, a)] {
                *directed.entry((u, v)).or_default() += 1;
                *undirected.entry((u.min(v), u.max(v))).or_default() += 1;
            }
        }

        Self {
            vertex_count: mesh.positions.len(),
            triangle_count: mesh.triangles.len(),
            edge_count: undirected.len(),
            boundary_edge_count: undirected.values().filter(|&&n| n == 1).count(),
            non_manifold_edge_count: undirected.values().filter(|&&n| n > 2).count(),
            inconsistent_edge_count: directed.values().filter(|&&n| n > 1).count(),
            degenerate_triangle_count: degenerate,
            volume: mesh.volume(),
        }
    }

    /// Closed, consistently wound, non-degenerate and positive volume.
    #[must_use]
    pub fn is_valid_solid(&self) -> bool {
        self.triangle_count > 0
            && self.boundary_edge_count == 0
            && self.non_manifold_edge_count == 0
            && self.inconsistent_edge_count == 0
            && self.degenerate_triangle_count == 0
            && self.volume > 0.0
    }

    fn first_error(&self) -> Option<MeshError> {
        if self.triangle_count == 0 {
            Some(MeshError::Empty)
        } else if self.degenerate_triangle_count > 0 {
            Some(MeshError::DegenerateTriangles(self.degenerate_triangle_count))
        } else if self.boundary_edge_count > 0 {
            Some(MeshError::BoundaryEdges(self.boundary_edge_count))
        } else if self.non_manifold_edge_count > 0 {
            Some(MeshError::NonManifoldEdges(self.non_manifold_edge_count))
        } else if self.inconsistent_edge_count > 0 {
            Some(MeshError::InconsistentWinding(self.inconsistent_edge_count))
        } else if self.volume <= 0.0 {
            Some(MeshError::NonPositiveVolume(self.volume))
        } else {
            None
        }
    }
}

impl fmt::Display for MeshReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vertices, {} triangles, {} edges, volume {:.4}",
            self.vertex_count, self.triangle_count, self.edge_count, self.volume
        )?;
        if self.boundary_edge_count > 0 {
            write!(f, ", {} boundary", self.boundary_edge_count)?;
        }
        if self.non_manifold_edge_count > 0 {
            write!(f, ", {} non-manifold", self.non_manifold_edge_count)?;
        }
        if self.inconsistent_edge_count > 0 {
            write!(f, ", {} mis-wound", self.inconsistent_edge_count)?;
        }
        if self.degenerate_triangle_count > 0 {
            write!(f, ", {} degenerate", self.degenerate_triangle_count)?;
        }
        Ok(())
    }
}

impl SolidMesh {
    /// Check that the mesh bounds a solid.
    ///
    /// Returns the report on success so callers can log volumes without a
    /// second pass.
    pub fn validate(&self) -> Result<MeshReport, MeshError> {
        let n = self.positions.len() as u32;
        for (i, tri) in self.triangles.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&v| v >= n) {
                return Err(MeshError::IndexOutOfRange { triangle: i, index });
            }
        }
        let report = MeshReport::of(self);
        match report.first_error() {
            Some(err) => Err(err),
            None => Ok(report),
        }
    }
}
