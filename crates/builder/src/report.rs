//! Manifoldness summary of an indexed triangle list.
//!
//! Advisory only: open or non-manifold meshes are still simplified, the
//! safety check just never collapses the affected edges.

use std::collections::HashMap;
use std::fmt;

use lod_simplify::Mesh;
use tracing::{info, warn};

/// Undirected edge usage counts of a triangle list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ManifoldReport {
    pub vertices: usize,
    pub triangles: usize,
    pub edges: usize,
    /// Edges used by exactly one triangle
    pub boundary_edges: usize,
    /// Edges used by more than two triangles
    pub non_manifold_edges: usize,
}

impl ManifoldReport {
    pub fn analyze(mesh: &Mesh) -> Self {
        let mut counts: HashMap<(u32, u32), u32> = HashMap::new();
        for tri in mesh.triangles() {
            for k in 0..3 {
                let (a, b) = (tri[k], tri[(k + 1) % 3]);
                *counts.entry((a.min(b), a.max(b))).or_default() += 1;
            }
        }

        Self {
            vertices: mesh.vertices.len(),
            triangles: mesh.triangle_count(),
            edges: counts.len(),
            boundary_edges: counts.values().filter(|&&c| c == 1).count(),
            non_manifold_edges: counts.values().filter(|&&c| c > 2).count(),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.boundary_edges == 0
    }

    pub fn is_two_manifold(&self) -> bool {
        self.non_manifold_edges == 0
    }

    /// Closed and two-manifold
    pub fn is_watertight(&self) -> bool {
        self.is_closed() && self.is_two_manifold()
    }

    /// Emit the summary through tracing
    pub fn log(&self, name: &str) {
        if self.is_watertight() {
            info!("{}: {}", name, self);
        } else {
            warn!("{}: {}", name, self);
        }
    }
}

impl fmt::Display for ManifoldReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} vertices, {} triangles, {} edges",
            self.vertices, self.triangles, self.edges
        )?;
        if self.is_watertight() {
            return write!(f, ", closed manifold");
        }
        if self.boundary_edges > 0 {
            write!(f, ", {} open edges", self.boundary_edges)?;
        }
        if self.non_manifold_edges > 0 {
            write!(f, ", {} non-manifold edges", self.non_manifold_edges)?;
        }
        Ok(())
    }
}
