//! Half-edge mesh data structure for edge-collapse simplification
//!
//! Vertices, half-edges and faces live in arenas addressed by typed handles.
//! Collapses tombstone records instead of freeing them, so a handle never
//! dangles and never gets reused. The `(origin, destination)` registry is a
//! pure lookup index over the live half-edges.

mod construction;
mod modification;
mod topology;
mod types;
mod validation;

use std::collections::HashMap;

pub use modification::{CollapseRecord, DirtyEdges};
pub use topology::OneRing;
pub use types::{EdgeKey, Face, FaceId, HalfEdge, HalfEdgeError, HalfEdgeId, Vertex, VertexId};
pub use validation::ManifoldError;

/// Half-edge mesh data structure
///
/// Triangles only: every live face owns exactly three half-edges.
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) half_edges: Vec<HalfEdge>,
    pub(crate) faces: Vec<Face>,
    /// Map from (origin, destination) vertex pair to half-edge
    pub(crate) edge_map: HashMap<EdgeKey, HalfEdgeId>,
}
