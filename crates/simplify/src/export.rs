//! Flatten the live faces of a half-edge mesh into a vertex/index mesh.

use std::collections::HashMap;

use tracing::debug;

use crate::half_edge::{HalfEdgeMesh, Vertex, VertexId};
use crate::mesh::{Mesh, MeshVertex};

fn mesh_vertex(v: &Vertex) -> MeshVertex {
    MeshVertex::new(v.position, v.normal, v.uv)
}

/// Export over the full vertex array.
///
/// Removed vertices keep their slots so indices equal vertex ids; only
/// live faces are written, in face order.
pub fn export(mesh: &HalfEdgeMesh) -> Mesh {
    let vertices = mesh.vertices().iter().map(mesh_vertex).collect();
    let indices = mesh
        .live_faces()
        .flat_map(|face| mesh.face_vertices(face.id))
        .map(|v| v.0)
        .collect();

    Mesh::new(vertices, indices)
}

/// Export with removed vertices dropped and indices remapped.
pub fn export_compact(mesh: &HalfEdgeMesh) -> Mesh {
    let mut remap: HashMap<VertexId, u32> = HashMap::new();
    let mut vertices = Vec::with_capacity(mesh.vertex_count());
    for v in mesh.live_vertices() {
        remap.insert(v.id, vertices.len() as u32);
        vertices.push(mesh_vertex(v));
    }

    let indices: Vec<u32> = mesh
        .live_faces()
        .flat_map(|face| mesh.face_vertices(face.id))
        .filter_map(|v| remap.get(&v).copied())
        .collect();

    debug!(
        "export_compact: {} of {} vertex slots kept, {} triangles",
        vertices.len(),
        mesh.vertices().len(),
        indices.len() / 3
    );
    Mesh::new(vertices, indices)
}

impl HalfEdgeMesh {
    /// Flatten to a [`Mesh`] over the full vertex array
    pub fn to_mesh(&self) -> Mesh {
        export(self)
    }
}
