//! Topology query methods for HalfEdgeMesh.

use std::collections::HashSet;

use super::types::{EdgeKey, Face, FaceId, HalfEdge, HalfEdgeId, Vertex, VertexId};
use super::HalfEdgeMesh;

/// Outgoing half-edges around a vertex, in `twin.next` order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OneRing {
    pub half_edges: Vec<HalfEdgeId>,
    /// True when the walk returned to its start; false when it hit a
    /// half-edge without a twin (boundary or unpaired non-manifold edge)
    pub closed: bool,
}

impl HalfEdgeMesh {
    // ========================================================================
    // Accessors
    // ========================================================================

    /// Get vertex by ID
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.0 as usize)
    }

    /// Get half-edge by ID
    pub fn half_edge(&self, id: HalfEdgeId) -> Option<&HalfEdge> {
        self.half_edges.get(id.0 as usize)
    }

    /// Get face by ID
    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(id.0 as usize)
    }

    /// All vertex slots, including removed ones
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// All half-edge slots, including orphaned ones
    pub fn half_edges(&self) -> &[HalfEdge] {
        &self.half_edges
    }

    /// All face slots, including removed ones
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    pub fn live_vertices(&self) -> impl Iterator<Item = &Vertex> + '_ {
        self.vertices.iter().filter(|v| !v.removed)
    }

    pub fn live_half_edges(&self) -> impl Iterator<Item = &HalfEdge> + '_ {
        self.half_edges.iter().filter(|he| he.is_live())
    }

    pub fn live_faces(&self) -> impl Iterator<Item = &Face> + '_ {
        self.faces.iter().filter(|f| !f.removed)
    }

    /// Number of live vertices
    pub fn vertex_count(&self) -> usize {
        self.live_vertices().count()
    }

    /// Number of live faces
    pub fn face_count(&self) -> usize {
        self.live_faces().count()
    }

    /// Number of live half-edges
    pub fn half_edge_count(&self) -> usize {
        self.live_half_edges().count()
    }

    /// The directed-key registry, `(origin, destination) -> half-edge`
    pub fn edge_map(&self) -> &std::collections::HashMap<EdgeKey, HalfEdgeId> {
        &self.edge_map
    }

    // ========================================================================
    // Topology Queries
    // ========================================================================

    /// Destination vertex of a half-edge (origin of its `next`)
    pub fn destination(&self, he_id: HalfEdgeId) -> Option<VertexId> {
        let he = self.half_edge(he_id)?;
        self.half_edge(he.next).map(|next| next.origin)
    }

    /// Directed key `(origin, destination)` of a half-edge
    pub fn edge_key(&self, he_id: HalfEdgeId) -> Option<EdgeKey> {
        let he = self.half_edge(he_id)?;
        Some((he.origin, self.destination(he_id)?))
    }

    /// Find the registered half-edge from `from` to `to`
    pub fn find_half_edge(&self, from: VertexId, to: VertexId) -> Option<HalfEdgeId> {
        self.edge_map.get(&(from, to)).copied()
    }

    /// The three half-edges of a face, starting at its bounding half-edge
    pub fn face_half_edges(&self, face_id: FaceId) -> Vec<HalfEdgeId> {
        let face = match self.face(face_id) {
            Some(f) => f,
            None => return Vec::new(),
        };

        let first = face.half_edge;
        let mut result = vec![first];
        let mut current = first;
        for _ in 0..2 {
            match self.half_edge(current) {
                Some(he) => {
                    current = he.next;
                    result.push(current);
                }
                None => break,
            }
        }
        result
    }

    /// The three vertices of a face, in winding order
    pub fn face_vertices(&self, face_id: FaceId) -> Vec<VertexId> {
        self.face_half_edges(face_id)
            .into_iter()
            .filter_map(|he_id| self.half_edge(he_id).map(|he| he.origin))
            .collect()
    }

    /// Walk the outgoing half-edges of `start.origin` via `twin.next`.
    ///
    /// Stops after recording the first half-edge without a twin; in that
    /// case the ring is reported open.
    pub fn one_ring(&self, start: HalfEdgeId) -> OneRing {
        let mut ring = OneRing::default();
        let mut current = start;

        loop {
            let he = match self.half_edge(current) {
                Some(he) if he.is_live() => he,
                _ => return ring,
            };
            ring.half_edges.push(current);

            let twin = match he.twin.and_then(|t| self.half_edge(t)) {
                Some(t) => t,
                None => return ring,
            };

            current = twin.next;
            if current == start {
                ring.closed = true;
                return ring;
            }

            // A corrupt next/twin cycle must not spin forever
            if ring.half_edges.len() > self.half_edges.len() {
                tracing::error!("one_ring: walk from {:?} did not terminate", start);
                return ring;
            }
        }
    }

    /// One-ring of a vertex, starting at its anchor half-edge
    pub fn vertex_ring(&self, vertex_id: VertexId) -> OneRing {
        match self.vertex(vertex_id).and_then(|v| v.outgoing_half_edge) {
            Some(start) => self.one_ring(start),
            None => OneRing::default(),
        }
    }

    /// Distinct neighbour vertices reachable from the vertex's anchor fan
    pub fn adjacent_vertices(&self, vertex_id: VertexId) -> Vec<VertexId> {
        let mut seen = HashSet::new();
        self.vertex_ring(vertex_id)
            .half_edges
            .into_iter()
            .filter_map(|he_id| self.destination(he_id))
            .filter(|v| seen.insert(*v))
            .collect()
    }

    /// Check if a half-edge lies on the boundary
    pub fn is_boundary_edge(&self, he_id: HalfEdgeId) -> bool {
        self.half_edge(he_id)
            .map(|he| he.twin.is_none())
            .unwrap_or(true)
    }

    /// Check if a vertex has an open one-ring
    pub fn is_boundary_vertex(&self, vertex_id: VertexId) -> bool {
        !self.vertex_ring(vertex_id).closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_meshes;

    #[test]
    fn test_destination_and_key() {
        let mesh = HalfEdgeMesh::from_mesh(&test_meshes::triangle()).unwrap();

        assert_eq!(mesh.destination(HalfEdgeId(0)), Some(VertexId(1)));
        assert_eq!(mesh.edge_key(HalfEdgeId(2)), Some((VertexId(2), VertexId(0))));
        assert_eq!(mesh.find_half_edge(VertexId(1), VertexId(2)), Some(HalfEdgeId(1)));
        assert_eq!(mesh.find_half_edge(VertexId(2), VertexId(1)), None);
    }

    #[test]
    fn test_one_ring_closed_on_tetrahedron() {
        let mesh = HalfEdgeMesh::from_mesh(&test_meshes::tetrahedron()).unwrap();

        for vertex in mesh.live_vertices() {
            let ring = mesh.vertex_ring(vertex.id);
            assert!(ring.closed);
            assert_eq!(ring.half_edges.len(), 3);
            for he_id in &ring.half_edges {
                assert_eq!(mesh.half_edge(*he_id).unwrap().origin, vertex.id);
            }
        }
    }

    #[test]
    fn test_one_ring_open_on_quad() {
        let mesh = HalfEdgeMesh::from_mesh(&test_meshes::quad()).unwrap();

        let ring = mesh.vertex_ring(VertexId(0));
        assert!(!ring.closed);
        assert_eq!(ring.half_edges.len(), 2);
        assert!(mesh.is_boundary_vertex(VertexId(0)));

        let mut neighbours = mesh.adjacent_vertices(VertexId(0));
        neighbours.sort();
        assert_eq!(neighbours, vec![VertexId(1), VertexId(2)]);
    }

    #[test]
    fn test_adjacent_vertices_icosahedron() {
        let mesh = HalfEdgeMesh::from_mesh(&test_meshes::icosahedron()).unwrap();

        for vertex in mesh.live_vertices() {
            assert_eq!(mesh.adjacent_vertices(vertex.id).len(), 5);
            assert!(!mesh.is_boundary_vertex(vertex.id));
        }
    }

    #[test]
    fn test_face_vertices_follow_winding() {
        let mesh = HalfEdgeMesh::from_mesh(&test_meshes::tetrahedron()).unwrap();

        assert_eq!(
            mesh.face_vertices(FaceId(3)),
            vec![VertexId(1), VertexId(2), VertexId(3)]
        );
        assert_eq!(mesh.face_half_edges(FaceId(1)).len(), 3);
    }
}
