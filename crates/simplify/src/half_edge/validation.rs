//! Validation methods for HalfEdgeMesh.
//!
//! `validate` checks the structural invariants that every collapse must
//! preserve. `check_manifold` is stricter and reports input that the
//! safety checker will refuse to touch.

use std::collections::HashMap;

use super::types::{HalfEdgeError, HalfEdgeId, VertexId};
use super::HalfEdgeMesh;

impl HalfEdgeMesh {
    /// Validate the mesh topology.
    ///
    /// Checks, for live elements only:
    /// 1. Every face is a 3-cycle with consistent `next`/`prev`
    /// 2. Twins are symmetric, live and point the opposite way
    /// 3. No live half-edge starts at a removed vertex
    /// 4. Every registry entry points at a live half-edge with that key
    /// 5. Vertex anchors are live and leave their vertex
    /// 6. Each vertex's `outgoing_count` matches its live outgoing half-edges
    ///
    /// Orphaned half-edges (face = None) are skipped.
    pub fn validate(&self) -> Result<(), HalfEdgeError> {
        for face in self.live_faces() {
            let mut current = face.half_edge;
            for _ in 0..3 {
                let he = self.half_edge(current).ok_or_else(|| {
                    HalfEdgeError::InvalidTopology(format!(
                        "Face {:?}: missing half-edge {:?}",
                        face.id, current
                    ))
                })?;
                if he.face != Some(face.id) {
                    return Err(HalfEdgeError::InvalidTopology(format!(
                        "Face {:?}: half-edge {:?} belongs to {:?}",
                        face.id, he.id, he.face
                    )));
                }
                current = he.next;
            }
            if current != face.half_edge {
                return Err(HalfEdgeError::InvalidTopology(format!(
                    "Face {:?}: next cycle is not of length 3",
                    face.id
                )));
            }
        }

        for he in self.live_half_edges() {
            let face_removed = he
                .face
                .and_then(|f| self.face(f))
                .map(|f| f.removed)
                .unwrap_or(true);
            if face_removed {
                return Err(HalfEdgeError::InvalidTopology(format!(
                    "Half-edge {:?}: references removed face {:?}",
                    he.id, he.face
                )));
            }

            let prev_next = self.half_edge(he.prev).map(|p| p.next);
            let next_prev = self.half_edge(he.next).map(|n| n.prev);
            if prev_next != Some(he.id) || next_prev != Some(he.id) {
                return Err(HalfEdgeError::InvalidTopology(format!(
                    "Half-edge {:?}: prev.next = {:?}, next.prev = {:?}",
                    he.id, prev_next, next_prev
                )));
            }

            if self.vertex(he.origin).map(|v| v.removed).unwrap_or(true) {
                return Err(HalfEdgeError::InvalidTopology(format!(
                    "Half-edge {:?}: origin {:?} is removed",
                    he.id, he.origin
                )));
            }

            if let Some(twin_id) = he.twin {
                let twin = self
                    .half_edge(twin_id)
                    .filter(|t| t.is_live())
                    .ok_or_else(|| {
                        HalfEdgeError::InvalidTopology(format!(
                            "Half-edge {:?}: twin {:?} is not live",
                            he.id, twin_id
                        ))
                    })?;
                if twin.twin != Some(he.id) {
                    return Err(HalfEdgeError::InvalidTopology(format!(
                        "Half-edge {:?}: twin.twin = {:?}, expected Some({:?})",
                        he.id, twin.twin, he.id
                    )));
                }
                if self.destination(he.id) != Some(twin.origin) {
                    return Err(HalfEdgeError::InvalidTopology(format!(
                        "Half-edge {:?}: twin {:?} does not run the opposite way",
                        he.id, twin_id
                    )));
                }
            }
        }

        for (&key, &he_id) in &self.edge_map {
            let live = self.half_edge(he_id).map(|he| he.is_live()).unwrap_or(false);
            if !live {
                return Err(HalfEdgeError::InvalidTopology(format!(
                    "Registry key {:?}: points at dead half-edge {:?}",
                    key, he_id
                )));
            }
            if self.edge_key(he_id) != Some(key) {
                return Err(HalfEdgeError::InvalidTopology(format!(
                    "Registry key {:?}: half-edge {:?} now has key {:?}",
                    key,
                    he_id,
                    self.edge_key(he_id)
                )));
            }
        }

        let mut outgoing = vec![0usize; self.vertices.len()];
        for he in self.live_half_edges() {
            outgoing[he.origin.0 as usize] += 1;
        }

        for vertex in self.live_vertices() {
            let counted = outgoing[vertex.id.0 as usize];
            if vertex.outgoing_count != counted {
                return Err(HalfEdgeError::InvalidTopology(format!(
                    "Vertex {:?}: outgoing_count {} but {} live outgoing half-edges",
                    vertex.id, vertex.outgoing_count, counted
                )));
            }
            if let Some(anchor) = vertex.outgoing_half_edge {
                let ok = self
                    .half_edge(anchor)
                    .map(|he| he.is_live() && he.origin == vertex.id)
                    .unwrap_or(false);
                if !ok {
                    return Err(HalfEdgeError::InvalidTopology(format!(
                        "Vertex {:?}: anchor {:?} is dead or leaves another vertex",
                        vertex.id, anchor
                    )));
                }
            }
        }

        Ok(())
    }

    // =========================================================================
    // Manifold Validation
    // =========================================================================

    /// Check if the mesh is an oriented 2-manifold (boundaries allowed).
    ///
    /// Fails when a directed edge is produced by more than one face (it stays
    /// out of the registry), or when the faces around a vertex do not form a
    /// single fan reachable from its anchor.
    pub fn check_manifold(&self) -> Result<(), ManifoldError> {
        for he in self.live_half_edges() {
            let key = self.edge_key(he.id);
            let registered = key.and_then(|k| self.edge_map.get(&k)).copied();
            if registered != Some(he.id) {
                return Err(ManifoldError::NonManifoldEdge {
                    edge_id: he.id,
                    reason: format!("directed edge {:?} is produced by another face", key),
                });
            }
        }

        let mut outgoing: HashMap<VertexId, usize> = HashMap::new();
        for he in self.live_half_edges() {
            *outgoing.entry(he.origin).or_default() += 1;
        }

        for vertex in self.live_vertices() {
            let total = outgoing.get(&vertex.id).copied().unwrap_or(0);
            if total == 0 {
                continue; // Isolated vertex
            }
            let ring = self.vertex_ring(vertex.id);
            if ring.half_edges.len() != total {
                return Err(ManifoldError::NonManifoldVertex {
                    vertex_id: vertex.id,
                    ring_half_edges: ring.half_edges.len(),
                    outgoing: total,
                });
            }
        }

        Ok(())
    }
}

/// Error types for manifold validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ManifoldError {
    /// A directed edge appears in more than one face
    NonManifoldEdge { edge_id: HalfEdgeId, reason: String },
    /// The anchor fan does not reach every outgoing half-edge
    NonManifoldVertex {
        vertex_id: VertexId,
        ring_half_edges: usize,
        outgoing: usize,
    },
}

impl std::fmt::Display for ManifoldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonManifoldEdge { edge_id, reason } => {
                write!(f, "Non-manifold edge {:?}: {}", edge_id, reason)
            }
            Self::NonManifoldVertex {
                vertex_id,
                ring_half_edges,
                outgoing,
            } => write!(
                f,
                "Non-manifold vertex {:?}: ring reaches {} of {} outgoing half-edges",
                vertex_id, ring_half_edges, outgoing
            ),
        }
    }
}

impl std::error::Error for ManifoldError {}
