//! Construction methods for HalfEdgeMesh.

use std::collections::HashMap;

use glam::{Vec2, Vec3};
use tracing::{debug, warn};

use super::types::{EdgeKey, Face, FaceId, HalfEdge, HalfEdgeError, HalfEdgeId, Vertex, VertexId};
use super::HalfEdgeMesh;
use crate::mesh::{Mesh, MeshVertex};
use crate::quadric::Quadric;

impl HalfEdgeMesh {
    /// Build a half-edge mesh from a flat mesh.
    pub fn from_mesh(mesh: &Mesh) -> Result<Self, HalfEdgeError> {
        Self::from_triangles(&mesh.vertices, &mesh.indices)
    }

    /// Build a half-edge mesh from a vertex array and a triangle index list.
    ///
    /// The input is expected to be welded already. Only structural problems
    /// are rejected (ragged index list, out-of-range or repeated indices).
    /// Non-manifold input is accepted: a directed edge produced by a second
    /// triangle stays unregistered and twinless, so the safety check never
    /// lets a collapse touch it.
    pub fn from_triangles(
        vertices: &[MeshVertex],
        indices: &[u32],
    ) -> Result<Self, HalfEdgeError> {
        if indices.len() % 3 != 0 {
            return Err(HalfEdgeError::IndexCount(indices.len()));
        }

        for (triangle, tri) in indices.chunks_exact(3).enumerate() {
            for &index in tri {
                if index as usize >= vertices.len() {
                    return Err(HalfEdgeError::IndexOutOfRange {
                        triangle,
                        index,
                        vertex_count: vertices.len(),
                    });
                }
            }
            if tri[0] == tri[1] || tri[0] == tri[2] {
                return Err(HalfEdgeError::DegenerateTriangle { triangle, index: tri[0] });
            }
            if tri[1] == tri[2] {
                return Err(HalfEdgeError::DegenerateTriangle { triangle, index: tri[1] });
            }
        }

        let mut vertices: Vec<Vertex> = vertices
            .iter()
            .enumerate()
            .map(|(i, v)| Vertex {
                id: VertexId(i as u32),
                position: Vec3::from_array(v.position),
                normal: Vec3::from_array(v.normal),
                uv: Vec2::from_array(v.uv),
                quadric: Quadric::ZERO,
                outgoing_half_edge: None,
                outgoing_count: 0,
                removed: false,
            })
            .collect();

        let num_triangles = indices.len() / 3;
        let mut half_edges: Vec<HalfEdge> = Vec::with_capacity(num_triangles * 3);
        let mut faces: Vec<Face> = Vec::with_capacity(num_triangles);
        let mut edge_map: HashMap<EdgeKey, HalfEdgeId> = HashMap::with_capacity(num_triangles * 3);
        let mut duplicate_keys = 0usize;

        for tri in indices.chunks_exact(3) {
            let v0 = VertexId(tri[0]);
            let v1 = VertexId(tri[1]);
            let v2 = VertexId(tri[2]);

            let face_id = FaceId(faces.len() as u32);

            // Three half-edges in a 3-cycle: v0 -> v1 -> v2 -> v0
            let he0_id = HalfEdgeId(half_edges.len() as u32);
            let he1_id = HalfEdgeId(half_edges.len() as u32 + 1);
            let he2_id = HalfEdgeId(half_edges.len() as u32 + 2);

            for (id, origin, next, prev) in [
                (he0_id, v0, he1_id, he2_id),
                (he1_id, v1, he2_id, he0_id),
                (he2_id, v2, he0_id, he1_id),
            ] {
                half_edges.push(HalfEdge {
                    id,
                    origin,
                    twin: None,
                    next,
                    prev,
                    face: Some(face_id),
                    cost: 0.0,
                });
            }

            // Register and resolve twins against the reverse key
            for (he_id, key) in [
                (he0_id, (v0, v1)),
                (he1_id, (v1, v2)),
                (he2_id, (v2, v0)),
            ] {
                if edge_map.contains_key(&key) {
                    duplicate_keys += 1;
                    continue;
                }
                edge_map.insert(key, he_id);

                if let Some(&twin_id) = edge_map.get(&(key.1, key.0)) {
                    if half_edges[twin_id.0 as usize].twin.is_none() {
                        half_edges[he_id.0 as usize].twin = Some(twin_id);
                        half_edges[twin_id.0 as usize].twin = Some(he_id);
                    }
                }
            }

            faces.push(Face {
                id: face_id,
                half_edge: he0_id,
                removed: false,
            });
        }

        if duplicate_keys > 0 {
            warn!(
                "from_triangles: {} directed edges produced by more than one triangle \
                 (non-manifold or inconsistently wound input)",
                duplicate_keys
            );
        }

        // Anchor every vertex on an outgoing half-edge, preferring the start
        // of a boundary fan so ring walks cover the whole fan.
        for he in &half_edges {
            let vertex = &mut vertices[he.origin.0 as usize];
            vertex.outgoing_count += 1;
            if vertex.outgoing_half_edge.is_none() {
                vertex.outgoing_half_edge = Some(he.id);
            }
        }
        for he in &half_edges {
            if half_edges[he.prev.0 as usize].twin.is_none() {
                vertices[he.origin.0 as usize].outgoing_half_edge = Some(he.id);
            }
        }

        debug!(
            "from_triangles: {} vertices, {} faces, {} half-edges, {} registered",
            vertices.len(),
            faces.len(),
            half_edges.len(),
            edge_map.len()
        );

        Ok(Self {
            vertices,
            half_edges,
            faces,
            edge_map,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_meshes;

    #[test]
    fn test_rejects_ragged_indices() {
        let mesh = test_meshes::triangle();
        let result = HalfEdgeMesh::from_triangles(&mesh.vertices, &[0, 1]);
        assert!(matches!(result, Err(HalfEdgeError::IndexCount(2))));
    }

    #[test]
    fn test_rejects_out_of_range_index() {
        let mesh = test_meshes::triangle();
        let result = HalfEdgeMesh::from_triangles(&mesh.vertices, &[0, 1, 7]);
        assert!(matches!(
            result,
            Err(HalfEdgeError::IndexOutOfRange { index: 7, .. })
        ));
    }

    #[test]
    fn test_rejects_repeated_vertex() {
        let mesh = test_meshes::triangle();
        let result = HalfEdgeMesh::from_triangles(&mesh.vertices, &[0, 1, 1]);
        assert!(matches!(
            result,
            Err(HalfEdgeError::DegenerateTriangle { triangle: 0, index: 1 })
        ));
    }

    #[test]
    fn test_twins_resolved_across_shared_edge() {
        let mesh = HalfEdgeMesh::from_mesh(&test_meshes::quad()).unwrap();

        // Quad (0,1,2) + (0,2,3): only the diagonal 0-2 is interior
        let forward = mesh.find_half_edge(VertexId(2), VertexId(0)).unwrap();
        let backward = mesh.find_half_edge(VertexId(0), VertexId(2)).unwrap();
        assert_eq!(mesh.half_edge(forward).unwrap().twin, Some(backward));
        assert_eq!(mesh.half_edge(backward).unwrap().twin, Some(forward));

        let boundary = mesh
            .live_half_edges()
            .filter(|he| he.twin.is_none())
            .count();
        assert_eq!(boundary, 4);
    }

    #[test]
    fn test_boundary_vertex_anchored_on_fan_start() {
        let mesh = HalfEdgeMesh::from_mesh(&test_meshes::quad()).unwrap();

        for vertex in mesh.live_vertices() {
            let anchor = vertex.outgoing_half_edge.unwrap();
            let he = mesh.half_edge(anchor).unwrap();
            assert_eq!(he.origin, vertex.id);
            assert!(mesh.half_edge(he.prev).unwrap().twin.is_none());
        }
    }

    #[test]
    fn test_duplicate_directed_edge_left_unregistered() {
        // Three triangles on edge 0-1, two of them with the same winding
        let mesh = test_meshes::fin();
        let he_mesh = HalfEdgeMesh::from_mesh(&mesh).unwrap();

        assert_eq!(he_mesh.face_count(), 3);
        assert_eq!(he_mesh.half_edge_count(), 9);
        assert_eq!(he_mesh.edge_map.len(), 8);
        assert!(he_mesh.validate().is_ok());
        assert!(he_mesh.check_manifold().is_err());
    }
}
