//! Quadric error metric
//!
//! Every vertex carries the sum of the plane quadrics of its incident faces.
//! The cost of a directed half-edge `v1 -> v2` is that sum over both
//! endpoints, evaluated at the existing position of `v2`:
//!
//! ```text
//! cost(v1 -> v2) = [p2, 1]ᵀ (Q1 + Q2) [p2, 1]
//! ```
//!
//! The twin `v2 -> v1` evaluates the same sum at `p1`, so the two directions
//! generally differ and are cached separately. No optimal merged position is
//! solved for.

use std::collections::HashSet;
use std::ops::{Add, AddAssign};

use glam::{Mat4, Vec3, Vec4};
use tracing::debug;

use crate::half_edge::{DirtyEdges, FaceId, HalfEdgeId, HalfEdgeMesh, VertexId};

/// Symmetric 4x4 accumulator of squared plane distances
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadric(pub Mat4);

impl Quadric {
    pub const ZERO: Self = Self(Mat4::ZERO);

    /// Outer product `p pᵀ` of a plane `(n, -n·p0)`
    pub fn from_plane(plane: Vec4) -> Self {
        Self(Mat4::from_cols(
            plane * plane.x,
            plane * plane.y,
            plane * plane.z,
            plane * plane.w,
        ))
    }

    /// Sum of squared distances from `position` to the accumulated planes
    pub fn evaluate(&self, position: Vec3) -> f32 {
        let v = position.extend(1.0);
        v.dot(self.0 * v)
    }
}

impl Default for Quadric {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for Quadric {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Quadric {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

/// Plane through a triangle as `(n, -n·a)`, oriented by the winding.
///
/// A degenerate triangle yields a zero normal and contributes nothing.
pub fn face_plane(a: Vec3, b: Vec3, c: Vec3) -> Vec4 {
    let normal = (b - a).cross(c - a).normalize_or_zero();
    normal.extend(-normal.dot(a))
}

/// Plane quadric of one face
pub fn face_quadric(mesh: &HalfEdgeMesh, face_id: FaceId) -> Quadric {
    let positions: Vec<Vec3> = mesh
        .face_vertices(face_id)
        .into_iter()
        .filter_map(|v| mesh.vertex(v).map(|v| v.position))
        .collect();
    match positions.as_slice() {
        [a, b, c] => Quadric::from_plane(face_plane(*a, *b, *c)),
        _ => Quadric::ZERO,
    }
}

/// Sum the face quadrics around a vertex, walking its anchor fan.
///
/// The walk stops after the first face whose outgoing half-edge has no
/// twin, so a vertex with more than one fan only sees the anchor's fan.
pub fn vertex_quadric(mesh: &HalfEdgeMesh, vertex_id: VertexId) -> Quadric {
    mesh.vertex_ring(vertex_id)
        .half_edges
        .into_iter()
        .filter_map(|he_id| mesh.half_edge(he_id).and_then(|he| he.face))
        .fold(Quadric::ZERO, |acc, face_id| acc + face_quadric(mesh, face_id))
}

/// Cost of collapsing the origin of `he_id` onto its destination
pub fn collapse_cost(mesh: &HalfEdgeMesh, he_id: HalfEdgeId) -> Option<f32> {
    let he = mesh.half_edge(he_id)?;
    let v1 = mesh.vertex(he.origin)?;
    let v2 = mesh.vertex(mesh.destination(he_id)?)?;
    Some((v1.quadric + v2.quadric).evaluate(v2.position))
}

/// Refresh the cached cost of a half-edge and its twin
fn refresh_costs(mesh: &mut HalfEdgeMesh, he_id: HalfEdgeId) {
    let twin = mesh.half_edge(he_id).and_then(|he| he.twin);
    for id in std::iter::once(he_id).chain(twin) {
        if let Some(cost) = collapse_cost(mesh, id) {
            mesh.half_edges[id.0 as usize].cost = cost;
        }
    }
}

/// Full pass: quadric of every vertex reached by a live face, then the cost
/// of every live half-edge and its twin.
pub fn initialize(mesh: &mut HalfEdgeMesh) {
    let mut visited = vec![false; mesh.vertices.len()];
    let faces: Vec<FaceId> = mesh.live_faces().map(|f| f.id).collect();
    let mut costed = 0usize;

    for face_id in faces {
        for he_id in mesh.face_half_edges(face_id) {
            let endpoints = mesh.edge_key(he_id);
            if let Some((origin, dest)) = endpoints {
                for v in [origin, dest] {
                    if !visited[v.0 as usize] {
                        visited[v.0 as usize] = true;
                        let quadric = vertex_quadric(mesh, v);
                        mesh.vertices[v.0 as usize].quadric = quadric;
                    }
                }
            }
            refresh_costs(mesh, he_id);
            costed += 1;
        }
    }

    debug!(
        "quadric::initialize: {} vertex quadrics, {} half-edges costed",
        visited.iter().filter(|v| **v).count(),
        costed
    );
}

/// Incremental pass over the half-edges a collapse invalidated.
///
/// For each dirty half-edge the quadric of its origin is rebuilt from the
/// current ring (once per vertex), then the half-edge and its twin are
/// re-costed. Nothing outside the dirty set is touched.
pub fn update(mesh: &mut HalfEdgeMesh, dirty: DirtyEdges) {
    let mut visited: HashSet<VertexId> = HashSet::new();
    let count = dirty.len();

    for he_id in dirty {
        let origin = match mesh.half_edge(he_id).filter(|he| he.is_live()) {
            Some(he) => he.origin,
            None => continue,
        };
        if visited.insert(origin) {
            let quadric = vertex_quadric(mesh, origin);
            mesh.vertices[origin.0 as usize].quadric = quadric;
        }
        refresh_costs(mesh, he_id);
    }

    debug!(
        "quadric::update: {} dirty half-edges, {} vertex quadrics rebuilt",
        count,
        visited.len()
    );
}
