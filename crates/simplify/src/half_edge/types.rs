//! Type definitions for the half-edge mesh data structure.

use glam::{Vec2, Vec3};

use crate::quadric::Quadric;

/// Type-safe vertex identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(pub u32);

/// Type-safe half-edge identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HalfEdgeId(pub u32);

/// Type-safe face identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FaceId(pub u32);

/// Directed edge key: (origin, destination)
pub type EdgeKey = (VertexId, VertexId);

/// A vertex in the half-edge mesh
#[derive(Debug, Clone)]
pub struct Vertex {
    pub id: VertexId,
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
    /// Error quadric: sum of the plane quadrics of the incident faces
    pub quadric: Quadric,
    /// Anchor for one-ring walks.
    ///
    /// On a boundary vertex this is the first half-edge of its fan (the one
    /// whose `prev` has no twin), so a forward `twin.next` walk from here
    /// visits every incident face before hitting the boundary.
    pub outgoing_half_edge: Option<HalfEdgeId>,
    /// Live half-edges leaving this vertex, across every fan
    pub outgoing_count: usize,
    /// Merged away by a collapse. The slot is never reused.
    pub removed: bool,
}

/// A half-edge in the mesh
///
/// Each interior edge is represented by two half-edges pointing in opposite
/// directions. Half-edges store connectivity information for traversing the mesh.
#[derive(Debug, Clone)]
pub struct HalfEdge {
    pub id: HalfEdgeId,
    /// The vertex this half-edge originates from
    pub origin: VertexId,
    /// The opposite half-edge (None for boundary edges)
    pub twin: Option<HalfEdgeId>,
    /// The next half-edge around the face
    pub next: HalfEdgeId,
    /// The previous half-edge around the face
    pub prev: HalfEdgeId,
    /// The face this half-edge borders (None once removed by a collapse)
    pub face: Option<FaceId>,
    /// Cost of collapsing the origin onto the destination
    pub cost: f32,
}

impl HalfEdge {
    /// Whether this half-edge still belongs to a face
    pub fn is_live(&self) -> bool {
        self.face.is_some()
    }
}

/// A triangle in the mesh
#[derive(Debug, Clone)]
pub struct Face {
    pub id: FaceId,
    /// One half-edge on the boundary of this face
    pub half_edge: HalfEdgeId,
    /// Removed by a collapse
    pub removed: bool,
}

/// Errors that can occur during half-edge mesh operations
#[derive(Debug, thiserror::Error)]
pub enum HalfEdgeError {
    #[error("Index count {0} not divisible by 3")]
    IndexCount(usize),
    #[error("Triangle {triangle} references vertex {index} but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },
    #[error("Triangle {triangle} repeats vertex {index}")]
    DegenerateTriangle { triangle: usize, index: u32 },
    #[error("Invalid mesh topology: {0}")]
    InvalidTopology(String),
}
