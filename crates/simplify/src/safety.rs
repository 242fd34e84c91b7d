//! Collapse safety check
//!
//! An interior edge `v1 -> v2` may only be collapsed when both endpoint rings
//! are closed and the rings share exactly two vertices: the apexes of the
//! two triangles on the edge (the link condition).
//!
//! A closed ring alone does not make a vertex interior. Where several closed
//! fans meet at one vertex the ring walk only covers one of them, so each
//! endpoint's ring must also reach all of its outgoing half-edges.
//!
//! ```text
//!        c                      c
//!       / \                    /|\
//!      /   \                  / | \
//!    v1 --- v2     ok       v1--x--v2    rejected: v1 and v2 also
//!      \   /                  \ | /      share x, the collapse would
//!       \ /                    \|/       pinch the surface
//!        d                      d
//! ```

use std::collections::HashSet;

use tracing::trace;

use crate::half_edge::{HalfEdgeId, HalfEdgeMesh, VertexId};

/// Why a candidate edge was refused. Refusal is an ordinary outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CollapseRejection {
    #[error("half-edge is missing or orphaned")]
    MissingEdge,
    #[error("one-ring of vertex {vertex:?} is open")]
    OpenRing { vertex: VertexId },
    #[error("one-ring of vertex {vertex:?} reaches {ring} of {outgoing} outgoing half-edges")]
    NonManifoldVertex {
        vertex: VertexId,
        ring: usize,
        outgoing: usize,
    },
    #[error("endpoint rings share {shared} vertices, expected 2")]
    LinkCondition { shared: usize },
}

/// Ring neighbours of `start.origin`, or why that vertex is not interior
fn closed_ring_neighbours(
    mesh: &HalfEdgeMesh,
    start: HalfEdgeId,
    vertex: VertexId,
) -> Result<HashSet<VertexId>, CollapseRejection> {
    let ring = mesh.one_ring(start);
    if !ring.closed {
        return Err(CollapseRejection::OpenRing { vertex });
    }
    let outgoing = mesh.vertex(vertex).map(|v| v.outgoing_count).unwrap_or(0);
    if ring.half_edges.len() != outgoing {
        return Err(CollapseRejection::NonManifoldVertex {
            vertex,
            ring: ring.half_edges.len(),
            outgoing,
        });
    }
    Ok(ring
        .half_edges
        .into_iter()
        .filter_map(|he_id| mesh.destination(he_id))
        .collect())
}

/// Check whether collapsing `edge_id` keeps the surface a closed-ring manifold.
pub fn check_collapse(mesh: &HalfEdgeMesh, edge_id: HalfEdgeId) -> Result<(), CollapseRejection> {
    let Some(he) = mesh.half_edge(edge_id).filter(|he| he.is_live()) else {
        return Err(CollapseRejection::MissingEdge);
    };
    let Some(next) = mesh.half_edge(he.next) else {
        return Err(CollapseRejection::MissingEdge);
    };
    let v1 = he.origin;
    let v2 = next.origin;

    let v1_ring = closed_ring_neighbours(mesh, edge_id, v1)?;
    let v2_ring = closed_ring_neighbours(mesh, he.next, v2)?;

    let shared = v1_ring.intersection(&v2_ring).count();
    if shared != 2 {
        trace!(
            "check_collapse: {:?} ({:?} -> {:?}) fails link condition, {} shared",
            edge_id,
            v1,
            v2,
            shared
        );
        return Err(CollapseRejection::LinkCondition { shared });
    }

    Ok(())
}

/// Whether `edge_id` may be collapsed.
pub fn is_collapse_safe(mesh: &HalfEdgeMesh, edge_id: HalfEdgeId) -> bool {
    check_collapse(mesh, edge_id).is_ok()
}
