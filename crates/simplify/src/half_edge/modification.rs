//! Edge collapse for HalfEdgeMesh.
//!
//! ```text
//!            c                         c
//!          /   \                       |
//!        hp     hn                     |
//!        /  A    \                     |
//!      v1 --h--> v2      ==>           v2
//!        \  B    /                     |
//!        tn     tp                     |
//!          \   /                       |
//!            d                         d
//! ```
//!
//! `h` runs v1 -> v2 in face A, its twin `t` runs v2 -> v1 in face B. Both
//! faces and their six half-edges are orphaned, the outer twins of each face
//! are stitched across the gap, and every surviving half-edge leaving v1 is
//! re-originated at v2.

use tracing::{error, trace};

use super::types::{EdgeKey, FaceId, HalfEdgeId, VertexId};
use super::HalfEdgeMesh;

/// What one collapse removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollapseRecord {
    /// Destination of the collapsed half-edge, keeps its position
    pub surviving_vertex: VertexId,
    /// Origin of the collapsed half-edge, now tombstoned
    pub removed_vertex: VertexId,
    pub removed_faces: [FaceId; 2],
    /// h, h.next, h.prev, t, t.next, t.prev
    pub removed_half_edges: [HalfEdgeId; 6],
}

/// Half-edges around the surviving vertex whose costs a collapse invalidated.
///
/// Produced by [`HalfEdgeMesh::collapse_edge`] and consumed by value by
/// [`crate::quadric::update`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirtyEdges(Vec<HalfEdgeId>);

impl DirtyEdges {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[HalfEdgeId] {
        &self.0
    }
}

impl IntoIterator for DirtyEdges {
    type Item = HalfEdgeId;
    type IntoIter = std::vec::IntoIter<HalfEdgeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Everything the collapse needs, read before the first mutation
struct CollapseSite {
    v1: VertexId,
    v2: VertexId,
    c: VertexId,
    d: VertexId,
    face_a: FaceId,
    face_b: FaceId,
    /// h, hn, hp, t, tn, tp
    removed: [HalfEdgeId; 6],
    removed_keys: [EdgeKey; 6],
    /// (c -> v2, v1 -> c) and (d -> v1, v2 -> d)
    stitches: [(HalfEdgeId, HalfEdgeId); 2],
    /// Outgoing half-edges of v1 that stay alive
    survivors: Vec<HalfEdgeId>,
    /// Ring neighbours of v1 other than v2, in ring order
    neighbours: Vec<VertexId>,
}

impl HalfEdgeMesh {
    /// Collapse half-edge `h`, merging its origin into its destination.
    ///
    /// The caller must have checked the edge with
    /// [`crate::safety::is_collapse_safe`]. This only refuses (returning
    /// `None`, mesh untouched) when the local structure it needs is absent:
    /// a dead handle, a missing twin around either face, or an origin ring
    /// that is open or misses some of the origin's outgoing half-edges. The
    /// link condition is not re-checked here.
    ///
    /// Full validation is left to the caller, see
    /// [`lod_config::SimplifyConfig::validate_each_step`].
    pub fn collapse_edge(&mut self, h: HalfEdgeId) -> Option<(CollapseRecord, DirtyEdges)> {
        trace!("collapse_edge: START h={:?}", h);

        // ===== PHASE 1: Gather =====
        let site = self.collapse_site(h)?;
        trace!(
            "collapse_edge: v1={:?} -> v2={:?}, apexes c={:?} d={:?}, faces {:?}/{:?}, {} survivors",
            site.v1,
            site.v2,
            site.c,
            site.d,
            site.face_a,
            site.face_b,
            site.survivors.len()
        );

        // ===== PHASE 2: Orphan the two faces =====
        for (&he_id, key) in site.removed.iter().zip(site.removed_keys.iter()) {
            if self.edge_map.get(key) == Some(&he_id) {
                self.edge_map.remove(key);
            }
            let he = &mut self.half_edges[he_id.0 as usize];
            he.face = None;
            he.twin = None;
        }
        self.faces[site.face_a.0 as usize].removed = true;
        self.faces[site.face_b.0 as usize].removed = true;

        // ===== PHASE 3: Stitch outer twins across the gap =====
        for (a, b) in site.stitches {
            self.half_edges[a.0 as usize].twin = Some(b);
            self.half_edges[b.0 as usize].twin = Some(a);
        }

        // ===== PHASE 4: Re-originate v1's surviving half-edges at v2 =====
        for &s in &site.survivors {
            let dest = self.half_edges[self.half_edges[s.0 as usize].next.0 as usize].origin;
            let incoming = self.half_edges[s.0 as usize].prev;
            let src = self.half_edges[incoming.0 as usize].origin;

            self.unregister((site.v1, dest), s);
            self.unregister((src, site.v1), incoming);

            self.half_edges[s.0 as usize].origin = site.v2;

            self.register((site.v2, dest), s);
            self.register((src, site.v2), incoming);
        }

        // ===== PHASE 5: Vertex bookkeeping =====
        {
            let removed = &mut self.vertices[site.v1.0 as usize];
            removed.outgoing_half_edge = None;
            removed.outgoing_count = 0;
            removed.removed = true;
        }
        // Outgoing counts follow the orphaned and re-originated half-edges
        {
            let survivor = &mut self.vertices[site.v2.0 as usize];
            survivor.outgoing_count =
                survivor.outgoing_count.saturating_sub(2) + site.survivors.len();
        }
        for apex in [site.c, site.d] {
            let vertex = &mut self.vertices[apex.0 as usize];
            vertex.outgoing_count = vertex.outgoing_count.saturating_sub(1);
        }
        let [(on, _), (otn, otp)] = site.stitches;
        for (vertex, replacement) in [(site.v2, otp), (site.c, on), (site.d, otn)] {
            let anchor_dead = self.vertices[vertex.0 as usize]
                .outgoing_half_edge
                .map(|a| !self.half_edges[a.0 as usize].is_live())
                .unwrap_or(true);
            if anchor_dead {
                self.vertices[vertex.0 as usize].outgoing_half_edge = Some(replacement);
            }
        }

        // ===== PHASE 6: Dirty set =====
        let mut dirty = Vec::with_capacity(site.neighbours.len() * 2);
        for &x in &site.neighbours {
            for key in [(site.v2, x), (x, site.v2)] {
                match self.edge_map.get(&key) {
                    Some(&he_id) => dirty.push(he_id),
                    None => error!("collapse_edge: missing key {:?} after re-origin", key),
                }
            }
        }

        let record = CollapseRecord {
            surviving_vertex: site.v2,
            removed_vertex: site.v1,
            removed_faces: [site.face_a, site.face_b],
            removed_half_edges: site.removed,
        };
        trace!("collapse_edge: END, {} dirty half-edges", dirty.len());
        Some((record, DirtyEdges(dirty)))
    }

    fn collapse_site(&self, h: HalfEdgeId) -> Option<CollapseSite> {
        let he = self.half_edge(h).filter(|he| he.is_live())?;
        let t = he.twin?;
        let twin = self.half_edge(t).filter(|tw| tw.is_live())?;
        let face_a = he.face?;
        let face_b = twin.face?;

        let (hn, hp) = (he.next, he.prev);
        let (tn, tp) = (twin.next, twin.prev);

        let v1 = he.origin;
        let v2 = twin.origin;
        let c = self.half_edge(hp)?.origin;
        let d = self.half_edge(tp)?.origin;

        let on = self.half_edge(hn)?.twin?;
        let op = self.half_edge(hp)?.twin?;
        let otn = self.half_edge(tn)?.twin?;
        let otp = self.half_edge(tp)?.twin?;

        let ring = self.one_ring(h);
        if !ring.closed {
            trace!("collapse_edge: ring of {:?} is open, refusing", v1);
            return None;
        }
        let outgoing = self.vertex(v1)?.outgoing_count;
        if ring.half_edges.len() != outgoing {
            trace!(
                "collapse_edge: ring of {:?} reaches {} of {} outgoing half-edges, refusing",
                v1,
                ring.half_edges.len(),
                outgoing
            );
            return None;
        }

        let survivors: Vec<HalfEdgeId> = ring
            .half_edges
            .iter()
            .copied()
            .filter(|&e| e != h && e != tn)
            .collect();
        let neighbours: Vec<VertexId> = ring
            .half_edges
            .iter()
            .skip(1)
            .filter_map(|&e| self.destination(e))
            .collect();

        Some(CollapseSite {
            v1,
            v2,
            c,
            d,
            face_a,
            face_b,
            removed: [h, hn, hp, t, tn, tp],
            removed_keys: [(v1, v2), (v2, c), (c, v1), (v2, v1), (v1, d), (d, v2)],
            stitches: [(on, op), (otn, otp)],
            survivors,
            neighbours,
        })
    }

    fn unregister(&mut self, key: EdgeKey, he_id: HalfEdgeId) {
        if self.edge_map.get(&key) == Some(&he_id) {
            self.edge_map.remove(&key);
        }
    }

    fn register(&mut self, key: EdgeKey, he_id: HalfEdgeId) {
        if let Some(old) = self.edge_map.insert(key, he_id) {
            if old != he_id && self.half_edges[old.0 as usize].is_live() {
                error!(
                    "collapse_edge: OVERWRITE key {:?}: {:?} replaced by {:?}",
                    key, old, he_id
                );
            }
        }
    }
}
