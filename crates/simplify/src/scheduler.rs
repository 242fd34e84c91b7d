//! Greedy edge-collapse scheduler
//!
//! Each iteration scans the directed-edge registry for the cheapest safe
//! half-edge, collapses it and re-costs only the dirty set the collapse
//! reported. Ties on cost go to the lowest `(origin, destination)` key so
//! runs are reproducible; NaN costs are never selected.

use std::cmp::Ordering;

use lod_config::SimplifyConfig;
use serde::Serialize;
use tracing::{debug, error, info, trace, warn};

use crate::half_edge::{CollapseRecord, EdgeKey, HalfEdgeError, HalfEdgeId, HalfEdgeMesh};
use crate::mesh::Mesh;
use crate::{export, quadric, safety};

/// A selected edge that the topology could not collapse
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SimplifyError {
    #[error("selected half-edge {edge:?} with key {key:?} could not be collapsed")]
    CollapseRefused {
        edge: HalfEdgeId,
        key: Option<EdgeKey>,
    },
}

/// Why a run stopped
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum StopReason {
    /// All requested iterations were performed
    Completed,
    /// No safe edge remained
    Exhausted,
    /// The live face count reached the configured target
    TargetReached,
    /// `validate_each_step` caught a broken invariant
    ValidationFailed(String),
    /// The safety check passed an edge that the collapse refused
    CollapseRefused(String),
}

/// Outcome of a simplification run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimplifyReport {
    pub requested: usize,
    pub performed: usize,
    pub stop: StopReason,
    /// Live vertex count after the run
    pub vertices: usize,
    /// Live face count after the run
    pub faces: usize,
}

impl SimplifyReport {
    pub fn is_exhausted(&self) -> bool {
        self.stop == StopReason::Exhausted
    }
}

/// Owns a half-edge mesh with initialized quadrics and drives collapses.
#[derive(Debug, Clone)]
pub struct Simplifier {
    mesh: HalfEdgeMesh,
}

impl Simplifier {
    /// Take ownership of `mesh` and run the full quadric pass.
    pub fn new(mut mesh: HalfEdgeMesh) -> Self {
        quadric::initialize(&mut mesh);
        Self { mesh }
    }

    /// Build the topology from a flat mesh and initialize quadrics.
    pub fn from_mesh(mesh: &Mesh) -> Result<Self, HalfEdgeError> {
        Ok(Self::new(HalfEdgeMesh::from_mesh(mesh)?))
    }

    pub fn mesh(&self) -> &HalfEdgeMesh {
        &self.mesh
    }

    pub fn into_mesh(self) -> HalfEdgeMesh {
        self.mesh
    }

    /// Cheapest safe half-edge in the registry.
    ///
    /// Safety is only evaluated for candidates that would beat the current
    /// best, so most of the scan is a cost comparison.
    pub fn select_edge(&self) -> Option<HalfEdgeId> {
        let mut best: Option<(f32, EdgeKey, HalfEdgeId)> = None;

        for (&key, &he_id) in self.mesh.edge_map() {
            let Some(he) = self.mesh.half_edge(he_id) else {
                continue;
            };
            if he.cost.is_nan() {
                continue;
            }

            let better = match best {
                None => true,
                Some((best_cost, best_key, _)) => {
                    match he.cost.total_cmp(&best_cost) {
                        Ordering::Less => true,
                        Ordering::Equal => key < best_key,
                        Ordering::Greater => false,
                    }
                }
            };

            if better && safety::is_collapse_safe(&self.mesh, he_id) {
                best = Some((he.cost, key, he_id));
            }
        }

        best.map(|(cost, key, he_id)| {
            trace!("select_edge: {:?} key={:?} cost={}", he_id, key, cost);
            he_id
        })
    }

    /// Collapse the cheapest safe edge and refresh the affected costs.
    ///
    /// Returns `Ok(None)` once no safe edge remains.
    pub fn step(&mut self) -> Result<Option<CollapseRecord>, SimplifyError> {
        let Some(he_id) = self.select_edge() else {
            return Ok(None);
        };
        self.collapse(he_id).map(Some)
    }

    fn collapse(&mut self, he_id: HalfEdgeId) -> Result<CollapseRecord, SimplifyError> {
        let Some((record, dirty)) = self.mesh.collapse_edge(he_id) else {
            error!("step: selected edge {:?} could not be collapsed", he_id);
            return Err(SimplifyError::CollapseRefused {
                edge: he_id,
                key: self.mesh.edge_key(he_id),
            });
        };
        quadric::update(&mut self.mesh, dirty);

        trace!(
            "step: merged {:?} into {:?}",
            record.removed_vertex,
            record.surviving_vertex
        );
        Ok(record)
    }

    /// Perform up to `iterations` collapses.
    pub fn simplify(&mut self, iterations: usize) -> SimplifyReport {
        self.run(&SimplifyConfig {
            iterations,
            ..SimplifyConfig::default()
        })
    }

    /// Perform collapses until the iteration budget, the face target or
    /// exhaustion stops the loop.
    pub fn run(&mut self, config: &SimplifyConfig) -> SimplifyReport {
        let mut faces = self.mesh.face_count();
        let mut performed = 0;
        let mut stop = StopReason::Completed;

        debug!(
            "run: {} iterations requested, target faces {:?}, {} faces",
            config.iterations, config.target_faces, faces
        );

        while performed < config.iterations {
            if config.target_faces.is_some_and(|target| faces <= target) {
                stop = StopReason::TargetReached;
                break;
            }

            match self.step() {
                Ok(Some(_)) => {}
                Ok(None) => {
                    info!("No more valid edges after {} collapses", performed);
                    stop = StopReason::Exhausted;
                    break;
                }
                Err(e) => {
                    warn!("run: stopping after {} collapses: {}", performed, e);
                    stop = StopReason::CollapseRefused(e.to_string());
                    break;
                }
            }
            performed += 1;
            faces = faces.saturating_sub(2);

            if config.validate_each_step {
                if let Err(e) = self.mesh.validate() {
                    warn!("run: validation failed after collapse {}: {}", performed, e);
                    stop = StopReason::ValidationFailed(e.to_string());
                    break;
                }
            }
        }

        let report = SimplifyReport {
            requested: config.iterations,
            performed,
            stop,
            vertices: self.mesh.vertex_count(),
            faces: self.mesh.face_count(),
        };
        info!(
            "Simplified: {} of {} collapses, {} vertices, {} faces ({:?})",
            report.performed, report.requested, report.vertices, report.faces, report.stop
        );
        report
    }

    /// Flatten the live faces over the (sparse) vertex array
    pub fn export(&self) -> Mesh {
        export::export(&self.mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::half_edge::VertexId;
    use crate::test_meshes;

    fn simplifier(mesh: &Mesh) -> Simplifier {
        Simplifier::from_mesh(mesh).unwrap()
    }

    #[test]
    fn test_ties_go_to_lowest_key() {
        let mut s = simplifier(&test_meshes::tetrahedron());
        for he in s.mesh.half_edges.iter_mut() {
            he.cost = 1.0;
        }

        let selected = s.select_edge().unwrap();
        assert_eq!(s.mesh.edge_key(selected), Some((VertexId(0), VertexId(1))));
    }

    #[test]
    fn test_nan_costs_skipped() {
        let mut s = simplifier(&test_meshes::tetrahedron());
        for he in s.mesh.half_edges.iter_mut() {
            he.cost = 1.0;
        }
        for to in [VertexId(1), VertexId(2)] {
            let id = s.mesh.find_half_edge(VertexId(0), to).unwrap();
            s.mesh.half_edges[id.0 as usize].cost = f32::NAN;
        }

        let selected = s.select_edge().unwrap();
        assert_eq!(s.mesh.edge_key(selected), Some((VertexId(0), VertexId(3))));
    }

    #[test]
    fn test_cheapest_unsafe_edge_passed_over() {
        let mut s = simplifier(&test_meshes::bipyramid());
        for he in s.mesh.half_edges.iter_mut() {
            he.cost = 5.0;
        }
        let equator = s.mesh.find_half_edge(VertexId(2), VertexId(3)).unwrap();
        s.mesh.half_edges[equator.0 as usize].cost = 0.0;

        let selected = s.select_edge().unwrap();
        assert_ne!(selected, equator);
        assert_eq!(s.mesh.edge_key(selected), Some((VertexId(0), VertexId(2))));
    }

    #[test]
    fn test_tetrahedron_single_collapse_then_exhausted() {
        let mut s = simplifier(&test_meshes::tetrahedron());

        let report = s.simplify(5);

        assert_eq!(report.performed, 1);
        assert_eq!(report.stop, StopReason::Exhausted);
        assert_eq!(report.vertices, 3);
        assert_eq!(report.faces, 2);
        assert!(s.mesh().validate().is_ok());
    }

    #[test]
    fn test_icosahedron_partial_run() {
        let mut s = simplifier(&test_meshes::icosahedron());

        let report = s.simplify(3);

        assert_eq!(report.performed, 3);
        assert_eq!(report.stop, StopReason::Completed);
        assert_eq!(report.vertices, 9);
        assert_eq!(report.faces, 14);
        assert!(s.mesh().validate().is_ok());
        assert!(s.mesh().check_manifold().is_ok());
    }

    #[test]
    fn test_graceful_exhaustion() {
        let mut s = simplifier(&test_meshes::icosahedron());

        let report = s.simplify(100);

        assert!(report.performed < 100);
        assert!(report.is_exhausted());
        assert_eq!(report.vertices, 12 - report.performed);
        assert_eq!(report.faces, 20 - 2 * report.performed);
        assert!(s.mesh().validate().is_ok());
        assert_eq!(s.step(), Ok(None));
    }

    #[test]
    fn test_open_mesh_never_collapses() {
        let mut s = simplifier(&test_meshes::quad());

        let report = s.simplify(10);

        assert_eq!(report.performed, 0);
        assert!(report.is_exhausted());
        assert_eq!(s.export().indices.len(), 6);
    }

    #[test]
    fn test_target_faces_stops_early() {
        let mut s = simplifier(&test_meshes::icosahedron());
        let config = SimplifyConfig {
            iterations: 100,
            target_faces: Some(12),
            validate_each_step: true,
            ..SimplifyConfig::default()
        };

        let report = s.run(&config);

        assert_eq!(report.stop, StopReason::TargetReached);
        assert_eq!(report.performed, 4);
        assert_eq!(report.faces, 12);
    }

    #[test]
    fn test_pinch_vertex_survives_full_run() {
        let mut s = simplifier(&test_meshes::pinched_octahedra());
        let config = SimplifyConfig {
            iterations: 100,
            validate_each_step: true,
            ..SimplifyConfig::default()
        };

        let report = s.run(&config);

        assert!(report.performed > 0);
        assert_eq!(report.stop, StopReason::Exhausted);
        assert_eq!(report.vertices, 11 - report.performed);
        assert_eq!(report.faces, 16 - 2 * report.performed);
        assert!(!s.mesh().vertex(VertexId(0)).unwrap().removed);
        assert!(s.mesh().validate().is_ok());
    }

    #[test]
    fn test_refused_collapse_is_an_error() {
        let mut s = simplifier(&test_meshes::quad());
        let diagonal = s.mesh.find_half_edge(VertexId(0), VertexId(2)).unwrap();

        let err = s.collapse(diagonal).unwrap_err();

        assert_eq!(
            err,
            SimplifyError::CollapseRefused {
                edge: diagonal,
                key: Some((VertexId(0), VertexId(2))),
            }
        );
        assert_eq!(s.mesh().face_count(), 2);
        assert!(err.to_string().contains("could not be collapsed"));
    }

    #[test]
    fn test_zero_iterations_is_a_no_op() {
        let mut s = simplifier(&test_meshes::icosahedron());

        let report = s.simplify(0);

        assert_eq!(report.performed, 0);
        assert_eq!(report.stop, StopReason::Completed);
        assert_eq!(report.faces, 20);
    }
}
