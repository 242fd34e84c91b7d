//! Progressive mesh simplification by quadric-error edge collapse.
//!
//! The crate is built from leaves up:
//!
//! - **mesh**: flat vertex/index buffers exchanged with loaders and renderers
//! - **half_edge**: arena-backed half-edge topology with a directed-edge
//!   registry and the collapse operation
//! - **quadric**: per-vertex error quadrics and per-half-edge collapse costs,
//!   full and incremental passes
//! - **safety**: link-condition check run before every collapse
//! - **scheduler**: greedy loop selecting the cheapest safe edge
//! - **export**: flatten live faces back into a [`Mesh`]
//!
//! ```no_run
//! use lod_simplify::{Mesh, Simplifier};
//!
//! # fn load() -> Mesh { Mesh::default() }
//! let mut simplifier = Simplifier::from_mesh(&load()).unwrap();
//! let report = simplifier.simplify(500);
//! let lod = simplifier.export();
//! println!("{} collapses, {} triangles", report.performed, lod.triangle_count());
//! ```

pub mod export;
pub mod half_edge;
pub mod mesh;
pub mod quadric;
pub mod safety;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod test_meshes;

pub use export::{export, export_compact};
pub use half_edge::{
    CollapseRecord, DirtyEdges, FaceId, HalfEdgeError, HalfEdgeId, HalfEdgeMesh, ManifoldError,
    VertexId,
};
pub use lod_config::SimplifyConfig;
pub use mesh::{Mesh, MeshVertex};
pub use quadric::Quadric;
pub use safety::{check_collapse, is_collapse_safe, CollapseRejection};
pub use scheduler::{SimplifyError, Simplifier, SimplifyReport, StopReason};
