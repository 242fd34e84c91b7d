//! Vertex welding by spatial hashing
//!
//! Corners whose positions agree within `epsilon` on every axis collapse to
//! one vertex. Positions are bucketed into cubic cells of side `epsilon`, so
//! any match lies in the 3x3x3 block around the candidate's cell. The first
//! corner to claim a position keeps its normal and uv.

use std::collections::HashMap;

use glam::{Vec2, Vec3};
use lod_config::DEFAULT_WELD_EPSILON;
use lod_simplify::{Mesh, MeshVertex};
use tracing::{debug, warn};

use crate::obj::ObjData;

type Cell = (i64, i64, i64);

/// Uniform grid over vertex positions
#[derive(Debug)]
struct SpatialHash {
    cell_size: f32,
    cells: HashMap<Cell, Vec<u32>>,
}

impl SpatialHash {
    fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    fn cell(&self, p: Vec3) -> Cell {
        let c = (p / self.cell_size).floor();
        (c.x as i64, c.y as i64, c.z as i64)
    }

    /// First stored vertex within `cell_size` of `p` on every axis
    fn find(&self, p: Vec3, vertices: &[MeshVertex]) -> Option<u32> {
        let (cx, cy, cz) = self.cell(p);
        for dz in -1..=1 {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    let Some(bucket) = self.cells.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &index in bucket {
                        let delta = (vertices[index as usize].position() - p).abs();
                        if delta.max_element() <= self.cell_size {
                            return Some(index);
                        }
                    }
                }
            }
        }
        None
    }

    fn insert(&mut self, p: Vec3, index: u32) {
        let cell = self.cell(p);
        self.cells.entry(cell).or_default().push(index);
    }
}

/// Weld the corners of `data` into an indexed triangle mesh.
///
/// Missing normals default to +Z and missing uvs to zero. Triangles that
/// welding turns degenerate (two corners on one vertex) are dropped.
pub fn weld(data: &ObjData, epsilon: f32) -> Mesh {
    let epsilon = if epsilon.is_finite() && epsilon > 0.0 {
        epsilon
    } else {
        warn!(
            "weld: invalid epsilon {}, using {}",
            epsilon, DEFAULT_WELD_EPSILON
        );
        DEFAULT_WELD_EPSILON
    };

    let mut grid = SpatialHash::new(epsilon);
    let mut vertices: Vec<MeshVertex> = Vec::new();
    let mut corner_indices: Vec<u32> = Vec::with_capacity(data.corners.len());

    for corner in &data.corners {
        let position = data.positions[corner.position];
        let index = match grid.find(position, &vertices) {
            Some(existing) => existing,
            None => {
                let uv = corner.uv.map(|i| data.uvs[i]).unwrap_or(Vec2::ZERO);
                let normal = corner.normal.map(|i| data.normals[i]).unwrap_or(Vec3::Z);
                let index = vertices.len() as u32;
                vertices.push(MeshVertex::new(position, normal, uv));
                grid.insert(position, index);
                index
            }
        };
        corner_indices.push(index);
    }

    let mut indices = Vec::with_capacity(corner_indices.len());
    let mut degenerate = 0usize;
    for tri in corner_indices.chunks_exact(3) {
        if tri[0] == tri[1] || tri[1] == tri[2] || tri[0] == tri[2] {
            degenerate += 1;
            continue;
        }
        indices.extend_from_slice(tri);
    }

    debug!(
        "weld: {} corners -> {} vertices, {} triangles, {} degenerate dropped",
        data.corners.len(),
        vertices.len(),
        indices.len() / 3,
        degenerate
    );

    Mesh::new(vertices, indices)
}
