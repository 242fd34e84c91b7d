//! Hand-built fixture meshes shared by the unit tests.

use glam::Vec3;

use crate::mesh::Mesh;

/// Single triangle in the XY plane
pub(crate) fn triangle() -> Mesh {
    Mesh::from_positions(
        &[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ],
        vec![0, 1, 2],
    )
}

/// Unit quad at z = 1 split along the 0-2 diagonal
///
/// ```text
///  3 ----- 2
///  |     / |
///  |   /   |
///  | /     |
///  0 ----- 1
/// ```
pub(crate) fn quad() -> Mesh {
    Mesh::from_positions(
        &[
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
        ],
        vec![0, 1, 2, 0, 2, 3],
    )
}

/// Closed tetrahedron, outward winding
pub(crate) fn tetrahedron() -> Mesh {
    Mesh::from_positions(
        &[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ],
        vec![0, 2, 1, 0, 1, 3, 0, 3, 2, 1, 2, 3],
    )
}

/// Octahedron stretched to y = 2 at vertex 1, so opposite collapse
/// directions along 0-1 price differently
pub(crate) fn stretched_octahedron() -> Mesh {
    Mesh::from_positions(
        &[
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, -1.0),
        ],
        vec![
            0, 1, 4, 1, 2, 4, 2, 3, 4, 3, 0, 4, //
            1, 0, 5, 2, 1, 5, 3, 2, 5, 0, 3, 5,
        ],
    )
}

/// Triangular bipyramid: poles 0 and 1, equator 2, 3, 4
///
/// Equator edges share three ring neighbours and fail the link condition.
pub(crate) fn bipyramid() -> Mesh {
    let s = 3.0_f32.sqrt() * 0.5;
    Mesh::from_positions(
        &[
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(-0.5, s, 0.0),
            Vec3::new(-0.5, -s, 0.0),
        ],
        vec![
            0, 2, 3, 0, 3, 4, 0, 4, 2, //
            1, 3, 2, 1, 4, 3, 1, 2, 4,
        ],
    )
}

/// Three triangles hinged on edge 0-1; two of them wind it the same way
pub(crate) fn fin() -> Mesh {
    Mesh::from_positions(
        &[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.5, 1.0, 0.0),
            Vec3::new(0.5, 0.0, 1.0),
            Vec3::new(0.5, -1.0, 0.0),
        ],
        vec![0, 1, 2, 0, 1, 3, 1, 0, 4],
    )
}

/// Two triangles touching only at vertex 0, in the planes z = 0 and y = 0
pub(crate) fn bowtie() -> Mesh {
    Mesh::from_positions(
        &[
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ],
        vec![0, 1, 2, 0, 3, 4],
    )
}

/// Two octahedra touching only at vertex 0: the bottom pole of the upper
/// one (equator 1..=4, top 5) and the top pole of the lower one (equator
/// 6..=9, bottom 10). Each fan around 0 is closed on its own.
pub(crate) fn pinched_octahedra() -> Mesh {
    let positions = [
        Vec3::ZERO,
        Vec3::new(1.0, 0.0, 1.0),
        Vec3::new(0.0, 1.0, 1.0),
        Vec3::new(-1.0, 0.0, 1.0),
        Vec3::new(0.0, -1.0, 1.0),
        Vec3::new(0.0, 0.0, 2.0),
        Vec3::new(1.0, 0.0, -1.0),
        Vec3::new(0.0, 1.0, -1.0),
        Vec3::new(-1.0, 0.0, -1.0),
        Vec3::new(0.0, -1.0, -1.0),
        Vec3::new(0.0, 0.0, -2.0),
    ];
    let mut indices = Vec::with_capacity(48);
    for (equator, top, bottom) in [([1, 2, 3, 4], 5, 0), ([6, 7, 8, 9], 0, 10)] {
        for i in 0..4 {
            let (a, b) = (equator[i], equator[(i + 1) % 4]);
            indices.extend_from_slice(&[a, b, top, b, a, bottom]);
        }
    }
    Mesh::from_positions(&positions, indices)
}

/// 4x4 vertex grid with uneven heights, vertex `i + 4 * j` at `(i, j)`.
/// Cells are split along the `(i, j)`-`(i + 1, j + 1)` diagonal, so vertices
/// 5, 6, 9 and 10 are interior and everything else is on the boundary.
pub(crate) fn bumpy_grid() -> Mesh {
    let mut positions = Vec::with_capacity(16);
    for j in 0..4u32 {
        for i in 0..4u32 {
            let height = ((i * 7 + j * 3) % 5) as f32 * 0.25;
            positions.push(Vec3::new(i as f32, j as f32, height));
        }
    }
    let mut indices = Vec::with_capacity(54);
    for j in 0..3u32 {
        for i in 0..3u32 {
            let a = i + 4 * j;
            let (b, c, d) = (a + 1, a + 5, a + 4);
            indices.extend_from_slice(&[a, b, c, a, c, d]);
        }
    }
    Mesh::from_positions(&positions, indices)
}

/// Regular icosahedron, 12 vertices and 20 outward-wound faces
pub(crate) fn icosahedron() -> Mesh {
    let t = (1.0 + 5.0_f32.sqrt()) * 0.5;
    Mesh::from_positions(
        &[
            Vec3::new(-1.0, t, 0.0),
            Vec3::new(1.0, t, 0.0),
            Vec3::new(-1.0, -t, 0.0),
            Vec3::new(1.0, -t, 0.0),
            Vec3::new(0.0, -1.0, t),
            Vec3::new(0.0, 1.0, t),
            Vec3::new(0.0, -1.0, -t),
            Vec3::new(0.0, 1.0, -t),
            Vec3::new(t, 0.0, -1.0),
            Vec3::new(t, 0.0, 1.0),
            Vec3::new(-t, 0.0, -1.0),
            Vec3::new(-t, 0.0, 1.0),
        ],
        vec![
            0, 11, 5, 0, 5, 1, 0, 1, 7, 0, 7, 10, 0, 10, 11, //
            1, 5, 9, 5, 11, 4, 11, 10, 2, 10, 7, 6, 7, 1, 8, //
            3, 9, 4, 3, 4, 2, 3, 2, 6, 3, 6, 8, 3, 8, 9, //
            4, 9, 5, 2, 4, 11, 6, 2, 10, 8, 6, 7, 9, 8, 1,
        ],
    )
}
