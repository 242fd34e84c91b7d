//! Wavefront OBJ output.

use std::io::Write;

use lod_simplify::Mesh;

/// Write `mesh` as OBJ with one `v`/`vt`/`vn` per vertex and `f a/a/a` faces.
pub fn write_obj<W: Write>(mut writer: W, mesh: &Mesh) -> std::io::Result<()> {
    writeln!(
        writer,
        "# {} vertices, {} triangles",
        mesh.vertices.len(),
        mesh.triangle_count()
    )?;
    for v in &mesh.vertices {
        let [x, y, z] = v.position;
        writeln!(writer, "v {} {} {}", x, y, z)?;
    }
    for v in &mesh.vertices {
        let [u, t] = v.uv;
        writeln!(writer, "vt {} {}", u, t)?;
    }
    for v in &mesh.vertices {
        let [x, y, z] = v.normal;
        writeln!(writer, "vn {} {} {}", x, y, z)?;
    }
    for [a, b, c] in mesh.triangles() {
        let (a, b, c) = (a + 1, b + 1, c + 1);
        writeln!(writer, "f {a}/{a}/{a} {b}/{b}/{b} {c}/{c}/{c}")?;
    }
    writer.flush()
}
