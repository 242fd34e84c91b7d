//! Mesh loading for lod-simplify
//!
//! Reads Wavefront OBJ text, fan-triangulates polygons, welds coincident
//! corners and reports how closed the result is. Also writes simplified
//! meshes back out as OBJ.

pub mod error;
pub mod obj;
pub mod report;
pub mod weld;
pub mod writer;

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::Path;

use lod_simplify::Mesh;

pub use error::{BuildError, Result};
pub use obj::{parse_obj, ObjCorner, ObjData};
pub use report::ManifoldReport;
pub use weld::weld;
pub use writer::write_obj;

/// Parse, weld and analyze OBJ text from a reader
pub fn load_obj_from_reader<R: BufRead>(reader: R, weld_epsilon: f32) -> Result<(Mesh, ManifoldReport)> {
    let data = parse_obj(reader)?;
    let mesh = weld(&data, weld_epsilon);
    let report = ManifoldReport::analyze(&mesh);
    Ok((mesh, report))
}

/// Load an OBJ file as a welded triangle mesh, logging its manifold summary
pub fn load_obj(path: impl AsRef<Path>, weld_epsilon: f32) -> Result<(Mesh, ManifoldReport)> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let (mesh, report) = load_obj_from_reader(BufReader::new(file), weld_epsilon)?;
    report.log(&path.display().to_string());
    Ok((mesh, report))
}

/// Write a mesh to an OBJ file
pub fn save_obj(path: impl AsRef<Path>, mesh: &Mesh) -> Result<()> {
    let file = File::create(path)?;
    write_obj(BufWriter::new(file), mesh)?;
    Ok(())
}
