//! Wavefront OBJ parsing
//!
//! Only geometry is read: `v`, `vt`, `vn` and `f`. Other directives
//! (`o`, `g`, `s`, `usemtl`, `mtllib`, ...) are skipped. Faces with more than
//! three corners are triangulated as a fan from their first corner.

use std::io::BufRead;

use glam::{Vec2, Vec3};
use tracing::{debug, trace};

use crate::error::{BuildError, Result};

/// One triangle corner, as resolved 0-based indices into [`ObjData`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjCorner {
    pub position: usize,
    pub uv: Option<usize>,
    pub normal: Option<usize>,
}

/// Raw OBJ attributes plus a triangle list of corners (3 per triangle)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjData {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub normals: Vec<Vec3>,
    pub corners: Vec<ObjCorner>,
}

impl ObjData {
    pub fn triangle_count(&self) -> usize {
        self.corners.len() / 3
    }
}

/// Resolve a 1-based (or negative, relative) OBJ index against `count`
/// entries defined so far. Zero resolves to nothing.
fn resolve_index(raw: i64, count: usize, line: usize, kind: &'static str) -> Result<Option<usize>> {
    let resolved = match raw {
        0 => return Ok(None),
        r if r > 0 => r - 1,
        r => count as i64 + r,
    };
    if resolved < 0 || resolved as usize >= count {
        return Err(BuildError::IndexOutOfRange {
            line,
            kind,
            index: raw,
            count,
        });
    }
    Ok(Some(resolved as usize))
}

/// Parse a face token: `v`, `v/t`, `v//n` or `v/t/n`.
///
/// Returns `Ok(None)` when the position part is missing, zero or not a
/// number; such tokens are dropped from the face.
fn parse_corner(token: &str, data: &ObjData, line: usize) -> Result<Option<ObjCorner>> {
    let mut parts = token.split('/');
    let Some(position) = parts.next().and_then(|p| p.parse::<i64>().ok()) else {
        return Ok(None);
    };
    let Some(position) = resolve_index(position, data.positions.len(), line, "position")? else {
        return Ok(None);
    };

    let uv = match parts.next().and_then(|p| p.parse::<i64>().ok()) {
        Some(raw) => resolve_index(raw, data.uvs.len(), line, "uv")?,
        None => None,
    };
    let normal = match parts.next().and_then(|p| p.parse::<i64>().ok()) {
        Some(raw) => resolve_index(raw, data.normals.len(), line, "normal")?,
        None => None,
    };

    Ok(Some(ObjCorner {
        position,
        uv,
        normal,
    }))
}

fn parse_floats<const N: usize>(
    fields: &[&str],
    required: usize,
    line: usize,
    directive: &str,
) -> Result<[f32; N]> {
    if fields.len() < required {
        return Err(BuildError::Parse {
            line,
            message: format!(
                "'{}' needs {} components, found {}",
                directive,
                required,
                fields.len()
            ),
        });
    }
    let mut out = [0.0; N];
    for (slot, field) in out.iter_mut().zip(fields) {
        *slot = field.parse().map_err(|_| BuildError::Parse {
            line,
            message: format!("'{}' has non-numeric component {:?}", directive, field),
        })?;
    }
    Ok(out)
}

/// Parse OBJ text from a reader.
pub fn parse_obj<R: BufRead>(reader: R) -> Result<ObjData> {
    let mut data = ObjData::default();
    let mut polygons = 0usize;

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = i + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        let Some(directive) = fields.next() else {
            continue;
        };
        let fields: Vec<&str> = fields.collect();

        match directive {
            "v" => {
                let [x, y, z] = parse_floats::<3>(&fields, 3, line_no, directive)?;
                data.positions.push(Vec3::new(x, y, z));
            }
            "vt" => {
                let [u, v] = parse_floats::<2>(&fields, 1, line_no, directive)?;
                data.uvs.push(Vec2::new(u, v));
            }
            "vn" => {
                let [x, y, z] = parse_floats::<3>(&fields, 3, line_no, directive)?;
                data.normals.push(Vec3::new(x, y, z));
            }
            "f" => {
                let mut face = Vec::with_capacity(fields.len());
                for token in &fields {
                    if let Some(corner) = parse_corner(token, &data, line_no)? {
                        face.push(corner);
                    }
                }
                if face.len() > 3 {
                    polygons += 1;
                }
                for k in 1..face.len().saturating_sub(1) {
                    data.corners.extend([face[0], face[k], face[k + 1]]);
                }
            }
            other => trace!("parse_obj: line {}: skipping '{}'", line_no, other),
        }
    }

    debug!(
        "parse_obj: {} positions, {} uvs, {} normals, {} triangles ({} polygons fanned)",
        data.positions.len(),
        data.uvs.len(),
        data.normals.len(),
        data.triangle_count(),
        polygons
    );
    Ok(data)
}
