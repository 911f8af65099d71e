//! Minimal OBJ subset loader.
//!
//! Recognizes `#` comments, `v x y z` vertices and `f i0 i1 i2` triangle
//! faces with 1-based indices; anything else is skipped. Per-face normals
//! are recomputed from the winding order, and degenerate faces (zero-area,
//! which would produce NaN normals) are discarded with a warning rather
//! than handed to the mesh.

use std::fs;
use std::path::{Path, PathBuf};

use helios_math::Vec3;
use thiserror::Error;

/// Errors that can occur while loading an OBJ file.
#[derive(Error, Debug)]
pub enum ObjError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: malformed {directive} directive")]
    Malformed { line: usize, directive: &'static str },

    #[error("line {line}: face index {index} out of range (file has {count} vertices)")]
    IndexOutOfRange {
        line: usize,
        index: i64,
        count: usize,
    },
}

/// Parsed mesh data: positions, index triples and one normal per triangle.
#[derive(Debug, Clone, Default)]
pub struct ObjMesh {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub normals: Vec<Vec3>,
}

/// Load and parse an OBJ file.
pub fn load_obj(path: impl AsRef<Path>) -> Result<ObjMesh, ObjError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| ObjError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_obj(&source)
}

/// Parse OBJ source text.
pub fn parse_obj(source: &str) -> Result<ObjMesh, ObjError> {
    let mut positions: Vec<Vec3> = Vec::new();
    // Faces keep their source line for the bounds check below.
    let mut faces: Vec<(usize, [i64; 3])> = Vec::new();

    for (number, line) in source.lines().enumerate() {
        let line_number = number + 1;
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("v") => {
                let mut component = || {
                    tokens
                        .next()
                        .and_then(|t| t.parse::<f32>().ok())
                        .ok_or(ObjError::Malformed {
                            line: line_number,
                            directive: "vertex",
                        })
                };
                let x = component()?;
                let y = component()?;
                let z = component()?;
                positions.push(Vec3::new(x, y, z));
            }
            Some("f") => {
                let mut index = || {
                    tokens
                        .next()
                        .and_then(|t| t.parse::<i64>().ok())
                        .ok_or(ObjError::Malformed {
                            line: line_number,
                            directive: "face",
                        })
                };
                let i0 = index()?;
                let i1 = index()?;
                let i2 = index()?;
                faces.push((line_number, [i0, i1, i2]));
            }
            // Comments, blank lines and unsupported directives
            _ => {}
        }
    }

    let mut mesh = ObjMesh {
        positions,
        ..Default::default()
    };

    let count = mesh.positions.len();
    let mut discarded = 0usize;

    for (line, face) in faces {
        let mut triple = [0u32; 3];
        for (slot, &index) in triple.iter_mut().zip(&face) {
            // 1-based in the file, zero-based in the arrays
            if index < 1 || index as usize > count {
                return Err(ObjError::IndexOutOfRange { line, index, count });
            }
            *slot = (index - 1) as u32;
        }

        let v0 = mesh.positions[triple[0] as usize];
        let v1 = mesh.positions[triple[1] as usize];
        let v2 = mesh.positions[triple[2] as usize];
        let normal = (v1 - v0).cross(v2 - v0).normalize();

        // A zero-area face normalizes to NaN; it can never be hit and its
        // normal must not reach the shading path.
        if !normal.is_finite() {
            discarded += 1;
            continue;
        }

        mesh.indices.extend_from_slice(&triple);
        mesh.normals.push(normal);
    }

    if discarded > 0 {
        log::warn!("discarded {discarded} degenerate OBJ face(s)");
    }

    Ok(mesh)
}
