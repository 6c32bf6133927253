//! Line-oriented OBJ reader producing the pre-triangulation [`RawMesh`].

use glam::DVec3;
use smallvec::SmallVec;
use std::io::{self, BufRead};

/// Raw face references as written in the file (signed, possibly zero).
pub type RawFace = SmallVec<[i64; 4]>;

/// Parsed but unresolved mesh description.
#[derive(Debug, Clone, Default)]
pub struct RawMesh {
    /// One slot per `v` line. `None` marks a line whose coordinates did not parse;
    /// the slot is kept so that later indices stay aligned.
    pub vertices: Vec<Option<DVec3>>,
    /// `vn` records. Collected for diagnostics only.
    pub normals: Vec<DVec3>,
    /// Faces with at least three references.
    pub faces: Vec<RawFace>,
    /// Some face reference was exactly 0.
    pub has_zero_index: bool,
    /// Largest raw face reference seen (starts at 0).
    pub max_raw_index: i64,
    /// `v` lines that did not carry three finite coordinates.
    pub malformed_vertices: usize,
}

impl RawMesh {
    /// Parses a complete OBJ text.
    pub fn parse(text: &str) -> Self {
        let mut mesh = RawMesh::default();
        for line in text.lines() {
            mesh.push_line(line);
        }
        mesh
    }

    /// Parses OBJ text from a buffered reader, line by line. Bytes that are
    /// not valid UTF-8 become U+FFFD instead of failing the read.
    pub fn read<R: BufRead>(mut reader: R) -> io::Result<Self> {
        let mut mesh = RawMesh::default();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            mesh.push_line(&String::from_utf8_lossy(&buf));
        }
        Ok(mesh)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Classifies one line by its leading token and records its content.
    pub fn push_line(&mut self, line: &str) {
        let trimmed = line.trim();

        if let Some(rest) = trimmed.strip_prefix("v ") {
            let v = parse_vec3(rest);
            if v.is_none() {
                self.malformed_vertices += 1;
            }
            self.vertices.push(v);
        } else if let Some(rest) = trimmed.strip_prefix("vn ") {
            if let Some(n) = parse_vec3(rest) {
                self.normals.push(n);
            }
        } else if let Some(rest) = trimmed.strip_prefix("f ") {
            let mut face = RawFace::new();
            for token in rest.split_whitespace() {
                // Only the vertex index before the first '/' matters.
                let head = token.split('/').next().unwrap_or("");
                let Some(raw) = leading_int(head) else {
                    continue;
                };
                if raw == 0 {
                    self.has_zero_index = true;
                }
                self.max_raw_index = self.max_raw_index.max(raw);
                face.push(raw);
            }
            if face.len() >= 3 {
                self.faces.push(face);
            }
        }
    }
}

/// Integer prefix of `token` (optional sign, then digits): `"3abc"` gives 3,
/// `"2.0"` gives 2. `None` when no digit follows the sign.
fn leading_int(token: &str) -> Option<i64> {
    let digits_from = usize::from(token.starts_with(['+', '-']));
    let digits_to = token[digits_from..]
        .find(|c: char| !c.is_ascii_digit())
        .map_or(token.len(), |i| i + digits_from);
    if digits_to == digits_from {
        return None;
    }
    token[..digits_to].parse().ok()
}

/// Reads the first three whitespace-separated fields as finite floats.
fn parse_vec3(fields: &str) -> Option<DVec3> {
    let mut parts = fields.split_whitespace();
    let x: f64 = parts.next()?.parse().ok()?;
    let y: f64 = parts.next()?.parse().ok()?;
    let z: f64 = parts.next()?.parse().ok()?;

    let v = DVec3::new(x, y, z);
    v.is_finite().then_some(v)
}
