//! OBJ ingestion: raw mesh -> normalized, flat-shaded triangles.
//!
//! Pipeline, run once per model load:
//!   1. parse lines into a [`RawMesh`]
//!   2. guess the index convention from the face references
//!   3. compute bounds over every parsed vertex and derive a [`NormalizingTransform`]
//!   4. fan-triangulate each face, resolving indices; bad triangles are skipped and counted
//!   5. transform corners, compute one flat normal, drop zero-area triangles
//!   6. emit three vertices per surviving triangle
//!
//! Nothing is written to the caller's buffer unless the whole run succeeds.

use crate::buffer::GeometryBuffer;
use crate::error::{IngestError, TriangleFault};
use crate::parse::RawMesh;
use glam::DVec3;
use log::{debug, info, warn};

/// Share of the footprint the model's horizontal extent is scaled to.
pub const FOOTPRINT_FILL: f64 = 0.9;
/// Lift above the ground plane, as a share of the footprint.
pub const GROUND_CLEARANCE: f64 = 0.02;
/// Cross products shorter than this mark a zero-area triangle.
pub const DEGENERATE_EPSILON: f64 = 1e-8;

/// Knobs of a single ingestion run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IngestOptions {
    /// Size of the square the model is fitted into (plan units).
    pub target_footprint: f64,
    /// Color given to every emitted vertex.
    pub surface_color: [f32; 3],
    /// Turn the model 180 degrees about Y after normalization.
    pub rotate_y_180: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            target_footprint: 220.0,
            surface_color: [0.5, 0.5, 0.5],
            rotate_y_180: false,
        }
    }
}

/// How positive face references map onto vertex slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexConvention {
    ZeroBased,
    OneBased,
}

impl IndexConvention {
    /// Zero-based if any reference is 0 or the largest reference is `vertex_count - 1`.
    ///
    /// A one-based file whose largest reference happens to be `vertex_count - 1`
    /// (its last vertex is never used) is classified as zero-based. Intent cannot be
    /// recovered from the file alone, so the guess is kept as is.
    pub fn detect(has_zero_index: bool, max_raw_index: i64, vertex_count: usize) -> Self {
        if has_zero_index || max_raw_index == vertex_count as i64 - 1 {
            IndexConvention::ZeroBased
        } else {
            IndexConvention::OneBased
        }
    }

    /// Maps a raw reference to a vertex slot in `[0, vertex_count)`.
    ///
    /// `0` is always absent; negative values count back from the end of the list.
    pub fn resolve(self, raw: i64, vertex_count: usize) -> Option<usize> {
        let n = vertex_count as i64;
        let idx = match raw {
            0 => return None,
            r if r < 0 => n + r,
            r => match self {
                IndexConvention::ZeroBased => r,
                IndexConvention::OneBased => r - 1,
            },
        };
        (0..n).contains(&idx).then_some(idx as usize)
    }
}

/// Center, uniform scale and vertical lift applied to every vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizingTransform {
    pub center: DVec3,
    pub scale: f64,
    pub vertical_offset: f64,
    pub rotate_y_180: bool,
}

impl NormalizingTransform {
    /// Derives the transform from the bounds of all parsed vertices.
    ///
    /// Only X and Z drive the scale so the model's height keeps its proportions.
    pub fn from_bounds(min: DVec3, max: DVec3, options: &IngestOptions) -> Result<Self, IngestError> {
        let extent = (max.x - min.x).max(max.z - min.z);
        if !extent.is_finite() || extent <= 0.0 {
            return Err(IngestError::DegenerateBounds { extent });
        }

        let scale = options.target_footprint * FOOTPRINT_FILL / extent;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(IngestError::DegenerateBounds { extent });
        }

        Ok(Self {
            center: (min + max) * 0.5,
            scale,
            vertical_offset: -min.y * scale + options.target_footprint * GROUND_CLEARANCE,
            rotate_y_180: options.rotate_y_180,
        })
    }

    #[inline]
    pub fn apply(&self, v: DVec3) -> DVec3 {
        let x = (v.x - self.center.x) * self.scale;
        let y = (v.y - self.center.y) * self.scale + self.vertical_offset;
        let z = (v.z - self.center.z) * self.scale;
        if self.rotate_y_180 {
            DVec3::new(-x, y, -z)
        } else {
            DVec3::new(x, y, z)
        }
    }
}

/// Diagnostics of a successful run. Informational only.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    pub vertex_count: usize,
    pub normal_count: usize,
    pub face_count: usize,
    pub triangle_count: usize,
    pub malformed_triangles: usize,
    pub degenerate_triangles: usize,
    pub malformed_vertices: usize,
    pub convention: IndexConvention,
    pub transform: NormalizingTransform,
}

/// A finished building buffer together with its diagnostics.
#[derive(Debug, Clone)]
pub struct Ingested {
    pub buffer: GeometryBuffer,
    pub report: IngestReport,
}

/// Ingests OBJ text into a fresh buffer.
pub fn ingest(text: &str, options: &IngestOptions) -> Result<Ingested, IngestError> {
    build(&RawMesh::parse(text), options)
}

/// Ingests OBJ text into `out`, replacing its contents only on success.
pub fn ingest_into(
    text: &str,
    options: &IngestOptions,
    out: &mut GeometryBuffer,
) -> Result<IngestReport, IngestError> {
    let Ingested { mut buffer, report } = ingest(text, options)?;
    out.clear();
    out.append(&mut buffer);
    Ok(report)
}

/// Fan decomposition `(f0, fi, fi+1)` for `i` in `1..len-1`, keeping winding order.
pub fn fan_triangles<T: Copy>(face: &[T]) -> impl Iterator<Item = [T; 3]> + '_ {
    (1..face.len().saturating_sub(1)).map(move |i| [face[0], face[i], face[i + 1]])
}

/// Unit normal of `(p1 - p0) x (p2 - p0)`, or `None` for a zero-area triangle.
pub fn flat_normal(p0: DVec3, p1: DVec3, p2: DVec3) -> Option<DVec3> {
    let n = (p1 - p0).cross(p2 - p0);
    let len = n.length();
    if !len.is_finite() || len < DEGENERATE_EPSILON {
        return None;
    }
    Some(n / len)
}

/// Axis-aligned bounds over the parsed vertices, skipping unparsable slots.
pub fn bounds(mesh: &RawMesh) -> Option<(DVec3, DVec3)> {
    mesh.vertices
        .iter()
        .flatten()
        .fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Runs steps 2-6 of the pipeline on an already parsed mesh.
pub fn build(mesh: &RawMesh, options: &IngestOptions) -> Result<Ingested, IngestError> {
    let vertex_count = mesh.vertex_count();
    if vertex_count == 0 {
        return Err(IngestError::NoVertices);
    }

    let (min, max) = bounds(mesh).ok_or(IngestError::DegenerateBounds { extent: f64::NAN })?;
    let transform = NormalizingTransform::from_bounds(min, max, options)?;
    let convention = IndexConvention::detect(mesh.has_zero_index, mesh.max_raw_index, vertex_count);

    debug!(
        "OBJ bounds min=({:.3},{:.3},{:.3}) max=({:.3},{:.3},{:.3}); {:?}; scale={:.6} lift={:.3}",
        min.x, min.y, min.z, max.x, max.y, max.z, convention, transform.scale, transform.vertical_offset
    );

    let lookup = |raw: i64| -> Option<DVec3> {
        convention
            .resolve(raw, vertex_count)
            .and_then(|i| mesh.vertices[i])
    };

    let mut buffer = GeometryBuffer::with_capacity(mesh.faces.len() * 3);
    let mut malformed = 0usize;
    let mut degenerate = 0usize;

    for face in &mesh.faces {
        for [a, b, c] in fan_triangles(face.as_slice()) {
            let corners = match (lookup(a), lookup(b), lookup(c)) {
                (Some(v0), Some(v1), Some(v2)) => Ok([v0, v1, v2].map(|v| transform.apply(v))),
                _ => Err(TriangleFault::IndexOutOfRange),
            };
            let triangle = corners.and_then(|p| {
                flat_normal(p[0], p[1], p[2])
                    .map(|n| (p, n))
                    .ok_or(TriangleFault::Degenerate)
            });

            match triangle {
                Ok((corners, normal)) => buffer.push_flat_triangle(
                    corners.map(|p| p.as_vec3().to_array()),
                    normal.as_vec3().to_array(),
                    options.surface_color,
                ),
                Err(TriangleFault::IndexOutOfRange) => malformed += 1,
                Err(TriangleFault::Degenerate) => degenerate += 1,
            }
        }
    }

    let triangle_count = buffer.triangle_count();
    if triangle_count == 0 {
        return Err(IngestError::NoTrianglesProduced {
            faces: mesh.faces.len(),
            malformed,
            degenerate,
        });
    }

    if malformed > 0 {
        warn!("Skipped {} triangles with unresolvable corners", malformed);
    }
    if mesh.malformed_vertices > 0 {
        warn!("{} vertex lines could not be parsed", mesh.malformed_vertices);
    }

    info!(
        "Loaded {} vertices, {} normals, {} faces, {} triangles",
        vertex_count,
        mesh.normals.len(),
        mesh.faces.len(),
        triangle_count
    );

    Ok(Ingested {
        buffer,
        report: IngestReport {
            vertex_count,
            normal_count: mesh.normals.len(),
            face_count: mesh.faces.len(),
            triangle_count,
            malformed_triangles: malformed,
            degenerate_triangles: degenerate,
            malformed_vertices: mesh.malformed_vertices,
            convention,
            transform,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn detects_zero_based_from_zero_reference() {
        assert_eq!(IndexConvention::detect(true, 10, 100), IndexConvention::ZeroBased);
    }

    #[test]
    fn detects_zero_based_from_max_reference() {
        assert_eq!(IndexConvention::detect(false, 99, 100), IndexConvention::ZeroBased);
        assert_eq!(IndexConvention::detect(false, 100, 100), IndexConvention::OneBased);
    }

    #[test]
    fn one_based_file_using_all_but_last_vertex_is_read_as_zero_based() {
        // Accepted ambiguity of the heuristic.
        assert_eq!(IndexConvention::detect(false, 3, 4), IndexConvention::ZeroBased);
    }

    #[test]
    fn resolves_last_vertex_in_both_conventions() {
        let n = 8;
        assert_eq!(IndexConvention::OneBased.resolve(8, n), Some(7));
        assert_eq!(IndexConvention::ZeroBased.resolve(7, n), Some(7));
        assert_eq!(IndexConvention::OneBased.resolve(-1, n), Some(7));
        assert_eq!(IndexConvention::ZeroBased.resolve(-1, n), Some(7));
    }

    #[test]
    fn zero_and_out_of_range_references_are_absent() {
        assert_eq!(IndexConvention::ZeroBased.resolve(0, 4), None);
        assert_eq!(IndexConvention::OneBased.resolve(0, 4), None);
        assert_eq!(IndexConvention::OneBased.resolve(5, 4), None);
        assert_eq!(IndexConvention::ZeroBased.resolve(4, 4), None);
        assert_eq!(IndexConvention::OneBased.resolve(-5, 4), None);
    }

    #[test]
    fn fan_of_k_gon_has_k_minus_two_triangles() {
        for k in 3..10 {
            let face: Vec<i64> = (1..=k).collect();
            let tris: Vec<_> = fan_triangles(&face[..]).collect();
            assert_eq!(tris.len(), k as usize - 2);
            for (i, t) in tris.iter().enumerate() {
                assert_eq!(*t, [1, i as i64 + 2, i as i64 + 3]);
            }
        }
        assert_eq!(fan_triangles(&[1, 2][..]).count(), 0);
    }

    #[test]
    fn flat_normal_follows_winding() {
        let n = flat_normal(DVec3::ZERO, DVec3::X, DVec3::Z).unwrap();
        assert_relative_eq!(n.y, -1.0);
        let n = flat_normal(DVec3::ZERO, DVec3::Z, DVec3::X).unwrap();
        assert_relative_eq!(n.y, 1.0);
        assert!(flat_normal(DVec3::ZERO, DVec3::X, DVec3::X * 2.0).is_none());
    }

    #[test]
    fn transform_uses_horizontal_extent_only() {
        let options = IngestOptions {
            target_footprint: 100.0,
            ..Default::default()
        };
        let t = NormalizingTransform::from_bounds(
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(10.0, 500.0, 5.0),
            &options,
        )
        .unwrap();
        assert_relative_eq!(t.scale, 9.0);
        assert_relative_eq!(t.vertical_offset, 2.0);
        assert_relative_eq!(t.center.y, 250.0);

        let p = t.apply(DVec3::new(10.0, 500.0, 0.0));
        assert_relative_eq!(p.x, 45.0);
        assert_relative_eq!(p.z, -22.5);
        assert_relative_eq!(p.y, 250.0 * 9.0 + 2.0);
    }

    #[test]
    fn rotation_flips_horizontal_axes() {
        let options = IngestOptions {
            target_footprint: 10.0,
            rotate_y_180: true,
            ..Default::default()
        };
        let t = NormalizingTransform::from_bounds(DVec3::ZERO, DVec3::new(2.0, 0.0, 2.0), &options)
            .unwrap();
        let p = t.apply(DVec3::new(2.0, 0.0, 0.0));
        assert_relative_eq!(p.x, -4.5);
        assert_relative_eq!(p.z, 4.5);
    }

    #[test]
    fn zero_horizontal_extent_is_rejected() {
        let err = NormalizingTransform::from_bounds(
            DVec3::new(1.0, 0.0, 1.0),
            DVec3::new(1.0, 9.0, 1.0),
            &IngestOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, IngestError::DegenerateBounds { .. }));
    }

    #[test]
    fn bounds_skip_unparsable_vertices() {
        let mesh = RawMesh::parse("v 1 2 3\nv a b c\nv -1 0 5\n");
        let (lo, hi) = bounds(&mesh).unwrap();
        assert_eq!(lo, DVec3::new(-1.0, 0.0, 3.0));
        assert_eq!(hi, DVec3::new(1.0, 2.0, 5.0));
    }
}
