//! planmesh: CPU-side geometry for the floor-plan viewer.
//!
//! - `GeometryBuffer`: append-only per-vertex attributes (position, normal, uv, color).
//! - Primitive builders for boxes and the ground plane, plus the procedural plan mock.
//! - OBJ ingestion: parse, detect the index convention, fan-triangulate, normalize onto
//!   the plan footprint and emit flat-shaded triangles.
//! - OBJ export of a finished buffer.
//!
//! Accepted OBJ subset (line oriented, leading whitespace ignored):
//!   `v x y z`        vertex position, extra fields ignored
//!   `vn x y z`       normal, collected but not used (normals are recomputed per face)
//!   `f a b c ...`    face, each token `idx[/vt[/vn]]`; only `idx` is read
//!   anything else    skipped
//!
//! Face indices may be one-based, zero-based or negative (relative to the end of the
//! vertex list). The convention is guessed once per file, see [`IndexConvention`].

pub mod buffer;
pub mod error;
pub mod export;
pub mod ingest;
pub mod io;
pub mod parse;
pub mod plan_mock;
pub mod primitives;

pub use buffer::{GeometryBuffer, InterleavedVertex};
pub use error::{ErrorKind, IngestError, LoadError, TriangleFault};
pub use export::{export_obj, write_obj};
pub use ingest::{
    ingest, ingest_into, IndexConvention, IngestOptions, IngestReport, Ingested,
    NormalizingTransform,
};
pub use io::{load_obj_file, load_obj_reader};
pub use parse::RawMesh;
pub use plan_mock::{build_plan_mock, PlanMock};
pub use primitives::{add_box, add_plane, PlaneOptions};
