use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification shared by every failure the viewer can surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No vertices found, or the file could not be read as text.
    ParseFailure,
    /// Zero horizontal extent, or nothing but zero-area triangles.
    DegenerateGeometry,
    /// A face index resolved outside the vertex list.
    IndexOutOfRange,
    /// The mesh file or texture candidates could not be opened.
    ResourceUnavailable,
}

/// File-level ingestion failures. The output buffer is left untouched when one is returned.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("mesh contains no vertices")]
    NoVertices,

    #[error("mesh bounds are degenerate (horizontal extent {extent})")]
    DegenerateBounds { extent: f64 },

    #[error(
        "no triangles produced from {faces} faces ({malformed} malformed, {degenerate} degenerate)"
    )]
    NoTrianglesProduced {
        faces: usize,
        malformed: usize,
        degenerate: usize,
    },
}

impl IngestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IngestError::NoVertices => ErrorKind::ParseFailure,
            IngestError::DegenerateBounds { .. } => ErrorKind::DegenerateGeometry,
            IngestError::NoTrianglesProduced {
                malformed,
                degenerate,
                ..
            } => {
                // Any zero-area triangle makes the failure geometric.
                let dominant = if *malformed > 0 && *degenerate == 0 {
                    TriangleFault::IndexOutOfRange
                } else {
                    TriangleFault::Degenerate
                };
                dominant.kind()
            }
        }
    }
}

/// Failures of the file-to-buffer path.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {}: {source}", path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

impl LoadError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LoadError::Unavailable { .. } => ErrorKind::ResourceUnavailable,
            LoadError::Read { .. } => ErrorKind::ParseFailure,
            LoadError::Ingest(e) => e.kind(),
        }
    }
}

/// Per-triangle anomalies. Recovered locally: the triangle is dropped and counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriangleFault {
    /// A corner index was zero, out of range, or pointed at an unparsable vertex.
    IndexOutOfRange,
    /// Zero-area triangle; its normal is undefined.
    Degenerate,
}

impl TriangleFault {
    pub fn kind(self) -> ErrorKind {
        match self {
            TriangleFault::IndexOutOfRange => ErrorKind::IndexOutOfRange,
            TriangleFault::Degenerate => ErrorKind::DegenerateGeometry,
        }
    }
}
