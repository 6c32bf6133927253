//! File and reader entry points into the ingestion pipeline.

use crate::error::LoadError;
use crate::ingest::{build, IngestOptions, Ingested};
use crate::parse::RawMesh;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Invalid UTF-8 (Latin-1 comments from CAD exporters) is replaced, not rejected.
fn parse_bytes(bytes: &[u8]) -> RawMesh {
    RawMesh::parse(&String::from_utf8_lossy(bytes))
}

/// Fast path: prefer mmap; fall back to a single read.
#[cfg(feature = "mmap")]
fn read_raw_mesh(file: File) -> io::Result<RawMesh> {
    // An empty file cannot be mapped on every platform.
    if file.metadata()?.len() == 0 {
        return Ok(RawMesh::default());
    }
    let map = unsafe { memmap2::MmapOptions::new().map(&file)? };
    Ok(parse_bytes(&map))
}

#[cfg(not(feature = "mmap"))]
fn read_raw_mesh(mut file: File) -> io::Result<RawMesh> {
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(parse_bytes(&bytes))
}

/// Reads, parses and ingests an OBJ file.
pub fn load_obj_file<P: AsRef<Path>>(path: P, options: &IngestOptions) -> Result<Ingested, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Unavailable {
        path: path.to_path_buf(),
        source,
    })?;

    let raw = read_raw_mesh(file).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(build(&raw, options)?)
}

/// Parses and ingests OBJ text from any reader (zip entries, stdin, ...).
/// `origin` only labels errors.
pub fn load_obj_reader<R: Read>(
    reader: R,
    origin: &Path,
    options: &IngestOptions,
) -> Result<Ingested, LoadError> {
    let raw = RawMesh::read(BufReader::new(reader)).map_err(|source| LoadError::Read {
        path: origin.to_path_buf(),
        source,
    })?;

    Ok(build(&raw, options)?)
}
