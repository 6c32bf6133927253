//! Converts one input model into a normalized OBJ.

use crate::index::is_zip;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use planmesh::{load_obj_file, load_obj_reader, write_obj, IngestOptions, Ingested, LoadError};
use serde::Serialize;
use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Converted,
    Skipped,
    Failed,
}

/// One line of the run report.
#[derive(Debug, Clone, Serialize)]
pub struct MeshRecord {
    pub input: PathBuf,
    pub output: PathBuf,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    pub triangles: usize,
    pub malformed_triangles: usize,
    pub degenerate_triangles: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zero_based: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
}

impl MeshRecord {
    fn new(input: &Path, output: &Path, status: Status) -> Self {
        Self {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            status,
            error: None,
            error_kind: None,
            triangles: 0,
            malformed_triangles: 0,
            degenerate_triangles: 0,
            zero_based: None,
            scale: None,
        }
    }
}

pub fn output_path(output_dir: &Path, stem: &str) -> PathBuf {
    output_dir.join(format!("{stem}.obj"))
}

/// Loads `path` (plain `.obj`, or `.zip` holding one) through the ingestion pipeline.
pub fn load_input(path: &Path, options: &IngestOptions) -> Result<Ingested> {
    if !is_zip(path) {
        return Ok(load_obj_file(path, options)?);
    }

    debug!("Opening ZIP archive {}", path.display());
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut archive = zip::ZipArchive::new(file)?;

    let obj_name = archive
        .file_names()
        .find(|n| n.to_ascii_lowercase().ends_with(".obj"))
        .context("No .obj file found in zip archive")?
        .to_owned();

    debug!("Found OBJ file in ZIP: {}", obj_name);
    let obj_file = archive.by_name(&obj_name)?;
    Ok(load_obj_reader(obj_file, &path.join(&obj_name), options)?)
}

/// Converts one input; failures are captured in the record, not returned.
pub fn process_one_mesh(
    path: &Path,
    stem: &str,
    output_dir: &Path,
    options: &IngestOptions,
    overwrite: bool,
) -> MeshRecord {
    let out_path = output_path(output_dir, stem);

    if out_path.exists() && !overwrite {
        debug!("Skipping existing file: {}", out_path.display());
        return MeshRecord::new(path, &out_path, Status::Skipped);
    }

    info!("Processing {} -> {}", path.display(), out_path.display());

    match convert(path, &out_path, options) {
        Ok(ingested) => {
            let report = &ingested.report;
            info!(
                "OK {} -> {} ({} triangles, scale {:.4})",
                path.display(),
                out_path.display(),
                report.triangle_count,
                report.transform.scale
            );
            MeshRecord {
                triangles: report.triangle_count,
                malformed_triangles: report.malformed_triangles,
                degenerate_triangles: report.degenerate_triangles,
                zero_based: Some(report.convention == planmesh::IndexConvention::ZeroBased),
                scale: Some(report.transform.scale),
                ..MeshRecord::new(path, &out_path, Status::Converted)
            }
        }
        Err(err) => {
            warn!("Error processing {}: {:#}", path.display(), err);
            MeshRecord {
                error: Some(format!("{err:#}")),
                error_kind: err
                    .downcast_ref::<LoadError>()
                    .map(|e| format!("{:?}", e.kind())),
                ..MeshRecord::new(path, &out_path, Status::Failed)
            }
        }
    }
}

fn convert(path: &Path, out_path: &Path, options: &IngestOptions) -> Result<Ingested> {
    let ingested = load_input(path, options)?;

    debug!("Writing OBJ to {}", out_path.display());
    let file = File::create(out_path).with_context(|| format!("creating {}", out_path.display()))?;
    write_obj(BufWriter::new(file), &ingested.buffer)
        .with_context(|| format!("writing {}", out_path.display()))?;

    Ok(ingested)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, io::Write};

    const QUAD: &str = "v 0 0 0\nv 2 0 0\nv 2 1 2\nv 0 1 2\nf 1 2 3 4\n";

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("obj2plan-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn converts_plain_obj_and_skips_existing() {
        let dir = scratch_dir("plain");
        let input = dir.join("quad.obj");
        fs::write(&input, QUAD).unwrap();
        let out_dir = dir.join("out");
        fs::create_dir_all(&out_dir).unwrap();

        let rec = process_one_mesh(&input, "quad", &out_dir, &IngestOptions::default(), false);
        assert_eq!(rec.status, Status::Converted);
        assert_eq!(rec.triangles, 2);
        let written = fs::read_to_string(out_dir.join("quad.obj")).unwrap();
        assert!(written.starts_with("# Exported 3D Building Model\n# Vertices: 6\n"));

        let again = process_one_mesh(&input, "quad", &out_dir, &IngestOptions::default(), false);
        assert_eq!(again.status, Status::Skipped);
        let forced = process_one_mesh(&input, "quad", &out_dir, &IngestOptions::default(), true);
        assert_eq!(forced.status, Status::Converted);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn reads_obj_from_zip() {
        let dir = scratch_dir("zip");
        let input = dir.join("model.zip");
        {
            let mut zw = zip::ZipWriter::new(File::create(&input).unwrap());
            let opts = zip::write::FileOptions::default()
                .compression_method(zip::CompressionMethod::Stored);
            zw.start_file("readme.txt", opts).unwrap();
            zw.write_all(b"hello").unwrap();
            zw.start_file("Model.OBJ", opts).unwrap();
            zw.write_all(QUAD.as_bytes()).unwrap();
            zw.finish().unwrap();
        }

        let out = load_input(&input, &IngestOptions::default()).unwrap();
        assert_eq!(out.report.triangle_count, 2);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn failures_are_recorded_with_kind() {
        let dir = scratch_dir("fail");
        let input = dir.join("flat.obj");
        fs::write(&input, "v 1 0 1\nv 1 3 1\nv 1 5 1\nf 1 2 3\n").unwrap();

        let out_dir = dir.join("out");
        fs::create_dir_all(&out_dir).unwrap();

        let rec = process_one_mesh(&input, "flat", &out_dir, &IngestOptions::default(), false);
        assert_eq!(rec.status, Status::Failed);
        assert_eq!(rec.error_kind.as_deref(), Some("DegenerateGeometry"));
        assert!(!out_dir.join("flat.obj").exists());

        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["status"], "failed");
        assert!(json.get("scale").is_none());

        fs::remove_dir_all(&dir).unwrap();
    }
}
