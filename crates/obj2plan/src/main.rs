//! Batch converter: normalizes every `.obj` (or zipped `.obj`) under a directory
//! into the plan viewer's frame and writes it back out as OBJ.

mod convert;
mod index;

use anyhow::{Context, Result};
use clap::Parser;
use convert::{process_one_mesh, MeshRecord, Status};
use log::info;
use planmesh::IngestOptions;
use rayon::prelude::*;
use std::{
    fs::{self, File},
    io::BufWriter,
    path::Path,
};

#[derive(Parser, Debug, Clone)]
#[command(name = "obj2plan", version)]
struct Args {
    #[arg(long, default_value = "models")]
    input_dir: String,

    #[arg(long, default_value = "models_out")]
    output_dir: String,

    /// Side of the square footprint models are fitted into (plan units).
    #[arg(long, default_value_t = 220.0)]
    footprint: f64,

    /// Turn every model 180 degrees about the vertical axis.
    #[arg(long, default_value_t = false)]
    rotate_y180: bool,

    #[arg(long, default_value_t = false)]
    overwrite: bool,

    /// Optional path of a JSON report with one record per input.
    #[arg(long)]
    report: Option<String>,
}

impl Args {
    fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            target_footprint: self.footprint,
            rotate_y_180: self.rotate_y180,
            ..Default::default()
        }
    }
}

fn write_report(path: &str, records: &[MeshRecord]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating report {path}"))?;
    serde_json::to_writer_pretty(BufWriter::new(file), records)
        .with_context(|| format!("writing report {path}"))?;
    info!("Report written to {path}");
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let output_dir = Path::new(&args.output_dir);
    fs::create_dir_all(output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;

    let local_index = index::build_local_index(Path::new(&args.input_dir));
    if local_index.is_empty() {
        log::warn!("No .obj or .zip files found in '{}'", args.input_dir);
    }

    let options = args.ingest_options();
    let items: Vec<_> = local_index.into_iter().collect();

    info!("Processing {} items...", items.len());

    let records: Vec<MeshRecord> = items
        .par_iter()
        .map(|(stem, path)| process_one_mesh(path, stem, output_dir, &options, args.overwrite))
        .collect();

    let count = |status| records.iter().filter(|r| r.status == status).count();
    info!(
        "Done: {} converted, {} skipped, {} failed",
        count(Status::Converted),
        count(Status::Skipped),
        count(Status::Failed)
    );

    if let Some(report) = &args.report {
        write_report(report, &records)?;
    }

    Ok(())
}
