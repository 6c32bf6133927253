//! Plan image resolution: the first decodable candidate in the assets directory wins.

use anyhow::{bail, Result};
use image::RgbaImage;
use std::path::{Path, PathBuf};

/// Candidate file names, tried in order.
pub const PLAN_CANDIDATES: [&str; 4] = ["plan.jpg", "plan.jpeg", "plan.png", "plan.webp"];

#[derive(Debug)]
pub struct PlanImage {
    pub path: PathBuf,
    pub image: RgbaImage,
}

pub fn candidate_paths(dir: &Path) -> Vec<PathBuf> {
    PLAN_CANDIDATES.iter().map(|name| dir.join(name)).collect()
}

/// Loads the plan image from `dir`, shrinking it to fit `max_dimension`.
pub fn load_plan_image(dir: &Path, max_dimension: u32) -> Result<PlanImage> {
    for path in candidate_paths(dir) {
        match image::open(&path) {
            Ok(img) => {
                let img = if img.width() > max_dimension || img.height() > max_dimension {
                    log::info!(
                        "Plan image {}x{} exceeds {}px; downscaling",
                        img.width(),
                        img.height(),
                        max_dimension
                    );
                    img.resize(max_dimension, max_dimension, image::imageops::FilterType::Triangle)
                } else {
                    img
                };

                log::info!("Plan image {} ({}x{})", path.display(), img.width(), img.height());
                return Ok(PlanImage {
                    path,
                    image: img.to_rgba8(),
                });
            }
            Err(e) => log::debug!("Plan candidate {} unusable: {}", path.display(), e),
        }
    }

    bail!(
        "plan image not found in {} (tried {})",
        dir.display(),
        PLAN_CANDIDATES.join(", ")
    )
}
