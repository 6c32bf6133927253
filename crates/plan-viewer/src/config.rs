//! Command-line and environment configuration for the viewer.

use clap::Parser;
use glam::{Mat4, Vec3};
use planmesh::{IngestOptions, PlaneOptions};
use std::path::PathBuf;

/// Native 3D viewer for a floor plan and the building model traced from it.
#[derive(Parser, Debug, Clone)]
#[command(name = "plan_viewer", version, about)]
pub struct ViewerConfig {
    /// OBJ model to load at startup and on reload.
    #[arg(long, env = "PLAN_VIEWER_MODEL", default_value = "assets/model.obj")]
    pub model: PathBuf,

    /// Directory searched for plan.jpg, plan.jpeg, plan.png or plan.webp.
    #[arg(long, env = "PLAN_VIEWER_ASSETS", default_value = "assets")]
    pub assets_dir: PathBuf,

    /// Side length of the square floor plane in world units.
    #[arg(long, default_value_t = 220.0)]
    pub plan_size: f32,

    /// Mirror the plan image horizontally.
    #[arg(long)]
    pub flip_plan_u: bool,

    /// Mirror the plan image vertically.
    #[arg(long)]
    pub flip_plan_v: bool,

    /// Turn the loaded model 180 degrees about the vertical axis.
    #[arg(long)]
    pub rotate_model_y180: bool,

    /// Show the procedural plan mock instead of loading a model.
    #[arg(long)]
    pub mock: bool,

    /// Where the Export button writes the building as OBJ.
    #[arg(long, default_value = "building_model.obj")]
    pub export_path: PathBuf,

    /// Height between floor stripes; 0 disables them.
    #[arg(long, default_value_t = 0.0)]
    pub floor_step: f32,

    /// Stripe half-width as a fraction of the floor step.
    #[arg(long, default_value_t = 0.0)]
    pub floor_band: f32,
}

impl ViewerConfig {
    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            target_footprint: self.plan_size as f64,
            rotate_y_180: self.rotate_model_y180,
            ..Default::default()
        }
    }

    pub fn plane_options(&self) -> PlaneOptions {
        PlaneOptions {
            flip_u: self.flip_plan_u,
            flip_v: self.flip_plan_v,
        }
    }
}

/// Orbit camera defaults, limits and projection.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Radians per pixel of drag.
    pub orbit_sensitivity: f32,
    /// World units per pixel of wheel delta.
    pub zoom_per_pixel: f32,
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            target: Vec3::new(0.0, 2.0, -10.0),
            distance: 240.0,
            yaw: std::f32::consts::FRAC_PI_4,
            pitch: 0.9,
            min_pitch: 0.2,
            max_pitch: 1.5,
            min_distance: 60.0,
            max_distance: 320.0,
            orbit_sensitivity: 0.005,
            zoom_per_pixel: 0.2,
            fov_y_deg: 55.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl CameraConfig {
    /// wgpu uses 0..1 depth; glam's `perspective_rh` targets exactly that.
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_deg.to_radians(), aspect.max(1e-3), self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse_without_arguments() {
        let cfg = ViewerConfig::parse_from(["plan_viewer"]);
        assert_eq!(cfg.plan_size, 220.0);
        assert!(!cfg.mock && !cfg.rotate_model_y180);
        assert_eq!(cfg.export_path, PathBuf::from("building_model.obj"));
        assert_eq!(cfg.floor_step, 0.0);
    }

    #[test]
    fn flags_flow_into_library_options() {
        let cfg = ViewerConfig::parse_from([
            "plan_viewer",
            "--plan-size",
            "100",
            "--rotate-model-y180",
            "--flip-plan-v",
        ]);
        let ingest = cfg.ingest_options();
        assert_eq!(ingest.target_footprint, 100.0);
        assert!(ingest.rotate_y_180);
        assert_eq!(ingest.surface_color, IngestOptions::default().surface_color);
        assert_eq!(
            cfg.plane_options(),
            PlaneOptions {
                flip_u: false,
                flip_v: true
            }
        );
    }
}
