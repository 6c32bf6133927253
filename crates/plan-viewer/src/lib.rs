// src/lib.rs
//! Native floor-plan viewer library.
//!
//! Draws a textured plan on the ground and the building model traced from it,
//! with an orbit camera, background model loading and OBJ export.

pub mod app;
pub mod camera;
pub mod config;
pub mod data;
pub mod loader;
pub mod renderer;
pub mod texture;
pub mod ui;
