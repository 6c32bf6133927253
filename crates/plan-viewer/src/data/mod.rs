// src/data/mod.rs
//! GPU-side data for the viewer: uniform layouts and uploaded mesh handles.

pub mod types;

pub use self::types::{DrawFlags, DrawUniforms, FrameUniforms, MeshGpu};
