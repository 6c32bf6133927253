//! Core data types for the plan viewer, focused on GPU data representation.

use planmesh::InterleavedVertex;

/// Per-frame uniform buffer data.
/// Must match the layout of `FrameUniforms` in `scene.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct FrameUniforms {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Direction the light travels in (not normalized).
    pub light_dir: [f32; 3],
    pub _pad0: f32,
}

const _: [(); 80] = [(); std::mem::size_of::<FrameUniforms>()];

/// Per-draw uniform buffer data.
/// Must match the layout of `DrawUniforms` in `scene.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable, Debug, Default, PartialEq)]
pub struct DrawUniforms {
    /// 1.0 samples the plan texture, 0.0 uses vertex colors.
    pub use_texture: f32,
    /// Height between stripes; 0 disables them.
    pub floor_step: f32,
    /// Stripe half-width as a fraction of `floor_step`.
    pub floor_band: f32,
    pub _pad0: f32,
}

const _: [(); 16] = [(); std::mem::size_of::<DrawUniforms>()];

/// What a single draw call should do with its mesh.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DrawFlags {
    pub use_texture: bool,
    pub floor_step: f32,
    pub floor_band: f32,
}

impl DrawFlags {
    pub fn textured() -> Self {
        Self {
            use_texture: true,
            ..Default::default()
        }
    }

    pub fn to_uniform(self) -> DrawUniforms {
        DrawUniforms {
            use_texture: if self.use_texture { 1.0 } else { 0.0 },
            floor_step: self.floor_step,
            floor_band: self.floor_band,
            _pad0: 0.0,
        }
    }
}

/// Holds all GPU resources for one uploaded mesh.
#[derive(Debug)]
pub struct MeshGpu {
    pub label: String,
    pub vertex_count: u32,

    /// Vertex buffer containing `InterleavedVertex` data. `None` for an empty mesh.
    pub vtx: Option<wgpu::Buffer>,
    /// Uniform buffer containing `DrawUniforms` data.
    pub ubo: wgpu::Buffer,
    /// Bind group connecting the UBO to the pipeline.
    pub bind: wgpu::BindGroup,
}

impl MeshGpu {
    pub const VERTEX_STRIDE: u64 = std::mem::size_of::<InterleavedVertex>() as u64;

    pub fn triangle_count(&self) -> u32 {
        self.vertex_count / 3
    }

    /// Frees the GPU memory now instead of when the last reference drops.
    pub fn release(self) {
        log::debug!("Releasing mesh '{}' ({} vertices)", self.label, self.vertex_count);
        if let Some(vtx) = &self.vtx {
            vtx.destroy();
        }
        self.ubo.destroy();
    }
}
