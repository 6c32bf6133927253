//! The rendering orchestrator. Owns the GPU context, the depth target, the
//! scene pipeline and the egui renderer.

pub mod context;
pub mod pipelines;
pub mod targets;

use self::{context::GfxContext, pipelines::scene::ScenePipeline, targets::Targets};
use crate::data::types::{DrawFlags, FrameUniforms, MeshGpu};
use planmesh::GeometryBuffer;
use std::sync::Arc;
use winit::window::Window;

pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.88,
    g: 0.88,
    b: 0.88,
    a: 1.0,
};

/// One mesh to draw this frame, with its flags.
pub struct DrawItem<'a> {
    pub mesh: &'a MeshGpu,
    pub flags: DrawFlags,
}

/// Owns all rendering-related state.
pub struct Renderer {
    pub gfx: GfxContext,
    pub targets: Targets,
    pub scene: ScenePipeline,
    pub egui_renderer: egui_wgpu::Renderer,
}

impl Renderer {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let gfx = GfxContext::new(window).await?;
        let targets = Targets::new(&gfx.device, gfx.size);
        let scene = ScenePipeline::new(&gfx.device, &gfx.queue, gfx.config.format, targets.depth_fmt);

        let egui_renderer = egui_wgpu::Renderer::new(&gfx.device, gfx.config.format, None, 1);

        Ok(Self {
            gfx,
            targets,
            scene,
            egui_renderer,
        })
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.gfx.resize(new_size);
            self.targets.resize(&self.gfx.device, new_size);
        }
    }

    /// Uploads a geometry buffer and returns its GPU handle.
    pub fn upload(&self, geometry: &GeometryBuffer, label: &str) -> MeshGpu {
        self.scene.upload(&self.gfx.device, geometry, label)
    }

    /// Largest plan image edge the device accepts.
    pub fn max_texture_dimension(&self) -> u32 {
        self.gfx.device.limits().max_texture_dimension_2d
    }

    pub fn set_plan_image(&mut self, width: u32, height: u32, rgba: &[u8]) {
        self.scene
            .set_plan_image(&self.gfx.device, &self.gfx.queue, width, height, rgba);
    }

    pub fn render(&mut self, swap_view: &wgpu::TextureView, frame: &FrameUniforms, draws: &[DrawItem]) {
        self.scene.write_frame(&self.gfx.queue, frame);
        for item in draws {
            self.scene.write_flags(&self.gfx.queue, item.mesh, item.flags);
        }

        let mut encoder = self
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: swap_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.targets.depth,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            for item in draws {
                self.scene.draw_mesh(&mut pass, item.mesh);
            }
        }

        self.gfx.queue.submit(std::iter::once(encoder.finish()));
    }
}
