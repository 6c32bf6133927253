use crate::{
    camera::{Camera, CameraController},
    config::{CameraConfig, ViewerConfig},
    data::types::{DrawFlags, FrameUniforms, MeshGpu},
    loader::{LoadResult, ModelLoader},
    renderer::{DrawItem, Renderer},
    texture::load_plan_image,
    ui::{self, HudStats, Notices, UiAction},
};
use anyhow::{Context as _, Result};
use planmesh::{add_plane, build_plan_mock, write_obj, GeometryBuffer, IngestReport};
use std::{fs::File, io::BufWriter, sync::Arc};
use winit::{
    event::{ElementState, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

const LIGHT_DIR: [f32; 3] = [-0.3, -1.0, -0.2];
const FLOOR_COLOR: [f32; 3] = [0.6, 0.6, 0.6];

/// The building currently on screen: CPU copy for export plus its GPU handle.
/// Always replaced as a unit.
pub struct BuildingSlot {
    pub geometry: GeometryBuffer,
    pub gpu: MeshGpu,
    pub report: Option<IngestReport>,
}

pub struct App {
    pub renderer: Renderer,
    pub camera: Camera,
    pub camera_controller: CameraController,
    pub egui_ctx: egui::Context,
    pub egui_state: egui_winit::State,

    config: ViewerConfig,
    floor: MeshGpu,
    building: BuildingSlot,
    /// Walls and rooms of the plan mock; empty when a model file is used.
    extras: Vec<MeshGpu>,
    loader: ModelLoader,
    notices: Notices,
    show_plan: bool,
    plan_loaded: bool,
}

impl App {
    pub async fn new(window: Arc<Window>, config: ViewerConfig) -> Result<Self> {
        let mut renderer = Renderer::new(window.clone()).await?;

        let camera = Camera::new(CameraConfig::default(), renderer.gfx.aspect());
        let camera_controller = CameraController::new();

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            &*window,
            None,
            None,
        );

        let mut notices = Notices::default();

        let mut floor_geometry = GeometryBuffer::with_capacity(6);
        add_plane(
            &mut floor_geometry,
            [0.0; 3],
            config.plan_size,
            config.plan_size,
            FLOOR_COLOR,
            config.plane_options(),
        );
        let floor = renderer.upload(&floor_geometry, "Floor");

        let plan_loaded = match load_plan_image(&config.assets_dir, renderer.max_texture_dimension()) {
            Ok(plan) => {
                let (w, h) = plan.image.dimensions();
                renderer.set_plan_image(w, h, plan.image.as_raw());
                true
            }
            Err(e) => {
                log::warn!("{e:#}");
                notices.push(format!("{e:#}"));
                false
            }
        };

        let empty = GeometryBuffer::new();
        let mut app = Self {
            building: BuildingSlot {
                gpu: renderer.upload(&empty, "Building"),
                geometry: empty,
                report: None,
            },
            renderer,
            camera,
            camera_controller,
            egui_ctx,
            egui_state,
            config,
            floor,
            extras: Vec::new(),
            loader: ModelLoader::new(),
            notices,
            show_plan: true,
            plan_loaded,
        };

        if app.config.mock {
            app.install_mock();
        } else {
            app.request_model();
        }

        Ok(app)
    }

    fn install_mock(&mut self) {
        let mock = build_plan_mock(self.config.plan_size);
        log::info!(
            "Showing plan mock ({} triangles)",
            mock.contour.triangle_count() + mock.walls.triangle_count() + mock.rooms.triangle_count()
        );

        self.extras = vec![
            self.renderer.upload(&mock.walls, "Mock Walls"),
            self.renderer.upload(&mock.rooms, "Mock Rooms"),
        ];
        let gpu = self.renderer.upload(&mock.contour, "Building");
        self.replace_building(mock.contour, gpu, None);
    }

    fn request_model(&mut self) {
        let path = self.config.model.clone();
        match self.loader.request(path, self.config.ingest_options()) {
            Ok(true) => {}
            Ok(false) => self.notices.push("A model is already loading."),
            Err(e) => {
                log::error!("Failed to start model loader: {e}");
                self.notices.push(format!("Could not start loading: {e}"));
            }
        }
    }

    /// Swaps in a new building and frees the superseded GPU buffers.
    fn replace_building(&mut self, geometry: GeometryBuffer, gpu: MeshGpu, report: Option<IngestReport>) {
        let old = std::mem::replace(
            &mut self.building,
            BuildingSlot {
                geometry,
                gpu,
                report,
            },
        );
        old.gpu.release();
    }

    fn finish_load(&mut self, result: LoadResult) {
        match result {
            Ok(ingested) => {
                let gpu = self.renderer.upload(&ingested.buffer, "Building");
                log::info!(
                    "Model ready: {} triangles ({} skipped)",
                    ingested.report.triangle_count,
                    ingested.report.malformed_triangles + ingested.report.degenerate_triangles
                );
                self.replace_building(ingested.buffer, gpu, Some(ingested.report));
            }
            Err(e) => {
                // The previous building stays on screen.
                log::error!("Model load failed ({:?}): {}", e.kind(), e);
                self.notices.push(format!("Model load failed: {e}"));
            }
        }
    }

    pub fn export(&mut self) {
        if self.building.geometry.is_empty() {
            self.notices.push("Nothing to export yet.");
            return;
        }

        match self.write_export() {
            Ok(()) => log::info!(
                "Exported {} triangles to {}",
                self.building.geometry.triangle_count(),
                self.config.export_path.display()
            ),
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.notices.push(format!("Export failed: {e:#}"));
            }
        }
    }

    fn write_export(&self) -> Result<()> {
        let path = &self.config.export_path;
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        write_obj(BufWriter::new(file), &self.building.geometry)
            .with_context(|| format!("writing {}", path.display()))
    }

    fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::TogglePlan => self.show_plan = !self.show_plan,
            UiAction::Export => self.export(),
            UiAction::Reload if self.config.mock => {}
            UiAction::Reload => self.request_model(),
        }
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.renderer.resize(new_size);
            self.camera.set_aspect(self.renderer.gfx.aspect());
        }
    }

    pub fn handle_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        let response = self.egui_state.on_window_event(window, event);
        if response.consumed {
            return true;
        }

        if let WindowEvent::KeyboardInput { event: key, .. } = event {
            if key.state == ElementState::Pressed && !key.repeat {
                let action = match key.physical_key {
                    PhysicalKey::Code(KeyCode::KeyP) => Some(UiAction::TogglePlan),
                    PhysicalKey::Code(KeyCode::KeyE) => Some(UiAction::Export),
                    PhysicalKey::Code(KeyCode::KeyL) => Some(UiAction::Reload),
                    _ => None,
                };
                if let Some(action) = action {
                    self.apply(action);
                    return true;
                }
            }
        }

        if self.camera_controller.handle_event(event, &mut self.camera) {
            return true;
        }

        if let WindowEvent::Resized(physical_size) = event {
            self.resize(*physical_size);
        }

        false
    }

    /// Per-frame bookkeeping that must not block.
    fn update(&mut self) {
        if let Some(result) = self.loader.poll() {
            self.finish_load(result);
        }
    }

    fn hud_stats(&self) -> HudStats {
        let source = if self.config.mock {
            "Plan mock".to_string()
        } else {
            self.config.model.display().to_string()
        };
        let skipped = self
            .building
            .report
            .as_ref()
            .map_or(0, |r| r.malformed_triangles + r.degenerate_triangles);

        HudStats {
            triangles: self.building.geometry.triangle_count()
                + self.extras.iter().map(|m| m.triangle_count() as usize).sum::<usize>(),
            skipped_triangles: skipped,
            loading: self.loader.is_loading(),
            source,
        }
    }

    pub fn render(&mut self, window: &Window) -> Result<(), wgpu::SurfaceError> {
        self.update();

        let frame = self.renderer.gfx.surface.get_current_texture()?;
        let swap_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let frame_uniforms = FrameUniforms {
            view_proj: self.camera.view_proj().to_cols_array_2d(),
            light_dir: LIGHT_DIR,
            _pad0: 0.0,
        };

        let building_flags = DrawFlags {
            use_texture: false,
            floor_step: self.config.floor_step,
            floor_band: self.config.floor_band,
        };

        let mut draws = Vec::with_capacity(2 + self.extras.len());
        if self.show_plan {
            draws.push(DrawItem {
                mesh: &self.floor,
                flags: DrawFlags {
                    use_texture: self.plan_loaded,
                    ..building_flags
                },
            });
        }
        draws.push(DrawItem {
            mesh: &self.building.gpu,
            flags: building_flags,
        });
        draws.extend(self.extras.iter().map(|mesh| DrawItem {
            mesh,
            flags: building_flags,
        }));

        self.renderer.render(&swap_view, &frame_uniforms, &draws);

        let hud = self.hud_stats();
        let egui_input = self.egui_state.take_egui_input(window);
        self.egui_ctx.begin_frame(egui_input);

        let actions = ui::draw_controls(&self.egui_ctx, self.show_plan, !self.config.mock && !hud.loading);
        ui::draw_hud(&self.egui_ctx, &hud);
        ui::draw_notices(&self.egui_ctx, &mut self.notices);

        let egui_output = self.egui_ctx.end_frame();
        self.egui_state
            .handle_platform_output(window, egui_output.platform_output);
        let shapes = self
            .egui_ctx
            .tessellate(egui_output.shapes, self.egui_ctx.pixels_per_point());

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [
                self.renderer.gfx.config.width,
                self.renderer.gfx.config.height,
            ],
            pixels_per_point: self.egui_ctx.pixels_per_point(),
        };

        let mut encoder = self
            .renderer
            .gfx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("UI Encoder"),
            });

        for (id, delta) in &egui_output.textures_delta.set {
            self.renderer.egui_renderer.update_texture(
                &self.renderer.gfx.device,
                &self.renderer.gfx.queue,
                *id,
                delta,
            );
        }

        self.renderer.egui_renderer.update_buffers(
            &self.renderer.gfx.device,
            &self.renderer.gfx.queue,
            &mut encoder,
            &shapes,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("EGUI Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &swap_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.renderer
                .egui_renderer
                .render(&mut render_pass, &shapes, &screen_descriptor);
        }

        for id in &egui_output.textures_delta.free {
            self.renderer.egui_renderer.free_texture(id);
        }

        self.renderer
            .gfx
            .queue
            .submit(std::iter::once(encoder.finish()));
        frame.present();

        for action in actions {
            self.apply(action);
        }

        Ok(())
    }
}
