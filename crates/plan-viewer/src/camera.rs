use crate::config::CameraConfig;
use glam::{Mat4, Vec3};
use winit::{
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

/// Approximate browser pixel delta of one wheel notch.
const LINE_DELTA_PX: f32 = 100.0;

/// Orbit camera circling a target point on a sphere of radius `distance`.
#[derive(Debug, Clone)]
pub struct Camera {
    pub target: Vec3,
    pub distance: f32,
    /// Rotation about +Y (radians); unbounded.
    pub yaw: f32,
    /// Elevation above the ground plane (radians); kept within the configured range.
    pub pitch: f32,
    pub proj: Mat4,
    config: CameraConfig,
}

impl Camera {
    pub fn new(config: CameraConfig, aspect: f32) -> Self {
        Self {
            target: config.target,
            distance: config.distance,
            yaw: config.yaw,
            pitch: config.pitch,
            proj: config.projection(aspect),
            config,
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.proj = self.config.projection(aspect);
    }

    /// Restores target, distance, yaw and pitch to their defaults.
    pub fn reset(&mut self) {
        self.target = self.config.target;
        self.distance = self.config.distance;
        self.yaw = self.config.yaw;
        self.pitch = self.config.pitch;
    }

    /// Eye position from the spherical orbit parameters.
    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target
            + Vec3::new(
                cos_pitch * sin_yaw * self.distance,
                sin_pitch * self.distance,
                cos_pitch * cos_yaw * self.distance,
            )
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.proj * self.view()
    }

    /// Applies a pointer drag of (`dx`, `dy`) pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * self.config.orbit_sensitivity;
        self.pitch = (self.pitch + dy * self.config.orbit_sensitivity)
            .clamp(self.config.min_pitch, self.config.max_pitch);
    }

    /// Applies a wheel movement of `delta_px` pixels; positive moves away.
    pub fn zoom(&mut self, delta_px: f32) {
        self.distance = (self.distance + delta_px * self.config.zoom_per_pixel)
            .clamp(self.config.min_distance, self.config.max_distance);
    }
}

/// Idle/dragging state machine feeding pointer input into a [`Camera`].
#[derive(Debug, Default)]
pub struct CameraController {
    dragging: bool,
    last_mouse: Option<(f64, f64)>,
}

impl CameraController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handles window events and updates the camera. Returns true when the
    /// event was used.
    pub fn handle_event(&mut self, event: &WindowEvent, camera: &mut Camera) -> bool {
        match event {
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                self.dragging = *state == ElementState::Pressed;
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_moved((position.x, position.y), camera);
                self.dragging
            }
            WindowEvent::CursorLeft { .. } => {
                self.dragging = false;
                self.last_mouse = None;
                false
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // Browser convention: positive delta scrolls down, i.e. away.
                let delta_px = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -*y * LINE_DELTA_PX,
                    MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
                };
                camera.zoom(delta_px);
                true
            }
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.physical_key == PhysicalKey::Code(KeyCode::KeyR) =>
            {
                camera.reset();
                true
            }
            _ => false,
        }
    }

    fn cursor_moved(&mut self, xy: (f64, f64), camera: &mut Camera) {
        if let Some(last) = self.last_mouse {
            if self.dragging {
                camera.orbit((xy.0 - last.0) as f32, (xy.1 - last.1) as f32);
            }
        }
        self.last_mouse = Some(xy);
    }
}
