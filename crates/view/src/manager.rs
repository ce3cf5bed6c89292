use crate::camera::Camera;
use glam::{Mat4, Vec3};
use serde::Serialize;
use stilllife_input::Action;
use stilllife_render::{RenderContext, uniforms};

pub const WINDOW_WIDTH: u32 = 1000;
pub const WINDOW_HEIGHT: u32 = 800;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 100.0;
/// Half-width and half-height of the orthographic view volume.
pub const ORTHO_HALF_EXTENT: f32 = 5.0;

const MIN_SPEED: f32 = 0.1;
const SCROLL_SENSITIVITY: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProjectionMode {
    Perspective,
    Orthographic,
}

/// Camera plus projection state, updated from actions once per frame.
#[derive(Debug, Clone)]
pub struct ViewManager {
    camera: Camera,
    mode: ProjectionMode,
    aspect: f32,
}

impl Default for ViewManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewManager {
    pub fn new() -> Self {
        Self {
            camera: Camera::new(
                Vec3::new(0.0, 5.0, 12.0),
                Vec3::new(0.0, -0.5, -2.0),
                Vec3::Y,
                80.0,
                20.0,
            ),
            mode: ProjectionMode::Perspective,
            aspect: WINDOW_WIDTH as f32 / WINDOW_HEIGHT as f32,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn projection_mode(&self) -> ProjectionMode {
        self.mode
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Track the drawable size. Zero-sized windows keep the last aspect.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    /// Apply one action. `dt` is the frame delta in seconds.
    pub fn apply(&mut self, action: Action, dt: f32) {
        match action {
            Action::Move(movement) => self.camera.process_keyboard(movement, dt),
            // Window y grows downward; camera pitch grows upward.
            Action::Look { dx, dy } => self.camera.process_mouse_movement(dx, -dy),
            Action::AdjustSpeed(notches) => {
                self.camera.movement_speed =
                    (self.camera.movement_speed + notches * SCROLL_SENSITIVITY).max(MIN_SPEED);
                tracing::debug!("camera speed {:.1}", self.camera.movement_speed);
            }
            Action::UsePerspective => {
                self.mode = ProjectionMode::Perspective;
                self.reset_camera(Vec3::new(0.5, 5.5, 10.0), Vec3::new(0.0, -0.5, -2.0), 80.0);
            }
            Action::UseOrthographic => {
                self.mode = ProjectionMode::Orthographic;
                self.reset_camera(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, 45.0);
            }
            Action::ToggleInspector | Action::Quit | Action::Noop => {}
        }
    }

    fn reset_camera(&mut self, position: Vec3, front: Vec3, zoom: f32) {
        self.camera.position = position;
        self.camera.look_along(front);
        self.camera.zoom = zoom;
        tracing::info!("{:?} projection", self.mode);
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.camera.view_matrix()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        match self.mode {
            ProjectionMode::Perspective => Mat4::perspective_rh(
                self.camera.zoom.to_radians(),
                self.aspect,
                NEAR_PLANE,
                FAR_PLANE,
            ),
            ProjectionMode::Orthographic => Mat4::orthographic_rh(
                -ORTHO_HALF_EXTENT,
                ORTHO_HALF_EXTENT,
                -ORTHO_HALF_EXTENT,
                ORTHO_HALF_EXTENT,
                NEAR_PLANE,
                FAR_PLANE,
            ),
        }
    }

    /// Push this frame's view, projection and eye position.
    pub fn prepare_scene_view(&self, ctx: &mut RenderContext<'_>) {
        ctx.set_mat4(uniforms::VIEW, self.view_matrix());
        ctx.set_mat4(uniforms::PROJECTION, self.projection_matrix());
        ctx.set_vec3(uniforms::VIEW_POSITION, self.camera.position);
    }
}
