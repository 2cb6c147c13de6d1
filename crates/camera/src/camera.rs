use glam::{Mat4, Vec3};
use glcourse_common::{CameraConfig, ConfigError};
use serde::{Deserialize, Serialize};

const DEFAULT_YAW: f32 = -90.0;
const DEFAULT_PITCH: f32 = 0.0;
const DEFAULT_SPEED: f32 = 2.5;
const DEFAULT_SENSITIVITY: f32 = 0.1;
const DEFAULT_ZOOM: f32 = 45.0;
const DEFAULT_ZOOM_RANGE: (f32, f32) = (1.0, 45.0);
const DEFAULT_PITCH_LIMIT: f32 = 89.0;

/// Keyboard-driven movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    /// Along the world up vector.
    Up,
    /// Against the world up vector.
    Down,
}

/// Fly camera with position, yaw, pitch and zoom.
///
/// Angles are stored in degrees. The basis vectors are derived state and can
/// only be read; they are recomputed whenever yaw or pitch change.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    front: Vec3,
    up: Vec3,
    right: Vec3,
    world_up: Vec3,
    yaw: f32,
    pitch: f32,
    zoom: f32,
    zoom_range: (f32, f32),
    pitch_limit: f32,
    pub movement_speed: f32,
    pub mouse_sensitivity: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl Camera {
    pub fn new(position: Vec3) -> Self {
        Self::with_angles(position, Vec3::Y, DEFAULT_YAW, DEFAULT_PITCH)
    }

    pub fn with_angles(position: Vec3, world_up: Vec3, yaw: f32, pitch: f32) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            right: Vec3::X,
            world_up: world_up.try_normalize().unwrap_or(Vec3::Y),
            yaw,
            pitch: pitch.clamp(-DEFAULT_PITCH_LIMIT, DEFAULT_PITCH_LIMIT),
            zoom: DEFAULT_ZOOM,
            zoom_range: DEFAULT_ZOOM_RANGE,
            pitch_limit: DEFAULT_PITCH_LIMIT,
            movement_speed: DEFAULT_SPEED,
            mouse_sensitivity: DEFAULT_SENSITIVITY,
            near: 0.1,
            far: 100.0,
        };
        camera.update_vectors();
        camera
    }

    /// Builds a camera from a config, rejecting configs that fail
    /// [`CameraConfig::validate`].
    pub fn from_config(config: &CameraConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut camera = Self::with_angles(config.position, config.world_up, config.yaw, 0.0);
        camera.pitch_limit = config.pitch_limit;
        camera.pitch = config.pitch.clamp(-config.pitch_limit, config.pitch_limit);
        camera.zoom_range = (config.zoom_min, config.zoom_max);
        camera.zoom = config.zoom.clamp(config.zoom_min, config.zoom_max);
        camera.movement_speed = config.movement_speed;
        camera.mouse_sensitivity = config.mouse_sensitivity;
        camera.near = config.near;
        camera.far = config.far;
        camera.update_vectors();
        Ok(camera)
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn world_up(&self) -> Vec3 {
        self.world_up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Vertical field of view in degrees.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn zoom_range(&self) -> (f32, f32) {
        self.zoom_range
    }

    /// Sets yaw and pitch directly, clamping pitch to the pitch limit.
    pub fn set_angles(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch.clamp(-self.pitch_limit, self.pitch_limit);
        self.update_vectors();
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    /// OpenGL-style perspective projection using the current zoom as vertical fov.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.zoom.to_radians(), aspect, self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Moves the camera; `delta_time` is the wall-clock seconds since the previous frame.
    pub fn process_keyboard(&mut self, direction: CameraMovement, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;
        let offset = match direction {
            CameraMovement::Forward => self.front,
            CameraMovement::Backward => -self.front,
            CameraMovement::Left => -self.right,
            CameraMovement::Right => self.right,
            CameraMovement::Up => self.world_up,
            CameraMovement::Down => -self.world_up,
        };
        self.position += offset * velocity;
    }

    /// Applies a cursor delta. `y_offset` is positive when the cursor moves up.
    /// Non-finite offsets are ignored.
    pub fn process_mouse_movement(&mut self, x_offset: f32, y_offset: f32, constrain_pitch: bool) {
        if !(x_offset.is_finite() && y_offset.is_finite()) {
            return;
        }
        self.yaw += x_offset * self.mouse_sensitivity;
        self.pitch += y_offset * self.mouse_sensitivity;

        if constrain_pitch {
            self.pitch = self.pitch.clamp(-self.pitch_limit, self.pitch_limit);
        }

        self.update_vectors();
    }

    /// Narrows the field of view by `y_offset` degrees. Non-finite offsets are ignored.
    pub fn process_mouse_scroll(&mut self, y_offset: f32) {
        if !y_offset.is_finite() {
            return;
        }
        let (min, max) = self.zoom_range;
        self.zoom = (self.zoom - y_offset).clamp(min, max);
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        let front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos());
        self.front = front.normalize();
        // Looking straight along world_up leaves right undefined; keep the last one.
        self.right = self
            .front
            .cross(self.world_up)
            .try_normalize()
            .unwrap_or(self.right);
        self.up = self.right.cross(self.front).normalize();
    }
}
