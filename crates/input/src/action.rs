use glcourse_camera::{Camera, CameraMovement};

/// A high-level action produced by the input layer for one frame.
///
/// The camera and the scenes consume actions, never raw window events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Move the camera for the current frame's delta time.
    Move(CameraMovement),
    /// Rotate the camera by an already-gated cursor delta (y up is positive).
    Look { dx: f32, dy: f32 },
    /// Scroll-wheel zoom; positive narrows the field of view.
    Zoom(f32),
    /// Close the window.
    Quit,
}

impl Action {
    /// Applies a camera action. Returns `false` for actions the camera does not handle.
    pub fn apply_to_camera(&self, camera: &mut Camera, delta_time: f32) -> bool {
        match *self {
            Action::Move(direction) => camera.process_keyboard(direction, delta_time),
            Action::Look { dx, dy } => camera.process_mouse_movement(dx, dy, true),
            Action::Zoom(amount) => camera.process_mouse_scroll(amount),
            Action::Quit => return false,
        }
        true
    }
}
