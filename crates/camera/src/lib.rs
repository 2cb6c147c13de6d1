//! First-person camera model.
//!
//! # Invariants
//! - `front`, `right` and `up` form a right-handed orthonormal basis,
//!   re-derived from yaw and pitch after every angle change.
//! - Pitch stays within the pitch limit when constrained; zoom stays within its range.
//! - Movement scales with the `delta_time` passed on each call.

mod camera;

pub use camera::{Camera, CameraMovement};

pub fn crate_info() -> &'static str {
    "glcourse-camera v0.1.0"
}
