//! OpenGL backend for the glcourse renderer, built on `glow`.
//!
//! [`GlowGl`] wraps a shared `glow::Context` and implements
//! [`glcourse_render::GlApi`], so shader programs run on real hardware.
//! [`Mesh`] and [`Texture2D`] own their GPU objects and release them on drop.
//!
//! # Invariants
//! - Every GPU object is deleted exactly once, by its owner's `Drop`.
//! - Owners must be dropped while the context that created them is current.

mod context;
mod mesh;
mod texture;

pub use context::GlowGl;
pub use mesh::{Mesh, MeshError};
pub use texture::{DecodedImage, Texture2D, TextureError, checkerboard, decode_image};

/// Shader program bound to the glow backend.
pub type GlowShaderProgram = glcourse_render::ShaderProgram<GlowGl>;

pub fn crate_info() -> &'static str {
    "glcourse-render-glow v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("glow"));
    }
}
