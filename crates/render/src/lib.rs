//! Rendering core: shader programs, uniforms and vertex layouts behind a GPU context seam.
//!
//! # Invariants
//! - A [`ShaderProgram`] only exists once both stages compiled and the program linked.
//! - Every program handle is released exactly once, when its owner is dropped.
//! - Uploading to an unknown uniform name is a no-op, warned about once per name.
//!
//! # Backends
//! [`GlApi`] is implemented over a shared `glow::Context` in `glcourse-render-glow`. The
//! [`HeadlessGl`] context in this crate is a software stand-in that checks
//! shader structure and records uniform uploads, so everything above the seam
//! runs without a display.

mod gl;
mod headless;
mod layout;
mod shader;
mod uniform;

pub use gl::{GlApi, ShaderStage};
pub use headless::{HeadlessGl, HeadlessLocation, HeadlessProgram, HeadlessShader};
pub use layout::{VertexAttribute, VertexLayout};
pub use shader::{ShaderError, ShaderProgram};
pub use uniform::UniformValue;

pub fn crate_info() -> &'static str {
    "glcourse-render v0.1.0"
}
