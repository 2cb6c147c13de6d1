//! One scene per tutorial chapter.

mod lighting;
mod textured;
mod uniform_color;

use std::sync::Arc;

use anyhow::Context;
use glam::{Mat4, Vec3};
use glcourse_camera::Camera;
use glcourse_common::AssetConfig;
use glcourse_render_glow::{GlowGl, GlowShaderProgram, Texture2D, checkerboard};

pub use lighting::Lighting;
pub use textured::TexturedCubes;
pub use uniform_color::UniformColor;

/// Per-frame inputs shared by every scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameParams {
    /// Seconds since the app started.
    pub time: f32,
    pub view: Mat4,
    pub projection: Mat4,
    pub camera_position: Vec3,
}

/// GPU content of a chapter. Painting happens on the GL thread with the
/// context current; dropping the scene releases its GPU objects.
pub trait Scene: Send {
    fn paint(&mut self, frame: &FrameParams);

    /// Problems found while building the scene that did not stop it.
    fn notes(&self) -> &[String] {
        &[]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chapter {
    UniformColor,
    TexturedCubes,
    OrbitCamera,
    FreeCamera,
    Lighting,
}

const ORBIT_RADIUS: f32 = 10.0;

impl Chapter {
    pub const ALL: [Chapter; 5] = [
        Chapter::UniformColor,
        Chapter::TexturedCubes,
        Chapter::OrbitCamera,
        Chapter::FreeCamera,
        Chapter::Lighting,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Chapter::UniformColor => "1. Uniform color",
            Chapter::TexturedCubes => "2. Textured cubes",
            Chapter::OrbitCamera => "3. Orbit camera",
            Chapter::FreeCamera => "4. Free camera",
            Chapter::Lighting => "5. Lighting",
        }
    }

    /// Whether keyboard, mouse-look and scroll input drive the camera.
    pub fn uses_camera(self) -> bool {
        matches!(self, Chapter::FreeCamera | Chapter::Lighting)
    }

    pub fn frame(self, camera: &Camera, time: f32, aspect: f32) -> FrameParams {
        let fixed_projection = Mat4::perspective_rh_gl(45f32.to_radians(), aspect, 0.1, 100.0);
        match self {
            Chapter::UniformColor | Chapter::TexturedCubes => {
                let eye = Vec3::new(0.0, 0.0, 3.0);
                FrameParams {
                    time,
                    view: Mat4::from_translation(-eye),
                    projection: fixed_projection,
                    camera_position: eye,
                }
            }
            Chapter::OrbitCamera => {
                let eye = Vec3::new(time.sin() * ORBIT_RADIUS, 0.0, time.cos() * ORBIT_RADIUS);
                FrameParams {
                    time,
                    view: Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y),
                    projection: fixed_projection,
                    camera_position: eye,
                }
            }
            Chapter::FreeCamera | Chapter::Lighting => FrameParams {
                time,
                view: camera.view_matrix(),
                projection: camera.projection_matrix(aspect),
                camera_position: camera.position,
            },
        }
    }

    pub fn build(self, gl: Arc<GlowGl>, assets: &AssetConfig) -> anyhow::Result<Box<dyn Scene>> {
        let scene: Box<dyn Scene> = match self {
            Chapter::UniformColor => Box::new(UniformColor::new(gl, assets)?),
            Chapter::TexturedCubes | Chapter::OrbitCamera | Chapter::FreeCamera => {
                Box::new(TexturedCubes::new(gl, assets)?)
            }
            Chapter::Lighting => Box::new(Lighting::new(gl, assets)?),
        };
        tracing::info!("built scene for chapter '{}'", self.title());
        Ok(scene)
    }
}

fn load_program(
    gl: &Arc<GlowGl>,
    assets: &AssetConfig,
    name: &str,
) -> anyhow::Result<GlowShaderProgram> {
    let vertex = assets.shader(&format!("{name}.vert"));
    let fragment = assets.shader(&format!("{name}.frag"));
    GlowShaderProgram::from_files(gl.clone(), &vertex, &fragment)
        .with_context(|| format!("building shader program '{name}'"))
}

/// Loads a texture, falling back to a checkerboard tinted `tint` when the file is unusable.
fn load_texture(
    gl: &Arc<GlowGl>,
    assets: &AssetConfig,
    file_name: &str,
    tint: [u8; 3],
    notes: &mut Vec<String>,
) -> anyhow::Result<Texture2D> {
    let path = assets.texture(file_name);
    match Texture2D::from_path(gl.clone(), &path) {
        Ok(texture) => Ok(texture),
        Err(e) => {
            tracing::warn!("{e}; using a checkerboard instead");
            notes.push(format!("{file_name}: {e}"));
            let board = checkerboard(64, 8, tint, [32, 32, 32]);
            Texture2D::from_image(gl.clone(), &board)
                .with_context(|| format!("creating fallback texture for {file_name}"))
        }
    }
}
