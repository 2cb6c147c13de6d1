use std::sync::Arc;

use glam::{Mat4, Vec3};
use glcourse_common::{AssetConfig, Transform};
use glcourse_render_glow::{GlowGl, GlowShaderProgram, Mesh, Texture2D};

use super::{FrameParams, Scene, load_program, load_texture};
use crate::geometry::{self, CUBE_POSITIONS};

const MIX_VALUE: f32 = 0.2;
const ROTATION_AXIS: Vec3 = Vec3::new(1.0, 0.3, 0.5);

/// Ten cubes sampling two blended textures.
pub struct TexturedCubes {
    program: GlowShaderProgram,
    cube: Mesh,
    container: Texture2D,
    face: Texture2D,
    notes: Vec<String>,
}

impl TexturedCubes {
    pub fn new(gl: Arc<GlowGl>, assets: &AssetConfig) -> anyhow::Result<Self> {
        let program = load_program(&gl, assets, "textured")?;
        let cube = Mesh::new(gl.clone(), &geometry::textured_layout(), &geometry::TEXTURED_CUBE)?;

        let mut notes = Vec::new();
        let container = load_texture(&gl, assets, "container.jpg", [181, 134, 84], &mut notes)?;
        let face = load_texture(&gl, assets, "awesomeface.png", [250, 200, 40], &mut notes)?;

        // sampler units are fixed for the lifetime of the program
        program.activate();
        program.set_int("texture1", 0);
        program.set_int("texture2", 1);
        program.set_float("mixValue", MIX_VALUE);
        program.deactivate();

        Ok(Self {
            program,
            cube,
            container,
            face,
            notes,
        })
    }
}

/// Model matrix of cube `index`: a fixed 20° step per cube, every third one spinning.
fn cube_model(index: usize, position: Vec3, time: f32) -> Mat4 {
    let mut degrees = 20.0 * index as f32;
    if index % 3 == 0 {
        degrees += time * 25.0;
    }
    Transform::at(position)
        .rotated(ROTATION_AXIS, degrees.to_radians())
        .model_matrix()
}

impl Scene for TexturedCubes {
    fn paint(&mut self, frame: &FrameParams) {
        self.container.bind(0);
        self.face.bind(1);

        self.program.activate();
        self.program.set_mat4("view", &frame.view);
        self.program.set_mat4("projection", &frame.projection);
        for (index, position) in CUBE_POSITIONS.iter().enumerate() {
            self.program
                .set_mat4("model", &cube_model(index, *position, frame.time));
            self.cube.draw();
        }
        self.program.deactivate();

        self.face.unbind(1);
        self.container.unbind(0);
    }

    fn notes(&self) -> &[String] {
        &self.notes
    }
}
