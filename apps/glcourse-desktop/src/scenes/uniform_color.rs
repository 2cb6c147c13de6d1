use std::sync::Arc;

use glam::Vec3;
use glcourse_common::AssetConfig;
use glcourse_render_glow::{GlowGl, GlowShaderProgram, Mesh};

use super::{FrameParams, Scene, load_program};
use crate::geometry;

/// A single triangle whose green channel pulses with time.
pub struct UniformColor {
    program: GlowShaderProgram,
    triangle: Mesh,
}

impl UniformColor {
    pub fn new(gl: Arc<GlowGl>, assets: &AssetConfig) -> anyhow::Result<Self> {
        let program = load_program(&gl, assets, "uniform_color")?;
        let triangle = Mesh::new(gl, &geometry::position_layout(), &geometry::TRIANGLE)?;
        Ok(Self { program, triangle })
    }
}

/// Green channel in `[0, 1]`, one full pulse every 2π seconds.
fn pulse(time: f32) -> f32 {
    time.sin() / 2.0 + 0.5
}

impl Scene for UniformColor {
    fn paint(&mut self, frame: &FrameParams) {
        self.program.activate();
        self.program
            .set_vec3("ourColor", Vec3::new(0.0, pulse(frame.time), 0.0));
        self.triangle.draw();
        self.program.deactivate();
    }
}
