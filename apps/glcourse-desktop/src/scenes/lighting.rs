use std::sync::Arc;

use glam::{Mat4, Vec3};
use glcourse_common::{AssetConfig, Transform};
use glcourse_render_glow::{GlowGl, GlowShaderProgram, Mesh};

use super::{FrameParams, Scene, load_program};
use crate::geometry;

const OBJECT_COLOR: Vec3 = Vec3::new(1.0, 0.5, 0.31);
const LIGHT_COLOR: Vec3 = Vec3::new(1.0, 1.0, 1.0);
const LAMP_SCALE: f32 = 0.2;

/// A Phong-lit cube next to the small lamp cube that lights it.
pub struct Lighting {
    object_program: GlowShaderProgram,
    lamp_program: GlowShaderProgram,
    cube: Mesh,
}

impl Lighting {
    pub fn new(gl: Arc<GlowGl>, assets: &AssetConfig) -> anyhow::Result<Self> {
        let object_program = load_program(&gl, assets, "lighting")?;
        let lamp_program = load_program(&gl, assets, "lamp")?;
        let cube = Mesh::new(gl, &geometry::lit_layout(), &geometry::LIT_CUBE)?;
        Ok(Self {
            object_program,
            lamp_program,
            cube,
        })
    }
}

/// The lamp circles the object slowly at shoulder height.
fn lamp_position(time: f32) -> Vec3 {
    Vec3::new(1.2 * (time * 0.5).cos(), 1.0, 2.0 * (time * 0.5).sin())
}

fn lamp_model(position: Vec3) -> Mat4 {
    Transform::at(position).scaled(LAMP_SCALE).model_matrix()
}

impl Scene for Lighting {
    fn paint(&mut self, frame: &FrameParams) {
        let light_pos = lamp_position(frame.time);

        let object = &self.object_program;
        object.activate();
        object.set_vec3("objectColor", OBJECT_COLOR);
        object.set_vec3("lightColor", LIGHT_COLOR);
        object.set_vec3("lightPos", light_pos);
        object.set_vec3("viewPos", frame.camera_position);
        object.set_mat4("view", &frame.view);
        object.set_mat4("projection", &frame.projection);
        object.set_mat4("model", &Mat4::IDENTITY);
        self.cube.draw();

        let lamp = &self.lamp_program;
        lamp.activate();
        lamp.set_mat4("view", &frame.view);
        lamp.set_mat4("projection", &frame.projection);
        lamp.set_mat4("model", &lamp_model(light_pos));
        self.cube.draw();
        lamp.deactivate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lamp_stays_clear_of_the_object() {
        for i in 0..64 {
            let p = lamp_position(i as f32 * 0.25);
            // object is a unit cube at the origin
            assert!(p.y > 0.5 + LAMP_SCALE / 2.0);
        }
    }

    #[test]
    fn lamp_is_scaled_down() {
        let model = lamp_model(Vec3::new(1.0, 2.0, 3.0));
        let corner = model.transform_point3(Vec3::splat(0.5));
        assert!((corner - Vec3::new(1.1, 2.1, 3.1)).length() < 1e-5);
    }
}
