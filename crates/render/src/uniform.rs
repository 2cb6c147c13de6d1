use glam::{Mat4, Vec3};

/// A value that can be uploaded to a uniform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec3(Vec3),
    Mat4(Mat4),
}

impl UniformValue {
    /// GLSL spelling of the value's type.
    pub fn glsl_type(&self) -> &'static str {
        match self {
            UniformValue::Bool(_) => "bool",
            UniformValue::Int(_) => "int",
            UniformValue::Float(_) => "float",
            UniformValue::Vec3(_) => "vec3",
            UniformValue::Mat4(_) => "mat4",
        }
    }
}

impl From<bool> for UniformValue {
    fn from(value: bool) -> Self {
        UniformValue::Bool(value)
    }
}

impl From<i32> for UniformValue {
    fn from(value: i32) -> Self {
        UniformValue::Int(value)
    }
}

impl From<f32> for UniformValue {
    fn from(value: f32) -> Self {
        UniformValue::Float(value)
    }
}

impl From<Vec3> for UniformValue {
    fn from(value: Vec3) -> Self {
        UniformValue::Vec3(value)
    }
}

impl From<[f32; 3]> for UniformValue {
    fn from([x, y, z]: [f32; 3]) -> Self {
        UniformValue::Vec3(Vec3::new(x, y, z))
    }
}

impl From<Mat4> for UniformValue {
    fn from(value: Mat4) -> Self {
        UniformValue::Mat4(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_pick_the_matching_kind() {
        assert_eq!(UniformValue::from(true), UniformValue::Bool(true));
        assert_eq!(UniformValue::from(3_i32), UniformValue::Int(3));
        assert_eq!(UniformValue::from(0.5_f32), UniformValue::Float(0.5));
        assert_eq!(
            UniformValue::from([1.0, 0.5, 0.31]),
            UniformValue::Vec3(Vec3::new(1.0, 0.5, 0.31))
        );
        assert_eq!(UniformValue::from(Mat4::IDENTITY).glsl_type(), "mat4");
    }
}
