/// One float attribute inside an interleaved vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttribute {
    /// Shader `layout (location = N)` slot.
    pub location: u32,
    /// Number of `f32` components, 1 to 4.
    pub components: i32,
    /// Byte offset from the start of the vertex.
    pub offset: i32,
}

/// Interleaved `f32` vertex layout; attributes get consecutive locations.
///
/// ```
/// use glcourse_render::VertexLayout;
///
/// // position, texture coordinate
/// let layout = VertexLayout::new().attribute(3).attribute(2);
/// assert_eq!(layout.stride(), 20);
/// assert_eq!(layout.floats_per_vertex(), 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexLayout {
    attributes: Vec<VertexAttribute>,
    floats: i32,
}

const FLOAT_SIZE: i32 = std::mem::size_of::<f32>() as i32;

impl VertexLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an attribute of `components` floats at the next location.
    ///
    /// Panics when `components` is outside `1..=4`, which GL rejects.
    pub fn attribute(mut self, components: i32) -> Self {
        assert!(
            (1..=4).contains(&components),
            "vertex attributes have 1 to 4 components, got {components}"
        );
        self.attributes.push(VertexAttribute {
            location: self.attributes.len() as u32,
            components,
            offset: self.floats * FLOAT_SIZE,
        });
        self.floats += components;
        self
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    /// Bytes between consecutive vertices.
    pub fn stride(&self) -> i32 {
        self.floats * FLOAT_SIZE
    }

    pub fn floats_per_vertex(&self) -> usize {
        self.floats as usize
    }

    /// Number of whole vertices in `data`; `None` if it is not a whole multiple.
    pub fn vertex_count(&self, data: &[f32]) -> Option<usize> {
        let per_vertex = self.floats_per_vertex();
        if per_vertex == 0 || data.len() % per_vertex != 0 {
            return None;
        }
        Some(data.len() / per_vertex)
    }
}
