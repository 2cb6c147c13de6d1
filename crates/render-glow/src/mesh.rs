use std::sync::Arc;

use glcourse_render::VertexLayout;
use glow::HasContext;

use crate::context::GlowGl;

#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("{len} floats do not make whole vertices of {per_vertex} floats")]
    Ragged { len: usize, per_vertex: usize },
    #[error("mesh has no vertices")]
    Empty,
    #[error("index {index} is out of range for {vertices} vertices")]
    IndexOutOfRange { index: u32, vertices: usize },
    #[error("GPU context refused to create a {what}: {message}")]
    Gl { what: &'static str, message: String },
}

/// Vertex array with its vertex buffer and optional index buffer.
pub struct Mesh {
    gl: Arc<GlowGl>,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    ebo: Option<glow::Buffer>,
    count: i32,
}

impl std::fmt::Debug for Mesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mesh")
            .field("indexed", &self.ebo.is_some())
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

impl Mesh {
    /// Non-indexed triangles drawn with `draw_arrays`.
    pub fn new(gl: Arc<GlowGl>, layout: &VertexLayout, vertices: &[f32]) -> Result<Self, MeshError> {
        let count = validate(layout, vertices, None)?;
        Self::upload(gl, layout, vertices, None, count)
    }

    /// Indexed triangles drawn with `draw_elements`.
    pub fn indexed(
        gl: Arc<GlowGl>,
        layout: &VertexLayout,
        vertices: &[f32],
        indices: &[u32],
    ) -> Result<Self, MeshError> {
        let count = validate(layout, vertices, Some(indices))?;
        Self::upload(gl, layout, vertices, Some(indices), count)
    }

    fn upload(
        gl: Arc<GlowGl>,
        layout: &VertexLayout,
        vertices: &[f32],
        indices: Option<&[u32]>,
        count: usize,
    ) -> Result<Self, MeshError> {
        let raw = gl.raw();

        let vao = unsafe { raw.create_vertex_array() }.map_err(gl_error("vertex array"))?;
        let vbo = match unsafe { raw.create_buffer() } {
            Ok(buffer) => buffer,
            Err(message) => {
                unsafe { raw.delete_vertex_array(vao) };
                return Err(gl_error("vertex buffer")(message));
            }
        };
        let ebo = match indices.map(|_| unsafe { raw.create_buffer() }).transpose() {
            Ok(buffer) => buffer,
            Err(message) => {
                unsafe {
                    raw.delete_buffer(vbo);
                    raw.delete_vertex_array(vao);
                }
                return Err(gl_error("index buffer")(message));
            }
        };

        unsafe {
            raw.bind_vertex_array(Some(vao));

            raw.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            raw.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(vertices),
                glow::STATIC_DRAW,
            );

            if let (Some(ebo), Some(indices)) = (ebo, indices) {
                raw.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(ebo));
                raw.buffer_data_u8_slice(
                    glow::ELEMENT_ARRAY_BUFFER,
                    bytemuck::cast_slice(indices),
                    glow::STATIC_DRAW,
                );
            }

            for attribute in layout.attributes() {
                raw.vertex_attrib_pointer_f32(
                    attribute.location,
                    attribute.components,
                    glow::FLOAT,
                    false,
                    layout.stride(),
                    attribute.offset,
                );
                raw.enable_vertex_attrib_array(attribute.location);
            }

            // the element binding is part of the VAO, so only the array buffer is unbound
            raw.bind_vertex_array(None);
            raw.bind_buffer(glow::ARRAY_BUFFER, None);
        }

        tracing::debug!(
            "uploaded mesh: {} floats, {count} {}",
            vertices.len(),
            if ebo.is_some() { "indices" } else { "vertices" }
        );
        Ok(Self {
            gl,
            vao,
            vbo,
            ebo,
            count: count as i32,
        })
    }

    /// Vertices (or indices, for indexed meshes) drawn per call.
    pub fn count(&self) -> usize {
        self.count as usize
    }

    pub fn is_indexed(&self) -> bool {
        self.ebo.is_some()
    }

    /// Draws the mesh as triangles with whatever program is current.
    pub fn draw(&self) {
        let raw = self.gl.raw();
        unsafe {
            raw.bind_vertex_array(Some(self.vao));
            if self.ebo.is_some() {
                raw.draw_elements(glow::TRIANGLES, self.count, glow::UNSIGNED_INT, 0);
            } else {
                raw.draw_arrays(glow::TRIANGLES, 0, self.count);
            }
            raw.bind_vertex_array(None);
        }
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        let raw = self.gl.raw();
        unsafe {
            raw.delete_vertex_array(self.vao);
            raw.delete_buffer(self.vbo);
            if let Some(ebo) = self.ebo {
                raw.delete_buffer(ebo);
            }
        }
    }
}

fn gl_error(what: &'static str) -> impl FnOnce(String) -> MeshError {
    move |message| MeshError::Gl { what, message }
}

/// Number of elements a draw call covers.
fn validate(
    layout: &VertexLayout,
    vertices: &[f32],
    indices: Option<&[u32]>,
) -> Result<usize, MeshError> {
    let vertex_count = layout.vertex_count(vertices).ok_or(MeshError::Ragged {
        len: vertices.len(),
        per_vertex: layout.floats_per_vertex(),
    })?;
    if vertex_count == 0 {
        return Err(MeshError::Empty);
    }
    let Some(indices) = indices else {
        return Ok(vertex_count);
    };
    if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(MeshError::IndexOutOfRange {
            index,
            vertices: vertex_count,
        });
    }
    if indices.is_empty() {
        return Err(MeshError::Empty);
    }
    Ok(indices.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos_uv() -> VertexLayout {
        VertexLayout::new().attribute(3).attribute(2)
    }

    #[test]
    fn plain_mesh_counts_vertices() {
        let quad = [0.0_f32; 5 * 6];
        assert_eq!(validate(&pos_uv(), &quad, None).unwrap(), 6);
    }

    #[test]
    fn indexed_mesh_counts_indices() {
        let quad = [0.0_f32; 5 * 4];
        let indices: [u32; 6] = [0, 1, 3, 1, 2, 3];
        assert_eq!(validate(&pos_uv(), &quad, Some(&indices)).unwrap(), 6);
    }

    #[test]
    fn ragged_vertex_data_is_rejected() {
        let err = validate(&pos_uv(), &[0.0; 7], None).unwrap_err();
        assert!(matches!(err, MeshError::Ragged { len: 7, per_vertex: 5 }));
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let err = validate(&pos_uv(), &[0.0; 15], Some(&[0, 1, 3])).unwrap_err();
        assert!(matches!(err, MeshError::IndexOutOfRange { index: 3, vertices: 3 }));
    }

    #[test]
    fn empty_meshes_are_rejected() {
        assert!(matches!(validate(&pos_uv(), &[], None), Err(MeshError::Empty)));
        assert!(matches!(
            validate(&pos_uv(), &[0.0; 5], Some(&[])),
            Err(MeshError::Empty)
        ));
    }
}
