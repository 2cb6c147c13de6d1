use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::{Mat4, Vec3};

use crate::gl::{GlApi, ShaderStage};
use crate::uniform::UniformValue;

/// Errors from building a shader program.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to read {stage} shader source {}: {source}", path.display())]
    FileRead {
        stage: ShaderStage,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to compile {stage} shader:\n{log}")]
    Compile { stage: ShaderStage, log: String },
    #[error("failed to link shader program:\n{log}")]
    Link { log: String },
    #[error("GPU context refused to create an object: {0}")]
    Gl(String),
}

/// A compiled and linked GPU program.
///
/// The handle is released when the value is dropped, so the context must
/// still be current at that point.
pub struct ShaderProgram<G: GlApi> {
    gl: Arc<G>,
    program: G::Program,
    // `None` entries remember names that did not resolve, so each is warned about once.
    locations: RefCell<HashMap<String, Option<G::UniformLocation>>>,
}

impl<G: GlApi> std::fmt::Debug for ShaderProgram<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("program", &self.program)
            .finish_non_exhaustive()
    }
}

impl<G: GlApi> ShaderProgram<G> {
    /// Reads both stage sources from disk, then compiles and links them.
    pub fn from_files(
        gl: Arc<G>,
        vertex_path: impl AsRef<Path>,
        fragment_path: impl AsRef<Path>,
    ) -> Result<Self, ShaderError> {
        let vertex_src = read_source(ShaderStage::Vertex, vertex_path.as_ref())?;
        let fragment_src = read_source(ShaderStage::Fragment, fragment_path.as_ref())?;
        Self::from_sources(gl, &vertex_src, &fragment_src)
    }

    pub fn from_sources(
        gl: Arc<G>,
        vertex_src: &str,
        fragment_src: &str,
    ) -> Result<Self, ShaderError> {
        let vertex = compile_stage(gl.as_ref(), ShaderStage::Vertex, vertex_src)?;
        let fragment = match compile_stage(gl.as_ref(), ShaderStage::Fragment, fragment_src) {
            Ok(shader) => shader,
            Err(e) => {
                gl.delete_shader(vertex);
                return Err(e);
            }
        };

        let linked = link(gl.as_ref(), vertex, fragment);
        // stage objects are owned by the program once linked; drop ours either way
        gl.delete_shader(vertex);
        gl.delete_shader(fragment);
        let program = linked?;

        tracing::debug!("linked shader program {program:?}");
        Ok(Self {
            gl,
            program,
            locations: RefCell::new(HashMap::new()),
        })
    }

    /// Raw program handle.
    pub fn id(&self) -> G::Program {
        self.program
    }

    /// Makes this the current program for subsequent draws and uniform uploads.
    pub fn activate(&self) {
        self.gl.use_program(Some(self.program));
    }

    pub fn deactivate(&self) {
        self.gl.use_program(None);
    }

    /// Cached location lookup; `None` when the name is not an active uniform.
    pub fn uniform_location(&self, name: &str) -> Option<G::UniformLocation> {
        if let Some(cached) = self.locations.borrow().get(name) {
            return cached.clone();
        }
        let location = self.gl.uniform_location(self.program, name);
        if location.is_none() {
            tracing::warn!(
                "uniform '{name}' is not active in shader program {:?}; uploads are ignored",
                self.program
            );
        }
        self.locations
            .borrow_mut()
            .insert(name.to_owned(), location.clone());
        location
    }

    /// Uploads `value` to the named uniform of this program, which must be active.
    ///
    /// Returns `false`, and uploads nothing, when the name does not resolve.
    pub fn set_uniform(&self, name: &str, value: impl Into<UniformValue>) -> bool {
        match self.uniform_location(name) {
            Some(location) => {
                self.gl.set_uniform(&location, value.into());
                true
            }
            None => false,
        }
    }

    pub fn set_bool(&self, name: &str, value: bool) -> bool {
        self.set_uniform(name, value)
    }

    pub fn set_int(&self, name: &str, value: i32) -> bool {
        self.set_uniform(name, value)
    }

    pub fn set_float(&self, name: &str, value: f32) -> bool {
        self.set_uniform(name, value)
    }

    pub fn set_vec3(&self, name: &str, value: Vec3) -> bool {
        self.set_uniform(name, value)
    }

    pub fn set_mat4(&self, name: &str, value: &Mat4) -> bool {
        self.set_uniform(name, *value)
    }
}

impl<G: GlApi> Drop for ShaderProgram<G> {
    fn drop(&mut self) {
        tracing::debug!("deleting shader program {:?}", self.program);
        self.gl.delete_program(self.program);
    }
}

fn read_source(stage: ShaderStage, path: &Path) -> Result<String, ShaderError> {
    std::fs::read_to_string(path).map_err(|source| {
        tracing::error!(
            "failed to read {stage} shader source {}: {source}",
            path.display()
        );
        ShaderError::FileRead {
            stage,
            path: path.to_path_buf(),
            source,
        }
    })
}

fn compile_stage<G: GlApi>(
    gl: &G,
    stage: ShaderStage,
    source: &str,
) -> Result<G::Shader, ShaderError> {
    let shader = gl.create_shader(stage).map_err(ShaderError::Gl)?;
    gl.compile_shader(shader, source);
    if gl.shader_compile_status(shader) {
        return Ok(shader);
    }

    let log = gl.shader_info_log(shader);
    gl.delete_shader(shader);
    tracing::error!("failed to compile {stage} shader:\n{log}");
    Err(ShaderError::Compile { stage, log })
}

fn link<G: GlApi>(gl: &G, vertex: G::Shader, fragment: G::Shader) -> Result<G::Program, ShaderError> {
    let program = gl.create_program().map_err(ShaderError::Gl)?;
    gl.attach_shader(program, vertex);
    gl.attach_shader(program, fragment);
    gl.link_program(program);
    gl.detach_shader(program, vertex);
    gl.detach_shader(program, fragment);

    if gl.program_link_status(program) {
        return Ok(program);
    }

    let log = gl.program_info_log(program);
    gl.delete_program(program);
    tracing::error!("failed to link shader program:\n{log}");
    Err(ShaderError::Link { log })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessGl;
    use std::io::Write;

    const VERTEX: &str = r#"
#version 330 core
layout (location = 0) in vec3 aPos;

uniform mat4 model;
uniform mat4 view;
uniform mat4 projection;

out vec3 FragPos;

void main() {
    FragPos = vec3(model * vec4(aPos, 1.0));
    gl_Position = projection * view * vec4(FragPos, 1.0);
}
"#;

    const FRAGMENT: &str = r#"
#version 330 core
out vec4 FragColor;
in vec3 FragPos;

uniform vec3 objectColor;
uniform vec3 lightColor;
uniform float ambient;
uniform bool lit;
uniform int mode;
uniform float unused; // declared but never read

void main() {
    vec3 color = objectColor * lightColor * ambient;
    if (lit && mode > 0) {
        color = color + FragPos * 0.0;
    }
    FragColor = vec4(color, 1.0);
}
"#;

    fn headless() -> Arc<HeadlessGl> {
        Arc::new(HeadlessGl::new())
    }

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn valid_sources_link() {
        let gl = headless();
        let program = ShaderProgram::from_sources(gl.clone(), VERTEX, FRAGMENT).unwrap();
        assert_eq!(gl.live_programs(), 1);
        // stage objects are released once the program is linked
        assert_eq!(gl.live_shaders(), 0);
        drop(program);
        assert_eq!(gl.live_programs(), 0);
    }

    #[test]
    fn declared_uniforms_upload_and_unknown_names_are_ignored() {
        let gl = headless();
        let program = ShaderProgram::from_sources(gl.clone(), VERTEX, FRAGMENT).unwrap();
        program.activate();

        let view = Mat4::from_translation(Vec3::new(0.0, 0.0, -3.0));
        assert!(program.set_mat4("view", &view));
        assert!(program.set_vec3("objectColor", Vec3::new(1.0, 0.5, 0.31)));
        assert!(program.set_float("ambient", 0.1));
        assert!(program.set_bool("lit", true));
        assert!(program.set_int("mode", 2));

        assert!(!program.set_vec3("lightColour", Vec3::ONE));
        assert!(!program.set_float("unused", 1.0));

        let id = program.id();
        assert_eq!(gl.uniform_value(id, "view"), Some(UniformValue::Mat4(view)));
        assert_eq!(gl.uniform_value(id, "lit"), Some(UniformValue::Bool(true)));
        assert_eq!(gl.uniform_value(id, "mode"), Some(UniformValue::Int(2)));
        assert_eq!(gl.uniform_value(id, "lightColour"), None);
        assert!(gl.take_errors().is_empty());
    }

    #[test]
    fn missing_uniform_is_looked_up_once() {
        let gl = headless();
        let program = ShaderProgram::from_sources(gl.clone(), VERTEX, FRAGMENT).unwrap();
        program.activate();
        for _ in 0..5 {
            assert!(!program.set_float("typo", 1.0));
        }
        assert_eq!(gl.location_queries("typo"), 1);
    }

    #[test]
    fn invalid_fragment_source_is_a_compile_error() {
        let gl = headless();
        let broken = "#version 330 core\nout vec4 FragColor;\nvoid main() {\n    FragColor = vec4(1.0;\n}\n";
        let err = ShaderProgram::from_sources(gl.clone(), VERTEX, broken).unwrap_err();
        match err {
            ShaderError::Compile { stage, log } => {
                assert_eq!(stage, ShaderStage::Fragment);
                assert!(log.contains("error"), "{log}");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(gl.live_shaders(), 0);
        assert_eq!(gl.live_programs(), 0);
    }

    #[test]
    fn statement_syntax_errors_fail_the_fragment_stage() {
        let gl = headless();
        for body in [
            "FragColor = vec4(1.0, 0.0, 0.0, 1.0)\n",
            "FragColor = = vec4(undeclared) +;\n",
        ] {
            let source = format!("#version 330 core\nout vec4 FragColor;\nvoid main() {{\n    {body}}}\n");
            let result = ShaderProgram::from_sources(gl.clone(), VERTEX, &source);
            assert!(
                matches!(
                    result,
                    Err(ShaderError::Compile {
                        stage: ShaderStage::Fragment,
                        ..
                    })
                ),
                "{body}"
            );
        }
        assert_eq!(gl.live_programs(), 0);
        assert_eq!(gl.live_shaders(), 0);
    }

    #[test]
    fn invalid_vertex_source_is_a_compile_error() {
        let gl = headless();
        let err = ShaderProgram::from_sources(gl.clone(), "", FRAGMENT).unwrap_err();
        assert!(matches!(
            err,
            ShaderError::Compile {
                stage: ShaderStage::Vertex,
                ..
            }
        ));
        assert_eq!(gl.live_shaders(), 0);
    }

    #[test]
    fn mismatched_interface_is_a_link_error() {
        let gl = headless();
        let fragment = "#version 330 core\nin vec2 TexCoord;\nout vec4 FragColor;\nvoid main() { FragColor = vec4(TexCoord, 0.0, 1.0); }\n";
        let err = ShaderProgram::from_sources(gl.clone(), VERTEX, fragment).unwrap_err();
        match err {
            ShaderError::Link { log } => assert!(log.contains("TexCoord"), "{log}"),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(gl.live_programs(), 0);
        assert_eq!(gl.live_shaders(), 0);
    }

    #[test]
    fn from_files_reads_both_stages() {
        let gl = headless();
        let vs = write_temp(VERTEX);
        let fs = write_temp(FRAGMENT);
        let program = ShaderProgram::from_files(gl.clone(), vs.path(), fs.path()).unwrap();
        program.activate();
        assert_eq!(gl.current_program(), Some(program.id()));
        program.deactivate();
        assert_eq!(gl.current_program(), None);
    }

    #[test]
    fn unreadable_file_is_a_read_error() {
        let gl = headless();
        let dir = tempfile::tempdir().unwrap();
        let fs = write_temp(FRAGMENT);
        let missing = dir.path().join("missing.vert");
        let err = ShaderProgram::from_files(gl.clone(), &missing, fs.path()).unwrap_err();
        match err {
            ShaderError::FileRead { stage, path, .. } => {
                assert_eq!(stage, ShaderStage::Vertex);
                assert_eq!(path, missing);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(gl.live_programs(), 0);
    }

    #[test]
    fn upload_without_activation_is_rejected_by_context() {
        let gl = headless();
        let program = ShaderProgram::from_sources(gl.clone(), VERTEX, FRAGMENT).unwrap();
        // the location resolves, but raw GL uploads target the current program
        assert!(program.set_float("ambient", 0.5));
        assert_eq!(gl.uniform_value(program.id(), "ambient"), None);
        assert_eq!(gl.take_errors().len(), 1);
    }

    #[test]
    fn two_programs_release_independently() {
        let gl = headless();
        let a = ShaderProgram::from_sources(gl.clone(), VERTEX, FRAGMENT).unwrap();
        let b = ShaderProgram::from_sources(gl.clone(), VERTEX, FRAGMENT).unwrap();
        assert_ne!(a.id(), b.id());
        drop(a);
        assert_eq!(gl.live_programs(), 1);
        drop(b);
        assert_eq!(gl.live_programs(), 0);
        assert_eq!(gl.program_deletions(), 2);
    }
}
