use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use glsl::parser::Parse as _;
use glsl::syntax::{
    Declaration, Expr, ExternalDeclaration, FullySpecifiedType, Preprocessor, StorageQualifier,
    TranslationUnit, TypeQualifierSpec, TypeSpecifierNonArray,
};
use glsl::visitor::{Host as _, Visit, Visitor};

use crate::gl::{GlApi, ShaderStage};
use crate::uniform::UniformValue;

/// Shader object handle issued by [`HeadlessGl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeadlessShader(pub u32);

/// Program object handle issued by [`HeadlessGl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HeadlessProgram(pub u32);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HeadlessLocation {
    program: u32,
    index: usize,
}

/// A software stand-in for a GL context.
///
/// It tracks object lifetimes, the current program and uploaded uniform
/// values. Sources go through a full GLSL parse (`glsl` crate); any syntax
/// error fails the compile with the parser trace in the info log. On top of
/// that it requires a `main` entry point and a leading `#version`, and reads
/// the global `uniform`/`in`/`out` declarations. It does not type-check
/// expressions. A uniform counts as active only when it is read somewhere,
/// mirroring how drivers strip unused uniforms.
///
/// Errors a real driver would raise through `glGetError` are collected and
/// can be drained with [`HeadlessGl::take_errors`].
#[derive(Debug, Default)]
pub struct HeadlessGl {
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    next_id: u32,
    shaders: HashMap<u32, ShaderObject>,
    programs: HashMap<u32, ProgramObject>,
    current: Option<u32>,
    errors: Vec<String>,
    location_queries: HashMap<String, usize>,
    program_deletions: usize,
}

#[derive(Debug)]
struct ShaderObject {
    stage: ShaderStage,
    log: String,
    interface: Option<Interface>,
}

#[derive(Debug, Default)]
struct ProgramObject {
    attached: Vec<u32>,
    linked: bool,
    log: String,
    uniforms: Vec<UniformSlot>,
}

#[derive(Debug)]
struct UniformSlot {
    name: String,
    ty: String,
    value: Option<UniformValue>,
}

#[derive(Debug, Clone, Default)]
struct Interface {
    inputs: Vec<Variable>,
    outputs: Vec<Variable>,
    /// Active uniforms only.
    uniforms: Vec<Variable>,
}

#[derive(Debug, Clone, PartialEq)]
struct Variable {
    ty: String,
    name: String,
}

impl HeadlessGl {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn live_programs(&self) -> usize {
        self.state().programs.len()
    }

    pub fn live_shaders(&self) -> usize {
        self.state().shaders.len()
    }

    /// Number of `delete_program` calls that released a live program.
    pub fn program_deletions(&self) -> usize {
        self.state().program_deletions
    }

    pub fn current_program(&self) -> Option<HeadlessProgram> {
        self.state().current.map(HeadlessProgram)
    }

    /// Last value uploaded to `name` in `program`.
    pub fn uniform_value(&self, program: HeadlessProgram, name: &str) -> Option<UniformValue> {
        let state = self.state();
        let program = state.programs.get(&program.0)?;
        program
            .uniforms
            .iter()
            .find(|slot| slot.name == name)
            .and_then(|slot| slot.value)
    }

    /// `(type, name)` of each active uniform in location order.
    pub fn active_uniforms(&self, program: HeadlessProgram) -> Vec<(String, String)> {
        let state = self.state();
        state
            .programs
            .get(&program.0)
            .map(|p| {
                p.uniforms
                    .iter()
                    .map(|slot| (slot.ty.clone(), slot.name.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// How many times `name` was looked up with `uniform_location`.
    pub fn location_queries(&self, name: &str) -> usize {
        self.state()
            .location_queries
            .get(name)
            .copied()
            .unwrap_or(0)
    }

    pub fn take_errors(&self) -> Vec<String> {
        std::mem::take(&mut self.state().errors)
    }
}

impl GlApi for HeadlessGl {
    type Shader = HeadlessShader;
    type Program = HeadlessProgram;
    type UniformLocation = HeadlessLocation;

    fn create_shader(&self, stage: ShaderStage) -> Result<HeadlessShader, String> {
        let mut state = self.state();
        let id = state.allocate();
        state.shaders.insert(
            id,
            ShaderObject {
                stage,
                log: String::new(),
                interface: None,
            },
        );
        Ok(HeadlessShader(id))
    }

    fn compile_shader(&self, shader: HeadlessShader, source: &str) {
        let mut state = self.state();
        let Some(object) = state.shaders.get_mut(&shader.0) else {
            state.error(format!("INVALID_VALUE: no shader object {}", shader.0));
            return;
        };
        match analyze(object.stage, source) {
            Ok(interface) => {
                object.interface = Some(interface);
                object.log.clear();
            }
            Err(log) => {
                object.interface = None;
                object.log = log;
            }
        }
    }

    fn shader_compile_status(&self, shader: HeadlessShader) -> bool {
        self.state()
            .shaders
            .get(&shader.0)
            .is_some_and(|s| s.interface.is_some())
    }

    fn shader_info_log(&self, shader: HeadlessShader) -> String {
        self.state()
            .shaders
            .get(&shader.0)
            .map(|s| s.log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: HeadlessShader) {
        let mut state = self.state();
        if state.shaders.remove(&shader.0).is_none() {
            state.error(format!("INVALID_VALUE: no shader object {}", shader.0));
        }
    }

    fn create_program(&self) -> Result<HeadlessProgram, String> {
        let mut state = self.state();
        let id = state.allocate();
        state.programs.insert(id, ProgramObject::default());
        Ok(HeadlessProgram(id))
    }

    fn attach_shader(&self, program: HeadlessProgram, shader: HeadlessShader) {
        let mut state = self.state();
        if !state.shaders.contains_key(&shader.0) {
            state.error(format!("INVALID_VALUE: no shader object {}", shader.0));
            return;
        }
        let Some(object) = state.programs.get_mut(&program.0) else {
            state.error(format!("INVALID_VALUE: no program object {}", program.0));
            return;
        };
        if object.attached.contains(&shader.0) {
            state.error(format!("INVALID_OPERATION: shader {} already attached", shader.0));
        } else {
            object.attached.push(shader.0);
        }
    }

    fn detach_shader(&self, program: HeadlessProgram, shader: HeadlessShader) {
        let mut state = self.state();
        let detached = state.programs.get_mut(&program.0).is_some_and(|p| {
            let before = p.attached.len();
            p.attached.retain(|&id| id != shader.0);
            p.attached.len() != before
        });
        if !detached {
            state.error(format!(
                "INVALID_OPERATION: shader {} is not attached to program {}",
                shader.0, program.0
            ));
        }
    }

    fn link_program(&self, program: HeadlessProgram) {
        let mut state = self.state();
        let Some(attached) = state.programs.get(&program.0).map(|p| p.attached.clone()) else {
            state.error(format!("INVALID_VALUE: no program object {}", program.0));
            return;
        };
        let result = link(attached.iter().filter_map(|id| state.shaders.get(id)));
        let Some(object) = state.programs.get_mut(&program.0) else {
            return;
        };
        match result {
            Ok(uniforms) => {
                object.linked = true;
                object.log.clear();
                object.uniforms = uniforms
                    .into_iter()
                    .map(|v| UniformSlot {
                        name: v.name,
                        ty: v.ty,
                        value: None,
                    })
                    .collect();
            }
            Err(log) => {
                object.linked = false;
                object.log = log;
                object.uniforms.clear();
            }
        }
    }

    fn program_link_status(&self, program: HeadlessProgram) -> bool {
        self.state()
            .programs
            .get(&program.0)
            .is_some_and(|p| p.linked)
    }

    fn program_info_log(&self, program: HeadlessProgram) -> String {
        self.state()
            .programs
            .get(&program.0)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn delete_program(&self, program: HeadlessProgram) {
        let mut state = self.state();
        if state.programs.remove(&program.0).is_some() {
            state.program_deletions += 1;
            if state.current == Some(program.0) {
                state.current = None;
            }
        } else {
            state.error(format!("INVALID_VALUE: no program object {}", program.0));
        }
    }

    fn use_program(&self, program: Option<HeadlessProgram>) {
        let mut state = self.state();
        match program {
            None => state.current = None,
            Some(p) if state.programs.get(&p.0).is_some_and(|p| p.linked) => {
                state.current = Some(p.0)
            }
            Some(p) => state.error(format!(
                "INVALID_OPERATION: program {} is not a linked program",
                p.0
            )),
        }
    }

    fn uniform_location(&self, program: HeadlessProgram, name: &str) -> Option<HeadlessLocation> {
        let mut state = self.state();
        *state.location_queries.entry(name.to_owned()).or_default() += 1;
        let object = state.programs.get(&program.0)?;
        if !object.linked {
            return None;
        }
        object
            .uniforms
            .iter()
            .position(|slot| slot.name == name)
            .map(|index| HeadlessLocation {
                program: program.0,
                index,
            })
    }

    fn set_uniform(&self, location: &HeadlessLocation, value: UniformValue) {
        let mut state = self.state();
        if state.current != Some(location.program) {
            state.error(format!(
                "INVALID_OPERATION: location belongs to program {}, which is not current",
                location.program
            ));
            return;
        }
        let Some(slot) = state
            .programs
            .get_mut(&location.program)
            .and_then(|p| p.uniforms.get_mut(location.index))
        else {
            state.error("INVALID_OPERATION: stale uniform location".to_owned());
            return;
        };
        if !accepts(&slot.ty, &value) {
            let message = format!(
                "INVALID_OPERATION: cannot upload {} to {} uniform '{}'",
                value.glsl_type(),
                slot.ty,
                slot.name
            );
            state.error(message);
            return;
        }
        slot.value = Some(value);
    }
}

impl State {
    fn allocate(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn error(&mut self, message: String) {
        tracing::debug!("headless GL error: {message}");
        self.errors.push(message);
    }
}

fn accepts(declared: &str, value: &UniformValue) -> bool {
    match value {
        UniformValue::Bool(_) => matches!(declared, "bool" | "int"),
        UniformValue::Int(_) => {
            matches!(declared, "int" | "bool") || declared.starts_with("sampler")
        }
        UniformValue::Float(_) => matches!(declared, "float" | "bool"),
        UniformValue::Vec3(_) => declared == "vec3",
        UniformValue::Mat4(_) => declared == "mat4",
    }
}

fn link<'a>(shaders: impl Iterator<Item = &'a ShaderObject>) -> Result<Vec<Variable>, String> {
    let mut vertex = None;
    let mut fragment = None;
    for shader in shaders {
        let slot = match shader.stage {
            ShaderStage::Vertex => &mut vertex,
            ShaderStage::Fragment => &mut fragment,
        };
        if slot.is_some() {
            return Err(format!(
                "error: more than one {} shader attached",
                shader.stage
            ));
        }
        let Some(interface) = &shader.interface else {
            return Err(format!(
                "error: {} shader was not successfully compiled",
                shader.stage
            ));
        };
        *slot = Some(interface);
    }
    let vertex = vertex.ok_or("error: no vertex shader attached")?;
    let fragment = fragment.ok_or("error: no fragment shader attached")?;

    let mut problems = Vec::new();
    for input in &fragment.inputs {
        match vertex.outputs.iter().find(|out| out.name == input.name) {
            None => problems.push(format!(
                "error: fragment shader input '{}' is not written by the vertex shader",
                input.name
            )),
            Some(out) if out.ty != input.ty => problems.push(format!(
                "error: '{}' is {} in the vertex shader but {} in the fragment shader",
                input.name, out.ty, input.ty
            )),
            Some(_) => {}
        }
    }

    let mut uniforms: Vec<Variable> = Vec::new();
    for uniform in vertex.uniforms.iter().chain(&fragment.uniforms) {
        match uniforms.iter().find(|u| u.name == uniform.name) {
            Some(existing) if existing.ty != uniform.ty => problems.push(format!(
                "error: uniform '{}' declared as both {} and {}",
                uniform.name, existing.ty, uniform.ty
            )),
            Some(_) => {}
            None => uniforms.push(uniform.clone()),
        }
    }

    if !problems.is_empty() {
        return Err(problems.join("\n"));
    }
    uniforms.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(uniforms)
}

fn compile_error(line: usize, message: impl std::fmt::Display) -> String {
    format!("0:{line}: error: {message}")
}

/// Turns a parser trace into an info log headed by the failing line.
fn syntax_error(info: &str) -> String {
    let line = info
        .split("at line ")
        .nth(1)
        .and_then(|rest| rest.split(|c: char| !c.is_ascii_digit()).next())
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0);
    format!("{}\n{}", compile_error(line, "syntax error"), info.trim_end())
}

/// 1-based line of the first line starting with `directive`, 0 when absent.
fn directive_line(source: &str, directive: &str) -> usize {
    source
        .lines()
        .position(|line| line.trim_start().starts_with(directive))
        .map_or(0, |index| index + 1)
}

/// Parses `source` and extracts its global interface, or returns an info log.
fn analyze(stage: ShaderStage, source: &str) -> Result<Interface, String> {
    if source.trim().is_empty() {
        return Err(compile_error(0, "shader source is empty"));
    }
    let unit = TranslationUnit::parse(source).map_err(|e| syntax_error(&e.info))?;

    let mut reads = ReadNames::default();
    unit.visit(&mut reads);

    let mut has_main = false;
    let mut interface = Interface::default();
    for (index, declaration) in unit.0.0.iter().enumerate() {
        let list = match declaration {
            ExternalDeclaration::Preprocessor(Preprocessor::Version(_)) if index > 0 => {
                return Err(compile_error(
                    directive_line(source, "#version"),
                    "#version must occur before anything else",
                ));
            }
            ExternalDeclaration::FunctionDefinition(function) => {
                has_main |= function.prototype.name.0 == "main";
                continue;
            }
            ExternalDeclaration::Declaration(Declaration::InitDeclaratorList(list)) => list,
            _ => continue,
        };
        let Some(storage) = storage_of(&list.head.ty) else {
            continue;
        };
        let target = match (storage, stage) {
            (Storage::Uniform, _) => &mut interface.uniforms,
            (Storage::In, _)
            | (Storage::Attribute, ShaderStage::Vertex)
            | (Storage::Varying, ShaderStage::Fragment) => &mut interface.inputs,
            (Storage::Out, _) | (Storage::Varying, ShaderStage::Vertex) => &mut interface.outputs,
            (Storage::Attribute, ShaderStage::Fragment) => {
                return Err(compile_error(
                    0,
                    "'attribute' is not allowed in a fragment shader",
                ));
            }
        };
        let ty = type_name(&list.head.ty.ty.ty);
        let names = list
            .head
            .name
            .iter()
            .chain(list.tail.iter().map(|d| &d.ident.ident));
        for name in names {
            if storage == Storage::Uniform && !reads.0.contains(&name.0) {
                continue;
            }
            target.push(Variable {
                ty: ty.clone(),
                name: name.0.clone(),
            });
        }
    }

    if !has_main {
        return Err(compile_error(0, "no definition of 'void main()'"));
    }
    Ok(interface)
}

/// Every name read as a variable anywhere in the unit.
#[derive(Default)]
struct ReadNames(HashSet<String>);

impl Visitor for ReadNames {
    fn visit_expr(&mut self, expr: &Expr) -> Visit {
        if let Expr::Variable(ident) = expr {
            self.0.insert(ident.0.clone());
        }
        Visit::Children
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Storage {
    Uniform,
    In,
    Out,
    Attribute,
    Varying,
}

fn storage_of(ty: &FullySpecifiedType) -> Option<Storage> {
    ty.qualifier
        .as_ref()?
        .qualifiers
        .0
        .iter()
        .find_map(|spec| match spec {
            TypeQualifierSpec::Storage(StorageQualifier::Uniform) => Some(Storage::Uniform),
            TypeQualifierSpec::Storage(StorageQualifier::In) => Some(Storage::In),
            TypeQualifierSpec::Storage(StorageQualifier::Out) => Some(Storage::Out),
            TypeQualifierSpec::Storage(StorageQualifier::Attribute) => Some(Storage::Attribute),
            TypeQualifierSpec::Storage(StorageQualifier::Varying) => Some(Storage::Varying),
            _ => None,
        })
}

/// GLSL spelling of a type.
fn type_name(ty: &TypeSpecifierNonArray) -> String {
    let name = match ty {
        TypeSpecifierNonArray::Void => "void",
        TypeSpecifierNonArray::Bool => "bool",
        TypeSpecifierNonArray::Int => "int",
        TypeSpecifierNonArray::UInt => "uint",
        TypeSpecifierNonArray::Float => "float",
        TypeSpecifierNonArray::Double => "double",
        TypeSpecifierNonArray::Vec2 => "vec2",
        TypeSpecifierNonArray::Vec3 => "vec3",
        TypeSpecifierNonArray::Vec4 => "vec4",
        TypeSpecifierNonArray::IVec2 => "ivec2",
        TypeSpecifierNonArray::IVec3 => "ivec3",
        TypeSpecifierNonArray::IVec4 => "ivec4",
        TypeSpecifierNonArray::BVec2 => "bvec2",
        TypeSpecifierNonArray::BVec3 => "bvec3",
        TypeSpecifierNonArray::BVec4 => "bvec4",
        TypeSpecifierNonArray::Mat2 => "mat2",
        TypeSpecifierNonArray::Mat3 => "mat3",
        TypeSpecifierNonArray::Mat4 => "mat4",
        TypeSpecifierNonArray::Sampler2D => "sampler2D",
        TypeSpecifierNonArray::Sampler3D => "sampler3D",
        TypeSpecifierNonArray::SamplerCube => "samplerCube",
        TypeSpecifierNonArray::TypeName(name) => return name.0.clone(),
        other => return format!("{other:?}"),
    };
    name.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASS_VS: &str = "#version 330 core\nlayout (location = 0) in vec3 aPos;\nlayout (location = 1) in vec2 aTexCoord;\nout vec2 TexCoord;\nvoid main() {\n    gl_Position = vec4(aPos, 1.0);\n    TexCoord = aTexCoord;\n}\n";
    const TEX_FS: &str = "#version 330 core\nout vec4 FragColor;\nin vec2 TexCoord;\nuniform sampler2D texture1, texture2;\nuniform float mixValue;\nvoid main() {\n    FragColor = mix(texture(texture1, TexCoord), texture(texture2, TexCoord), mixValue);\n}\n";

    fn compile(gl: &HeadlessGl, stage: ShaderStage, src: &str) -> HeadlessShader {
        let shader = gl.create_shader(stage).unwrap();
        gl.compile_shader(shader, src);
        shader
    }

    fn build(gl: &HeadlessGl, vs: &str, fs: &str) -> HeadlessProgram {
        let v = compile(gl, ShaderStage::Vertex, vs);
        let f = compile(gl, ShaderStage::Fragment, fs);
        let program = gl.create_program().unwrap();
        gl.attach_shader(program, v);
        gl.attach_shader(program, f);
        gl.link_program(program);
        program
    }

    #[test]
    fn unbalanced_parenthesis_fails_compile() {
        let gl = HeadlessGl::new();
        let shader = compile(
            &gl,
            ShaderStage::Fragment,
            "#version 330 core\nout vec4 FragColor;\nvoid main() {\n    FragColor = vec4(1.0;\n}\n",
        );
        assert!(!gl.shader_compile_status(shader));
        let log = gl.shader_info_log(shader);
        assert!(log.starts_with("0:"), "{log}");
    }

    #[test]
    fn missing_semicolon_fails_compile() {
        let gl = HeadlessGl::new();
        let shader = compile(
            &gl,
            ShaderStage::Fragment,
            "#version 330 core\nout vec4 FragColor;\nvoid main() {\n    FragColor = vec4(1.0, 0.0, 0.0, 1.0)\n}\n",
        );
        assert!(!gl.shader_compile_status(shader));
        assert!(!gl.shader_info_log(shader).is_empty());
    }

    #[test]
    fn malformed_expression_fails_compile() {
        let gl = HeadlessGl::new();
        let shader = compile(
            &gl,
            ShaderStage::Fragment,
            "#version 330 core\nout vec4 FragColor;\nvoid main() {\n    FragColor = = vec4(undeclared) +;\n}\n",
        );
        assert!(!gl.shader_compile_status(shader));
        assert!(gl.shader_info_log(shader).contains("error"));
    }

    #[test]
    fn syntax_error_log_names_the_line() {
        let log = syntax_error("0: at line 4, in Char:\n    FragColor = = 1.0;\n                ^\n");
        assert!(log.starts_with("0:4: error: syntax error"), "{log}");
        assert!(log.contains("FragColor = = 1.0;"));
        assert!(syntax_error("incomplete parser").starts_with("0:0: error"));
    }

    #[test]
    fn unread_uniforms_are_inactive() {
        let gl = HeadlessGl::new();
        let fs = "#version 330 core\nout vec4 FragColor;\nuniform float unused;\nuniform vec3 tint;\nvoid main() { FragColor = vec4(tint, 1.0); }\n";
        let program = build(&gl, PASS_VS, fs);
        assert!(gl.program_link_status(program), "{}", gl.program_info_log(program));
        assert_eq!(
            gl.active_uniforms(program),
            vec![("vec3".to_owned(), "tint".to_owned())]
        );
    }

    #[test]
    fn comments_are_ignored() {
        let gl = HeadlessGl::new();
        let shader = compile(
            &gl,
            ShaderStage::Fragment,
            "#version 330 core\n/* { unbalanced\n ( */\nout vec4 FragColor; // )\nvoid main() { FragColor = vec4(1.0); }\n",
        );
        assert!(gl.shader_compile_status(shader), "{}", gl.shader_info_log(shader));
    }

    #[test]
    fn version_must_come_first() {
        let gl = HeadlessGl::new();
        let shader = compile(
            &gl,
            ShaderStage::Vertex,
            "void main() {}\n#version 330 core\n",
        );
        assert!(gl.shader_info_log(shader).contains("0:2: error"));
    }

    #[test]
    fn missing_main_fails() {
        let gl = HeadlessGl::new();
        let shader = compile(&gl, ShaderStage::Vertex, "#version 330 core\nvoid mian() {}\n");
        assert!(!gl.shader_compile_status(shader));
        assert!(gl.shader_info_log(shader).contains("main"));
    }

    #[test]
    fn samplers_link_and_accept_ints() {
        let gl = HeadlessGl::new();
        let program = build(&gl, PASS_VS, TEX_FS);
        assert!(gl.program_link_status(program), "{}", gl.program_info_log(program));
        assert_eq!(
            gl.active_uniforms(program),
            vec![
                ("float".to_owned(), "mixValue".to_owned()),
                ("sampler2D".to_owned(), "texture1".to_owned()),
                ("sampler2D".to_owned(), "texture2".to_owned()),
            ]
        );

        gl.use_program(Some(program));
        let loc = gl.uniform_location(program, "texture2").unwrap();
        gl.set_uniform(&loc, UniformValue::Int(1));
        assert_eq!(gl.uniform_value(program, "texture2"), Some(UniformValue::Int(1)));

        gl.set_uniform(&loc, UniformValue::Vec3(glam::Vec3::ONE));
        assert_eq!(gl.take_errors().len(), 1);
        assert_eq!(gl.uniform_value(program, "texture2"), Some(UniformValue::Int(1)));
    }

    #[test]
    fn legacy_varyings_match_across_stages() {
        let gl = HeadlessGl::new();
        let vs = "attribute vec3 aPos;\nvarying vec3 vColor;\nvoid main() { vColor = aPos; gl_Position = vec4(aPos, 1.0); }\n";
        let fs = "varying vec3 vColor;\nvoid main() { gl_FragColor = vec4(vColor, 1.0); }\n";
        let program = build(&gl, vs, fs);
        assert!(gl.program_link_status(program), "{}", gl.program_info_log(program));
    }

    #[test]
    fn varying_type_mismatch_fails_link() {
        let gl = HeadlessGl::new();
        let fs = "#version 330 core\nin vec3 TexCoord;\nout vec4 FragColor;\nvoid main() { FragColor = vec4(TexCoord, 1.0); }\n";
        let program = build(&gl, PASS_VS, fs);
        assert!(!gl.program_link_status(program));
        assert!(gl.program_info_log(program).contains("vec2"));
    }

    #[test]
    fn linking_without_fragment_stage_fails() {
        let gl = HeadlessGl::new();
        let v = compile(&gl, ShaderStage::Vertex, PASS_VS);
        let program = gl.create_program().unwrap();
        gl.attach_shader(program, v);
        gl.link_program(program);
        assert!(!gl.program_link_status(program));
        assert!(gl.program_info_log(program).contains("fragment"));
    }

    #[test]
    fn upload_to_foreign_program_is_an_error() {
        let gl = HeadlessGl::new();
        let a = build(&gl, PASS_VS, TEX_FS);
        let b = build(&gl, PASS_VS, TEX_FS);
        let loc = gl.uniform_location(a, "mixValue").unwrap();
        gl.use_program(Some(b));
        gl.set_uniform(&loc, UniformValue::Float(0.2));
        assert_eq!(gl.uniform_value(a, "mixValue"), None);
        assert_eq!(gl.uniform_value(b, "mixValue"), None);
        assert_eq!(gl.take_errors().len(), 1);
    }

    #[test]
    fn deleting_current_program_unbinds_it() {
        let gl = HeadlessGl::new();
        let program = build(&gl, PASS_VS, TEX_FS);
        gl.use_program(Some(program));
        gl.delete_program(program);
        assert_eq!(gl.current_program(), None);
        assert_eq!(gl.live_programs(), 0);
    }
}
