use glam::{Mat4, Vec2, Vec3, Vec4};
use lantern_glsl::{ShaderSource, Stage};

use crate::context::{Gl, ProgramHandle, ShaderHandle, UniformLocation, UniformValue};
use crate::error::{ObjectKind, ResourceError, ShaderError};

use super::UniformCache;

/// A linked program object with its uniform location cache.
///
/// Uniform setters act on the program currently in use (see [`Self::bind`]);
/// calling them on an unbound program is a programmer error.
#[derive(Debug)]
pub struct ShaderProgram {
    gl: Gl,
    handle: ProgramHandle,
    /// Source path or name, for diagnostics only.
    label: String,
    uniforms: UniformCache,
}

impl ShaderProgram {
    /// Compiles both stages and links them.
    pub fn new(
        gl: &Gl,
        label: impl Into<String>,
        vertex: &str,
        fragment: &str,
    ) -> Result<Self, ShaderError> {
        let label = label.into();
        let handle = build(gl, &label, vertex, fragment)?;
        log::debug!("built program '{label}' as {handle}");
        Ok(Self {
            gl: gl.clone(),
            handle,
            label,
            uniforms: UniformCache::new(),
        })
    }

    pub fn from_source(
        gl: &Gl,
        label: impl Into<String>,
        source: &ShaderSource,
    ) -> Result<Self, ShaderError> {
        Self::new(gl, label, &source.vertex, &source.fragment)
    }

    /// Splits a combined `#shader vertex` / `#shader fragment` text, then builds it.
    pub fn from_combined(gl: &Gl, label: impl Into<String>, text: &str) -> Result<Self, ShaderError> {
        let label = label.into();
        let source = lantern_glsl::parse_str(text)
            .map_err(|error| ShaderError::Parse { label: label.clone(), error })?;
        Self::from_source(gl, label, &source)
    }

    pub fn bind(&self) {
        self.gl.use_program(Some(self.handle));
    }

    pub fn unbind(&self) {
        self.gl.use_program(None);
    }

    pub fn is_bound(&self) -> bool {
        self.gl.bound_program() == Some(self.handle)
    }

    #[inline]
    pub fn handle(&self) -> ProgramHandle {
        self.handle
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn uniform_cache(&self) -> &UniformCache {
        &self.uniforms
    }

    /// Location of `name`, queried from the driver at most once.
    pub fn uniform_location(&mut self, name: &str) -> UniformLocation {
        let (gl, handle) = (&self.gl, self.handle);
        self.uniforms
            .resolve(&self.label, name, |n| gl.api().uniform_location(handle, n))
    }

    /// Sets `name` on this program. A name the program does not expose is a no-op.
    pub fn set_uniform(&mut self, name: &str, value: UniformValue) {
        debug_assert!(
            self.is_bound(),
            "set_uniform('{name}') on '{}' while it is not the bound program",
            self.label
        );
        let location = self.uniform_location(name);
        if location.is_found() {
            self.gl.api().set_uniform(location, &value);
        }
    }

    pub fn set_uniform_i32(&mut self, name: &str, value: i32) {
        self.set_uniform(name, UniformValue::I32(value));
    }

    pub fn set_uniform_f32(&mut self, name: &str, value: f32) {
        self.set_uniform(name, UniformValue::F32(value));
    }

    pub fn set_uniform_vec2(&mut self, name: &str, value: Vec2) {
        self.set_uniform(name, UniformValue::Vec2(value.to_array()));
    }

    pub fn set_uniform_vec3(&mut self, name: &str, value: Vec3) {
        self.set_uniform(name, UniformValue::Vec3(value.to_array()));
    }

    pub fn set_uniform_vec4(&mut self, name: &str, value: Vec4) {
        self.set_uniform(name, UniformValue::Vec4(value.to_array()));
    }

    /// Uploads `value` column-major, untransposed.
    pub fn set_uniform_mat4(&mut self, name: &str, value: &Mat4) {
        self.set_uniform(name, UniformValue::Mat4(value.to_cols_array()));
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        log::trace!("deleting program '{}' ({})", self.label, self.handle);
        self.gl.delete_program(self.handle);
    }
}

fn compile(gl: &Gl, label: &str, stage: Stage, source: &str) -> Result<ShaderHandle, ShaderError> {
    let api = gl.api();
    let shader = api
        .create_shader(stage)
        .map_err(|msg| ResourceError::new(ObjectKind::Shader(stage), msg))?;
    api.shader_source(shader, source);
    api.compile_shader(shader);

    if api.shader_compile_status(shader) {
        return Ok(shader);
    }

    let log = api.shader_info_log(shader);
    log::error!("failed to compile {stage} shader of '{label}':\n{log}");
    api.delete_shader(shader);
    Err(ShaderError::Compile {
        label: label.to_owned(),
        stage,
        log,
    })
}

fn build(gl: &Gl, label: &str, vertex: &str, fragment: &str) -> Result<ProgramHandle, ShaderError> {
    let api = gl.api();

    let vs = compile(gl, label, Stage::Vertex, vertex)?;
    let fs = match compile(gl, label, Stage::Fragment, fragment) {
        Ok(fs) => fs,
        Err(err) => {
            api.delete_shader(vs);
            return Err(err);
        }
    };

    let program = match api.create_program() {
        Ok(program) => program,
        Err(msg) => {
            api.delete_shader(vs);
            api.delete_shader(fs);
            return Err(ResourceError::new(ObjectKind::Program, msg).into());
        }
    };

    api.attach_shader(program, vs);
    api.attach_shader(program, fs);
    api.link_program(program);
    let linked = api.program_link_status(program);
    let validated = linked && api.validate_program(program);

    // Stage objects are only needed until link; release them on every path.
    api.delete_shader(vs);
    api.delete_shader(fs);

    if validated {
        return Ok(program);
    }

    let log = api.program_info_log(program);
    gl.delete_program(program);
    if linked {
        log::error!("program '{label}' failed validation:\n{log}");
        Err(ShaderError::Validate { label: label.to_owned(), log })
    } else {
        log::error!("failed to link program '{label}':\n{log}");
        Err(ShaderError::Link { label: label.to_owned(), log })
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::context::{Call, RecordingApi};

    const VS: &str = "#version 330 core\nvoid main() { gl_Position = vec4(0.0); }\n";
    const FS: &str = "#version 330 core\nout vec4 c;\nvoid main() { c = vec4(1.0); }\n";

    fn setup(api: RecordingApi) -> (Rc<RecordingApi>, Gl) {
        let api = Rc::new(api);
        let gl = Gl::from_shared(api.clone());
        (api, gl)
    }

    #[test]
    fn build_deletes_stages_and_keeps_program() {
        let (api, gl) = setup(RecordingApi::new());
        let program = ShaderProgram::new(&gl, "basic", VS, FS).unwrap();

        // Only the program object survives the build.
        assert_eq!(api.live_objects(), 1);
        let calls = api.calls();
        let link = calls
            .iter()
            .position(|c| *c == Call::LinkProgram(program.handle()))
            .unwrap();
        let validate = calls
            .iter()
            .position(|c| *c == Call::ValidateProgram(program.handle()))
            .unwrap();
        let first_delete = calls
            .iter()
            .position(|c| matches!(c, Call::DeleteShader(_)))
            .unwrap();
        assert!(link < validate && validate < first_delete);

        drop(program);
        assert_eq!(api.live_objects(), 0);
    }

    #[test]
    fn uniform_lookup_hits_driver_once() {
        let (api, gl) = setup(RecordingApi::new().with_uniforms(["u_Color"]));
        let mut program = ShaderProgram::new(&gl, "basic", VS, FS).unwrap();

        let first = program.uniform_location("u_Color");
        let second = program.uniform_location("u_Color");
        assert_eq!(first, second);
        assert_eq!(first.raw(), 0);
        assert_eq!(api.uniform_lookups("u_Color"), 1);
    }

    #[test]
    fn unknown_uniform_is_a_cached_no_op() {
        let (api, gl) = setup(RecordingApi::new());
        let mut program = ShaderProgram::new(&gl, "basic", VS, FS).unwrap();
        program.bind();

        program.set_uniform_f32("u_Missing", 1.0);
        program.set_uniform_f32("u_Missing", 2.0);

        assert_eq!(program.uniform_location("u_Missing"), UniformLocation::NOT_FOUND);
        assert_eq!(api.uniform_lookups("u_Missing"), 1);
        assert!(!api.calls().iter().any(|c| matches!(c, Call::SetUniform(..))));
    }

    #[test]
    fn setters_pass_values_through() {
        let (api, gl) = setup(RecordingApi::new().with_uniforms(["u_Texture", "u_MVP", "u_Color"]));
        let mut program = ShaderProgram::new(&gl, "basic", VS, FS).unwrap();
        program.bind();
        api.clear_calls();

        let proj = Mat4::orthographic_rh_gl(-1.0, 1.0, -0.75, 0.75, -1.0, 1.0);
        program.set_uniform_i32("u_Texture", 0);
        program.set_uniform_mat4("u_MVP", &proj);
        program.set_uniform_vec4("u_Color", Vec4::new(0.2, 0.3, 0.8, 1.0));

        let sets: Vec<_> = api
            .calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::SetUniform(loc, value) => Some((loc.raw(), value)),
                _ => None,
            })
            .collect();
        assert_eq!(
            sets,
            vec![
                (0, UniformValue::I32(0)),
                (1, UniformValue::Mat4(proj.to_cols_array())),
                (2, UniformValue::Vec4([0.2, 0.3, 0.8, 1.0])),
            ]
        );
        // Column-major: translation lives in the last column.
        let UniformValue::Mat4(m) = sets[1].1 else { unreachable!() };
        assert_eq!(&m[12..16], &proj.w_axis.to_array());
    }

    #[test]
    fn fragment_compile_failure_never_links() {
        let api = RecordingApi::new().with_compile_error(Stage::Fragment, "0:3: syntax error");
        let (api, gl) = setup(api);

        let err = ShaderProgram::new(&gl, "broken.glsl", VS, "void main( {").unwrap_err();
        assert_eq!(
            err,
            ShaderError::Compile {
                label: "broken.glsl".into(),
                stage: Stage::Fragment,
                log: "0:3: syntax error".into(),
            }
        );
        let calls = api.calls();
        assert!(!calls.iter().any(|c| matches!(c, Call::CreateProgram(_) | Call::LinkProgram(_))));
        assert_eq!(api.live_objects(), 0);
    }

    #[test]
    fn vertex_compile_failure_stops_before_fragment() {
        let api = RecordingApi::new().with_compile_error(Stage::Vertex, "0:1: bad token");
        let (api, gl) = setup(api);

        let err = ShaderProgram::new(&gl, "broken.glsl", "garbage", FS).unwrap_err();
        assert!(matches!(err, ShaderError::Compile { stage: Stage::Vertex, .. }));
        assert!(err.to_string().contains("0:1: bad token"));
        assert!(!api.calls().iter().any(|c| matches!(c, Call::CreateShader(Stage::Fragment, _))));
        assert_eq!(api.live_objects(), 0);
    }

    #[test]
    fn link_failure_releases_everything() {
        let (api, gl) = setup(RecordingApi::new().with_link_error("varying mismatch"));

        let err = ShaderProgram::new(&gl, "mismatch", VS, FS).unwrap_err();
        assert_eq!(
            err,
            ShaderError::Link { label: "mismatch".into(), log: "varying mismatch".into() }
        );
        let stage_deletes = api
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::DeleteShader(_)))
            .count();
        assert_eq!(stage_deletes, 2);
        assert_eq!(api.live_objects(), 0);
    }

    #[test]
    fn validation_failure_releases_everything() {
        let (api, gl) = setup(RecordingApi::new().with_validate_error("sampler unit clash"));

        let err = ShaderProgram::new(&gl, "clash", VS, FS).unwrap_err();
        assert_eq!(
            err,
            ShaderError::Validate { label: "clash".into(), log: "sampler unit clash".into() }
        );
        let calls = api.calls();
        assert!(calls.iter().any(|c| matches!(c, Call::ValidateProgram(_))));
        let stage_deletes = calls.iter().filter(|c| matches!(c, Call::DeleteShader(_))).count();
        assert_eq!(stage_deletes, 2);
        assert!(calls.iter().any(|c| matches!(c, Call::DeleteProgram(_))));
        assert_eq!(api.live_objects(), 0);
    }

    #[test]
    fn combined_source_is_split_before_compiling() {
        let (api, gl) = setup(RecordingApi::new());
        let text = format!("#shader vertex\n{VS}#shader fragment\n{FS}");
        let program = ShaderProgram::from_combined(&gl, "combined", &text).unwrap();
        assert_eq!(program.label(), "combined");
        assert_eq!(api.live_objects(), 1);
    }

    #[test]
    fn combined_source_without_fragment_is_a_parse_error() {
        let (api, gl) = setup(RecordingApi::new());
        let err = ShaderProgram::from_combined(&gl, "half", "#shader vertex\nvoid main() {}\n")
            .unwrap_err();
        assert!(matches!(err, ShaderError::Parse { .. }));
        assert!(api.calls().is_empty());
    }

    #[test]
    fn bind_and_unbind_track_current_program() {
        let (_api, gl) = setup(RecordingApi::new());
        let program = ShaderProgram::new(&gl, "basic", VS, FS).unwrap();
        program.bind();
        assert!(program.is_bound());
        program.unbind();
        assert_eq!(gl.bound_program(), None);
    }
}
