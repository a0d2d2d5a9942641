use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::num::NonZeroU32;

use lantern_glsl::Stage;

use super::GraphicsApi;
use super::types::{
    AttribPointer, BlendMode, BufferHandle, BufferTarget, BufferUsage, ProgramHandle,
    SamplerParams, ShaderHandle, TextureHandle, UniformLocation, UniformValue, VertexArrayHandle,
};

/// One recorded graphics call.
///
/// Payloads are summarized (byte lengths, not bytes) except where the value is
/// what a caller wants to assert on.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateBuffer(BufferHandle),
    DeleteBuffer(BufferHandle),
    BindBuffer(BufferTarget, Option<BufferHandle>),
    BufferData { target: BufferTarget, len: usize, usage: BufferUsage },
    BufferReserve { target: BufferTarget, size: usize, usage: BufferUsage },
    BufferSubData { target: BufferTarget, offset: usize, len: usize },

    CreateVertexArray(VertexArrayHandle),
    DeleteVertexArray(VertexArrayHandle),
    BindVertexArray(Option<VertexArrayHandle>),
    VertexAttribPointer(AttribPointer),
    EnableVertexAttrib(u32),

    CreateShader(Stage, ShaderHandle),
    ShaderSource(ShaderHandle),
    CompileShader(ShaderHandle),
    DeleteShader(ShaderHandle),

    CreateProgram(ProgramHandle),
    AttachShader(ProgramHandle, ShaderHandle),
    LinkProgram(ProgramHandle),
    ValidateProgram(ProgramHandle),
    UseProgram(Option<ProgramHandle>),
    DeleteProgram(ProgramHandle),
    UniformLocation { program: ProgramHandle, name: String },
    SetUniform(UniformLocation, UniformValue),

    CreateTexture(TextureHandle),
    DeleteTexture(TextureHandle),
    ActiveTexture(u32),
    BindTexture(Option<TextureHandle>),
    TextureParams(SamplerParams),
    TextureImage { width: u32, height: u32, len: usize },

    ClearColor([f32; 4]),
    Clear,
    Blend(Option<BlendMode>),
    DrawIndexed { count: u32 },
}

/// Headless [`GraphicsApi`] that records every call.
///
/// Object names count up from 1 and are never reused. Behaviour that a real
/// driver decides (which uniforms survive, whether a stage compiles) is
/// scripted with the `with_*` builders.
#[derive(Debug, Default)]
pub struct RecordingApi {
    next_name: Cell<u32>,
    calls: RefCell<Vec<Call>>,
    live: RefCell<HashSet<u32>>,

    uniforms: Vec<String>,
    compile_errors: HashMap<Stage, String>,
    link_error: Option<String>,
    validate_error: Option<String>,
    fail_allocation: bool,

    stages: RefCell<HashMap<ShaderHandle, Stage>>,
    attached: RefCell<HashMap<ProgramHandle, Vec<ShaderHandle>>>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uniform names the "linked" program exposes. Locations follow declaration order.
    pub fn with_uniforms<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.uniforms.extend(names.into_iter().map(Into::into));
        self
    }

    /// Every shader of `stage` fails to compile with `log`.
    pub fn with_compile_error(mut self, stage: Stage, log: impl Into<String>) -> Self {
        self.compile_errors.insert(stage, log.into());
        self
    }

    /// Every program fails to link with `log`.
    pub fn with_link_error(mut self, log: impl Into<String>) -> Self {
        self.link_error = Some(log.into());
        self
    }

    /// Every program links but fails validation with `log`.
    pub fn with_validate_error(mut self, log: impl Into<String>) -> Self {
        self.validate_error = Some(log.into());
        self
    }

    /// Every object creation fails, as if the context were lost.
    pub fn with_allocation_failure(mut self) -> Self {
        self.fail_allocation = true;
        self
    }

    /// All calls recorded so far, in issue order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// How many times `name` was looked up on any program.
    pub fn uniform_lookups(&self, name: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| matches!(c, Call::UniformLocation { name: n, .. } if n == name))
            .count()
    }

    /// Element counts of every indexed draw, in order.
    pub fn draw_calls(&self) -> Vec<u32> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|c| match c {
                Call::DrawIndexed { count } => Some(*count),
                _ => None,
            })
            .collect()
    }

    /// Objects created and not yet deleted.
    pub fn live_objects(&self) -> usize {
        self.live.borrow().len()
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn allocate(&self) -> Result<NonZeroU32, String> {
        if self.fail_allocation {
            return Err("context lost".to_string());
        }
        let name = NonZeroU32::MIN.saturating_add(self.next_name.get());
        self.next_name.set(name.get());
        self.live.borrow_mut().insert(name.get());
        Ok(name)
    }

    fn release(&self, name: NonZeroU32) {
        if !self.live.borrow_mut().remove(&name.get()) {
            log::warn!("recording: object {name} released twice or never created");
        }
    }

    fn stage_compiles(&self, shader: ShaderHandle) -> bool {
        match self.stages.borrow().get(&shader) {
            Some(stage) => !self.compile_errors.contains_key(stage),
            None => false,
        }
    }
}

impl GraphicsApi for RecordingApi {
    fn version(&self) -> String {
        "recording".to_string()
    }

    fn create_buffer(&self) -> Result<BufferHandle, String> {
        let handle = BufferHandle(self.allocate()?);
        self.record(Call::CreateBuffer(handle));
        Ok(handle)
    }

    fn delete_buffer(&self, buffer: BufferHandle) {
        self.release(buffer.0);
        self.record(Call::DeleteBuffer(buffer));
    }

    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferHandle>) {
        self.record(Call::BindBuffer(target, buffer));
    }

    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage) {
        self.record(Call::BufferData { target, len: data.len(), usage });
    }

    fn buffer_reserve(&self, target: BufferTarget, size_bytes: usize, usage: BufferUsage) {
        self.record(Call::BufferReserve { target, size: size_bytes, usage });
    }

    fn buffer_sub_data(&self, target: BufferTarget, offset: usize, data: &[u8]) {
        self.record(Call::BufferSubData { target, offset, len: data.len() });
    }

    fn create_vertex_array(&self) -> Result<VertexArrayHandle, String> {
        let handle = VertexArrayHandle(self.allocate()?);
        self.record(Call::CreateVertexArray(handle));
        Ok(handle)
    }

    fn delete_vertex_array(&self, vertex_array: VertexArrayHandle) {
        self.release(vertex_array.0);
        self.record(Call::DeleteVertexArray(vertex_array));
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>) {
        self.record(Call::BindVertexArray(vertex_array));
    }

    fn vertex_attrib_pointer(&self, attr: &AttribPointer) {
        self.record(Call::VertexAttribPointer(*attr));
    }

    fn enable_vertex_attrib(&self, index: u32) {
        self.record(Call::EnableVertexAttrib(index));
    }

    fn create_shader(&self, stage: Stage) -> Result<ShaderHandle, String> {
        let handle = ShaderHandle(self.allocate()?);
        self.stages.borrow_mut().insert(handle, stage);
        self.record(Call::CreateShader(stage, handle));
        Ok(handle)
    }

    fn shader_source(&self, shader: ShaderHandle, _source: &str) {
        self.record(Call::ShaderSource(shader));
    }

    fn compile_shader(&self, shader: ShaderHandle) {
        self.record(Call::CompileShader(shader));
    }

    fn shader_compile_status(&self, shader: ShaderHandle) -> bool {
        self.stage_compiles(shader)
    }

    fn shader_info_log(&self, shader: ShaderHandle) -> String {
        self.stages
            .borrow()
            .get(&shader)
            .and_then(|stage| self.compile_errors.get(stage))
            .cloned()
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: ShaderHandle) {
        self.release(shader.0);
        self.record(Call::DeleteShader(shader));
    }

    fn create_program(&self) -> Result<ProgramHandle, String> {
        let handle = ProgramHandle(self.allocate()?);
        self.record(Call::CreateProgram(handle));
        Ok(handle)
    }

    fn attach_shader(&self, program: ProgramHandle, shader: ShaderHandle) {
        self.attached.borrow_mut().entry(program).or_default().push(shader);
        self.record(Call::AttachShader(program, shader));
    }

    fn link_program(&self, program: ProgramHandle) {
        self.record(Call::LinkProgram(program));
    }

    fn program_link_status(&self, program: ProgramHandle) -> bool {
        if self.link_error.is_some() {
            return false;
        }
        let attached = self.attached.borrow();
        let shaders = attached.get(&program).map(Vec::as_slice).unwrap_or_default();
        shaders.len() == Stage::ALL.len() && shaders.iter().all(|s| self.stage_compiles(*s))
    }

    fn validate_program(&self, program: ProgramHandle) -> bool {
        self.record(Call::ValidateProgram(program));
        self.validate_error.is_none() && self.program_link_status(program)
    }

    fn program_info_log(&self, program: ProgramHandle) -> String {
        if let Some(log) = &self.link_error {
            return log.clone();
        }
        if self.program_link_status(program) {
            self.validate_error.clone().unwrap_or_default()
        } else {
            "attached shaders are missing or did not compile".to_string()
        }
    }

    fn use_program(&self, program: Option<ProgramHandle>) {
        self.record(Call::UseProgram(program));
    }

    fn delete_program(&self, program: ProgramHandle) {
        self.attached.borrow_mut().remove(&program);
        self.release(program.0);
        self.record(Call::DeleteProgram(program));
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> UniformLocation {
        self.record(Call::UniformLocation { program, name: name.to_string() });
        self.uniforms
            .iter()
            .position(|u| u == name)
            .and_then(|idx| i32::try_from(idx).ok())
            .map_or(UniformLocation::NOT_FOUND, UniformLocation::new)
    }

    fn set_uniform(&self, location: UniformLocation, value: &UniformValue) {
        self.record(Call::SetUniform(location, *value));
    }

    fn create_texture(&self) -> Result<TextureHandle, String> {
        let handle = TextureHandle(self.allocate()?);
        self.record(Call::CreateTexture(handle));
        Ok(handle)
    }

    fn delete_texture(&self, texture: TextureHandle) {
        self.release(texture.0);
        self.record(Call::DeleteTexture(texture));
    }

    fn active_texture_unit(&self, unit: u32) {
        self.record(Call::ActiveTexture(unit));
    }

    fn bind_texture(&self, texture: Option<TextureHandle>) {
        self.record(Call::BindTexture(texture));
    }

    fn texture_params(&self, params: SamplerParams) {
        self.record(Call::TextureParams(params));
    }

    fn texture_image_rgba8(&self, width: u32, height: u32, pixels: &[u8]) {
        self.record(Call::TextureImage { width, height, len: pixels.len() });
    }

    fn set_clear_color(&self, rgba: [f32; 4]) {
        self.record(Call::ClearColor(rgba));
    }

    fn clear_color_buffer(&self) {
        self.record(Call::Clear);
    }

    fn set_blend(&self, mode: Option<BlendMode>) {
        self.record(Call::Blend(mode));
    }

    fn draw_indexed_triangles(&self, count: u32) {
        self.record(Call::DrawIndexed { count });
    }
}
