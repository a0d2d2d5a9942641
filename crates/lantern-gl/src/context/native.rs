use ::glow::HasContext;
use lantern_glsl::Stage;

use super::GraphicsApi;
use super::types::{
    AttribPointer, BlendMode, BufferHandle, BufferTarget, BufferUsage, ElementType, ProgramHandle,
    SamplerParams, ShaderHandle, TextureHandle, UniformLocation, UniformValue, VertexArrayHandle,
};

/// Options applied when wrapping a `glow::Context`.
#[derive(Debug, Clone)]
pub struct GlowConfig {
    /// Route `KHR_debug` messages into the `log` facade when the driver supports it.
    pub debug_output: bool,
    /// Deliver debug messages on the offending call instead of asynchronously.
    pub synchronous_debug: bool,
}

impl Default for GlowConfig {
    fn default() -> Self {
        Self {
            debug_output: cfg!(debug_assertions),
            synchronous_debug: true,
        }
    }
}

/// [`GraphicsApi`] backed by a real OpenGL 3.3+ core context.
pub struct GlowApi {
    gl: ::glow::Context,
}

impl GlowApi {
    /// Takes ownership of a loaded context.
    ///
    /// # Safety
    ///
    /// `gl` must be current on the calling thread, and must stay current on this
    /// thread for as long as this value (and any `Gl` built from it) is alive.
    pub unsafe fn new(mut gl: ::glow::Context, config: GlowConfig) -> Self {
        unsafe {
            if config.debug_output {
                if gl.supports_debug() {
                    gl.enable(::glow::DEBUG_OUTPUT);
                    if config.synchronous_debug {
                        gl.enable(::glow::DEBUG_OUTPUT_SYNCHRONOUS);
                    }
                    gl.debug_message_callback(log_debug_message);
                    log::debug!("GL debug output enabled");
                } else {
                    log::warn!("GL debug output requested but not supported by this context");
                }
            }
            log::info!("OpenGL {}", gl.get_parameter_string(::glow::VERSION));
        }
        Self { gl }
    }
}

fn log_debug_message(source: u32, kind: u32, id: u32, severity: u32, message: &str) {
    let level = match severity {
        ::glow::DEBUG_SEVERITY_HIGH => log::Level::Error,
        ::glow::DEBUG_SEVERITY_MEDIUM => log::Level::Warn,
        ::glow::DEBUG_SEVERITY_LOW => log::Level::Info,
        _ => log::Level::Trace,
    };
    log::log!(
        target: "lantern_gl::driver",
        level,
        "[source {source:#x} type {kind:#x} id {id}] {message}"
    );
}

fn target(target: BufferTarget) -> u32 {
    match target {
        BufferTarget::Array => ::glow::ARRAY_BUFFER,
        BufferTarget::ElementArray => ::glow::ELEMENT_ARRAY_BUFFER,
    }
}

fn usage(usage: BufferUsage) -> u32 {
    match usage {
        BufferUsage::Static => ::glow::STATIC_DRAW,
        BufferUsage::Dynamic => ::glow::DYNAMIC_DRAW,
    }
}

fn element_type(ty: ElementType) -> u32 {
    match ty {
        ElementType::F32 => ::glow::FLOAT,
        ElementType::U32 => ::glow::UNSIGNED_INT,
        ElementType::U8 => ::glow::UNSIGNED_BYTE,
    }
}

fn stage(stage: Stage) -> u32 {
    match stage {
        Stage::Vertex => ::glow::VERTEX_SHADER,
        Stage::Fragment => ::glow::FRAGMENT_SHADER,
    }
}

// GL takes sizes and offsets as `GLint`/`GLsizei`; everything the wrappers
// pass fits, and saturating keeps a bogus value from wrapping negative.
fn gl_int(v: impl TryInto<i32>) -> i32 {
    v.try_into().unwrap_or(i32::MAX)
}

fn native_location(location: UniformLocation) -> Option<::glow::NativeUniformLocation> {
    location.index().map(::glow::NativeUniformLocation)
}

// SAFETY (all methods below): `GlowApi::new` requires the context to stay current
// on the owning thread for the lifetime of `self`; `Gl` is `!Send`, so calls
// never arrive from another thread.
impl GraphicsApi for GlowApi {
    fn version(&self) -> String {
        unsafe { self.gl.get_parameter_string(::glow::VERSION) }
    }

    fn create_buffer(&self) -> Result<BufferHandle, String> {
        unsafe { self.gl.create_buffer() }.map(|b| BufferHandle(b.0))
    }

    fn delete_buffer(&self, buffer: BufferHandle) {
        unsafe { self.gl.delete_buffer(::glow::NativeBuffer(buffer.0)) }
    }

    fn bind_buffer(&self, t: BufferTarget, buffer: Option<BufferHandle>) {
        unsafe {
            self.gl
                .bind_buffer(target(t), buffer.map(|b| ::glow::NativeBuffer(b.0)))
        }
    }

    fn buffer_data(&self, t: BufferTarget, data: &[u8], u: BufferUsage) {
        unsafe { self.gl.buffer_data_u8_slice(target(t), data, usage(u)) }
    }

    fn buffer_reserve(&self, t: BufferTarget, size_bytes: usize, u: BufferUsage) {
        unsafe { self.gl.buffer_data_size(target(t), gl_int(size_bytes), usage(u)) }
    }

    fn buffer_sub_data(&self, t: BufferTarget, offset: usize, data: &[u8]) {
        unsafe { self.gl.buffer_sub_data_u8_slice(target(t), gl_int(offset), data) }
    }

    fn create_vertex_array(&self) -> Result<VertexArrayHandle, String> {
        unsafe { self.gl.create_vertex_array() }.map(|v| VertexArrayHandle(v.0))
    }

    fn delete_vertex_array(&self, vertex_array: VertexArrayHandle) {
        unsafe {
            self.gl
                .delete_vertex_array(::glow::NativeVertexArray(vertex_array.0))
        }
    }

    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>) {
        unsafe {
            self.gl
                .bind_vertex_array(vertex_array.map(|v| ::glow::NativeVertexArray(v.0)))
        }
    }

    fn vertex_attrib_pointer(&self, attr: &AttribPointer) {
        let size = gl_int(attr.count);
        let stride = gl_int(attr.stride);
        let offset = gl_int(attr.offset);
        let ty = element_type(attr.ty);
        unsafe {
            if attr.ty.is_integer() && !attr.normalized {
                self.gl
                    .vertex_attrib_pointer_i32(attr.index, size, ty, stride, offset);
            } else {
                self.gl
                    .vertex_attrib_pointer_f32(attr.index, size, ty, attr.normalized, stride, offset);
            }
        }
    }

    fn enable_vertex_attrib(&self, index: u32) {
        unsafe { self.gl.enable_vertex_attrib_array(index) }
    }

    fn create_shader(&self, s: Stage) -> Result<ShaderHandle, String> {
        unsafe { self.gl.create_shader(stage(s)) }.map(|sh| ShaderHandle(sh.0))
    }

    fn shader_source(&self, shader: ShaderHandle, source: &str) {
        unsafe { self.gl.shader_source(::glow::NativeShader(shader.0), source) }
    }

    fn compile_shader(&self, shader: ShaderHandle) {
        unsafe { self.gl.compile_shader(::glow::NativeShader(shader.0)) }
    }

    fn shader_compile_status(&self, shader: ShaderHandle) -> bool {
        unsafe { self.gl.get_shader_compile_status(::glow::NativeShader(shader.0)) }
    }

    fn shader_info_log(&self, shader: ShaderHandle) -> String {
        unsafe { self.gl.get_shader_info_log(::glow::NativeShader(shader.0)) }
    }

    fn delete_shader(&self, shader: ShaderHandle) {
        unsafe { self.gl.delete_shader(::glow::NativeShader(shader.0)) }
    }

    fn create_program(&self) -> Result<ProgramHandle, String> {
        unsafe { self.gl.create_program() }.map(|p| ProgramHandle(p.0))
    }

    fn attach_shader(&self, program: ProgramHandle, shader: ShaderHandle) {
        unsafe {
            self.gl.attach_shader(
                ::glow::NativeProgram(program.0),
                ::glow::NativeShader(shader.0),
            )
        }
    }

    fn link_program(&self, program: ProgramHandle) {
        unsafe { self.gl.link_program(::glow::NativeProgram(program.0)) }
    }

    fn program_link_status(&self, program: ProgramHandle) -> bool {
        unsafe { self.gl.get_program_link_status(::glow::NativeProgram(program.0)) }
    }

    fn validate_program(&self, program: ProgramHandle) -> bool {
        let program = ::glow::NativeProgram(program.0);
        unsafe {
            self.gl.validate_program(program);
            self.gl.get_program_validate_status(program)
        }
    }

    fn program_info_log(&self, program: ProgramHandle) -> String {
        unsafe { self.gl.get_program_info_log(::glow::NativeProgram(program.0)) }
    }

    fn use_program(&self, program: Option<ProgramHandle>) {
        unsafe { self.gl.use_program(program.map(|p| ::glow::NativeProgram(p.0))) }
    }

    fn delete_program(&self, program: ProgramHandle) {
        unsafe { self.gl.delete_program(::glow::NativeProgram(program.0)) }
    }

    fn uniform_location(&self, program: ProgramHandle, name: &str) -> UniformLocation {
        let found = unsafe {
            self.gl
                .get_uniform_location(::glow::NativeProgram(program.0), name)
        };
        found
            .and_then(|loc| i32::try_from(loc.0).ok())
            .map_or(UniformLocation::NOT_FOUND, UniformLocation::new)
    }

    fn set_uniform(&self, location: UniformLocation, value: &UniformValue) {
        let Some(loc) = native_location(location) else { return };
        let loc = Some(&loc);
        unsafe {
            match *value {
                UniformValue::I32(v) => self.gl.uniform_1_i32(loc, v),
                UniformValue::F32(v) => self.gl.uniform_1_f32(loc, v),
                UniformValue::Vec2([x, y]) => self.gl.uniform_2_f32(loc, x, y),
                UniformValue::Vec3([x, y, z]) => self.gl.uniform_3_f32(loc, x, y, z),
                UniformValue::Vec4([x, y, z, w]) => self.gl.uniform_4_f32(loc, x, y, z, w),
                UniformValue::Mat4(ref m) => self.gl.uniform_matrix_4_f32_slice(loc, false, m),
            }
        }
    }

    fn create_texture(&self) -> Result<TextureHandle, String> {
        unsafe { self.gl.create_texture() }.map(|t| TextureHandle(t.0))
    }

    fn delete_texture(&self, texture: TextureHandle) {
        unsafe { self.gl.delete_texture(::glow::NativeTexture(texture.0)) }
    }

    fn active_texture_unit(&self, unit: u32) {
        unsafe { self.gl.active_texture(::glow::TEXTURE0 + unit) }
    }

    fn bind_texture(&self, texture: Option<TextureHandle>) {
        unsafe {
            self.gl.bind_texture(
                ::glow::TEXTURE_2D,
                texture.map(|t| ::glow::NativeTexture(t.0)),
            )
        }
    }

    fn texture_params(&self, params: SamplerParams) {
        let filter = if params.linear_filter { ::glow::LINEAR } else { ::glow::NEAREST };
        let wrap = if params.clamp_to_edge { ::glow::CLAMP_TO_EDGE } else { ::glow::REPEAT };
        let t = ::glow::TEXTURE_2D;
        unsafe {
            self.gl.tex_parameter_i32(t, ::glow::TEXTURE_MIN_FILTER, gl_int(filter));
            self.gl.tex_parameter_i32(t, ::glow::TEXTURE_MAG_FILTER, gl_int(filter));
            self.gl.tex_parameter_i32(t, ::glow::TEXTURE_WRAP_S, gl_int(wrap));
            self.gl.tex_parameter_i32(t, ::glow::TEXTURE_WRAP_T, gl_int(wrap));
        }
    }

    fn texture_image_rgba8(&self, width: u32, height: u32, pixels: &[u8]) {
        unsafe {
            self.gl.tex_image_2d(
                ::glow::TEXTURE_2D,
                0,
                gl_int(::glow::RGBA8),
                gl_int(width),
                gl_int(height),
                0,
                ::glow::RGBA,
                ::glow::UNSIGNED_BYTE,
                ::glow::PixelUnpackData::Slice(Some(pixels)),
            )
        }
    }

    fn set_clear_color(&self, [r, g, b, a]: [f32; 4]) {
        unsafe { self.gl.clear_color(r, g, b, a) }
    }

    fn clear_color_buffer(&self) {
        unsafe { self.gl.clear(::glow::COLOR_BUFFER_BIT) }
    }

    fn set_blend(&self, mode: Option<BlendMode>) {
        unsafe {
            match mode {
                Some(BlendMode::Alpha) => {
                    self.gl.enable(::glow::BLEND);
                    self.gl.blend_func(::glow::SRC_ALPHA, ::glow::ONE_MINUS_SRC_ALPHA);
                }
                Some(BlendMode::Premultiplied) => {
                    self.gl.enable(::glow::BLEND);
                    self.gl.blend_func(::glow::ONE, ::glow::ONE_MINUS_SRC_ALPHA);
                }
                None => self.gl.disable(::glow::BLEND),
            }
        }
    }

    fn draw_indexed_triangles(&self, count: u32) {
        unsafe {
            self.gl
                .draw_elements(::glow::TRIANGLES, gl_int(count), ::glow::UNSIGNED_INT, 0)
        }
    }
}
