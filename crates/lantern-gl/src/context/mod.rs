//! Graphics context seam.
//!
//! [`GraphicsApi`] is the set of raw calls the wrappers issue. Two backends
//! implement it:
//! - [`GlowApi`] drives a real OpenGL context through `glow`
//! - [`RecordingApi`] records calls for headless runs and tests
//!
//! [`Gl`] is what every wrapper holds. It owns the backend and the per-context
//! "current binding" state, which is valid from `Gl` creation until the last
//! clone is dropped. `Gl` is `!Send`: GPU objects never leave the thread that
//! owns the context.

mod bindings;
mod native;
mod recording;
mod types;

use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

use lantern_glsl::Stage;

pub use native::{GlowApi, GlowConfig};
pub use bindings::Bindings;
pub use recording::{Call, RecordingApi};
pub use types::{
    AttribPointer, BlendMode, BufferHandle, BufferTarget, BufferUsage, ElementType, ProgramHandle,
    SamplerParams, ShaderHandle, TextureHandle, UniformLocation, UniformValue, VertexArrayHandle,
};

/// Raw graphics calls used by the wrappers.
///
/// Calls act on whatever is currently bound, exactly like the underlying API.
/// Callers go through [`Gl`] for anything that changes bindings so the tracked
/// state stays accurate.
///
/// Creation calls return the driver message on failure.
pub trait GraphicsApi {
    /// Driver/version string, for diagnostics.
    fn version(&self) -> String;

    fn create_buffer(&self) -> Result<BufferHandle, String>;
    fn delete_buffer(&self, buffer: BufferHandle);
    fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferHandle>);
    /// Allocates and fills the buffer bound on `target`.
    fn buffer_data(&self, target: BufferTarget, data: &[u8], usage: BufferUsage);
    /// Allocates `size_bytes` of uninitialized storage on `target`.
    fn buffer_reserve(&self, target: BufferTarget, size_bytes: usize, usage: BufferUsage);
    fn buffer_sub_data(&self, target: BufferTarget, offset: usize, data: &[u8]);

    fn create_vertex_array(&self) -> Result<VertexArrayHandle, String>;
    fn delete_vertex_array(&self, vertex_array: VertexArrayHandle);
    fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>);
    fn vertex_attrib_pointer(&self, attr: &AttribPointer);
    fn enable_vertex_attrib(&self, index: u32);

    fn create_shader(&self, stage: Stage) -> Result<ShaderHandle, String>;
    fn shader_source(&self, shader: ShaderHandle, source: &str);
    fn compile_shader(&self, shader: ShaderHandle);
    fn shader_compile_status(&self, shader: ShaderHandle) -> bool;
    fn shader_info_log(&self, shader: ShaderHandle) -> String;
    fn delete_shader(&self, shader: ShaderHandle);

    fn create_program(&self) -> Result<ProgramHandle, String>;
    fn attach_shader(&self, program: ProgramHandle, shader: ShaderHandle);
    fn link_program(&self, program: ProgramHandle);
    fn program_link_status(&self, program: ProgramHandle) -> bool;
    /// Checks the program can execute in the current state.
    fn validate_program(&self, program: ProgramHandle) -> bool;
    fn program_info_log(&self, program: ProgramHandle) -> String;
    fn use_program(&self, program: Option<ProgramHandle>);
    fn delete_program(&self, program: ProgramHandle);
    fn uniform_location(&self, program: ProgramHandle, name: &str) -> UniformLocation;
    /// Uploads to the currently used program. `NOT_FOUND` is ignored.
    fn set_uniform(&self, location: UniformLocation, value: &UniformValue);

    fn create_texture(&self) -> Result<TextureHandle, String>;
    fn delete_texture(&self, texture: TextureHandle);
    fn active_texture_unit(&self, unit: u32);
    fn bind_texture(&self, texture: Option<TextureHandle>);
    /// Applies sampler state to the texture bound on the active unit.
    fn texture_params(&self, params: SamplerParams);
    /// Uploads RGBA8 pixels to the texture bound on the active unit.
    fn texture_image_rgba8(&self, width: u32, height: u32, pixels: &[u8]);

    fn set_clear_color(&self, rgba: [f32; 4]);
    fn clear_color_buffer(&self);
    fn set_blend(&self, mode: Option<BlendMode>);
    /// Indexed triangle-list draw with `u32` indices from the bound element buffer.
    fn draw_indexed_triangles(&self, count: u32);
}

struct GlInner {
    api: Rc<dyn GraphicsApi>,
    bindings: RefCell<Bindings>,
}

/// Shared handle to a graphics context plus its binding state.
///
/// Cheap to clone. Every wrapper keeps one so it can release its object on drop.
#[derive(Clone)]
pub struct Gl {
    inner: Rc<GlInner>,
}

impl fmt::Debug for Gl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gl")
            .field("bindings", &*self.inner.bindings.borrow())
            .finish_non_exhaustive()
    }
}

impl Gl {
    pub fn new<A: GraphicsApi + 'static>(api: A) -> Self {
        Self::from_shared(Rc::new(api))
    }

    /// Wraps a backend the caller keeps a handle to (e.g. a [`RecordingApi`]).
    pub fn from_shared(api: Rc<dyn GraphicsApi>) -> Self {
        log::debug!("graphics context: {}", api.version());
        Self {
            inner: Rc::new(GlInner {
                api,
                bindings: RefCell::new(Bindings::default()),
            }),
        }
    }

    /// Raw backend access for calls that do not change bindings.
    #[inline]
    pub fn api(&self) -> &dyn GraphicsApi {
        &*self.inner.api
    }

    /// Snapshot access to the tracked binding state.
    pub fn bindings(&self) -> Ref<'_, Bindings> {
        self.inner.bindings.borrow()
    }

    pub fn bound_program(&self) -> Option<ProgramHandle> {
        self.bindings().program
    }

    pub fn bound_vertex_array(&self) -> Option<VertexArrayHandle> {
        self.bindings().vertex_array
    }

    pub fn bound_buffer(&self, target: BufferTarget) -> Option<BufferHandle> {
        self.bindings().buffer(target)
    }

    pub fn bound_texture(&self, unit: u32) -> Option<TextureHandle> {
        self.bindings().texture(unit)
    }

    // ── binding ───────────────────────────────────────────────────────────

    pub fn bind_buffer(&self, target: BufferTarget, buffer: Option<BufferHandle>) {
        self.inner.api.bind_buffer(target, buffer);
        self.inner.bindings.borrow_mut().set_buffer(target, buffer);
    }

    pub fn bind_vertex_array(&self, vertex_array: Option<VertexArrayHandle>) {
        self.inner.api.bind_vertex_array(vertex_array);
        self.inner.bindings.borrow_mut().vertex_array = vertex_array;
    }

    pub fn use_program(&self, program: Option<ProgramHandle>) {
        self.inner.api.use_program(program);
        self.inner.bindings.borrow_mut().program = program;
    }

    /// Makes `unit` active and binds `texture` on it.
    pub fn bind_texture(&self, unit: u32, texture: Option<TextureHandle>) {
        let mut bindings = self.inner.bindings.borrow_mut();
        if bindings.active_unit != unit {
            self.inner.api.active_texture_unit(unit);
            bindings.active_unit = unit;
        }
        self.inner.api.bind_texture(texture);
        bindings.set_texture(unit, texture);
    }

    // ── release ───────────────────────────────────────────────────────────
    //
    // Deleting a bound object implicitly unbinds it on the driver side.

    pub fn delete_buffer(&self, buffer: BufferHandle) {
        self.inner.api.delete_buffer(buffer);
        self.inner.bindings.borrow_mut().forget_buffer(buffer);
    }

    pub fn delete_vertex_array(&self, vertex_array: VertexArrayHandle) {
        self.inner.api.delete_vertex_array(vertex_array);
        self.inner.bindings.borrow_mut().forget_vertex_array(vertex_array);
    }

    pub fn delete_program(&self, program: ProgramHandle) {
        self.inner.api.delete_program(program);
        let mut bindings = self.inner.bindings.borrow_mut();
        if bindings.program == Some(program) {
            bindings.program = None;
        }
    }

    pub fn delete_texture(&self, texture: TextureHandle) {
        self.inner.api.delete_texture(texture);
        self.inner.bindings.borrow_mut().forget_texture(texture);
    }
}
