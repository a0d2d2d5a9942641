//! GPU buffers: vertex data and `u32` index data.
//!
//! Each wrapper owns exactly one buffer object and deletes it on drop.
//! Construction leaves the new buffer bound on its target.

use bytemuck::Pod;

use crate::context::{BufferHandle, BufferTarget, BufferUsage, Gl};
use crate::error::{ObjectKind, ResourceError};

/// A buffer object bound to a fixed target.
#[derive(Debug)]
pub struct GpuBuffer {
    gl: Gl,
    handle: BufferHandle,
    target: BufferTarget,
    size_bytes: usize,
    usage: BufferUsage,
}

impl GpuBuffer {
    fn alloc(gl: &Gl, target: BufferTarget) -> Result<BufferHandle, ResourceError> {
        let handle = gl
            .api()
            .create_buffer()
            .map_err(|msg| ResourceError::new(ObjectKind::Buffer, msg))?;
        gl.bind_buffer(target, Some(handle));
        Ok(handle)
    }

    /// Creates a buffer and uploads `data` into it.
    pub fn with_data(
        gl: &Gl,
        target: BufferTarget,
        data: &[u8],
        usage: BufferUsage,
    ) -> Result<Self, ResourceError> {
        let handle = Self::alloc(gl, target)?;
        gl.api().buffer_data(target, data, usage);
        log::trace!("created {handle} ({target:?}, {} bytes, {usage:?})", data.len());
        Ok(Self {
            gl: gl.clone(),
            handle,
            target,
            size_bytes: data.len(),
            usage,
        })
    }

    /// Creates a dynamic buffer with `size_bytes` of uninitialized storage.
    ///
    /// # Panics
    ///
    /// If `size_bytes` is zero.
    pub fn reserve(gl: &Gl, target: BufferTarget, size_bytes: usize) -> Result<Self, ResourceError> {
        assert!(size_bytes > 0, "cannot reserve a zero-sized buffer");
        let handle = Self::alloc(gl, target)?;
        gl.api().buffer_reserve(target, size_bytes, BufferUsage::Dynamic);
        log::trace!("reserved {handle} ({target:?}, {size_bytes} bytes)");
        Ok(Self {
            gl: gl.clone(),
            handle,
            target,
            size_bytes,
            usage: BufferUsage::Dynamic,
        })
    }

    /// Overwrites `data.len()` bytes starting at `offset`. Binds the buffer.
    ///
    /// # Panics
    ///
    /// If the write would run past the end of the buffer.
    pub fn update(&self, offset: usize, data: &[u8]) {
        let end = offset.checked_add(data.len());
        assert!(
            end.is_some_and(|end| end <= self.size_bytes),
            "buffer update of {} bytes at offset {offset} overflows {} ({} bytes)",
            data.len(),
            self.handle,
            self.size_bytes
        );
        if self.usage == BufferUsage::Static {
            log::debug!("{} is static but is being updated in place", self.handle);
        }
        self.bind();
        self.gl.api().buffer_sub_data(self.target, offset, data);
    }

    pub fn bind(&self) {
        self.gl.bind_buffer(self.target, Some(self.handle));
    }

    pub fn unbind(&self) {
        self.gl.bind_buffer(self.target, None);
    }

    #[inline]
    pub fn handle(&self) -> BufferHandle {
        self.handle
    }

    #[inline]
    pub fn target(&self) -> BufferTarget {
        self.target
    }

    #[inline]
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    #[inline]
    pub fn usage(&self) -> BufferUsage {
        self.usage
    }
}

impl Drop for GpuBuffer {
    fn drop(&mut self) {
        log::trace!("deleting {}", self.handle);
        self.gl.delete_buffer(self.handle);
    }
}

/// Vertex attribute storage on the array-buffer target.
#[derive(Debug)]
pub struct VertexBuffer {
    buffer: GpuBuffer,
}

impl VertexBuffer {
    /// Static buffer holding `vertices`.
    pub fn new<T: Pod>(gl: &Gl, vertices: &[T]) -> Result<Self, ResourceError> {
        Self::with_usage(gl, vertices, BufferUsage::Static)
    }

    pub fn with_usage<T: Pod>(
        gl: &Gl,
        vertices: &[T],
        usage: BufferUsage,
    ) -> Result<Self, ResourceError> {
        let bytes: &[u8] = bytemuck::cast_slice(vertices);
        let buffer = GpuBuffer::with_data(gl, BufferTarget::Array, bytes, usage)?;
        Ok(Self { buffer })
    }

    /// Dynamic buffer of `size_bytes`, filled later through [`Self::update`].
    pub fn dynamic(gl: &Gl, size_bytes: usize) -> Result<Self, ResourceError> {
        let buffer = GpuBuffer::reserve(gl, BufferTarget::Array, size_bytes)?;
        Ok(Self { buffer })
    }

    /// Overwrites vertices starting at byte `offset`.
    pub fn update<T: Pod>(&self, offset: usize, vertices: &[T]) {
        self.buffer.update(offset, bytemuck::cast_slice(vertices));
    }

    pub fn bind(&self) {
        self.buffer.bind();
    }

    pub fn unbind(&self) {
        self.buffer.unbind();
    }

    #[inline]
    pub fn handle(&self) -> BufferHandle {
        self.buffer.handle()
    }

    #[inline]
    pub fn size_bytes(&self) -> usize {
        self.buffer.size_bytes()
    }

    #[inline]
    pub fn usage(&self) -> BufferUsage {
        self.buffer.usage()
    }
}

/// `u32` indices on the element-array target, with their count.
///
/// The element-array binding is part of vertex array state, so bind the
/// vertex array before binding this buffer.
#[derive(Debug)]
pub struct IndexBuffer {
    buffer: GpuBuffer,
    count: u32,
}

impl IndexBuffer {
    pub fn new(gl: &Gl, indices: &[u32]) -> Result<Self, ResourceError> {
        let count = u32::try_from(indices.len()).map_err(|_| {
            ResourceError::new(
                ObjectKind::Buffer,
                format!("{} indices exceed the u32 draw range", indices.len()),
            )
        })?;
        let buffer = GpuBuffer::with_data(
            gl,
            BufferTarget::ElementArray,
            bytemuck::cast_slice(indices),
            BufferUsage::Static,
        )?;
        Ok(Self { buffer, count })
    }

    /// Number of indices; the element count of every draw using this buffer.
    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn bind(&self) {
        self.buffer.bind();
    }

    pub fn unbind(&self) {
        self.buffer.unbind();
    }

    #[inline]
    pub fn handle(&self) -> BufferHandle {
        self.buffer.handle()
    }

    #[inline]
    pub fn size_bytes(&self) -> usize {
        self.buffer.size_bytes()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::context::{Call, RecordingApi};

    fn setup() -> (Rc<RecordingApi>, Gl) {
        let api = Rc::new(RecordingApi::new());
        let gl = Gl::from_shared(api.clone());
        (api, gl)
    }

    #[test]
    fn vertex_buffer_uploads_all_bytes() {
        let (api, gl) = setup();
        let positions = [0.0f32; 20];
        let vb = VertexBuffer::new(&gl, &positions).unwrap();

        assert_eq!(vb.size_bytes(), 80);
        assert_eq!(gl.bound_buffer(BufferTarget::Array), Some(vb.handle()));
        assert_eq!(
            api.calls(),
            vec![
                Call::CreateBuffer(vb.handle()),
                Call::BindBuffer(BufferTarget::Array, Some(vb.handle())),
                Call::BufferData { target: BufferTarget::Array, len: 80, usage: BufferUsage::Static },
            ]
        );
    }

    #[test]
    fn index_buffer_keeps_count() {
        let (_api, gl) = setup();
        let ib = IndexBuffer::new(&gl, &[0, 1, 2, 0, 2, 3, 3, 4, 2]).unwrap();
        assert_eq!(ib.count(), 9);
        assert_eq!(ib.size_bytes(), 36);
    }

    #[test]
    fn drop_releases_exactly_once() {
        let (api, gl) = setup();
        let handle = {
            let vb = VertexBuffer::new(&gl, &[1.0f32, 2.0]).unwrap();
            assert_eq!(api.live_objects(), 1);
            vb.handle()
        };
        assert_eq!(api.live_objects(), 0);
        let deletes = api
            .calls()
            .into_iter()
            .filter(|c| *c == Call::DeleteBuffer(handle))
            .count();
        assert_eq!(deletes, 1);
        assert_eq!(gl.bound_buffer(BufferTarget::Array), None);
    }

    #[test]
    fn handles_are_distinct_per_buffer() {
        let (_api, gl) = setup();
        let a = VertexBuffer::new(&gl, &[0u32; 4]).unwrap();
        let b = VertexBuffer::new(&gl, &[0u32; 4]).unwrap();
        assert_ne!(a.handle(), b.handle());
    }

    #[test]
    fn dynamic_buffer_reserves_then_updates() {
        let (api, gl) = setup();
        let vb = VertexBuffer::dynamic(&gl, 64).unwrap();
        api.clear_calls();

        vb.update(16, &[1.0f32, 2.0, 3.0, 4.0]);
        assert_eq!(vb.usage(), BufferUsage::Dynamic);
        assert_eq!(
            api.calls(),
            vec![
                Call::BindBuffer(BufferTarget::Array, Some(vb.handle())),
                Call::BufferSubData { target: BufferTarget::Array, offset: 16, len: 16 },
            ]
        );
    }

    #[test]
    #[should_panic(expected = "overflows")]
    fn update_past_end_panics() {
        let (_api, gl) = setup();
        let vb = VertexBuffer::dynamic(&gl, 8).unwrap();
        vb.update(4, &[0.0f32, 0.0]);
    }

    #[test]
    #[should_panic(expected = "zero-sized")]
    fn zero_sized_dynamic_buffer_panics() {
        let (_api, gl) = setup();
        let _ = VertexBuffer::dynamic(&gl, 0);
    }

    #[test]
    fn allocation_failure_is_reported() {
        let api = Rc::new(RecordingApi::new().with_allocation_failure());
        let gl = Gl::from_shared(api);
        let err = IndexBuffer::new(&gl, &[0, 1, 2]).unwrap_err();
        assert_eq!(err.kind, ObjectKind::Buffer);
        assert_eq!(err.to_string(), "failed to create buffer: context lost");
    }
}
