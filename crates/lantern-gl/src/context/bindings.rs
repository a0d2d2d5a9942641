use std::collections::HashMap;

use super::types::{BufferHandle, BufferTarget, ProgramHandle, TextureHandle, VertexArrayHandle};

/// Currently bound object per target, as last set through [`super::Gl`].
///
/// The element buffer binding belongs to the vertex array that was bound when
/// it was set, so it is tracked per vertex array (`None` = the default array).
#[derive(Debug, Default, Clone)]
pub struct Bindings {
    pub program: Option<ProgramHandle>,
    pub vertex_array: Option<VertexArrayHandle>,
    pub array_buffer: Option<BufferHandle>,
    element_buffers: HashMap<Option<VertexArrayHandle>, BufferHandle>,
    pub active_unit: u32,
    textures: HashMap<u32, TextureHandle>,
}

impl Bindings {
    pub fn buffer(&self, target: BufferTarget) -> Option<BufferHandle> {
        match target {
            BufferTarget::Array => self.array_buffer,
            BufferTarget::ElementArray => self.element_buffers.get(&self.vertex_array).copied(),
        }
    }

    pub fn texture(&self, unit: u32) -> Option<TextureHandle> {
        self.textures.get(&unit).copied()
    }

    pub(super) fn set_buffer(&mut self, target: BufferTarget, buffer: Option<BufferHandle>) {
        match target {
            BufferTarget::Array => self.array_buffer = buffer,
            BufferTarget::ElementArray => match buffer {
                Some(b) => {
                    self.element_buffers.insert(self.vertex_array, b);
                }
                None => {
                    self.element_buffers.remove(&self.vertex_array);
                }
            },
        }
    }

    pub(super) fn set_texture(&mut self, unit: u32, texture: Option<TextureHandle>) {
        match texture {
            Some(t) => {
                self.textures.insert(unit, t);
            }
            None => {
                self.textures.remove(&unit);
            }
        }
    }

    pub(super) fn forget_buffer(&mut self, buffer: BufferHandle) {
        if self.array_buffer == Some(buffer) {
            self.array_buffer = None;
        }
        self.element_buffers.retain(|_, b| *b != buffer);
    }

    pub(super) fn forget_vertex_array(&mut self, vertex_array: VertexArrayHandle) {
        self.element_buffers.remove(&Some(vertex_array));
        if self.vertex_array == Some(vertex_array) {
            self.vertex_array = None;
        }
    }

    pub(super) fn forget_texture(&mut self, texture: TextureHandle) {
        self.textures.retain(|_, t| *t != texture);
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU32;

    use super::*;

    fn buf(n: u32) -> BufferHandle {
        BufferHandle(NonZeroU32::new(n).unwrap())
    }

    fn vao(n: u32) -> VertexArrayHandle {
        VertexArrayHandle(NonZeroU32::new(n).unwrap())
    }

    #[test]
    fn element_buffer_follows_vertex_array() {
        let mut b = Bindings::default();
        b.vertex_array = Some(vao(1));
        b.set_buffer(BufferTarget::ElementArray, Some(buf(5)));
        assert_eq!(b.buffer(BufferTarget::ElementArray), Some(buf(5)));

        b.vertex_array = Some(vao(2));
        assert_eq!(b.buffer(BufferTarget::ElementArray), None);

        b.vertex_array = Some(vao(1));
        assert_eq!(b.buffer(BufferTarget::ElementArray), Some(buf(5)));
    }

    #[test]
    fn forgetting_a_buffer_clears_every_slot() {
        let mut b = Bindings::default();
        b.set_buffer(BufferTarget::Array, Some(buf(3)));
        b.set_buffer(BufferTarget::ElementArray, Some(buf(3)));
        b.forget_buffer(buf(3));
        assert_eq!(b.buffer(BufferTarget::Array), None);
        assert_eq!(b.buffer(BufferTarget::ElementArray), None);
    }
}
