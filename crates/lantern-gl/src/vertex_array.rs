use std::ops::Range;

use crate::buffer::VertexBuffer;
use crate::context::{AttribPointer, BufferUsage, Gl, VertexArrayHandle};
use crate::error::{ObjectKind, ResourceError};
use crate::layout::VertexLayout;

/// Owns a vertex array object and the attribute slots registered on it.
///
/// Attribute indices are handed out from one running counter, so several
/// buffers can be attached without colliding: the first buffer's entries get
/// `0..n`, the next buffer's continue at `n`, and so on. The counter is never
/// reset.
#[derive(Debug)]
pub struct VertexArray {
    gl: Gl,
    handle: VertexArrayHandle,
    next_attribute: u32,
}

impl VertexArray {
    pub fn new(gl: &Gl) -> Result<Self, ResourceError> {
        let handle = gl
            .api()
            .create_vertex_array()
            .map_err(|msg| ResourceError::new(ObjectKind::VertexArray, msg))?;
        log::trace!("created {handle}");
        Ok(Self {
            gl: gl.clone(),
            handle,
            next_attribute: 0,
        })
    }

    /// Registers every entry of `layout` as an attribute sourced from `buffer`.
    ///
    /// Leaves this vertex array and `buffer` bound. Returns the attribute
    /// indices assigned, in layout order.
    ///
    /// # Panics
    ///
    /// If `layout` has no entries, or if a static `buffer` does not hold a
    /// whole number of vertices of `layout.stride()` bytes.
    pub fn add_buffer(&mut self, buffer: &VertexBuffer, layout: &VertexLayout) -> Range<u32> {
        assert!(
            !layout.is_empty() && layout.stride() > 0,
            "cannot attach {} with an empty vertex layout",
            buffer.handle()
        );
        if buffer.usage() == BufferUsage::Static {
            let stride = layout.stride() as usize;
            assert!(
                buffer.size_bytes() % stride == 0,
                "{} holds {} bytes, not a whole number of {stride}-byte vertices",
                buffer.handle(),
                buffer.size_bytes()
            );
        }

        self.bind();
        buffer.bind();

        let first = self.next_attribute;
        for entry in layout.entries() {
            let attr = AttribPointer {
                index: self.next_attribute,
                count: entry.count,
                ty: entry.ty,
                normalized: entry.normalized,
                stride: layout.stride(),
                offset: entry.offset,
            };
            self.gl.api().vertex_attrib_pointer(&attr);
            self.gl.api().enable_vertex_attrib(attr.index);
            self.next_attribute += 1;
        }

        log::trace!(
            "{}: attributes {first}..{} from {}",
            self.handle,
            self.next_attribute,
            buffer.handle()
        );
        first..self.next_attribute
    }

    /// Number of attribute slots registered so far.
    #[inline]
    pub fn attribute_count(&self) -> u32 {
        self.next_attribute
    }

    pub fn bind(&self) {
        self.gl.bind_vertex_array(Some(self.handle));
    }

    pub fn unbind(&self) {
        self.gl.bind_vertex_array(None);
    }

    #[inline]
    pub fn handle(&self) -> VertexArrayHandle {
        self.handle
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        log::trace!("deleting {}", self.handle);
        self.gl.delete_vertex_array(self.handle);
    }
}
