//! Vertex layout descriptors.
//!
//! A [`VertexLayout`] describes how one vertex is laid out in a buffer. It is a
//! plain value; nothing here touches the GPU.
//!
//! Entries must be pushed in the order the attributes appear in memory.
//! Offsets are the running sum of entry sizes and the stride is the total:
//!
//! ```
//! use lantern_gl::layout::VertexLayout;
//!
//! let mut layout = VertexLayout::new();
//! layout.push::<f32>(2); // position
//! layout.push::<f32>(2); // uv
//! assert_eq!(layout.stride(), 16);
//! assert_eq!(layout.entries()[1].offset, 8);
//! ```

use crate::context::ElementType;

/// Rust scalar types usable as vertex components.
pub trait VertexElement: bytemuck::Pod {
    const TYPE: ElementType;
    /// Whether integer data is mapped to `[0, 1]` when read as float.
    const NORMALIZED: bool;
}

impl VertexElement for f32 {
    const TYPE: ElementType = ElementType::F32;
    const NORMALIZED: bool = false;
}

impl VertexElement for u32 {
    const TYPE: ElementType = ElementType::U32;
    const NORMALIZED: bool = false;
}

impl VertexElement for u8 {
    const TYPE: ElementType = ElementType::U8;
    const NORMALIZED: bool = true;
}

/// One attribute of a vertex.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LayoutEntry {
    pub ty: ElementType,
    /// Components per vertex (1..=4).
    pub count: u32,
    pub normalized: bool,
    /// Byte offset from the start of the vertex.
    pub offset: u32,
}

impl LayoutEntry {
    #[inline]
    pub fn size_bytes(&self) -> u32 {
        self.ty.size_bytes() * self.count
    }
}

/// Ordered attribute entries plus the derived stride.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexLayout {
    entries: Vec<LayoutEntry>,
    stride: u32,
}

impl VertexLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `count` components of `T`.
    pub fn push<T: VertexElement>(&mut self, count: u32) -> &mut Self {
        self.push_entry(T::TYPE, count, T::NORMALIZED)
    }

    /// Appends `count` components of `ty`, not normalized.
    pub fn push_type(&mut self, ty: ElementType, count: u32) -> &mut Self {
        self.push_entry(ty, count, false)
    }

    /// Appends `count` integer components read as normalized floats.
    pub fn push_normalized(&mut self, ty: ElementType, count: u32) -> &mut Self {
        self.push_entry(ty, count, true)
    }

    /// # Panics
    ///
    /// If `count` is zero or the stride no longer fits in a `u32`.
    fn push_entry(&mut self, ty: ElementType, count: u32, normalized: bool) -> &mut Self {
        assert!(count > 0, "vertex layout entry needs at least one component");
        let stride = ty
            .size_bytes()
            .checked_mul(count)
            .and_then(|size| self.stride.checked_add(size));
        let Some(stride) = stride else {
            panic!(
                "vertex layout stride overflows u32 ({count} x {ty:?} after {} bytes)",
                self.stride
            );
        };
        let entry = LayoutEntry {
            ty,
            count,
            normalized,
            offset: self.stride,
        };
        self.stride = stride;
        self.entries.push(entry);
        self
    }

    #[inline]
    pub fn entries(&self) -> &[LayoutEntry] {
        &self.entries
    }

    /// Bytes per vertex.
    #[inline]
    pub fn stride(&self) -> u32 {
        self.stride
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
