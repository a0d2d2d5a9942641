use std::fmt;
use std::num::NonZeroU32;

macro_rules! gpu_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub NonZeroU32);

        impl $name {
            #[inline]
            pub fn get(self) -> u32 {
                self.0.get()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

gpu_handle!(
    /// GPU buffer object name.
    BufferHandle
);
gpu_handle!(
    /// Vertex array (binding state) object name.
    VertexArrayHandle
);
gpu_handle!(
    /// Compiled stage object name.
    ShaderHandle
);
gpu_handle!(
    /// Linked program object name.
    ProgramHandle
);
gpu_handle!(
    /// 2D texture object name.
    TextureHandle
);

/// Binding point a buffer is attached to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    /// Vertex attribute data.
    Array,
    /// Index data. Part of the vertex array state on core profiles.
    ElementArray,
}

/// Upload frequency hint passed to the driver.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub enum BufferUsage {
    /// Uploaded once, drawn many times.
    #[default]
    Static,
    /// Rewritten in place between draws.
    Dynamic,
}

/// Scalar type of a vertex attribute component.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ElementType {
    F32,
    U32,
    U8,
}

impl ElementType {
    /// Width of one component in bytes.
    #[inline]
    pub const fn size_bytes(self) -> u32 {
        match self {
            ElementType::F32 | ElementType::U32 => 4,
            ElementType::U8 => 1,
        }
    }

    /// Integer attributes take the integer pointer path unless normalized.
    #[inline]
    pub const fn is_integer(self) -> bool {
        !matches!(self, ElementType::F32)
    }
}

/// One `glVertexAttribPointer` call: where attribute `index` lives in the
/// currently bound array buffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AttribPointer {
    pub index: u32,
    pub count: u32,
    pub ty: ElementType,
    pub normalized: bool,
    pub stride: u32,
    pub offset: u32,
}

/// Resolved uniform location, with `-1` reserved for "not found".
///
/// Not-found is an ordinary outcome (compilers strip unused uniforms), so it is
/// a value rather than an error.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct UniformLocation(i32);

impl UniformLocation {
    pub const NOT_FOUND: UniformLocation = UniformLocation(-1);

    /// Wraps a driver location. Negative values collapse to [`Self::NOT_FOUND`].
    #[inline]
    pub fn new(raw: i32) -> Self {
        if raw < 0 { Self::NOT_FOUND } else { Self(raw) }
    }

    #[inline]
    pub fn raw(self) -> i32 {
        self.0
    }

    #[inline]
    pub fn is_found(self) -> bool {
        self.0 >= 0
    }

    /// Location as an unsigned index, or `None` for [`Self::NOT_FOUND`].
    #[inline]
    pub fn index(self) -> Option<u32> {
        u32::try_from(self.0).ok()
    }
}

/// Typed uniform payload. Values are passed through without conversion.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    I32(i32),
    F32(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    /// Column-major 4x4.
    Mat4([f32; 16]),
}

/// Source/destination factors for alpha blending.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum BlendMode {
    /// `SRC_ALPHA, ONE_MINUS_SRC_ALPHA`.
    #[default]
    Alpha,
    /// `ONE, ONE_MINUS_SRC_ALPHA`.
    Premultiplied,
}

/// Sampler state applied to every texture. Fixed, not configurable per texture.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SamplerParams {
    pub linear_filter: bool,
    pub clamp_to_edge: bool,
}

impl SamplerParams {
    pub const LINEAR_CLAMP: SamplerParams = SamplerParams {
        linear_filter: true,
        clamp_to_edge: true,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_sizes() {
        assert_eq!(ElementType::F32.size_bytes(), 4);
        assert_eq!(ElementType::U32.size_bytes(), 4);
        assert_eq!(ElementType::U8.size_bytes(), 1);
    }

    #[test]
    fn negative_locations_are_not_found() {
        assert_eq!(UniformLocation::new(-7), UniformLocation::NOT_FOUND);
        assert_eq!(UniformLocation::NOT_FOUND.raw(), -1);
        assert_eq!(UniformLocation::NOT_FOUND.index(), None);
        assert_eq!(UniformLocation::new(3).index(), Some(3));
    }
}
