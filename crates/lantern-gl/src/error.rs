//! Error types for object creation, shader builds and texture uploads.
//!
//! All of these are fatal for the object being built: the caller is expected
//! to report them and abort rather than draw with a half-built object.
//! Missing uniforms are not errors; see [`crate::shader::UniformCache`].

use std::fmt;

use lantern_glsl::{ParseError, Stage};

/// Kind of GPU object a creation call was for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ObjectKind {
    Buffer,
    VertexArray,
    Shader(Stage),
    Program,
    Texture,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObjectKind::Buffer => f.write_str("buffer"),
            ObjectKind::VertexArray => f.write_str("vertex array"),
            ObjectKind::Shader(stage) => write!(f, "{stage} shader"),
            ObjectKind::Program => f.write_str("program"),
            ObjectKind::Texture => f.write_str("texture"),
        }
    }
}

/// The driver refused to create an object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceError {
    pub kind: ObjectKind,
    /// Driver message.
    pub message: String,
}

impl ResourceError {
    pub(crate) fn new(kind: ObjectKind, message: String) -> Self {
        Self { kind, message }
    }
}

impl fmt::Display for ResourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to create {}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ResourceError {}

/// A shader program could not be built.
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderError {
    /// The combined source could not be split into stages.
    Parse { label: String, error: ParseError },
    Resource(ResourceError),
    /// A stage failed to compile; `log` is the compiler output.
    Compile { label: String, stage: Stage, log: String },
    Link { label: String, log: String },
    Validate { label: String, log: String },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::Parse { label, error } => write!(f, "'{label}': {error}"),
            ShaderError::Resource(err) => err.fmt(f),
            ShaderError::Compile { label, stage, log } => {
                write!(f, "failed to compile {stage} shader of '{label}':\n{log}")
            }
            ShaderError::Link { label, log } => {
                write!(f, "failed to link program '{label}':\n{log}")
            }
            ShaderError::Validate { label, log } => {
                write!(f, "program '{label}' failed validation:\n{log}")
            }
        }
    }
}

impl std::error::Error for ShaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShaderError::Parse { error, .. } => Some(error),
            ShaderError::Resource(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResourceError> for ShaderError {
    fn from(err: ResourceError) -> Self {
        ShaderError::Resource(err)
    }
}

/// Decoded pixels could not be turned into a texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureError {
    Resource(ResourceError),
    /// Width or height is zero.
    Empty { width: u32, height: u32 },
    /// Pixel buffer length does not match `width * height * 4`.
    SizeMismatch { width: u32, height: u32, len: usize },
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::Resource(err) => err.fmt(f),
            TextureError::Empty { width, height } => {
                write!(f, "texture has zero size ({width}x{height})")
            }
            TextureError::SizeMismatch { width, height, len } => write!(
                f,
                "RGBA8 texture of {width}x{height} needs {} bytes, got {len}",
                u64::from(*width) * u64::from(*height) * 4
            ),
        }
    }
}

impl std::error::Error for TextureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextureError::Resource(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResourceError> for TextureError {
    fn from(err: ResourceError) -> Self {
        TextureError::Resource(err)
    }
}
