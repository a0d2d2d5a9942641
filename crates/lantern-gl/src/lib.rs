//! Owning handles over OpenGL objects and a single indexed draw.
//!
//! Every wrapper owns exactly one GPU object and releases it on drop:
//!
//! | Type | Object |
//! |------|--------|
//! | [`VertexBuffer`], [`IndexBuffer`] | buffer |
//! | [`VertexArray`] | vertex array (attribute bindings) |
//! | [`ShaderProgram`] | linked program, plus a uniform location cache |
//! | [`Texture`] | 2D texture |
//!
//! [`VertexLayout`] is a plain description with no GPU state, and
//! [`Renderer`] borrows the objects it draws.
//!
//! All of them hold a [`Gl`], the per-context handle that also tracks what is
//! currently bound. `Gl` is `!Send`, so GPU objects stay on the thread that
//! owns the context. Window and context creation, image decoding and file I/O
//! live outside this crate.
//!
//! ```
//! use std::rc::Rc;
//! use lantern_gl::context::{Gl, RecordingApi};
//! use lantern_gl::{IndexBuffer, Renderer, RendererConfig, ShaderProgram, VertexArray, VertexBuffer, VertexLayout};
//!
//! let api = Rc::new(RecordingApi::new());
//! let gl = Gl::from_shared(api.clone());
//!
//! let vertices: [f32; 8] = [-0.5, -0.5, 0.5, -0.5, 0.5, 0.5, -0.5, 0.5];
//! let vb = VertexBuffer::new(&gl, &vertices).unwrap();
//! let mut layout = VertexLayout::new();
//! layout.push::<f32>(2);
//! let mut va = VertexArray::new(&gl).unwrap();
//! va.add_buffer(&vb, &layout);
//! let ib = IndexBuffer::new(&gl, &[0, 1, 2, 0, 2, 3]).unwrap();
//!
//! let program = ShaderProgram::new(&gl, "flat", "void main() {}", "void main() {}").unwrap();
//! let renderer = Renderer::new(&gl, RendererConfig::default());
//! renderer.clear();
//! renderer.draw(&va, &ib, &program);
//!
//! assert_eq!(api.draw_calls(), vec![6]);
//! ```

pub mod buffer;
pub mod context;
pub mod error;
pub mod layout;
pub mod logging;
pub mod renderer;
pub mod shader;
pub mod texture;
pub mod vertex_array;

pub use buffer::{IndexBuffer, VertexBuffer};
pub use context::Gl;
pub use error::{ResourceError, ShaderError, TextureError};
pub use layout::VertexLayout;
pub use renderer::{Renderer, RendererConfig};
pub use shader::ShaderProgram;
pub use texture::{ImageData, Texture};
pub use vertex_array::VertexArray;
