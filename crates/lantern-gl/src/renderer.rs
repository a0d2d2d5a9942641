//! Draw orchestration.
//!
//! [`Renderer::draw`] encodes the one ordering rule the wrappers rely on:
//! program, then vertex array, then index buffer. The element-array binding
//! is vertex array state, so the index buffer is bound after the vertex array
//! it belongs to.

use crate::buffer::IndexBuffer;
use crate::context::{BlendMode, Gl};
use crate::shader::ShaderProgram;
use crate::vertex_array::VertexArray;

/// Context state applied once when the renderer is created.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Straight RGBA used by [`Renderer::clear`].
    pub clear_color: [f32; 4],
    /// `None` disables blending.
    pub blend: Option<BlendMode>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0, 1.0],
            blend: Some(BlendMode::Alpha),
        }
    }
}

/// Issues clears and indexed draws. Borrows everything it draws.
#[derive(Debug)]
pub struct Renderer {
    gl: Gl,
    config: RendererConfig,
}

impl Renderer {
    pub fn new(gl: &Gl, config: RendererConfig) -> Self {
        gl.api().set_clear_color(config.clear_color);
        gl.api().set_blend(config.blend);
        Self {
            gl: gl.clone(),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Clears the color buffer only.
    pub fn clear(&self) {
        self.gl.api().clear_color_buffer();
    }

    /// Binds `program`, `vertex_array`, `indices` in that order and issues one
    /// indexed triangle-list draw of `indices.count()` elements.
    ///
    /// Driver-side failures are not observed here; they surface through the
    /// debug output, if enabled.
    pub fn draw(&self, vertex_array: &VertexArray, indices: &IndexBuffer, program: &ShaderProgram) {
        program.bind();
        vertex_array.bind();
        indices.bind();
        self.gl.api().draw_indexed_triangles(indices.count());
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use glam::{Mat4, Vec4};

    use super::*;
    use crate::buffer::VertexBuffer;
    use crate::context::{BufferTarget, Call, RecordingApi};
    use crate::layout::VertexLayout;
    use crate::texture::{ImageData, Texture};

    const SHADER: &str = "\
#shader vertex
#version 330 core
layout(location = 0) in vec4 position;
layout(location = 1) in vec2 texCoord;
out vec2 v_TexCoord;
uniform mat4 u_MVP;
void main() {
    gl_Position = u_MVP * position;
    v_TexCoord = texCoord;
}
#shader fragment
#version 330 core
layout(location = 0) out vec4 color;
in vec2 v_TexCoord;
uniform vec4 u_Color;
uniform sampler2D u_Texture;
void main() {
    color = texture(u_Texture, v_TexCoord) * u_Color;
}
";

    #[rustfmt::skip]
    const QUAD: [f32; 20] = [
        -0.5, -0.5, 0.0, 0.0,
         0.5, -0.5, 1.0, 0.0,
         0.5,  0.5, 1.0, 0.75,
        -0.5,  0.5, 0.0, 0.75,
         0.0, 0.75, 0.5, 1.0,
    ];

    const INDICES: [u32; 9] = [0, 1, 2, 0, 2, 3, 3, 4, 2];

    fn setup() -> (Rc<RecordingApi>, Gl) {
        let api = Rc::new(RecordingApi::new().with_uniforms(["u_MVP", "u_Color", "u_Texture"]));
        let gl = Gl::from_shared(api.clone());
        (api, gl)
    }

    #[test]
    fn new_applies_config() {
        let (api, gl) = setup();
        let config = RendererConfig { clear_color: [0.1, 0.2, 0.3, 1.0], blend: None };
        let renderer = Renderer::new(&gl, config.clone());
        renderer.clear();
        assert_eq!(
            api.calls(),
            vec![Call::ClearColor(config.clear_color), Call::Blend(None), Call::Clear]
        );
    }

    #[test]
    fn draw_binds_in_order_then_draws_index_count() {
        let (api, gl) = setup();
        let renderer = Renderer::new(&gl, RendererConfig::default());

        let mut va = VertexArray::new(&gl).unwrap();
        let vb = VertexBuffer::new(&gl, &QUAD).unwrap();
        let mut layout = VertexLayout::new();
        layout.push::<f32>(2).push::<f32>(2);
        va.add_buffer(&vb, &layout);
        let ib = IndexBuffer::new(&gl, &INDICES).unwrap();
        let program = ShaderProgram::from_combined(&gl, "basic.glsl", SHADER).unwrap();
        api.clear_calls();

        renderer.draw(&va, &ib, &program);

        assert_eq!(
            api.calls(),
            vec![
                Call::UseProgram(Some(program.handle())),
                Call::BindVertexArray(Some(va.handle())),
                Call::BindBuffer(BufferTarget::ElementArray, Some(ib.handle())),
                Call::DrawIndexed { count: 9 },
            ]
        );
        assert_eq!(gl.bound_buffer(BufferTarget::ElementArray), Some(ib.handle()));
    }

    #[test]
    fn each_draw_is_one_call() {
        let (api, gl) = setup();
        let renderer = Renderer::new(&gl, RendererConfig::default());
        let mut va = VertexArray::new(&gl).unwrap();
        let vb = VertexBuffer::new(&gl, &QUAD).unwrap();
        let mut layout = VertexLayout::new();
        layout.push::<f32>(2).push::<f32>(2);
        va.add_buffer(&vb, &layout);
        let ib = IndexBuffer::new(&gl, &INDICES[..6]).unwrap();
        let program = ShaderProgram::from_combined(&gl, "basic.glsl", SHADER).unwrap();

        for _ in 0..3 {
            renderer.clear();
            renderer.draw(&va, &ib, &program);
        }
        assert_eq!(api.draw_calls(), vec![6, 6, 6]);
    }

    #[test]
    fn textured_quad_frame() {
        let (api, gl) = setup();
        let renderer = Renderer::new(&gl, RendererConfig::default());

        let mut va = VertexArray::new(&gl).unwrap();
        va.bind();
        let vb = VertexBuffer::new(&gl, &QUAD).unwrap();
        let mut layout = VertexLayout::new();
        layout.push::<f32>(2).push::<f32>(2);
        assert_eq!(layout.stride(), 16);
        va.add_buffer(&vb, &layout);
        let ib = IndexBuffer::new(&gl, &INDICES).unwrap();

        let mut program = ShaderProgram::from_combined(&gl, "basic.glsl", SHADER).unwrap();
        let pixels = vec![128u8; 4 * 4 * 4];
        let texture = Texture::new(&gl, &ImageData::rgba8(4, 4, &pixels)).unwrap();

        texture.bind(0);
        program.bind();
        program.set_uniform_i32("u_Texture", 0);
        program.set_uniform_mat4("u_MVP", &Mat4::orthographic_rh_gl(-1.0, 1.0, -0.75, 0.75, -1.0, 1.0));

        for frame in 0..4 {
            renderer.clear();
            program.bind();
            program.set_uniform_vec4("u_Color", Vec4::splat(frame as f32 / 4.0));
            program.set_uniform_vec4("u_Unused", Vec4::ONE);
            renderer.draw(&va, &ib, &program);
        }

        assert_eq!(api.draw_calls(), vec![9; 4]);
        assert_eq!(api.uniform_lookups("u_Color"), 1);
        assert_eq!(api.uniform_lookups("u_Unused"), 1);
        // program, vertex array, vertex buffer, index buffer, texture
        assert_eq!(api.live_objects(), 5);

        drop((va, vb, ib, program, texture));
        assert_eq!(api.live_objects(), 0);
    }
}
