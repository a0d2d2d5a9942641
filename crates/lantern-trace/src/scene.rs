use std::path::Path;

use anyhow::{Context, Result};
use glam::{Mat4, Vec3, Vec4};
use lantern_gl::{
    Gl, ImageData, IndexBuffer, Renderer, ShaderProgram, Texture, VertexArray, VertexBuffer,
    VertexLayout,
};

const BUILTIN_SHADER: &str = include_str!("../shaders/basic.glsl");

/// Five vertices of `[x, y, u, v]`: a square with a roof.
#[rustfmt::skip]
const VERTICES: [f32; 20] = [
    -0.5, -0.5, 0.0, 0.0,
     0.5, -0.5, 1.0, 0.0,
     0.5,  0.5, 1.0, 0.75,
    -0.5,  0.5, 0.0, 0.75,
     0.0, 0.75, 0.5, 1.0,
];

const INDICES: [u32; 9] = [
    0, 1, 2,
    0, 2, 3,
    3, 4, 2,
];

/// Everything needed to draw the textured quad.
pub struct QuadScene {
    /// Colour the fragment stage measures texels against.
    pub target_colour: Vec3,
    /// Max distance, max ratio difference and alpha override.
    pub colour_match: Vec3,

    vertex_array: VertexArray,
    // Attribute pointers reference this buffer; it must outlive the vertex array's use.
    _vertices: VertexBuffer,
    indices: IndexBuffer,
    program: ShaderProgram,
    _texture: Texture,
}

impl QuadScene {
    pub fn build(gl: &Gl, shader: Option<&Path>, texture: Option<&Path>) -> Result<Self> {
        let mut vertex_array = VertexArray::new(gl)?;
        vertex_array.bind();

        let vertices = VertexBuffer::new(gl, &VERTICES)?;
        let mut layout = VertexLayout::new();
        layout.push::<f32>(2); // position
        layout.push::<f32>(2); // uv
        vertex_array.add_buffer(&vertices, &layout);

        let indices = IndexBuffer::new(gl, &INDICES)?;

        let mut program = match shader {
            Some(path) => lantern_assets::load_program(gl, path)?,
            None => ShaderProgram::from_combined(gl, "builtin:basic.glsl", BUILTIN_SHADER)
                .context("built-in shader failed to build")?,
        };

        let texture = match texture {
            Some(path) => lantern_assets::load_texture(gl, path)?,
            None => {
                let pixels = checkerboard(8, 8);
                Texture::new(gl, &ImageData::rgba8(8, 8, &pixels))?
            }
        };

        texture.bind(0);
        program.bind();
        program.set_uniform_i32("u_Texture", 0);
        program.set_uniform_mat4(
            "u_MVP",
            &Mat4::orthographic_rh_gl(-1.0, 1.0, -0.75, 0.75, -1.0, 1.0),
        );

        Ok(Self {
            target_colour: Vec3::ONE,
            colour_match: Vec3::ZERO,
            vertex_array,
            _vertices: vertices,
            indices,
            program,
            _texture: texture,
        })
    }

    pub fn frame(&mut self, renderer: &Renderer, color: Vec4) {
        self.program.bind();
        self.program.set_uniform_vec4("u_Color", color);
        self.program.set_uniform_vec3("target_colour", self.target_colour);
        self.program.set_uniform_vec3("distance_ratios_texOverride", self.colour_match);
        renderer.draw(&self.vertex_array, &self.indices, &self.program);
    }
}

/// Per-channel ping-pong between 0 and 1.
#[derive(Debug, Clone)]
pub struct ColorCycle {
    color: Vec4,
    step: Vec4,
}

impl Default for ColorCycle {
    fn default() -> Self {
        Self {
            color: Vec4::ONE,
            step: Vec4::new(0.05, 0.025, 0.0125, 0.0),
        }
    }
}

impl ColorCycle {
    pub fn next_color(&mut self) -> Vec4 {
        let current = self.color;
        for i in 0..4 {
            if self.color[i] >= 1.0 || self.color[i] <= 0.0 {
                self.step[i] = -self.step[i];
            }
            self.color[i] += self.step[i];
        }
        current
    }
}

fn checkerboard(width: u32, height: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            let v = if (x + y) % 2 == 0 { 255 } else { 40 };
            pixels.extend_from_slice(&[v, v, v, 255]);
        }
    }
    pixels
}
