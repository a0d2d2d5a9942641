//! File-backed collaborators for `lantern-gl`.
//!
//! The core never touches the filesystem. This crate reads combined shader
//! files and decodes images, then hands the results to the core wrappers.
//! Errors carry the offending path via `anyhow` context.

mod image_data;
mod shader;
mod texture;

pub use image_data::{decode_file, decode_memory, DecodedImage};
pub use shader::{load_program, read_shader_source};
pub use texture::load_texture;
