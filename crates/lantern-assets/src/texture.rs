use std::path::Path;

use anyhow::{Context, Result};
use lantern_gl::{Gl, Texture};

use crate::decode_file;

/// Decodes an image file and uploads it as a texture.
pub fn load_texture(gl: &Gl, path: impl AsRef<Path>) -> Result<Texture> {
    let path = path.as_ref();
    let image = decode_file(path)?;
    Texture::new(gl, &image.as_image_data())
        .with_context(|| format!("failed to upload texture {}", path.display()))
}
