//! 2D textures uploaded from decoded RGBA8 pixels.
//!
//! Decoding is the caller's job; this module only takes bytes plus dimensions.
//! Sampling is fixed: linear min/mag filtering, clamp-to-edge wrapping.

use crate::context::{Gl, SamplerParams, TextureHandle};
use crate::error::{ObjectKind, ResourceError, TextureError};

/// Bytes per RGBA8 pixel.
pub const RGBA8_BYTES: usize = 4;

/// A borrowed, already decoded image.
///
/// Rows are expected bottom-up (flipped vertically relative to most file
/// formats) to match GL texture coordinates.
#[derive(Debug, Copy, Clone)]
pub struct ImageData<'a> {
    pub width: u32,
    pub height: u32,
    /// Bit depth of the source before expansion to RGBA8. Informational.
    pub bits_per_pixel: u32,
    pub pixels: &'a [u8],
}

impl<'a> ImageData<'a> {
    /// RGBA8 pixels with a 32-bit source depth.
    pub fn rgba8(width: u32, height: u32, pixels: &'a [u8]) -> Self {
        Self {
            width,
            height,
            bits_per_pixel: 32,
            pixels,
        }
    }

    fn check(&self) -> Result<(), TextureError> {
        if self.width == 0 || self.height == 0 {
            return Err(TextureError::Empty {
                width: self.width,
                height: self.height,
            });
        }
        let expected = (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(RGBA8_BYTES));
        if expected != Some(self.pixels.len()) {
            return Err(TextureError::SizeMismatch {
                width: self.width,
                height: self.height,
                len: self.pixels.len(),
            });
        }
        Ok(())
    }
}

/// Owns one 2D texture object. Dimensions are fixed at creation.
#[derive(Debug)]
pub struct Texture {
    gl: Gl,
    handle: TextureHandle,
    width: u32,
    height: u32,
    bits_per_pixel: u32,
}

impl Texture {
    /// Uploads `image` to a new texture.
    ///
    /// Uses the active texture unit and leaves it with no texture bound.
    pub fn new(gl: &Gl, image: &ImageData<'_>) -> Result<Self, TextureError> {
        image.check()?;

        let api = gl.api();
        let handle = api
            .create_texture()
            .map_err(|msg| ResourceError::new(ObjectKind::Texture, msg))?;

        let unit = gl.bindings().active_unit;
        gl.bind_texture(unit, Some(handle));
        api.texture_params(SamplerParams::LINEAR_CLAMP);
        api.texture_image_rgba8(image.width, image.height, image.pixels);
        gl.bind_texture(unit, None);

        log::trace!("created {handle} ({}x{})", image.width, image.height);
        Ok(Self {
            gl: gl.clone(),
            handle,
            width: image.width,
            height: image.height,
            bits_per_pixel: image.bits_per_pixel,
        })
    }

    /// Activates texture unit `slot` and binds this texture to it.
    pub fn bind(&self, slot: u32) {
        self.gl.bind_texture(slot, Some(self.handle));
    }

    /// Unbinds whatever texture is bound on the active unit.
    pub fn unbind(&self) {
        let unit = self.gl.bindings().active_unit;
        self.gl.bind_texture(unit, None);
    }

    #[inline]
    pub fn handle(&self) -> TextureHandle {
        self.handle
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn bits_per_pixel(&self) -> u32 {
        self.bits_per_pixel
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        log::trace!("deleting {}", self.handle);
        self.gl.delete_texture(self.handle);
    }
}
