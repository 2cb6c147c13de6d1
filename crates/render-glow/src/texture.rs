use std::path::{Path, PathBuf};
use std::sync::Arc;

use glow::HasContext;

use crate::context::GlowGl;

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("failed to load texture {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("texture is {width}x{height}, which the GPU cannot address")]
    Size { width: u32, height: u32 },
    #[error("GPU context refused to create a texture: {0}")]
    Gl(String),
}

/// Tightly packed 8-bit pixels, bottom row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// 3 for RGB, 4 for RGBA.
    pub channels: u8,
    pub pixels: Vec<u8>,
}

impl DecodedImage {
    /// Flips vertically to match GL's bottom-left texture origin; keeps alpha only when present.
    pub fn from_dynamic(image: image::DynamicImage) -> Self {
        let image = image.flipv();
        if image.color().has_alpha() {
            let rgba = image.to_rgba8();
            let (width, height) = rgba.dimensions();
            Self {
                width,
                height,
                channels: 4,
                pixels: rgba.into_raw(),
            }
        } else {
            let rgb = image.to_rgb8();
            let (width, height) = rgb.dimensions();
            Self {
                width,
                height,
                channels: 3,
                pixels: rgb.into_raw(),
            }
        }
    }

    /// Pixel at `(x, y)`, with `y = 0` the bottom row.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let channels = self.channels as usize;
        let start = (y as usize * self.width as usize + x as usize) * channels;
        self.pixels.get(start..start + channels)
    }

    fn gl_format(&self) -> u32 {
        if self.channels == 4 { glow::RGBA } else { glow::RGB }
    }
}

pub fn decode_image(path: impl AsRef<Path>) -> Result<DecodedImage, TextureError> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|source| {
        tracing::error!("failed to load texture {}: {source}", path.display());
        TextureError::Decode {
            path: path.to_path_buf(),
            source,
        }
    })?;
    Ok(DecodedImage::from_dynamic(image))
}

/// Two-color RGB checkerboard of `size`x`size` pixels in `cell`-pixel squares.
pub fn checkerboard(size: u32, cell: u32, a: [u8; 3], b: [u8; 3]) -> DecodedImage {
    let cell = cell.max(1);
    let mut pixels = Vec::with_capacity(size as usize * size as usize * 3);
    for y in 0..size {
        for x in 0..size {
            let color = if (x / cell + y / cell) % 2 == 0 { a } else { b };
            pixels.extend_from_slice(&color);
        }
    }
    DecodedImage {
        width: size,
        height: size,
        channels: 3,
        pixels,
    }
}

/// A mipmapped 2D texture with repeat wrapping.
pub struct Texture2D {
    gl: Arc<GlowGl>,
    texture: glow::Texture,
    width: u32,
    height: u32,
}

impl std::fmt::Debug for Texture2D {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture2D")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Texture2D {
    pub fn from_path(gl: Arc<GlowGl>, path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let image = decode_image(path.as_ref())?;
        tracing::debug!(
            "loaded texture {} ({}x{}, {} channels)",
            path.as_ref().display(),
            image.width,
            image.height,
            image.channels
        );
        Self::from_image(gl, &image)
    }

    pub fn from_image(gl: Arc<GlowGl>, image: &DecodedImage) -> Result<Self, TextureError> {
        let size_err = || TextureError::Size {
            width: image.width,
            height: image.height,
        };
        let width = i32::try_from(image.width).map_err(|_| size_err())?;
        let height = i32::try_from(image.height).map_err(|_| size_err())?;

        let raw = gl.raw();
        let texture = unsafe { raw.create_texture() }.map_err(TextureError::Gl)?;
        unsafe {
            raw.bind_texture(glow::TEXTURE_2D, Some(texture));
            raw.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            raw.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            raw.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR_MIPMAP_LINEAR as i32,
            );
            raw.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MAG_FILTER,
                glow::LINEAR as i32,
            );
            // RGB rows are not 4-byte aligned
            raw.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            raw.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                image.gl_format() as i32,
                width,
                height,
                0,
                image.gl_format(),
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(image.pixels.as_slice())),
            );
            raw.generate_mipmap(glow::TEXTURE_2D);
            raw.pixel_store_i32(glow::UNPACK_ALIGNMENT, 4);
            raw.bind_texture(glow::TEXTURE_2D, None);
        }

        Ok(Self {
            gl,
            texture,
            width: image.width,
            height: image.height,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Binds to texture unit `unit` (`GL_TEXTURE0 + unit`).
    pub fn bind(&self, unit: u32) {
        let raw = self.gl.raw();
        unsafe {
            raw.active_texture(glow::TEXTURE0 + unit);
            raw.bind_texture(glow::TEXTURE_2D, Some(self.texture));
        }
    }

    pub fn unbind(&self, unit: u32) {
        let raw = self.gl.raw();
        unsafe {
            raw.active_texture(glow::TEXTURE0 + unit);
            raw.bind_texture(glow::TEXTURE_2D, None);
        }
    }
}

impl Drop for Texture2D {
    fn drop(&mut self) {
        unsafe { self.gl.raw().delete_texture(self.texture) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_flips_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gradient.png");
        // red on the top row, blue on the bottom row
        let img = image::RgbImage::from_fn(2, 3, |_, y| match y {
            0 => image::Rgb([255, 0, 0]),
            2 => image::Rgb([0, 0, 255]),
            _ => image::Rgb([0, 255, 0]),
        });
        img.save(&path).unwrap();

        let decoded = decode_image(&path).unwrap();
        assert_eq!((decoded.width, decoded.height, decoded.channels), (2, 3, 3));
        assert_eq!(decoded.pixel(0, 0), Some(&[0, 0, 255][..]));
        assert_eq!(decoded.pixel(1, 2), Some(&[255, 0, 0][..]));
    }

    #[test]
    fn alpha_is_kept_when_present() {
        let img = image::RgbaImage::from_pixel(4, 4, image::Rgba([10, 20, 30, 128]));
        let decoded = DecodedImage::from_dynamic(image::DynamicImage::ImageRgba8(img));
        assert_eq!(decoded.channels, 4);
        assert_eq!(decoded.pixels.len(), 4 * 4 * 4);
        assert_eq!(decoded.pixel(3, 3), Some(&[10, 20, 30, 128][..]));
    }

    #[test]
    fn missing_file_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = decode_image(dir.path().join("container.jpg")).unwrap_err();
        assert!(matches!(err, TextureError::Decode { .. }));
    }

    #[test]
    fn checkerboard_alternates_cells() {
        let board = checkerboard(8, 4, [255, 255, 255], [0, 0, 0]);
        assert_eq!(board.pixels.len(), 8 * 8 * 3);
        assert_eq!(board.pixel(0, 0), Some(&[255, 255, 255][..]));
        assert_eq!(board.pixel(4, 0), Some(&[0, 0, 0][..]));
        assert_eq!(board.pixel(4, 4), Some(&[255, 255, 255][..]));
        assert_eq!(board.pixel(8, 0), None);
    }
}
