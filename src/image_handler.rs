//! Image decode/encode collaborator: the only place file formats matter.
//!
//! The codecs themselves consume [`PixelBuffer`]s; this module bridges them to
//! encoded images. Output is always PNG: lossless encoding is what keeps an
//! LSB payload intact.

use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;

use crate::error::Result;
use crate::pixel_buffer::PixelBuffer;

/// Load an image from encoded bytes (supports PNG, JPEG, BMP, etc.)
pub fn load_from_bytes(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// Encode an image as PNG bytes.
pub fn save_to_png_bytes(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

/// Read a file and normalize it into a pixel buffer.
pub fn load_buffer(path: &Path) -> Result<PixelBuffer> {
    let bytes = std::fs::read(path)?;
    let image = load_from_bytes(&bytes)?;
    Ok(PixelBuffer::from_image(&image))
}

/// Write a pixel buffer to `path` as PNG.
pub fn save_buffer(buffer: &PixelBuffer, path: &Path) -> Result<()> {
    let bytes = save_to_png_bytes(&buffer.to_image()?)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_bytes_round_trip() {
        let buffer = PixelBuffer::new(5, 4, 3, (0..60).collect()).unwrap();
        let bytes = save_to_png_bytes(&buffer.to_image().unwrap()).unwrap();
        let decoded = load_from_bytes(&bytes).unwrap();
        assert_eq!(PixelBuffer::from_image(&decoded), buffer);
    }
}
