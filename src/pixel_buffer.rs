//! Flat, mutable view over an image's raw 8-bit channel samples.
//!
//! Every codec in this crate operates on a [`PixelBuffer`] rather than on
//! `image` types directly. RGBA/RGB coercion happens here, on construction and
//! export, so the compositing and steganography code never branches on pixel
//! modes.

use image::{DynamicImage, ImageBuffer};

use crate::error::{Result, StegamarkError};

/// Raw channel samples plus shape. `data.len() == width * height * channels`
/// holds at all times; mutation is in-place value changes only.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: u8,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Builds a buffer from raw samples, validating shape consistency.
    ///
    /// # Errors
    /// * `UnsupportedFormat` if `channels` is not 3 (RGB) or 4 (RGBA)
    /// * `ShapeMismatch` if `data.len()` does not equal `width * height * channels`
    pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self> {
        if channels != 3 && channels != 4 {
            return Err(StegamarkError::UnsupportedFormat(format!(
                "expected 3 or 4 channels, got {channels}"
            )));
        }
        let expected_len = width as usize * height as usize * channels as usize;
        if data.len() != expected_len {
            return Err(StegamarkError::ShapeMismatch {
                expected: (width, height, channels),
                actual: (data.len() as u32, 1, 1),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    /// Normalizes a decoded image into a buffer: anything carrying alpha
    /// becomes 4-channel RGBA, everything else 3-channel RGB.
    pub fn from_image(image: &DynamicImage) -> Self {
        if image.color().has_alpha() {
            let rgba = image.to_rgba8();
            let (width, height) = rgba.dimensions();
            Self {
                width,
                height,
                channels: 4,
                data: rgba.into_raw(),
            }
        } else {
            let rgb = image.to_rgb8();
            let (width, height) = rgb.dimensions();
            Self {
                width,
                height,
                channels: 3,
                data: rgb.into_raw(),
            }
        }
    }

    /// Reconstructs an `image` object from shape + data.
    pub fn to_image(&self) -> Result<DynamicImage> {
        let make_err = || StegamarkError::UnsupportedFormat("buffer shape out of range".into());
        match self.channels {
            3 => ImageBuffer::from_raw(self.width, self.height, self.data.clone())
                .map(DynamicImage::ImageRgb8)
                .ok_or_else(make_err),
            4 => ImageBuffer::from_raw(self.width, self.height, self.data.clone())
                .map(DynamicImage::ImageRgba8)
                .ok_or_else(make_err),
            _ => Err(make_err()),
        }
    }

    /// Returns a 3-channel copy, dropping any alpha channel.
    pub fn to_rgb(&self) -> PixelBuffer {
        if self.channels == 3 {
            return self.clone();
        }
        let mut data = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for pixel in self.data.chunks_exact(4) {
            data.extend_from_slice(&pixel[..3]);
        }
        PixelBuffer {
            width: self.width,
            height: self.height,
            channels: 3,
            data,
        }
    }

    /// Returns a 4-channel copy, synthesizing a fully opaque alpha channel
    /// when the source has none.
    pub fn to_rgba(&self) -> PixelBuffer {
        if self.channels == 4 {
            return self.clone();
        }
        let mut data = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for pixel in self.data.chunks_exact(3) {
            data.extend_from_slice(pixel);
            data.push(255);
        }
        PixelBuffer {
            width: self.width,
            height: self.height,
            channels: 4,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Total number of channel samples (`width * height * channels`).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Reads a single sample by flat index.
    pub fn get(&self, index: usize) -> Result<u8> {
        self.data
            .get(index)
            .copied()
            .ok_or(StegamarkError::IndexOutOfBounds {
                index,
                len: self.data.len(),
            })
    }

    /// Writes a single sample by flat index.
    pub fn set(&mut self, index: usize, value: u8) -> Result<()> {
        let len = self.data.len();
        let slot = self
            .data
            .get_mut(index)
            .ok_or(StegamarkError::IndexOutOfBounds { index, len })?;
        *slot = value;
        Ok(())
    }

    /// Flat index of the sample at `(x, y, channel)`.
    fn index_of(&self, x: u32, y: u32, channel: u8) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels as usize + channel as usize
    }

    /// Reads the sample at `(x, y, channel)`.
    pub fn sample(&self, x: u32, y: u32, channel: u8) -> Result<u8> {
        if x >= self.width || y >= self.height || channel >= self.channels {
            return Err(StegamarkError::IndexOutOfBounds {
                index: self.index_of(x, y, channel),
                len: self.data.len(),
            });
        }
        self.get(self.index_of(x, y, channel))
    }

    /// Writes the sample at `(x, y, channel)`.
    pub fn set_sample(&mut self, x: u32, y: u32, channel: u8, value: u8) -> Result<()> {
        if x >= self.width || y >= self.height || channel >= self.channels {
            return Err(StegamarkError::IndexOutOfBounds {
                index: self.index_of(x, y, channel),
                len: self.data.len(),
            });
        }
        let index = self.index_of(x, y, channel);
        self.set(index, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_shape() {
        let ok = PixelBuffer::new(2, 2, 3, vec![0; 12]);
        assert!(ok.is_ok());

        let bad_len = PixelBuffer::new(2, 2, 3, vec![0; 11]);
        assert!(matches!(
            bad_len,
            Err(StegamarkError::ShapeMismatch { .. })
        ));

        let bad_channels = PixelBuffer::new(2, 2, 2, vec![0; 8]);
        assert!(matches!(
            bad_channels,
            Err(StegamarkError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_sample_access_by_coordinate() {
        let mut buf = PixelBuffer::new(3, 2, 3, vec![0; 18]).unwrap();
        buf.set_sample(2, 1, 1, 200).unwrap();
        assert_eq!(buf.sample(2, 1, 1).unwrap(), 200);
        // Flat layout: row-major, interleaved channels.
        assert_eq!(buf.get((1 * 3 + 2) * 3 + 1).unwrap(), 200);
    }

    #[test]
    fn test_out_of_bounds_access_fails() {
        let mut buf = PixelBuffer::new(2, 2, 3, vec![0; 12]).unwrap();
        assert!(matches!(
            buf.get(12),
            Err(StegamarkError::IndexOutOfBounds { index: 12, len: 12 })
        ));
        assert!(buf.set(100, 0).is_err());
        assert!(buf.sample(2, 0, 0).is_err());
        assert!(buf.set_sample(0, 0, 3, 0).is_err());
    }

    #[test]
    fn test_image_round_trip_preserves_samples() {
        let data: Vec<u8> = (0..27).collect();
        let buf = PixelBuffer::new(3, 3, 3, data.clone()).unwrap();
        let image = buf.to_image().unwrap();
        let back = PixelBuffer::from_image(&image);
        assert_eq!(back.channels(), 3);
        assert_eq!(back.data(), data.as_slice());
    }

    #[test]
    fn test_rgba_normalization() {
        let buf = PixelBuffer::new(1, 2, 3, vec![10, 20, 30, 40, 50, 60]).unwrap();
        let rgba = buf.to_rgba();
        assert_eq!(rgba.channels(), 4);
        assert_eq!(rgba.data(), &[10, 20, 30, 255, 40, 50, 60, 255]);

        let rgb = rgba.to_rgb();
        assert_eq!(rgb, buf);
        // Invariant survives both conversions.
        assert_eq!(rgba.len(), 1 * 2 * 4);
    }
}
