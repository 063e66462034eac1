//! LSB steganography and visible/invisible watermarking on raw pixel buffers.
//!
//! Two related codecs share the [`pixel_buffer::PixelBuffer`] foundation:
//! [`lsb`] hides a sentinel-delimited text message in the least-significant
//! bits of an image, and [`watermark`] composites text or logo overlays with
//! alpha blending. [`invisible`] layers an identity-tag convention on the LSB
//! codec, and [`metrics`] measures how much a transformation disturbed an
//! image. All operations are synchronous, deterministic transformations of
//! caller-supplied buffers; image file I/O lives in [`image_handler`].

pub mod error;
pub mod font;
pub mod image_handler;
pub mod invisible;
pub mod lsb;
pub mod metrics;
pub mod pixel_buffer;
pub mod placement;
pub mod trace;
pub mod watermark;

pub use error::{Result, StegamarkError};
pub use pixel_buffer::PixelBuffer;
