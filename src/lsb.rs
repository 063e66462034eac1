//! LSB message codec: embeds a sentinel-delimited bitstream into the
//! least-significant bits of a pixel buffer and recovers it again.
//!
//! One bit is stored per channel sample, index-ascending, MSB-first within each
//! message byte. The stream is terminated by [`SENTINEL`]; the decoder takes
//! the *first* occurrence of that pattern as the end of the message, so a
//! payload whose own bits happen to form the pattern truncates early. That
//! framing is part of the wire format and is kept as-is.

use log::debug;

use crate::error::{Result, StegamarkError};
use crate::pixel_buffer::PixelBuffer;
use crate::trace::{NullObserver, Observer, TraceEvent};

/// End-of-message delimiter, appended MSB-first: `1111111111111110`.
pub const SENTINEL: u16 = 0b1111_1111_1111_1110;

/// Number of bits in the delimiter.
pub const SENTINEL_BITS: usize = 16;

/// How many message bits and whole bytes a buffer can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    /// Samples available for message bits once the sentinel is reserved.
    pub max_bits: usize,
    /// Whole message bytes that fit (`max_bits / 8`, floored).
    pub max_bytes: usize,
    /// Total channel samples in the buffer.
    pub total_samples: usize,
}

/// Reports how much message a buffer can carry: one bit per sample, minus the
/// 16 samples reserved for the sentinel.
pub fn capacity(buffer: &PixelBuffer) -> Capacity {
    let total_samples = buffer.len();
    let max_bits = total_samples.saturating_sub(SENTINEL_BITS);
    Capacity {
        max_bits,
        max_bytes: max_bits / 8,
        total_samples,
    }
}

/// Embeds `message` into the buffer's least-significant bits.
///
/// The message is rendered as UTF-8 bytes, 8 bits per byte MSB-first, followed
/// by the sentinel. Only the low bit of each written sample changes; samples
/// beyond the bitstream are untouched.
///
/// # Errors
/// `CapacityExceeded` when the bitstream is longer than the sample count. The
/// capacity check runs before the first write, so a failed embed leaves the
/// buffer bit-identical to its input.
pub fn embed(buffer: &mut PixelBuffer, message: &str) -> Result<()> {
    embed_observed(buffer, message, &mut NullObserver)
}

/// [`embed`] with a progress observer.
pub fn embed_observed(
    buffer: &mut PixelBuffer,
    message: &str,
    observer: &mut dyn Observer,
) -> Result<()> {
    // 1. Expand the message to a bitstream, MSB-first.
    let message_bytes = message.as_bytes();
    let mut bits: Vec<u8> = Vec::with_capacity(message_bytes.len() * 8 + SENTINEL_BITS);
    for &byte in message_bytes {
        for shift in (0..8).rev() {
            bits.push((byte >> shift) & 1);
        }
    }
    observer.on_event(&TraceEvent::MessageEncoded {
        chars: message.chars().count(),
        bits: bits.len(),
    });

    // 2. Append the 16-bit sentinel.
    for shift in (0..SENTINEL_BITS).rev() {
        bits.push(((SENTINEL >> shift) & 1) as u8);
    }
    observer.on_event(&TraceEvent::SentinelAppended {
        total_bits: bits.len(),
    });

    // 3. Validate capacity before touching any sample.
    let required = bits.len();
    let available = buffer.len();
    observer.on_event(&TraceEvent::CapacityChecked {
        required,
        capacity: available,
    });
    if required > available {
        return Err(StegamarkError::CapacityExceeded {
            required,
            capacity: available,
        });
    }

    // 4. Write each bit into the low bit of the corresponding sample.
    let mut changed = 0usize;
    for (sample, bit) in buffer.data_mut().iter_mut().zip(bits.iter()) {
        let updated = (*sample & 0xFE) | bit;
        if updated != *sample {
            changed += 1;
        }
        *sample = updated;
    }
    observer.on_event(&TraceEvent::SamplesWritten {
        written: required,
        changed,
    });
    debug!("embedded {required} bits ({changed} samples changed)");

    Ok(())
}

/// Recovers the embedded message, or `None` when no sentinel run exists in the
/// buffer's LSB stream. Absence is a normal outcome, not an error.
pub fn decode(buffer: &PixelBuffer) -> Option<String> {
    decode_observed(buffer, &mut NullObserver)
}

/// [`decode`] with a progress observer.
pub fn decode_observed(buffer: &PixelBuffer, observer: &mut dyn Observer) -> Option<String> {
    let data = buffer.data();
    observer.on_event(&TraceEvent::BitsExtracted { total: data.len() });

    // Slide a 16-bit window over the LSB stream, index-ascending, and stop at
    // the first position matching the sentinel.
    let mut window: u16 = 0;
    let mut sentinel_start = None;
    for (i, &sample) in data.iter().enumerate() {
        window = (window << 1) | u16::from(sample & 1);
        if i + 1 >= SENTINEL_BITS && window == SENTINEL {
            sentinel_start = Some(i + 1 - SENTINEL_BITS);
            break;
        }
    }

    let Some(message_bits) = sentinel_start else {
        observer.on_event(&TraceEvent::SentinelMissing);
        debug!("no sentinel in {} extracted bits", data.len());
        return None;
    };
    observer.on_event(&TraceEvent::SentinelFound {
        bit_index: message_bits,
    });

    // Partial trailing bits before the sentinel cannot form a character and
    // are dropped.
    let whole_byte_bits = message_bits - message_bits % 8;
    let mut message = String::with_capacity(whole_byte_bits / 8);
    for group in data[..whole_byte_bits].chunks_exact(8) {
        let mut byte = 0u8;
        for &sample in group {
            byte = (byte << 1) | (sample & 1);
        }
        // One byte, one code point. Values 128-255 map to U+0080..U+00FF.
        message.push(byte as char);
    }
    observer.on_event(&TraceEvent::MessageDecoded {
        chars: message.chars().count(),
    });
    debug!("decoded {} characters", message.chars().count());

    Some(message)
}
