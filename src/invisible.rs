//! Invisible watermarking: an identity tag hidden with the LSB codec.
//!
//! This is a protocol convention on top of [`crate::lsb`], not a separate wire
//! format. The tag is embedded as an ordinary message carrying a fixed prefix
//! so extraction can tell a watermark apart from arbitrary hidden text.

use crate::error::Result;
use crate::lsb;
use crate::pixel_buffer::PixelBuffer;

/// Prefix identifying an embedded message as a watermark tag.
pub const TAG_PREFIX: &str = "WM:";

/// Hides `tag` in the buffer, equivalent to embedding `"WM:" + tag`.
pub fn add(buffer: &mut PixelBuffer, tag: &str) -> Result<()> {
    lsb::embed(buffer, &format!("{TAG_PREFIX}{tag}"))
}

/// Recovers the tag, or `None` when the buffer holds no message or the message
/// lacks the watermark prefix. Absence is a normal outcome, not an error.
pub fn extract(buffer: &PixelBuffer) -> Option<String> {
    let message = lsb::decode(buffer)?;
    message.strip_prefix(TAG_PREFIX).map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer() -> PixelBuffer {
        PixelBuffer::new(20, 20, 3, vec![127; 1200]).unwrap()
    }

    #[test]
    fn test_add_extract_round_trip() {
        let mut buf = buffer();
        add(&mut buf, "copyright 2026").unwrap();
        assert_eq!(extract(&buf), Some("copyright 2026".to_string()));
    }

    #[test]
    fn test_extract_without_add_returns_none() {
        assert_eq!(extract(&buffer()), None);
    }

    #[test]
    fn test_extract_ignores_plain_message() {
        let mut buf = buffer();
        lsb::embed(&mut buf, "just a secret, not a watermark").unwrap();
        assert_eq!(extract(&buf), None);
    }

    #[test]
    fn test_empty_tag_round_trips() {
        let mut buf = buffer();
        add(&mut buf, "").unwrap();
        assert_eq!(extract(&buf), Some(String::new()));
    }
}
