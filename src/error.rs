use thiserror::Error;

/// The central error type for all operations in the stegamark_engine.
#[derive(Error, Debug)]
pub enum StegamarkError {
    #[error("Message needs {required} bits but the image only holds {capacity}")]
    CapacityExceeded { required: usize, capacity: usize },

    #[error("Buffer shapes differ: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: (u32, u32, u8),
        actual: (u32, u32, u8),
    },

    #[error("Unsupported pixel format: {0}")]
    UnsupportedFormat(String),

    #[error("Sample index {index} out of bounds for buffer of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Image processing error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

// Manually implement PartialEq so tests can assert on exact error values.
impl PartialEq for StegamarkError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                StegamarkError::CapacityExceeded {
                    required: r1,
                    capacity: c1,
                },
                StegamarkError::CapacityExceeded {
                    required: r2,
                    capacity: c2,
                },
            ) => r1 == r2 && c1 == c2,
            (
                StegamarkError::ShapeMismatch {
                    expected: e1,
                    actual: a1,
                },
                StegamarkError::ShapeMismatch {
                    expected: e2,
                    actual: a2,
                },
            ) => e1 == e2 && a1 == a2,
            (StegamarkError::UnsupportedFormat(s1), StegamarkError::UnsupportedFormat(s2)) => {
                s1 == s2
            }
            (
                StegamarkError::IndexOutOfBounds { index: i1, len: l1 },
                StegamarkError::IndexOutOfBounds { index: i2, len: l2 },
            ) => i1 == i2 && l1 == l2,
            // For errors with `#[from]` foreign types, only compare the *variant*.
            // The inner `image::ImageError` / `std::io::Error` are not comparable.
            (StegamarkError::ImageError(_), StegamarkError::ImageError(_)) => true,
            (StegamarkError::IoError(_), StegamarkError::IoError(_)) => true,
            _ => false,
        }
    }
}

/// A centralized result type for our library.
pub type Result<T> = std::result::Result<T, StegamarkError>;
