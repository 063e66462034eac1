//! Image quality comparison between two same-shaped pixel buffers.

use crate::error::{Result, StegamarkError};
use crate::pixel_buffer::PixelBuffer;

/// Peak sample value for 8-bit channels, used by the PSNR formula.
const MAX_SAMPLE: f64 = 255.0;

/// Result of comparing two buffers sample by sample.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityReport {
    /// Mean squared error over all channel samples.
    pub mse: f64,
    /// Peak signal-to-noise ratio in dB; `+inf` for identical buffers.
    pub psnr: f64,
    /// Number of channel samples that differ (per sample, not per pixel).
    pub diff_samples: usize,
    /// Total channel samples compared.
    pub total_samples: usize,
    /// `diff_samples / total_samples * 100`.
    pub diff_percentage: f64,
}

/// Compares two buffers of identical shape.
///
/// # Errors
/// `ShapeMismatch` unless width, height and channel count all agree.
pub fn compare(a: &PixelBuffer, b: &PixelBuffer) -> Result<QualityReport> {
    let shape_a = (a.width(), a.height(), a.channels());
    let shape_b = (b.width(), b.height(), b.channels());
    if shape_a != shape_b {
        return Err(StegamarkError::ShapeMismatch {
            expected: shape_a,
            actual: shape_b,
        });
    }

    let total_samples = a.len();
    let mut squared_error = 0.0f64;
    let mut diff_samples = 0usize;
    for (&sa, &sb) in a.data().iter().zip(b.data().iter()) {
        // Widen before squaring so 255^2 cannot overflow.
        let delta = f64::from(sa) - f64::from(sb);
        squared_error += delta * delta;
        if sa != sb {
            diff_samples += 1;
        }
    }

    let mse = if total_samples == 0 {
        0.0
    } else {
        squared_error / total_samples as f64
    };
    let psnr = if mse == 0.0 {
        f64::INFINITY
    } else {
        20.0 * (MAX_SAMPLE / mse.sqrt()).log10()
    };
    let diff_percentage = if total_samples == 0 {
        0.0
    } else {
        diff_samples as f64 / total_samples as f64 * 100.0
    };

    Ok(QualityReport {
        mse,
        psnr,
        diff_samples,
        total_samples,
        diff_percentage,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_buffers() {
        let a = PixelBuffer::new(8, 8, 3, vec![90; 192]).unwrap();
        let report = compare(&a, &a.clone()).unwrap();
        assert_eq!(report.mse, 0.0);
        assert!(report.psnr.is_infinite());
        assert_eq!(report.diff_samples, 0);
        assert_eq!(report.total_samples, 192);
        assert_eq!(report.diff_percentage, 0.0);
    }

    #[test]
    fn test_known_difference() {
        let a = PixelBuffer::new(2, 2, 3, vec![10; 12]).unwrap();
        let mut b_data = vec![10; 12];
        b_data[0] = 13; // delta 3 in one of 12 samples
        let b = PixelBuffer::new(2, 2, 3, b_data).unwrap();

        let report = compare(&a, &b).unwrap();
        assert!((report.mse - 9.0 / 12.0).abs() < 1e-12);
        let expected_psnr = 20.0 * (255.0 / (9.0f64 / 12.0).sqrt()).log10();
        assert!((report.psnr - expected_psnr).abs() < 1e-9);
        assert_eq!(report.diff_samples, 1);
        assert!((report.diff_percentage - 100.0 / 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_shape_mismatch() {
        let a = PixelBuffer::new(2, 2, 3, vec![0; 12]).unwrap();
        let b = PixelBuffer::new(2, 3, 3, vec![0; 18]).unwrap();
        let err = compare(&a, &b).unwrap_err();
        assert_eq!(
            err,
            StegamarkError::ShapeMismatch {
                expected: (2, 2, 3),
                actual: (2, 3, 3)
            }
        );

        // Same pixel count, different channel model still mismatches.
        let c = PixelBuffer::new(2, 2, 4, vec![0; 16]).unwrap();
        assert!(compare(&a, &c).is_err());
    }

    #[test]
    fn test_maximum_difference_does_not_overflow() {
        let a = PixelBuffer::new(4, 4, 3, vec![0; 48]).unwrap();
        let b = PixelBuffer::new(4, 4, 3, vec![255; 48]).unwrap();
        let report = compare(&a, &b).unwrap();
        assert_eq!(report.mse, 255.0 * 255.0);
        assert!((report.psnr - 0.0).abs() < 1e-9);
        assert_eq!(report.diff_percentage, 100.0);
    }
}
