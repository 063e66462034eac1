//! Visible watermark compositor: draws text or a logo image onto a pixel
//! buffer with positional placement and alpha blending.
//!
//! Both paths share the same blend: `result = fg * a + bg * (1 - a)` per R/G/B
//! channel, with `a` in `[0, 1]`. Text uses a uniform alpha from the caller's
//! opacity; a logo carries its own alpha channel, multiplicatively scaled by
//! the opacity. Output is always a fresh 3-channel buffer.

use image::imageops::{self, FilterType};
use log::debug;

use crate::error::{Result, StegamarkError};
use crate::font;
use crate::pixel_buffer::PixelBuffer;
use crate::placement::{self, MARGIN, Placement};
use crate::trace::{NullObserver, Observer, TraceEvent};

/// White foreground used for text watermarks.
const TEXT_COLOR: [u8; 3] = [255, 255, 255];

#[inline]
fn blend_channel(fg: u8, bg: u8, alpha: f32) -> u8 {
    (f32::from(fg) * alpha + f32::from(bg) * (1.0 - alpha)).round() as u8
}

/// Draws `text` in white onto a copy of `buffer` at the given placement.
///
/// The text is rasterized at a size proportional to 5% of the smaller buffer
/// dimension and blended with a uniform alpha of `opacity / 255`. The result
/// never aliases the input, so the caller can compare the two buffers.
pub fn render_text(
    buffer: &PixelBuffer,
    text: &str,
    anchor: Placement,
    opacity: u8,
) -> Result<PixelBuffer> {
    render_text_observed(buffer, text, anchor, opacity, &mut NullObserver)
}

/// [`render_text`] with a progress observer.
pub fn render_text_observed(
    buffer: &PixelBuffer,
    text: &str,
    anchor: Placement,
    opacity: u8,
    observer: &mut dyn Observer,
) -> Result<PixelBuffer> {
    let container = (buffer.width(), buffer.height());
    observer.on_event(&TraceEvent::OverlayCreated {
        width: container.0,
        height: container.1,
    });

    // Measure the rendered text, then resolve the anchor with the fixed margin.
    let scale = font::scale_for(container);
    let mask = font::rasterize(text, scale);
    observer.on_event(&TraceEvent::TextMeasured {
        width: mask.width,
        height: mask.height,
        scale,
    });
    let (anchor_x, anchor_y) = placement::resolve(container, (mask.width, mask.height), MARGIN, anchor);
    observer.on_event(&TraceEvent::PlacementResolved {
        x: anchor_x,
        y: anchor_y,
    });

    // Composite the mask over the base; output drops any alpha channel.
    let mut result = buffer.to_rgb();
    let alpha = f32::from(opacity) / 255.0;
    let mut blended_samples = 0usize;
    for my in 0..mask.height {
        for mx in 0..mask.width {
            if mask.coverage[(my * mask.width + mx) as usize] == 0 {
                continue;
            }
            let x = anchor_x + i64::from(mx);
            let y = anchor_y + i64::from(my);
            if x < 0 || y < 0 || x >= i64::from(container.0) || y >= i64::from(container.1) {
                continue;
            }
            let (x, y) = (x as u32, y as u32);
            for channel in 0..3u8 {
                let bg = result.sample(x, y, channel)?;
                result.set_sample(x, y, channel, blend_channel(TEXT_COLOR[channel as usize], bg, alpha))?;
                blended_samples += 1;
            }
        }
    }
    observer.on_event(&TraceEvent::Composited {
        samples: blended_samples,
    });
    debug!("text watermark blended {blended_samples} samples at ({anchor_x}, {anchor_y})");

    Ok(result)
}

/// Blends a resized copy of `logo` onto a copy of `base` at the given
/// placement.
///
/// The logo is resized so its width is `scale * base.width` with its aspect
/// ratio preserved (Lanczos3 resampling), normalized to RGBA, and its alpha
/// channel multiplied by `opacity / 255`. Logo pixels falling outside the base
/// are silently clipped.
///
/// # Errors
/// `UnsupportedFormat` if the scaled logo degenerates to zero width or height.
pub fn render_image(
    base: &PixelBuffer,
    logo: &PixelBuffer,
    anchor: Placement,
    opacity: u8,
    scale: f32,
) -> Result<PixelBuffer> {
    render_image_observed(base, logo, anchor, opacity, scale, &mut NullObserver)
}

/// [`render_image`] with a progress observer.
pub fn render_image_observed(
    base: &PixelBuffer,
    logo: &PixelBuffer,
    anchor: Placement,
    opacity: u8,
    scale: f32,
    observer: &mut dyn Observer,
) -> Result<PixelBuffer> {
    // 1. Resize the logo to a fraction of the base width, keeping its aspect
    //    ratio; height is recomputed, never scaled independently.
    //    A zero-dimension logo has no aspect ratio; reject it before the
    //    division can produce inf and saturate the height cast.
    if logo.width() == 0 || logo.height() == 0 {
        return Err(StegamarkError::UnsupportedFormat(format!(
            "logo has degenerate dimensions {}x{}",
            logo.width(),
            logo.height()
        )));
    }
    let logo_width = (base.width() as f32 * scale) as u32;
    let aspect = logo.width() as f32 / logo.height() as f32;
    let logo_height = (logo_width as f32 / aspect) as u32;
    if logo_width == 0 || logo_height == 0 {
        return Err(StegamarkError::UnsupportedFormat(format!(
            "logo scaled to {logo_width}x{logo_height} pixels"
        )));
    }

    let rgba = logo.to_rgba().to_image()?.to_rgba8();
    let mut resized = imageops::resize(&rgba, logo_width, logo_height, FilterType::Lanczos3);
    observer.on_event(&TraceEvent::LogoResized {
        width: logo_width,
        height: logo_height,
    });

    // 2. Scale the logo's own alpha by the requested opacity.
    let opacity_factor = f32::from(opacity) / 255.0;
    for pixel in resized.pixels_mut() {
        pixel[3] = (f32::from(pixel[3]) * opacity_factor).round() as u8;
    }
    observer.on_event(&TraceEvent::AlphaScaled { opacity });

    // 3. Resolve the placement with the resized dimensions.
    let container = (base.width(), base.height());
    let (anchor_x, anchor_y) =
        placement::resolve(container, (logo_width, logo_height), MARGIN, anchor);
    observer.on_event(&TraceEvent::PlacementResolved {
        x: anchor_x,
        y: anchor_y,
    });

    // 4. Blend each logo pixel with its own alpha, clipping out-of-bounds.
    let mut result = base.to_rgb();
    let mut blended_samples = 0usize;
    for (lx, ly, pixel) in resized.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        let x = anchor_x + i64::from(lx);
        let y = anchor_y + i64::from(ly);
        if x < 0 || y < 0 || x >= i64::from(container.0) || y >= i64::from(container.1) {
            continue;
        }
        let (x, y) = (x as u32, y as u32);
        let alpha = f32::from(pixel[3]) / 255.0;
        for channel in 0..3u8 {
            let bg = result.sample(x, y, channel)?;
            result.set_sample(x, y, channel, blend_channel(pixel[channel as usize], bg, alpha))?;
            blended_samples += 1;
        }
    }
    observer.on_event(&TraceEvent::Composited {
        samples: blended_samples,
    });
    debug!("logo watermark blended {blended_samples} samples at ({anchor_x}, {anchor_y})");

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_buffer(width: u32, height: u32, value: u8) -> PixelBuffer {
        PixelBuffer::new(
            width,
            height,
            3,
            vec![value; width as usize * height as usize * 3],
        )
        .unwrap()
    }

    fn solid_rgba_logo(width: u32, height: u32, rgba: [u8; 4]) -> PixelBuffer {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..width * height {
            data.extend_from_slice(&rgba);
        }
        PixelBuffer::new(width, height, 4, data).unwrap()
    }

    #[test]
    fn test_render_text_zero_opacity_is_identity() {
        let base = gray_buffer(200, 200, 80);
        let out = render_text(&base, "MARK", Placement::Center, 0).unwrap();
        assert_eq!(out, base);
    }

    #[test]
    fn test_render_text_full_opacity_paints_white() {
        let base = gray_buffer(200, 200, 80);
        let out = render_text(&base, "MARK", Placement::Center, 255).unwrap();
        assert!(out.data().iter().any(|&s| s == 255));
        // Untouched corner pixel keeps the background value.
        assert_eq!(out.sample(0, 0, 0).unwrap(), 80);
    }

    #[test]
    fn test_render_text_opacity_is_monotonic() {
        let base = gray_buffer(200, 200, 80);
        // Find a text pixel via the full-opacity render, then check the blend
        // at that pixel moves monotonically toward white with opacity.
        let reference = render_text(&base, "MARK", Placement::Center, 255).unwrap();
        let (index, _) = reference
            .data()
            .iter()
            .enumerate()
            .find(|&(_, &s)| s == 255)
            .expect("text should paint at least one white sample");

        let mut last = 80u8;
        for opacity in [0u8, 64, 128, 192, 255] {
            let out = render_text(&base, "MARK", Placement::Center, opacity).unwrap();
            let value = out.data()[index];
            assert!(value >= last, "opacity {opacity} regressed {value} < {last}");
            last = value;
        }
        assert_eq!(last, 255);
    }

    #[test]
    fn test_render_text_output_is_rgb_and_does_not_alias() {
        let rgba = gray_buffer(100, 100, 50).to_rgba();
        let out = render_text(&rgba, "X", Placement::TopLeft, 128).unwrap();
        assert_eq!(out.channels(), 3);
        assert_eq!((out.width(), out.height()), (100, 100));
        // Input untouched.
        assert_eq!(rgba.channels(), 4);
        assert!(rgba.data().iter().all(|&s| s == 50 || s == 255));
    }

    #[test]
    fn test_render_image_opaque_logo_replaces_base() {
        let base = gray_buffer(100, 100, 10);
        let logo = solid_rgba_logo(20, 20, [200, 40, 90, 255]);
        let out = render_image(&base, &logo, Placement::TopLeft, 255, 0.2).unwrap();

        // Logo resizes to 20x20 at the 20px margin; its center is pure logo.
        assert_eq!(out.sample(30, 30, 0).unwrap(), 200);
        assert_eq!(out.sample(30, 30, 1).unwrap(), 40);
        assert_eq!(out.sample(30, 30, 2).unwrap(), 90);
        // Far corner untouched.
        assert_eq!(out.sample(99, 99, 0).unwrap(), 10);
    }

    #[test]
    fn test_render_image_transparent_logo_leaves_base() {
        let base = gray_buffer(100, 100, 10);
        let logo = solid_rgba_logo(20, 20, [200, 40, 90, 0]);
        let out = render_image(&base, &logo, Placement::Center, 255, 0.2).unwrap();
        assert_eq!(out, base);
    }

    #[test]
    fn test_render_image_zero_opacity_leaves_base() {
        let base = gray_buffer(100, 100, 10);
        let logo = solid_rgba_logo(20, 20, [200, 40, 90, 255]);
        let out = render_image(&base, &logo, Placement::Center, 0, 0.2).unwrap();
        assert_eq!(out, base);
    }

    #[test]
    fn test_render_image_half_opacity_blends() {
        let base = gray_buffer(100, 100, 0);
        let logo = solid_rgba_logo(20, 20, [200, 200, 200, 255]);
        let out = render_image(&base, &logo, Placement::TopLeft, 128, 0.2).unwrap();
        // alpha = round(255 * 128/255) = 128, blend = 200 * 128/255 ~ 100.
        let value = out.sample(30, 30, 0).unwrap();
        assert!((99..=102).contains(&value), "got {value}");
    }

    #[test]
    fn test_render_image_rgb_logo_treated_opaque() {
        let base = gray_buffer(100, 100, 10);
        let logo = gray_buffer(20, 20, 240);
        let out = render_image(&base, &logo, Placement::TopLeft, 255, 0.2).unwrap();
        assert_eq!(out.sample(30, 30, 0).unwrap(), 240);
    }

    #[test]
    fn test_render_image_clips_oversized_logo() {
        let base = gray_buffer(50, 50, 10);
        let logo = solid_rgba_logo(40, 40, [255, 255, 255, 255]);
        // scale 2.0: logo resizes to 100x100, anchor goes negative, pixels
        // outside the base are dropped without error.
        let out = render_image(&base, &logo, Placement::BottomRight, 255, 2.0).unwrap();
        assert_eq!((out.width(), out.height()), (50, 50));
        assert!(out.data().iter().any(|&s| s == 255));
    }

    #[test]
    fn test_render_image_rejects_zero_dimension_logo() {
        let base = gray_buffer(100, 100, 10);
        // Both zero-size logos are constructible: the length invariant holds
        // at 0. Neither may reach the resampler.
        let zero_width = PixelBuffer::new(0, 5, 4, vec![]).unwrap();
        let err = render_image(&base, &zero_width, Placement::Center, 255, 0.2).unwrap_err();
        assert!(matches!(err, StegamarkError::UnsupportedFormat(_)));

        let zero_height = PixelBuffer::new(5, 0, 4, vec![]).unwrap();
        let err = render_image(&base, &zero_height, Placement::Center, 255, 0.2).unwrap_err();
        assert!(matches!(err, StegamarkError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_render_image_rejects_degenerate_scale() {
        let base = gray_buffer(100, 100, 10);
        let logo = solid_rgba_logo(20, 20, [1, 2, 3, 255]);
        let err = render_image(&base, &logo, Placement::Center, 255, 0.0).unwrap_err();
        assert!(matches!(err, StegamarkError::UnsupportedFormat(_)));
    }
}
