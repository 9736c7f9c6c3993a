//! Image normalisation: decode, downscale to the bounding box, re-encode PNG.
//!
//! ## Why PNG?
//! The docx embeds whatever bytes we give it; re-encoding everything to a
//! single lossless format means one predictable code path in the renderer
//! and no JPEG artefacts compounding on already-compressed sources.
//!
//! ## Why only downscale?
//! `thumbnail` fits the image inside `max × max` preserving aspect ratio.
//! Images already inside the box are passed through untouched - upscaling
//! adds bytes, not detail.
//!
//! Failures here never abort a page: the caller renders a placeholder block
//! instead (see `pipeline::render`).

use image::ImageFormat;
use std::io::Cursor;
use tracing::debug;

/// A normalised image ready to embed: PNG bytes plus final pixel dimensions
/// (the renderer needs them to compute the display aspect ratio).
#[derive(Debug, Clone)]
pub struct EmbeddedImage {
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decode raw fetched bytes, downscale so neither dimension exceeds
/// `max_dim`, and re-encode as PNG.
pub fn prepare_image(bytes: &[u8], max_dim: u32) -> Result<EmbeddedImage, image::ImageError> {
    let decoded = image::load_from_memory(bytes)?;
    let (w, h) = (decoded.width(), decoded.height());

    let resized = if w > max_dim || h > max_dim {
        let scaled = decoded.thumbnail(max_dim, max_dim);
        debug!(
            "Downscaled image {}x{} → {}x{}",
            w,
            h,
            scaled.width(),
            scaled.height()
        );
        scaled
    } else {
        decoded
    };

    let mut png = Vec::new();
    resized.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

    Ok(EmbeddedImage {
        width: resized.width(),
        height: resized.height(),
        png,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            Rgba([120, 30, 200, 255]),
        ));
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn oversized_image_longer_side_hits_bound() {
        let bytes = png_bytes(1200, 800);
        let out = prepare_image(&bytes, 600).unwrap();
        assert_eq!(out.width, 600);
        assert_eq!(out.height, 400);
    }

    #[test]
    fn portrait_aspect_preserved_within_rounding() {
        let bytes = png_bytes(500, 1000);
        let out = prepare_image(&bytes, 600).unwrap();
        assert_eq!(out.height, 600);
        assert_eq!(out.width, 300);
    }

    #[test]
    fn small_image_passes_through() {
        let bytes = png_bytes(320, 200);
        let out = prepare_image(&bytes, 600).unwrap();
        assert_eq!((out.width, out.height), (320, 200));
    }

    #[test]
    fn output_is_valid_png() {
        let bytes = png_bytes(700, 700);
        let out = prepare_image(&bytes, 600).unwrap();
        // PNG magic
        assert_eq!(&out.png[..4], &[0x89, b'P', b'N', b'G']);
        let reloaded = image::load_from_memory(&out.png).unwrap();
        assert_eq!((reloaded.width(), reloaded.height()), (600, 600));
    }

    #[test]
    fn garbage_bytes_fail_cleanly() {
        assert!(prepare_image(b"this is not an image", 600).is_err());
    }
}
