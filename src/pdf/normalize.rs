//! Image decoding and alpha flattening

use crate::error::{Error, Result};
use image::{DynamicImage, Rgb, RgbImage};

/// Canvas colour transparent pixels are composited onto
pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Decode raw image bytes fetched for `page`.
pub fn decode(bytes: &[u8], page: u32) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(|source| Error::ImageDecode { page, source })
}

/// Flatten an image onto an opaque white canvas of the same size.
///
/// Images without an alpha channel are converted to RGB unchanged.
pub fn flatten(image: &DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }

    let rgba = image.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (dst, src) in out.pixels_mut().zip(rgba.pixels()) {
        let alpha = src[3] as u32;
        for c in 0..3 {
            let fg = src[c] as u32;
            let bg = BACKGROUND[c] as u32;
            dst[c] = ((fg * alpha + bg * (255 - alpha) + 127) / 255) as u8;
        }
    }
    out
}

/// Decode then flatten.
pub fn normalize(bytes: &[u8], page: u32) -> Result<RgbImage> {
    Ok(flatten(&decode(bytes, page)?))
}
