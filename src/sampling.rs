//! Pixel sampling ahead of quantization.
//!
//! Every `quality`-th pixel is visited. Mostly transparent pixels and
//! near-white pixels are skipped so backgrounds do not crowd the palette.

extern crate alloc;
use alloc::vec::Vec;

use imgref::ImgRef;
use rgb::{RGB8, RGBA8};

use crate::error::QuantizeError;

/// Pixels with alpha below this are skipped.
pub const MIN_ALPHA: u8 = 125;

/// Pixels with every channel above this are treated as background white.
pub const WHITE_THRESHOLD: u8 = 250;

/// Default sampling step.
pub const DEFAULT_QUALITY: usize = 10;

#[inline]
fn keep(px: &RGBA8) -> bool {
    px.a >= MIN_ALPHA
        && !(px.r > WHITE_THRESHOLD && px.g > WHITE_THRESHOLD && px.b > WHITE_THRESHOLD)
}

/// Sample a contiguous RGBA buffer, dropping alpha.
///
/// May return an empty vector if every visited pixel was filtered out.
pub fn sample_pixels(pixels: &[RGBA8], quality: usize) -> Result<Vec<RGB8>, QuantizeError> {
    if quality == 0 {
        return Err(QuantizeError::InvalidQuality);
    }
    Ok(pixels
        .iter()
        .step_by(quality)
        .filter(|px| keep(px))
        .map(|px| RGB8::new(px.r, px.g, px.b))
        .collect())
}

/// Sample an image buffer, skipping any row padding.
///
/// The stride runs over pixels in row-major order across row boundaries, so
/// the result matches [`sample_pixels`] on the same pixels packed tightly.
pub fn sample_image(img: ImgRef<'_, RGBA8>, quality: usize) -> Result<Vec<RGB8>, QuantizeError> {
    if quality == 0 {
        return Err(QuantizeError::InvalidQuality);
    }
    Ok(img
        .pixels()
        .step_by(quality)
        .filter(keep)
        .map(|px| RGB8::new(px.r, px.g, px.b))
        .collect())
}
