#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

//! Median-cut color palette extraction.
//!
//! Pixels are bucketed into a reduced RGB histogram, the enclosing box is
//! split repeatedly at population medians, and each final box is averaged
//! into one palette color.
//!
//! ```
//! use zenpalette::{QuantizeConfig, quantize};
//!
//! let mut pixels = vec![rgb::RGB8::new(255, 0, 0); 100];
//! pixels.extend(vec![rgb::RGB8::new(0, 255, 0); 100]);
//! let palette = quantize(&pixels, &QuantizeConfig::new().max_colors(2)).unwrap();
//! assert_eq!(palette.len(), 2);
//! ```

extern crate alloc;

pub mod color_box;
pub mod error;
pub mod histogram;
pub mod median_cut;
pub mod palette;
pub mod refine;
pub mod sampling;
pub mod worklist;

pub use color_box::{Channel, ColorBox};
pub use error::QuantizeError;
pub use histogram::Histogram;
pub use imgref::ImgRef;
pub use palette::{Palette, Swatch};

use rgb::{RGB8, RGBA8};

use crate::refine::RefineStats;
use crate::worklist::RankedWorklist;

/// Configuration for palette quantization.
#[derive(Debug, Clone)]
pub struct QuantizeConfig {
    /// Maximum number of palette colors (2..=256).
    pub max_colors: u32,
    /// Significant bits kept per channel (1..=8).
    pub significant_bits: u32,
    /// Cap on boxes popped per refinement phase.
    pub max_iterations: usize,
    /// Share of the palette produced by the population-ranked first phase.
    pub population_fraction: f64,
}

impl Default for QuantizeConfig {
    fn default() -> Self {
        Self {
            max_colors: 256,
            significant_bits: histogram::DEFAULT_SIGBITS,
            max_iterations: refine::DEFAULT_MAX_ITERATIONS,
            population_fraction: 0.75,
        }
    }
}

impl QuantizeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_colors(mut self, n: u32) -> Self {
        self.max_colors = n;
        self
    }

    pub fn significant_bits(mut self, bits: u32) -> Self {
        self.significant_bits = bits;
        self
    }

    pub fn max_iterations(mut self, cap: usize) -> Self {
        self.max_iterations = cap;
        self
    }

    pub fn population_fraction(mut self, fraction: f64) -> Self {
        self.population_fraction = fraction;
        self
    }
}

/// Quantize RGB pixels to a palette of at most `config.max_colors` colors.
///
/// Refinement runs in two phases. The first ranks boxes by population and
/// stops once `population_fraction * max_colors` colors exist; the second
/// ranks by population times volume and fills the rest. The palette is in
/// final rank order, so the first entry is the dominant color.
pub fn quantize(pixels: &[RGB8], config: &QuantizeConfig) -> Result<Palette, QuantizeError> {
    validate_inputs(pixels.len(), config)?;

    let hist = Histogram::from_pixels(pixels, config.significant_bits)?;
    let k = config.max_colors as usize;

    // 1. Population-ranked splits, seeded with the enclosing box as one color
    let mut by_population = RankedWorklist::new(ColorBox::cmp_population);
    by_population.push(ColorBox::enclosing(&hist));
    let target = config.population_fraction * k as f64;
    let stats = refine::refine(&mut by_population, 1, target, config.max_iterations)?;
    log_phase("population", target, config.max_iterations, &stats);

    // 2. Re-rank everything by population * volume and fill up to k
    let mut by_volume = RankedWorklist::new(ColorBox::cmp_population_volume);
    by_volume.extend(core::iter::from_fn(|| by_population.pop()));
    let target = k.saturating_sub(by_volume.len()) as f64;
    let stats = refine::refine(&mut by_volume, 0, target, config.max_iterations)?;
    log_phase("volume", target, config.max_iterations, &stats);

    let boxes = by_volume.into_ranked();
    log::debug!(
        "quantized {} pixels into {} colors (requested {k})",
        hist.total(),
        boxes.len()
    );
    Ok(Palette::from_boxes(&boxes))
}

fn log_phase(phase: &str, target: f64, max_iterations: usize, stats: &RefineStats) {
    if stats.hit_cap(target, max_iterations) {
        log::warn!(
            "{phase} phase stopped at iteration cap {max_iterations} with {} of {target} colors",
            stats.colors
        );
    }
    log::debug!(
        "{phase} phase: {} colors after {} iterations (target {target})",
        stats.colors,
        stats.iterations
    );
}

/// Sample an RGBA image and quantize the kept pixels with default settings.
///
/// Every `quality`-th pixel is considered; see [`sampling`] for the filter.
pub fn extract_palette(
    img: ImgRef<'_, RGBA8>,
    color_count: u32,
    quality: usize,
) -> Result<Palette, QuantizeError> {
    let pixels = sampling::sample_image(img, quality)?;
    quantize(&pixels, &QuantizeConfig::new().max_colors(color_count))
}

/// Most representative color of an RGBA image.
pub fn dominant_color(img: ImgRef<'_, RGBA8>, quality: usize) -> Result<RGB8, QuantizeError> {
    extract_palette(img, 5, quality)?
        .dominant()
        .ok_or(QuantizeError::EmptyPixels)
}

fn validate_inputs(pixel_count: usize, config: &QuantizeConfig) -> Result<(), QuantizeError> {
    if pixel_count == 0 {
        return Err(QuantizeError::EmptyPixels);
    }
    if config.max_colors < 2 || config.max_colors > 256 {
        return Err(QuantizeError::InvalidMaxColors(config.max_colors));
    }
    if !(1..=8).contains(&config.significant_bits) {
        return Err(QuantizeError::InvalidSignificantBits(
            config.significant_bits,
        ));
    }
    if config.max_iterations == 0 {
        return Err(QuantizeError::InvalidIterationCap);
    }
    let f = config.population_fraction;
    if !(f > 0.0 && f <= 1.0) {
        return Err(QuantizeError::InvalidPopulationFraction(f));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;

    #[test]
    fn default_config() {
        let c = QuantizeConfig::default();
        assert_eq!(c.max_colors, 256);
        assert_eq!(c.significant_bits, 5);
        assert_eq!(c.max_iterations, 1000);
        assert_eq!(c.population_fraction, 0.75);
    }

    #[test]
    fn builder_overrides() {
        let c = QuantizeConfig::new()
            .max_colors(16)
            .significant_bits(6)
            .max_iterations(50)
            .population_fraction(0.5);
        assert_eq!(c.max_colors, 16);
        assert_eq!(c.significant_bits, 6);
        assert_eq!(c.max_iterations, 50);
        assert_eq!(c.population_fraction, 0.5);
    }

    #[test]
    fn invalid_config_rejected() {
        let px = [RGB8::new(1, 2, 3)];
        let check = |c: QuantizeConfig| quantize(&px, &c);
        assert!(matches!(
            check(QuantizeConfig::new().max_colors(1)),
            Err(QuantizeError::InvalidMaxColors(1))
        ));
        assert!(matches!(
            check(QuantizeConfig::new().max_colors(257)),
            Err(QuantizeError::InvalidMaxColors(257))
        ));
        assert!(matches!(
            check(QuantizeConfig::new().significant_bits(0)),
            Err(QuantizeError::InvalidSignificantBits(0))
        ));
        assert!(matches!(
            check(QuantizeConfig::new().max_iterations(0)),
            Err(QuantizeError::InvalidIterationCap)
        ));
        assert!(matches!(
            check(QuantizeConfig::new().population_fraction(0.0)),
            Err(QuantizeError::InvalidPopulationFraction(_))
        ));
        assert!(matches!(
            check(QuantizeConfig::new().population_fraction(f64::NAN)),
            Err(QuantizeError::InvalidPopulationFraction(_))
        ));
    }

    #[test]
    fn palette_ranked_by_population_volume() {
        let pixels: Vec<RGB8> = (0..=255u8)
            .flat_map(|v| [RGB8::new(v, 255 - v, v / 2), RGB8::new(v / 4, v, 200)])
            .collect();
        let hist = Histogram::from_pixels(&pixels, 5).unwrap();
        let palette = quantize(&pixels, &QuantizeConfig::new().max_colors(12)).unwrap();
        assert!(palette.len() <= 12);
        assert!(palette.len() > 1);
        let total: u64 = palette.swatches().iter().map(|s| s.population).sum();
        assert_eq!(total, hist.total());
        for pair in palette.swatches().windows(2) {
            assert!(
                pair[0].population * pair[0].volume as u64
                    >= pair[1].population * pair[1].volume as u64
            );
        }
    }

    #[test]
    fn full_fraction_skips_second_phase() {
        let pixels: Vec<RGB8> = (0..=255u8).map(|v| RGB8::new(v, v, 255 - v)).collect();
        let config = QuantizeConfig::new().max_colors(4).population_fraction(1.0);
        let palette = quantize(&pixels, &config).unwrap();
        assert_eq!(palette.len(), 4);
    }

    #[test]
    fn dominant_is_first_entry() {
        let mut buf = vec![RGBA8::new(200, 30, 30, 255); 60];
        buf.extend(vec![RGBA8::new(20, 20, 220, 255); 20]);
        let img = imgref::Img::new(&buf[..], 10, 8);
        let palette = extract_palette(img, 5, 1).unwrap();
        assert_eq!(dominant_color(img, 1).unwrap(), palette.colors()[0]);
    }
}
