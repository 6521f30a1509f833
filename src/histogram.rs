extern crate alloc;
use alloc::vec;
use alloc::vec::Vec;

use crate::error::QuantizeError;

/// Default number of significant bits kept per channel.
pub const DEFAULT_SIGBITS: u32 = 5;

/// Dense pixel-count table over the reduced RGB cube.
///
/// Each 8-bit channel keeps its top `sigbits` bits, so the table has
/// `2^(3 * sigbits)` cells addressed as `r << 2S | g << S | b`. Built once per
/// quantization call and only read afterwards; every [`ColorBox`] borrows it.
///
/// [`ColorBox`]: crate::color_box::ColorBox
#[derive(Clone)]
pub struct Histogram {
    bins: Vec<u64>,
    sigbits: u32,
    total: u64,
    /// Reduced-space min/max over all counted pixels, per channel.
    lo: [u8; 3],
    hi: [u8; 3],
}

impl Histogram {
    /// Build a histogram from RGB pixels.
    ///
    /// Fails on an empty pixel sequence or when `sigbits` is outside `1..=8`.
    pub fn from_pixels(pixels: &[rgb::RGB<u8>], sigbits: u32) -> Result<Self, QuantizeError> {
        if !(1..=8).contains(&sigbits) {
            return Err(QuantizeError::InvalidSignificantBits(sigbits));
        }
        if pixels.is_empty() {
            return Err(QuantizeError::EmptyPixels);
        }

        let mut hist = Self {
            bins: vec![0; 1usize << (3 * sigbits)],
            sigbits,
            total: 0,
            lo: [u8::MAX; 3],
            hi: [0; 3],
        };

        for pixel in pixels {
            let cell = hist.reduce(*pixel);
            let index = hist.index(cell[0], cell[1], cell[2]);
            hist.bins[index] += 1;
            hist.total += 1;
            for ch in 0..3 {
                hist.lo[ch] = hist.lo[ch].min(cell[ch]);
                hist.hi[ch] = hist.hi[ch].max(cell[ch]);
            }
        }

        Ok(hist)
    }

    /// Right shift that maps an 8-bit channel onto the reduced axis.
    pub fn shift(&self) -> u32 {
        8 - self.sigbits
    }

    /// Width of one reduced cell in full 8-bit channel units.
    pub fn cell_width(&self) -> u32 {
        1 << self.shift()
    }

    /// Number of cells along each axis of the reduced cube.
    pub fn side(&self) -> usize {
        1 << self.sigbits
    }

    /// Number of pixels counted.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Reduced-space bounds (`lo`, `hi`) enclosing every counted pixel.
    pub fn bounds(&self) -> ([u8; 3], [u8; 3]) {
        (self.lo, self.hi)
    }

    /// Reduce a full-range pixel to its cell coordinates.
    pub fn reduce(&self, pixel: rgb::RGB<u8>) -> [u8; 3] {
        let shift = self.shift();
        [pixel.r >> shift, pixel.g >> shift, pixel.b >> shift]
    }

    /// Flat index of a reduced cell.
    #[inline]
    pub fn index(&self, r: u8, g: u8, b: u8) -> usize {
        ((r as usize) << (2 * self.sigbits)) | ((g as usize) << self.sigbits) | b as usize
    }

    /// Pixel count of a single reduced cell.
    #[inline]
    pub fn get(&self, r: u8, g: u8, b: u8) -> u64 {
        self.bins[self.index(r, g, b)]
    }

    /// Sum of the counts of every cell within the inclusive bounds.
    pub fn population(&self, lo: [u8; 3], hi: [u8; 3]) -> u64 {
        let mut sum = 0u64;
        for r in lo[0]..=hi[0] {
            for g in lo[1]..=hi[1] {
                for b in lo[2]..=hi[2] {
                    sum += self.get(r, g, b);
                }
            }
        }
        sum
    }
}

impl core::fmt::Debug for Histogram {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Histogram")
            .field("sigbits", &self.sigbits)
            .field("total", &self.total)
            .field("lo", &self.lo)
            .field("hi", &self.hi)
            .finish_non_exhaustive()
    }
}
