extern crate alloc;
use alloc::vec::Vec;

use crate::color_box::ColorBox;

/// One palette entry together with the box it was averaged from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    /// Population-weighted average color of the box.
    pub color: rgb::RGB<u8>,
    /// Number of pixels that fell inside the box.
    pub population: u64,
    /// Number of reduced cells the box spans.
    pub volume: u32,
}

impl Swatch {
    fn from_box(vbox: &ColorBox<'_>) -> Self {
        Self {
            color: vbox.average_color(),
            population: vbox.count(),
            volume: vbox.volume(),
        }
    }

    /// The color as an `[r, g, b]` triple.
    pub fn rgb(&self) -> [u8; 3] {
        [self.color.r, self.color.g, self.color.b]
    }
}

/// Ordered palette produced by median-cut quantization.
///
/// Entries follow the final box ranking, highest `population * volume`
/// first, so the first entry is the dominant color.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    swatches: Vec<Swatch>,
}

impl Palette {
    /// Build a palette from boxes already in rank order.
    pub(crate) fn from_boxes(boxes: &[ColorBox<'_>]) -> Self {
        Self {
            swatches: boxes.iter().map(Swatch::from_box).collect(),
        }
    }

    /// Palette colors in rank order.
    pub fn colors(&self) -> Vec<rgb::RGB<u8>> {
        self.swatches.iter().map(|s| s.color).collect()
    }

    /// Palette colors as `[r, g, b]` triples, in rank order.
    pub fn entries(&self) -> Vec<[u8; 3]> {
        self.swatches.iter().map(Swatch::rgb).collect()
    }

    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    /// First palette entry, if any.
    pub fn dominant(&self) -> Option<rgb::RGB<u8>> {
        self.swatches.first().map(|s| s.color)
    }

    pub fn len(&self) -> usize {
        self.swatches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.swatches.is_empty()
    }
}

impl IntoIterator for Palette {
    type Item = Swatch;
    type IntoIter = alloc::vec::IntoIter<Swatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.swatches.into_iter()
    }
}
