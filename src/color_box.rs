use core::cell::OnceCell;
use core::cmp::Ordering;
use core::fmt;

use crate::histogram::Histogram;

/// One axis of the reduced RGB cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Red = 0,
    Green = 1,
    Blue = 2,
}

impl Channel {
    #[inline]
    fn idx(self) -> usize {
        self as usize
    }
}

/// An axis-aligned region of the reduced color cube.
///
/// Bounds are inclusive reduced coordinates and never change after creation.
/// Population and average color are computed from the borrowed histogram on
/// first access and cached; [`ColorBox::copy`] starts over with empty caches.
#[derive(Clone)]
pub struct ColorBox<'h> {
    lo: [u8; 3],
    hi: [u8; 3],
    histogram: &'h Histogram,
    count: OnceCell<u64>,
    average: OnceCell<rgb::RGB<u8>>,
}

impl<'h> ColorBox<'h> {
    /// Box with the given inclusive bounds, or `None` if any `lo > hi` or a
    /// bound lies outside the histogram's cube.
    pub fn new(histogram: &'h Histogram, lo: [u8; 3], hi: [u8; 3]) -> Option<Self> {
        let side = histogram.side();
        for ch in 0..3 {
            if lo[ch] > hi[ch] || hi[ch] as usize >= side {
                return None;
            }
        }
        Some(Self::with_bounds(histogram, lo, hi))
    }

    /// Tightest box enclosing every pixel counted by the histogram.
    pub fn enclosing(histogram: &'h Histogram) -> Self {
        let (lo, hi) = histogram.bounds();
        Self::with_bounds(histogram, lo, hi)
    }

    fn with_bounds(histogram: &'h Histogram, lo: [u8; 3], hi: [u8; 3]) -> Self {
        Self {
            lo,
            hi,
            histogram,
            count: OnceCell::new(),
            average: OnceCell::new(),
        }
    }

    /// Same bounds and histogram, caches reset.
    pub fn copy(&self) -> Self {
        Self::with_bounds(self.histogram, self.lo, self.hi)
    }

    /// Copy whose range on `axis` is replaced by `lo..=hi`.
    pub(crate) fn with_range(&self, axis: Channel, lo: u8, hi: u8) -> Self {
        debug_assert!(lo <= hi);
        let mut b = self.copy();
        b.lo[axis.idx()] = lo;
        b.hi[axis.idx()] = hi;
        b
    }

    /// Inclusive lower bounds, `[r1, g1, b1]`.
    pub fn lo(&self) -> [u8; 3] {
        self.lo
    }

    /// Inclusive upper bounds, `[r2, g2, b2]`.
    pub fn hi(&self) -> [u8; 3] {
        self.hi
    }

    /// Inclusive range along one axis.
    pub fn range(&self, axis: Channel) -> (u8, u8) {
        (self.lo[axis.idx()], self.hi[axis.idx()])
    }

    /// Number of cells along one axis.
    pub fn extent(&self, axis: Channel) -> u32 {
        (self.hi[axis.idx()] - self.lo[axis.idx()]) as u32 + 1
    }

    /// Axis with the greatest extent; ties go to red, then green.
    pub fn longest_axis(&self) -> Channel {
        let (r, g, b) = (
            self.extent(Channel::Red),
            self.extent(Channel::Green),
            self.extent(Channel::Blue),
        );
        if r >= g && r >= b {
            Channel::Red
        } else if g >= b {
            Channel::Green
        } else {
            Channel::Blue
        }
    }

    /// Number of cells in the box.
    pub fn volume(&self) -> u32 {
        self.extent(Channel::Red) * self.extent(Channel::Green) * self.extent(Channel::Blue)
    }

    /// Number of pixels inside the box.
    pub fn count(&self) -> u64 {
        *self
            .count
            .get_or_init(|| self.histogram.population(self.lo, self.hi))
    }

    /// Number of pixels in the slab of the box where `axis == coord`.
    pub(crate) fn plane_count(&self, axis: Channel, coord: u8) -> u64 {
        let mut lo = self.lo;
        let mut hi = self.hi;
        lo[axis.idx()] = coord;
        hi[axis.idx()] = coord;
        self.histogram.population(lo, hi)
    }

    /// Population-weighted centroid in full 8-bit units.
    ///
    /// Each cell contributes its midpoint `(coord + 0.5) * cell_width`. An
    /// empty box yields the midpoint of its bounds instead.
    pub fn average_color(&self) -> rgb::RGB<u8> {
        *self.average.get_or_init(|| self.compute_average())
    }

    fn compute_average(&self) -> rgb::RGB<u8> {
        let mult = self.histogram.cell_width() as f64;
        let mut ntot = 0u64;
        let mut sums = [0.0f64; 3];

        for r in self.lo[0]..=self.hi[0] {
            for g in self.lo[1]..=self.hi[1] {
                for b in self.lo[2]..=self.hi[2] {
                    let n = self.histogram.get(r, g, b);
                    if n == 0 {
                        continue;
                    }
                    ntot += n;
                    let h = n as f64;
                    sums[0] += h * (r as f64 + 0.5) * mult;
                    sums[1] += h * (g as f64 + 0.5) * mult;
                    sums[2] += h * (b as f64 + 0.5) * mult;
                }
            }
        }

        if ntot > 0 {
            let n = ntot as f64;
            rgb::RGB {
                r: (sums[0] / n) as u8,
                g: (sums[1] / n) as u8,
                b: (sums[2] / n) as u8,
            }
        } else {
            let mid = |ch: usize| {
                (mult * (self.lo[ch] as f64 + self.hi[ch] as f64 + 1.0) / 2.0) as u8
            };
            rgb::RGB {
                r: mid(0),
                g: mid(1),
                b: mid(2),
            }
        }
    }

    /// Whether the pixel's reduced cell lies inside the box.
    pub fn contains(&self, pixel: rgb::RGB<u8>) -> bool {
        let cell = self.histogram.reduce(pixel);
        (0..3).all(|ch| cell[ch] >= self.lo[ch] && cell[ch] <= self.hi[ch])
    }

    /// `count * volume`, the phase-two priority.
    pub fn weighted_volume(&self) -> u64 {
        self.count() * self.volume() as u64
    }

    /// Ascending by population.
    pub fn cmp_population(a: &Self, b: &Self) -> Ordering {
        a.count().cmp(&b.count())
    }

    /// Ascending by population times volume.
    pub fn cmp_population_volume(a: &Self, b: &Self) -> Ordering {
        a.weighted_volume().cmp(&b.weighted_volume())
    }
}

impl fmt::Display for ColorBox<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{} {}-{} {}-{} count: {} volume: {}",
            self.lo[0],
            self.hi[0],
            self.lo[1],
            self.hi[1],
            self.lo[2],
            self.hi[2],
            self.count(),
            self.volume()
        )
    }
}

impl fmt::Debug for ColorBox<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorBox")
            .field("lo", &self.lo)
            .field("hi", &self.hi)
            .field("count", &self.count.get())
            .finish_non_exhaustive()
    }
}
