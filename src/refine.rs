extern crate alloc;
use alloc::string::ToString;
use alloc::vec::Vec;

use crate::color_box::ColorBox;
use crate::error::QuantizeError;
use crate::median_cut::{Cut, median_cut};
use crate::worklist::RankedWorklist;

/// Default cap on refinement iterations per pass.
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// What a refinement pass reached before stopping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefineStats {
    /// Running color count when the pass stopped.
    pub colors: usize,
    /// Boxes popped, including ones pushed back unchanged.
    pub iterations: usize,
}

impl RefineStats {
    /// Whether the pass stopped on the cap rather than on the target.
    pub fn hit_cap(&self, target: f64, max_iterations: usize) -> bool {
        self.iterations >= max_iterations && (self.colors as f64) < target
    }
}

/// Split the highest-ranked boxes until `colors` reaches `target`.
///
/// `colors` seeds the running count; each successful split adds one. Empty
/// boxes go back into the worklist as they are. Populated boxes that cannot
/// be divided are held out of the ranking for the rest of the pass and
/// returned to the worklist when it ends. At most `max_iterations` boxes are
/// popped.
pub fn refine<'h>(
    worklist: &mut RankedWorklist<ColorBox<'h>>,
    colors: usize,
    target: f64,
    max_iterations: usize,
) -> Result<RefineStats, QuantizeError> {
    let mut settled = Vec::new();
    let result = split_until(worklist, &mut settled, colors, target, max_iterations);
    worklist.extend(settled);
    result
}

fn split_until<'h>(
    worklist: &mut RankedWorklist<ColorBox<'h>>,
    settled: &mut Vec<ColorBox<'h>>,
    mut colors: usize,
    target: f64,
    max_iterations: usize,
) -> Result<RefineStats, QuantizeError> {
    let mut iterations = 0;

    while (colors as f64) < target && iterations < max_iterations {
        let Some(vbox) = worklist.pop() else {
            break;
        };
        iterations += 1;

        if vbox.count() == 0 {
            worklist.push(vbox);
            continue;
        }

        let Some(cut) = median_cut(&vbox) else {
            log::error!("median cut failed on populated box {vbox}");
            return Err(QuantizeError::NoCutPoint {
                bounds: vbox.to_string(),
            });
        };

        match cut {
            Cut::Whole(b) => settled.push(b),
            Cut::Pair(a, b) => {
                worklist.push(a);
                worklist.push(b);
                colors += 1;
            }
        }
    }

    Ok(RefineStats { colors, iterations })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::Histogram;
    use alloc::vec;

    fn px(r: u8, g: u8, b: u8) -> rgb::RGB<u8> {
        rgb::RGB { r, g, b }
    }

    fn gradient() -> Vec<rgb::RGB<u8>> {
        (0..=255u8)
            .flat_map(|v| [px(v, 255 - v, v / 3), px(v / 2, v, 255 - v)])
            .collect()
    }

    fn seeded(hist: &Histogram) -> RankedWorklist<ColorBox<'_>> {
        let mut wl = RankedWorklist::new(ColorBox::cmp_population);
        wl.push(ColorBox::enclosing(hist));
        wl
    }

    #[test]
    fn stops_at_fractional_target() {
        let pixels = gradient();
        let hist = Histogram::from_pixels(&pixels, 5).unwrap();

        // 0.75 * 2 = 1.5: one split reaches it
        let mut wl = seeded(&hist);
        let stats = refine(&mut wl, 1, 1.5, DEFAULT_MAX_ITERATIONS).unwrap();
        assert_eq!(stats.colors, 2);
        assert_eq!(wl.len(), 2);

        // 0.75 * 3 = 2.25: needs a third box
        let mut wl = seeded(&hist);
        let stats = refine(&mut wl, 1, 2.25, DEFAULT_MAX_ITERATIONS).unwrap();
        assert_eq!(stats.colors, 3);
        assert_eq!(wl.len(), 3);
    }

    #[test]
    fn target_already_met_does_nothing() {
        let pixels = gradient();
        let hist = Histogram::from_pixels(&pixels, 5).unwrap();
        let mut wl = seeded(&hist);
        let stats = refine(&mut wl, 0, 0.0, DEFAULT_MAX_ITERATIONS).unwrap();
        assert_eq!(stats.iterations, 0);
        assert_eq!(wl.len(), 1);
    }

    #[test]
    fn unsplittable_boxes_end_the_pass() {
        // Two distinct cells can yield at most two boxes with pixels
        let pixels = [px(0, 0, 0), px(255, 255, 255)];
        let hist = Histogram::from_pixels(&pixels, 5).unwrap();
        let mut wl = seeded(&hist);
        let stats = refine(&mut wl, 1, 200.0, 50).unwrap();
        // one split, then each single-pixel child is set aside once
        assert_eq!(stats.iterations, 3);
        assert_eq!(stats.colors, 2);
        assert!(!stats.hit_cap(200.0, 50));
        assert_eq!(wl.len(), 2);
    }

    #[test]
    fn single_cell_is_set_aside() {
        let pixels = [px(9, 9, 9); 30];
        let hist = Histogram::from_pixels(&pixels, 5).unwrap();
        let mut wl = seeded(&hist);
        let stats = refine(&mut wl, 1, 8.0, DEFAULT_MAX_ITERATIONS).unwrap();
        assert_eq!(stats.colors, 1);
        assert_eq!(stats.iterations, 1);
        assert_eq!(wl.len(), 1);
        assert_eq!(wl.pop().unwrap().count(), 30);
    }

    #[test]
    fn large_single_cell_does_not_starve_others() {
        // The flat cell outranks everything by population but never splits
        let mut pixels = vec![px(128, 128, 128); 5000];
        for c in [2u8, 7, 21, 28] {
            pixels.extend(vec![px(c * 8, c * 8, c * 8); 10]);
        }
        let hist = Histogram::from_pixels(&pixels, 5).unwrap();
        let mut wl = seeded(&hist);
        refine(&mut wl, 1, 40.0, DEFAULT_MAX_ITERATIONS).unwrap();

        let mut counts: Vec<u64> = wl
            .into_ranked()
            .iter()
            .map(|b| b.count())
            .filter(|&n| n > 0)
            .collect();
        counts.sort_unstable();
        assert_eq!(counts, vec![10, 10, 10, 10, 5000]);
    }

    #[test]
    fn empty_boxes_spin_until_cap() {
        let hist = Histogram::from_pixels(&[px(255, 255, 255)], 5).unwrap();
        let mut wl = RankedWorklist::new(ColorBox::cmp_population_volume);
        wl.push(ColorBox::new(&hist, [0; 3], [3; 3]).unwrap());
        let stats = refine(&mut wl, 1, 5.0, 20).unwrap();
        assert_eq!(stats, RefineStats { colors: 1, iterations: 20 });
        assert!(stats.hit_cap(5.0, 20));
        assert_eq!(wl.len(), 1);
        let vbox = wl.pop().unwrap();
        assert_eq!((vbox.lo(), vbox.hi()), ([0; 3], [3; 3]));
        assert_eq!(vbox.count(), 0);
    }

    #[test]
    fn empty_box_kept_beside_splits() {
        let pixels = [px(0, 0, 0), px(255, 0, 0)];
        let hist = Histogram::from_pixels(&pixels, 5).unwrap();
        let mut wl = RankedWorklist::new(ColorBox::cmp_population_volume);
        wl.push(ColorBox::new(&hist, [0, 8, 8], [3, 12, 12]).unwrap());
        wl.push(ColorBox::enclosing(&hist));
        let stats = refine(&mut wl, 1, 10.0, 30).unwrap();
        // one split, two set-asides, then the empty box until the cap
        assert_eq!(stats, RefineStats { colors: 2, iterations: 30 });
        let boxes = wl.into_ranked();
        assert_eq!(boxes.len(), 3);
        assert_eq!(boxes.iter().filter(|b| b.count() == 0).count(), 1);
        assert_eq!(boxes.iter().map(|b| b.count()).sum::<u64>(), 2);
    }

    #[test]
    fn population_is_conserved() {
        let pixels = gradient();
        let hist = Histogram::from_pixels(&pixels, 5).unwrap();
        let mut wl = seeded(&hist);
        refine(&mut wl, 1, 24.0, DEFAULT_MAX_ITERATIONS).unwrap();
        let boxes = wl.into_ranked();
        let total: u64 = boxes.iter().map(|b| b.count()).sum();
        assert_eq!(total, pixels.len() as u64);
    }
}
