extern crate alloc;
use alloc::vec::Vec;

use crate::color_box::ColorBox;

/// Outcome of a median cut on one box.
#[derive(Debug)]
pub enum Cut<'h> {
    /// The box cannot be divided further; carries a fresh copy of it.
    Whole(ColorBox<'h>),
    /// Two siblings partitioning the parent along its longest axis.
    Pair(ColorBox<'h>, ColorBox<'h>),
}

impl<'h> Cut<'h> {
    /// First child, plus the second one if the box was divided.
    pub fn into_children(self) -> (ColorBox<'h>, Option<ColorBox<'h>>) {
        match self {
            Cut::Whole(b) => (b, None),
            Cut::Pair(a, b) => (a, Some(b)),
        }
    }
}

/// Split a box along its longest axis at a population-balanced coordinate.
///
/// Boxes holding a single pixel, or spanning a single reduced cell, come back
/// as [`Cut::Whole`]. Returns `None` when no coordinate carries more than half
/// the population, which only happens for an empty box.
pub fn median_cut<'h>(vbox: &ColorBox<'h>) -> Option<Cut<'h>> {
    if vbox.count() == 1 || vbox.volume() == 1 {
        return Some(Cut::Whole(vbox.copy()));
    }

    let axis = vbox.longest_axis();
    let (axis_lo, axis_hi) = vbox.range(axis);

    // partial[k]: population at coordinates axis_lo..=axis_lo + k
    let mut partial: Vec<u64> = Vec::with_capacity((axis_hi - axis_lo) as usize + 1);
    let mut total = 0u64;
    for coord in axis_lo..=axis_hi {
        total += vbox.plane_count(axis, coord);
        partial.push(total);
    }

    // p > total / 2 on integers matches the real-valued comparison
    let half = total / 2;
    let cut = partial.iter().position(|&p| p > half)?;

    let lo = axis_lo as i32;
    let hi = axis_hi as i32;
    let i = lo + cut as i32;
    let left = i - lo;
    let right = hi - i;

    // Lean the cut into the roomier side.
    let mut d2 = if left <= right {
        (hi - 1).min(i + right / 2)
    } else {
        // trunc(i - 1 - left / 2.0), clamped at lo
        lo.max(i - 1 - (left + 1) / 2)
    };

    let at = |c: i32| partial[(c - lo) as usize];

    while d2 < hi - 1 && at(d2) == 0 {
        d2 += 1;
    }
    while total - at(d2) == 0 && d2 > lo && at(d2 - 1) != 0 {
        d2 -= 1;
    }

    let first = vbox.with_range(axis, axis_lo, d2 as u8);
    let second = vbox.with_range(axis, d2 as u8 + 1, axis_hi);

    log::trace!("median cut {vbox} on {axis:?} at {d2}");

    Some(Cut::Pair(first, second))
}
