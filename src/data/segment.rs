//! Splitting depth-ordered interval tables into contiguous runs.

use crate::domain::DepthInterval;

/// Split `items` into maximal runs where no interval starts more than
/// `max_gap` below the end of its predecessor.
///
/// Split points are exactly the positions violating the bound; overlaps never
/// split. Runs are returned in input order as sub-slices of `items`.
pub fn split_contiguous<T: DepthInterval>(items: &[T], max_gap: f64) -> Vec<&[T]> {
    let mut runs = Vec::new();
    if items.is_empty() {
        return runs;
    }

    let mut start = 0;
    for k in 1..items.len() {
        if items[k].depth_from() - items[k - 1].depth_to() > max_gap {
            runs.push(&items[start..k]);
            start = k;
        }
    }
    runs.push(&items[start..]);
    runs
}
