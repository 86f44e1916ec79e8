//! Graph topology analysis algorithms
//!
//! Neighborhood overlap measures on undirected views.

use super::common::GraphView;
use std::cmp::Ordering;

/// Number of nodes adjacent to both `u` and `v` (by index).
///
/// Relies on the sorted neighbor slices of [`GraphView`], so the cost is
/// `O(deg(u) + deg(v))`. For directed views only successors are compared.
pub fn common_neighbor_count(view: &GraphView, u: usize, v: usize) -> usize {
    let a = view.successors(u);
    let b = view.successors(v);
    let (mut i, mut j, mut count) = (0, 0, 0);

    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                count += 1;
                i += 1;
                j += 1;
            }
        }
    }

    count
}
