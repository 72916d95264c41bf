//! Quick Sort
//!
//! Lomuto partitioning with the last element of the active range as pivot
//! (no randomization, so sorted input degrades to O(n²) comparisons).
//! Elements `<=` pivot are moved left of a running boundary and the pivot
//! is swapped onto the boundary once the scan finishes.
//!
//! Both sides of every pivot are sorted, but only the smaller side is a
//! recursive call; the larger side is handled by looping. Recursion depth
//! therefore stays O(log n) even when the comparison count does not.
//!
//! One step = one comparison during the partition scan.

use std::cmp::Ordering;

use crate::sort_context::SortContext;

pub fn quick_sort(ctx: &mut SortContext<'_>) {
    let n = ctx.len();
    if n > 1 {
        sort_range(ctx, 0, n - 1, 1);
    }
}

/// Sort the inclusive range `start..=end`.
fn sort_range(ctx: &mut SortContext<'_>, mut start: usize, mut end: usize, depth: u32) {
    ctx.enter(depth);

    while start < end {
        let pivot = partition(ctx, start, end);
        let left_len = pivot - start;
        let right_len = end - pivot;

        if left_len < right_len {
            if left_len > 1 {
                sort_range(ctx, start, pivot - 1, depth + 1);
            }
            start = pivot + 1;
        } else {
            if right_len > 1 {
                sort_range(ctx, pivot + 1, end, depth + 1);
            }
            // left_len >= 1 here, so pivot > start
            end = pivot - 1;
        }
    }
}

/// Partition `start..=end` around `array[end]` and return the pivot's
/// final index.
fn partition(ctx: &mut SortContext<'_>, start: usize, end: usize) -> usize {
    let mut boundary = start;
    for j in start..end {
        if ctx.compare(j, end) != Ordering::Greater {
            ctx.swap(boundary, j);
            boundary += 1;
        }
        ctx.step();
    }
    ctx.swap(boundary, end);
    boundary
}
