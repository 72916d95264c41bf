//! Bubble Sort
//!
//! N full passes of N-1 adjacent comparisons, swapping when left > right.
//! There is no early exit when a pass makes no swaps, so the comparison
//! count is always N(N-1) regardless of input order.
//!
//! One step = one full inner pass.

use crate::sort_context::SortContext;

pub fn bubble(ctx: &mut SortContext<'_>) {
    let n = ctx.len();
    for _ in 0..n {
        for j in 0..n.saturating_sub(1) {
            if ctx.greater(j, j + 1) {
                ctx.swap(j, j + 1);
            }
        }
        ctx.step();
    }
}
