//! Selection Sort
//!
//! Two renditions of the same algorithm: a plain nested loop and a
//! self-recursive one over the unsorted suffix. Both scan `i+1..N` for the
//! minimum with a strict `<` (first minimum wins) and swap it into place,
//! so both perform exactly N(N-1)/2 comparisons and produce identical
//! output for identical input.
//!
//! One step = one outer iteration (one element placed).

use crate::sort_context::SortContext;

/// Frames a single recursion chain may use before it unwinds and resumes.
///
/// The recursive form needs one frame per element. Chains are capped at
/// this depth so stack use stays bounded for any array length.
pub const MAX_RECURSION_DEPTH: u32 = 1024;

/// Iterative selection sort.
pub fn selection(ctx: &mut SortContext<'_>) {
    let n = ctx.len();
    for i in 0..n {
        let minimum = find_minimum(ctx, i);
        ctx.swap(i, minimum);
        ctx.step();
    }
}

/// Recursive selection sort.
///
/// `sort_suffix` places the minimum of `i..N` at `i` and recurses on `i+1`.
/// When a chain reaches `MAX_RECURSION_DEPTH` it returns the index it
/// stopped at and the loop here starts a fresh chain from there.
pub fn selection_recursive(ctx: &mut SortContext<'_>) {
    let mut resume = Some(0);
    while let Some(start) = resume {
        resume = sort_suffix(ctx, start, 1);
    }
}

fn sort_suffix(ctx: &mut SortContext<'_>, i: usize, depth: u32) -> Option<usize> {
    if i >= ctx.len() {
        return None;
    }
    if depth > MAX_RECURSION_DEPTH {
        return Some(i);
    }
    ctx.enter(depth);

    let minimum = find_minimum(ctx, i);
    ctx.swap(i, minimum);
    ctx.step();

    sort_suffix(ctx, i + 1, depth + 1)
}

/// Index of the smallest element in `start..N`.
fn find_minimum(ctx: &mut SortContext<'_>, start: usize) -> usize {
    let mut minimum = start;
    for search in (start + 1)..ctx.len() {
        if ctx.less(search, minimum) {
            minimum = search;
        }
    }
    minimum
}
