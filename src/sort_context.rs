//! Instrumented Array Access
//!
//! Sort implementations never touch storage directly. They drive a
//! `SortContext`, which forwards every comparison and swap to an
//! `ArrayStore` and keeps the `Profile` counters. `step()` marks the end of
//! one unit of work and is the only place a sort may block.
//!
//! Two stores exist:
//! - `SliceStore`, a borrowed slice for direct use and tests
//! - `SharedArray`, which the engine uses so readers can take tear-free
//!   snapshots while the sort is running

use std::cmp::Ordering;
use std::thread;
use std::time::{Duration, Instant};

use crate::profile::Profile;

/// Storage a sort can operate on.
pub trait ArrayStore {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Compare the elements at two indices.
    fn compare(&self, a: usize, b: usize) -> Ordering;

    /// Swap the elements at two indices.
    fn swap(&mut self, a: usize, b: usize);
}

/// A borrowed slice as an `ArrayStore`.
pub struct SliceStore<'a>(pub &'a mut [u32]);

impl ArrayStore for SliceStore<'_> {
    fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    fn compare(&self, a: usize, b: usize) -> Ordering {
        self.0[a].cmp(&self.0[b])
    }

    #[inline]
    fn swap(&mut self, a: usize, b: usize) {
        self.0.swap(a, b);
    }
}

/// A sort implementation. Sorts the context's array in place, ascending.
pub type SortFn = fn(&mut SortContext<'_>);

/// Counting, pacing view over an `ArrayStore`.
pub struct SortContext<'a> {
    store: &'a mut dyn ArrayStore,
    step_delay: Duration,
    profile: Profile,
}

impl<'a> SortContext<'a> {
    pub fn new(store: &'a mut dyn ArrayStore, step_delay: Duration) -> Self {
        Self {
            store,
            step_delay,
            profile: Profile::default(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    #[inline]
    pub fn compare(&mut self, a: usize, b: usize) -> Ordering {
        self.profile.comparisons += 1;
        self.store.compare(a, b)
    }

    /// `array[a] < array[b]`
    #[inline]
    pub fn less(&mut self, a: usize, b: usize) -> bool {
        self.compare(a, b) == Ordering::Less
    }

    /// `array[a] > array[b]`
    #[inline]
    pub fn greater(&mut self, a: usize, b: usize) -> bool {
        self.compare(a, b) == Ordering::Greater
    }

    #[inline]
    pub fn swap(&mut self, a: usize, b: usize) {
        self.profile.swaps += 1;
        self.store.swap(a, b);
    }

    /// End of one unit of work. Sleeps for the step delay, if any.
    pub fn step(&mut self) {
        self.profile.steps += 1;
        if !self.step_delay.is_zero() {
            let started = Instant::now();
            thread::sleep(self.step_delay);
            self.profile.sleep += started.elapsed();
        }
    }

    /// Record a recursive call at the given depth (root call is depth 1).
    #[inline]
    pub fn enter(&mut self, depth: u32) {
        self.profile.calls += 1;
        self.profile.max_depth = self.profile.max_depth.max(depth);
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn into_profile(self) -> Profile {
        self.profile
    }
}

/// Run `sort` over a plain slice with no step delay.
pub fn sort_slice(sort: SortFn, data: &mut [u32]) -> Profile {
    let mut store = SliceStore(data);
    let mut ctx = SortContext::new(&mut store, Duration::ZERO);
    sort(&mut ctx);
    ctx.into_profile()
}
