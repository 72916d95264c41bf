//! Shared Sort Array
//!
//! The array the engine's worker sorts while renderers read it. Each
//! comparison and each swap holds the lock only for that one operation,
//! and `snapshot` copies the whole array under the same lock, so a reader
//! can never observe half of a swap.

use std::cmp::Ordering;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::sort_context::ArrayStore;

#[derive(Debug, Clone, Default)]
pub struct SharedArray {
    inner: Arc<RwLock<Vec<u32>>>,
}

impl SharedArray {
    pub fn new(values: Vec<u32>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(values)),
        }
    }

    /// Swap in a new array (start of a run).
    pub fn replace(&self, values: Vec<u32>) {
        *self.inner.write() = values;
    }

    /// Consistent copy of the current contents.
    pub fn snapshot(&self) -> Vec<u32> {
        self.inner.read().clone()
    }
}

impl ArrayStore for SharedArray {
    fn len(&self) -> usize {
        self.inner.read().len()
    }

    fn compare(&self, a: usize, b: usize) -> Ordering {
        let values = self.inner.read();
        values[a].cmp(&values[b])
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.inner.write().swap(a, b);
    }
}
