//! Algorithm Registry
//!
//! Maps algorithm ids (the `-t` argument) to sort implementations. The
//! engine only ever looks algorithms up here, so adding a sort means one
//! more `register` call and nothing else.

use std::collections::HashMap;

use crate::bubble_sort::bubble;
use crate::error::EngineError;
use crate::quick_sort::quick_sort;
use crate::selection_sort::{selection, selection_recursive};
use crate::sort_context::SortFn;

/// A registered sort.
#[derive(Debug, Clone)]
pub struct Algorithm {
    /// Human-readable name shown while the algorithm runs
    pub display_name: String,
    pub sort: SortFn,
}

impl Algorithm {
    pub fn new(display_name: impl Into<String>, sort: SortFn) -> Self {
        Self {
            display_name: display_name.into(),
            sort,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AlgorithmRegistry {
    algorithms: HashMap<String, Algorithm>,
}

impl AlgorithmRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the four built-in sorts.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("selection", Algorithm::new("Selection Sort", selection));
        registry.register(
            "selection_recursive",
            Algorithm::new("Recursive Selection Sort", selection_recursive),
        );
        registry.register("bubble", Algorithm::new("Bubble Sort", bubble));
        registry.register("quick_sort", Algorithm::new("Quick Sort", quick_sort));
        registry
    }

    /// Add an algorithm, replacing any previous one with the same id.
    pub fn register(&mut self, name: impl Into<String>, algorithm: Algorithm) {
        self.algorithms.insert(name.into(), algorithm);
    }

    pub fn lookup(&self, name: &str) -> Result<&Algorithm, EngineError> {
        self.algorithms
            .get(name)
            .ok_or_else(|| EngineError::UnknownAlgorithm {
                name: name.to_string(),
                available: self.names(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.algorithms.contains_key(name)
    }

    /// Registered ids, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.algorithms.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.algorithms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.algorithms.is_empty()
    }
}
