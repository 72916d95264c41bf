//! Sorting Algorithm Visualizer
//!
//! A sort engine that runs classic comparison sorts on a background worker
//! while a renderer polls tear-free snapshots of the array:
//! - **Selection Sort**: O(n²), iterative and recursive forms
//! - **Bubble Sort**: O(n²), always N full passes
//! - **Quick Sort**: O(n log n) average, Lomuto partition, last-element pivot
//!
//! The sorts only see a `SortContext`, so they stay free of timing,
//! threading and rendering concerns.

pub mod bubble_sort;
pub mod cli;
pub mod engine;
pub mod error;
pub mod lino_report;
pub mod profile;
pub mod quick_sort;
pub mod registry;
pub mod render;
pub mod selection_sort;
pub mod shared_array;
pub mod sort_context;
pub mod verify;

pub use engine::{EngineConfig, RunRecord, Snapshot, SortEngine};
pub use error::{AlgorithmFault, ConfigError, EngineError};
pub use registry::{Algorithm, AlgorithmRegistry};
pub use sort_context::{sort_slice, ArrayStore, SortContext, SortFn};
