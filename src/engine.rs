//! Sort Execution Engine
//!
//! Runs a registered algorithm `repeats` times on a background worker
//! thread, each time on a fresh random permutation of `1..=N`, and
//! publishes live state for any number of readers.
//!
//! ## Ownership
//!
//! ```text
//!   SortEngine ──start()──► sort-worker thread
//!       │                        │ swaps via SortContext<SharedArray>
//!       │                        ▼
//!       └──snapshot()──► Arc<EngineShared> { Mutex<EngineStatus>, SharedArray }
//! ```
//!
//! Only the worker mutates the shared state. Readers get copies from
//! `snapshot()`. Lock order is always status, then array.
//!
//! ## Faults
//!
//! Each run executes under `catch_unwind`. A panicking sort ends the
//! remaining repeats, is recorded as an `AlgorithmFault` and returned from
//! `join()`. `running` is reset by a drop guard on every exit path.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, error, info, warn};

use crate::error::{AlgorithmFault, ConfigError, EngineError};
use crate::profile::Profile;
use crate::registry::{Algorithm, AlgorithmRegistry};
use crate::shared_array::SharedArray;
use crate::sort_context::SortContext;
use crate::verify::is_sorted_permutation;

pub const DEFAULT_ARRAY_LENGTH: usize = 5000;
pub const DEFAULT_REPEATS: usize = 3;

/// Placeholder display name before the first run starts
const IDLE_DISPLAY_NAME: &str = "Algorithm";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Elements per run; values are a permutation of `1..=array_length`
    pub array_length: usize,
    /// Runs per `start`
    pub repeats: usize,
    /// Pause after each unit of sorting work
    pub step_delay: Duration,
    /// Emit a profile for every run
    pub debug: bool,
    /// Seed for permutation generation; entropy when `None`
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            array_length: DEFAULT_ARRAY_LENGTH,
            repeats: DEFAULT_REPEATS,
            step_delay: Duration::ZERO,
            debug: false,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repeats < 1 {
            return Err(ConfigError::InvalidConfiguration(
                "repeat count must be at least 1".to_string(),
            ));
        }
        if self.array_length > u32::MAX as usize {
            return Err(ConfigError::InvalidConfiguration(format!(
                "array length {} exceeds {}",
                self.array_length,
                u32::MAX
            )));
        }
        Ok(())
    }
}

/// One completed run.
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub algorithm: String,
    pub display_name: String,
    pub array_length: usize,
    pub elapsed: Duration,
    /// Final array was exactly `1..=N`
    pub verified: bool,
    pub profile: Profile,
}

impl RunRecord {
    pub fn seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

/// Tear-free copy of engine state for renderers.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub array: Vec<u32>,
    pub display_name: String,
    /// Time since the current (or most recent) run started
    pub elapsed: Duration,
    pub running: bool,
    pub history: Vec<RunRecord>,
    pub fault: Option<AlgorithmFault>,
}

impl Snapshot {
    /// Run durations in seconds, in completion order.
    pub fn durations(&self) -> Vec<f64> {
        self.history.iter().map(RunRecord::seconds).collect()
    }

    pub fn mean_duration(&self) -> Option<f64> {
        if self.history.is_empty() {
            return None;
        }
        Some(self.durations().iter().sum::<f64>() / self.history.len() as f64)
    }
}

struct EngineStatus {
    display_name: String,
    running: bool,
    start_time: Instant,
    history: Vec<RunRecord>,
    fault: Option<AlgorithmFault>,
}

struct EngineShared {
    status: Mutex<EngineStatus>,
    array: SharedArray,
}

pub struct SortEngine {
    registry: Arc<AlgorithmRegistry>,
    config: EngineConfig,
    shared: Arc<EngineShared>,
    worker: Option<JoinHandle<()>>,
}

impl SortEngine {
    /// Create an engine with the default configuration
    pub fn new(registry: AlgorithmRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            config: EngineConfig::default(),
            shared: Arc::new(EngineShared {
                status: Mutex::new(EngineStatus {
                    display_name: IDLE_DISPLAY_NAME.to_string(),
                    running: false,
                    start_time: Instant::now(),
                    history: Vec::new(),
                    fault: None,
                }),
                array: SharedArray::default(),
            }),
            worker: None,
        }
    }

    pub fn with_config(
        registry: AlgorithmRegistry,
        config: EngineConfig,
    ) -> Result<Self, ConfigError> {
        let mut engine = Self::new(registry);
        engine.configure(config)?;
        Ok(engine)
    }

    /// Replace the configuration used by the next `start`.
    pub fn configure(&mut self, config: EngineConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &AlgorithmRegistry {
        &self.registry
    }

    /// Look up `name` and launch the worker.
    ///
    /// The first permutation is published before this returns, so readers
    /// always see a full array.
    pub fn start(&mut self, name: &str) -> Result<(), EngineError> {
        if !self.is_finished() {
            return Err(EngineError::Busy);
        }
        if let Some(previous) = self.worker.take() {
            // already finished; a caught fault is still in the status
            if let Err(payload) = previous.join() {
                error!(
                    error = %panic_message(payload.as_ref()),
                    "Previous sort worker panicked outside a run"
                );
            }
        }

        let algorithm = self.registry.lookup(name)?.clone();
        let config = self.config.clone();
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let first = permutation(config.array_length, &mut rng);
        {
            let mut status = self.shared.status.lock();
            status.fault = None;
            self.shared.array.replace(first);
        }

        info!(
            algorithm = name,
            length = config.array_length,
            repeats = config.repeats,
            delay_ms = config.step_delay.as_secs_f64() * 1000.0,
            "Starting sort worker"
        );

        let shared = Arc::clone(&self.shared);
        let id = name.to_string();
        let handle = thread::Builder::new()
            .name("sort-worker".to_string())
            .spawn(move || run_worker(&shared, &id, &algorithm, &config, &mut rng))?;
        self.worker = Some(handle);
        Ok(())
    }

    /// Time since the current (or most recent) run started.
    pub fn current_elapsed(&self) -> Duration {
        self.shared.status.lock().start_time.elapsed()
    }

    pub fn snapshot(&self) -> Snapshot {
        let status = self.shared.status.lock();
        Snapshot {
            array: self.shared.array.snapshot(),
            display_name: status.display_name.clone(),
            elapsed: status.start_time.elapsed(),
            running: status.running,
            history: status.history.clone(),
            fault: status.fault.clone(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.shared.status.lock().running
    }

    pub fn history(&self) -> Vec<RunRecord> {
        self.shared.status.lock().history.clone()
    }

    /// True when no worker is alive.
    pub fn is_finished(&self) -> bool {
        self.worker.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the worker to finish all repeats.
    pub fn join(&mut self) -> Result<(), EngineError> {
        if let Some(handle) = self.worker.take() {
            if let Err(payload) = handle.join() {
                return Err(AlgorithmFault {
                    algorithm: self.shared.status.lock().display_name.clone(),
                    repeat: 0,
                    message: panic_message(payload.as_ref()),
                }
                .into());
            }
        }
        self.fault()
    }

    /// The fault recorded by the most recent start, if any.
    ///
    /// Does not wait for the worker, so a renderer that quits early can
    /// still report a fault the same way `join()` does.
    pub fn fault(&self) -> Result<(), EngineError> {
        match self.shared.status.lock().fault.clone() {
            Some(fault) => Err(fault.into()),
            None => Ok(()),
        }
    }
}

/// Fresh random permutation of `1..=len`.
pub fn permutation<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<u32> {
    let mut values: Vec<u32> = (1..=len as u32).collect();
    values.shuffle(rng);
    values
}

/// Clears `running` unless the run was settled explicitly.
struct RunGuard<'a> {
    shared: &'a EngineShared,
    armed: bool,
}

impl<'a> RunGuard<'a> {
    /// Mark a run as started.
    fn begin(shared: &'a EngineShared, display_name: &str) -> Self {
        let mut status = shared.status.lock();
        status.display_name = display_name.to_string();
        status.start_time = Instant::now();
        status.running = true;
        Self {
            shared,
            armed: true,
        }
    }

    fn complete(mut self, record: RunRecord) {
        self.armed = false;
        let mut status = self.shared.status.lock();
        status.history.push(record);
        status.running = false;
    }

    fn fail(mut self, fault: AlgorithmFault) {
        self.armed = false;
        let mut status = self.shared.status.lock();
        status.fault = Some(fault);
        status.running = false;
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.shared.status.lock().running = false;
        }
    }
}

fn run_worker(
    shared: &EngineShared,
    id: &str,
    algorithm: &Algorithm,
    config: &EngineConfig,
    rng: &mut StdRng,
) {
    for repeat in 1..=config.repeats {
        if repeat > 1 {
            let values = permutation(config.array_length, rng);
            let _status = shared.status.lock();
            shared.array.replace(values);
        }
        debug!(repeat, length = config.array_length, "Generated permutation");

        let guard = RunGuard::begin(shared, &algorithm.display_name);
        let mut array = shared.array.clone();
        let started = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut ctx = SortContext::new(&mut array, config.step_delay);
            (algorithm.sort)(&mut ctx);
            ctx.into_profile()
        }));
        let elapsed = started.elapsed();

        match outcome {
            Ok(mut profile) => {
                profile.elapsed = elapsed;
                let verified = is_sorted_permutation(&shared.array.snapshot());
                if verified {
                    info!(
                        algorithm = id,
                        repeat,
                        elapsed_ms = elapsed.as_secs_f64() * 1000.0,
                        "Run finished"
                    );
                } else {
                    warn!(algorithm = id, repeat, "Run finished but the array is not sorted");
                }
                if config.debug {
                    emit_profile(id, repeat, &profile);
                }
                guard.complete(RunRecord {
                    algorithm: id.to_string(),
                    display_name: algorithm.display_name.clone(),
                    array_length: config.array_length,
                    elapsed,
                    verified,
                    profile,
                });
            }
            Err(payload) => {
                let fault = AlgorithmFault {
                    algorithm: id.to_string(),
                    repeat,
                    message: panic_message(payload.as_ref()),
                };
                error!(algorithm = id, repeat, error = %fault.message, "Sort faulted");
                guard.fail(fault);
                break;
            }
        }
    }
}

fn emit_profile(id: &str, repeat: usize, profile: &Profile) {
    info!(
        target: "sort_visualizer::profile",
        algorithm = id,
        repeat,
        comparisons = profile.comparisons,
        swaps = profile.swaps,
        steps = profile.steps,
        calls = profile.calls,
        max_depth = profile.max_depth,
        sleep_ms = profile.sleep.as_secs_f64() * 1000.0,
        elapsed_ms = profile.elapsed.as_secs_f64() * 1000.0,
        "Run profile"
    );
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::is_permutation;
    use pretty_assertions::assert_eq;

    fn engine(array_length: usize, repeats: usize, step_delay: Duration) -> SortEngine {
        SortEngine::with_config(
            AlgorithmRegistry::with_builtins(),
            EngineConfig {
                array_length,
                repeats,
                step_delay,
                ..EngineConfig::default()
            },
        )
        .unwrap()
    }

    fn out_of_bounds(ctx: &mut SortContext<'_>) {
        let n = ctx.len();
        ctx.swap(0, n);
    }

    #[test]
    fn test_validate_rejects_zero_repeats() {
        let config = EngineConfig {
            repeats: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidConfiguration(_))
        ));

        let mut engine = SortEngine::new(AlgorithmRegistry::with_builtins());
        assert!(engine.configure(config).is_err());
        assert_eq!(engine.config().repeats, DEFAULT_REPEATS);
    }

    #[test]
    fn test_validate_accepts_empty_array() {
        let config = EngineConfig {
            array_length: 0,
            repeats: 1,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bubble_scenario() {
        let mut engine = engine(10, 1, Duration::ZERO);
        engine.start("bubble").unwrap();
        engine.join().unwrap();

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.array, (1..=10).collect::<Vec<u32>>());
        assert_eq!(snapshot.history.len(), 1);
        assert!(snapshot.history[0].seconds() >= 0.0);
        assert!(snapshot.history[0].verified);
        assert_eq!(snapshot.display_name, "Bubble Sort");
        assert!(!snapshot.running);
        assert!(snapshot.fault.is_none());
    }

    #[test]
    fn test_unknown_algorithm_is_rejected() {
        let mut engine = engine(10, 1, Duration::ZERO);
        let err = engine.start("nonexistent").unwrap_err();
        assert!(matches!(err, EngineError::UnknownAlgorithm { .. }));
        assert!(!engine.is_running());
        assert!(engine.history().is_empty());
        assert!(engine.is_finished());
        assert_eq!(engine.snapshot().display_name, IDLE_DISPLAY_NAME);
    }

    #[test]
    fn test_history_counts_repeats() {
        for name in ["selection", "selection_recursive", "bubble", "quick_sort"] {
            let mut engine = engine(50, 3, Duration::ZERO);
            engine.start(name).unwrap();
            engine.join().unwrap();

            let history = engine.history();
            assert_eq!(history.len(), 3, "{name}");
            assert!(history.iter().all(|r| r.verified && r.algorithm == name));
            assert!(!engine.is_running());
        }
    }

    #[test]
    fn test_history_accumulates_across_starts() {
        let mut engine = engine(20, 2, Duration::ZERO);
        engine.start("selection").unwrap();
        engine.join().unwrap();
        engine.start("quick_sort").unwrap();
        engine.join().unwrap();

        let names: Vec<String> = engine.history().into_iter().map(|r| r.algorithm).collect();
        assert_eq!(names, vec!["selection", "selection", "quick_sort", "quick_sort"]);
    }

    #[test]
    fn test_running_toggles_per_repeat() {
        let mut engine = engine(8, 2, Duration::from_millis(5));
        engine.start("bubble").unwrap();

        // history length observed while running identifies the repeat
        let mut running_during = Vec::new();
        while !engine.is_finished() {
            let snapshot = engine.snapshot();
            if snapshot.running && running_during.last() != Some(&snapshot.history.len()) {
                running_during.push(snapshot.history.len());
            }
            thread::sleep(Duration::from_millis(1));
        }
        engine.join().unwrap();

        // one running stretch per repeat, in order
        assert_eq!(running_during, vec![0, 1]);
        assert!(!engine.is_running());
        assert_eq!(engine.history().len(), 2);
    }

    #[test]
    fn test_start_while_running_is_busy() {
        let mut engine = engine(10, 1, Duration::from_millis(20));
        engine.start("selection").unwrap();
        assert!(matches!(engine.start("bubble"), Err(EngineError::Busy)));
        engine.join().unwrap();
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn test_snapshots_are_permutations_while_sorting() {
        let mut engine = engine(300, 2, Duration::ZERO);
        engine.start("bubble").unwrap();

        let mut polls = 0;
        while !engine.is_finished() {
            let snapshot = engine.snapshot();
            assert_eq!(snapshot.array.len(), 300);
            assert!(is_permutation(&snapshot.array));
            polls += 1;
        }
        engine.join().unwrap();
        assert!(polls > 0);
    }

    #[test]
    fn test_fault_resets_running() {
        let mut registry = AlgorithmRegistry::with_builtins();
        registry.register("broken", Algorithm::new("Broken Sort", out_of_bounds));
        let mut engine = SortEngine::with_config(
            registry,
            EngineConfig {
                array_length: 16,
                repeats: 3,
                ..EngineConfig::default()
            },
        )
        .unwrap();

        engine.start("broken").unwrap();
        let err = engine.join().unwrap_err();
        match err {
            EngineError::AlgorithmFault(fault) => {
                assert_eq!(fault.algorithm, "broken");
                assert_eq!(fault.repeat, 1);
            }
            other => panic!("expected AlgorithmFault, got {other:?}"),
        }

        let snapshot = engine.snapshot();
        assert!(!snapshot.running);
        assert!(snapshot.history.is_empty());
        assert!(snapshot.fault.is_some());
        assert!(is_permutation(&snapshot.array));
        assert!(matches!(engine.fault(), Err(EngineError::AlgorithmFault(_))));

        // the engine stays usable
        engine.start("bubble").unwrap();
        engine.join().unwrap();
        assert_eq!(engine.history().len(), 3);
        assert!(engine.snapshot().fault.is_none());
        assert!(engine.fault().is_ok());
    }

    #[test]
    fn test_empty_array_runs() {
        let mut engine = engine(0, 2, Duration::ZERO);
        engine.start("quick_sort").unwrap();
        engine.join().unwrap();
        assert_eq!(engine.history().len(), 2);
        assert!(engine.snapshot().array.is_empty());
    }

    #[test]
    fn test_debug_profile_recorded() {
        let mut engine = SortEngine::with_config(
            AlgorithmRegistry::with_builtins(),
            EngineConfig {
                array_length: 30,
                repeats: 1,
                debug: true,
                ..EngineConfig::default()
            },
        )
        .unwrap();
        engine.start("selection").unwrap();
        engine.join().unwrap();

        let record = &engine.history()[0];
        assert_eq!(record.profile.comparisons, 30 * 29 / 2);
        assert_eq!(record.profile.elapsed, record.elapsed);
    }

    #[test]
    fn test_seeded_permutations_repeat() {
        let a = permutation(100, &mut StdRng::seed_from_u64(7));
        let b = permutation(100, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert!(is_permutation(&a));
    }

    #[test]
    fn test_current_elapsed_advances() {
        let engine = engine(10, 1, Duration::ZERO);
        let first = engine.current_elapsed();
        thread::sleep(Duration::from_millis(2));
        assert!(engine.current_elapsed() > first);
    }

    #[test]
    fn test_mean_duration() {
        let mut engine = engine(10, 2, Duration::ZERO);
        assert_eq!(engine.snapshot().mean_duration(), None);
        engine.start("selection").unwrap();
        engine.join().unwrap();
        let snapshot = engine.snapshot();
        let mean = snapshot.mean_duration().unwrap();
        let durations = snapshot.durations();
        assert!((mean - (durations[0] + durations[1]) / 2.0).abs() < 1e-12);
    }
}
