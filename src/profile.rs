//! Per-run Profiling
//!
//! Every access a sort makes goes through `SortContext`, which keeps these
//! counters. The engine stamps the wall-clock time at the end of a run and,
//! in debug mode, emits the profile as a side channel.

use std::fmt;
use std::time::Duration;

/// Call-count and time breakdown of a single sort run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Profile {
    /// Element comparisons
    pub comparisons: u64,
    /// Element swaps (including self-swaps)
    pub swaps: u64,
    /// Completed units of work (delay points)
    pub steps: u64,
    /// Recursive calls made by the algorithm
    pub calls: u64,
    /// Deepest recursion reached
    pub max_depth: u32,
    /// Time spent sleeping for the step delay
    pub sleep: Duration,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
}

impl Profile {
    /// Wall-clock time not spent sleeping.
    pub fn work_time(&self) -> Duration {
        self.elapsed.saturating_sub(self.sleep)
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>12} | {:>14}", "Counter", "Value")?;
        writeln!(f, "{:-<12}-+-{:-<14}", "", "")?;
        writeln!(f, "{:>12} | {:>14}", "comparisons", self.comparisons)?;
        writeln!(f, "{:>12} | {:>14}", "swaps", self.swaps)?;
        writeln!(f, "{:>12} | {:>14}", "steps", self.steps)?;
        writeln!(f, "{:>12} | {:>14}", "calls", self.calls)?;
        writeln!(f, "{:>12} | {:>14}", "max depth", self.max_depth)?;
        writeln!(
            f,
            "{:>12} | {:>11.3} ms",
            "work",
            self.work_time().as_secs_f64() * 1000.0
        )?;
        writeln!(
            f,
            "{:>12} | {:>11.3} ms",
            "sleep",
            self.sleep.as_secs_f64() * 1000.0
        )?;
        write!(
            f,
            "{:>12} | {:>11.3} ms",
            "total",
            self.elapsed.as_secs_f64() * 1000.0
        )
    }
}
