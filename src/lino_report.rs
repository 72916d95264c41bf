//! Links Notation (Lino) Run Report
//!
//! Writes the engine's run history in Links Notation, a simple format for
//! structured data as links between references, and converts it to
//! Markdown. The `lino2md` binary reads reports back with
//! `parse_lino_report`.
//!
//! Format examples:
//! - Simple reference: `name`
//! - Link with id and values: `(id: value1 value2)`
//! - Nested structure using indentation:
//!   ```text
//!   parent:
//!     child1
//!     child2
//!   ```

use std::fmt::Write;
use std::fs;
use std::io;
use std::path::Path;

use crate::engine::RunRecord;

/// A single sort run
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    /// Registry id (e.g., "bubble", "quick_sort")
    pub algorithm: String,
    /// Display name (e.g., "Bubble Sort")
    pub display_name: String,
    /// Array size in elements
    pub array_size: usize,
    /// Execution time in milliseconds
    pub time_ms: f64,
    /// Whether the run ended fully sorted
    pub verified: bool,
    pub comparisons: u64,
    pub swaps: u64,
    pub steps: u64,
}

impl From<&RunRecord> for RunResult {
    fn from(record: &RunRecord) -> Self {
        RunResult {
            algorithm: record.algorithm.clone(),
            display_name: record.display_name.clone(),
            array_size: record.array_length,
            time_ms: record.elapsed.as_secs_f64() * 1000.0,
            verified: record.verified,
            comparisons: record.profile.comparisons,
            swaps: record.profile.swaps,
            steps: record.profile.steps,
        }
    }
}

/// Aggregate timings for one algorithm
#[derive(Debug, Clone, PartialEq)]
pub struct AlgorithmSummary {
    pub algorithm: String,
    pub count: usize,
    pub mean_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
}

/// A complete run report
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Timestamp of when the report was created (ISO 8601 format)
    pub timestamp: String,
    pub description: String,
    pub system_info: SystemInfo,
    /// Runs in completion order
    pub results: Vec<RunResult>,
}

/// System information for the report
#[derive(Debug, Clone)]
pub struct SystemInfo {
    /// Operating system name
    pub os: String,
    /// Hardware threads available to the process
    pub threads: Option<usize>,
}

impl RunReport {
    /// Create a new empty report
    pub fn new(description: &str) -> Self {
        RunReport {
            timestamp: chrono_lite_timestamp(),
            description: description.to_string(),
            system_info: SystemInfo::default(),
            results: Vec::new(),
        }
    }

    /// Build a report from an engine's run history
    pub fn from_history(description: &str, history: &[RunRecord]) -> Self {
        let mut report = Self::new(description);
        report.results.extend(history.iter().map(RunResult::from));
        report
    }

    pub fn add_result(&mut self, result: RunResult) {
        self.results.push(result);
    }

    /// Algorithm ids in first-seen order
    fn algorithms(&self) -> Vec<&str> {
        let mut algorithms: Vec<&str> = Vec::new();
        for result in &self.results {
            if !algorithms.contains(&result.algorithm.as_str()) {
                algorithms.push(&result.algorithm);
            }
        }
        algorithms
    }

    /// Per-algorithm timing summary, in first-seen order
    pub fn summaries(&self) -> Vec<AlgorithmSummary> {
        self.algorithms()
            .into_iter()
            .map(|algorithm| {
                let times: Vec<f64> = self
                    .results
                    .iter()
                    .filter(|r| r.algorithm == algorithm)
                    .map(|r| r.time_ms)
                    .collect();
                AlgorithmSummary {
                    algorithm: algorithm.to_string(),
                    count: times.len(),
                    mean_ms: times.iter().sum::<f64>() / times.len() as f64,
                    min_ms: times.iter().copied().fold(f64::INFINITY, f64::min),
                    max_ms: times.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                }
            })
            .collect()
    }

    /// Generate the report in Links Notation format
    pub fn to_lino(&self) -> String {
        let mut output = String::new();

        // writing to a String cannot fail
        let _ = self.write_lino(&mut output);
        output
    }

    fn write_lino(&self, output: &mut String) -> std::fmt::Result {
        writeln!(output, "run_report:")?;
        writeln!(output, "  timestamp '{}'", self.timestamp)?;
        writeln!(output, "  description '{}'", escape_lino_string(&self.description))?;

        writeln!(output)?;
        writeln!(output, "system_info:")?;
        writeln!(output, "  os '{}'", escape_lino_string(&self.system_info.os))?;
        if let Some(threads) = self.system_info.threads {
            writeln!(output, "  threads {}", threads)?;
        }

        // Runs grouped by algorithm, numbered per algorithm
        writeln!(output)?;
        writeln!(output, "runs:")?;
        for algorithm in self.algorithms() {
            writeln!(output, "  {}:", algorithm)?;
            let runs = self.results.iter().filter(|r| r.algorithm == algorithm);
            for (index, result) in runs.enumerate() {
                if index == 0 {
                    writeln!(
                        output,
                        "    display_name '{}'",
                        escape_lino_string(&result.display_name)
                    )?;
                }
                writeln!(output, "    run_{}:", index + 1)?;
                writeln!(output, "      array_size {}", result.array_size)?;
                writeln!(output, "      time_ms {:.3}", result.time_ms)?;
                writeln!(output, "      verified {}", result.verified)?;
                writeln!(output, "      comparisons {}", result.comparisons)?;
                writeln!(output, "      swaps {}", result.swaps)?;
                writeln!(output, "      steps {}", result.steps)?;
            }
        }

        writeln!(output)?;
        writeln!(output, "summary:")?;
        for summary in self.summaries() {
            writeln!(output, "  {}:", summary.algorithm)?;
            writeln!(output, "    count {}", summary.count)?;
            writeln!(output, "    mean_ms {:.3}", summary.mean_ms)?;
            writeln!(output, "    min_ms {:.3}", summary.min_ms)?;
            writeln!(output, "    max_ms {:.3}", summary.max_ms)?;
        }
        Ok(())
    }

    /// Save the report to a file in Links Notation format
    pub fn save_lino(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.to_lino())
    }

    /// Generate a markdown report
    pub fn to_markdown_table(&self) -> String {
        let mut output = String::new();
        let _ = self.write_markdown(&mut output);
        output
    }

    fn write_markdown(&self, output: &mut String) -> std::fmt::Result {
        writeln!(output, "# Sort Run Report")?;
        writeln!(output)?;
        writeln!(output, "**Timestamp:** {}", self.timestamp)?;
        writeln!(output, "**Description:** {}", self.description)?;
        writeln!(output)?;

        writeln!(output, "## System Information")?;
        writeln!(output)?;
        writeln!(output, "| Property | Value |")?;
        writeln!(output, "|----------|-------|")?;
        writeln!(output, "| OS | {} |", self.system_info.os)?;
        if let Some(threads) = self.system_info.threads {
            writeln!(output, "| Threads | {} |", threads)?;
        }
        writeln!(output)?;

        writeln!(output, "## Runs")?;
        writeln!(output)?;
        writeln!(
            output,
            "| Algorithm | Run | Size | Time (ms) | Verified | Comparisons | Swaps | Steps |"
        )?;
        writeln!(
            output,
            "|-----------|-----|------|-----------|----------|-------------|-------|-------|"
        )?;
        for algorithm in self.algorithms() {
            let runs = self.results.iter().filter(|r| r.algorithm == algorithm);
            for (index, result) in runs.enumerate() {
                writeln!(
                    output,
                    "| {} | {} | {} | {:.3} | {} | {} | {} | {} |",
                    result.display_name,
                    index + 1,
                    format_size(result.array_size),
                    result.time_ms,
                    if result.verified { "yes" } else { "NO" },
                    result.comparisons,
                    result.swaps,
                    result.steps
                )?;
            }
        }
        writeln!(output)?;

        writeln!(output, "## Summary")?;
        writeln!(output)?;
        writeln!(output, "| Algorithm | Runs | Mean (ms) | Min (ms) | Max (ms) |")?;
        writeln!(output, "|-----------|------|-----------|----------|----------|")?;
        for summary in self.summaries() {
            writeln!(
                output,
                "| {} | {} | {:.3} | {:.3} | {:.3} |",
                summary.algorithm, summary.count, summary.mean_ms, summary.min_ms, summary.max_ms
            )?;
        }

        writeln!(output)?;
        writeln!(output, "---")?;
        writeln!(output, "*Report generated by sort-visualizer*")?;
        Ok(())
    }

    /// Save the report as a markdown file
    pub fn save_markdown(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.to_markdown_table())
    }
}

impl Default for SystemInfo {
    fn default() -> Self {
        SystemInfo {
            os: std::env::consts::OS.to_string(),
            threads: std::thread::available_parallelism().ok().map(|n| n.get()),
        }
    }
}

/// Escape a string for use in Links Notation (handle single quotes)
fn escape_lino_string(s: &str) -> String {
    s.replace('\'', "\\'")
}

/// Format a size as a human-readable string (e.g., "1K", "1M")
fn format_size(size: usize) -> String {
    if size >= 1_000_000_000 {
        format!("{}G", size / 1_000_000_000)
    } else if size >= 1_000_000 {
        format!("{}M", size / 1_000_000)
    } else if size >= 1_000 {
        format!("{}K", size / 1_000)
    } else {
        size.to_string()
    }
}

/// Generate a simple timestamp without external dependencies
fn chrono_lite_timestamp() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    let days_since_epoch = secs / 86400;
    let time_of_day = secs % 86400;

    let hours = time_of_day / 3600;
    let minutes = (time_of_day % 3600) / 60;
    let seconds = time_of_day % 60;

    // Walk years, then months (leap seconds ignored)
    let mut year = 1970i32;
    let mut remaining_days = days_since_epoch as i32;
    loop {
        let days_in_year = if is_leap_year(year) { 366 } else { 365 };
        if remaining_days < days_in_year {
            break;
        }
        remaining_days -= days_in_year;
        year += 1;
    }

    let february = if is_leap_year(year) { 29 } else { 28 };
    let days_in_months = [31, february, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

    let mut month = 1;
    for &days in &days_in_months {
        if remaining_days < days {
            break;
        }
        remaining_days -= days;
        month += 1;
    }

    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}Z",
        year,
        month,
        remaining_days + 1,
        hours,
        minutes,
        seconds
    )
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Parse a Links Notation run report.
///
/// Only the `runs:` section is needed to rebuild results; `summary:` is
/// derived data and is skipped. Returns `None` when no runs are found.
pub fn parse_lino_report(content: &str) -> Option<RunReport> {
    let mut report = RunReport::new("Parsed report");
    let mut in_runs_section = false;
    let mut current_algorithm: Option<(String, String)> = None;
    let mut current_result: Option<RunResult> = None;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let indent = line.len() - line.trim_start().len();

        if indent == 0 {
            if let Some(result) = current_result.take() {
                report.results.push(result);
            }
            in_runs_section = trimmed == "runs:";
            continue;
        }

        if let Some(ts) = extract_quoted_value(trimmed, "timestamp") {
            report.timestamp = ts;
            continue;
        }
        if let Some(desc) = extract_quoted_value(trimmed, "description") {
            report.description = desc;
            continue;
        }
        if let Some(os) = extract_quoted_value(trimmed, "os") {
            report.system_info.os = os;
            continue;
        }
        if let Some(threads) = trimmed.strip_prefix("threads ") {
            report.system_info.threads = threads.parse().ok();
            continue;
        }

        if !in_runs_section {
            continue;
        }

        match indent {
            // algorithm block
            2 if trimmed.ends_with(':') => {
                if let Some(result) = current_result.take() {
                    report.results.push(result);
                }
                let algorithm = trimmed.trim_end_matches(':').to_string();
                current_algorithm = Some((algorithm.clone(), algorithm));
            }
            4 if trimmed.starts_with("display_name ") => {
                if let (Some((_, display)), Some(name)) = (
                    current_algorithm.as_mut(),
                    extract_quoted_value(trimmed, "display_name"),
                ) {
                    *display = name;
                }
            }
            // run block
            4 if trimmed.starts_with("run_") && trimmed.ends_with(':') => {
                if let Some(result) = current_result.take() {
                    report.results.push(result);
                }
                if let Some((algorithm, display_name)) = &current_algorithm {
                    current_result = Some(RunResult {
                        algorithm: algorithm.clone(),
                        display_name: display_name.clone(),
                        array_size: 0,
                        time_ms: 0.0,
                        verified: false,
                        comparisons: 0,
                        swaps: 0,
                        steps: 0,
                    });
                }
            }
            _ => {
                if let Some(ref mut result) = current_result {
                    parse_result_property(result, trimmed);
                }
            }
        }
    }

    if let Some(result) = current_result {
        report.results.push(result);
    }

    if report.results.is_empty() {
        None
    } else {
        Some(report)
    }
}

fn parse_result_property(result: &mut RunResult, line: &str) {
    let Some((key, value)) = line.split_once(' ') else {
        return;
    };
    match key {
        "array_size" => result.array_size = value.parse().unwrap_or(result.array_size),
        "time_ms" => result.time_ms = value.parse().unwrap_or(result.time_ms),
        "verified" => result.verified = value == "true",
        "comparisons" => result.comparisons = value.parse().unwrap_or(result.comparisons),
        "swaps" => result.swaps = value.parse().unwrap_or(result.swaps),
        "steps" => result.steps = value.parse().unwrap_or(result.steps),
        _ => {}
    }
}

fn extract_quoted_value(line: &str, key: &str) -> Option<String> {
    let rest = line.strip_prefix(key)?.strip_prefix(' ')?.trim();
    if rest.len() >= 2 && rest.starts_with('\'') && rest.ends_with('\'') {
        Some(rest[1..rest.len() - 1].replace("\\'", "'"))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn result(algorithm: &str, display_name: &str, time_ms: f64) -> RunResult {
        RunResult {
            algorithm: algorithm.to_string(),
            display_name: display_name.to_string(),
            array_size: 5000,
            time_ms,
            verified: true,
            comparisons: 12_497_500,
            swaps: 4_999,
            steps: 5_000,
        }
    }

    #[test]
    fn test_report_to_lino() {
        let mut report = RunReport::new("Test run");
        report.add_result(result("selection", "Selection Sort", 1.5));

        let lino = report.to_lino();
        assert!(lino.contains("run_report:"));
        assert!(lino.contains("  selection:"));
        assert!(lino.contains("    display_name 'Selection Sort'"));
        assert!(lino.contains("      time_ms 1.500"));
        assert!(lino.contains("summary:"));
    }

    #[test]
    fn test_summaries() {
        let mut report = RunReport::new("Test run");
        report.add_result(result("bubble", "Bubble Sort", 3.0));
        report.add_result(result("quick_sort", "Quick Sort", 1.0));
        report.add_result(result("bubble", "Bubble Sort", 5.0));

        let summaries = report.summaries();
        assert_eq!(summaries.len(), 2);
        assert_eq!(
            summaries[0],
            AlgorithmSummary {
                algorithm: "bubble".to_string(),
                count: 2,
                mean_ms: 4.0,
                min_ms: 3.0,
                max_ms: 5.0,
            }
        );
        assert_eq!(summaries[1].algorithm, "quick_sort");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(500), "500");
        assert_eq!(format_size(1000), "1K");
        assert_eq!(format_size(5000), "5K");
        assert_eq!(format_size(1_000_000), "1M");
    }

    #[test]
    fn test_escape_lino_string() {
        assert_eq!(escape_lino_string("hello"), "hello");
        assert_eq!(escape_lino_string("it's"), "it\\'s");
    }

    #[test]
    fn test_parse_lino_report() {
        let mut report = RunReport::new("Three runs, it's fine");
        report.add_result(result("bubble", "Bubble Sort", 3.0));
        report.add_result(result("quick_sort", "Quick Sort", 1.25));
        report.add_result(result("bubble", "Bubble Sort", 5.0));

        let parsed = parse_lino_report(&report.to_lino()).unwrap();

        assert_eq!(parsed.description, "Three runs, it's fine");
        assert_eq!(parsed.timestamp, report.timestamp);
        // grouped by algorithm on disk
        assert_eq!(
            parsed.results,
            vec![
                result("bubble", "Bubble Sort", 3.0),
                result("bubble", "Bubble Sort", 5.0),
                result("quick_sort", "Quick Sort", 1.25),
            ]
        );
    }

    #[test]
    fn test_parse_empty_report() {
        let report = RunReport::new("Nothing ran");
        assert!(parse_lino_report(&report.to_lino()).is_none());
    }

    #[test]
    fn test_markdown_table() {
        let mut report = RunReport::new("Markdown");
        report.add_result(result("selection", "Selection Sort", 2.0));
        let markdown = report.to_markdown_table();
        assert!(markdown.contains("# Sort Run Report"));
        assert!(markdown.contains("| Selection Sort | 1 | 5K | 2.000 | yes |"));
        assert!(markdown.contains("| selection | 1 | 2.000 | 2.000 | 2.000 |"));
    }
}
