//! Command-line interface.
//!
//! `-h` is reserved for help, so the viewport height is the long-only
//! `--height`. Width keeps `-w`.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Command, CommandFactory, FromArgMatches, Parser};

use crate::engine::{EngineConfig, DEFAULT_ARRAY_LENGTH, DEFAULT_REPEATS};
use crate::registry::AlgorithmRegistry;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "sort-visualizer",
    version,
    about = "Watch classic sorting algorithms sort a shuffled array"
)]
pub struct Cli {
    /// Algorithm to run
    #[arg(short = 't', long = "algorithm", value_name = "ALGORITHM")]
    pub algorithm: String,

    /// Length of the array to sort
    #[arg(short = 'l', long, default_value_t = DEFAULT_ARRAY_LENGTH, value_parser = parse_positive)]
    pub length: usize,

    /// Number of times to repeat the algorithm
    #[arg(short = 'r', long, default_value_t = DEFAULT_REPEATS, value_parser = parse_positive)]
    pub repeats: usize,

    /// Pause after each step of the algorithm, in seconds
    #[arg(short = 'd', long, value_name = "SECONDS", default_value = "0", value_parser = parse_delay)]
    pub delay: Duration,

    /// Viewport width in terminal columns (defaults to the full terminal)
    #[arg(short = 'w', long)]
    pub width: Option<u16>,

    /// Viewport height in terminal rows (defaults to the full terminal)
    #[arg(long)]
    pub height: Option<u16>,

    /// Print a call-count and time profile for every run
    #[arg(long)]
    pub debug: bool,

    /// Seed for the shuffled arrays
    #[arg(long)]
    pub seed: Option<u64>,

    /// Run without the terminal UI and print results when done
    #[arg(long)]
    pub headless: bool,

    /// Write a Links Notation run report to this file on exit
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Parse process arguments against the algorithms in `registry`.
    ///
    /// Prints usage and exits on invalid input.
    pub fn parse_with(registry: &AlgorithmRegistry) -> Self {
        let matches = command(registry).get_matches();
        Self::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
    }

    pub fn try_parse_from_with<I, T>(
        registry: &AlgorithmRegistry,
        args: I,
    ) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = command(registry).try_get_matches_from(args)?;
        Self::from_arg_matches(&matches)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            array_length: self.length,
            repeats: self.repeats,
            step_delay: self.delay,
            debug: self.debug,
            seed: self.seed,
        }
    }
}

/// The clap command with `-t` restricted to registered algorithms.
pub fn command(registry: &AlgorithmRegistry) -> Command {
    let listing = registry.names().join(", ");
    let registry = registry.clone();
    Cli::command()
        .mut_arg("algorithm", |arg| {
            arg.value_parser(move |s: &str| -> Result<String, String> {
                if registry.contains(s) {
                    Ok(s.to_string())
                } else {
                    Err(format!("choose from: {}", registry.names().join(", ")))
                }
            })
        })
        .after_help(format!(
            "Algorithms: {}\n\nExample: sort-visualizer -t selection -l 10000 -r 6",
            listing
        ))
}

fn parse_positive(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{}' is not a positive integer", s)),
    }
}

fn parse_delay(s: &str) -> Result<Duration, String> {
    let seconds = s
        .parse::<f64>()
        .map_err(|_| format!("'{}' is not a number of seconds", s))?;
    Duration::try_from_secs_f64(seconds)
        .map_err(|_| format!("'{}' is not a non-negative number of seconds in range", s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        let registry = AlgorithmRegistry::with_builtins();
        let argv = std::iter::once("sort-visualizer").chain(args.iter().copied());
        Cli::try_parse_from_with(&registry, argv)
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["-t", "bubble"]).unwrap();
        assert_eq!(cli.algorithm, "bubble");
        assert_eq!(cli.length, 5000);
        assert_eq!(cli.repeats, 3);
        assert_eq!(cli.delay, Duration::ZERO);
        assert!(!cli.debug && !cli.headless);

        let config = cli.engine_config();
        assert_eq!(config.step_delay, Duration::ZERO);
        assert_eq!(config.array_length, 5000);
    }

    #[test]
    fn test_all_flags() {
        let cli = parse(&[
            "-t", "quick_sort", "-l", "10000", "-r", "6", "-d", "0.25", "-w", "120",
            "--height", "40", "--debug", "--seed", "9", "--headless",
        ])
        .unwrap();
        assert_eq!(cli.length, 10000);
        assert_eq!(cli.repeats, 6);
        assert_eq!(cli.width, Some(120));
        assert_eq!(cli.height, Some(40));
        assert_eq!(cli.seed, Some(9));
        assert!(cli.debug && cli.headless);
        assert_eq!(cli.engine_config().step_delay, Duration::from_millis(250));
    }

    #[test]
    fn test_missing_algorithm() {
        let err = parse(&["-l", "10"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_unknown_algorithm() {
        let err = parse(&["-t", "bogo"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_accepts_registered_custom_algorithm() {
        let mut registry = AlgorithmRegistry::new();
        registry.register(
            "bubble_copy",
            crate::registry::Algorithm::new("Bubble Copy", crate::bubble_sort::bubble),
        );
        let argv = ["sort-visualizer", "-t", "bubble_copy"];
        let cli = Cli::try_parse_from_with(&registry, argv).unwrap();
        assert_eq!(cli.algorithm, "bubble_copy");

        let err = Cli::try_parse_from_with(&registry, ["sort-visualizer", "-t", "bubble"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_rejects_bad_numbers() {
        assert!(parse(&["-t", "bubble", "-l", "abc"]).is_err());
        assert!(parse(&["-t", "bubble", "-l", "0"]).is_err());
        assert!(parse(&["-t", "bubble", "-r", "0"]).is_err());
        assert!(parse(&["-t", "bubble", "-d", "-1"]).is_err());
        assert!(parse(&["-t", "bubble", "-d", "inf"]).is_err());
        assert!(parse(&["-t", "bubble", "-d", "NaN"]).is_err());

        let err = parse(&["-t", "bubble", "-d", "1e300"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_short_h_is_help() {
        let err = parse(&["-h"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }
}
