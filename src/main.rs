//! Sorting Algorithm Visualizer
//!
//! Starts the sort engine on the chosen algorithm and draws its array in
//! the terminal until the user quits (`q`, `Esc` or `Ctrl-C`). With
//! `--headless` it waits for all runs instead and prints the results.
//!
//! Usage:
//!   sort-visualizer -t <ALGORITHM> [-l LENGTH] [-r REPEATS] [-d SECONDS]
//!
//! Example:
//!   sort-visualizer -t selection -l 10000 -r 6

use std::fs::File;
use std::io::{self, IsTerminal};
use std::panic;
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sort_visualizer::cli::Cli;
use sort_visualizer::lino_report::RunReport;
use sort_visualizer::render::{viewport, ArrayChart};
use sort_visualizer::{AlgorithmRegistry, SortEngine};

/// Time between renderer polls of the engine
const FRAME_INTERVAL: Duration = Duration::from_millis(15);

fn main() -> anyhow::Result<()> {
    let registry = AlgorithmRegistry::with_builtins();
    let cli = Cli::parse_with(&registry);

    init_logging(&cli)?;

    if !cli.headless && (!io::stdin().is_terminal() || !io::stdout().is_terminal()) {
        eprintln!("Error: the visualizer needs a terminal (TTY).");
        eprintln!("Run with --headless to sort without drawing.");
        std::process::exit(1);
    }

    println!("+{}+", "-".repeat(65));
    println!("| {:<63} |", "Sorting Algorithm Visualizer");
    println!("+{}+\n", "-".repeat(65));
    println!("Algorithm: {}", cli.algorithm);
    println!("Array Length: {}", cli.length);
    println!("Repeats: {}", cli.repeats);
    println!("Delay: {} s", cli.delay.as_secs_f64());
    println!();

    install_panic_hook();

    let mut engine = SortEngine::with_config(registry, cli.engine_config())?;
    engine.start(&cli.algorithm)?;

    let outcome = if cli.headless {
        engine.join()
    } else {
        run_terminal(&engine, &cli)?;
        engine.fault()
    };

    print_summary(&engine, cli.debug);

    if let Some(path) = &cli.report {
        let description = format!(
            "{} on {} elements, {} repeats",
            cli.algorithm, cli.length, cli.repeats
        );
        RunReport::from_history(&description, &engine.history())
            .save_lino(path)
            .with_context(|| format!("writing report to {}", path.display()))?;
        println!("Run report written to: {}", path.display());
    }

    info!("Exiting");
    outcome.map_err(Into::into)
}

/// Logs go to `--log-file` when given, to stderr in headless mode, and
/// nowhere while the terminal UI owns the screen.
fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let filter = || {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("sort_visualizer=info"))
    };

    if let Some(path) = &cli.log_file {
        let file = File::create(path)
            .with_context(|| format!("creating log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(true)
            .init();
    } else if cli.headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(io::stderr)
            .with_target(true)
            .init();
    }
    Ok(())
}

/// Restore the terminal if the main thread panics. Worker panics are
/// captured and reported by the engine, so they only reach the debug log.
fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        if thread::current().name() == Some("main") {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(panic_info);
        } else {
            tracing::debug!("worker panic: {}", panic_info);
        }
    }));
}

fn run_terminal(engine: &SortEngine, cli: &Cli) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, engine, cli);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    engine: &SortEngine,
    cli: &Cli,
) -> anyhow::Result<()> {
    loop {
        let snapshot = engine.snapshot();
        terminal.draw(|frame| {
            let area = viewport(frame.area(), cli.width, cli.height);
            frame.render_widget(ArrayChart::new(&snapshot), area);
        })?;

        if event::poll(FRAME_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && is_quit(&key) {
                    return Ok(());
                }
            }
        }
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn print_summary(engine: &SortEngine, debug: bool) {
    let snapshot = engine.snapshot();

    println!("--- Results: {} ---", snapshot.display_name);
    for (i, record) in snapshot.history.iter().enumerate() {
        let verified = if record.verified { "verified" } else { "NOT SORTED" };
        println!("Run {}: {:.2} s ({})", i + 1, record.seconds(), verified);
        if debug {
            println!("{}\n", record.profile);
        }
    }
    if let Some(mean) = snapshot.mean_duration() {
        println!("Mean: {:.2} s", mean);
    }
    if snapshot.running {
        println!("Stopped during run {}", snapshot.history.len() + 1);
    }
    if let Some(fault) = &snapshot.fault {
        println!("Fault: {}", fault);
    }
}
