// tapetty: Brainfuck interpreter with a time-travel tape debugger

use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;

use tapetty::host::{StreamInput, TerminalInput, WriteSink};
use tapetty::interpreter::constants::DEFAULT_HISTORY_LIMIT;
use tapetty::interpreter::dump::StateDump;
use tapetty::interpreter::engine::Engine;
use tapetty::interpreter::errors::ExecutionError;
use tapetty::interpreter::io::ScriptedInput;
use tapetty::interpreter::timeline::{Outcome, Timeline};
use tapetty::program::Program;
use tapetty::ui::App;

#[derive(Parser, Debug)]
#[command(name = "tapetty", version)]
#[command(about = "Run a Brainfuck program, or step through it in a time-travel debugger")]
struct Args {
    /// Program file; read from stdin when omitted
    program: Option<PathBuf>,

    /// Record the run and open the step-through debugger
    #[arg(long)]
    tui: bool,

    /// Characters fed to `,` while recording for the debugger
    #[arg(long, value_name = "TEXT", default_value = "")]
    input: String,

    /// Memory budget for recorded history, in MiB
    #[arg(long, value_name = "MIB")]
    history_limit: Option<usize>,

    /// Print the tape, program and instruction pointer to stderr after the run
    #[arg(long)]
    dump: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    tapetty::logging::init_logging(args.verbose);

    match run(&args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<i32> {
    let source = read_source(args.program.as_deref())?;

    let program = match Program::load(&source) {
        Ok(program) => program,
        Err(e) => {
            eprintln!("Load error: {}", e);
            return Ok(1);
        }
    };
    info!(instructions = program.len(), "program loaded");

    if args.tui {
        let limit = args
            .history_limit
            .map(|mib| mib.saturating_mul(1024 * 1024))
            .unwrap_or(DEFAULT_HISTORY_LIMIT);
        run_debugger(program, source, &args.input, limit)
    } else {
        run_console(program, args.dump)
    }
}

/// Program text from `path`, all of piped stdin, or one line typed at a prompt
fn read_source(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        return fs::read_to_string(path)
            .with_context(|| format!("failed to read '{}'", path.display()));
    }

    let stdin = io::stdin();
    let mut source = String::new();
    if stdin.is_terminal() {
        eprint!("program> ");
        io::stderr().flush()?;
        stdin.read_line(&mut source).context("failed to read program")?;
    } else {
        stdin
            .lock()
            .read_to_string(&mut source)
            .context("failed to read program from stdin")?;
    }
    Ok(source)
}

fn run_console(program: Program, dump: bool) -> Result<i32> {
    let mut engine = Engine::new(program);
    let mut output = WriteSink::stdout();

    let stdin = io::stdin();
    let result = if stdin.is_terminal() {
        engine.run(&mut TerminalInput::new(), &mut output)
    } else {
        engine.run(&mut StreamInput::new(stdin.lock()), &mut output)
    };

    if dump {
        eprintln!("{}", StateDump::new(&engine));
    }

    match result {
        Ok(()) => Ok(0),
        Err(fault) => {
            report_fault(&engine, &fault);
            Ok(1)
        }
    }
}

fn report_fault(engine: &Engine, fault: &ExecutionError) {
    eprintln!();
    match engine.program().location(fault.instruction_index()) {
        Some(location) => eprintln!(
            "Runtime error at line {}, column {}: {}",
            location.line, location.column, fault
        ),
        None => eprintln!("Runtime error: {}", fault),
    }
}

fn run_debugger(program: Program, source: String, input: &str, limit: usize) -> Result<i32> {
    eprintln!("Recording execution...");
    let timeline = Timeline::record(program, &mut ScriptedInput::new(input), limit);

    match timeline.outcome() {
        Outcome::Halted => eprintln!("Execution completed successfully."),
        Outcome::Faulted(fault) => {
            eprintln!("Runtime error: {}", fault);
            eprintln!("Entering TUI with partial execution history...");
        }
        Outcome::Truncated { limit } => {
            eprintln!("History budget of {} bytes spent; showing partial history.", limit);
        }
    }
    eprintln!("Total snapshots: {}", timeline.total_snapshots());

    if timeline.total_snapshots() == 0 {
        bail!("history limit is too small to record the initial state");
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(timeline, source);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.context("debugger UI failed")?;
    Ok(0)
}
