//! Command-line driver (`spec.md` §6 "Exit codes / environment"): parses a
//! SUL description, runs the active learner against it, and prints the
//! resulting minimal DERA together with the run's statistics counters.
//!
//! The external collaborators `spec.md` §1 keeps out of "the core" — the
//! SUL parser and the reachability oracle — are wired in here: the former
//! from `erax-format`, the latter as the in-process
//! `BoundedReachabilityOracle` (`erax-learning`'s stand-in for an external
//! timed-automaton reachability tool, see that crate's design notes).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use owo_colors::OwoColorize;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use erax_format::ParseError;
use erax_learning::{learn, BoundedReachabilityOracle, Stats};
use erax_smt::Z3GuardOracle;

/// Learns a deterministic event-recording automaton equivalent to a given
/// system under learning (SUL).
#[derive(Parser, Debug)]
#[command(name = "erax", about, version)]
struct Args {
    /// Path to the SUL description (`spec.md` §6 textual format).
    sul: PathBuf,

    /// Maximum constant `m` appearing in the SUL's clock constraints.
    #[arg(short = 'm', long)]
    max_constant: u32,

    /// Depth bound for the in-process reachability oracle that stands in
    /// for an external timed-automaton reachability tool.
    #[arg(long, default_value_t = 8)]
    reachability_depth: usize,

    /// If set, also write the learned automaton in DTA format to this path.
    #[arg(long)]
    emit_dta: Option<PathBuf>,

    /// Increase log verbosity (`-v` debug, `-vv` trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => tracing_subscriber::filter::LevelFilter::INFO,
        1 => tracing_subscriber::filter::LevelFilter::DEBUG,
        _ => tracing_subscriber::filter::LevelFilter::TRACE,
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(level),
        )
        .init();
}

fn run(args: Args) -> Result<(), String> {
    let text = std::fs::read_to_string(&args.sul)
        .map_err(|e| format!("could not read {}: {e}", args.sul.display()))?;

    let guard_oracle = Z3GuardOracle::new();
    let sul = erax_format::parse(&guard_oracle, &text)
        .map_err(|e: ParseError| format!("{} : {e}", args.sul.display()))?;
    info!(
        states = sul.states_count(),
        events = sul.alphabet().len(),
        "parsed SUL"
    );

    let reachability = BoundedReachabilityOracle::new(&guard_oracle, args.reachability_depth);
    let mut stats = Stats::new();

    let learned = learn(&sul, args.max_constant, &guard_oracle, &reachability, &mut stats);

    println!("{}", "learned DERA:".bold());
    println!("{learned}");
    println!();
    println!("{}", "statistics:".bold());
    println!("{stats}");

    if let Some(path) = &args.emit_dta {
        let dta = erax_format::emit_dta(&learned);
        std::fs::write(path, dta).map_err(|e| format!("could not write {}: {e}", path.display()))?;
        info!(path = %path.display(), "wrote DTA output");
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("{message}");
            eprintln!("{}: {message}", "error".red().bold());
            ExitCode::FAILURE
        }
    }
}
