//! Tomasulo scheduling simulator CLI.
//!
//! This binary provides a single entry point for running programs. It performs:
//! 1. **Run:** Load a program file, simulate it until the reorder buffer drains, and print the
//!    timing table, final state and statistics.
//! 2. **Config dump:** Print the effective configuration as JSON, as a starting point for edits.
//!
//! Exit code 0 on a clean drain, 1 on any decoding, configuration or convergence error.

use std::path::{Path, PathBuf};
use std::process;

use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tomasim_core::config::Config;
use tomasim_core::sim::Simulator;
use tomasim_core::stats::STATS_SECTIONS;

#[derive(Parser, Debug)]
#[command(
    name = "tomasim",
    author,
    version,
    about = "Cycle-by-cycle Tomasulo scheduling simulator",
    long_about = "Simulate a program through reservation stations, a reorder buffer and a load-store queue.\n\nExamples:\n  tomasim run program.txt\n  tomasim run program.txt --config machine.json --stats summary,hazards\n  tomasim config > machine.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a program file.
    Run {
        /// Program file (instructions plus optional REG/MEM seed lines).
        program: PathBuf,

        /// JSON configuration file; defaults are used for missing fields.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Log a state snapshot every cycle.
        #[arg(long)]
        trace: bool,

        /// Override the convergence bound.
        #[arg(long)]
        max_cycles: Option<u64>,

        /// Statistics sections to print (comma separated); all sections by default.
        #[arg(
            long,
            value_delimiter = ',',
            value_parser = PossibleValuesParser::new(STATS_SECTIONS.iter().copied())
        )]
        stats: Vec<String>,
    },

    /// Print the effective configuration as JSON.
    Config {
        /// JSON configuration file to merge over the defaults.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            program,
            config,
            trace,
            max_cycles,
            stats,
        } => {
            init_logging(trace);
            let mut config = load_config(config.as_deref());
            config.general.trace |= trace;
            if let Some(bound) = max_cycles {
                config.general.max_cycles = bound;
            }
            cmd_run(&program, config, &stats);
        }
        Commands::Config { config } => {
            init_logging(false);
            let config = load_config(config.as_deref());
            match serde_json::to_string_pretty(&config) {
                Ok(text) => println!("{text}"),
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            }
        }
    }
}

/// Installs the log subscriber; `RUST_LOG` wins, otherwise `warn` (or `debug` with `--trace`).
fn init_logging(trace: bool) {
    let default = if trace { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the configuration file if given, exiting with code 1 on error.
fn load_config(path: Option<&Path>) -> Config {
    let Some(path) = path else {
        return Config::default();
    };
    Config::from_file(path).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    })
}

/// Loads and runs the program, then prints the report and the selected statistics.
///
/// On a runtime error the partial timing table and statistics are still printed.
fn cmd_run(program: &Path, config: Config, sections: &[String]) {
    let mut sim = Simulator::from_file(config, program).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        process::exit(1);
    });

    let result = sim.run();
    print!("{}", sim.report());
    println!();
    sim.stats().print_sections(sections);

    if let Err(e) = result {
        eprintln!("\n[!] {e}");
        process::exit(1);
    }
}
