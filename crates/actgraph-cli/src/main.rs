#![forbid(unsafe_code)]

mod cmd;
mod output;

use actgraph_core::load_config;
use clap::{Parser, Subcommand};
use output::OutputMode;
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "actg: inspect and repair value graph snapshots",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Path to the TOML config file.
    #[arg(long, global = true, default_value = "actgraph.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags.
    const fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Summarize a snapshot",
        long_about = "Report node and edge counts, the maximum out-degree, orphans \
                      unreachable from the initial state and the loop count.",
        after_help = "EXAMPLES:\n    actg inspect levels/level-3.json\n\n    actg inspect levels/level-3.json --json"
    )]
    Inspect(cmd::inspect::InspectArgs),

    #[command(
        about = "Make every node reachable from the initial state",
        after_help = "EXAMPLES:\n    # Reproducible repair\n    actg repair levels/level-3.json --seed 7\n\n    # Denser random orphan links\n    actg repair levels/level-3.json --edge-probability 0.5"
    )]
    Repair(cmd::repair::RepairArgs),

    #[command(about = "Print distances from the initial state")]
    Distances(cmd::distances::DistancesArgs),

    #[command(about = "Print the adjacency matrix as delimited text")]
    Matrix(cmd::matrix::MatrixArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("ACTG_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "actgraph=debug,info"
        } else {
            "actgraph=info,warn"
        })
    });

    let format = env::var("ACTG_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let output = cli.output_mode();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Inspect(ref args) => cmd::inspect::run_inspect(args, output),
        Commands::Repair(ref args) => cmd::repair::run_repair(args, &config, output),
        Commands::Distances(ref args) => cmd::distances::run_distances(args, output),
        Commands::Matrix(ref args) => cmd::matrix::run_matrix(args, output),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn json_flag_is_global() {
        let cli = Cli::try_parse_from(["actg", "matrix", "level.json", "--json"]).expect("parse");
        assert_eq!(cli.output_mode(), OutputMode::Json);
    }

    #[test]
    fn repair_flags_parse() {
        let cli = Cli::try_parse_from([
            "actg",
            "repair",
            "level.json",
            "--seed",
            "7",
            "--edge-probability",
            "0.25",
            "--max-passes",
            "3",
        ])
        .expect("parse");
        match cli.command {
            Commands::Repair(args) => {
                assert_eq!(args.seed, Some(7));
                assert_eq!(args.max_passes, Some(3));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
