//! zygon - command-line entry point for the Zygon interpreter.
//!
//! A thin wrapper over `zygon-eval`: it resolves a `.zygon` path, hands it
//! to `Evaluator::run_file`, and turns a hard error into a nonzero exit
//! code. All interpreter semantics live in `zygon-lex`/`zygon-par`/
//! `zygon-eval`; this binary owns none of them.

mod error;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use error::{CliError, Result};

#[derive(Parser, Debug)]
#[command(name = "zygon")]
#[command(author = "Zygon Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run Zygon (.zygon) source files", long_about = None)]
struct Cli {
    /// Enable verbose (debug-level) tracing output.
    #[arg(short, long, global = true, env = "ZYGON_VERBOSE")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Execute a `.zygon` source file.
    Run(RunCommand),
}

#[derive(Parser, Debug)]
struct RunCommand {
    /// Path to the `.zygon` file to execute.
    path: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run(args) => run(&args.path),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_thread_ids(false))
        .try_init();
}

fn run(path: &PathBuf) -> ExitCode {
    match execute(path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn execute(path: &PathBuf) -> Result<()> {
    tracing::info!(path = %path.display(), "running zygon source file");
    zygon_eval::Evaluator::run_file(path).map_err(CliError::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_subcommand_with_path() {
        let cli = Cli::parse_from(["zygon", "run", "main.zygon"]);
        match cli.command {
            Commands::Run(args) => assert_eq!(args.path, PathBuf::from("main.zygon")),
        }
    }

    #[test]
    fn parses_global_verbose_flag() {
        let cli = Cli::parse_from(["zygon", "--verbose", "run", "main.zygon"]);
        assert!(cli.verbose);
    }
}
