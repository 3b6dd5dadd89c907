//! # rental-returns
//!
//! ```text
//! rental-returns [--config <path>] [--pretty] calculate --input return.json
//! rental-returns [--config <path>] [--pretty] summary   --input -
//! rental-returns [--config <path>] rules [--init]
//! ```
//!
//! Results go to stdout, logs to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rental_returns::commands::{calculate_line, read_input, render_json, summarize_return};
use rental_returns::config::{load_rules, render_rules, save_rules};
use rental_returns::error::CliResult;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "rental-returns",
    about = "Settle rental returns: late fees, cleaning, damage and deposit refunds",
    version
)]
struct Cli {
    /// Rules file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Indent JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Settle one return line
    Calculate {
        /// Request file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: PathBuf,
    },
    /// Settle a multi-line return and print the review totals
    Summary {
        /// Request file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: PathBuf,
    },
    /// Print the effective business rules
    Rules {
        /// Write the effective rules to the config file
        #[arg(long)]
        init: bool,
    },
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let rules = load_rules(cli.config.clone())?;

    match cli.command {
        Command::Calculate { input } => {
            let report = calculate_line(&read_input(&input)?, &rules)?;
            println!("{}", render_json(&report, cli.pretty)?);
        }
        Command::Summary { input } => {
            let settlement = summarize_return(&read_input(&input)?, &rules)?;
            info!(
                lines = settlement.lines.len(),
                return_type = ?settlement.return_type,
                "Return settled"
            );
            println!("{}", render_json(&settlement, cli.pretty)?);
        }
        Command::Rules { init: true } => {
            let path = save_rules(&rules, cli.config)?;
            println!("{}", path.display());
        }
        Command::Rules { init: false } => {
            print!("{}", render_rules(&rules)?);
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays machine-readable.
///
/// - Default: INFO
/// - `RUST_LOG=rental_core=debug` - per-calculation detail
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
