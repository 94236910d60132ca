mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::carryforward::CarryforwardArgs;
use commands::liability::LiabilityArgs;
use commands::population::PopulationArgs;

/// Corporate income tax microsimulation
#[derive(Parser)]
#[command(
    name = "citsim",
    version,
    about = "Corporate income tax microsimulation",
    long_about = "Runs entity records through the corporate income tax pipeline: \
                  classification, depreciation, profit adjustment, loss carryforward, \
                  behavioral response, excess tax and final liability. All arithmetic \
                  is decimal."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Policy parameter file (.json, .yaml or .yml); defaults to current law
    #[arg(long, global = true)]
    policy: Option<String>,

    /// Log to stderr. Repeat for more detail (-v, -vv); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute CIT liability for one entity record
    Liability(LiabilityArgs),
    /// Compute CIT liability for a population of records
    Population(PopulationArgs),
    /// Run the loss carryforward engine on its own
    Carryforward(CarryforwardArgs),
    /// Print the default policy parameters
    DefaultPolicy,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("citsim_core=info,citsim=info"),
        _ => EnvFilter::new("citsim_core=debug,citsim=debug"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let policy_path = cli.policy.as_deref();
    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Liability(args) => commands::liability::run_liability(args, policy_path),
        Commands::Population(args) => commands::population::run_population(args, policy_path),
        Commands::Carryforward(args) => {
            commands::carryforward::run_carryforward(args, policy_path)
        }
        Commands::DefaultPolicy => commands::policy::run_default_policy(),
        Commands::Version => {
            println!("citsim {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
