//! CRR CLI - Binomial Lattice Pricing from the Command Line
//!
//! Operational entry point for the CRR lattice pricer.
//!
//! # Commands
//!
//! - `crr price` - Price a European option and compare with Black-Scholes
//! - `crr tree` - Show or export the price and value lattices
//! - `crr converge` - Run a convergence study over a range of step counts
//! - `crr check` - Validate and echo the resolved configuration
//!
//! # Architecture
//!
//! As part of the **S**ervice layer, this crate wires configuration,
//! `pricer_models` and output formatting together. Logs go to stderr so
//! stdout carries only results.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use pricer_core::types::OptionType;
use tracing::{debug, error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod config;
mod error;
mod output;

pub use error::{CliError, Result};

use commands::converge::StepSelection;
use commands::tree::TreeSelection;
use config::{build_config, CliOverrides, OutputFormat};

/// Cox-Ross-Rubinstein binomial option pricer
#[derive(Parser)]
#[command(name = "crr")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path (defaults to ./crr.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Write results to FILE instead of stdout
    #[arg(short, long, global = true, value_name = "FILE")]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Market inputs and output settings shared by every command
#[derive(Args, Debug, Clone, Default)]
struct MarketArgs {
    /// Spot price of the underlying
    #[arg(long)]
    spot: Option<f64>,

    /// Strike price
    #[arg(short = 'k', long)]
    strike: Option<f64>,

    /// Continuously compounded risk-free rate
    #[arg(short, long, allow_hyphen_values = true)]
    rate: Option<f64>,

    /// Annualised volatility
    #[arg(long = "vol", visible_alias = "volatility")]
    volatility: Option<f64>,

    /// Time to expiry in years
    #[arg(short, long, visible_alias = "maturity")]
    expiry: Option<f64>,

    /// Option type (call, put)
    #[arg(short = 't', long = "type")]
    option_type: Option<OptionType>,

    /// Number of lattice time steps
    #[arg(short = 'n', long)]
    steps: Option<usize>,

    /// Output format (table, csv, json)
    #[arg(short, long)]
    format: Option<OutputFormat>,

    /// Decimal places in table output
    #[arg(long)]
    precision: Option<usize>,
}

impl MarketArgs {
    fn overrides(&self, config_file: Option<PathBuf>) -> CliOverrides {
        CliOverrides {
            config_file,
            spot: self.spot,
            strike: self.strike,
            rate: self.rate,
            volatility: self.volatility,
            expiry: self.expiry,
            option_type: self.option_type,
            steps: self.steps,
            format: self.format,
            precision: self.precision,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Price a European option on a CRR lattice
    Price {
        #[command(flatten)]
        market: MarketArgs,
    },

    /// Show or export the stock price and option value lattices
    Tree {
        #[command(flatten)]
        market: MarketArgs,

        /// Which lattice to export
        #[arg(short, long, value_enum, default_value_t = TreeSelection::Both)]
        lattice: TreeSelection,
    },

    /// Compare lattice prices with Black-Scholes over a range of step counts
    Converge {
        #[command(flatten)]
        market: MarketArgs,

        /// First step count of an arithmetic sequence
        #[arg(long, conflicts_with = "steps_list")]
        start: Option<usize>,

        /// Increment between step counts
        #[arg(long, conflicts_with = "steps_list")]
        stride: Option<usize>,

        /// Largest step count (defaults to --steps)
        #[arg(long, conflicts_with = "steps_list")]
        max: Option<usize>,

        /// Explicit comma-separated step counts, e.g. 10,20,50
        #[arg(long, value_delimiter = ',')]
        steps_list: Option<Vec<usize>>,

        /// Evaluate step counts in parallel
        #[arg(short, long)]
        parallel: bool,
    },

    /// Check configuration and lattice parameters
    Check {
        #[command(flatten)]
        market: MarketArgs,
    },
}

impl Commands {
    fn market(&self) -> &MarketArgs {
        match self {
            Commands::Price { market }
            | Commands::Tree { market, .. }
            | Commands::Converge { market, .. }
            | Commands::Check { market } => market,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let overrides = cli.command.market().overrides(cli.config.clone());
    let config = build_config(&overrides, |key| std::env::var(key).ok())?;
    debug!(?config, "Resolved configuration");

    let settings = config.settings()?;

    // Render fully in memory; the output file is untouched on any failure
    let mut rendered = Vec::new();
    match cli.command {
        Commands::Price { .. } => commands::price::run(&settings, &mut rendered)?,
        Commands::Tree { lattice, .. } => {
            commands::tree::run(&settings, lattice, &mut rendered)?
        }
        Commands::Converge {
            start,
            stride,
            max,
            steps_list,
            parallel,
            ..
        } => {
            let selection = StepSelection {
                steps_list,
                start,
                stride,
                max,
                parallel,
            };
            commands::converge::run(&settings, &selection, &mut rendered)?
        }
        Commands::Check { .. } => commands::check::run(&config, &settings, &mut rendered)?,
    }

    output::emit(cli.output.as_deref(), &rendered)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "Command failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
