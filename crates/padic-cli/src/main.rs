use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use padic_cli::commands::{self, BinaryOp};
use padic_cli::{logging, CliConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "padic")]
#[command(about = "Lazy p-adic arithmetic and digit-by-digit equation solving", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Base for literals without a `_<base>` suffix
    #[arg(short, long)]
    base: Option<u32>,

    /// Integer digits to print
    #[arg(short, long)]
    digits: Option<usize>,

    /// Keep leading zeros
    #[arg(long)]
    pad: bool,

    /// Append `_<base>` to printed numbers
    #[arg(long)]
    include_base: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a number and its valuation
    Show {
        #[arg(allow_hyphen_values = true)]
        literal: String,
    },

    /// Add two numbers
    Add {
        #[arg(allow_hyphen_values = true)]
        lhs: String,
        #[arg(allow_hyphen_values = true)]
        rhs: String,
    },

    /// Subtract the second number from the first
    Sub {
        #[arg(allow_hyphen_values = true)]
        lhs: String,
        #[arg(allow_hyphen_values = true)]
        rhs: String,
    },

    /// Multiply two numbers
    Mul {
        #[arg(allow_hyphen_values = true)]
        lhs: String,
        #[arg(allow_hyphen_values = true)]
        rhs: String,
    },

    /// Additive inverse
    Neg {
        #[arg(allow_hyphen_values = true)]
        literal: String,
    },

    /// Valuation and norm of the difference of two numbers
    Distance {
        #[arg(allow_hyphen_values = true)]
        lhs: String,
        #[arg(allow_hyphen_values = true)]
        rhs: String,
    },

    /// Rewrite a finite literal in another base
    Convert {
        #[arg(allow_hyphen_values = true)]
        literal: String,

        /// Target base
        #[arg(long)]
        to: u32,
    },

    /// Solve a * x = b digit by digit
    SolveLinear {
        #[arg(allow_hyphen_values = true)]
        a: String,
        #[arg(allow_hyphen_values = true)]
        b: String,

        /// Number of digits to determine
        #[arg(long, default_value = "10")]
        depth: usize,
    },

    /// Square roots of a number, digit by digit
    Sqrt {
        #[arg(allow_hyphen_values = true)]
        a: String,

        /// Number of digits to determine
        #[arg(long, default_value = "10")]
        depth: usize,
    },

    /// Write the effective configuration to a file
    Init {
        /// Output file
        #[arg(short, long, default_value = padic_cli::DEFAULT_CONFIG_FILE)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority order: CLI args > ENV vars > Config file > Defaults
    let mut config = CliConfig::load(cli.config.as_deref())?;
    if let Some(base) = cli.base {
        config.display.base = base;
    }
    if let Some(digits) = cli.digits {
        config.display.digits = digits;
    }
    config.display.pad |= cli.pad;
    config.display.include_base |= cli.include_base;

    if let Err(e) = logging::init_logging(&config.logging, cli.verbose) {
        eprintln!("Failed to initialize logging: {}", e);
        // Fall back to basic logging
        let log_level = logging::effective_level(&config.logging, cli.verbose);
        tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::new(
                std::env::var("RUST_LOG").unwrap_or_else(|_| format!("padic={}", log_level)),
            ))
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let output = match cli.command {
        Commands::Show { literal } => commands::show(&config, &literal)?,
        Commands::Add { lhs, rhs } => commands::binary(&config, BinaryOp::Add, &lhs, &rhs)?,
        Commands::Sub { lhs, rhs } => commands::binary(&config, BinaryOp::Sub, &lhs, &rhs)?,
        Commands::Mul { lhs, rhs } => commands::binary(&config, BinaryOp::Mul, &lhs, &rhs)?,
        Commands::Neg { literal } => commands::negation(&config, &literal)?,
        Commands::Distance { lhs, rhs } => commands::distance(&config, &lhs, &rhs)?,
        Commands::Convert { literal, to } => commands::convert(&config, &literal, to)?,
        Commands::SolveLinear { a, b, depth } => commands::solve_linear(&config, &a, &b, depth)?,
        Commands::Sqrt { a, depth } => commands::sqrt(&config, &a, depth)?,
        Commands::Init { output } => {
            info!(output = ?output, "Writing configuration");
            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            config
                .save_to_file(&output)
                .with_context(|| format!("writing {}", output.display()))?;
            format!("Configuration written to {}", output.display())
        }
    };

    println!("{}", output);
    Ok(())
}
