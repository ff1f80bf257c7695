// Copyright 2026 LabKit Contributors
// SPDX-License-Identifier: Apache-2.0

//! LabKit reconstruction CLI
//!
//! Runs a single reconstruction on a JSON input document and prints the
//! result as JSON.
//!
//! # Usage
//!
//! ```bash
//! # Correct readout confusion
//! labkit deconfuse readout.json
//!
//! # Reconstruct a density matrix
//! labkit state --config lab.yaml state.json
//!
//! # Reconstruct a process matrix (Pauli basis unless given)
//! labkit process process.json
//!
//! # Show effective configuration
//! labkit config
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use labkit_core::input::{
    load_json, real_matrix, ComplexMatrix, DeconfusionInput, ProcessInput, ReconstructionOutput,
    StateInput,
};
use labkit_core::{Config, Reconstructor, Result, VERSION};

/// LabKit reconstruction core
#[derive(Parser)]
#[command(name = "labkit")]
#[command(author = "LabKit Contributors")]
#[command(version = VERSION)]
#[command(about = "Constrained linear inversion for readout and tomography data")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Condition number above which results are flagged
    #[arg(long, global = true, env = "LABKIT_CONDITIONING_THRESHOLD")]
    conditioning_threshold: Option<f64>,

    /// Iteration cap per solve
    #[arg(long, global = true, env = "LABKIT_MAX_ITERATIONS")]
    max_iterations: Option<usize>,

    /// Per-solve deadline in milliseconds
    #[arg(long, global = true, env = "LABKIT_SOLVER_TIMEOUT_MS")]
    timeout_ms: Option<u64>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recover true outcome probabilities from confused readout
    Deconfuse {
        /// JSON file with `confusion` and `p_measured`
        input: PathBuf,
    },

    /// Reconstruct a density matrix from expectation values
    State {
        /// JSON file with `measurement_bases` and `values`
        input: PathBuf,
    },

    /// Reconstruct a process matrix from input/output state pairs
    Process {
        /// JSON file with `rho_before`, `rho_after` and optional `expand_basis`
        input: PathBuf,
    },

    /// Show effective configuration
    Config,

    /// Validate configuration file
    Validate,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!(error = %e, "Reconstruction failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let mut config = Config::load(cli.config.as_deref())?;

    // Override config with CLI args
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(threshold) = cli.conditioning_threshold {
        config.reconstruction.conditioning_threshold = threshold;
    }
    if let Some(max_iterations) = cli.max_iterations {
        config.solver.max_iterations = max_iterations;
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.solver.timeout_ms = Some(timeout_ms);
    }

    init_logging(&config);

    match cli.command {
        Commands::Deconfuse { input } => {
            let reconstructor = Reconstructor::from_config(&config)?;
            let doc: DeconfusionInput = read_input(&input)?;
            let confusion = real_matrix("confusion", &doc.confusion)?;
            let p_measured = ndarray::Array1::from(doc.p_measured);

            let result = reconstructor.deconfuse(&confusion, &p_measured)?;
            emit(
                &ReconstructionOutput::from_result(result, |p| p.to_vec()),
                cli.pretty,
            )?;
        }

        Commands::State { input } => {
            let reconstructor = Reconstructor::from_config(&config)?;
            let doc: StateInput = read_input(&input)?;

            let result = reconstructor.state_tomography(&doc.bases()?, &doc.values)?;
            emit(
                &ReconstructionOutput::from_result(result, |rho| ComplexMatrix::from_array(&rho)),
                cli.pretty,
            )?;
        }

        Commands::Process { input } => {
            let reconstructor = Reconstructor::from_config(&config)?;
            let doc: ProcessInput = read_input(&input)?;
            let (before, after) = doc.states()?;
            let dim = before.first().map_or(0, |rho| rho.nrows());
            let basis = doc.basis(dim)?;

            let result = reconstructor.process_tomography(&before, &after, &basis)?;
            emit(
                &ReconstructionOutput::from_result(result, |chi| ComplexMatrix::from_array(&chi)),
                cli.pretty,
            )?;
        }

        Commands::Config => {
            // Show effective configuration
            println!("{}", serde_yaml::to_string(&config)?);
        }

        Commands::Validate => {
            // Validate configuration
            match config.validate() {
                Ok(()) => {
                    println!("Configuration is valid");
                }
                Err(e) => {
                    eprintln!("Configuration error: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

fn read_input<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    info!(version = VERSION, input = %path.display(), "Reading input");
    load_json(path)
}

fn emit<T: Serialize>(output: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(output)?
    } else {
        serde_json::to_string(output)?
    };
    println!("{}", json);
    Ok(())
}

/// Initialize logging with tracing.
///
/// Logs go to stderr so that stdout carries only the JSON result.
fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
