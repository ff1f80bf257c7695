// Copyright 2026 LabKit Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration management.
//!
//! Configuration is loaded from multiple sources with the following priority
//! (later sources override earlier ones):
//!
//! 1. Built-in defaults
//! 2. labkit.yaml file
//! 3. Environment variables (LABKIT_*)
//! 4. CLI arguments

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::solver::SolverOptions;
use crate::tomography::diagnostics::DEFAULT_CONDITIONING_THRESHOLD;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Reconstruction tolerances and thresholds
    #[serde(default)]
    pub reconstruction: ReconstructionConfig,

    /// Optimization backend settings
    #[serde(default)]
    pub solver: SolverConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file and environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = config_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                config = serde_yaml::from_str(&content)?;
            }
        } else {
            for path in &["labkit.yaml", "labkit.yml", "/etc/labkit/config.yaml"] {
                let path = Path::new(path);
                if path.exists() {
                    let content = std::fs::read_to_string(path)?;
                    config = serde_yaml::from_str(&content)?;
                    break;
                }
            }
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply `LABKIT_*` overrides read through `lookup`.
    ///
    /// Unparseable values are ignored and the current setting is kept.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = parsed(&lookup, "LABKIT_CONDITIONING_THRESHOLD") {
            self.reconstruction.conditioning_threshold = v;
        }
        if let Some(v) = parsed(&lookup, "LABKIT_STOCHASTIC_TOLERANCE") {
            self.reconstruction.stochastic_tolerance = v;
        }
        if let Some(v) = parsed(&lookup, "LABKIT_MAX_ITERATIONS") {
            self.solver.max_iterations = v;
        }
        if let Some(v) = parsed(&lookup, "LABKIT_SOLVER_TOLERANCE") {
            self.solver.tolerance = v;
        }
        if let Some(v) = parsed(&lookup, "LABKIT_SOLVER_TIMEOUT_MS") {
            self.solver.timeout_ms = Some(v);
        }
        if let Some(val) = lookup("LABKIT_LOG_LEVEL") {
            self.logging.level = val;
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        self.reconstruction.validate()?;
        self.solver.validate()
    }
}

fn parsed<T: std::str::FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    lookup(key).and_then(|val| val.parse().ok())
}

/// Reconstruction tolerances and thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconstructionConfig {
    /// Condition number above which a result is flagged ill-conditioned.
    /// The default of 10 suits confusion matrices; tomography design
    /// matrices usually need more (clean two-qubit process data sits near 10.4)
    #[serde(default = "default_conditioning_threshold")]
    pub conditioning_threshold: f64,

    /// Absolute tolerance on confusion-matrix column sums
    #[serde(default = "default_stochastic_tolerance")]
    pub stochastic_tolerance: f64,

    /// Absolute tolerance on |B_ij − conj(B_ji)| for measurement operators
    #[serde(default = "default_hermiticity_tolerance")]
    pub hermiticity_tolerance: f64,
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        Self {
            conditioning_threshold: default_conditioning_threshold(),
            stochastic_tolerance: default_stochastic_tolerance(),
            hermiticity_tolerance: default_hermiticity_tolerance(),
        }
    }
}

impl ReconstructionConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.conditioning_threshold > 0.0) {
            return Err(Error::Config(format!(
                "conditioning_threshold must be > 0, got {}",
                self.conditioning_threshold
            )));
        }
        if !(self.stochastic_tolerance >= 0.0) {
            return Err(Error::Config(format!(
                "stochastic_tolerance must be >= 0, got {}",
                self.stochastic_tolerance
            )));
        }
        if !(self.hermiticity_tolerance >= 0.0) {
            return Err(Error::Config(format!(
                "hermiticity_tolerance must be >= 0, got {}",
                self.hermiticity_tolerance
            )));
        }
        Ok(())
    }
}

fn default_conditioning_threshold() -> f64 {
    DEFAULT_CONDITIONING_THRESHOLD
}

fn default_stochastic_tolerance() -> f64 {
    1e-6
}

fn default_hermiticity_tolerance() -> f64 {
    1e-8
}

/// Optimization backend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Maximum iterations per solve
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,

    /// Relative convergence tolerance
    #[serde(default = "default_solver_tolerance")]
    pub tolerance: f64,

    /// Per-solve deadline in milliseconds (unbounded if absent)
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            tolerance: default_solver_tolerance(),
            timeout_ms: None,
        }
    }
}

impl SolverConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(Error::Config("max_iterations must be > 0".into()));
        }
        if !(self.tolerance > 0.0) {
            return Err(Error::Config(format!(
                "solver tolerance must be > 0, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }

    /// Options handed to the backend on every solve.
    pub fn options(&self) -> SolverOptions {
        SolverOptions {
            max_iterations: self.max_iterations,
            tolerance: self.tolerance,
            timeout: self.timeout_ms.map(Duration::from_millis),
        }
    }
}

fn default_max_iterations() -> usize {
    SolverOptions::default().max_iterations
}

fn default_solver_tolerance() -> f64 {
    SolverOptions::default().tolerance
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (json, pretty)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}
