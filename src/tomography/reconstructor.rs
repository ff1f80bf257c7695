// Copyright 2026 LabKit Contributors
// SPDX-License-Identifier: Apache-2.0

//! Entry point shared by the three reconstruction routines.

use std::time::Duration;

use tracing::{debug, warn};

use super::diagnostics::Conditioning;
use super::types::SolverReport;
use crate::config::{Config, ReconstructionConfig};
use crate::error::Result;
use crate::solver::{
    ConvexSolver, LeastSquaresProblem, ProjectedGradientSolver, Solution, SolveStatus,
    SolverOptions,
};

/// Runs reconstructions against an optimization backend.
///
/// A `Reconstructor` holds only immutable settings and a backend handle;
/// every call builds its own problem, so one instance can serve concurrent
/// callers as long as the backend is `Sync` (see
/// [`SerializedSolver`](crate::solver::SerializedSolver) otherwise).
///
/// `Reconstructor::default()` flags κ > 10, which is tuned for confusion
/// matrices. For multi-qubit state or process tomography pass a
/// [`ReconstructionConfig`] with a higher `conditioning_threshold`.
///
/// # Example
///
/// ```ignore
/// use labkit_core::tomography::Reconstructor;
/// use ndarray::array;
///
/// let reconstructor = Reconstructor::default();
/// let c = array![[0.95, 0.05], [0.05, 0.95]];
/// let result = reconstructor.deconfuse(&c, &array![0.4, 0.6])?;
/// assert!(!result.conditioning.is_ill_conditioned());
/// ```
#[derive(Debug, Clone)]
pub struct Reconstructor<S = ProjectedGradientSolver> {
    config: ReconstructionConfig,
    options: SolverOptions,
    solver: S,
}

impl Default for Reconstructor<ProjectedGradientSolver> {
    fn default() -> Self {
        Self {
            config: ReconstructionConfig::default(),
            options: SolverOptions::default(),
            solver: ProjectedGradientSolver::new(),
        }
    }
}

impl Reconstructor<ProjectedGradientSolver> {
    /// Create a reconstructor using the built-in backend.
    pub fn new(config: ReconstructionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Default::default()
        })
    }

    /// Create a reconstructor from a full configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config: config.reconstruction.clone(),
            options: config.solver.options(),
            solver: ProjectedGradientSolver::new(),
        })
    }
}

impl<S: ConvexSolver> Reconstructor<S> {
    /// Replace the optimization backend.
    pub fn with_solver<T: ConvexSolver>(self, solver: T) -> Reconstructor<T> {
        Reconstructor {
            config: self.config,
            options: self.options,
            solver,
        }
    }

    /// Replace the options passed to the backend.
    pub fn with_options(mut self, options: SolverOptions) -> Self {
        self.options = options;
        self
    }

    /// Set a per-solve deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    pub fn config(&self) -> &ReconstructionConfig {
        &self.config
    }

    pub fn options(&self) -> &SolverOptions {
        &self.options
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    /// Classify a condition number against the configured threshold and log
    /// the warning if it is exceeded.
    pub(crate) fn assess(&self, what: &str, condition_number: f64) -> Conditioning {
        let conditioning = Conditioning::assess(condition_number, self.config.conditioning_threshold);
        if let Some(warning) = conditioning.warning() {
            warn!(
                matrix = what,
                condition_number,
                threshold = self.config.conditioning_threshold,
                "{}",
                warning
            );
        }
        conditioning
    }

    /// Hand a validated problem to the backend.
    pub(crate) fn dispatch(&self, problem: &LeastSquaresProblem) -> Result<(Solution, SolverReport)> {
        debug!(
            backend = self.solver.name(),
            feasible_set = %problem.feasible_set,
            rows = problem.design.nrows(),
            variables = problem.design.ncols(),
            "Dispatching least-squares problem"
        );

        let solution = self.solver.solve(problem, &self.options)?;

        if solution.status == SolveStatus::Inaccurate {
            warn!(
                backend = self.solver.name(),
                iterations = solution.iterations,
                objective = solution.objective,
                "Solver stopped at the iteration cap before reaching tolerance"
            );
        } else {
            debug!(
                iterations = solution.iterations,
                objective = solution.objective,
                "Solve converged"
            );
        }

        let report = SolverReport::new(self.solver.name(), &solution);
        Ok((solution, report))
    }
}
