// Copyright 2026 LabKit Contributors
// SPDX-License-Identifier: Apache-2.0

//! Reconstruction result types.

use serde::{Deserialize, Serialize};

use super::diagnostics::{Conditioning, IllConditionedWarning};
use crate::solver::{Solution, SolveStatus};

/// Backend bookkeeping for one solve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverReport {
    /// Backend name.
    pub backend: String,
    /// Termination status.
    pub status: SolveStatus,
    /// Iterations performed.
    pub iterations: usize,
}

impl SolverReport {
    pub fn new(backend: &str, solution: &Solution) -> Self {
        Self {
            backend: backend.to_string(),
            status: solution.status,
            iterations: solution.iterations,
        }
    }
}

/// Result of a reconstruction.
#[derive(Debug, Clone)]
pub struct ReconstructionResult<T> {
    /// Recovered probability vector, density matrix or process matrix.
    pub value: T,
    /// Achieved objective (residual sum of squares).
    pub residual: f64,
    /// Conditioning of the confusion/design matrix.
    pub conditioning: Conditioning,
    /// Backend report.
    pub solver: SolverReport,
}

impl<T> ReconstructionResult<T> {
    /// Warning attached when the linear map is ill-conditioned.
    pub fn warning(&self) -> Option<IllConditionedWarning> {
        self.conditioning.warning()
    }

    /// True when the map is well conditioned and the backend converged.
    pub fn is_reliable(&self) -> bool {
        !self.conditioning.is_ill_conditioned() && self.solver.status == SolveStatus::Optimal
    }

    /// Transform the value, keeping the diagnostics.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ReconstructionResult<U> {
        ReconstructionResult {
            value: f(self.value),
            residual: self.residual,
            conditioning: self.conditioning,
            solver: self.solver,
        }
    }
}
