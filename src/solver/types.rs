// Copyright 2026 LabKit Contributors
// SPDX-License-Identifier: Apache-2.0

//! Problem, option and solution types exchanged with optimization backends.

use std::time::Duration;

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::SolverFailure;

/// Feasible set of a least-squares problem.
///
/// Matrix-valued sets act on the column-major vectorization of an n×n
/// matrix, so the variable has n² entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeasibleSet {
    /// Real x with 0 ≤ x ≤ 1 and Σx = 1.
    ProbabilitySimplex { dim: usize },
    /// Hermitian X ⪰ 0 with tr X = 1.
    DensityMatrices { dim: usize },
    /// Hermitian X ⪰ 0.
    PsdCone { dim: usize },
}

impl FeasibleSet {
    /// Number of (complex) entries in the optimization variable.
    pub fn num_variables(&self) -> usize {
        match *self {
            FeasibleSet::ProbabilitySimplex { dim } => dim,
            FeasibleSet::DensityMatrices { dim } | FeasibleSet::PsdCone { dim } => dim * dim,
        }
    }

    /// Side length of the set's vector or matrix.
    pub fn dim(&self) -> usize {
        match *self {
            FeasibleSet::ProbabilitySimplex { dim }
            | FeasibleSet::DensityMatrices { dim }
            | FeasibleSet::PsdCone { dim } => dim,
        }
    }

    /// A feasible starting point: the uniform distribution, the maximally
    /// mixed state, or the zero matrix.
    pub fn initial_point(&self) -> Array1<Complex64> {
        match *self {
            FeasibleSet::ProbabilitySimplex { dim } => {
                Array1::from_elem(dim, Complex64::new(1.0 / dim as f64, 0.0))
            }
            FeasibleSet::DensityMatrices { dim } => {
                let mut x = Array1::zeros(dim * dim);
                for i in 0..dim {
                    x[i + i * dim] = Complex64::new(1.0 / dim as f64, 0.0);
                }
                x
            }
            FeasibleSet::PsdCone { dim } => Array1::zeros(dim * dim),
        }
    }
}

impl std::fmt::Display for FeasibleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeasibleSet::ProbabilitySimplex { dim } => write!(f, "probability simplex ({dim})"),
            FeasibleSet::DensityMatrices { dim } => write!(f, "density matrices ({dim}×{dim})"),
            FeasibleSet::PsdCone { dim } => write!(f, "PSD cone ({dim}×{dim})"),
        }
    }
}

/// minimize ‖Re(A·x) − b‖² subject to x ∈ feasible set.
///
/// Only the real part of the residual enters the objective: observations are
/// physical (real) quantities.
#[derive(Debug, Clone)]
pub struct LeastSquaresProblem {
    /// Design matrix A (rows × variables).
    pub design: Array2<Complex64>,
    /// Observation vector b.
    pub observations: Array1<f64>,
    /// Constraint set for x.
    pub feasible_set: FeasibleSet,
    /// σ_max(A) when the caller already knows it; backends compute it
    /// otherwise.
    pub spectral_norm: Option<f64>,
}

impl LeastSquaresProblem {
    pub fn new(
        design: Array2<Complex64>,
        observations: Array1<f64>,
        feasible_set: FeasibleSet,
    ) -> Self {
        Self {
            design,
            observations,
            feasible_set,
            spectral_norm: None,
        }
    }

    /// Attach a precomputed σ_max(A).
    pub fn with_spectral_norm(mut self, spectral_norm: f64) -> Self {
        self.spectral_norm = Some(spectral_norm);
        self
    }

    /// Check that the problem is well formed.
    pub fn validate(&self) -> Result<(), SolverFailure> {
        if self.design.nrows() != self.observations.len() {
            return Err(SolverFailure::SolverError(format!(
                "design has {} rows but {} observations were given",
                self.design.nrows(),
                self.observations.len()
            )));
        }
        if self.design.ncols() != self.feasible_set.num_variables() {
            return Err(SolverFailure::SolverError(format!(
                "design has {} columns but the {} has {} variables",
                self.design.ncols(),
                self.feasible_set,
                self.feasible_set.num_variables()
            )));
        }
        if self.observations.iter().any(|b| !b.is_finite()) {
            return Err(SolverFailure::SolverError(
                "observations contain non-finite values".into(),
            ));
        }
        if let Some(norm) = self.spectral_norm {
            if !norm.is_finite() || norm < 0.0 {
                return Err(SolverFailure::SolverError(format!(
                    "spectral norm must be finite and non-negative, got {}",
                    norm
                )));
            }
        }
        Ok(())
    }

    /// Real residual Re(A·x) − b.
    pub fn residual(&self, x: &Array1<Complex64>) -> Array1<f64> {
        let ax = self.design.dot(x);
        ax.iter()
            .zip(self.observations.iter())
            .map(|(z, b)| z.re - b)
            .collect()
    }

    /// Objective value ‖Re(A·x) − b‖².
    pub fn objective(&self, x: &Array1<Complex64>) -> f64 {
        self.residual(x).iter().map(|r| r * r).sum()
    }
}

/// Options passed through to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOptions {
    /// Iteration cap.
    pub max_iterations: usize,
    /// Relative convergence tolerance.
    pub tolerance: f64,
    /// Wall-clock limit for a single solve.
    pub timeout: Option<Duration>,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            max_iterations: 20_000,
            tolerance: 1e-10,
            timeout: None,
        }
    }
}

/// Termination status of a successful solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    /// Converged to the requested tolerance.
    Optimal,
    /// Stopped at the iteration cap; the point is feasible but not certified.
    Inaccurate,
}

/// Solution returned by a backend.
#[derive(Debug, Clone)]
pub struct Solution {
    /// Optimal variable (column-major vectorization for matrix sets).
    pub x: Array1<Complex64>,
    /// Achieved objective ‖Re(A·x) − b‖².
    pub objective: f64,
    /// Iterations performed.
    pub iterations: usize,
    /// Termination status.
    pub status: SolveStatus,
}
