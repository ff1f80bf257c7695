// Copyright 2026 LabKit Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared test utilities for reconstruction tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use ndarray::Array2;
use num_complex::Complex64;

use crate::error::SolverFailure;
use crate::solver::{
    ConvexSolver, LeastSquaresProblem, ProjectedGradientSolver, Solution, SolverOptions,
};
use crate::tomography::operators::{identity, pauli_x, pauli_y, pauli_z};

/// Mock backend that counts invocations and delegates to the built-in solver.
#[derive(Debug, Default)]
pub struct CountingSolver {
    calls: AtomicUsize,
    inner: ProjectedGradientSolver,
}

impl CountingSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ConvexSolver for CountingSolver {
    fn name(&self) -> &str {
        "counting"
    }

    fn solve(
        &self,
        problem: &LeastSquaresProblem,
        options: &SolverOptions,
    ) -> Result<Solution, SolverFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.solve(problem, options)
    }
}

/// Mock backend that always fails with the given status.
#[derive(Debug)]
pub struct FailingSolver {
    failure: SolverFailure,
}

impl FailingSolver {
    pub fn new(failure: SolverFailure) -> Self {
        Self { failure }
    }
}

impl ConvexSolver for FailingSolver {
    fn name(&self) -> &str {
        "failing"
    }

    fn solve(
        &self,
        _problem: &LeastSquaresProblem,
        _options: &SolverOptions,
    ) -> Result<Solution, SolverFailure> {
        Err(self.failure.clone())
    }
}

/// Mock backend that records whether two solves ever ran at the same time.
#[derive(Debug, Default)]
pub struct ExclusiveSolver {
    calls: AtomicUsize,
    busy: AtomicBool,
    overlapped: AtomicBool,
    inner: ProjectedGradientSolver,
}

impl ExclusiveSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn overlapped(&self) -> bool {
        self.overlapped.load(Ordering::SeqCst)
    }
}

impl ConvexSolver for ExclusiveSolver {
    fn name(&self) -> &str {
        "exclusive"
    }

    fn solve(
        &self,
        problem: &LeastSquaresProblem,
        options: &SolverOptions,
    ) -> Result<Solution, SolverFailure> {
        if self.busy.swap(true, Ordering::SeqCst) {
            self.overlapped.store(true, Ordering::SeqCst);
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Widen the window in which an unserialized caller would collide
        std::thread::sleep(Duration::from_millis(2));
        let result = self.inner.solve(problem, options);
        self.busy.store(false, Ordering::SeqCst);
        result
    }
}

/// Single-qubit state with Bloch vector (x, y, z): (I + xX + yY + zZ) / 2.
pub fn bloch_state(x: f64, y: f64, z: f64) -> Array2<Complex64> {
    let mut rho = identity(2);
    rho.scaled_add(Complex64::new(x, 0.0), &pauli_x());
    rho.scaled_add(Complex64::new(y, 0.0), &pauli_y());
    rho.scaled_add(Complex64::new(z, 0.0), &pauli_z());
    rho.mapv_inplace(|v| v * 0.5);
    rho
}

/// |0⟩, |1⟩, |+⟩ and |+i⟩: their density matrices span the 2×2 matrices.
pub fn informationally_complete_inputs() -> Vec<Array2<Complex64>> {
    vec![
        bloch_state(0.0, 0.0, 1.0),
        bloch_state(0.0, 0.0, -1.0),
        bloch_state(1.0, 0.0, 0.0),
        bloch_state(0.0, 1.0, 0.0),
    ]
}
