// Copyright 2026 LabKit Contributors
// SPDX-License-Identifier: Apache-2.0

//! Optimization backend trait definition.

use std::sync::Arc;

use parking_lot::Mutex;

use super::types::{LeastSquaresProblem, Solution, SolverOptions};
use crate::error::SolverFailure;

/// The trait that all convex optimization backends must implement.
///
/// A backend minimizes ‖Re(A·x) − b‖² over one of the supported feasible
/// sets and either returns an optimal point or a typed failure.
pub trait ConvexSolver: Send + Sync {
    /// Get the backend name.
    fn name(&self) -> &str;

    /// Solve a constrained least-squares problem.
    fn solve(
        &self,
        problem: &LeastSquaresProblem,
        options: &SolverOptions,
    ) -> Result<Solution, SolverFailure>;
}

impl<S: ConvexSolver + ?Sized> ConvexSolver for Arc<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(
        &self,
        problem: &LeastSquaresProblem,
        options: &SolverOptions,
    ) -> Result<Solution, SolverFailure> {
        (**self).solve(problem, options)
    }
}

impl<S: ConvexSolver + ?Sized> ConvexSolver for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn solve(
        &self,
        problem: &LeastSquaresProblem,
        options: &SolverOptions,
    ) -> Result<Solution, SolverFailure> {
        (**self).solve(problem, options)
    }
}

/// Wraps a backend so that at most one solve runs at a time on this handle.
///
/// Use this when a backend instance is shared between threads but is not
/// itself reentrant.
pub struct SerializedSolver<S> {
    inner: S,
    gate: Mutex<()>,
}

impl<S: ConvexSolver> SerializedSolver<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            gate: Mutex::new(()),
        }
    }

    /// The wrapped backend.
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: ConvexSolver> ConvexSolver for SerializedSolver<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn solve(
        &self,
        problem: &LeastSquaresProblem,
        options: &SolverOptions,
    ) -> Result<Solution, SolverFailure> {
        let _guard = self.gate.lock();
        self.inner.solve(problem, options)
    }
}
