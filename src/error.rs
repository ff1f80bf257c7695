// Copyright 2026 LabKit Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error types for reconstruction.

use std::fmt;

/// Result type alias for reconstruction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Reconstruction error types.
///
/// Every variant except [`Error::Solver`] is raised before the optimization
/// backend is invoked.
#[derive(Debug)]
pub enum Error {
    /// Structural precondition violated (dimensions, lengths)
    Shape(String),
    /// Physical invariant of an input violated (stochastic columns, Hermiticity)
    Constraint(String),
    /// Optimization backend failure
    Solver(SolverFailure),
    /// Configuration error
    Config(String),
    /// IO error
    Io(std::io::Error),
    /// Serialization error
    Serialization(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Shape(msg) => write!(f, "Shape error: {}", msg),
            Error::Constraint(msg) => write!(f, "Constraint violated: {}", msg),
            Error::Solver(e) => write!(f, "Solver failure: {}", e),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Solver(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<SolverFailure> for Error {
    fn from(e: SolverFailure) -> Self {
        Error::Solver(e)
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// Failure reported by an optimization backend.
#[derive(Debug, Clone, PartialEq)]
pub enum SolverFailure {
    /// The feasible set is empty
    Infeasible(String),
    /// The objective is unbounded below on the feasible set
    Unbounded(String),
    /// Internal backend error (malformed problem, non-finite iterates)
    SolverError(String),
    /// The caller-supplied deadline elapsed
    Timeout(String),
}

impl SolverFailure {
    /// Short machine-readable status name.
    pub fn status(&self) -> &'static str {
        match self {
            SolverFailure::Infeasible(_) => "infeasible",
            SolverFailure::Unbounded(_) => "unbounded",
            SolverFailure::SolverError(_) => "solver_error",
            SolverFailure::Timeout(_) => "timeout",
        }
    }
}

impl fmt::Display for SolverFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverFailure::Infeasible(msg) => write!(f, "Infeasible: {}", msg),
            SolverFailure::Unbounded(msg) => write!(f, "Unbounded: {}", msg),
            SolverFailure::SolverError(msg) => write!(f, "Solver error: {}", msg),
            SolverFailure::Timeout(msg) => write!(f, "Timeout: {}", msg),
        }
    }
}

impl std::error::Error for SolverFailure {}
