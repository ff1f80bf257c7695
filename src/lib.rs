// Copyright 2026 LabKit Contributors
// SPDX-License-Identifier: Apache-2.0

//! LabKit reconstruction core
//!
//! This crate recovers physically valid quantities from noisy linear
//! measurements: probability distributions from confused readout, density
//! matrices from expectation values, and process matrices from input/output
//! state pairs.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              labkit CLI                  │
//! ├─────────────────────────────────────────┤
//! │   Reconstructor (validation, assembly,   │
//! │   conditioning diagnostics)              │
//! ├──────────────┬─────────────┬────────────┤
//! │ Deconfusion  │ State tomo  │ Process    │
//! ├──────────────┴─────────────┴────────────┤
//! │     ConvexSolver (projected gradient)    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration management
//! - [`tomography`]: Reconstruction routines and diagnostics
//! - [`solver`]: Optimization backend trait and built-in backend
//! - [`validation`]: Input validation utilities
//! - [`input`]: JSON input and output documents for the CLI
//! - [`error`]: Error types

pub mod config;
pub mod error;
pub mod input;
pub mod linalg;
pub mod solver;
pub mod tomography;
pub mod validation;

pub use config::Config;
pub use error::{Error, Result, SolverFailure};
pub use solver::{ConvexSolver, ProjectedGradientSolver, SerializedSolver};
pub use tomography::{ReconstructionResult, Reconstructor};

#[cfg(test)]
pub mod test_utils;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
