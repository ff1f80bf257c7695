// Copyright 2026 LabKit Contributors
// SPDX-License-Identifier: Apache-2.0

//! Constrained linear inversion for readout and tomography data.
//!
//! All three routines follow the same pipeline:
//!
//! 1. validate shapes and physical preconditions of the inputs,
//! 2. assemble a linear map from the column-major vectorization,
//! 3. assess the map's conditioning,
//! 4. hand a least-squares problem over the physical feasible set to the
//!    optimization backend,
//! 5. reshape the optimum and attach diagnostics.
//!
//! # Modules
//!
//! - [`deconfusion`]: readout confusion correction onto the probability simplex
//! - [`state`]: density-matrix reconstruction from expectation values
//! - [`process`]: χ-matrix reconstruction from input/output state pairs
//! - [`diagnostics`]: condition numbers and ill-conditioning classification
//! - [`vectorize`]: the shared flattening convention
//! - [`operators`]: Pauli operators and forward models

pub mod deconfusion;
pub mod diagnostics;
pub mod operators;
pub mod process;
pub mod reconstructor;
pub mod state;
pub mod types;
pub mod vectorize;

pub use diagnostics::{
    condition_and_norm, condition_number, Conditioning, ConditioningClass, IllConditionedWarning,
    DEFAULT_CONDITIONING_THRESHOLD,
};
pub use operators::{apply_process, expectation_values, pauli_basis};
pub use process::process_design_matrix;
pub use reconstructor::Reconstructor;
pub use state::state_design_matrix;
pub use types::{ReconstructionResult, SolverReport};
pub use vectorize::{unvectorize, vectorize, vectorize_basis};
