// Copyright 2026 LabKit Contributors
// SPDX-License-Identifier: Apache-2.0

//! Convex optimization backends.
//!
//! Reconstruction routines never talk to a concrete optimizer: they build a
//! [`LeastSquaresProblem`] and hand it to a [`ConvexSolver`]. The crate ships
//! [`ProjectedGradientSolver`]; other backends plug in through the trait.
//!
//! # Modules
//!
//! - [`r#trait`]: Backend trait and the [`SerializedSolver`] critical-section wrapper
//! - [`types`]: Problem, options and solution types
//! - [`projection`]: Projections onto the simplex, density matrices and PSD cone
//! - [`projected_gradient`]: FISTA backend

pub mod projected_gradient;
pub mod projection;
pub mod r#trait;
pub mod types;

pub use projected_gradient::ProjectedGradientSolver;
pub use r#trait::{ConvexSolver, SerializedSolver};
pub use types::{FeasibleSet, LeastSquaresProblem, Solution, SolveStatus, SolverOptions};
