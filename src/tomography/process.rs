// Copyright 2026 LabKit Contributors
// SPDX-License-Identifier: Apache-2.0

//! Quantum process tomography.
//!
//! A channel is written in an operator basis {E_m} (N² operators spanning
//! the N×N matrices) as
//!
//!   ε(ρ) = Σ_mn χ_mn E_m ρ E_n†,
//!
//! which is linear in the N²×N² process matrix χ. Each input state ρ_l then
//! contributes N² linear equations relating vec(χ) to vec(ε(ρ_l)):
//!
//!   vec(ε(ρ_l))[i + j·N] = Σ_mn (E_m ρ_l E_n†)_ij · vec(χ)[m + n·N²].
//!
//! The design matrix stacks these blocks in input order, so its row index is
//! l·N² + i + j·N and its column index is m + n·N². Both sides use the
//! crate-wide column-major convention. Getting either index order wrong
//! encodes a different channel without any numerical symptom, which is what
//! the identity and bit-flip tests below pin down.

use ndarray::{Array1, Array2};
use num_complex::Complex64;

use super::diagnostics::condition_and_norm;
use super::reconstructor::Reconstructor;
use super::types::ReconstructionResult;
use super::vectorize::{unvectorize, vectorize};
use crate::error::{Error, Result};
use crate::linalg::conjugate_transpose;
use crate::solver::{ConvexSolver, FeasibleSet, LeastSquaresProblem};
use crate::validation;

/// Build the (k·N²) × N⁴ design matrix for the given inputs and basis.
///
/// # Errors
/// `Shape` if there are no inputs, any input or basis operator is not N×N,
/// or the basis does not hold exactly N² operators.
pub fn process_design_matrix(
    rho_before: &[Array2<Complex64>],
    expand_basis: &[Array2<Complex64>],
) -> Result<Array2<Complex64>> {
    let first = rho_before
        .first()
        .ok_or_else(|| Error::Shape("field 'rho_before': must not be empty".into()))?;
    let n = validation::require_square("rho_before[0]", first)?;
    for (l, rho) in rho_before.iter().enumerate() {
        validation::require_dim(&format!("rho_before[{l}]"), rho, n)?;
    }
    validation::require_len("expand_basis", expand_basis.len(), n * n)?;
    for (m, e) in expand_basis.iter().enumerate() {
        validation::require_dim(&format!("expand_basis[{m}]"), e, n)?;
    }

    let n2 = n * n;
    let daggers: Vec<_> = expand_basis.iter().map(conjugate_transpose).collect();

    let mut design = Array2::zeros((rho_before.len() * n2, n2 * n2));
    for (l, rho) in rho_before.iter().enumerate() {
        for (m, e_m) in expand_basis.iter().enumerate() {
            let left = e_m.dot(rho);
            for (k, e_k_dag) in daggers.iter().enumerate() {
                let term = left.dot(e_k_dag);
                let col = m + k * n2;
                for ((i, j), value) in term.indexed_iter() {
                    design[[l * n2 + i + j * n, col]] = *value;
                }
            }
        }
    }
    Ok(design)
}

/// Pose the complex fit ‖A·x − y‖² on a backend that only penalizes real
/// residuals: Re(−i·z) = Im(z), so [A; −i·A] against [Re y; Im y] has the
/// same objective. The stacked Gram matrix is 2·A†A, so its spectral norm
/// is √2·σ_max(A).
fn split_complex_residual(
    design: &Array2<Complex64>,
    targets: &Array1<Complex64>,
) -> (Array2<Complex64>, Array1<f64>) {
    let rows = design.nrows();
    let minus_i = Complex64::new(0.0, -1.0);
    let stacked = Array2::from_shape_fn((2 * rows, design.ncols()), |(r, c)| {
        if r < rows {
            design[[r, c]]
        } else {
            design[[r - rows, c]] * minus_i
        }
    });
    let observations = targets
        .iter()
        .map(|y| y.re)
        .chain(targets.iter().map(|y| y.im))
        .collect();
    (stacked, observations)
}

impl<S: ConvexSolver> Reconstructor<S> {
    /// Recover the process matrix χ from paired input/output states.
    ///
    /// Minimizes Σ_l ‖ε_χ(ρ_before[l]) − ρ_after[l]‖²_F over Hermitian
    /// χ ⪰ 0. No trace condition is imposed, so estimates of
    /// non-trace-preserving channels are representable.
    ///
    /// # Errors
    /// `Shape` if the lists are empty, their lengths differ, any matrix is
    /// not N×N, or `expand_basis` does not hold exactly N² operators.
    /// `Constraint` for non-finite entries.
    pub fn process_tomography(
        &self,
        rho_before: &[Array2<Complex64>],
        rho_after: &[Array2<Complex64>],
        expand_basis: &[Array2<Complex64>],
    ) -> Result<ReconstructionResult<Array2<Complex64>>> {
        let first = rho_before
            .first()
            .ok_or_else(|| Error::Shape("field 'rho_before': must not be empty".into()))?;
        let n = validation::require_square("rho_before[0]", first)?;
        validation::require_len("rho_after", rho_after.len(), rho_before.len())?;
        for (l, (before, after)) in rho_before.iter().zip(rho_after).enumerate() {
            validation::require_dim(&format!("rho_before[{l}]"), before, n)?;
            validation::require_dim(&format!("rho_after[{l}]"), after, n)?;
        }
        validation::require_len("expand_basis", expand_basis.len(), n * n)?;
        for (m, e) in expand_basis.iter().enumerate() {
            validation::require_dim(&format!("expand_basis[{m}]"), e, n)?;
        }

        let all = rho_before.iter().chain(rho_after).chain(expand_basis);
        validation::require_finite_complex("process inputs", all.flat_map(|m| m.iter()))?;

        let design = process_design_matrix(rho_before, expand_basis)?;
        let (condition_number, norm) = condition_and_norm(&design);
        let conditioning = self.assess("process design", condition_number);

        let targets: Array1<Complex64> = rho_after
            .iter()
            .flat_map(|rho| vectorize(rho).to_vec())
            .collect();
        let (stacked, observations) = split_complex_residual(&design, &targets);

        let problem = LeastSquaresProblem::new(
            stacked,
            observations,
            FeasibleSet::PsdCone { dim: n * n },
        )
        .with_spectral_norm(std::f64::consts::SQRT_2 * norm);
        let (solution, report) = self.dispatch(&problem)?;
        let chi = unvectorize(&solution.x, n * n)?;

        Ok(ReconstructionResult {
            value: chi,
            residual: solution.objective,
            conditioning,
            solver: report,
        })
    }
}
