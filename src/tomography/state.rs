// Copyright 2026 LabKit Contributors
// SPDX-License-Identifier: Apache-2.0

//! Quantum state tomography by constrained linear inversion.
//!
//! Given k Hermitian measurement operators B_k and observed expectation
//! values v_k, solve
//!
//!   minimize ‖Re(A·vec(ρ)) − v‖²  s.t.  ρ = ρ†,  tr ρ = 1,  ρ ⪰ 0,
//!
//! where row k of A is conj(vec(B_k)), so that A·vec(ρ) = tr(B_k† ρ) =
//! tr(B_k ρ) is the Born-rule expectation value.
//!
//! If the operators are not informationally complete the problem is
//! under-determined and the backend's tie-break picks the returned point.

use ndarray::Array2;
use num_complex::Complex64;

use super::diagnostics::condition_and_norm;
use super::reconstructor::Reconstructor;
use super::types::ReconstructionResult;
use super::vectorize::{unvectorize, vectorize_basis};
use crate::error::{Error, Result};
use crate::solver::{ConvexSolver, FeasibleSet, LeastSquaresProblem};
use crate::validation;

/// Design matrix for state tomography: row k is conj(vec(B_k)).
pub fn state_design_matrix(measurement_bases: &[Array2<Complex64>]) -> Result<Array2<Complex64>> {
    Ok(vectorize_basis(measurement_bases)?.mapv(|z| z.conj()))
}

impl<S: ConvexSolver> Reconstructor<S> {
    /// Recover a density matrix from expectation values.
    ///
    /// # Arguments
    /// * `measurement_bases` — k Hermitian n×n measurement operators.
    /// * `values` — the k observed expectation values, one per operator.
    ///
    /// # Errors
    /// `Shape` if the operators are not all n×n or the counts differ,
    /// `Constraint` for non-Hermitian operators or non-finite values.
    pub fn state_tomography(
        &self,
        measurement_bases: &[Array2<Complex64>],
        values: &[f64],
    ) -> Result<ReconstructionResult<Array2<Complex64>>> {
        let first = measurement_bases
            .first()
            .ok_or_else(|| Error::Shape("field 'measurement_bases': must not be empty".into()))?;
        let n = validation::require_square("measurement_bases[0]", first)?;
        for (k, basis) in measurement_bases.iter().enumerate() {
            validation::require_dim(&format!("measurement_bases[{k}]"), basis, n)?;
        }
        validation::require_len("values", values.len(), measurement_bases.len())?;

        for (k, basis) in measurement_bases.iter().enumerate() {
            let field = format!("measurement_bases[{k}]");
            validation::require_finite_complex(&field, basis.iter())?;
            validation::require_hermitian(&field, basis, self.config().hermiticity_tolerance)?;
        }
        validation::require_finite("values", values)?;

        let design = state_design_matrix(measurement_bases)?;
        let (condition_number, norm) = condition_and_norm(&design);
        let conditioning = self.assess("state design", condition_number);

        let problem = LeastSquaresProblem::new(
            design,
            values.iter().copied().collect(),
            FeasibleSet::DensityMatrices { dim: n },
        )
        .with_spectral_norm(norm);
        let (solution, report) = self.dispatch(&problem)?;
        let rho = unvectorize(&solution.x, n)?;

        Ok(ReconstructionResult {
            value: rho,
            residual: solution.objective,
            conditioning,
            solver: report,
        })
    }
}
