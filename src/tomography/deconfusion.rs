// Copyright 2026 LabKit Contributors
// SPDX-License-Identifier: Apache-2.0

//! Readout deconfusion.
//!
//! A readout channel with column-stochastic confusion matrix C maps the true
//! outcome distribution p to the observed one, p_measured ≈ C·p. Naively
//! inverting C amplifies shot noise and can leave the simplex; instead solve
//!
//!   minimize ‖C·p − p_measured‖²  s.t.  0 ≤ p ≤ 1,  Σp = 1.

use ndarray::{Array1, Array2};
use num_complex::Complex64;

use super::diagnostics::condition_and_norm;
use super::reconstructor::Reconstructor;
use super::types::ReconstructionResult;
use crate::error::{Error, Result};
use crate::solver::{ConvexSolver, FeasibleSet, LeastSquaresProblem};
use crate::validation;

impl<S: ConvexSolver> Reconstructor<S> {
    /// Recover the true probability vector from measured probabilities.
    ///
    /// # Arguments
    /// * `confusion` — n×n column-stochastic confusion matrix C.
    /// * `p_measured` — measured probabilities (length n, need not sum to 1).
    ///
    /// # Errors
    /// `Shape` if C is not square or the lengths disagree, `Constraint` if a
    /// column of C does not sum to 1 within `stochastic_tolerance`, `Solver`
    /// if the backend fails. The backend is not invoked when validation fails.
    pub fn deconfuse(
        &self,
        confusion: &Array2<f64>,
        p_measured: &Array1<f64>,
    ) -> Result<ReconstructionResult<Array1<f64>>> {
        let n = validation::require_square("confusion", confusion)?;
        validation::require_len("p_measured", p_measured.len(), n)?;
        validation::require_finite("confusion", confusion.iter())?;
        validation::require_finite("p_measured", p_measured.iter())?;
        validation::require_column_stochastic(
            "confusion",
            confusion,
            self.config().stochastic_tolerance,
        )?;

        let design = confusion.mapv(|x| Complex64::new(x, 0.0));
        let (condition_number, norm) = condition_and_norm(&design);
        let conditioning = self.assess("confusion", condition_number);

        let problem = LeastSquaresProblem::new(
            design,
            p_measured.clone(),
            FeasibleSet::ProbabilitySimplex { dim: n },
        )
        .with_spectral_norm(norm);
        let (solution, report) = self.dispatch(&problem)?;

        let p: Array1<f64> = solution.x.iter().map(|z| z.re).collect();
        if p.len() != n {
            return Err(Error::Shape(format!(
                "backend returned {} probabilities, expected {}",
                p.len(),
                n
            )));
        }

        Ok(ReconstructionResult {
            value: p,
            residual: solution.objective,
            conditioning,
            solver: report,
        })
    }
}
