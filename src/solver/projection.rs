// Copyright 2026 LabKit Contributors
// SPDX-License-Identifier: Apache-2.0

//! Euclidean projections onto the supported feasible sets.
//!
//! Matrix sets are handled spectrally: take the Hermitian part, diagonalize,
//! project the eigenvalues, and recompose. For {X ⪰ 0, tr X = t} the
//! eigenvalues are projected onto the scaled simplex; for the PSD cone they
//! are clipped at zero.
//!
//! Ref: Duchi et al. (2008), "Efficient Projections onto the ℓ1-Ball for
//! Learning in High Dimensions", ICML.

use nalgebra::{DVector, SymmetricEigen};
use ndarray::Array1;
use num_complex::Complex64;

use super::types::FeasibleSet;
use crate::error::SolverFailure;
use crate::linalg::{from_dmatrix, hermitian_part, to_dmatrix};
use crate::tomography::vectorize::{unvectorize, vectorize};

/// Project `v` onto `set`.
pub fn project(set: FeasibleSet, v: &Array1<Complex64>) -> Result<Array1<Complex64>, SolverFailure> {
    if v.len() != set.num_variables() {
        return Err(SolverFailure::SolverError(format!(
            "variable has {} entries, {} expects {}",
            v.len(),
            set,
            set.num_variables()
        )));
    }
    if set.dim() == 0 {
        return Err(SolverFailure::Infeasible(format!("{set} has no points")));
    }

    match set {
        FeasibleSet::ProbabilitySimplex { .. } => {
            let real: Vec<f64> = v.iter().map(|z| z.re).collect();
            Ok(project_simplex(&real, 1.0)
                .into_iter()
                .map(|p| Complex64::new(p, 0.0))
                .collect())
        }
        FeasibleSet::DensityMatrices { dim } => project_hermitian(v, dim, Some(1.0)),
        FeasibleSet::PsdCone { dim } => project_hermitian(v, dim, None),
    }
}

/// Project a real vector onto {x ≥ 0, Σx = total}.
///
/// For `total = 1` the upper bound x ≤ 1 holds automatically.
pub fn project_simplex(v: &[f64], total: f64) -> Vec<f64> {
    let mut sorted = v.to_vec();
    sorted.sort_by(|a, b| b.total_cmp(a));

    let mut cumulative = 0.0;
    let mut theta = 0.0;
    for (k, u) in sorted.iter().enumerate() {
        cumulative += u;
        let candidate = (cumulative - total) / (k + 1) as f64;
        if u - candidate > 0.0 {
            theta = candidate;
        }
    }

    v.iter().map(|x| (x - theta).max(0.0)).collect()
}

fn project_hermitian(
    v: &Array1<Complex64>,
    dim: usize,
    trace: Option<f64>,
) -> Result<Array1<Complex64>, SolverFailure> {
    let matrix = unvectorize(v, dim).map_err(|e| SolverFailure::SolverError(e.to_string()))?;
    let hermitian = hermitian_part(&matrix);

    let mut eigen = SymmetricEigen::new(to_dmatrix(&hermitian));
    if eigen.eigenvalues.iter().any(|l| !l.is_finite()) {
        return Err(SolverFailure::SolverError(
            "eigendecomposition produced non-finite eigenvalues".into(),
        ));
    }

    let projected: Vec<f64> = match trace {
        Some(t) => {
            let values: Vec<f64> = eigen.eigenvalues.iter().copied().collect();
            project_simplex(&values, t)
        }
        None => eigen.eigenvalues.iter().map(|l| l.max(0.0)).collect(),
    };
    eigen.eigenvalues = DVector::from_vec(projected);

    Ok(vectorize(&from_dmatrix(&eigen.recompose())))
}
