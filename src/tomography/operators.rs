// Copyright 2026 LabKit Contributors
// SPDX-License-Identifier: Apache-2.0

//! Standard operators and forward models.

use ndarray::{array, Array2};
use num_complex::Complex64;

use crate::error::{Error, Result};
use crate::linalg::{conjugate_transpose, frobenius_norm, kron, trace};
use crate::validation;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// n×n identity.
pub fn identity(n: usize) -> Array2<Complex64> {
    Array2::from_shape_fn((n, n), |(i, j)| if i == j { ONE } else { ZERO })
}

/// Pauli X.
pub fn pauli_x() -> Array2<Complex64> {
    array![[ZERO, ONE], [ONE, ZERO]]
}

/// Pauli Y.
pub fn pauli_y() -> Array2<Complex64> {
    array![[ZERO, -I], [I, ZERO]]
}

/// Pauli Z.
pub fn pauli_z() -> Array2<Complex64> {
    array![[ONE, ZERO], [ZERO, -ONE]]
}

/// All 4^q tensor products of {I, X, Y, Z} on q qubits.
///
/// The first qubit is the most significant factor, so for two qubits the
/// order is II, IX, IY, IZ, XI, ... The operators span the space of
/// 2^q × 2^q matrices, which makes them an informationally complete
/// measurement set and a valid process expansion basis.
pub fn pauli_basis(num_qubits: usize) -> Vec<Array2<Complex64>> {
    let single = [identity(2), pauli_x(), pauli_y(), pauli_z()];
    let mut basis = vec![identity(1)];
    for _ in 0..num_qubits {
        basis = basis
            .iter()
            .flat_map(|prefix| single.iter().map(move |p| kron(prefix, p)))
            .collect();
    }
    basis
}

/// Born-rule forward model: Re tr(B_k ρ) for every operator.
pub fn expectation_values(
    measurement_bases: &[Array2<Complex64>],
    rho: &Array2<Complex64>,
) -> Result<Vec<f64>> {
    let n = validation::require_square("rho", rho)?;
    measurement_bases
        .iter()
        .enumerate()
        .map(|(k, b)| {
            validation::require_dim(&format!("measurement_bases[{k}]"), b, n)?;
            Ok(trace(&b.dot(rho)).re)
        })
        .collect()
}

/// Process forward model: Σ_mn χ_mn E_m ρ E_n†.
pub fn apply_process(
    chi: &Array2<Complex64>,
    expand_basis: &[Array2<Complex64>],
    rho: &Array2<Complex64>,
) -> Result<Array2<Complex64>> {
    let n = validation::require_square("rho", rho)?;
    validation::require_len("expand_basis", expand_basis.len(), n * n)?;
    validation::require_dim("chi", chi, n * n)?;
    for (k, e) in expand_basis.iter().enumerate() {
        validation::require_dim(&format!("expand_basis[{k}]"), e, n)?;
    }

    let daggers: Vec<_> = expand_basis.iter().map(conjugate_transpose).collect();
    let mut out = Array2::zeros((n, n));
    for (m, e_m) in expand_basis.iter().enumerate() {
        let left = e_m.dot(rho);
        for (k, e_k_dag) in daggers.iter().enumerate() {
            let weight = chi[[m, k]];
            if weight != ZERO {
                out.scaled_add(weight, &left.dot(e_k_dag));
            }
        }
    }
    Ok(out)
}

/// tr(ρ²), real part.
pub fn purity(rho: &Array2<Complex64>) -> f64 {
    trace(&rho.dot(rho)).re
}

/// ‖a − b‖_F.
pub fn frobenius_distance(a: &Array2<Complex64>, b: &Array2<Complex64>) -> Result<f64> {
    if a.dim() != b.dim() {
        return Err(Error::Shape(format!(
            "cannot compare a {:?} matrix with a {:?} matrix",
            a.dim(),
            b.dim()
        )));
    }
    Ok(frobenius_norm(&(a - b)))
}
