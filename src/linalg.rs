// Copyright 2026 LabKit Contributors
// SPDX-License-Identifier: Apache-2.0

//! Dense complex matrix helpers shared by the solvers.
//!
//! Arrays are `ndarray` throughout; decompositions (SVD, Hermitian
//! eigendecomposition) go through `nalgebra`.

use nalgebra::DMatrix;
use ndarray::{Array1, Array2};
use num_complex::Complex64;

/// Conjugate transpose A†.
pub fn conjugate_transpose(a: &Array2<Complex64>) -> Array2<Complex64> {
    a.t().mapv(|z| z.conj())
}

/// Trace of a square matrix.
pub fn trace(a: &Array2<Complex64>) -> Complex64 {
    a.diag().iter().sum()
}

/// Hermitian part ½(A + A†).
pub fn hermitian_part(a: &Array2<Complex64>) -> Array2<Complex64> {
    (a + &conjugate_transpose(a)) * Complex64::new(0.5, 0.0)
}

/// Largest entrywise deviation |A_ij − conj(A_ji)|.
pub fn hermiticity_error(a: &Array2<Complex64>) -> f64 {
    let n = a.nrows();
    let mut worst: f64 = 0.0;
    for i in 0..n {
        for j in i..n {
            worst = worst.max((a[[i, j]] - a[[j, i]].conj()).norm());
        }
    }
    worst
}

/// Frobenius norm ‖A‖_F.
pub fn frobenius_norm(a: &Array2<Complex64>) -> f64 {
    a.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt()
}

/// Euclidean norm of a complex vector.
pub fn vector_norm(v: &Array1<Complex64>) -> f64 {
    v.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt()
}

/// Real inner product Re⟨a, b⟩ of two complex vectors.
pub fn real_inner(a: &Array1<Complex64>, b: &Array1<Complex64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x.conj() * y).re).sum()
}

/// Kronecker product A ⊗ B.
pub fn kron(a: &Array2<Complex64>, b: &Array2<Complex64>) -> Array2<Complex64> {
    let (ar, ac) = a.dim();
    let (br, bc) = b.dim();
    Array2::from_shape_fn((ar * br, ac * bc), |(i, j)| {
        a[[i / br, j / bc]] * b[[i % br, j % bc]]
    })
}

pub(crate) fn to_dmatrix(a: &Array2<Complex64>) -> DMatrix<Complex64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

pub(crate) fn from_dmatrix(m: &DMatrix<Complex64>) -> Array2<Complex64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

/// Singular values in descending order. Empty for a matrix with no entries.
pub fn singular_values(a: &Array2<Complex64>) -> Vec<f64> {
    if a.is_empty() {
        return Vec::new();
    }
    let mut values: Vec<f64> = to_dmatrix(a).singular_values().iter().copied().collect();
    values.sort_by(|x, y| y.total_cmp(x));
    values
}

/// Spectral norm σ_max(A).
pub fn spectral_norm(a: &Array2<Complex64>) -> f64 {
    singular_values(a).first().copied().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_conjugate_transpose() {
        let mut a = Array2::zeros((2, 2));
        a[[0, 1]] = c(1.0, 2.0);
        let ad = conjugate_transpose(&a);
        assert_eq!(ad[[1, 0]], c(1.0, -2.0));
        assert_eq!(ad[[0, 1]], c(0.0, 0.0));
    }

    #[test]
    fn test_hermitian_part_is_hermitian() {
        let a = Array2::from_shape_fn((3, 3), |(i, j)| c(i as f64, j as f64 * 0.5));
        let h = hermitian_part(&a);
        assert!(hermiticity_error(&h) < 1e-15);
        assert!(hermiticity_error(&a) > 0.1);
    }

    #[test]
    fn test_kron_dimensions_and_entries() {
        let a = Array2::from_shape_fn((2, 2), |(i, j)| c((i * 2 + j) as f64, 0.0));
        let eye = Array2::from_diag_elem(2, c(1.0, 0.0));
        let k = kron(&a, &eye);
        assert_eq!(k.dim(), (4, 4));
        assert_eq!(k[[0, 2]], c(1.0, 0.0));
        assert_eq!(k[[3, 1]], c(2.0, 0.0));
        assert_eq!(k[[1, 0]], c(0.0, 0.0));
    }

    #[test]
    fn test_singular_values_of_diagonal() {
        let mut a = Array2::zeros((2, 2));
        a[[0, 0]] = c(0.5, 0.0);
        a[[1, 1]] = c(0.0, -3.0);
        let sv = singular_values(&a);
        assert_relative_eq!(sv[0], 3.0, epsilon = 1e-12);
        assert_relative_eq!(sv[1], 0.5, epsilon = 1e-12);
        assert_relative_eq!(spectral_norm(&a), 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_dmatrix_round_trip() {
        let a = Array2::from_shape_fn((2, 3), |(i, j)| c(i as f64, j as f64));
        assert_eq!(from_dmatrix(&to_dmatrix(&a)), a);
    }

    #[test]
    fn test_trace_and_norms() {
        let a = Array2::from_diag_elem(3, c(1.0, 1.0));
        assert_eq!(trace(&a), c(3.0, 3.0));
        assert_relative_eq!(frobenius_norm(&a), 6.0_f64.sqrt(), epsilon = 1e-12);
        let v = Array1::from(vec![c(3.0, 0.0), c(0.0, 4.0)]);
        assert_relative_eq!(vector_norm(&v), 5.0, epsilon = 1e-12);
        assert_relative_eq!(real_inner(&v, &v), 25.0, epsilon = 1e-12);
    }
}
