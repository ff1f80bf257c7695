// Copyright 2026 LabKit Contributors
// SPDX-License-Identifier: Apache-2.0

//! Input validation for reconstruction requests.
//!
//! Every check here runs before a problem reaches the optimization backend.
//! Structural problems map to [`Error::Shape`], violated physical invariants
//! to [`Error::Constraint`].

use ndarray::{Array2, ArrayBase, Data, Ix2};
use num_complex::Complex64;

use crate::error::{Error, Result};
use crate::linalg::hermiticity_error;

/// Require a non-empty square matrix; returns its side length.
pub fn require_square<S: Data>(field: &str, m: &ArrayBase<S, Ix2>) -> Result<usize> {
    let (rows, cols) = m.dim();
    if rows != cols {
        return Err(Error::Shape(format!(
            "field '{}': must be square, got {} × {}",
            field, rows, cols
        )));
    }
    if rows == 0 {
        return Err(Error::Shape(format!("field '{}': must not be empty", field)));
    }
    Ok(rows)
}

/// Require a square matrix of a given side length.
pub fn require_dim<S: Data>(field: &str, m: &ArrayBase<S, Ix2>, dim: usize) -> Result<()> {
    if m.dim() != (dim, dim) {
        return Err(Error::Shape(format!(
            "field '{}': expected {} × {}, got {} × {}",
            field,
            dim,
            dim,
            m.nrows(),
            m.ncols()
        )));
    }
    Ok(())
}

/// Require a length to match an expected value.
pub fn require_len(field: &str, len: usize, expected: usize) -> Result<()> {
    if len != expected {
        return Err(Error::Shape(format!(
            "field '{}': length {} does not match expected {}",
            field, len, expected
        )));
    }
    Ok(())
}

/// Require every entry of a real array to be finite.
pub fn require_finite<'a>(field: &str, values: impl IntoIterator<Item = &'a f64>) -> Result<()> {
    for (i, v) in values.into_iter().enumerate() {
        if !v.is_finite() {
            return Err(Error::Constraint(format!(
                "field '{}': non-finite value {} at index {}",
                field, v, i
            )));
        }
    }
    Ok(())
}

/// Require every entry of a complex array to be finite.
pub fn require_finite_complex<'a>(
    field: &str,
    values: impl IntoIterator<Item = &'a Complex64>,
) -> Result<()> {
    for (i, z) in values.into_iter().enumerate() {
        if !z.re.is_finite() || !z.im.is_finite() {
            return Err(Error::Constraint(format!(
                "field '{}': non-finite value {} at index {}",
                field, z, i
            )));
        }
    }
    Ok(())
}

/// Require a column-stochastic matrix: every column sums to 1 within `tolerance`.
pub fn require_column_stochastic<S: Data<Elem = f64>>(
    field: &str,
    m: &ArrayBase<S, Ix2>,
    tolerance: f64,
) -> Result<()> {
    for (j, column) in m.columns().into_iter().enumerate() {
        let sum = column.sum();
        if (sum - 1.0).abs() > tolerance {
            return Err(Error::Constraint(format!(
                "field '{}': column {} sums to {}, must be column-wise stochastic (tolerance {:e})",
                field, j, sum, tolerance
            )));
        }
    }
    Ok(())
}

/// Require a Hermitian matrix within `tolerance` (largest entrywise deviation).
pub fn require_hermitian(field: &str, m: &Array2<Complex64>, tolerance: f64) -> Result<()> {
    let deviation = hermiticity_error(m);
    if deviation > tolerance {
        return Err(Error::Constraint(format!(
            "field '{}': not Hermitian (max |A_ij − conj(A_ji)| = {:e}, tolerance {:e})",
            field, deviation, tolerance
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_require_square() {
        let m = Array2::<f64>::zeros((3, 3));
        assert_eq!(require_square("m", &m).unwrap(), 3);

        let rect = Array2::<f64>::zeros((2, 3));
        let err = require_square("confusion", &rect).unwrap_err();
        assert!(matches!(err, Error::Shape(_)));
        assert!(err.to_string().contains("confusion"));

        let empty = Array2::<f64>::zeros((0, 0));
        assert!(matches!(require_square("m", &empty), Err(Error::Shape(_))));
    }

    #[test]
    fn test_require_dim() {
        let m = Array2::<Complex64>::zeros((2, 2));
        assert!(require_dim("rho", &m, 2).is_ok());
        assert!(matches!(require_dim("rho", &m, 3), Err(Error::Shape(_))));
    }

    #[test]
    fn test_require_len() {
        assert!(require_len("values", 3, 3).is_ok());
        let err = require_len("values", 2, 3).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Shape error: field 'values': length 2 does not match expected 3"
        );
    }

    #[test]
    fn test_require_finite() {
        assert!(require_finite("p", &[0.1, 0.9]).is_ok());
        assert!(matches!(
            require_finite("p", &[0.1, f64::NAN]),
            Err(Error::Constraint(_))
        ));
        assert!(require_finite("p", &[f64::INFINITY]).is_err());
        assert!(require_finite_complex("rho", &[Complex64::new(0.0, f64::NAN)]).is_err());
    }

    #[test]
    fn test_require_column_stochastic() {
        let good = array![[0.9, 0.2], [0.1, 0.8]];
        assert!(require_column_stochastic("C", &good, 1e-6).is_ok());

        // Rows summing to one is not enough
        let row_stochastic = array![[0.9, 0.1], [0.3, 0.7]];
        let err = require_column_stochastic("C", &row_stochastic, 1e-6).unwrap_err();
        assert!(matches!(err, Error::Constraint(_)));
        assert!(err.to_string().contains("column 0"));
    }

    #[test]
    fn test_require_column_stochastic_respects_tolerance() {
        let nearly = array![[0.9 + 5e-7, 0.2], [0.1, 0.8]];
        assert!(require_column_stochastic("C", &nearly, 1e-6).is_ok());
        assert!(require_column_stochastic("C", &nearly, 1e-7).is_err());
    }

    #[test]
    fn test_require_hermitian() {
        let mut m = Array2::zeros((2, 2));
        m[[0, 1]] = Complex64::new(0.0, -1.0);
        m[[1, 0]] = Complex64::new(0.0, 1.0);
        assert!(require_hermitian("Y", &m, 1e-12).is_ok());

        m[[1, 0]] = Complex64::new(0.0, -1.0);
        assert!(matches!(
            require_hermitian("B", &m, 1e-12),
            Err(Error::Constraint(_))
        ));
    }
}
