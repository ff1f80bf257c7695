// Copyright 2026 LabKit Contributors
// SPDX-License-Identifier: Apache-2.0

//! Column-major (Fortran-order) vectorization.
//!
//! vec(M)[i + j·n] = M[i, j]. This is the single flattening convention of the
//! crate: design matrices, optimization variables and observation vectors all
//! use it, so the linear maps built by different solvers agree.

use ndarray::{Array1, Array2};

use crate::error::{Error, Result};

/// Flatten a matrix column by column.
pub fn vectorize<A: Clone>(m: &Array2<A>) -> Array1<A> {
    m.t().iter().cloned().collect()
}

/// Inverse of [`vectorize`] for an n×n matrix.
pub fn unvectorize<A: Clone>(v: &Array1<A>, n: usize) -> Result<Array2<A>> {
    if v.len() != n * n {
        return Err(Error::Shape(format!(
            "cannot reshape a vector of length {} into {} × {}",
            v.len(),
            n,
            n
        )));
    }
    Ok(Array2::from_shape_fn((n, n), |(i, j)| v[i + j * n].clone()))
}

/// Stack k square m×m operators into a k × m² matrix whose i-th row is
/// vec(operators[i]).
pub fn vectorize_basis<A: Clone>(operators: &[Array2<A>]) -> Result<Array2<A>> {
    let first = operators
        .first()
        .ok_or_else(|| Error::Shape("operator basis must not be empty".into()))?;
    let m = first.nrows();

    for (k, op) in operators.iter().enumerate() {
        if op.dim() != (m, m) {
            return Err(Error::Shape(format!(
                "operator {} is {} × {}, expected {} × {}",
                k,
                op.nrows(),
                op.ncols(),
                m,
                m
            )));
        }
    }

    Ok(Array2::from_shape_fn((operators.len(), m * m), |(row, col)| {
        operators[row][[col % m, col / m]].clone()
    }))
}
