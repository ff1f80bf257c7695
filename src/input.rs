// Copyright 2026 LabKit Contributors
// SPDX-License-Identifier: Apache-2.0

//! JSON documents read and written by the `labkit` binary.
//!
//! Complex matrices are written as `{"re": [[...]], "im": [[...]]}`; `im` may
//! be omitted for real matrices.

use std::path::Path;

use ndarray::Array2;
use num_complex::Complex64;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tomography::diagnostics::Conditioning;
use crate::tomography::operators::pauli_basis;
use crate::tomography::{ReconstructionResult, SolverReport};

/// A complex matrix as nested rows of real and imaginary parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexMatrix {
    pub re: Vec<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub im: Option<Vec<Vec<f64>>>,
}

impl ComplexMatrix {
    /// Convert to an array, checking that rows are rectangular and that
    /// `im` (if given) has the same shape as `re`.
    pub fn to_array(&self, field: &str) -> Result<Array2<Complex64>> {
        let re = real_matrix(field, &self.re)?;
        match &self.im {
            None => Ok(re.mapv(|x| Complex64::new(x, 0.0))),
            Some(im_rows) => {
                let im = real_matrix(field, im_rows)?;
                if im.dim() != re.dim() {
                    return Err(Error::Shape(format!(
                        "field '{}': imaginary part is {:?}, real part is {:?}",
                        field,
                        im.dim(),
                        re.dim()
                    )));
                }
                Ok(Array2::from_shape_fn(re.dim(), |idx| {
                    Complex64::new(re[idx], im[idx])
                }))
            }
        }
    }

    pub fn from_array(m: &Array2<Complex64>) -> Self {
        let rows = |part: fn(&Complex64) -> f64| -> Vec<Vec<f64>> {
            m.rows().into_iter().map(|row| row.iter().map(part).collect()).collect()
        };
        Self {
            re: rows(|z| z.re),
            im: Some(rows(|z| z.im)),
        }
    }
}

/// Convert nested rows into a real matrix. Ragged rows are a shape error.
pub fn real_matrix(field: &str, rows: &[Vec<f64>]) -> Result<Array2<f64>> {
    let ncols = rows.first().map_or(0, Vec::len);
    if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != ncols) {
        return Err(Error::Shape(format!(
            "field '{}': row {} has {} entries, expected {}",
            field,
            i,
            row.len(),
            ncols
        )));
    }
    let flat: Vec<f64> = rows.iter().flatten().copied().collect();
    Array2::from_shape_vec((rows.len(), ncols), flat)
        .map_err(|e| Error::Shape(format!("field '{}': {}", field, e)))
}

fn complex_matrices(field: &str, matrices: &[ComplexMatrix]) -> Result<Vec<Array2<Complex64>>> {
    matrices
        .iter()
        .enumerate()
        .map(|(k, m)| m.to_array(&format!("{field}[{k}]")))
        .collect()
}

/// Input of `labkit deconfuse`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeconfusionInput {
    pub confusion: Vec<Vec<f64>>,
    pub p_measured: Vec<f64>,
}

/// Input of `labkit state`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateInput {
    pub measurement_bases: Vec<ComplexMatrix>,
    pub values: Vec<f64>,
}

impl StateInput {
    pub fn bases(&self) -> Result<Vec<Array2<Complex64>>> {
        complex_matrices("measurement_bases", &self.measurement_bases)
    }
}

/// Input of `labkit process`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessInput {
    pub rho_before: Vec<ComplexMatrix>,
    pub rho_after: Vec<ComplexMatrix>,
    /// Defaults to the Pauli basis when the states act on qubits.
    #[serde(default)]
    pub expand_basis: Option<Vec<ComplexMatrix>>,
}

impl ProcessInput {
    pub fn states(&self) -> Result<(Vec<Array2<Complex64>>, Vec<Array2<Complex64>>)> {
        Ok((
            complex_matrices("rho_before", &self.rho_before)?,
            complex_matrices("rho_after", &self.rho_after)?,
        ))
    }

    /// The explicit basis, or the Pauli basis for N = 2^q.
    pub fn basis(&self, dim: usize) -> Result<Vec<Array2<Complex64>>> {
        match &self.expand_basis {
            Some(basis) => complex_matrices("expand_basis", basis),
            None if dim.is_power_of_two() => Ok(pauli_basis(dim.trailing_zeros() as usize)),
            None => Err(Error::Shape(format!(
                "field 'expand_basis': required for dimension {} (Pauli default needs a power of two)",
                dim
            ))),
        }
    }
}

/// Serialized reconstruction result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconstructionOutput<T> {
    pub value: T,
    pub residual: f64,
    pub conditioning: Conditioning,
    pub solver: SolverReport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl<T> ReconstructionOutput<T> {
    pub fn from_result<V>(result: ReconstructionResult<V>, convert: impl FnOnce(V) -> T) -> Self {
        let warning = result.warning().map(|w| w.to_string());
        let result = result.map(convert);
        Self {
            value: result.value,
            residual: result.residual,
            conditioning: result.conditioning,
            solver: result.solver,
            warning,
        }
    }
}

/// Read and parse a JSON document.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tomography::Reconstructor;
    use ndarray::array;
    use std::io::Write;

    #[test]
    fn test_real_only_matrix() {
        let m: ComplexMatrix = serde_json::from_str(r#"{"re": [[1, 0], [0, -1]]}"#).unwrap();
        let a = m.to_array("z").unwrap();
        assert_eq!(a[[1, 1]], Complex64::new(-1.0, 0.0));
        assert_eq!(a[[0, 1]], Complex64::new(0.0, 0.0));
    }

    #[test]
    fn test_complex_matrix_parts() {
        let m = ComplexMatrix {
            re: vec![vec![0.0, 0.0], vec![0.0, 0.0]],
            im: Some(vec![vec![0.0, -1.0], vec![1.0, 0.0]]),
        };
        let a = m.to_array("y").unwrap();
        assert_eq!(a[[0, 1]], Complex64::new(0.0, -1.0));
        assert_eq!(ComplexMatrix::from_array(&a), m);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = real_matrix("confusion", &[vec![1.0, 0.0], vec![1.0]]).unwrap_err();
        assert!(matches!(err, Error::Shape(_)));
        assert!(err.to_string().contains("confusion"));
    }

    #[test]
    fn test_mismatched_imaginary_part_rejected() {
        let m = ComplexMatrix {
            re: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            im: Some(vec![vec![0.0]]),
        };
        assert!(matches!(m.to_array("m"), Err(Error::Shape(_))));
    }

    #[test]
    fn test_process_basis_defaults_to_pauli() {
        let input: ProcessInput =
            serde_json::from_str(r#"{"rho_before": [], "rho_after": []}"#).unwrap();
        assert_eq!(input.basis(4).unwrap().len(), 16);
        assert!(matches!(input.basis(3), Err(Error::Shape(_))));
    }

    #[test]
    fn test_load_deconfusion_input() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            f,
            r#"{{"confusion": [[0.9, 0.91], [0.1, 0.09]], "p_measured": [0.4, 0.6]}}"#
        )
        .unwrap();
        let input: DeconfusionInput = load_json(f.path()).unwrap();
        assert_eq!(input.p_measured, vec![0.4, 0.6]);
        let c = real_matrix("confusion", &input.confusion).unwrap();
        assert_eq!(c, array![[0.9, 0.91], [0.1, 0.09]]);
    }

    #[test]
    fn test_load_invalid_json() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "{{ not json").unwrap();
        let result: Result<DeconfusionInput> = load_json(f.path());
        assert!(matches!(result, Err(Error::Serialization(_))));
    }

    #[test]
    fn test_output_carries_warning() {
        let result = Reconstructor::default()
            .deconfuse(&array![[0.9, 0.91], [0.1, 0.09]], &array![0.4, 0.6])
            .unwrap();
        let output = ReconstructionOutput::from_result(result, |p| p.to_vec());
        assert!(output.warning.unwrap().contains("may not be reliable"));

        let json = serde_json::to_value(ReconstructionOutput::from_result(
            Reconstructor::default()
                .deconfuse(&Array2::eye(2), &array![0.5, 0.5])
                .unwrap(),
            |p| p.to_vec(),
        ))
        .unwrap();
        assert!(json.get("warning").is_none());
        assert_eq!(json["conditioning"]["class"], "well-conditioned");
        assert_eq!(json["solver"]["status"], "optimal");
    }

    #[test]
    fn test_singular_confusion_keeps_infinite_condition_number() {
        let result = Reconstructor::default()
            .deconfuse(&array![[0.5, 0.5], [0.5, 0.5]], &array![0.5, 0.5])
            .unwrap();
        let output = ReconstructionOutput::from_result(result, |p| p.to_vec());
        let json = serde_json::to_string(&output).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["conditioning"]["condition_number"], "inf");
        assert_eq!(value["conditioning"]["class"], "ill-conditioned");

        let back: ReconstructionOutput<Vec<f64>> = serde_json::from_str(&json).unwrap();
        assert!(back.conditioning.condition_number.is_infinite());
        assert!(back.warning.unwrap().contains("inf"));
    }
}
