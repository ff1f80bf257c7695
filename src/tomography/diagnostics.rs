// Copyright 2026 LabKit Contributors
// SPDX-License-Identifier: Apache-2.0

//! Conditioning diagnostics.
//!
//! The condition number σ_max/σ_min of the confusion or design matrix bounds
//! how much measurement noise is amplified by the inversion. Results carry
//! the number and its classification; callers decide how to surface it.

use std::fmt;

use ndarray::Array2;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::linalg::singular_values;

/// Default threshold above which a reconstruction is flagged.
///
/// Tuned for readout confusion matrices. Tomography design matrices are
/// worse conditioned even for clean, informationally complete data (two-qubit
/// process tomography from product Pauli eigenstates sits near 10.4), so
/// those callers usually want a higher `conditioning_threshold`.
pub const DEFAULT_CONDITIONING_THRESHOLD: f64 = 10.0;

/// Classification of a condition number against a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConditioningClass {
    WellConditioned,
    IllConditioned,
}

impl fmt::Display for ConditioningClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditioningClass::WellConditioned => write!(f, "well-conditioned"),
            ConditioningClass::IllConditioned => write!(f, "ill-conditioned"),
        }
    }
}

/// Conditioning of the linear map behind a reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Conditioning {
    /// σ_max/σ_min (infinite for rank-deficient maps).
    #[serde(with = "non_finite_as_string")]
    pub condition_number: f64,
    /// Classification against `threshold`.
    pub class: ConditioningClass,
    /// Threshold used for the classification.
    #[serde(with = "non_finite_as_string")]
    pub threshold: f64,
}

/// JSON has no infinity or NaN; write those as `"inf"`, `"-inf"` and `"NaN"`.
mod non_finite_as_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            serializer.serialize_f64(*value)
        } else if value.is_nan() {
            serializer.serialize_str("NaN")
        } else if *value > 0.0 {
            serializer.serialize_str("inf")
        } else {
            serializer.serialize_str("-inf")
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Text(text) => text
                .parse::<f64>()
                .map_err(|_| de::Error::custom(format!("invalid number '{}'", text))),
        }
    }
}

impl Conditioning {
    /// Classify `condition_number`: ill-conditioned iff it exceeds `threshold`.
    pub fn assess(condition_number: f64, threshold: f64) -> Self {
        let class = if condition_number > threshold || condition_number.is_nan() {
            ConditioningClass::IllConditioned
        } else {
            ConditioningClass::WellConditioned
        };
        Self {
            condition_number,
            class,
            threshold,
        }
    }

    pub fn is_ill_conditioned(&self) -> bool {
        self.class == ConditioningClass::IllConditioned
    }

    /// The non-fatal warning for an ill-conditioned map, if any.
    pub fn warning(&self) -> Option<IllConditionedWarning> {
        self.is_ill_conditioned().then_some(IllConditionedWarning {
            condition_number: self.condition_number,
            threshold: self.threshold,
        })
    }
}

/// Non-fatal warning: the reconstruction may be unreliable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IllConditionedWarning {
    pub condition_number: f64,
    pub threshold: f64,
}

impl fmt::Display for IllConditionedWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "condition number {:.2} is larger than {}, the problem is strongly ill-conditioned \
             and the result may not be reliable",
            self.condition_number, self.threshold
        )
    }
}

/// Condition number of a complex matrix (σ_max/σ_min over min(rows, cols)
/// singular values).
///
/// Rank-deficient and empty matrices yield infinity; σ_min counts as zero
/// below the usual rank tolerance σ_max · max(rows, cols) · ε.
pub fn condition_number(m: &Array2<Complex64>) -> f64 {
    condition_and_norm(m).0
}

/// Condition number and spectral norm σ_max from a single SVD.
///
/// The norm is what the solver needs for its step size, so callers that
/// already assess conditioning hand it on instead of decomposing again.
pub fn condition_and_norm(m: &Array2<Complex64>) -> (f64, f64) {
    let values = singular_values(m);
    let rank_tolerance = m.nrows().max(m.ncols()) as f64 * f64::EPSILON;
    match (values.first(), values.last()) {
        (Some(&max), Some(&min)) if min > max * rank_tolerance => (max / min, max),
        (Some(&max), _) => (f64::INFINITY, max),
        _ => (f64::INFINITY, 0.0),
    }
}

/// Condition number of a real matrix.
pub fn condition_number_real(m: &Array2<f64>) -> f64 {
    condition_number(&m.mapv(|x| Complex64::new(x, 0.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_identity_is_perfectly_conditioned() {
        let eye = Array2::<f64>::eye(4);
        assert_relative_eq!(condition_number_real(&eye), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_near_singular_confusion_is_ill_conditioned() {
        let c = array![[0.9, 0.91], [0.1, 0.09]];
        let cond = condition_number_real(&c);
        assert!(cond > 100.0, "condition number {cond}");
        let conditioning = Conditioning::assess(cond, DEFAULT_CONDITIONING_THRESHOLD);
        assert_eq!(conditioning.class, ConditioningClass::IllConditioned);
        assert!(conditioning.warning().is_some());
    }

    #[test]
    fn test_well_separated_confusion_is_well_conditioned() {
        let c = array![[0.95, 0.05], [0.05, 0.95]];
        // Singular values 1.0 and 0.9
        assert_relative_eq!(condition_number_real(&c), 1.0 / 0.9, epsilon = 1e-10);
        let conditioning =
            Conditioning::assess(condition_number_real(&c), DEFAULT_CONDITIONING_THRESHOLD);
        assert_eq!(conditioning.class, ConditioningClass::WellConditioned);
        assert!(conditioning.warning().is_none());
    }

    #[test]
    fn test_singular_matrix_is_infinite() {
        let c = array![[0.5, 0.5], [0.5, 0.5]];
        assert!(condition_number_real(&c).is_infinite());
    }

    #[test]
    fn test_threshold_is_inclusive_for_well_conditioned() {
        let at = Conditioning::assess(10.0, 10.0);
        assert_eq!(at.class, ConditioningClass::WellConditioned);
        let above = Conditioning::assess(10.0 + 1e-9, 10.0);
        assert_eq!(above.class, ConditioningClass::IllConditioned);
    }

    #[test]
    fn test_custom_threshold() {
        let conditioning = Conditioning::assess(5.0, 2.0);
        assert!(conditioning.is_ill_conditioned());
        assert_eq!(conditioning.threshold, 2.0);
    }

    #[test]
    fn test_class_display_and_serde() {
        assert_eq!(ConditioningClass::IllConditioned.to_string(), "ill-conditioned");
        let json = serde_json::to_string(&ConditioningClass::WellConditioned).unwrap();
        assert_eq!(json, "\"well-conditioned\"");
    }

    #[test]
    fn test_infinite_condition_number_serializes_as_string() {
        let singular = Conditioning::assess(f64::INFINITY, DEFAULT_CONDITIONING_THRESHOLD);
        let json = serde_json::to_value(singular).unwrap();
        assert_eq!(json["condition_number"], "inf");
        assert_eq!(json["threshold"], 10.0);
        assert_eq!(json["class"], "ill-conditioned");

        let back: Conditioning = serde_json::from_value(json).unwrap();
        assert!(back.condition_number.is_infinite());
        assert_eq!(back.class, ConditioningClass::IllConditioned);
    }

    #[test]
    fn test_nan_condition_number_serializes_as_string() {
        let json = serde_json::to_string(&Conditioning::assess(f64::NAN, 10.0)).unwrap();
        assert!(json.contains("\"condition_number\":\"NaN\""), "{json}");
        let back: Conditioning = serde_json::from_str(&json).unwrap();
        assert!(back.condition_number.is_nan());
    }

    #[test]
    fn test_finite_condition_number_stays_numeric() {
        let json = serde_json::to_value(Conditioning::assess(2.5, 10.0)).unwrap();
        assert_eq!(json["condition_number"], 2.5);
        let back: Conditioning = serde_json::from_value(json).unwrap();
        assert_eq!(back, Conditioning::assess(2.5, 10.0));
        assert!(serde_json::from_str::<Conditioning>(
            r#"{"condition_number": "large", "class": "ill-conditioned", "threshold": 10.0}"#
        )
        .is_err());
    }

    #[test]
    fn test_condition_and_norm_share_one_decomposition() {
        let c = array![[0.95, 0.05], [0.05, 0.95]].mapv(|x| Complex64::new(x, 0.0));
        let (cond, norm) = condition_and_norm(&c);
        assert_relative_eq!(cond, 1.0 / 0.9, epsilon = 1e-10);
        assert_relative_eq!(norm, 1.0, epsilon = 1e-10);

        let singular = array![[0.5, 0.5], [0.5, 0.5]].mapv(|x| Complex64::new(x, 0.0));
        let (cond, norm) = condition_and_norm(&singular);
        assert!(cond.is_infinite());
        assert_relative_eq!(norm, 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_warning_message() {
        let warning = IllConditionedWarning {
            condition_number: 166.0,
            threshold: 10.0,
        };
        let msg = warning.to_string();
        assert!(msg.contains("166.00"));
        assert!(msg.contains("may not be reliable"));
    }
}
