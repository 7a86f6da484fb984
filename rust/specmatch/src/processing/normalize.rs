use serde::{
    Deserialize,
    Serialize,
};
use std::fmt::Display;
use std::str::FromStr;

use crate::errors::ConfigError;

/// How intensities are rescaled into a probability vector.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizationMethod {
    /// Divide every element by the sum.
    #[default]
    Standard,
    /// Max-shifted softmax.
    Softmax,
}

impl FromStr for NormalizationMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "softmax" => Ok(Self::Softmax),
            _ => Err(ConfigError::UnknownNormalizationMethod(s.to_string())),
        }
    }
}

impl Display for NormalizationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Softmax => write!(f, "softmax"),
        }
    }
}

/// Rescales `intensities` so they sum to 1.
///
/// An all-zero (or empty) vector cannot be made to sum to one with the
/// standard method, in that case the input is returned unchanged.
///
/// ```
/// use specmatch::processing::normalize::{normalize, NormalizationMethod};
///
/// let out = normalize(&[1.0, 3.0], NormalizationMethod::Standard);
/// assert_eq!(out, vec![0.25, 0.75]);
///
/// let zeros = normalize(&[0.0, 0.0], NormalizationMethod::Standard);
/// assert_eq!(zeros, vec![0.0, 0.0]);
/// ```
pub fn normalize(intensities: &[f64], method: NormalizationMethod) -> Vec<f64> {
    match method {
        NormalizationMethod::Standard => standard(intensities),
        NormalizationMethod::Softmax => softmax(intensities),
    }
}

fn standard(intensities: &[f64]) -> Vec<f64> {
    let total: f64 = intensities.iter().sum();
    if total == 0.0 || !total.is_finite() {
        return intensities.to_vec();
    }
    intensities.iter().map(|x| x / total).collect()
}

fn softmax(intensities: &[f64]) -> Vec<f64> {
    let max = intensities
        .iter()
        .copied()
        .filter(|x| x.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    if !max.is_finite() {
        // Empty, or nothing finite to anchor the shift on.
        return intensities.to_vec();
    }
    let exps: Vec<f64> = intensities
        .iter()
        .map(|x| if x.is_finite() { (x - max).exp() } else { 0.0 })
        .collect();
    // The max element contributes exp(0) = 1, so the sum is >= 1.
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|x| x / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum(x: &[f64]) -> f64 {
        x.iter().sum()
    }

    #[test]
    fn test_standard_sums_to_one() {
        let inputs: [&[f64]; 4] = [
            &[1.0, 2.0, 3.0],
            &[1e-12, 5e-13],
            &[1e9, 3.0, 0.0, 7.5],
            &[42.0],
        ];
        for input in inputs {
            let out = normalize(input, NormalizationMethod::Standard);
            assert!((sum(&out) - 1.0).abs() < 1e-12, "{:?} -> {:?}", input, out);
        }
    }

    #[test]
    fn test_standard_zero_vector_unchanged() {
        let out = normalize(&[0.0, 0.0, 0.0], NormalizationMethod::Standard);
        assert_eq!(out, vec![0.0, 0.0, 0.0]);
        assert!(normalize(&[], NormalizationMethod::Standard).is_empty());
    }

    #[test]
    fn test_softmax_sums_to_one_in_open_interval() {
        let inputs: [&[f64]; 4] = [
            &[1.0, 2.0, 3.0],
            &[0.0, 0.0, 0.0],
            &[10.0, 9.0, 0.0],
            &[-5.0, 12.0],
        ];
        for input in inputs {
            let out = normalize(input, NormalizationMethod::Softmax);
            assert!((sum(&out) - 1.0).abs() < 1e-12, "{:?} -> {:?}", input, out);
            for v in out.iter() {
                assert!(*v > 0.0 && *v < 1.0, "{:?} -> {:?}", input, out);
            }
        }
    }

    #[test]
    fn test_softmax_does_not_overflow() {
        let out = normalize(&[1e6, 1e6], NormalizationMethod::Softmax);
        assert_eq!(out, vec![0.5, 0.5]);
    }

    #[test]
    fn test_parse_method() {
        assert_eq!(
            "Softmax".parse::<NormalizationMethod>().unwrap(),
            NormalizationMethod::Softmax
        );
        assert!("l2".parse::<NormalizationMethod>().is_err());
    }
}
