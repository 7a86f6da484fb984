pub mod cosine;
pub mod entropy;

use serde::{
    Deserialize,
    Serialize,
};
use std::fmt::Display;
use std::str::FromStr;

pub use cosine::cosine_similarity;
pub use entropy::{
    EntropyFamily,
    Renyi,
    Shannon,
    Tsallis,
    entropy_similarity,
    shannon_entropy,
};

use crate::errors::ConfigError;
use crate::processing::normalize::{
    NormalizationMethod,
    normalize,
};

/// Name of a similarity measure, as it appears in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMeasure {
    #[default]
    Cosine,
    Shannon,
    Renyi,
    Tsallis,
}

impl FromStr for SimilarityMeasure {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cosine" => Ok(Self::Cosine),
            "shannon" => Ok(Self::Shannon),
            "renyi" => Ok(Self::Renyi),
            "tsallis" => Ok(Self::Tsallis),
            _ => Err(ConfigError::UnknownSimilarityMeasure(s.to_string())),
        }
    }
}

impl Display for SimilarityMeasure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Cosine => "cosine",
            Self::Shannon => "shannon",
            Self::Renyi => "renyi",
            Self::Tsallis => "tsallis",
        };
        f.write_str(name)
    }
}

/// A fully resolved similarity measure, including its entropy order if any.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Similarity {
    Cosine,
    Shannon,
    Renyi(Renyi),
    Tsallis(Tsallis),
}

impl Similarity {
    /// `entropy_dimension` is only checked (and used) for Rényi and Tsallis.
    pub fn new(measure: SimilarityMeasure, entropy_dimension: f64) -> Result<Self, ConfigError> {
        Ok(match measure {
            SimilarityMeasure::Cosine => Self::Cosine,
            SimilarityMeasure::Shannon => Self::Shannon,
            SimilarityMeasure::Renyi => Self::Renyi(Renyi::new(entropy_dimension)?),
            SimilarityMeasure::Tsallis => Self::Tsallis(Tsallis::new(entropy_dimension)?),
        })
    }

    pub fn measure(&self) -> SimilarityMeasure {
        match self {
            Self::Cosine => SimilarityMeasure::Cosine,
            Self::Shannon => SimilarityMeasure::Shannon,
            Self::Renyi(_) => SimilarityMeasure::Renyi,
            Self::Tsallis(_) => SimilarityMeasure::Tsallis,
        }
    }

    /// Scores two aligned intensity vectors.
    ///
    /// Entropy measures normalize both sides with `normalization` first,
    /// cosine uses the raw vectors.
    ///
    /// ```
    /// use specmatch::processing::normalize::NormalizationMethod;
    /// use specmatch::similarity::{Similarity, SimilarityMeasure};
    ///
    /// let sim = Similarity::new(SimilarityMeasure::Shannon, 1.1).unwrap();
    /// let score = sim.score(&[10.0, 90.0], &[20.0, 180.0], NormalizationMethod::Standard);
    /// assert!((score - 1.0).abs() < 1e-12);
    /// ```
    pub fn score(&self, query: &[f64], reference: &[f64], normalization: NormalizationMethod) -> f64 {
        if let Self::Cosine = self {
            return cosine_similarity(query, reference);
        }

        // Softmax would turn an all-zero side into a uniform distribution.
        if !has_signal(query) || !has_signal(reference) {
            return 0.0;
        }
        let a = normalize(query, normalization);
        let b = normalize(reference, normalization);
        match self {
            Self::Cosine => cosine_similarity(query, reference),
            Self::Shannon => entropy_similarity(&Shannon, &a, &b),
            Self::Renyi(family) => entropy_similarity(family, &a, &b),
            Self::Tsallis(family) => entropy_similarity(family, &a, &b),
        }
    }
}

fn has_signal(v: &[f64]) -> bool {
    v.iter().any(|&x| x > 0.0 && x.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_measure() {
        assert_eq!("cosine".parse::<SimilarityMeasure>().unwrap(), SimilarityMeasure::Cosine);
        assert_eq!("Renyi".parse::<SimilarityMeasure>().unwrap(), SimilarityMeasure::Renyi);
        let err = "euclidean".parse::<SimilarityMeasure>().unwrap_err();
        assert_eq!(err, ConfigError::UnknownSimilarityMeasure("euclidean".into()));
    }

    #[test]
    fn test_q_only_checked_for_parametric_measures() {
        assert!(Similarity::new(SimilarityMeasure::Cosine, 1.0).is_ok());
        assert!(Similarity::new(SimilarityMeasure::Shannon, -3.0).is_ok());
        assert!(matches!(
            Similarity::new(SimilarityMeasure::Renyi, 1.0),
            Err(ConfigError::InvalidEntropyDimension { .. })
        ));
        assert!(matches!(
            Similarity::new(SimilarityMeasure::Tsallis, 1.0),
            Err(ConfigError::InvalidEntropyDimension { .. })
        ));
    }

    #[test]
    fn test_entropy_measures_are_scale_invariant() {
        let q = [10.0, 90.0, 0.0];
        let r = [1.0, 9.0, 0.0];
        for measure in [
            SimilarityMeasure::Shannon,
            SimilarityMeasure::Renyi,
            SimilarityMeasure::Tsallis,
        ] {
            let sim = Similarity::new(measure, 1.1).unwrap();
            let score = sim.score(&q, &r, NormalizationMethod::Standard);
            assert!((score - 1.0).abs() < 1e-9, "{} -> {}", measure, score);
        }
    }

    #[test]
    fn test_zero_side_scores_zero() {
        for measure in [
            SimilarityMeasure::Cosine,
            SimilarityMeasure::Shannon,
            SimilarityMeasure::Renyi,
            SimilarityMeasure::Tsallis,
        ] {
            let sim = Similarity::new(measure, 1.1).unwrap();
            for method in [NormalizationMethod::Standard, NormalizationMethod::Softmax] {
                let score = sim.score(&[10.0, 90.0], &[0.0, 0.0], method);
                assert_eq!(score, 0.0, "{} {:?}", measure, method);
            }
        }
    }

    #[test]
    fn test_serde_lowercase() {
        let s = serde_json::to_string(&SimilarityMeasure::Tsallis).unwrap();
        assert_eq!(s, "\"tsallis\"");
    }
}
