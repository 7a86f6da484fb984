use serde::{
    Deserialize,
    Serialize,
};

use crate::errors::{
    ConfigError,
    Result,
};
use crate::processing::{
    NormalizationMethod,
    Pipeline,
    PreprocessingOrder,
    PreprocessingParams,
    WeightFactors,
};
use crate::similarity::{
    Similarity,
    SimilarityMeasure,
};

/// Everything that controls a library search.
///
/// Missing fields take their defaults when deserializing, so a config file
/// only needs to list what it changes.
///
/// ```
/// use specmatch::MatchingConfig;
///
/// let config: MatchingConfig =
///     serde_json::from_str(r#"{"similarity_measure": "renyi", "entropy_dimension": 2.0}"#).unwrap();
/// assert_eq!(config.window_size, 0.5);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub similarity_measure: SimilarityMeasure,
    pub wf_mz: f64,
    pub wf_intensity: f64,
    pub entropy_dimension: f64,
    pub normalization_method: NormalizationMethod,
    pub spectrum_preprocessing_order: PreprocessingOrder,
    pub window_size: f64,
    pub noise_threshold: f64,
    pub let_threshold: f64,
    pub n_top_matches_to_save: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            similarity_measure: SimilarityMeasure::Cosine,
            wf_mz: 0.0,
            wf_intensity: 1.0,
            entropy_dimension: 1.1,
            normalization_method: NormalizationMethod::Standard,
            spectrum_preprocessing_order: PreprocessingOrder::default(),
            window_size: 0.5,
            noise_threshold: 0.0,
            let_threshold: 0.0,
            n_top_matches_to_save: 1,
        }
    }
}

fn non_negative(option: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::OutOfRange {
            option,
            value,
            expected: "a finite value >= 0",
        });
    }
    Ok(())
}

fn finite(option: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(ConfigError::OutOfRange {
            option,
            value,
            expected: "a finite value",
        });
    }
    Ok(())
}

impl MatchingConfig {
    /// Checks every option against its domain.
    ///
    /// The order string is already checked when it is parsed.
    pub fn validate(&self) -> Result<()> {
        self.similarity()?;
        non_negative("window_size", self.window_size)?;
        non_negative("let_threshold", self.let_threshold)?;
        if !(0.0..=1.0).contains(&self.noise_threshold) {
            return Err(ConfigError::OutOfRange {
                option: "noise_threshold",
                value: self.noise_threshold,
                expected: "a value in [0, 1]",
            });
        }
        finite("wf_mz", self.wf_mz)?;
        finite("wf_intensity", self.wf_intensity)?;
        if self.n_top_matches_to_save < 1 {
            return Err(ConfigError::InvalidTopN(self.n_top_matches_to_save));
        }
        Ok(())
    }

    pub fn similarity(&self) -> Result<Similarity> {
        Similarity::new(self.similarity_measure, self.entropy_dimension)
    }

    pub fn weight_factors(&self) -> WeightFactors {
        WeightFactors {
            wf_mz: self.wf_mz,
            wf_intensity: self.wf_intensity,
        }
    }

    pub fn preprocessing_params(&self) -> PreprocessingParams {
        PreprocessingParams {
            window_size: self.window_size,
            noise_threshold: self.noise_threshold,
            weight_factors: self.weight_factors(),
            let_threshold: self.let_threshold,
            normalization_method: self.normalization_method,
        }
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(
            self.spectrum_preprocessing_order.clone(),
            self.preprocessing_params(),
        )
    }
}
