use thiserror::Error;

/// Invalid run configuration.
///
/// These are raised by [`crate::MatchingConfig::validate`] before any
/// comparison runs, and are fatal to the run. Degenerate spectra (empty,
/// all-zero) are never reported here, every component has a fallback value
/// for those.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Unknown similarity measure '{0}', expected one of: cosine, shannon, renyi, tsallis")]
    UnknownSimilarityMeasure(String),

    #[error("Unknown normalization method '{0}', expected one of: standard, softmax")]
    UnknownNormalizationMethod(String),

    #[error(
        "Invalid spectrum_preprocessing_order '{order}': {reason} (expected 1-4 distinct characters from C, M, W, L, including M)"
    )]
    InvalidPreprocessingOrder { order: String, reason: String },

    #[error(
        "Invalid entropy_dimension {q} for the {measure} similarity measure, expected a finite value > 0 and != 1"
    )]
    InvalidEntropyDimension { q: f64, measure: &'static str },

    #[error("Invalid {option} = {value}, expected {expected}")]
    OutOfRange {
        option: &'static str,
        value: f64,
        expected: &'static str,
    },

    #[error("Invalid n_top_matches_to_save = {0}, expected an integer >= 1")]
    InvalidTopN(usize),
}

impl ConfigError {
    pub(crate) fn invalid_order(order: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPreprocessingOrder {
            order: order.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
