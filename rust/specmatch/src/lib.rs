//! Spectral library matching.
//!
//! Query spectra are preprocessed, aligned against every reference
//! spectrum of a library and scored with one of several similarity
//! measures. The result is a dense [`ScoreMatrix`] and, per query, the
//! best matching references as [`TopMatches`].

pub mod config;
pub mod errors;
pub mod models;
pub mod processing;
pub mod scoring;
pub mod similarity;
pub mod utils;

pub use config::MatchingConfig;
pub use errors::ConfigError;
pub use models::{
    AlignedPair,
    Peak,
    Spectrum,
    SpectrumId,
};
pub use processing::{
    NormalizationMethod,
    PreprocessingOrder,
};
pub use scoring::{
    LibraryMatcher,
    MatchTimings,
    ScoreMatrix,
    TopMatches,
    search,
};
pub use similarity::{
    Similarity,
    SimilarityMeasure,
};
