//! Ordered preprocessing of a (query, reference) spectrum pair.
//!
//! The order is given as a short code over `{C, M, W, L}` (clean, match,
//! weight, low-entropy transform) and is applied exactly as written. `M`
//! is mandatory, it is what turns two variable-length spectra into
//! index-aligned vectors.
//!
//! Stages before `M` only ever look at one spectrum at a time, so
//! [`Pipeline::prepare`] can run them once per spectrum and
//! [`Pipeline::finish`] runs the alignment plus whatever follows it for
//! every pair. [`Pipeline::run`] is both steps in one go.

use serde::{
    Deserialize,
    Serialize,
};
use std::fmt::Display;
use std::str::FromStr;

use super::clean::{
    clean_aligned,
    clean_spectrum,
};
use super::low_entropy::low_entropy_transform;
use super::matching::match_peaks;
use super::normalize::NormalizationMethod;
use super::weighting::{
    WeightFactors,
    weight_intensities,
    weight_spectrum,
};
use crate::errors::ConfigError;
use crate::models::{
    AlignedPair,
    Spectrum,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Clean,
    Match,
    Weight,
    LowEntropyTransform,
}

impl Stage {
    pub fn code(&self) -> char {
        match self {
            Stage::Clean => 'C',
            Stage::Match => 'M',
            Stage::Weight => 'W',
            Stage::LowEntropyTransform => 'L',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'C' => Some(Stage::Clean),
            'M' => Some(Stage::Match),
            'W' => Some(Stage::Weight),
            'L' => Some(Stage::LowEntropyTransform),
            _ => None,
        }
    }

    /// Applies a single-spectrum stage.
    ///
    /// `Match` needs both spectra and is a no-op here.
    pub fn apply_spectrum(&self, spectrum: &Spectrum, params: &PreprocessingParams) -> Spectrum {
        match self {
            Stage::Clean => {
                clean_spectrum(spectrum, params.noise_threshold, params.window_size)
            }
            Stage::Weight => weight_spectrum(spectrum, params.weight_factors),
            Stage::LowEntropyTransform => spectrum.with_intensities(low_entropy_transform(
                &spectrum.intensities(),
                params.let_threshold,
                params.normalization_method,
            )),
            Stage::Match => spectrum.clone(),
        }
    }

    pub fn apply(&self, state: PipelineState, params: &PreprocessingParams) -> PipelineState {
        match state {
            PipelineState::Unaligned { query, reference } => match self {
                Stage::Match => PipelineState::Aligned(match_peaks(
                    &query,
                    &reference,
                    params.window_size,
                )),
                _ => PipelineState::Unaligned {
                    query: self.apply_spectrum(&query, params),
                    reference: self.apply_spectrum(&reference, params),
                },
            },
            PipelineState::Aligned(pair) => PipelineState::Aligned(match self {
                Stage::Clean => clean_aligned(&pair, params.noise_threshold),
                Stage::Weight => pair.map_sides(|bins, side| {
                    weight_intensities(bins, side, params.weight_factors)
                }),
                Stage::LowEntropyTransform => pair.map_sides(|_bins, side| {
                    low_entropy_transform(side, params.let_threshold, params.normalization_method)
                }),
                Stage::Match => pair,
            }),
        }
    }
}

/// Working value threaded through the stages.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineState {
    Unaligned { query: Spectrum, reference: Spectrum },
    Aligned(AlignedPair),
}

/// Validated stage order, see the module docs.
///
/// ```
/// use specmatch::processing::pipeline::{PreprocessingOrder, Stage};
///
/// let order: PreprocessingOrder = "WCM".parse().unwrap();
/// assert_eq!(order.stages(), &[Stage::Weight, Stage::Clean, Stage::Match]);
/// assert!("CWL".parse::<PreprocessingOrder>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PreprocessingOrder(Vec<Stage>);

impl PreprocessingOrder {
    pub const MAX_STAGES: usize = 4;

    pub fn stages(&self) -> &[Stage] {
        &self.0
    }

    /// Splits into the stages before `M` and the stages after it.
    pub fn split_at_match(&self) -> (&[Stage], &[Stage]) {
        // Presence of M is checked on construction.
        let pos = self
            .0
            .iter()
            .position(|s| *s == Stage::Match)
            .unwrap_or(self.0.len());
        let (prefix, rest) = self.0.split_at(pos);
        (prefix, rest.get(1..).unwrap_or(&[]))
    }

    fn validate(order: &str, stages: Vec<Stage>) -> Result<Self, ConfigError> {
        if stages.is_empty() {
            return Err(ConfigError::invalid_order(order, "no stages given"));
        }
        if stages.len() > Self::MAX_STAGES {
            return Err(ConfigError::invalid_order(order, "too many stages"));
        }
        for (i, stage) in stages.iter().enumerate() {
            if stages[..i].contains(stage) {
                return Err(ConfigError::invalid_order(
                    order,
                    format!("stage '{}' appears more than once", stage.code()),
                ));
            }
        }
        if !stages.contains(&Stage::Match) {
            return Err(ConfigError::invalid_order(
                order,
                "'M' (peak matching) is required",
            ));
        }
        Ok(Self(stages))
    }
}

impl Default for PreprocessingOrder {
    fn default() -> Self {
        Self(vec![
            Stage::Clean,
            Stage::Match,
            Stage::Weight,
            Stage::LowEntropyTransform,
        ])
    }
}

impl FromStr for PreprocessingOrder {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let stages = trimmed
            .chars()
            .map(|c| {
                Stage::from_code(c).ok_or_else(|| {
                    ConfigError::invalid_order(trimmed, format!("unknown stage '{}'", c))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::validate(trimmed, stages)
    }
}

impl TryFrom<String> for PreprocessingOrder {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PreprocessingOrder> for String {
    fn from(value: PreprocessingOrder) -> Self {
        value.to_string()
    }
}

impl Display for PreprocessingOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for stage in self.0.iter() {
            write!(f, "{}", stage.code())?;
        }
        Ok(())
    }
}

/// Numeric parameters shared by all stages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreprocessingParams {
    pub window_size: f64,
    pub noise_threshold: f64,
    pub weight_factors: WeightFactors,
    pub let_threshold: f64,
    pub normalization_method: NormalizationMethod,
}

impl Default for PreprocessingParams {
    fn default() -> Self {
        Self {
            window_size: 0.5,
            noise_threshold: 0.0,
            weight_factors: WeightFactors::default(),
            let_threshold: 0.0,
            normalization_method: NormalizationMethod::Standard,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    pub order: PreprocessingOrder,
    pub params: PreprocessingParams,
}

impl Pipeline {
    pub fn new(order: PreprocessingOrder, params: PreprocessingParams) -> Self {
        Self { order, params }
    }

    /// Runs the stages that come before `M` on a single spectrum.
    pub fn prepare(&self, spectrum: &Spectrum) -> Spectrum {
        let (prefix, _) = self.order.split_at_match();
        let mut out = spectrum.clone();
        for stage in prefix {
            out = stage.apply_spectrum(&out, &self.params);
        }
        out
    }

    /// Aligns two prepared spectra and runs the stages after `M`.
    pub fn finish(&self, query: &Spectrum, reference: &Spectrum) -> AlignedPair {
        let (_, suffix) = self.order.split_at_match();
        let mut state =
            PipelineState::Aligned(match_peaks(query, reference, self.params.window_size));
        for stage in suffix {
            state = stage.apply(state, &self.params);
        }
        match state {
            PipelineState::Aligned(pair) => pair,
            // Stages never un-align a pair.
            PipelineState::Unaligned { query, reference } => {
                match_peaks(&query, &reference, self.params.window_size)
            }
        }
    }

    /// Runs every stage, in order, on a (query, reference) pair.
    ///
    /// Neither input is modified.
    pub fn run(&self, query: &Spectrum, reference: &Spectrum) -> AlignedPair {
        let mut state = PipelineState::Unaligned {
            query: query.clone(),
            reference: reference.clone(),
        };
        for stage in self.order.stages() {
            state = stage.apply(state, &self.params);
        }
        match state {
            PipelineState::Aligned(pair) => pair,
            PipelineState::Unaligned { query, reference } => {
                match_peaks(&query, &reference, self.params.window_size)
            }
        }
    }
}
