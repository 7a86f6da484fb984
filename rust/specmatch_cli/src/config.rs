use serde::{
    Deserialize,
    Serialize,
};
use specmatch::{
    MatchingConfig,
    PreprocessingOrder,
};
use std::io::BufReader;
use std::path::{
    Path,
    PathBuf,
};
use tracing::info;

use crate::cli::SearchArgs;
use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Lcms,
    Gcms,
}

impl Mode {
    pub fn label(&self) -> &'static str {
        match self {
            Mode::Lcms => "lcms",
            Mode::Gcms => "gcms",
        }
    }

    /// Prefix of the reference columns in the score matrix.
    pub fn reference_column_prefix(&self) -> &'static str {
        match self {
            Mode::Lcms => "Reference Spectrum ID: ",
            Mode::Gcms => "Reference Spectrum ID ",
        }
    }

    pub fn default_identification_path(&self) -> PathBuf {
        PathBuf::from(format!("output_{}_identification.csv", self.label()))
    }

    pub fn default_scores_path(&self) -> PathBuf {
        PathBuf::from(format!("output_{}_all_similarity_scores.csv", self.label()))
    }
}

/// Contents of the JSON configuration file.
///
/// The matching options sit at the top level, next to the run options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    #[serde(flatten)]
    pub matching: MatchingConfig,
    pub chunk_size: usize,
    pub output_identification: Option<PathBuf>,
    pub output_similarity_scores: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            matching: MatchingConfig::default(),
            chunk_size: 100,
            output_identification: None,
            output_similarity_scores: None,
        }
    }
}

impl RunConfig {
    pub fn from_file(path: &Path) -> Result<Self, CliError> {
        info!("Loading configuration from {}", path.display());
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Loads the file given with `--config` (if any), applies the flags on
    /// top, pins the GC-MS preprocessing and validates the result.
    pub fn resolve(mode: Mode, args: &SearchArgs) -> Result<Self, CliError> {
        let config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.with_cli_args(args)?.for_mode(mode)?;
        config.matching.validate()?;
        Ok(config)
    }

    pub fn with_cli_args(mut self, args: &SearchArgs) -> Result<Self, CliError> {
        let m = &mut self.matching;
        if let Some(measure) = &args.similarity_measure {
            m.similarity_measure = measure.parse()?;
        }
        if let Some(order) = &args.spectrum_preprocessing_order {
            m.spectrum_preprocessing_order = order.parse()?;
        }
        if let Some(method) = &args.normalization_method {
            m.normalization_method = method.parse()?;
        }
        if let Some(x) = args.window_size {
            m.window_size = x;
        }
        if let Some(x) = args.noise_threshold {
            m.noise_threshold = x;
        }
        if let Some(x) = args.wf_mz {
            m.wf_mz = x;
        }
        if let Some(x) = args.wf_intensity {
            m.wf_intensity = x;
        }
        if let Some(x) = args.let_threshold {
            m.let_threshold = x;
        }
        if let Some(x) = args.entropy_dimension {
            m.entropy_dimension = x;
        }
        if let Some(x) = args.n_top_matches_to_save {
            m.n_top_matches_to_save = x;
        }
        if let Some(x) = args.chunk_size {
            self.chunk_size = x;
        }
        if let Some(path) = &args.output_identification {
            self.output_identification = Some(path.clone());
        }
        if let Some(path) = &args.output_similarity_scores {
            self.output_similarity_scores = Some(path.clone());
        }
        Ok(self)
    }

    /// GC-MS spectra are already on a nominal mz grid, so they are only
    /// aligned exactly and weighted.
    pub fn for_mode(mut self, mode: Mode) -> Result<Self, CliError> {
        if mode == Mode::Gcms {
            let order: PreprocessingOrder = "MW".parse()?;
            if self.matching.spectrum_preprocessing_order != order || self.matching.window_size != 0.0 {
                info!(
                    "GC-MS mode uses preprocessing order {} with window size 0, ignoring {} / {}",
                    order, self.matching.spectrum_preprocessing_order, self.matching.window_size
                );
            }
            // No C or L stage runs, so their thresholds are cleared too.
            if self.matching.noise_threshold != 0.0 || self.matching.let_threshold != 0.0 {
                info!(
                    "GC-MS mode does not clean or low-entropy transform, ignoring noise_threshold {} and let_threshold {}",
                    self.matching.noise_threshold, self.matching.let_threshold
                );
            }
            self.matching.spectrum_preprocessing_order = order;
            self.matching.window_size = 0.0;
            self.matching.noise_threshold = 0.0;
            self.matching.let_threshold = 0.0;
        }
        self.chunk_size = self.chunk_size.max(1);
        Ok(self)
    }

    pub fn identification_path(&self, mode: Mode) -> PathBuf {
        self.output_identification
            .clone()
            .unwrap_or_else(|| mode.default_identification_path())
    }

    pub fn scores_path(&self, mode: Mode) -> PathBuf {
        self.output_similarity_scores
            .clone()
            .unwrap_or_else(|| mode.default_scores_path())
    }
}
