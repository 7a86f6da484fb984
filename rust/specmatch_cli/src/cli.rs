use clap::{
    Parser,
    Subcommand,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Match LC-MS spectra (long format: id, mz, intensity).
    Lcms(SearchArgs),
    /// Match GC-MS spectra (wide format: id, then one column per nominal mz).
    Gcms(SearchArgs),
    /// Write a template configuration file.
    WriteTemplate(WriteTemplateArgs),
}

/// Options shared by both search modes.
///
/// Every matching option left unset falls back to the configuration file,
/// and then to the built-in default.
#[derive(Parser, Debug, Clone, Default)]
pub struct SearchArgs {
    /// CSV file with the query spectra to identify.
    #[arg(short, long)]
    pub query_data: PathBuf,

    /// CSV file with the reference library spectra.
    #[arg(short, long)]
    pub reference_data: PathBuf,

    /// Path to a JSON configuration file (flags take precedence).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Similarity measure: cosine, shannon, renyi or tsallis.
    #[arg(long)]
    pub similarity_measure: Option<String>,

    /// Preprocessing order over C (clean), M (match), W (weight) and L
    /// (low-entropy transform). Must contain M. Ignored in GC-MS mode.
    #[arg(long)]
    pub spectrum_preprocessing_order: Option<String>,

    /// Window size used for centroiding and peak matching. Ignored in GC-MS mode.
    #[arg(long)]
    pub window_size: Option<f64>,

    /// Peaks below this fraction of the base peak are removed.
    #[arg(long)]
    pub noise_threshold: Option<f64>,

    /// Mass/charge weight factor.
    #[arg(long)]
    pub wf_mz: Option<f64>,

    /// Intensity weight factor.
    #[arg(long)]
    pub wf_intensity: Option<f64>,

    /// Low-entropy transform threshold.
    #[arg(long)]
    pub let_threshold: Option<f64>,

    /// Entropy dimension, only used by renyi and tsallis.
    #[arg(long)]
    pub entropy_dimension: Option<f64>,

    /// Normalization method: standard or softmax.
    #[arg(long)]
    pub normalization_method: Option<String>,

    /// Number of top matches to report per query (ties are all kept).
    #[arg(long)]
    pub n_top_matches_to_save: Option<usize>,

    /// Output CSV with the best references for each query.
    #[arg(long)]
    pub output_identification: Option<PathBuf>,

    /// Output CSV with every query x reference score.
    #[arg(long)]
    pub output_similarity_scores: Option<PathBuf>,

    /// Number of queries scored per progress step.
    #[arg(long)]
    pub chunk_size: Option<usize>,
}

#[derive(Parser, Debug)]
pub struct WriteTemplateArgs {
    /// The path to the output file.
    #[arg(short, long)]
    pub output_path: PathBuf,
}
