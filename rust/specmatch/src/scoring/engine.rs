use rayon::prelude::*;
use std::time::Instant;
use tracing::{
    debug,
    info,
};

use super::matrix::ScoreMatrix;
use super::timings::MatchTimings;
use super::top_n::TopMatches;
use crate::config::MatchingConfig;
use crate::errors::Result;
use crate::models::{
    Spectrum,
    SpectrumId,
};
use crate::processing::Pipeline;
use crate::similarity::Similarity;
use crate::utils::math::finite_or_zero;

/// Scores query spectra against a fixed reference library.
///
/// The stages that run before peak matching only depend on one spectrum,
/// so they are applied to every reference once, on construction. The
/// caller's spectra are never modified.
///
/// ```
/// use specmatch::{LibraryMatcher, MatchingConfig, Spectrum};
///
/// let references = vec![
///     Spectrum::from_pairs("caffeine", &[(138.06, 40.0), (195.08, 100.0)]),
///     Spectrum::from_pairs("other", &[(300.0, 100.0)]),
/// ];
/// let matcher = LibraryMatcher::new(&references, MatchingConfig::default()).unwrap();
///
/// let query = Spectrum::from_pairs("unknown", &[(138.1, 35.0), (195.1, 100.0)]);
/// let scores = matcher.score_query(&query);
/// assert!(scores[0] > 0.99);
/// assert_eq!(scores[1], 0.0);
/// ```
#[derive(Debug)]
pub struct LibraryMatcher {
    config: MatchingConfig,
    pipeline: Pipeline,
    similarity: Similarity,
    reference_ids: Vec<SpectrumId>,
    prepared_references: Vec<Spectrum>,
    prepare_time: std::time::Duration,
}

impl LibraryMatcher {
    /// Validates `config` and prepares the references.
    ///
    /// Fails before any spectrum is touched if the configuration is invalid.
    pub fn new(references: &[Spectrum], config: MatchingConfig) -> Result<Self> {
        config.validate()?;
        let similarity = config.similarity()?;
        let pipeline = config.pipeline();

        let start = Instant::now();
        let prepared_references: Vec<Spectrum> = references
            .par_iter()
            .map(|spec| pipeline.prepare(spec))
            .collect();
        let prepare_time = start.elapsed();

        info!(
            n_references = references.len(),
            measure = %similarity.measure(),
            order = %pipeline.order,
            "Prepared reference library in {:?}",
            prepare_time
        );

        Ok(Self {
            reference_ids: references.iter().map(|s| s.id.clone()).collect(),
            config,
            pipeline,
            similarity,
            prepared_references,
            prepare_time,
        })
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    pub fn reference_ids(&self) -> &[SpectrumId] {
        &self.reference_ids
    }

    pub fn n_references(&self) -> usize {
        self.reference_ids.len()
    }

    /// Time it took to prepare the references.
    pub fn prepare_time(&self) -> std::time::Duration {
        self.prepare_time
    }

    fn score_prepared(&self, query: &Spectrum, reference: &Spectrum) -> f64 {
        let aligned = self.pipeline.finish(query, reference);
        let score = self.similarity.score(
            aligned.query(),
            aligned.reference(),
            self.config.normalization_method,
        );
        finite_or_zero(score)
    }

    /// Similarity of a single (query, reference) pair, running every stage.
    pub fn score_pair(&self, query: &Spectrum, reference: &Spectrum) -> f64 {
        self.score_prepared(&self.pipeline.prepare(query), &self.pipeline.prepare(reference))
    }

    /// Scores one query against every reference, in reference order.
    pub fn score_query(&self, query: &Spectrum) -> Vec<f64> {
        let prepared = self.pipeline.prepare(query);
        debug!(
            query = %query.id,
            n_peaks = query.len(),
            n_prepared_peaks = prepared.len(),
            "Scoring query"
        );
        self.prepared_references
            .iter()
            .map(|reference| self.score_prepared(&prepared, reference))
            .collect()
    }

    /// One row per query, in query order, computed in parallel.
    pub fn score_rows(&self, queries: &[Spectrum]) -> Vec<Vec<f64>> {
        queries.par_iter().map(|q| self.score_query(q)).collect()
    }

    pub fn score_matrix(&self, queries: &[Spectrum]) -> ScoreMatrix {
        self.score_matrix_timed(queries).0
    }

    /// Same as [`Self::score_matrix`], also reporting where the time went.
    pub fn score_matrix_timed(&self, queries: &[Spectrum]) -> (ScoreMatrix, MatchTimings) {
        let start = Instant::now();
        let rows = self.score_rows(queries);
        let timings = MatchTimings {
            prepare: self.prepare_time,
            score: start.elapsed(),
        };
        info!(
            n_queries = queries.len(),
            n_references = self.n_references(),
            "Scored {} pairs in {:?}",
            queries.len() * self.n_references(),
            timings.score
        );

        let matrix = ScoreMatrix::new(
            queries.iter().map(|q| q.id.clone()).collect(),
            self.reference_ids.clone(),
            rows,
        );
        (matrix, timings)
    }

    /// Ranks with the configured `n_top_matches_to_save`.
    pub fn top_matches(&self, matrix: &ScoreMatrix) -> Vec<TopMatches> {
        matrix.top_n(self.config.n_top_matches_to_save)
    }
}

/// Builds a matcher, scores every query, and ranks the results.
pub fn search(
    queries: &[Spectrum],
    references: &[Spectrum],
    config: MatchingConfig,
) -> Result<(ScoreMatrix, Vec<TopMatches>)> {
    let matcher = LibraryMatcher::new(references, config)?;
    let matrix = matcher.score_matrix(queries);
    let top = matcher.top_matches(&matrix);
    Ok((matrix, top))
}
