use indicatif::{
    ProgressIterator,
    ProgressStyle,
};
use specmatch::{
    LibraryMatcher,
    MatchTimings,
    ScoreMatrix,
    Spectrum,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::{
    Duration,
    Instant,
};
use tracing::{
    debug,
    info,
};

use crate::cli::{
    SearchArgs,
    WriteTemplateArgs,
};
use crate::config::{
    Mode,
    RunConfig,
};
use crate::error::CliError;
use crate::io::{
    read_library,
    write_identification,
    write_score_matrix,
};

/// Scores `queries` in chunks, showing a progress bar over the chunks.
///
/// Parallelism happens inside each chunk. Rows are appended in chunk order,
/// so the matrix keeps the query order.
pub fn main_loop(
    queries: &[Spectrum],
    matcher: &LibraryMatcher,
    chunk_size: usize,
) -> (ScoreMatrix, MatchTimings) {
    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(queries.len());
    let mut timings = MatchTimings {
        prepare: matcher.prepare_time(),
        score: Duration::ZERO,
    };
    let mut chunk_num = 0;
    let start = Instant::now();

    let style = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar());
    queries
        .chunks(chunk_size.max(1))
        .progress_with_style(style)
        .for_each(|chunk| {
            let chunk_start = Instant::now();
            let out = matcher.score_rows(chunk);
            timings += MatchTimings {
                prepare: Duration::ZERO,
                score: chunk_start.elapsed(),
            };
            let best = out
                .iter()
                .flat_map(|row| row.iter().copied())
                .fold(0.0, f64::max);
            debug!("Best score in chunk {}: {}", chunk_num, best);
            rows.extend(out);
            chunk_num += 1;
        });

    info!(
        "Finished scoring {} queries in {} chunks in {:?}",
        queries.len(),
        chunk_num,
        start.elapsed()
    );
    let matrix = ScoreMatrix::new(
        queries.iter().map(|q| q.id.clone()).collect(),
        matcher.reference_ids().to_vec(),
        rows,
    );
    (matrix, timings)
}

fn create_output(path: &Path) -> Result<BufWriter<File>, CliError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(BufWriter::new(File::create(path)?))
}

pub fn main_search(mode: Mode, args: SearchArgs) -> Result<(), CliError> {
    // Nothing is read or written until the configuration is known to be valid.
    let config = RunConfig::resolve(mode, &args)?;
    info!("Running {} search with configuration: {:#?}", mode.label(), config);

    let st = Instant::now();
    let queries = read_library(mode, &args.query_data)?;
    let references = read_library(mode, &args.reference_data)?;
    info!(
        "Loaded {} queries and {} references in {:?}",
        queries.len(),
        references.len(),
        st.elapsed()
    );

    let matcher = LibraryMatcher::new(&references, config.matching.clone())?;
    let (matrix, timings) = main_loop(&queries, &matcher, config.chunk_size);
    info!("Timings: {}", serde_json::to_string(&timings)?);
    let top = matcher.top_matches(&matrix);

    let identification_path = config.identification_path(mode);
    write_identification(create_output(&identification_path)?, &top)?;
    info!("Wrote identifications to {}", identification_path.display());

    let scores_path = config.scores_path(mode);
    write_score_matrix(create_output(&scores_path)?, &matrix, mode)?;
    info!("Wrote similarity scores to {}", scores_path.display());
    Ok(())
}

pub fn main_write_template(args: WriteTemplateArgs) -> Result<(), CliError> {
    let path = args.output_path;
    let text = serde_json::to_string_pretty(&RunConfig::default())?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(&path, text)?;
    println!("Wrote configuration template to: {}", path.display());
    Ok(())
}
