//! CSV readers and writers for spectral libraries and search results.
//!
//! Two library layouts are supported:
//! - long (LC-MS): one peak per row, `id, mz, intensity`; rows sharing an
//!   identifier make up one spectrum.
//! - wide (GC-MS): one spectrum per row, `id` followed by the intensities at
//!   nominal mz 1, 2, ... K.
//!
//! Both have a header row, whose names are ignored.

use specmatch::{
    Peak,
    ScoreMatrix,
    Spectrum,
    TopMatches,
};
use std::collections::HashMap;
use std::io::{
    Read,
    Write,
};
use std::path::Path;
use tracing::{
    info,
    warn,
};

use crate::config::Mode;
use crate::error::CliError;

fn reader<R: Read>(rdr: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(rdr)
}

fn parse_field(
    record: &csv::StringRecord,
    idx: usize,
    name: &str,
    source: &Path,
    row: u64,
) -> Result<Option<f64>, CliError> {
    let field = record.get(idx).ok_or_else(|| CliError::DataReading {
        path: source.to_path_buf(),
        row,
        msg: format!("missing {} column", name),
    })?;
    if field.is_empty() {
        return Ok(None);
    }
    field.parse::<f64>().map(Some).map_err(|e| CliError::DataReading {
        path: source.to_path_buf(),
        row,
        msg: format!("could not parse {} '{}': {}", name, field, e),
    })
}

/// Reads a long-format library, spectra in order of first appearance.
///
/// Rows with an empty mz or intensity are dropped with a warning, rows
/// that cannot be parsed are an error.
pub fn read_long_spectra<R: Read>(rdr: R, source: &Path) -> Result<Vec<Spectrum>, CliError> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut spectra: Vec<(String, Vec<Peak>)> = Vec::new();
    let mut dropped = 0;

    for (i, record) in reader(rdr).records().enumerate() {
        let record = record?;
        // 1-based, counting the header
        let row = i as u64 + 2;
        let id = record.get(0).unwrap_or_default();
        let mz = parse_field(&record, 1, "mz", source, row)?;
        let intensity = parse_field(&record, 2, "intensity", source, row)?;
        let (Some(mz), Some(intensity)) = (mz, intensity) else {
            warn!("Dropping row {} of {}: empty value", row, source.display());
            dropped += 1;
            continue;
        };

        let slot = *index.entry(id.to_string()).or_insert_with(|| {
            spectra.push((id.to_string(), Vec::new()));
            spectra.len() - 1
        });
        spectra[slot].1.push(Peak::new(mz, intensity));
    }

    info!(
        "Read {} spectra from {} ({} rows dropped)",
        spectra.len(),
        source.display(),
        dropped
    );
    Ok(spectra
        .into_iter()
        .map(|(id, peaks)| Spectrum::new(id, peaks))
        .collect())
}

/// Reads a wide-format library.
///
/// The k-th intensity column is the intensity at mz `k`. Empty cells count
/// as 0.
pub fn read_wide_spectra<R: Read>(rdr: R, source: &Path) -> Result<Vec<Spectrum>, CliError> {
    let mut rdr = reader(rdr);
    let n_mz = rdr.headers()?.len().saturating_sub(1);
    let mut spectra = Vec::new();

    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let row = i as u64 + 2;
        let id = record.get(0).unwrap_or_default();
        let mut peaks = Vec::with_capacity(n_mz);
        for col in 1..=n_mz {
            let intensity = parse_field(&record, col, "intensity", source, row)?.unwrap_or(0.0);
            peaks.push(Peak::new(col as f64, intensity));
        }
        spectra.push(Spectrum::new(id, peaks));
    }

    info!(
        "Read {} spectra over {} nominal masses from {}",
        spectra.len(),
        n_mz,
        source.display()
    );
    Ok(spectra)
}

pub fn read_library(mode: Mode, path: &Path) -> Result<Vec<Spectrum>, CliError> {
    let file = std::fs::File::open(path)?;
    let rdr = std::io::BufReader::new(file);
    match mode {
        Mode::Lcms => read_long_spectra(rdr, path),
        Mode::Gcms => read_wide_spectra(rdr, path),
    }
}

/// One row per query: identifier, `;`-joined best references, best score.
pub fn write_identification<W: Write>(wtr: W, top: &[TopMatches]) -> Result<(), CliError> {
    let mut wtr = csv::Writer::from_writer(wtr);
    wtr.write_record(["Query Spectrum ID", "N1.PRED", "N1.SIMILARITY.SCORE"])?;
    for t in top {
        wtr.write_record([
            t.query_id.to_string(),
            t.joined_ids(";"),
            t.representative_score().to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Full query x reference matrix. The reference column prefix depends on `mode`.
pub fn write_score_matrix<W: Write>(
    wtr: W,
    matrix: &ScoreMatrix,
    mode: Mode,
) -> Result<(), CliError> {
    let mut wtr = csv::Writer::from_writer(wtr);
    let prefix = mode.reference_column_prefix();
    let header = std::iter::once("Query Spectrum ID".to_string()).chain(
        matrix
            .reference_ids()
            .iter()
            .map(|id| format!("{}{}", prefix, id)),
    );
    wtr.write_record(header)?;
    for (id, row) in matrix.iter_rows() {
        let record = std::iter::once(id.to_string()).chain(row.iter().map(|s| s.to_string()));
        wtr.write_record(record)?;
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn src() -> &'static Path {
        Path::new("test.csv")
    }

    #[test]
    fn test_long_format_groups_by_first_appearance() {
        let data = "id,mz,intensity\nb,50.0,10\na,60.0,5\nb,51.0,90\n";
        let spectra = read_long_spectra(data.as_bytes(), src()).unwrap();
        assert_eq!(spectra.len(), 2);
        assert_eq!(spectra[0].id.as_str(), "b");
        assert_eq!(spectra[0].mzs(), vec![50.0, 51.0]);
        assert_eq!(spectra[0].intensities(), vec![10.0, 90.0]);
        assert_eq!(spectra[1].id.as_str(), "a");
    }

    #[test]
    fn test_long_format_drops_empty_and_rejects_garbage() {
        let data = "id,mz,intensity\na,50.0,\na,51.0,3\n";
        let spectra = read_long_spectra(data.as_bytes(), src()).unwrap();
        assert_eq!(spectra[0].len(), 1);

        let data = "id,mz,intensity\na,50.0,1\na,abc,3\n";
        let err = read_long_spectra(data.as_bytes(), src()).unwrap_err();
        match err {
            CliError::DataReading { row, .. } => assert_eq!(row, 3),
            other => panic!("unexpected error {:?}", other),
        }

        let data = "id,mz,intensity\na,50.0\n";
        assert!(read_long_spectra(data.as_bytes(), src()).is_err());
    }

    #[test]
    fn test_wide_format_uses_column_position_as_mz() {
        let data = "id,1,2,3\n58082,0,10,\n64175,5,0,1\n";
        let spectra = read_wide_spectra(data.as_bytes(), src()).unwrap();
        assert_eq!(spectra.len(), 2);
        assert_eq!(spectra[0].id.as_str(), "58082");
        assert_eq!(spectra[0].mzs(), vec![1.0, 2.0, 3.0]);
        assert_eq!(spectra[0].intensities(), vec![0.0, 10.0, 0.0]);
        assert_eq!(spectra[1].intensities(), vec![5.0, 0.0, 1.0]);
    }

    #[test]
    fn test_write_identification() {
        let matrix = ScoreMatrix::new(
            vec!["q1".into()],
            vec!["r1".into(), "r2".into(), "r3".into()],
            vec![vec![0.9, 0.9, 0.5]],
        );
        let mut out = Vec::new();
        write_identification(&mut out, &matrix.top_n(1)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Query Spectrum ID,N1.PRED,N1.SIMILARITY.SCORE\nq1,r1;r2,0.9\n"
        );
    }

    #[test]
    fn test_write_score_matrix() {
        let matrix = ScoreMatrix::new(
            vec!["q1".into(), "q2".into()],
            vec!["r1".into(), "r2".into()],
            vec![vec![1.0, 0.0], vec![0.25, 0.5]],
        );
        let mut out = Vec::new();
        write_score_matrix(&mut out, &matrix, Mode::Lcms).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "Query Spectrum ID,Reference Spectrum ID: r1,Reference Spectrum ID: r2"
        );
        assert_eq!(lines[1], "q1,1,0");
        assert_eq!(lines[2], "q2,0.25,0.5");
    }

    #[test]
    fn test_gcms_score_header_has_no_colon() {
        let matrix = ScoreMatrix::new(
            vec!["58082".into()],
            vec!["64175".into(), "7".into()],
            vec![vec![0.5, 1.0]],
        );
        let mut out = Vec::new();
        write_score_matrix(&mut out, &matrix, Mode::Gcms).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "Query Spectrum ID,Reference Spectrum ID 64175,Reference Spectrum ID 7\n58082,0.5,1\n"
        );
    }
}
