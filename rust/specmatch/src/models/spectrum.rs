use serde::{
    Deserialize,
    Serialize,
};
use std::fmt::Display;
use std::sync::Arc;

/// Identifier of a spectrum, used only for reporting.
///
/// Numeric identifiers (CAS numbers, scan numbers ...) are kept as their
/// textual representation so they round-trip through the output tables
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SpectrumId(Arc<str>);

impl SpectrumId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SpectrumId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SpectrumId {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl From<String> for SpectrumId {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}

impl From<u64> for SpectrumId {
    fn from(value: u64) -> Self {
        Self(value.to_string().into())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    pub mz: f64,
    pub intensity: f64,
}

impl Peak {
    pub fn new(mz: f64, intensity: f64) -> Self {
        Self { mz, intensity }
    }
}

impl From<(f64, f64)> for Peak {
    fn from((mz, intensity): (f64, f64)) -> Self {
        Self { mz, intensity }
    }
}

/// A single mass spectrum, an identifier plus its (mz, intensity) peaks.
///
/// Peaks are not required to be sorted. Every transformation in
/// [`crate::processing`] returns a new spectrum, so a reference spectrum
/// can be compared against any number of queries without carrying state
/// over between comparisons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spectrum {
    pub id: SpectrumId,
    pub peaks: Vec<Peak>,
}

impl Spectrum {
    pub fn new(id: impl Into<SpectrumId>, peaks: Vec<Peak>) -> Self {
        Self {
            id: id.into(),
            peaks,
        }
    }

    /// Builds a spectrum from (mz, intensity) tuples.
    ///
    /// ```
    /// use specmatch::Spectrum;
    ///
    /// let spec = Spectrum::from_pairs("caffeine", &[(195.08, 100.0), (138.06, 40.0)]);
    /// assert_eq!(spec.len(), 2);
    /// assert_eq!(spec.max_intensity(), 100.0);
    /// ```
    pub fn from_pairs(id: impl Into<SpectrumId>, pairs: &[(f64, f64)]) -> Self {
        Self::new(id, pairs.iter().copied().map(Peak::from).collect())
    }

    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    pub fn max_intensity(&self) -> f64 {
        self.peaks.iter().map(|p| p.intensity).fold(0.0, f64::max)
    }

    pub fn mzs(&self) -> Vec<f64> {
        self.peaks.iter().map(|p| p.mz).collect()
    }

    pub fn intensities(&self) -> Vec<f64> {
        self.peaks.iter().map(|p| p.intensity).collect()
    }

    /// Returns a copy with the same identifier and mz values but new intensities.
    ///
    /// `intensities` must have one value per peak.
    pub(crate) fn with_intensities(&self, intensities: Vec<f64>) -> Self {
        debug_assert_eq!(intensities.len(), self.peaks.len());
        let peaks = self
            .peaks
            .iter()
            .zip(intensities)
            .map(|(p, intensity)| Peak::new(p.mz, intensity))
            .collect();
        Self {
            id: self.id.clone(),
            peaks,
        }
    }

    pub fn sorted_by_mz(&self) -> Self {
        let mut peaks = self.peaks.clone();
        peaks.sort_by(|a, b| a.mz.total_cmp(&b.mz));
        Self {
            id: self.id.clone(),
            peaks,
        }
    }
}

/// Two intensity vectors index-aligned to a shared, ascending set of mz bins.
///
/// Produced by [`crate::processing::matching::match_peaks`]. All three
/// vectors always have the same length, a side without a peak in a bin
/// holds 0.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignedPair {
    bins: Vec<f64>,
    query: Vec<f64>,
    reference: Vec<f64>,
}

impl AlignedPair {
    /// # Panics
    /// If the three vectors differ in length. The aligner is the only
    /// producer of these, so a mismatch is a bug, not bad input.
    pub fn new(bins: Vec<f64>, query: Vec<f64>, reference: Vec<f64>) -> Self {
        assert_eq!(bins.len(), query.len(), "Query intensities must match bins");
        assert_eq!(
            bins.len(),
            reference.len(),
            "Reference intensities must match bins"
        );
        Self {
            bins,
            query,
            reference,
        }
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn bins(&self) -> &[f64] {
        &self.bins
    }

    pub fn query(&self) -> &[f64] {
        &self.query
    }

    pub fn reference(&self) -> &[f64] {
        &self.reference
    }

    /// Applies `f(bins, side)` to both sides, keeping the bins.
    pub(crate) fn map_sides(&self, f: impl Fn(&[f64], &[f64]) -> Vec<f64>) -> Self {
        Self::new(
            self.bins.clone(),
            f(&self.bins, &self.query),
            f(&self.bins, &self.reference),
        )
    }
}
