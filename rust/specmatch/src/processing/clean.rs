//! Noise removal and centroiding.
//!
//! Centroiding follows a greedy, intensity-ordered clustering: the most
//! intense untaken peak becomes a parent and absorbs every untaken peak
//! within `window_size` of it. The merged peak is placed at the
//! intensity-weighted mean mz and carries the summed intensity. Passes are
//! repeated until no two neighboring peaks are within `window_size`, since
//! moving a centroid can bring it into range of a peak it did not absorb.

use crate::models::{
    AlignedPair,
    Peak,
    Spectrum,
};

struct PeakAggregator {
    weighted_mz_sum: f64,
    total_intensity: f64,
}

impl PeakAggregator {
    fn new(peak: &Peak) -> Self {
        Self {
            weighted_mz_sum: peak.mz * peak.intensity,
            total_intensity: peak.intensity,
        }
    }

    fn add_peak(&mut self, peak: &Peak) {
        self.weighted_mz_sum += peak.mz * peak.intensity;
        self.total_intensity += peak.intensity;
    }

    fn finalize(&self) -> Peak {
        Peak::new(
            self.weighted_mz_sum / self.total_intensity,
            self.total_intensity,
        )
    }
}

/// Removes noise and centroids a raw spectrum.
///
/// 1. Peaks with non-positive or non-finite intensity are dropped.
/// 2. Peaks below `noise_threshold * max(intensity)` are dropped.
/// 3. Peaks within `window_size` of each other are merged.
///
/// The output is sorted by mz and never has more peaks than the input.
/// If everything is filtered out the result is an empty spectrum.
///
/// ```
/// use specmatch::Spectrum;
/// use specmatch::processing::clean::clean_spectrum;
///
/// let raw = Spectrum::from_pairs("raw", &[(100.0, 10.0), (100.1, 30.0), (150.0, 1.0)]);
/// let clean = clean_spectrum(&raw, 0.05, 0.5);
/// assert_eq!(clean.len(), 1);
/// assert!((clean.peaks[0].mz - 100.075).abs() < 1e-9);
/// assert_eq!(clean.peaks[0].intensity, 40.0);
/// ```
pub fn clean_spectrum(spectrum: &Spectrum, noise_threshold: f64, window_size: f64) -> Spectrum {
    let mut peaks: Vec<Peak> = spectrum
        .peaks
        .iter()
        .filter(|p| p.mz.is_finite() && p.intensity.is_finite() && p.intensity > 0.0)
        .copied()
        .collect();

    if !peaks.is_empty() && noise_threshold > 0.0 {
        let max_intensity = peaks.iter().map(|p| p.intensity).fold(0.0, f64::max);
        let cutoff = noise_threshold * max_intensity;
        peaks.retain(|p| p.intensity >= cutoff);
    }

    peaks.sort_by(|a, b| a.mz.total_cmp(&b.mz));
    while needs_centroiding(&peaks, window_size) {
        peaks = centroid_pass(&peaks, window_size);
    }

    Spectrum::new(spectrum.id.clone(), peaks)
}

/// Applies the noise threshold to each side of an already aligned pair.
///
/// Entries below `noise_threshold * max(side)` are set to 0. Bins are
/// already further than the window apart, so no merging is needed and the
/// alignment is kept.
pub fn clean_aligned(pair: &AlignedPair, noise_threshold: f64) -> AlignedPair {
    pair.map_sides(|_bins, side| {
        let cutoff = noise_threshold * side.iter().copied().fold(0.0, f64::max);
        side.iter()
            .map(|&x| {
                if x.is_finite() && x > 0.0 && x >= cutoff {
                    x
                } else {
                    0.0
                }
            })
            .collect()
    })
}

/// `peaks` must be sorted by mz.
fn needs_centroiding(peaks: &[Peak], window_size: f64) -> bool {
    peaks
        .windows(2)
        .any(|w| (w[1].mz - w[0].mz) <= window_size)
}

/// Single greedy clustering pass, `peaks` must be sorted by mz.
fn centroid_pass(peaks: &[Peak], window_size: f64) -> Vec<Peak> {
    let mut order: Vec<usize> = (0..peaks.len()).collect();
    order.sort_by(|&a, &b| peaks[b].intensity.total_cmp(&peaks[a].intensity));

    let mut taken = vec![false; peaks.len()];
    let mut out = Vec::with_capacity(peaks.len());
    for &parent_idx in order.iter() {
        if taken[parent_idx] {
            continue;
        }
        let center = peaks[parent_idx].mz;
        let start = peaks.partition_point(|p| p.mz < center - window_size);
        let end = peaks.partition_point(|p| p.mz <= center + window_size);

        taken[parent_idx] = true;
        let mut agg = PeakAggregator::new(&peaks[parent_idx]);
        for (i, peak) in peaks.iter().enumerate().take(end).skip(start) {
            if !taken[i] {
                taken[i] = true;
                agg.add_peak(peak);
            }
        }
        out.push(agg.finalize());
    }

    out.sort_by(|a, b| a.mz.total_cmp(&b.mz));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noise_removal() {
        let spec = Spectrum::from_pairs("s", &[(50.0, 100.0), (60.0, 4.0), (70.0, 5.0)]);
        let out = clean_spectrum(&spec, 0.05, 0.5);
        assert_eq!(out.mzs(), vec![50.0, 70.0]);
    }

    #[test]
    fn test_all_removed_gives_empty() {
        let spec = Spectrum::from_pairs("zeros", &[(50.0, 0.0), (60.0, 0.0)]);
        let out = clean_spectrum(&spec, 0.0, 0.5);
        assert!(out.is_empty());
        assert_eq!(out.id, spec.id);
    }

    #[test]
    fn test_output_sorted_and_not_larger() {
        let spec = Spectrum::from_pairs(
            "s",
            &[(300.0, 1.0), (100.0, 5.0), (100.2, 1.0), (200.0, 3.0), (99.9, 2.0)],
        );
        let out = clean_spectrum(&spec, 0.0, 0.5);
        assert!(out.len() <= spec.len());
        assert_eq!(out.len(), 3);
        assert!(out.peaks.windows(2).all(|w| w[0].mz < w[1].mz));
        // 99.9, 100.0 and 100.2 collapse into one peak holding all the intensity.
        assert_eq!(out.peaks[0].intensity, 8.0);
        let expect_mz = (99.9 * 2.0 + 100.0 * 5.0 + 100.2 * 1.0) / 8.0;
        assert!((out.peaks[0].mz - expect_mz).abs() < 1e-9);
    }

    #[test]
    fn test_chained_peaks_fully_merged() {
        // First pass merges 100.0 + 100.5 into 100.25, which lands within
        // the window of the 100.7 peak, so a second pass is needed.
        let spec = Spectrum::from_pairs("chain", &[(100.0, 10.0), (100.5, 10.0), (100.7, 9.0)]);
        let out = clean_spectrum(&spec, 0.0, 0.5);
        assert_eq!(out.len(), 1);
        assert!((out.peaks[0].intensity - 29.0).abs() < 1e-9);
    }

    #[test]
    fn test_input_not_mutated() {
        let spec = Spectrum::from_pairs("s", &[(100.1, 1.0), (100.0, 3.0)]);
        let copy = spec.clone();
        let _ = clean_spectrum(&spec, 0.5, 0.5);
        assert_eq!(spec, copy);
    }

    #[test]
    fn test_clean_aligned_keeps_alignment() {
        let pair = AlignedPair::new(
            vec![50.0, 51.0, 52.0],
            vec![100.0, 1.0, 50.0],
            vec![0.0, 10.0, 10.0],
        );
        let out = clean_aligned(&pair, 0.1);
        assert_eq!(out.bins(), pair.bins());
        assert_eq!(out.query(), &[100.0, 0.0, 50.0]);
        assert_eq!(out.reference(), &[0.0, 10.0, 10.0]);
    }
}
