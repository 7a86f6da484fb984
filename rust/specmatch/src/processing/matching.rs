use crate::models::{
    AlignedPair,
    Spectrum,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Query,
    Reference,
}

/// Aligns two spectra onto a shared, ascending set of mz bins.
///
/// Peaks from both spectra are pooled and swept in mz order. A bin is
/// anchored at its lowest mz and absorbs every following peak with
/// `mz - anchor <= window_size`. Within a bin the intensities of each side
/// are summed, a side without peaks in the bin gets 0.
///
/// The bins only depend on the pooled mz values, so swapping the arguments
/// gives the same bins with the two intensity vectors swapped.
///
/// ```
/// use specmatch::Spectrum;
/// use specmatch::processing::matching::match_peaks;
///
/// let a = Spectrum::from_pairs("a", &[(50.0, 10.0), (51.0, 90.0)]);
/// let b = Spectrum::from_pairs("b", &[(50.1, 20.0), (77.0, 5.0)]);
/// let pair = match_peaks(&a, &b, 0.5);
/// assert_eq!(pair.bins(), &[50.0, 51.0, 77.0]);
/// assert_eq!(pair.query(), &[10.0, 90.0, 0.0]);
/// assert_eq!(pair.reference(), &[20.0, 0.0, 5.0]);
/// ```
pub fn match_peaks(query: &Spectrum, reference: &Spectrum, window_size: f64) -> AlignedPair {
    let mut pooled: Vec<(f64, f64, Side)> = query
        .peaks
        .iter()
        .map(|p| (p.mz, p.intensity, Side::Query))
        .chain(
            reference
                .peaks
                .iter()
                .map(|p| (p.mz, p.intensity, Side::Reference)),
        )
        .filter(|(mz, _, _)| mz.is_finite())
        .collect();
    pooled.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut bins = Vec::new();
    let mut query_ints = Vec::new();
    let mut reference_ints = Vec::new();

    let mut anchor = f64::NEG_INFINITY;
    for (mz, intensity, side) in pooled {
        if bins.is_empty() || (mz - anchor) > window_size {
            anchor = mz;
            bins.push(mz);
            query_ints.push(0.0);
            reference_ints.push(0.0);
        }
        // Just pushed or still inside the current bin.
        let last = bins.len() - 1;
        match side {
            Side::Query => query_ints[last] += intensity,
            Side::Reference => reference_ints[last] += intensity,
        }
    }

    AlignedPair::new(bins, query_ints, reference_ints)
}
