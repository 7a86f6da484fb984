use tracing::trace;

use super::normalize::{
    NormalizationMethod,
    normalize,
};
use crate::similarity::entropy::shannon_entropy;
use crate::utils::math::guarded_pow;

/// Sharpens intensity vectors whose Shannon entropy is below `let_threshold`.
///
/// The entropy `S` is computed on the normalized vector. When
/// `S < let_threshold` every intensity is raised to
/// `(1 + S) / (1 + let_threshold)`, otherwise the input is returned as is.
/// All-zero vectors are returned unchanged.
///
/// ```
/// use specmatch::processing::low_entropy::low_entropy_transform;
/// use specmatch::processing::normalize::NormalizationMethod;
///
/// // Entropy of a single peak is 0, so with a threshold of 1 the exponent is 1/2.
/// let out = low_entropy_transform(&[0.0, 16.0], 1.0, NormalizationMethod::Standard);
/// assert_eq!(out, vec![0.0, 4.0]);
/// ```
pub fn low_entropy_transform(
    intensities: &[f64],
    let_threshold: f64,
    method: NormalizationMethod,
) -> Vec<f64> {
    let probabilities = normalize(intensities, method);
    let total: f64 = probabilities.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return intensities.to_vec();
    }

    let entropy = shannon_entropy(&probabilities);
    if entropy >= let_threshold {
        return intensities.to_vec();
    }

    let exponent = (1.0 + entropy) / (1.0 + let_threshold);
    trace!(entropy, exponent, "Applying low entropy transform");
    intensities
        .iter()
        .map(|&x| guarded_pow(x, exponent))
        .collect()
}
