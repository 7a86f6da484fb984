/// Calculates the cosine similarity between two vectors of the same size.
///
/// Returns 0 (never `NaN`) when either vector has zero magnitude, is empty,
/// or when the lengths differ. Rounding can push the ratio a hair past 1,
/// so the result is clamped to `[-1, 1]`.
///
/// # Example
///
/// ```
/// use specmatch::similarity::cosine::cosine_similarity;
///
/// let a = vec![1.0, 2.0, 3.0];
/// let b = vec![4.0, 5.0, 6.0];
/// let result = cosine_similarity(&a, &b);
/// assert!((result - 0.9746318).abs() < 1e-6);
/// assert_eq!(cosine_similarity(&a, &[0.0, 0.0, 0.0]), 0.0);
/// ```
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f64 = a.iter().zip(b.iter()).map(|(&x, &y)| x * y).sum();
    let magnitude_a: f64 = a.iter().map(|&x| x * x).sum::<f64>().sqrt();
    let magnitude_b: f64 = b.iter().map(|&x| x * x).sum::<f64>().sqrt();

    let denom = magnitude_a * magnitude_b;
    if denom == 0.0 || !denom.is_finite() || !dot_product.is_finite() {
        return 0.0;
    }

    (dot_product / denom).clamp(-1.0, 1.0)
}
