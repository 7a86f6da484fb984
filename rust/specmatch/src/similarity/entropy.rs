//! Entropy-divergence similarities.
//!
//! All three measures share one construction. For probability vectors `a`
//! and `b` with midpoint `m = (a + b) / 2`:
//!
//! ```text
//! D     = 2 H(m) - H(a) - H(b)
//! score = clamp(1 - D / N, 0, 1)
//! ```
//!
//! where `N` is the value `D` takes when `a` and `b` have the same
//! individual entropies but share no peaks. Identical spectra score 1 and
//! spectra without shared peaks score 0. Only `H` (and therefore `N`)
//! changes between Shannon and Tsallis.
//!
//! | family  | `H(p)`                    | `N`                              |
//! |---------|---------------------------|----------------------------------|
//! | Shannon | `-Σ p ln p`               | `ln 4`                           |
//! | Tsallis | `(1 - Σ p^q) / (q - 1)`   | `(A + B)(1 - 2^(1-q)) / (q - 1)` |
//!
//! with `A = Σ a^q` and `B = Σ b^q`.
//!
//! Rényi entropy is not concave for `q > 1`, so `2 H(m) - H(a) - H(b)` can
//! go negative and ranks nothing. The Rényi measure takes the same gap on
//! the power mean `M(p) = (Σ p^q)^(1/q) = exp((1-q)/q H(p))` instead, which
//! is convex for `q > 1` and concave for `q < 1`:
//!
//! ```text
//! D = s ((M(a) + M(b)) / 2 - M(m))
//! N = s (A^(1/q) + B^(1/q) - (A + B)^(1/q)) / 2
//! ```
//!
//! with `s = sign(q - 1)`. Then `0 <= D <= N` for every `q > 0`.

use crate::errors::ConfigError;
use crate::utils::math::xlogx;

/// An entropy definition that can be plugged into [`entropy_similarity`].
pub trait EntropyFamily {
    fn name(&self) -> &'static str;

    /// Entropy of a probability vector.
    fn entropy(&self, p: &[f64]) -> f64;

    /// Jensen gap between `a`, `b` and their midpoint `merged`.
    fn divergence(&self, a: &[f64], b: &[f64], merged: &[f64]) -> f64 {
        2.0 * self.entropy(merged) - self.entropy(a) - self.entropy(b)
    }

    /// Value of [`EntropyFamily::divergence`] if `a` and `b` had disjoint support.
    fn disjoint_divergence(&self, a: &[f64], b: &[f64]) -> f64;
}

/// `-Σ p ln p`, with `0 ln 0 := 0`.
///
/// ```
/// use specmatch::similarity::entropy::shannon_entropy;
///
/// assert_eq!(shannon_entropy(&[1.0, 0.0]), 0.0);
/// assert!((shannon_entropy(&[0.5, 0.5]) - 2f64.ln()).abs() < 1e-12);
/// ```
pub fn shannon_entropy(p: &[f64]) -> f64 {
    let h: f64 = -p.iter().map(|&x| xlogx(x)).sum::<f64>();
    // Avoid handing out -0.0 for single peak spectra.
    if h == 0.0 { 0.0 } else { h }
}

fn power_sum(p: &[f64], q: f64) -> f64 {
    p.iter().filter(|&&x| x > 0.0).map(|&x| x.powf(q)).sum()
}

fn validate_order(q: f64, measure: &'static str) -> Result<f64, ConfigError> {
    // q == 1 is Shannon in the limit but is undefined in both formulas.
    if !q.is_finite() || q <= 0.0 || q == 1.0 {
        return Err(ConfigError::InvalidEntropyDimension { q, measure });
    }
    Ok(q)
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Shannon;

impl EntropyFamily for Shannon {
    fn name(&self) -> &'static str {
        "shannon"
    }

    fn entropy(&self, p: &[f64]) -> f64 {
        shannon_entropy(p)
    }

    fn disjoint_divergence(&self, _a: &[f64], _b: &[f64]) -> f64 {
        4f64.ln()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Renyi {
    q: f64,
}

impl Renyi {
    pub fn new(q: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            q: validate_order(q, "renyi")?,
        })
    }

    pub fn q(&self) -> f64 {
        self.q
    }

    fn power_mean(&self, p: &[f64]) -> f64 {
        power_sum(p, self.q).powf(1.0 / self.q)
    }

    // Orients the gaps so they are non-negative on both sides of q = 1.
    fn oriented(&self, gap: f64) -> f64 {
        if self.q > 1.0 { gap } else { -gap }
    }
}

impl EntropyFamily for Renyi {
    fn name(&self) -> &'static str {
        "renyi"
    }

    fn entropy(&self, p: &[f64]) -> f64 {
        power_sum(p, self.q).ln() / (1.0 - self.q)
    }

    fn divergence(&self, a: &[f64], b: &[f64], merged: &[f64]) -> f64 {
        let gap = (self.power_mean(a) + self.power_mean(b)) / 2.0 - self.power_mean(merged);
        self.oriented(gap)
    }

    fn disjoint_divergence(&self, a: &[f64], b: &[f64]) -> f64 {
        let sum_a = power_sum(a, self.q);
        let sum_b = power_sum(b, self.q);
        let inv_q = 1.0 / self.q;
        let gap = (sum_a.powf(inv_q) + sum_b.powf(inv_q) - (sum_a + sum_b).powf(inv_q)) / 2.0;
        self.oriented(gap)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tsallis {
    q: f64,
}

impl Tsallis {
    pub fn new(q: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            q: validate_order(q, "tsallis")?,
        })
    }

    pub fn q(&self) -> f64 {
        self.q
    }
}

impl EntropyFamily for Tsallis {
    fn name(&self) -> &'static str {
        "tsallis"
    }

    fn entropy(&self, p: &[f64]) -> f64 {
        (1.0 - power_sum(p, self.q)) / (self.q - 1.0)
    }

    fn disjoint_divergence(&self, a: &[f64], b: &[f64]) -> f64 {
        let sum_a = power_sum(a, self.q);
        let sum_b = power_sum(b, self.q);
        (sum_a + sum_b) * (1.0 - 2f64.powf(1.0 - self.q)) / (self.q - 1.0)
    }
}

/// Similarity of two probability vectors under an entropy family.
///
/// The inputs are expected to be normalized already (sum to 1). Empty
/// inputs, mismatched lengths, or a side with no signal give 0.
///
/// ```
/// use specmatch::similarity::entropy::{entropy_similarity, Shannon, Tsallis};
///
/// let a = [0.2, 0.8, 0.0];
/// assert_eq!(entropy_similarity(&Shannon, &a, &a), 1.0);
///
/// let disjoint = [0.0, 0.0, 1.0];
/// let tsallis = Tsallis::new(2.0).unwrap();
/// assert!(entropy_similarity(&tsallis, &a, &disjoint) < 1e-12);
/// ```
pub fn entropy_similarity<E: EntropyFamily + ?Sized>(family: &E, a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let total_a: f64 = a.iter().sum();
    let total_b: f64 = b.iter().sum();
    if !(total_a > 0.0 && total_a.is_finite() && total_b > 0.0 && total_b.is_finite()) {
        return 0.0;
    }

    let merged: Vec<f64> = a.iter().zip(b.iter()).map(|(x, y)| (x + y) / 2.0).collect();
    let divergence = family.divergence(a, b, &merged);
    let bound = family.disjoint_divergence(a, b);
    if !divergence.is_finite() || !bound.is_finite() || bound <= 0.0 {
        return 0.0;
    }

    (1.0 - divergence / bound).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn families() -> Vec<Box<dyn EntropyFamily>> {
        vec![
            Box::new(Shannon),
            Box::new(Renyi::new(0.5).unwrap()),
            Box::new(Renyi::new(1.1).unwrap()),
            Box::new(Renyi::new(3.0).unwrap()),
            Box::new(Tsallis::new(0.5).unwrap()),
            Box::new(Tsallis::new(1.1).unwrap()),
            Box::new(Tsallis::new(3.0).unwrap()),
        ]
    }

    #[test]
    fn test_identical_is_one() {
        let a = [0.1, 0.6, 0.3];
        for family in families() {
            let score = entropy_similarity(family.as_ref(), &a, &a);
            assert!((score - 1.0).abs() < 1e-12, "{} -> {}", family.name(), score);
        }
    }

    #[test]
    fn test_disjoint_is_zero() {
        let a = [0.4, 0.6, 0.0, 0.0];
        let b = [0.0, 0.0, 0.5, 0.5];
        for family in families() {
            let score = entropy_similarity(family.as_ref(), &a, &b);
            assert!(score.abs() < 1e-9, "{} -> {}", family.name(), score);
        }
    }

    #[test]
    fn test_partial_overlap_in_between_and_symmetric() {
        let a = [0.5, 0.5, 0.0];
        let b = [0.0, 0.5, 0.5];
        for family in families() {
            let ab = entropy_similarity(family.as_ref(), &a, &b);
            let ba = entropy_similarity(family.as_ref(), &b, &a);
            assert!(ab > 0.0 && ab < 1.0, "{} -> {}", family.name(), ab);
            assert!((ab - ba).abs() < 1e-12);
        }
    }

    fn one_shared_peak(n_bins: usize, shared: f64) -> Vec<f64> {
        let mut v = vec![(1.0 - shared) / (n_bins - 1) as f64; n_bins];
        v[0] = shared;
        v
    }

    #[test]
    fn test_lopsided_overlap_ranks_by_shared_fraction() {
        let mut single = vec![0.0; 16];
        single[0] = 1.0;
        let half = one_shared_peak(16, 0.5);
        let most = one_shared_peak(16, 0.9);
        for q in [1.1, 1.5, 2.0, 3.0, 0.5] {
            let renyi = Renyi::new(q).unwrap();
            let tsallis = Tsallis::new(q).unwrap();
            for family in [&renyi as &dyn EntropyFamily, &tsallis, &Shannon] {
                let far = entropy_similarity(family, &single, &half);
                let near = entropy_similarity(family, &single, &most);
                assert!(far > 0.0 && far < 1.0, "{} q={} -> {}", family.name(), q, far);
                assert!(near < 1.0, "{} q={} -> {}", family.name(), q, near);
                assert!(near > far, "{} q={}: {} <= {}", family.name(), q, near, far);
            }
        }
    }

    #[test]
    fn test_small_shared_peak_beats_disjoint() {
        let mut single = vec![0.0; 64];
        single[0] = 1.0;
        let faint = one_shared_peak(64, 0.1);
        let mut disjoint = vec![1.0 / 63.0; 64];
        disjoint[0] = 0.0;
        for q in [1.5, 2.0, 3.0] {
            let renyi = Renyi::new(q).unwrap();
            let shared = entropy_similarity(&renyi, &single, &faint);
            let none = entropy_similarity(&renyi, &single, &disjoint);
            assert!(none.abs() < 1e-9, "q={} -> {}", q, none);
            assert!(shared > 0.0, "q={} -> {}", q, shared);
        }
    }

    #[test]
    fn test_renyi_divergence_within_bounds() {
        let a = [0.7, 0.2, 0.1, 0.0];
        let b = [0.05, 0.05, 0.3, 0.6];
        let m: Vec<f64> = a.iter().zip(b.iter()).map(|(x, y)| (x + y) / 2.0).collect();
        for q in [0.3, 0.9, 1.2, 2.0, 5.0] {
            let renyi = Renyi::new(q).unwrap();
            let d = renyi.divergence(&a, &b, &m);
            let n = renyi.disjoint_divergence(&a, &b);
            assert!(d >= 0.0 && n > 0.0 && d <= n, "q={}: d={} n={}", q, d, n);
        }
    }

    #[test]
    fn test_shannon_known_value() {
        // JS divergence of these two is ln(2)/2, bound is ln(4)
        let a = [0.5, 0.5, 0.0];
        let b = [0.0, 0.5, 0.5];
        let score = entropy_similarity(&Shannon, &a, &b);
        assert!((score - 0.5).abs() < 1e-12, "{}", score);
    }

    #[test]
    fn test_degenerate_inputs_are_zero() {
        let a = [0.5, 0.5];
        for family in families() {
            let f = family.as_ref();
            assert_eq!(entropy_similarity(f, &a, &[0.0, 0.0]), 0.0);
            assert_eq!(entropy_similarity(f, &[], &[]), 0.0);
            assert_eq!(entropy_similarity(f, &a, &[1.0]), 0.0);
        }
    }

    #[test]
    fn test_invalid_orders_rejected() {
        for q in [1.0, 0.0, -2.0, f64::NAN, f64::INFINITY] {
            assert!(Renyi::new(q).is_err(), "{}", q);
            assert!(Tsallis::new(q).is_err(), "{}", q);
        }
    }
}
