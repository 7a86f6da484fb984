/// `base^exp` with non-positive bases mapped to 0.
///
/// Intensities are non-negative by convention and a 0 means "no peak",
/// so `0^negative`, `0^0` and negative bases with fractional exponents all
/// collapse to 0 instead of producing `inf`, `1` or `NaN`.
///
/// ```
/// use specmatch::utils::math::guarded_pow;
///
/// assert_eq!(guarded_pow(4.0, 0.5), 2.0);
/// assert_eq!(guarded_pow(0.0, -1.0), 0.0);
/// assert_eq!(guarded_pow(0.0, 0.0), 0.0);
/// assert_eq!(guarded_pow(-8.0, 1.0 / 3.0), 0.0);
/// ```
#[inline]
pub fn guarded_pow(base: f64, exp: f64) -> f64 {
    if base <= 0.0 || base.is_nan() {
        return 0.0;
    }
    finite_or_zero(base.powf(exp))
}

#[inline]
pub fn finite_or_zero(x: f64) -> f64 {
    if x.is_finite() { x } else { 0.0 }
}

/// `x * ln(x)` with the `0 * ln(0) := 0` convention.
#[inline]
pub fn xlogx(x: f64) -> f64 {
    if x > 0.0 { x * x.ln() } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xlogx_zero() {
        assert_eq!(xlogx(0.0), 0.0);
        assert!((xlogx(1.0)).abs() < 1e-12);
        assert!((xlogx(0.5) - 0.5 * 0.5f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_guarded_pow_overflow() {
        assert_eq!(guarded_pow(1e300, 10.0), 0.0);
        assert_eq!(guarded_pow(f64::NAN, 2.0), 0.0);
    }
}
