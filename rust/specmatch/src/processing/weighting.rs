use crate::models::Spectrum;
use crate::utils::math::{
    finite_or_zero,
    guarded_pow,
};

/// Power-law weight factors applied to mz and intensity.
///
/// `wf_mz = 0, wf_intensity = 1` leaves the intensities untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightFactors {
    pub wf_mz: f64,
    pub wf_intensity: f64,
}

impl Default for WeightFactors {
    fn default() -> Self {
        Self {
            wf_mz: 0.0,
            wf_intensity: 1.0,
        }
    }
}

impl WeightFactors {
    pub fn is_identity(&self) -> bool {
        self.wf_mz == 0.0 && self.wf_intensity == 1.0
    }

    #[inline]
    fn weigh(&self, mz: f64, intensity: f64) -> f64 {
        // A zero mz factor is the common case, skip the pow.
        let mz_factor = if self.wf_mz == 0.0 && mz > 0.0 {
            1.0
        } else {
            guarded_pow(mz, self.wf_mz)
        };
        finite_or_zero(mz_factor * guarded_pow(intensity, self.wf_intensity))
    }
}

/// `new_intensity[i] = mz[i]^wf_mz * intensity[i]^wf_intensity`.
///
/// Non-positive bases contribute 0 (see [`guarded_pow`]), so a bin without
/// a peak stays at 0 regardless of the exponents.
///
/// ```
/// use specmatch::processing::weighting::{weight_intensities, WeightFactors};
///
/// let wf = WeightFactors { wf_mz: 1.0, wf_intensity: 0.5 };
/// let out = weight_intensities(&[10.0, 20.0], &[4.0, 0.0], wf);
/// assert_eq!(out, vec![20.0, 0.0]);
/// ```
pub fn weight_intensities(mz: &[f64], intensity: &[f64], factors: WeightFactors) -> Vec<f64> {
    assert_eq!(mz.len(), intensity.len(), "mz and intensity must be the same length");
    mz.iter()
        .zip(intensity.iter())
        .map(|(&m, &i)| factors.weigh(m, i))
        .collect()
}

pub fn weight_spectrum(spectrum: &Spectrum, factors: WeightFactors) -> Spectrum {
    let weighted = spectrum
        .peaks
        .iter()
        .map(|p| factors.weigh(p.mz, p.intensity))
        .collect();
    spectrum.with_intensities(weighted)
}
