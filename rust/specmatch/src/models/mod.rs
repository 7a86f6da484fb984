mod spectrum;

pub use spectrum::{
    AlignedPair,
    Peak,
    Spectrum,
    SpectrumId,
};
