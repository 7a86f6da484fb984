pub mod clean;
pub mod low_entropy;
pub mod matching;
pub mod normalize;
pub mod pipeline;
pub mod weighting;

pub use normalize::NormalizationMethod;
pub use pipeline::{
    Pipeline,
    PipelineState,
    PreprocessingOrder,
    PreprocessingParams,
    Stage,
};
pub use weighting::WeightFactors;
