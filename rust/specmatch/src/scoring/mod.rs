pub mod engine;
pub mod matrix;
pub mod timings;
pub mod top_n;

pub use engine::{
    LibraryMatcher,
    search,
};
pub use matrix::ScoreMatrix;
pub use timings::MatchTimings;
pub use top_n::{
    RankedMatch,
    TopMatches,
};
