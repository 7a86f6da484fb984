//! Wall-clock time spent in each phase of a library search.

use serde::Serialize;
use std::time::Duration;

/// Accumulated timing measurements.
///
/// When scoring is split into chunks, the timings of each chunk are added
/// together.
#[derive(Debug, Default, Clone, Copy)]
pub struct MatchTimings {
    /// Preprocessing spectra up to the alignment step.
    pub prepare: Duration,

    /// Alignment, remaining stages and similarity for every pair.
    pub score: Duration,
}

impl Serialize for MatchTimings {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("MatchTimings", 2)?;
        state.serialize_field("prepare_ms", &self.prepare.as_millis())?;
        state.serialize_field("score_ms", &self.score.as_millis())?;
        state.end()
    }
}

impl std::ops::AddAssign for MatchTimings {
    fn add_assign(&mut self, rhs: Self) {
        self.prepare += rhs.prepare;
        self.score += rhs.score;
    }
}
