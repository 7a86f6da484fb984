use serde::Serialize;

use super::top_n::{
    TopMatches,
    rank_top_n,
};
use crate::models::SpectrumId;

/// Dense query x reference similarity table.
///
/// Rows follow the query input order and columns follow the reference
/// input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreMatrix {
    query_ids: Vec<SpectrumId>,
    reference_ids: Vec<SpectrumId>,
    rows: Vec<Vec<f64>>,
}

impl ScoreMatrix {
    /// # Panics
    /// If there is not one row per query, or a row does not have one score
    /// per reference.
    pub fn new(query_ids: Vec<SpectrumId>, reference_ids: Vec<SpectrumId>, rows: Vec<Vec<f64>>) -> Self {
        assert_eq!(query_ids.len(), rows.len(), "One row per query expected");
        for row in rows.iter() {
            assert_eq!(row.len(), reference_ids.len(), "One score per reference expected");
        }
        Self {
            query_ids,
            reference_ids,
            rows,
        }
    }

    pub fn query_ids(&self) -> &[SpectrumId] {
        &self.query_ids
    }

    pub fn reference_ids(&self) -> &[SpectrumId] {
        &self.reference_ids
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn n_queries(&self) -> usize {
        self.query_ids.len()
    }

    pub fn n_references(&self) -> usize {
        self.reference_ids.len()
    }

    pub fn get(&self, query_idx: usize, reference_idx: usize) -> Option<f64> {
        self.rows.get(query_idx)?.get(reference_idx).copied()
    }

    /// Iterates `(query_id, row)` in query order.
    pub fn iter_rows(&self) -> impl Iterator<Item = (&SpectrumId, &[f64])> {
        self.query_ids
            .iter()
            .zip(self.rows.iter().map(|r| r.as_slice()))
    }

    /// Top `n` references for every query, see [`rank_top_n`].
    pub fn top_n(&self, n: usize) -> Vec<TopMatches> {
        self.iter_rows()
            .map(|(id, row)| rank_top_n(id.clone(), &self.reference_ids, row, n))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> ScoreMatrix {
        ScoreMatrix::new(
            vec!["q1".into(), "q2".into()],
            vec!["r1".into(), "r2".into(), "r3".into()],
            vec![vec![0.9, 0.9, 0.5], vec![0.1, 0.2, 0.3]],
        )
    }

    #[test]
    fn test_get() {
        let m = matrix();
        assert_eq!(m.get(0, 2), Some(0.5));
        assert_eq!(m.get(1, 0), Some(0.1));
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.get(0, 3), None);
        assert_eq!(m.n_queries(), 2);
        assert_eq!(m.n_references(), 3);
    }

    #[test]
    fn test_top_n_per_row() {
        let top = matrix().top_n(1);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].query_id.as_str(), "q1");
        assert_eq!(top[0].joined_ids(";"), "r1;r2");
        assert_eq!(top[1].joined_ids(";"), "r3");
        assert_eq!(top[1].representative_score(), 0.3);
    }

    #[test]
    #[should_panic]
    fn test_ragged_rows_rejected() {
        ScoreMatrix::new(vec!["q".into()], vec!["r1".into(), "r2".into()], vec![vec![1.0]]);
    }
}
