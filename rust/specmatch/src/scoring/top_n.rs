use serde::Serialize;

use crate::models::SpectrumId;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedMatch {
    pub reference_id: SpectrumId,
    pub score: f64,
}

/// Best references for one query, highest score first.
///
/// Holds at least `n` entries (when there are that many references), plus
/// every reference tied with the `n`-th score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopMatches {
    pub query_id: SpectrumId,
    pub matches: Vec<RankedMatch>,
}

impl TopMatches {
    /// Score of the best match, 0 when there are no references.
    pub fn representative_score(&self) -> f64 {
        self.matches.first().map(|m| m.score).unwrap_or(0.0)
    }

    pub fn reference_ids(&self) -> impl Iterator<Item = &SpectrumId> {
        self.matches.iter().map(|m| &m.reference_id)
    }

    /// Reference identifiers joined with `sep`, e.g. `"a;b"`.
    pub fn joined_ids(&self, sep: &str) -> String {
        self.reference_ids()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(sep)
    }
}

/// Ranks one row of scores, keeping every tie at the cutoff.
///
/// Ties are reported in reference order.
///
/// ```
/// use specmatch::scoring::top_n::rank_top_n;
/// use specmatch::SpectrumId;
///
/// let refs: Vec<SpectrumId> = ["a", "b", "c"].into_iter().map(SpectrumId::from).collect();
/// let top = rank_top_n("q".into(), &refs, &[0.9, 0.9, 0.5], 1);
/// assert_eq!(top.joined_ids(";"), "a;b");
/// assert_eq!(top.representative_score(), 0.9);
/// ```
pub fn rank_top_n(query_id: SpectrumId, references: &[SpectrumId], scores: &[f64], n: usize) -> TopMatches {
    debug_assert_eq!(references.len(), scores.len());
    let mut order: Vec<usize> = (0..scores.len().min(references.len())).collect();
    // sort_by is stable, so equal scores keep reference order.
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    let mut keep = n.min(order.len());
    if keep > 0 {
        let cutoff = scores[order[keep - 1]];
        while keep < order.len() && scores[order[keep]] == cutoff {
            keep += 1;
        }
    }

    let matches = order[..keep]
        .iter()
        .map(|&i| RankedMatch {
            reference_id: references[i].clone(),
            score: scores[i],
        })
        .collect();

    TopMatches { query_id, matches }
}
