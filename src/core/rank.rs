//! Ranks scored funds and exposes the screening outcome.

use crate::core::scoring::ScoredFund;

pub const DEFAULT_TOP_N: usize = 10;

/// The full scored universe, ranked. The top-N view is a slice of this; the
/// whole set stays available for aggregate statistics and charting.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenOutcome {
    scored: Vec<ScoredFund>,
}

impl ScreenOutcome {
    /// All scored funds, descending by composite score with identifier
    /// ascending as tie-break, giving a reproducible total order.
    pub fn ranked(&self) -> &[ScoredFund] {
        &self.scored
    }

    /// At most `n` best funds; fewer when the universe is smaller.
    pub fn top(&self, n: usize) -> &[ScoredFund] {
        &self.scored[..self.scored.len().min(n)]
    }

    pub fn len(&self) -> usize {
        self.scored.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scored.is_empty()
    }

    pub fn mean_score(&self) -> Option<f64> {
        if self.scored.is_empty() {
            return None;
        }
        let sum: f64 = self.scored.iter().map(|s| s.composite_score).sum();
        Some(sum / self.scored.len() as f64)
    }

    pub fn max_score(&self) -> Option<f64> {
        self.scored.first().map(|s| s.composite_score)
    }
}

/// Sorts scored funds into the canonical ranking order.
pub fn rank(mut scored: Vec<ScoredFund>) -> ScreenOutcome {
    scored.sort_by(|a, b| {
        b.composite_score
            .partial_cmp(&a.composite_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.fund.identifier.cmp(&b.fund.identifier))
    });
    ScreenOutcome { scored }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{AssetClass, FundRecord, RiskBucket};

    fn scored(identifier: &str, composite_score: f64) -> ScoredFund {
        ScoredFund {
            fund: FundRecord {
                identifier: identifier.to_string(),
                name: identifier.to_string(),
                asset_class: AssetClass::Equity,
                geography: "Europe".to_string(),
                currency: "EUR".to_string(),
                risk_level: Some(4),
                morningstar_rating: None,
                ter_fee: None,
                return_12m: None,
                return_36m: None,
                return_60m: None,
                sharpe_ratio: None,
                is_esg: false,
                minimum_investment: None,
                fund_manager: None,
                risk_bucket: RiskBucket::Medium,
            },
            composite_score,
            contributions: Vec::new(),
        }
    }

    #[test]
    fn test_rank_descends_with_identifier_tiebreak() {
        let outcome = rank(vec![
            scored("C", 50.0),
            scored("A", 50.0),
            scored("B", 80.0),
        ]);
        let ids: Vec<&str> = outcome
            .ranked()
            .iter()
            .map(|s| s.fund.identifier.as_str())
            .collect();
        assert_eq!(ids, vec!["B", "A", "C"]);

        for pair in outcome.ranked().windows(2) {
            assert!(pair[0].composite_score >= pair[1].composite_score);
            if pair[0].composite_score == pair[1].composite_score {
                assert!(pair[0].fund.identifier <= pair[1].fund.identifier);
            }
        }
    }

    #[test]
    fn test_top_with_fewer_funds_than_requested() {
        let outcome = rank(vec![
            scored("A", 10.0),
            scored("B", 20.0),
            scored("C", 30.0),
            scored("D", 40.0),
        ]);
        assert_eq!(outcome.top(DEFAULT_TOP_N).len(), 4);
        assert_eq!(outcome.top(2).len(), 2);
        assert_eq!(outcome.top(2)[0].fund.identifier, "D");
    }

    #[test]
    fn test_empty_outcome() {
        let outcome = rank(Vec::new());
        assert!(outcome.is_empty());
        assert!(outcome.top(10).is_empty());
        assert_eq!(outcome.mean_score(), None);
        assert_eq!(outcome.max_score(), None);
    }

    #[test]
    fn test_aggregates() {
        let outcome = rank(vec![scored("A", 40.0), scored("B", 60.0)]);
        assert_eq!(outcome.mean_score(), Some(50.0));
        assert_eq!(outcome.max_score(), Some(60.0));
    }
}
