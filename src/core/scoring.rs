//! Composite scoring of the filtered fund set.
//!
//! Each active metric is min-max normalized to [0,1] across the funds that
//! actually carry a value for it, then combined as a weighted sum and scaled
//! to 0-100. Cost-like metrics (risk level, TER) are inverted so that a lower
//! raw value scores higher.
//!
//! Null policy (scoring stage): a fund missing a metric value gets a zero
//! normalized term for that metric. The fund stays in the sum and the weight
//! stays in the denominator, so **unknown is penalized, not ignored**. This
//! is the opposite of the filter stage's fail-closed exclusion and the two
//! are kept as separate code paths on purpose.
//!
//! A metric whose range is degenerate over the filtered set (fewer than two
//! known values, or all values equal) cannot be normalized; it contributes
//! zero to every fund and keeps its weight in the denominator, depressing all
//! scores equally without disturbing the ordering.

use crate::core::error::ScoringError;
use crate::core::model::FundRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

/// The closed set of scoring metrics.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Return12m,
    Return36m,
    Return60m,
    SharpeRatio,
    LowRisk,
    LowFees,
    Rating,
    Sustainability,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::Return12m,
        Metric::Return36m,
        Metric::Return60m,
        Metric::SharpeRatio,
        Metric::LowRisk,
        Metric::LowFees,
        Metric::Rating,
        Metric::Sustainability,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Return12m => "return_12m",
            Metric::Return36m => "return_36m",
            Metric::Return60m => "return_60m",
            Metric::SharpeRatio => "sharpe_ratio",
            Metric::LowRisk => "low_risk",
            Metric::LowFees => "low_fees",
            Metric::Rating => "rating",
            Metric::Sustainability => "sustainability",
        }
    }

    /// True for metrics where a lower raw value is better.
    pub fn inverted(&self) -> bool {
        matches!(self, Metric::LowRisk | Metric::LowFees)
    }

    /// The fund's raw value for this metric, if known.
    pub fn value(&self, fund: &FundRecord) -> Option<f64> {
        match self {
            Metric::Return12m => fund.return_12m,
            Metric::Return36m => fund.return_36m,
            Metric::Return60m => fund.return_60m,
            Metric::SharpeRatio => fund.sharpe_ratio,
            Metric::LowRisk => fund.risk_level.map(f64::from),
            Metric::LowFees => fund.ter_fee,
            Metric::Rating => fund.morningstar_rating.map(f64::from),
            Metric::Sustainability => Some(if fund.is_esg { 1.0 } else { 0.0 }),
        }
    }
}

impl Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Metric {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| ScoringError::UnknownMetric(s.to_string()))
    }
}

/// Named preset weight profiles shipped with the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    Conservative,
    Moderate,
    Aggressive,
    Esg,
    LongTerm,
}

impl Preset {
    pub const ALL: [Preset; 5] = [
        Preset::Conservative,
        Preset::Moderate,
        Preset::Aggressive,
        Preset::Esg,
        Preset::LongTerm,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Conservative => "conservative",
            Preset::Moderate => "moderate",
            Preset::Aggressive => "aggressive",
            Preset::Esg => "esg",
            Preset::LongTerm => "long-term",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Preset::Conservative => "Low risk, stable returns, low fees",
            Preset::Moderate => "Balance between risk and return",
            Preset::Aggressive => "Maximize returns, accepts higher risk",
            Preset::Esg => "Prioritizes sustainability criteria",
            Preset::LongTerm => "Focus on long horizon returns",
        }
    }

    fn weights(&self) -> [(Metric, f64); 8] {
        use Metric::*;
        match self {
            Preset::Conservative => [
                (Return12m, 0.10),
                (Return36m, 0.15),
                (Return60m, 0.10),
                (SharpeRatio, 0.15),
                (LowRisk, 0.25),
                (LowFees, 0.15),
                (Rating, 0.05),
                (Sustainability, 0.05),
            ],
            Preset::Moderate => [
                (Return12m, 0.15),
                (Return36m, 0.15),
                (Return60m, 0.10),
                (SharpeRatio, 0.20),
                (LowRisk, 0.10),
                (LowFees, 0.15),
                (Rating, 0.10),
                (Sustainability, 0.05),
            ],
            Preset::Aggressive => [
                (Return12m, 0.25),
                (Return36m, 0.20),
                (Return60m, 0.15),
                (SharpeRatio, 0.15),
                (LowRisk, 0.00),
                (LowFees, 0.10),
                (Rating, 0.10),
                (Sustainability, 0.05),
            ],
            Preset::Esg => [
                (Return12m, 0.10),
                (Return36m, 0.10),
                (Return60m, 0.10),
                (SharpeRatio, 0.15),
                (LowRisk, 0.10),
                (LowFees, 0.10),
                (Rating, 0.10),
                (Sustainability, 0.25),
            ],
            Preset::LongTerm => [
                (Return12m, 0.05),
                (Return36m, 0.20),
                (Return60m, 0.30),
                (SharpeRatio, 0.15),
                (LowRisk, 0.05),
                (LowFees, 0.15),
                (Rating, 0.05),
                (Sustainability, 0.05),
            ],
        }
    }
}

impl Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Preset {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_lowercase().replace('_', "-");
        Preset::ALL
            .into_iter()
            .find(|p| p.name() == normalized)
            .ok_or_else(|| anyhow::anyhow!("Unknown preset profile: {}", s))
    }
}

/// A validated metric-to-weight mapping.
///
/// Construction is the only place weights are checked, so every profile that
/// exists is scoreable: weights are non-negative and at least one is positive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightProfile {
    name: String,
    weights: BTreeMap<Metric, f64>,
}

impl WeightProfile {
    pub fn preset(preset: Preset) -> Self {
        Self {
            name: preset.name().to_string(),
            weights: preset.weights().into_iter().collect(),
        }
    }

    /// Builds a user-supplied profile, validating metric names and weights.
    pub fn custom(
        name: &str,
        weights: &BTreeMap<String, f64>,
    ) -> Result<Self, ScoringError> {
        let mut validated = BTreeMap::new();
        for (metric_name, &weight) in weights {
            let metric: Metric = metric_name.parse()?;
            if weight < 0.0 {
                return Err(ScoringError::NegativeWeight {
                    metric: metric_name.clone(),
                    weight,
                });
            }
            validated.insert(metric, weight);
        }
        if !validated.values().any(|&w| w > 0.0) {
            return Err(ScoringError::NoActiveMetrics);
        }
        Ok(Self {
            name: name.to_string(),
            weights: validated,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Metrics with a positive weight, in deterministic order.
    pub fn active_weights(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        self.weights
            .iter()
            .filter(|&(_, &w)| w > 0.0)
            .map(|(&m, &w)| (m, w))
    }
}

/// One metric's share of a fund's composite score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricContribution {
    pub metric: Metric,
    pub weight: f64,
    /// Min-max normalized value in [0,1]; 0 for unknown or degenerate.
    pub normalized: f64,
    /// `weight * normalized`, before division by the weight sum.
    pub contribution: f64,
}

/// A fund together with its derived composite score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredFund {
    pub fund: FundRecord,
    /// Weighted composite in [0,100].
    pub composite_score: f64,
    pub contributions: Vec<MetricContribution>,
}

/// Normalization span for one metric over the filtered set. `None` when the
/// range is degenerate.
fn metric_span(funds: &[FundRecord], metric: Metric) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut known = 0usize;
    for fund in funds {
        if let Some(value) = metric.value(fund) {
            min = min.min(value);
            max = max.max(value);
            known += 1;
        }
    }
    (known >= 2 && max > min).then_some((min, max))
}

/// Scores every fund in the (already filtered) set against a weight profile.
///
/// Pure and deterministic: the same funds and profile always produce the same
/// scores. An empty input yields an empty output.
pub fn score(funds: &[FundRecord], profile: &WeightProfile) -> Vec<ScoredFund> {
    let spans: Vec<(Metric, f64, Option<(f64, f64)>)> = profile
        .active_weights()
        .map(|(metric, weight)| (metric, weight, metric_span(funds, metric)))
        .collect();
    let total_weight: f64 = spans.iter().map(|(_, w, _)| w).sum();

    funds
        .iter()
        .map(|fund| {
            let contributions: Vec<MetricContribution> = spans
                .iter()
                .map(|&(metric, weight, span)| {
                    let normalized = match (span, metric.value(fund)) {
                        (Some((min, max)), Some(value)) => {
                            if metric.inverted() {
                                (max - value) / (max - min)
                            } else {
                                (value - min) / (max - min)
                            }
                        }
                        // Unknown value or degenerate range: zero term.
                        _ => 0.0,
                    };
                    MetricContribution {
                        metric,
                        weight,
                        normalized,
                        contribution: weight * normalized,
                    }
                })
                .collect();

            let weighted_sum: f64 = contributions.iter().map(|c| c.contribution).sum();
            ScoredFund {
                fund: fund.clone(),
                composite_score: 100.0 * weighted_sum / total_weight,
                contributions,
            }
        })
        .collect()
}
