//! Command implementations and shared presentation helpers.

pub mod explain;
pub mod export;
pub mod profiles;
pub mod screen;
pub mod setup;
pub mod ui;

use crate::FilterOverrides;
use crate::core::config::AppConfig;
use crate::core::filter::{self, FilterCriteria};
use crate::core::model::{AssetClass, FundRecord};
use crate::core::rank::{self, ScreenOutcome};
use crate::core::scoring::{self, WeightProfile};

/// Builds the active criteria: the config's client profile provides the base,
/// command-line overrides win field by field.
pub(crate) fn build_criteria(config: &AppConfig, overrides: &FilterOverrides) -> FilterCriteria {
    let mut criteria = config
        .client
        .as_ref()
        .map(FilterCriteria::from_profile)
        .unwrap_or_default();

    if !overrides.asset_classes.is_empty() {
        criteria.asset_classes = overrides
            .asset_classes
            .iter()
            .map(|s| AssetClass::from(s.as_str()))
            .collect();
    }
    if !overrides.geographies.is_empty() {
        criteria.geographies = overrides.geographies.clone();
    }
    if !overrides.currencies.is_empty() {
        criteria.currencies = overrides.currencies.clone();
    }
    if !overrides.fund_managers.is_empty() {
        criteria.fund_managers = overrides.fund_managers.clone();
    }
    if overrides.risk_min.is_some() {
        criteria.risk_min = overrides.risk_min;
    }
    if overrides.risk_max.is_some() {
        criteria.risk_max = overrides.risk_max;
    }
    if overrides.rating_min.is_some() {
        criteria.rating_min = overrides.rating_min;
    }
    if overrides.fee_max.is_some() {
        criteria.fee_max = overrides.fee_max;
    }
    if overrides.esg {
        criteria.esg_only = true;
    }
    if overrides.investment.is_some() {
        criteria.max_minimum_investment = overrides.investment;
    }
    criteria
}

/// Runs filter, score and rank over the cached fund table.
pub(crate) fn run_pipeline(
    funds: &[FundRecord],
    criteria: &FilterCriteria,
    profile: &WeightProfile,
) -> ScreenOutcome {
    let filtered = filter::apply(funds, criteria);
    let scored = scoring::score(&filtered, profile);
    rank::rank(scored)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_client(yaml: &str) -> AppConfig {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_overrides_win_over_client_profile() {
        let config = config_with_client(
            r#"
screener:
  dataset: funds.csv
client:
  available_investment: 5000.0
  time_horizon: short
  risk_tolerance: conservative
"#,
        );
        let overrides = FilterOverrides {
            risk_max: Some(6),
            investment: Some(20000.0),
            ..Default::default()
        };

        let criteria = build_criteria(&config, &overrides);
        assert_eq!(criteria.risk_max, Some(6));
        assert_eq!(criteria.max_minimum_investment, Some(20000.0));
        // Horizon-derived asset classes survive untouched.
        assert!(!criteria.asset_classes.is_empty());
    }

    #[test]
    fn test_no_client_profile_means_no_base_filters() {
        let config = config_with_client("screener:\n  dataset: funds.csv\n");
        let criteria = build_criteria(&config, &FilterOverrides::default());
        assert!(criteria.is_empty());
    }
}
