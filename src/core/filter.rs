//! Filters the fund universe against client criteria.
//!
//! Filtering is a pure function: a conjunction of independently optional
//! predicates applied in one stable pass, preserving the input order. An
//! inactive predicate is a no-op; an active one with no matches yields an
//! empty result, never an error.
//!
//! Null policy (filter stage): **unknown fails closed**. A fund with an
//! unknown value for a field does not match an active predicate on that field,
//! so an active rating floor excludes unrated funds and an active fee ceiling
//! excludes funds with no published TER. This is deliberately different from
//! the scoring stage, where unknowns score a zero contribution instead of
//! being excluded.

use crate::core::model::{AssetClass, ClientProfile, FundRecord, RiskTolerance, TimeHorizon};
use serde::{Deserialize, Serialize};

/// The active predicate set. Every field is optional; `None`/empty means the
/// predicate is inactive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    #[serde(default)]
    pub asset_classes: Vec<AssetClass>,
    #[serde(default)]
    pub geographies: Vec<String>,
    #[serde(default)]
    pub currencies: Vec<String>,
    /// Restrict to funds run by these managers; funds with an unknown
    /// manager are excluded while active.
    #[serde(default)]
    pub fund_managers: Vec<String>,
    pub risk_min: Option<u8>,
    pub risk_max: Option<u8>,
    /// Minimum Morningstar rating; unrated funds are excluded while active.
    pub rating_min: Option<u8>,
    /// Maximum TER, inclusive.
    pub fee_max: Option<f64>,
    #[serde(default)]
    pub esg_only: bool,
    /// The client's available amount; funds demanding more are excluded.
    pub max_minimum_investment: Option<f64>,
}

impl FilterCriteria {
    /// Derives filter criteria from a client profile.
    ///
    /// Horizon restricts asset classes and caps risk (short stays in
    /// money-market/fixed-income, medium allows equity up to risk 5, long is
    /// unrestricted); risk tolerance narrows the risk band further; an ESG
    /// preference and a preferred currency map onto their filters directly.
    pub fn from_profile(profile: &ClientProfile) -> Self {
        let mut criteria = Self {
            max_minimum_investment: profile.available_investment,
            esg_only: profile.sustainability_preference,
            ..Self::default()
        };

        match profile.time_horizon {
            TimeHorizon::Short => {
                criteria.asset_classes = vec![AssetClass::MoneyMarket, AssetClass::FixedIncome];
                criteria.risk_max = Some(3);
            }
            TimeHorizon::Medium => {
                criteria.asset_classes =
                    vec![AssetClass::FixedIncome, AssetClass::Mixed, AssetClass::Equity];
                criteria.risk_max = Some(5);
            }
            TimeHorizon::Long => {}
        }

        match profile.risk_tolerance {
            RiskTolerance::Conservative => {
                criteria.risk_max = Some(criteria.risk_max.map_or(3, |m| m.min(3)));
            }
            RiskTolerance::Moderate => {
                criteria.risk_min = Some(2);
                criteria.risk_max = Some(criteria.risk_max.map_or(5, |m| m.min(5)));
            }
            RiskTolerance::Aggressive => {
                criteria.risk_min = Some(4);
            }
        }

        if let Some(currency) = &profile.preferred_currency {
            criteria.currencies = vec![currency.clone()];
        }

        criteria
    }

    /// True when no predicate is active.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn matches(&self, fund: &FundRecord) -> bool {
        if !self.asset_classes.is_empty() && !self.asset_classes.contains(&fund.asset_class) {
            return false;
        }
        if !self.geographies.is_empty()
            && !self
                .geographies
                .iter()
                .any(|g| g.eq_ignore_ascii_case(&fund.geography))
        {
            return false;
        }
        if !self.currencies.is_empty()
            && !self
                .currencies
                .iter()
                .any(|c| c.eq_ignore_ascii_case(&fund.currency))
        {
            return false;
        }
        if !self.fund_managers.is_empty() {
            // Unknown manager fails closed against an active manager filter.
            let Some(manager) = &fund.fund_manager else {
                return false;
            };
            if !self
                .fund_managers
                .iter()
                .any(|m| m.eq_ignore_ascii_case(manager))
            {
                return false;
            }
        }
        if self.risk_min.is_some() || self.risk_max.is_some() {
            // Unknown risk fails closed against an active risk band.
            let Some(risk) = fund.risk_level else {
                return false;
            };
            if self.risk_min.is_some_and(|min| risk < min)
                || self.risk_max.is_some_and(|max| risk > max)
            {
                return false;
            }
        }
        if let Some(floor) = self.rating_min
            && floor > 0
            && !fund.morningstar_rating.is_some_and(|r| r >= floor)
        {
            return false;
        }
        if let Some(ceiling) = self.fee_max
            && !fund.ter_fee.is_some_and(|fee| fee <= ceiling)
        {
            return false;
        }
        if self.esg_only && !fund.is_esg {
            return false;
        }
        if let Some(available) = self.max_minimum_investment
            && !fund
                .minimum_investment
                .is_some_and(|min| min <= available)
        {
            return false;
        }
        true
    }
}

/// Applies the criteria as a stable, order-preserving conjunction.
pub fn apply(funds: &[FundRecord], criteria: &FilterCriteria) -> Vec<FundRecord> {
    funds
        .iter()
        .filter(|f| criteria.matches(f))
        .cloned()
        .collect()
}
