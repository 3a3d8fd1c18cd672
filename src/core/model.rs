//! Core fund and client types shared across the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// Broad asset class of a fund.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetClass {
    FixedIncome,
    Equity,
    Mixed,
    MoneyMarket,
    Other,
}

impl From<&str> for AssetClass {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "fixed income" | "fixed-income" | "bond" | "bonds" | "renta fija" => {
                AssetClass::FixedIncome
            }
            "equity" | "stocks" | "renta variable" => AssetClass::Equity,
            "mixed" | "balanced" | "allocation" | "mixtos" => AssetClass::Mixed,
            "money market" | "money-market" | "monetary" | "monetario" => AssetClass::MoneyMarket,
            _ => AssetClass::Other,
        }
    }
}

impl Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AssetClass::FixedIncome => "Fixed Income",
            AssetClass::Equity => "Equity",
            AssetClass::Mixed => "Mixed",
            AssetClass::MoneyMarket => "Money Market",
            AssetClass::Other => "Other",
        };
        write!(f, "{name}")
    }
}

/// Coarse risk label derived from the 1-7 SRRI level, computed once at load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskBucket {
    Low,
    Medium,
    High,
    Unknown,
}

impl RiskBucket {
    pub fn from_level(level: Option<u8>) -> Self {
        match level {
            Some(1..=2) => RiskBucket::Low,
            Some(3..=5) => RiskBucket::Medium,
            Some(6..=7) => RiskBucket::High,
            _ => RiskBucket::Unknown,
        }
    }
}

impl Display for RiskBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RiskBucket::Low => "Low",
            RiskBucket::Medium => "Medium",
            RiskBucket::High => "High",
            RiskBucket::Unknown => "Unknown",
        };
        write!(f, "{name}")
    }
}

/// One row of the fund universe.
///
/// Numeric metrics are percent-as-number (a `ter_fee` of `1.2` means 1.2%).
/// `None` always means the source had no usable value; it is never coerced to
/// zero by the loader. How unknowns behave downstream is decided per stage:
/// filters fail closed on them, scoring gives them a zero contribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundRecord {
    pub identifier: String,
    pub name: String,
    pub asset_class: AssetClass,
    pub geography: String,
    pub currency: String,
    pub risk_level: Option<u8>,
    pub morningstar_rating: Option<u8>,
    pub ter_fee: Option<f64>,
    pub return_12m: Option<f64>,
    pub return_36m: Option<f64>,
    pub return_60m: Option<f64>,
    pub sharpe_ratio: Option<f64>,
    pub is_esg: bool,
    pub minimum_investment: Option<f64>,
    pub fund_manager: Option<String>,
    pub risk_bucket: RiskBucket,
}

/// Client investment horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeHorizon {
    Short,
    Medium,
    Long,
}

impl FromStr for TimeHorizon {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "short" => Ok(TimeHorizon::Short),
            "medium" => Ok(TimeHorizon::Medium),
            "long" => Ok(TimeHorizon::Long),
            _ => Err(anyhow::anyhow!("Invalid time horizon: {}", s)),
        }
    }
}

/// Client attitude to risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Conservative,
    Moderate,
    Aggressive,
}

impl FromStr for RiskTolerance {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "conservative" => Ok(RiskTolerance::Conservative),
            "moderate" => Ok(RiskTolerance::Moderate),
            "aggressive" => Ok(RiskTolerance::Aggressive),
            _ => Err(anyhow::anyhow!("Invalid risk tolerance: {}", s)),
        }
    }
}

/// Transient description of the client, built fresh per interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientProfile {
    pub available_investment: Option<f64>,
    pub time_horizon: TimeHorizon,
    pub risk_tolerance: RiskTolerance,
    #[serde(default)]
    pub sustainability_preference: bool,
    #[serde(default)]
    pub preferred_currency: Option<String>,
}

impl Default for ClientProfile {
    fn default() -> Self {
        Self {
            available_investment: None,
            time_horizon: TimeHorizon::Medium,
            risk_tolerance: RiskTolerance::Moderate,
            sustainability_preference: false,
            preferred_currency: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_class_from_source_labels() {
        assert_eq!(AssetClass::from("Renta fija"), AssetClass::FixedIncome);
        assert_eq!(AssetClass::from("  Equity "), AssetClass::Equity);
        assert_eq!(AssetClass::from("Monetario"), AssetClass::MoneyMarket);
        assert_eq!(AssetClass::from("Commodities"), AssetClass::Other);
    }

    #[test]
    fn test_risk_bucket_boundaries() {
        assert_eq!(RiskBucket::from_level(Some(1)), RiskBucket::Low);
        assert_eq!(RiskBucket::from_level(Some(2)), RiskBucket::Low);
        assert_eq!(RiskBucket::from_level(Some(3)), RiskBucket::Medium);
        assert_eq!(RiskBucket::from_level(Some(5)), RiskBucket::Medium);
        assert_eq!(RiskBucket::from_level(Some(6)), RiskBucket::High);
        assert_eq!(RiskBucket::from_level(Some(7)), RiskBucket::High);
        assert_eq!(RiskBucket::from_level(None), RiskBucket::Unknown);
    }

    #[test]
    fn test_horizon_and_tolerance_parsing() {
        assert_eq!("LONG".parse::<TimeHorizon>().unwrap(), TimeHorizon::Long);
        assert_eq!(
            "conservative".parse::<RiskTolerance>().unwrap(),
            RiskTolerance::Conservative
        );
        assert!("weekly".parse::<TimeHorizon>().is_err());
    }
}
