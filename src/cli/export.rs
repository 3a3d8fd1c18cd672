use crate::ScreenRequest;
use crate::core::config::AppConfig;
use crate::core::model::FundRecord;
use crate::core::scoring::ScoredFund;
use anyhow::{Context, Result};
use std::io;
use std::path::Path;

/// Writes the ranked top-N result as CSV, to stdout or a file.
pub fn run(
    config: &AppConfig,
    funds: &[FundRecord],
    request: &ScreenRequest,
    output: Option<&Path>,
) -> Result<()> {
    let profile_name = request
        .profile
        .as_deref()
        .unwrap_or(&config.screener.default_profile);
    let profile = config.resolve_weight_profile(profile_name)?;
    let criteria = super::build_criteria(config, &request.overrides);
    let top_n = request.top.unwrap_or(config.screener.top_n);

    let outcome = super::run_pipeline(funds, &criteria, &profile);
    let top = outcome.top(top_n);

    match output {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_csv(csv::Writer::from_writer(file), top)?;
            tracing::info!("Exported {} funds to {}", top.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            write_csv(csv::Writer::from_writer(stdout.lock()), top)?;
        }
    }
    Ok(())
}

fn write_csv<W: io::Write>(mut writer: csv::Writer<W>, top: &[ScoredFund]) -> Result<()> {
    writer.write_record([
        "identifier",
        "name",
        "asset_class",
        "geography",
        "currency",
        "risk_level",
        "risk_bucket",
        "morningstar_rating",
        "ter_fee",
        "return_12m",
        "return_36m",
        "return_60m",
        "sharpe_ratio",
        "is_esg",
        "minimum_investment",
        "fund_manager",
        "composite_score",
    ])?;

    for scored in top {
        let fund = &scored.fund;
        writer.write_record([
            fund.identifier.clone(),
            fund.name.clone(),
            fund.asset_class.to_string(),
            fund.geography.clone(),
            fund.currency.clone(),
            optional(fund.risk_level.map(|r| r.to_string())),
            fund.risk_bucket.to_string(),
            optional(fund.morningstar_rating.map(|r| r.to_string())),
            optional(fund.ter_fee.map(|v| format!("{v:.2}"))),
            optional(fund.return_12m.map(|v| format!("{v:.2}"))),
            optional(fund.return_36m.map(|v| format!("{v:.2}"))),
            optional(fund.return_60m.map(|v| format!("{v:.2}"))),
            optional(fund.sharpe_ratio.map(|v| format!("{v:.2}"))),
            fund.is_esg.to_string(),
            optional(fund.minimum_investment.map(|v| format!("{v:.2}"))),
            optional(fund.fund_manager.clone()),
            format!("{:.2}", scored.composite_score),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn optional(value: Option<String>) -> String {
    value.unwrap_or_default()
}
