use super::ui;
use crate::ScreenRequest;
use crate::core::config::AppConfig;
use crate::core::model::FundRecord;
use crate::core::rank::ScreenOutcome;
use crate::core::scoring::ScoredFund;
use anyhow::Result;
use chrono::{DateTime, Local};
use comfy_table::Cell;
use std::path::Path;

/// Runs the screening pipeline and renders the ranked top-N table.
pub fn run(
    config: &AppConfig,
    funds: &[FundRecord],
    dataset_path: &Path,
    request: &ScreenRequest,
) -> Result<()> {
    let profile_name = request
        .profile
        .as_deref()
        .unwrap_or(&config.screener.default_profile);
    let profile = config.resolve_weight_profile(profile_name)?;
    let criteria = super::build_criteria(config, &request.overrides);
    let top_n = request.top.unwrap_or(config.screener.top_n);

    let outcome = super::run_pipeline(funds, &criteria, &profile);

    println!(
        "Top funds — {} profile\n",
        ui::style_text(profile.name(), ui::StyleType::Title)
    );

    if outcome.is_empty() {
        println!("No funds match the active filters.");
        return Ok(());
    }

    println!("{}", build_table(outcome.top(top_n)));
    print_footer(&outcome, funds.len(), dataset_path);
    Ok(())
}

fn build_table(top: &[ScoredFund]) -> comfy_table::Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Fund"),
        ui::header_cell("Class"),
        ui::header_cell("Risk"),
        ui::header_cell("Rating"),
        ui::header_cell("TER (%)"),
        ui::header_cell("12M (%)"),
        ui::header_cell("36M (%)"),
        ui::header_cell("ESG"),
        ui::header_cell("Score"),
    ]);

    for (position, scored) in top.iter().enumerate() {
        let fund = &scored.fund;
        table.add_row(vec![
            Cell::new(format!("{}", position + 1)),
            Cell::new(format!("{} ({})", fund.name, fund.identifier)),
            Cell::new(fund.asset_class.to_string()),
            ui::format_optional_cell(fund.risk_level, |r| format!("{r}")),
            ui::format_optional_cell(fund.morningstar_rating, |r| "★".repeat(r as usize)),
            ui::format_optional_cell(fund.ter_fee, |f| format!("{f:.2}")),
            ui::format_optional_cell(fund.return_12m, |r| format!("{r:.2}")),
            ui::format_optional_cell(fund.return_36m, |r| format!("{r:.2}")),
            ui::flag_cell(fund.is_esg),
            ui::score_cell(scored.composite_score),
        ]);
    }
    table
}

fn print_footer(outcome: &ScreenOutcome, universe_size: usize, dataset_path: &Path) {
    let mean = outcome
        .mean_score()
        .map_or("N/A".to_string(), |m| format!("{m:.1}"));
    let max = outcome
        .max_score()
        .map_or("N/A".to_string(), |m| format!("{m:.1}"));
    println!(
        "\n{} of {} funds matched — mean score {}, best {}",
        ui::style_text(&outcome.len().to_string(), ui::StyleType::TotalValue),
        universe_size,
        mean,
        ui::style_text(&max, ui::StyleType::TotalLabel),
    );

    let modified = std::fs::metadata(dataset_path)
        .and_then(|m| m.modified())
        .map(|t| DateTime::<Local>::from(t).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    println!(
        "{}",
        ui::style_text(
            &format!("Dataset: {} (modified {modified})", dataset_path.display()),
            ui::StyleType::Subtle
        )
    );
}
