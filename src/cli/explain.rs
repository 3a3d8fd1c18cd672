use super::ui;
use crate::FilterOverrides;
use crate::core::config::AppConfig;
use crate::core::model::FundRecord;
use crate::core::scoring::ScoredFund;
use anyhow::Result;
use comfy_table::{Attribute, Cell};

/// Shows the per-metric score breakdown for one fund.
///
/// The fund is scored within the currently filtered universe, since min-max
/// normalization depends on which funds survive the filters. A fund that the
/// filters exclude cannot be explained under those filters.
pub fn run(
    config: &AppConfig,
    funds: &[FundRecord],
    identifier: &str,
    profile_name: Option<&str>,
    overrides: &FilterOverrides,
    json: bool,
) -> Result<()> {
    let profile_name = profile_name.unwrap_or(&config.screener.default_profile);
    let profile = config.resolve_weight_profile(profile_name)?;
    let criteria = super::build_criteria(config, overrides);

    let outcome = super::run_pipeline(funds, &criteria, &profile);
    let Some((position, scored)) = outcome
        .ranked()
        .iter()
        .enumerate()
        .find(|(_, s)| s.fund.identifier == identifier)
    else {
        anyhow::bail!(
            "Fund '{}' is not in the filtered universe ({} funds match)",
            identifier,
            outcome.len()
        );
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&scored)?);
        return Ok(());
    }

    println!(
        "{} — rank #{} of {}, score {:.1} ({} profile)\n",
        ui::style_text(&scored.fund.name, ui::StyleType::Title),
        position + 1,
        outcome.len(),
        scored.composite_score,
        profile.name()
    );
    println!("{}", build_table(scored));
    Ok(())
}

fn build_table(scored: &ScoredFund) -> comfy_table::Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Metric"),
        ui::header_cell("Raw Value"),
        ui::header_cell("Normalized"),
        ui::header_cell("Weight"),
        ui::header_cell("Contribution"),
    ]);

    for c in &scored.contributions {
        table.add_row(vec![
            Cell::new(c.metric.to_string()),
            ui::format_optional_cell(c.metric.value(&scored.fund), |v| format!("{v:.2}")),
            Cell::new(format!("{:.3}", c.normalized)),
            Cell::new(format!("{:.2}", c.weight)),
            Cell::new(format!("{:.3}", c.contribution)),
        ]);
    }

    let total: f64 = scored.contributions.iter().map(|c| c.contribution).sum();
    table.add_row(vec![
        Cell::new("Total").add_attribute(Attribute::Bold),
        Cell::new(""),
        Cell::new(""),
        Cell::new(""),
        Cell::new(format!("{total:.3}")).add_attribute(Attribute::Bold),
    ]);
    table
}
