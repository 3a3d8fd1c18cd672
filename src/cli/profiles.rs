use super::ui;
use crate::core::config::AppConfig;
use crate::core::scoring::{Metric, Preset, WeightProfile};
use anyhow::Result;
use comfy_table::Cell;

/// Lists the preset weight profiles and any user-defined ones.
pub fn run(config: &AppConfig) -> Result<()> {
    println!(
        "{}\n",
        ui::style_text("Weight profiles", ui::StyleType::Title)
    );

    let mut table = ui::new_styled_table();
    let mut header = vec![ui::header_cell("Profile")];
    header.extend(Metric::ALL.iter().map(|m| ui::header_cell(m.name())));
    table.set_header(header);

    for preset in Preset::ALL {
        add_row(&mut table, &WeightProfile::preset(preset));
    }
    for name in config.weight_profiles.keys() {
        if let Ok(profile) = config.resolve_weight_profile(name) {
            add_row(&mut table, &profile);
        }
    }
    println!("{table}");

    for preset in Preset::ALL {
        println!(
            "  {} — {}",
            ui::style_text(preset.name(), ui::StyleType::TotalLabel),
            preset.description()
        );
    }
    Ok(())
}

fn add_row(table: &mut comfy_table::Table, profile: &WeightProfile) {
    let mut row = vec![Cell::new(profile.name())];
    for metric in Metric::ALL {
        let weight = profile
            .active_weights()
            .find(|(m, _)| *m == metric)
            .map(|(_, w)| w);
        row.push(ui::format_optional_cell(weight, |w| format!("{w:.2}")));
    }
    table.add_row(row);
}
