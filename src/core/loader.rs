//! Loads the fund spreadsheet into the in-memory fund table.
//!
//! The source data is a delimited export with a header row. Header names are
//! normalized to lowercase snake_case so the loader tolerates case, whitespace
//! and punctuation variation. Numeric fields arrive in European formats
//! (`"1,41%"`, `"1.234,56"`, `"600,00€ ISIN"`) and are parsed into plain `f64`
//! values in percent-as-number units: a 12.5% return is stored as `12.5`.
//! `N/D`/`NA`/empty cells become `None`, never zero.
//!
//! Rows without a usable identifier or asset class are dropped with a warning;
//! only file-level problems (missing file, malformed CSV, missing required
//! columns) fail the load.

use crate::core::error::DataLoadError;
use crate::core::model::{AssetClass, FundRecord, RiskBucket};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, warn};

/// Canonical column names with the header aliases seen in source exports.
const COLUMN_ALIASES: &[(&str, &[&str])] = &[
    ("identifier", &["identifier", "isin", "id"]),
    ("name", &["name", "fund_name", "fund"]),
    ("asset_class", &["asset_class", "asset_type", "tipo_de_activo"]),
    ("geography", &["geography", "region", "región"]),
    ("currency", &["currency", "divisa"]),
    ("risk_level", &["risk_level", "risk", "nivel_de_riesgo"]),
    (
        "morningstar_rating",
        &["morningstar_rating", "rating_morningstar", "rating"],
    ),
    ("ter_fee", &["ter_fee", "ter", "comisión_ter", "comision_ter"]),
    ("return_12m", &["return_12m", "ren_últ_12_meses"]),
    ("return_36m", &["return_36m", "ren_últ_36_meses"]),
    ("return_60m", &["return_60m", "ren_últ_60_meses"]),
    ("sharpe_ratio", &["sharpe_ratio", "sharpe"]),
    (
        "is_esg",
        &["is_esg", "esg", "sustainable", "pref_sostenibilidad"],
    ),
    (
        "minimum_investment",
        &["minimum_investment", "min_investment", "min_first_buy"],
    ),
    ("fund_manager", &["fund_manager", "manager", "gestora"]),
];

const REQUIRED_COLUMNS: &[&str] = &["identifier", "name", "asset_class"];

/// Loads and normalizes the fund table from a CSV file.
pub fn load_funds<P: AsRef<Path>>(path: P) -> Result<Vec<FundRecord>, DataLoadError> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(file);

    let headers = reader.headers().map_err(|source| DataLoadError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    let columns = resolve_columns(headers)?;

    let mut funds = Vec::new();
    let mut seen = HashSet::new();
    for (row_index, record) in reader.records().enumerate() {
        let record = record.map_err(|source| DataLoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        // Header row is line 1
        let line = row_index + 2;

        let Some(fund) = parse_row(&record, &columns, line) else {
            continue;
        };
        if !seen.insert(fund.identifier.clone()) {
            warn!(
                "Dropping row {line}: duplicate identifier '{}'",
                fund.identifier
            );
            continue;
        }
        funds.push(fund);
    }

    debug!("Loaded {} funds from {}", funds.len(), path.display());
    Ok(funds)
}

/// Maps canonical column names to positions in the header row.
fn resolve_columns(headers: &csv::StringRecord) -> Result<HashMap<&'static str, usize>, DataLoadError> {
    let normalized: Vec<String> = headers.iter().map(normalize_header).collect();

    let mut columns = HashMap::new();
    for (canonical, aliases) in COLUMN_ALIASES {
        if let Some(pos) = normalized
            .iter()
            .position(|h| aliases.contains(&h.as_str()))
        {
            columns.insert(*canonical, pos);
        }
    }

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !columns.contains_key(**c))
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DataLoadError::MissingColumns(missing));
    }
    Ok(columns)
}

/// Lowercase snake_case form of a header cell: `" Nivel de Riesgo "` becomes
/// `"nivel_de_riesgo"`.
fn normalize_header(header: &str) -> String {
    let mut out = String::with_capacity(header.len());
    let mut last_was_sep = true;
    for ch in header.trim().chars() {
        if ch.is_alphanumeric() {
            out.extend(ch.to_lowercase());
            last_was_sep = false;
        } else if !last_was_sep {
            out.push('_');
            last_was_sep = true;
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    out
}

fn parse_row(
    record: &csv::StringRecord,
    columns: &HashMap<&'static str, usize>,
    line: usize,
) -> Option<FundRecord> {
    let cell = |name: &str| -> Option<&str> {
        columns
            .get(name)
            .and_then(|&i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty() && !is_unknown(s))
    };

    let Some(identifier) = cell("identifier") else {
        warn!("Dropping row {line}: missing fund identifier");
        return None;
    };
    let Some(asset_class_raw) = cell("asset_class") else {
        warn!("Dropping row {line}: missing asset class for '{identifier}'");
        return None;
    };

    let risk_level = cell("risk_level").and_then(|s| parse_bounded_int(s, 1, 7, "risk level", line));
    let morningstar_rating =
        cell("morningstar_rating").and_then(|s| parse_bounded_int(s, 1, 5, "rating", line));

    Some(FundRecord {
        identifier: identifier.to_string(),
        name: cell("name").unwrap_or(identifier).to_string(),
        asset_class: AssetClass::from(asset_class_raw),
        geography: cell("geography").unwrap_or("Unknown").to_string(),
        currency: cell("currency").unwrap_or("EUR").to_string(),
        risk_level,
        morningstar_rating,
        ter_fee: cell("ter_fee").and_then(parse_decimal),
        return_12m: cell("return_12m").and_then(parse_decimal),
        return_36m: cell("return_36m").and_then(parse_decimal),
        return_60m: cell("return_60m").and_then(parse_decimal),
        sharpe_ratio: cell("sharpe_ratio").and_then(parse_decimal),
        is_esg: cell("is_esg").map(parse_flag).unwrap_or(false),
        minimum_investment: cell("minimum_investment").and_then(parse_decimal),
        fund_manager: cell("fund_manager").map(str::to_string),
        risk_bucket: RiskBucket::from_level(risk_level),
    })
}

fn is_unknown(s: &str) -> bool {
    matches!(s.to_uppercase().as_str(), "N/D" | "N/A" | "NA" | "-")
}

/// Parses a decimal that may carry a percent sign, a currency symbol, European
/// separators, or trailing annotations (`"600,00€ ISIN"`). Returns `None` for
/// anything without a numeric token.
pub(crate) fn parse_decimal(s: &str) -> Option<f64> {
    // First contiguous run of digits/separators, sign included.
    let mut token = String::new();
    for ch in s.chars() {
        match ch {
            '0'..='9' | '.' | ',' => token.push(ch),
            '-' | '+' if token.is_empty() => token.push(ch),
            _ if token.is_empty() => continue,
            _ => break,
        }
    }
    if token.is_empty() || token == "-" || token == "+" {
        return None;
    }

    // "1.234,56" uses '.' for thousands and ',' for decimals; a lone ',' is a
    // decimal comma.
    let normalized = if token.contains(',') {
        token.replace('.', "").replace(',', ".")
    } else {
        token
    };
    normalized.parse().ok()
}

fn parse_bounded_int(s: &str, min: u8, max: u8, what: &str, line: usize) -> Option<u8> {
    let value = parse_decimal(s)?;
    if value.fract() != 0.0 || value < f64::from(min) || value > f64::from(max) {
        warn!("Row {line}: {what} '{s}' outside {min}-{max}, treating as unknown");
        return None;
    }
    Some(value as u8)
}

fn parse_flag(s: &str) -> bool {
    matches!(
        s.to_lowercase().as_str(),
        "yes" | "y" | "true" | "1" | "sí" | "si"
    )
}
