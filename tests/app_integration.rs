use std::fs;
use std::path::Path;
use tracing::info;

use fundscreen::{AppCommand, FilterOverrides, ScreenRequest};

// Adds automatic logging to test
mod test_utils {
    use std::fs;
    use std::path::{Path, PathBuf};

    pub const FUNDS_CSV: &str = "\
ISIN,Fund Name,Asset Class,Region,Currency,Risk Level,Rating,TER,Return 12m,Return 36m,Return 60m,Sharpe,ESG,Min Investment,Manager\n\
EU0001,Euro Core Bond,Fixed Income,Europe,EUR,2,4,\"0,45%\",\"2,1%\",\"1,8%\",\"1,5%\",\"0,9\",Yes,\"1.000,00€\",Core AM\n\
EU0002,Euro Dividend Equity,Equity,Europe,EUR,5,3,\"1,60%\",\"9,4%\",\"6,2%\",\"5,1%\",\"0,7\",No,500,Core AM\n\
GL0003,Global Growth,Equity,Global,USD,6,5,\"1,85%\",\"15,2%\",\"11,4%\",\"9,8%\",\"1,1\",No,\"5.000,00€\",Growth Partners\n\
EU0004,Green Transition,Equity,Europe,EUR,5,N/D,\"1,20%\",\"7,8%\",N/D,N/D,\"0,8\",Yes,100,Green AM\n\
EU0005,Cash Reserve,Monetario,Europe,EUR,1,2,\"0,15%\",\"0,9%\",\"0,7%\",\"0,5%\",N/D,No,1,Core AM\n";

    /// Writes a funds CSV and a config pointing at it; returns the config path.
    pub fn write_fixture(dir: &Path, extra_config: &str) -> PathBuf {
        let dataset_path = dir.join("funds.csv");
        fs::write(&dataset_path, FUNDS_CSV).expect("Failed to write dataset");

        let config_path = dir.join("config.yaml");
        let config_content = format!(
            "screener:\n  dataset: \"{}\"\n{extra_config}",
            dataset_path.display()
        );
        fs::write(&config_path, config_content).expect("Failed to write config file");
        config_path
    }
}

#[test_log::test]
fn test_full_screen_flow() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_fixture(dir.path(), "");

    let result = fundscreen::run_command(
        AppCommand::Screen(ScreenRequest::default()),
        Some(config_path.to_str().unwrap()),
    );
    assert!(
        result.is_ok(),
        "Screen command failed with: {:?}",
        result.err()
    );
}

#[test_log::test]
fn test_screen_with_client_profile_and_overrides() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_fixture(
        dir.path(),
        "client:\n  available_investment: 2000.0\n  time_horizon: medium\n  risk_tolerance: moderate\n",
    );

    let request = ScreenRequest {
        overrides: FilterOverrides {
            esg: true,
            ..Default::default()
        },
        ..Default::default()
    };
    let result = fundscreen::run_command(
        AppCommand::Screen(request),
        Some(config_path.to_str().unwrap()),
    );
    assert!(result.is_ok(), "failed: {:?}", result.err());
}

#[test_log::test]
fn test_screen_with_no_matches_is_not_an_error() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_fixture(dir.path(), "");

    // No fund in the fixture has risk level 7.
    let request = ScreenRequest {
        overrides: FilterOverrides {
            risk_min: Some(7),
            ..Default::default()
        },
        ..Default::default()
    };
    let result = fundscreen::run_command(
        AppCommand::Screen(request),
        Some(config_path.to_str().unwrap()),
    );
    assert!(result.is_ok(), "failed: {:?}", result.err());
}

#[test_log::test]
fn test_export_is_ranked_and_reproducible() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_fixture(dir.path(), "");

    let run_export = |output: &Path| {
        let request = ScreenRequest {
            profile: Some("conservative".to_string()),
            ..Default::default()
        };
        fundscreen::run_command(
            AppCommand::Export {
                request,
                output: Some(output.to_path_buf()),
            },
            Some(config_path.to_str().unwrap()),
        )
    };

    let first_path = dir.path().join("first.csv");
    let second_path = dir.path().join("second.csv");
    run_export(&first_path).expect("first export failed");
    run_export(&second_path).expect("second export failed");

    let first = fs::read_to_string(&first_path).unwrap();
    let second = fs::read_to_string(&second_path).unwrap();
    // Identical inputs produce bit-identical output.
    assert_eq!(first, second);

    let mut lines = first.lines();
    let header = lines.next().expect("export has a header");
    assert!(header.starts_with("identifier,"));
    assert!(header.ends_with(",composite_score"));

    // Header plus all five funds (universe is smaller than the default top 10),
    // sorted descending by the trailing score column.
    let rows: Vec<&str> = lines.collect();
    assert_eq!(rows.len(), 5);
    let scores: Vec<f64> = rows
        .iter()
        .map(|r| r.rsplit(',').next().unwrap().parse().unwrap())
        .collect();
    for pair in scores.windows(2) {
        assert!(pair[0] >= pair[1], "export not ranked: {scores:?}");
    }
    info!(?scores, "export ranking verified");
}

#[test_log::test]
fn test_dataset_cache_is_shared_across_invocations() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_fixture(dir.path(), "");
    let dataset_path = dir.path().join("funds.csv");

    fundscreen::run_command(
        AppCommand::Screen(ScreenRequest::default()),
        Some(config_path.to_str().unwrap()),
    )
    .expect("first screen failed");

    // The command populated the process-wide cache; an unchanged file yields
    // the same shared table, not a re-read.
    let first = fundscreen::dataset_cache().load(&dataset_path).unwrap();
    fundscreen::run_command(
        AppCommand::Screen(ScreenRequest::default()),
        Some(config_path.to_str().unwrap()),
    )
    .expect("second screen failed");
    let second = fundscreen::dataset_cache().load(&dataset_path).unwrap();
    assert!(std::sync::Arc::ptr_eq(&first, &second));
}

#[test_log::test]
fn test_explain_known_fund_as_json() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_fixture(dir.path(), "");

    let result = fundscreen::run_command(
        AppCommand::Explain {
            identifier: "EU0001".to_string(),
            profile: Some("conservative".to_string()),
            overrides: FilterOverrides::default(),
            json: true,
        },
        Some(config_path.to_str().unwrap()),
    );
    assert!(result.is_ok(), "failed: {:?}", result.err());
}

#[test_log::test]
fn test_explain_fund_outside_filtered_universe_fails() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_fixture(dir.path(), "");

    // GL0003 has risk 6 and is excluded by the risk cap.
    let result = fundscreen::run_command(
        AppCommand::Explain {
            identifier: "GL0003".to_string(),
            profile: None,
            overrides: FilterOverrides {
                risk_max: Some(5),
                ..Default::default()
            },
            json: false,
        },
        Some(config_path.to_str().unwrap()),
    );
    assert!(result.is_err());
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("not in the filtered universe")
    );
}

#[test_log::test]
fn test_profiles_command() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_fixture(
        dir.path(),
        "weight_profiles:\n  cheap-and-steady:\n    low_fees: 1.0\n",
    );

    let result = fundscreen::run_command(
        AppCommand::Profiles,
        Some(config_path.to_str().unwrap()),
    );
    assert!(result.is_ok(), "failed: {:?}", result.err());
}

#[test_log::test]
fn test_missing_dataset_is_fatal() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = dir.path().join("config.yaml");
    fs::write(
        &config_path,
        "screener:\n  dataset: \"/nonexistent/funds.csv\"\n",
    )
    .expect("Failed to write config file");

    let result = fundscreen::run_command(
        AppCommand::Screen(ScreenRequest::default()),
        Some(config_path.to_str().unwrap()),
    );
    assert!(result.is_err());
}

#[test_log::test]
fn test_unknown_weight_profile_is_recoverable_error() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_path = test_utils::write_fixture(dir.path(), "");

    let request = ScreenRequest {
        profile: Some("no-such-profile".to_string()),
        ..Default::default()
    };
    let result = fundscreen::run_command(
        AppCommand::Screen(request),
        Some(config_path.to_str().unwrap()),
    );
    assert!(result.is_err());
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("Unknown weight profile")
    );
}
