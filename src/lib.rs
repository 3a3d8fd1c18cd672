pub mod cli;
pub mod core;

use crate::core::cache::DatasetCache;
use crate::core::config::AppConfig;
use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info};

/// The process-wide dataset cache shared by every command invocation.
/// Entries revalidate against the source file's modification time, so a
/// changed spreadsheet is picked up without restarting.
pub fn dataset_cache() -> &'static DatasetCache {
    static CACHE: OnceLock<DatasetCache> = OnceLock::new();
    CACHE.get_or_init(DatasetCache::new)
}

/// Command-line filter overrides; unset fields fall back to the config's
/// client profile.
#[derive(Debug, Clone, Default)]
pub struct FilterOverrides {
    pub asset_classes: Vec<String>,
    pub geographies: Vec<String>,
    pub currencies: Vec<String>,
    pub fund_managers: Vec<String>,
    pub risk_min: Option<u8>,
    pub risk_max: Option<u8>,
    pub rating_min: Option<u8>,
    pub fee_max: Option<f64>,
    pub esg: bool,
    pub investment: Option<f64>,
}

/// Parameters of one screening run.
#[derive(Debug, Clone, Default)]
pub struct ScreenRequest {
    /// Weight profile name; defaults to the config's `default_profile`.
    pub profile: Option<String>,
    /// Top-N count; defaults to the config's `top_n`.
    pub top: Option<usize>,
    pub overrides: FilterOverrides,
}

/// Commands the application can execute.
#[derive(Debug)]
pub enum AppCommand {
    Screen(ScreenRequest),
    Explain {
        identifier: String,
        profile: Option<String>,
        overrides: FilterOverrides,
        json: bool,
    },
    Profiles,
    Export {
        request: ScreenRequest,
        output: Option<PathBuf>,
    },
}

pub fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Fund screener starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    // `profiles` needs no dataset on disk.
    if let AppCommand::Profiles = command {
        return cli::profiles::run(&config);
    }

    let dataset_path = Path::new(&config.screener.dataset);
    let funds = dataset_cache().load(dataset_path)?;

    match command {
        AppCommand::Screen(request) => cli::screen::run(&config, &funds, dataset_path, &request),
        AppCommand::Explain {
            identifier,
            profile,
            overrides,
            json,
        } => cli::explain::run(
            &config,
            &funds,
            &identifier,
            profile.as_deref(),
            &overrides,
            json,
        ),
        AppCommand::Export { request, output } => {
            cli::export::run(&config, &funds, &request, output.as_deref())
        }
        AppCommand::Profiles => unreachable!("handled above"),
    }
}
