use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use fundscreen::core::log::init_logging;
use fundscreen::{AppCommand, FilterOverrides, ScreenRequest};
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Filter flags shared by the screening commands; each overrides the
/// corresponding filter derived from the config's client profile.
#[derive(Args, Clone, Default)]
struct FilterArgs {
    /// Restrict to asset classes (e.g. equity, fixed-income)
    #[arg(long = "asset-class")]
    asset_classes: Vec<String>,

    /// Restrict to geographic regions
    #[arg(long = "geography")]
    geographies: Vec<String>,

    /// Restrict to currencies (ISO codes)
    #[arg(long = "currency")]
    currencies: Vec<String>,

    /// Restrict to fund managers
    #[arg(long = "manager")]
    fund_managers: Vec<String>,

    /// Minimum risk level (1-7)
    #[arg(long)]
    risk_min: Option<u8>,

    /// Maximum risk level (1-7)
    #[arg(long)]
    risk_max: Option<u8>,

    /// Minimum Morningstar rating (1-5); unrated funds are excluded
    #[arg(long)]
    rating_min: Option<u8>,

    /// Maximum TER fee in percent, inclusive
    #[arg(long)]
    fee_max: Option<f64>,

    /// Only sustainable (ESG) funds
    #[arg(long)]
    esg: bool,

    /// Available investment amount; funds demanding more are excluded
    #[arg(long)]
    investment: Option<f64>,
}

impl From<FilterArgs> for FilterOverrides {
    fn from(args: FilterArgs) -> FilterOverrides {
        FilterOverrides {
            asset_classes: args.asset_classes,
            geographies: args.geographies,
            currencies: args.currencies,
            fund_managers: args.fund_managers,
            risk_min: args.risk_min,
            risk_max: args.risk_max,
            rating_min: args.rating_min,
            fee_max: args.fee_max,
            esg: args.esg,
            investment: args.investment,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Screen the fund universe and show the ranked top funds
    Screen {
        /// Weight profile: a preset or a custom profile from the config
        #[arg(short, long)]
        profile: Option<String>,

        /// Number of funds to show
        #[arg(short, long)]
        top: Option<usize>,

        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Show the score breakdown for one fund
    Explain {
        /// Fund identifier (ISIN)
        identifier: String,

        /// Weight profile: a preset or a custom profile from the config
        #[arg(short, long)]
        profile: Option<String>,

        /// Emit the breakdown as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        filters: FilterArgs,
    },
    /// List preset and user-defined weight profiles
    Profiles,
    /// Export the ranked top funds as CSV
    Export {
        /// Weight profile: a preset or a custom profile from the config
        #[arg(short, long)]
        profile: Option<String>,

        /// Number of funds to export
        #[arg(short, long)]
        top: Option<usize>,

        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        filters: FilterArgs,
    },
}

impl From<Commands> for AppCommand {
    fn from(cmd: Commands) -> AppCommand {
        match cmd {
            Commands::Screen {
                profile,
                top,
                filters,
            } => AppCommand::Screen(ScreenRequest {
                profile,
                top,
                overrides: filters.into(),
            }),
            Commands::Explain {
                identifier,
                profile,
                json,
                filters,
            } => AppCommand::Explain {
                identifier,
                profile,
                overrides: filters.into(),
                json,
            },
            Commands::Profiles => AppCommand::Profiles,
            Commands::Export {
                profile,
                top,
                output,
                filters,
            } => AppCommand::Export {
                request: ScreenRequest {
                    profile,
                    top,
                    overrides: filters.into(),
                },
                output,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => fundscreen::cli::setup::setup(),
        Some(cmd) => fundscreen::run_command(cmd.into(), cli.config_path.as_deref()),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
