//! Core screening pipeline: load, filter, score, rank.

pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod log;
pub mod model;
pub mod rank;
pub mod scoring;

// Re-export main types for cleaner imports
pub use cache::DatasetCache;
pub use error::{DataLoadError, ScoringError};
pub use filter::FilterCriteria;
pub use model::{AssetClass, ClientProfile, FundRecord, RiskTolerance, TimeHorizon};
pub use rank::{DEFAULT_TOP_N, ScreenOutcome};
pub use scoring::{Metric, Preset, ScoredFund, WeightProfile};
