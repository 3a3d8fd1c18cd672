use crate::core::model::ClientProfile;
use crate::core::rank::DEFAULT_TOP_N;
use crate::core::scoring::{Preset, WeightProfile};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ScreenerConfig {
    /// Path to the fund spreadsheet (CSV with a header row).
    pub dataset: String,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Weight profile used when none is given on the command line.
    #[serde(default = "default_profile")]
    pub default_profile: String,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

fn default_profile() -> String {
    Preset::Moderate.name().to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub screener: ScreenerConfig,
    /// Default client profile applied when screening; CLI flags override it.
    #[serde(default)]
    pub client: Option<ClientProfile>,
    /// User-defined weight profiles, validated against the metric set on use.
    #[serde(default)]
    pub weight_profiles: BTreeMap<String, BTreeMap<String, f64>>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "fundscreen")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Resolves a profile name to a weight profile: preset names first, then
    /// the user-defined profiles from the config.
    pub fn resolve_weight_profile(&self, name: &str) -> Result<WeightProfile> {
        if let Ok(preset) = name.parse::<Preset>() {
            return Ok(WeightProfile::preset(preset));
        }
        if let Some(weights) = self.weight_profiles.get(name) {
            return WeightProfile::custom(name, weights)
                .with_context(|| format!("Invalid weight profile '{name}' in config"));
        }
        let mut known: Vec<String> = Preset::ALL.iter().map(|p| p.name().to_string()).collect();
        known.extend(self.weight_profiles.keys().cloned());
        anyhow::bail!(
            "Unknown weight profile '{}'. Available: {}",
            name,
            known.join(", ")
        )
    }
}
