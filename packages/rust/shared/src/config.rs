//! Application configuration for SmartCheck.
//!
//! User config lives at `~/.smartcheck/smartcheck.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SmartCheckError};
use crate::types::ProjectType;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "smartcheck.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".smartcheck";

/// Risk score at or above which every planned checklist is at least medium risk.
pub const DEFAULT_MEDIUM_RISK_SCORE: u8 = 60;

// ---------------------------------------------------------------------------
// Config structs (matching smartcheck.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Global defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Planner tuning.
    #[serde(default)]
    pub planner: PlannerConfig,
}

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Project type assumed when none is given on the command line.
    #[serde(default)]
    pub project_type: ProjectType,

    /// Result format.
    #[serde(default)]
    pub output_format: OutputFormat,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            project_type: ProjectType::Other,
            output_format: OutputFormat::Json,
        }
    }
}

/// `[planner]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Risk score threshold for the medium classification.
    #[serde(default = "default_medium_risk_score")]
    pub medium_risk_score_threshold: u8,

    /// Emit per-area checklists from the area/trade catalog.
    #[serde(default = "default_true")]
    pub include_area_trade_checklists: bool,

    /// Initial `enabled` value of planned checklists.
    #[serde(default = "default_true")]
    pub enabled_by_default: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            medium_risk_score_threshold: default_medium_risk_score(),
            include_area_trade_checklists: true,
            enabled_by_default: true,
        }
    }
}

fn default_medium_risk_score() -> u8 {
    DEFAULT_MEDIUM_RISK_SCORE
}
fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Planner settings (runtime, merged from config + CLI flags)
// ---------------------------------------------------------------------------

/// Runtime planner settings. `Default` matches the built-in planning rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerSettings {
    /// Risk score at or above which checklists are at least medium risk.
    pub medium_risk_score_threshold: u8,
    /// Whether the area/trade matrix is handed to the planner.
    pub include_area_trade_checklists: bool,
    /// Initial `enabled` value of planned checklists.
    pub enabled_by_default: bool,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for PlannerSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            medium_risk_score_threshold: config.planner.medium_risk_score_threshold.min(100),
            include_area_trade_checklists: config.planner.include_area_trade_checklists,
            enabled_by_default: config.planner.enabled_by_default,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.smartcheck/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| SmartCheckError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.smartcheck/smartcheck.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| SmartCheckError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        SmartCheckError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let path = config_file_path()?;
    init_config_at(&path)?;
    Ok(path)
}

/// Write a default config file to `path`, creating parent directories.
pub fn init_config_at(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| SmartCheckError::io(dir, e))?;
    }

    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| SmartCheckError::config(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| SmartCheckError::io(path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(())
}
