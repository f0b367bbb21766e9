use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::filter::DEFAULT_SIZE_LIMIT;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "STATE_VIEWER_CONFIG";

// ---------------------------------------------------------------------------
// Config types
// ---------------------------------------------------------------------------

/// What to do when a payload has more records than `max_rows`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowLimitPolicy {
    /// Process anyway and report a warning.
    #[default]
    Warn,
    /// Refuse the payload.
    Reject,
}

/// Input caps and selection bounds used by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Hard cap on the raw payload, checked before parsing.
    pub max_upload_bytes: u64,
    /// Soft (or hard, see `row_limit_policy`) cap on the record count.
    pub max_rows: usize,
    pub row_limit_policy: RowLimitPolicy,
    /// Upper bound of the top-N selector.
    pub max_top_n: usize,
    /// Size limit in bytes for the compiled filter pattern.
    pub filter_size_limit: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 5 * 1024 * 1024,
            max_rows: 50_000,
            row_limit_policy: RowLimitPolicy::Warn,
            max_top_n: 50,
            filter_size_limit: DEFAULT_SIZE_LIMIT,
        }
    }
}

/// Pixel size of the exported PNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 400,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub limits: LimitsConfig,
    pub chart: ChartConfig,
    /// Initial value of the top-N slider.
    pub default_top_n: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            limits: LimitsConfig::default(),
            chart: ChartConfig::default(),
            default_top_n: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Parse a JSON config file. Missing keys fall back to their defaults.
pub fn load(path: &Path) -> Result<AppConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config file {}", path.display()))?;
    let config: AppConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing config file {}", path.display()))?;
    Ok(config)
}

/// Load the file named by [`CONFIG_ENV`], or the defaults when it is unset or
/// unreadable.
pub fn from_env() -> AppConfig {
    let Some(path) = std::env::var_os(CONFIG_ENV) else {
        return AppConfig::default();
    };
    match load(Path::new(&path)) {
        Ok(config) => {
            log::info!("Loaded config from {}", Path::new(&path).display());
            config
        }
        Err(e) => {
            log::warn!("Ignoring config: {e:#}");
            AppConfig::default()
        }
    }
}
