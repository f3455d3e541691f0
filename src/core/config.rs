//! Chart configuration
//!
//! Every field has a default, so an empty JSON object is a valid config.
//! Lookup order when no explicit path is given:
//!
//! 1. `.bodygraph.json` in the working directory
//! 2. `<config_dir>/bodygraph/config.json`
//! 3. built-in defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::cancel::Cancellation;
use crate::core::error::{ChartError, Result, ResultExt};
use crate::core::gates::GateLineResolver;
use crate::core::solar_arc::SolarArcConfig;

/// Project-local config file name
pub const LOCAL_CONFIG_FILE: &str = ".bodygraph.json";

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub solar_arc: SolarArcConfig,
    /// Rotation applied to every longitude before gate resolution
    pub wheel_offset_degrees: f64,
    /// Wall-clock budget for one chart, in milliseconds
    pub timeout_ms: Option<u64>,
}

impl ChartConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ChartConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a config file. Unlike discovery, a missing file is an error.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(ChartError::from)
            .context(format!("reading config {}", path.display()))?;
        Self::from_json(&content).context(format!("parsing config {}", path.display()))
    }

    /// Candidate config paths, most specific first
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join(LOCAL_CONFIG_FILE));
        }
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("bodygraph").join("config.json"));
        }
        paths
    }

    /// Explicit path if given, else the first existing search path, else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }
        Self::discover_in(&Self::search_paths())
    }

    /// First existing file among `paths`, else defaults.
    pub fn discover_in(paths: &[PathBuf]) -> Result<Self> {
        match paths.iter().find(|p| p.is_file()) {
            Some(path) => {
                debug!(path = %path.display(), "loading chart config");
                Self::load_from_file(path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.solar_arc.validate()?;
        if !self.wheel_offset_degrees.is_finite() {
            return Err(ChartError::invalid_config(format!(
                "wheel_offset_degrees must be finite, got {}",
                self.wheel_offset_degrees
            )));
        }
        if self.timeout_ms == Some(0) {
            return Err(ChartError::invalid_config("timeout_ms must be positive"));
        }
        Ok(())
    }

    /// Gate resolver using the configured wheel offset
    pub fn resolver(&self) -> GateLineResolver {
        GateLineResolver::with_wheel_offset(self.wheel_offset_degrees)
    }

    /// Fresh cancellation carrying the configured deadline, if any.
    pub fn cancellation(&self) -> Cancellation {
        match self.timeout_ms {
            Some(ms) => Cancellation::new().with_timeout(Duration::from_millis(ms)),
            None => Cancellation::new(),
        }
    }
}
