//! Reconciler configuration
//!
//! Settings are read from a TOML file with merge-over-defaults semantics:
//! every section and every key is optional.
//!
//! # Configuration hierarchy
//!
//! ```text
//! Priority (high → low):
//! 1. CLI arguments
//! 2. FIBER_RECONCILER_CONFIG (path to a TOML file)
//! 3. Project-level (fiber-reconciler.toml in the working directory)
//! 4. Default values
//! ```
//!
//! # Usage
//!
//! ```rust
//! use fiber_reconciler::util::config::ReconcilerConfig;
//!
//! let config = ReconcilerConfig::from_toml_str("[root]\nconcurrent = true\n").unwrap();
//! assert!(config.root.concurrent);
//! assert!(config.diagnostics.dedupe);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Project-level config file name.
pub const CONFIG_FILE_NAME: &str = "fiber-reconciler.toml";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "FIBER_RECONCILER_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ReconcilerConfig {
    /// Root creation settings
    #[serde(default)]
    pub root: RootConfig,
    /// Profiler settings
    #[serde(default)]
    pub profiler: ProfilerConfig,
    /// Diagnostics and logging
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
    /// Debug-build checks
    #[serde(default)]
    pub debug: DebugConfig,
}

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RootConfig {
    /// Create roots in concurrent mode (children inherit `CONCURRENT | STRICT`)
    #[serde(default)]
    pub concurrent: bool,
    /// Reuse existing host content instead of creating it
    #[serde(default)]
    pub hydrate: bool,
}

/// Profiler configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProfilerConfig {
    /// Root fibers carry `PROFILE` mode
    #[serde(default)]
    pub enable_timer: bool,
}

/// Diagnostics configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticsConfig {
    /// Emit each distinct diagnostic only once
    #[serde(default = "default_dedupe")]
    pub dedupe: bool,
    /// Log level for the bundled subscriber
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_dedupe() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            dedupe: true,
            log_level: "warn".to_string(),
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DebugConfig {
    /// Panic when a queue shared with the alternate is mutated without a clone
    #[serde(default = "default_assert_queue_clones")]
    pub assert_queue_clones: bool,
}

fn default_assert_queue_clones() -> bool {
    cfg!(debug_assertions)
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            assert_queue_clones: cfg!(debug_assertions),
        }
    }
}

impl ReconcilerConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::ParseError)
    }

    /// Serialize to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::SerializeError)
    }
}

/// Resolve which config file applies: explicit path, then the environment
/// variable, then the project file if it exists.
pub fn resolve_config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    let project = PathBuf::from(CONFIG_FILE_NAME);
    project.exists().then_some(project)
}

/// Load configuration from `path`.
/// Returns default config if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<ReconcilerConfig, ConfigError> {
    if !path.exists() {
        return Ok(ReconcilerConfig::default());
    }
    let content = fs::read_to_string(path).map_err(ConfigError::IoError)?;
    ReconcilerConfig::from_toml_str(&content)
}

/// Load configuration following the hierarchy above.
pub fn load_default_config(explicit: Option<&Path>) -> Result<ReconcilerConfig, ConfigError> {
    match resolve_config_path(explicit) {
        Some(path) => load_config(&path),
        None => Ok(ReconcilerConfig::default()),
    }
}

/// Save configuration to `path`, creating parent directories.
pub fn save_config(
    config: &ReconcilerConfig,
    path: &Path,
) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir).map_err(ConfigError::IoError)?;
        }
    }
    let content = config.to_toml_string()?;
    fs::write(path, content).map_err(ConfigError::IoError)?;
    Ok(())
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(std::io::Error),

    #[error("Config parse error: {0}")]
    ParseError(toml::de::Error),

    #[error("Config serialize error: {0}")]
    SerializeError(toml::ser::Error),
}
