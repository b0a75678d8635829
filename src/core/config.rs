//! # Configuration
//!
//! Centralizes settings with a clear override hierarchy:
//! defaults → config file → CLI flags.
//!
//! Config lives at `~/.qmenu/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{info, warn};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::PathBuf;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct QmenuConfig {
    #[serde(default)]
    pub general: GeneralConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct GeneralConfig {
    pub menu: Option<PathBuf>,
    pub log_window: Option<usize>,
    pub log_file: Option<PathBuf>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_LOG_WINDOW: usize = 20;
pub const DEFAULT_LOG_FILE: &str = "qmenu.log";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Menu definition file; `None` selects the built-in demo menu.
    pub menu: Option<PathBuf>,
    /// Number of log lines visible in the log panel.
    pub log_window: usize,
    /// Diagnostic log file path.
    pub log_file: PathBuf,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.qmenu/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".qmenu").join("config.toml"))
}

/// Load config from `~/.qmenu/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and returns
/// `QmenuConfig::default()`. If it exists but is malformed, returns
/// `ConfigError::Parse`.
pub fn load_config() -> Result<QmenuConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(QmenuConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(QmenuConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: QmenuConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}

fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# qmenu Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults -> this file -> CLI flags.

# [general]
# menu = "menu.json"        # Menu definition file (omit for the demo menu)
# log_window = 20           # Lines visible in the log panel
# log_file = "qmenu.log"    # Diagnostic log file
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → CLI.
pub fn resolve(
    config: &QmenuConfig,
    cli_menu: Option<PathBuf>,
    cli_log_window: Option<usize>,
    cli_log_file: Option<PathBuf>,
) -> ResolvedConfig {
    ResolvedConfig {
        menu: cli_menu.or_else(|| config.general.menu.clone()),
        log_window: cli_log_window
            .or(config.general.log_window)
            .unwrap_or(DEFAULT_LOG_WINDOW),
        log_file: cli_log_file
            .or_else(|| config.general.log_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE)),
    }
}
