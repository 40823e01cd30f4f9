//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.lantern/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::PathBuf;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct LanternConfig {
    #[serde(default)]
    pub general: GeneralConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct GeneralConfig {
    pub tick_ms: Option<u64>,
    pub scrollback_lines: Option<usize>,
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_TICK_MS: u64 = 20;
pub const DEFAULT_SCROLLBACK_LINES: usize = 1000;
pub const DEFAULT_LOG_FILE: &str = "lantern.log";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub tick_ms: u64,
    pub scrollback_lines: usize,
    pub log_file: PathBuf,
    pub log_level: log::LevelFilter,
}

/// CLI-provided values, each `None` when the flag was not given.
#[derive(Debug, Default)]
pub struct Overrides {
    pub config_path: Option<PathBuf>,
    pub tick_ms: Option<u64>,
    pub log_file: Option<PathBuf>,
    pub log_level: Option<String>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    InvalidLogLevel(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
            ConfigError::InvalidLogLevel(level) => {
                write!(
                    f,
                    "invalid log level {level:?} (expected off, error, warn, info, debug or trace)"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.lantern/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".lantern").join("config.toml"))
}

/// Load the config file, or the explicit `path` when given.
///
/// A missing default-location file generates a commented-out template and
/// resolves to `LanternConfig::default()`. A malformed file is a typed
/// startup error, not a silent fallback.
pub fn load_config(path: Option<&PathBuf>) -> Result<LanternConfig, ConfigError> {
    let (path, explicit) = match path {
        Some(p) => (p.clone(), true),
        None => match config_path() {
            Some(p) => (p, false),
            None => {
                warn!("Could not determine home directory, using default config");
                return Ok(LanternConfig::default());
            }
        },
    };

    if !path.exists() {
        if explicit {
            return Err(ConfigError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("config file not found: {}", path.display()),
            )));
        }
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(LanternConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: LanternConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &PathBuf) {
    let default_content = r#"# Lantern Configuration
# All settings are optional — defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# tick_ms = 20                # render loop pacing in milliseconds
# scrollback_lines = 1000     # output buffer cap (oldest lines evicted first)
# log_file = "lantern.log"    # logs go to a file; the TUI owns the terminal
# log_level = "info"          # off, error, warn, info, debug, trace
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

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(overrides: Overrides) -> Result<ResolvedConfig, ConfigError> {
    let config = load_config(overrides.config_path.as_ref())?;

    let tick_ms = overrides
        .tick_ms
        .or_else(|| env_parsed("LANTERN_TICK_MS"))
        .or(config.general.tick_ms)
        .unwrap_or(DEFAULT_TICK_MS);

    let scrollback_lines = env_parsed("LANTERN_SCROLLBACK_LINES")
        .or(config.general.scrollback_lines)
        .unwrap_or(DEFAULT_SCROLLBACK_LINES);

    let log_file = overrides
        .log_file
        .or_else(|| std::env::var_os("LANTERN_LOG_FILE").map(PathBuf::from))
        .or(config.general.log_file)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

    let log_level = overrides
        .log_level
        .or_else(|| std::env::var("LANTERN_LOG_LEVEL").ok())
        .or(config.general.log_level)
        .map(|level| {
            level
                .parse::<log::LevelFilter>()
                .map_err(|_| ConfigError::InvalidLogLevel(level))
        })
        .transpose()?
        .unwrap_or(log::LevelFilter::Info);

    Ok(ResolvedConfig {
        tick_ms,
        scrollback_lines,
        log_file,
        log_level,
    })
}

/// Read an env var and parse it, warning (not failing) on garbage.
fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring unparseable {name}={raw:?}");
            None
        }
    }
}
