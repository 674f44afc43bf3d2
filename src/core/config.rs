//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.hncli/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::DEFAULT_API_BASE_URL;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct HnConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub color: Option<bool>,
    pub story_limit: Option<usize>,
    pub comments_limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_STORY_LIMIT: usize = 10;
pub const DEFAULT_COMMENTS_LIMIT: usize = 5;
const CONFIG_DIR_NAME: &str = ".hncli";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub color: bool,
    pub story_limit: usize,
    pub comments_limit: usize,
    pub api_base_url: String,
    /// Where history and the last listing are kept.
    pub data_dir: PathBuf,
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

/// Returns `~/.hncli`.
pub fn data_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(CONFIG_DIR_NAME))
}

/// Returns the path to `~/.hncli/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    data_dir().map(|d| d.join("config.toml"))
}

/// Load config from `explicit` or `~/.hncli/config.toml`.
///
/// A missing default file is generated and `HnConfig::default()` returned.
/// A missing explicit file is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<HnConfig, ConfigError> {
    if let Some(path) = explicit {
        return read_config(path);
    }

    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(HnConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(HnConfig::default());
    }

    read_config(&path)
}

fn read_config(path: &Path) -> Result<HnConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: HnConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# hn configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# color = true            # Or set HN_COLOR=0, or pass --no-color. F2 toggles it in the shell.
# story_limit = 10        # Or set HN_STORY_LIMIT
# comments_limit = 5      # Top-level comments shown by `view --comments`

# [api]
# base_url = "https://hacker-news.firebaseio.com/v0"   # Or set HN_API_URL
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
///
/// `cli_no_color` is the `--no-color` flag; it can only turn color off.
pub fn resolve(config: &HnConfig, cli_no_color: bool) -> ResolvedConfig {
    // Color: CLI → env → config → default
    let color = if cli_no_color {
        false
    } else {
        std::env::var("HN_COLOR")
            .ok()
            .and_then(|v| parse_bool(&v))
            .or(config.general.color)
            .unwrap_or(true)
    };

    // Story limit: env → config → default
    let story_limit = std::env::var("HN_STORY_LIMIT")
        .ok()
        .and_then(|v| v.parse().ok())
        .or(config.general.story_limit)
        .unwrap_or(DEFAULT_STORY_LIMIT);

    // API base URL: env → config → default
    let api_base_url = std::env::var("HN_API_URL")
        .ok()
        .or_else(|| config.api.base_url.clone())
        .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

    ResolvedConfig {
        color,
        story_limit,
        comments_limit: config
            .general
            .comments_limit
            .unwrap_or(DEFAULT_COMMENTS_LIMIT),
        api_base_url,
        data_dir: data_dir().unwrap_or_else(|| PathBuf::from(CONFIG_DIR_NAME)),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config = HnConfig::default();
        assert!(config.general.color.is_none());
        assert!(config.api.base_url.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = HnConfig::default();
        let resolved = resolve(&config, false);
        assert_eq!(resolved.comments_limit, DEFAULT_COMMENTS_LIMIT);
        assert!(resolved.data_dir.ends_with(CONFIG_DIR_NAME));
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = HnConfig {
            general: GeneralConfig {
                color: Some(false),
                story_limit: Some(3),
                comments_limit: Some(2),
            },
            api: ApiConfig {
                base_url: Some("http://localhost:9000/v0".to_string()),
            },
        };
        let resolved = resolve(&config, false);
        assert_eq!(resolved.comments_limit, 2);
        if std::env::var("HN_COLOR").is_err() {
            assert!(!resolved.color);
        }
        if std::env::var("HN_STORY_LIMIT").is_err() {
            assert_eq!(resolved.story_limit, 3);
        }
        if std::env::var("HN_API_URL").is_err() {
            assert_eq!(resolved.api_base_url, "http://localhost:9000/v0");
        }
    }

    #[test]
    fn test_resolve_cli_no_color_wins() {
        let config = HnConfig {
            general: GeneralConfig {
                color: Some(true),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve(&config, true);
        assert!(!resolved.color);
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
[general]
color = false
story_limit = 25
comments_limit = 8

[api]
base_url = "http://127.0.0.1:8080/v0"
"#;
        let config: HnConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.color, Some(false));
        assert_eq!(config.general.story_limit, Some(25));
        assert_eq!(config.general.comments_limit, Some(8));
        assert_eq!(
            config.api.base_url.as_deref(),
            Some("http://127.0.0.1:8080/v0")
        );
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing, everything else stays default
        let toml_str = r#"
[general]
story_limit = 4
"#;
        let config: HnConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.story_limit, Some(4));
        assert!(config.general.color.is_none());
        assert!(config.api.base_url.is_none());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_explicit_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[general\ncolor = ").unwrap();
        assert!(matches!(load_config(Some(&path)), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_generated_default_is_valid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        generate_default_config(&path);
        let config = load_config(Some(&path)).unwrap();
        assert!(config.general.story_limit.is_none());
    }

    #[test]
    fn test_parse_bool_variants() {
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool(" TRUE "), Some(true));
        assert_eq!(parse_bool("maybe"), None);
    }
}
