//! View configuration.
//!
//! Default sort/group settings and the deferred filter delay. Configuration
//! can be loaded from:
//! - a TOML file (default: ~/.config/trace/views.toml)
//! - environment variables (TRACE_* prefixed)
//!
//! # Example
//!
//! ```rust,no_run
//! use trace_core::config::ViewConfig;
//!
//! // Load from default path or fall back to env vars
//! let config = ViewConfig::load().expect("Failed to load config");
//!
//! // Or from environment variables only
//! let config = ViewConfig::from_env();
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::defaults;
use crate::models::{GroupMode, SortMode, SortOrder};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

static ENV_VAR_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid regex"));

fn default_pinned_first() -> bool {
    defaults::PINNED_FIRST
}

fn default_debounce_ms() -> u64 {
    defaults::FILTER_DEBOUNCE_MS
}

/// Default view settings for entry lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub sort_mode: SortMode,
    #[serde(default)]
    pub sort_order: SortOrder,
    #[serde(default = "default_pinned_first")]
    pub pinned_first: bool,
    #[serde(default)]
    pub group_mode: GroupMode,
    /// Delay before a deferred filter recomputation runs.
    #[serde(default = "default_debounce_ms")]
    pub filter_debounce_ms: u64,
    #[serde(default)]
    pub show_archived: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            sort_mode: SortMode::default(),
            sort_order: SortOrder::default(),
            pinned_first: defaults::PINNED_FIRST,
            group_mode: GroupMode::default(),
            filter_debounce_ms: defaults::FILTER_DEBOUNCE_MS,
            show_archived: defaults::SHOW_ARCHIVED,
        }
    }
}

impl ViewConfig {
    /// Get the default config file path.
    ///
    /// Returns: ~/.config/trace/views.toml
    pub fn default_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from(".config"));
        path.push("trace");
        path.push("views.toml");
        path
    }

    /// Load configuration from the default path, falling back to environment variables.
    pub fn load() -> ConfigResult<Self> {
        let path = Self::default_config_path();

        if path.exists() {
            info!("Loading view config from: {}", path.display());
            Self::from_file(&path)
        } else {
            debug!(
                "Config file not found at {}, using environment variables",
                path.display()
            );
            let config = Self::from_env();
            config.validate()?;
            Ok(config)
        }
    }

    /// Load configuration from a TOML file with a `[views]` table.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text, substituting `${VAR}` references.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        #[derive(Deserialize)]
        struct TomlRoot {
            #[serde(default)]
            views: Option<ViewConfig>,
        }

        let content = Self::substitute_env_vars(content);
        let root: TomlRoot = toml::from_str(&content)?;
        let config = root.views.unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    ///
    /// Unparseable values are logged and replaced by the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            sort_mode: env_parse("TRACE_SORT_MODE").unwrap_or(defaults.sort_mode),
            sort_order: env_parse("TRACE_SORT_ORDER").unwrap_or(defaults.sort_order),
            pinned_first: env_bool("TRACE_PINNED_FIRST").unwrap_or(defaults.pinned_first),
            group_mode: env_parse("TRACE_GROUP_MODE").unwrap_or(defaults.group_mode),
            filter_debounce_ms: env_parse("TRACE_FILTER_DEBOUNCE_MS")
                .unwrap_or(defaults.filter_debounce_ms),
            show_archived: env_bool("TRACE_SHOW_ARCHIVED").unwrap_or(defaults.show_archived),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.filter_debounce_ms == 0 {
            return Err(ConfigError::Validation(
                "filter_debounce_ms must be greater than 0".to_string(),
            ));
        }
        if self.filter_debounce_ms > defaults::FILTER_DEBOUNCE_MAX_MS {
            return Err(ConfigError::Validation(format!(
                "filter_debounce_ms must be at most {}",
                defaults::FILTER_DEBOUNCE_MAX_MS
            )));
        }
        Ok(())
    }

    pub fn filter_debounce(&self) -> Duration {
        Duration::from_millis(self.filter_debounce_ms)
    }

    /// Replace `${VAR}` placeholders with environment values, leaving unknown
    /// variables untouched.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_REF
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    read_env(key, |raw| raw.trim().parse().ok())
}

fn env_bool(key: &str) -> Option<bool> {
    read_env(key, |raw| match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    })
}

/// Read an environment override, logging and dropping unparseable values.
fn read_env<T>(key: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    parse_env_value(key, env::var(key).ok(), parse).unwrap_or_else(|e| {
        warn!(error = %e, "Ignoring invalid environment value");
        None
    })
}

fn parse_env_value<T>(
    key: &str,
    raw: Option<String>,
    parse: impl Fn(&str) -> Option<T>,
) -> ConfigResult<Option<T>> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    match parse(&raw) {
        Some(value) => Ok(Some(value)),
        None => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        }),
    }
}
