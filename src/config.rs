//! Listing configuration loaded from TOML.
//!
//! Settings are merged in three layers: built-in defaults, then a TOML
//! file, then command-line flags. The TOML file is either given explicitly
//! or picked up as `.lcrc.toml` from the current directory. Environment
//! variables are never consulted.
//!
//! # Configuration File Format
//!
//! ```toml
//! [listing]
//! max_line_width = 100
//! sort = "time"              # "name" or "time"
//! max_entries_per_class = 0  # 0 removes the limit
//! color = false
//! ```

use crate::output::DEFAULT_MAX_LINE_WIDTH;
use crate::registry::DEFAULT_MAX_ENTRIES;
use crate::sort::SortOrder;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = ".lcrc.toml";

/// Errors that can occur while loading configuration.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// A setting parsed but holds an unusable value.
    InvalidValue { key: &'static str, reason: String },
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidValue { key, reason } => {
                write!(f, "Invalid value for '{}': {}", key, reason)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Root of the configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListConfig {
    #[serde(default)]
    pub listing: ListingRules,
}

/// The `[listing]` table.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingRules {
    /// Maximum report line width in columns.
    #[serde(default = "default_max_line_width")]
    pub max_line_width: usize,

    /// Ordering applied inside every class.
    #[serde(default)]
    pub sort: SortOrder,

    /// Per-class entry limit; 0 means unlimited.
    #[serde(default = "default_max_entries")]
    pub max_entries_per_class: usize,

    /// Bold block titles when writing to a terminal.
    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_max_line_width() -> usize {
    DEFAULT_MAX_LINE_WIDTH
}

fn default_max_entries() -> usize {
    DEFAULT_MAX_ENTRIES
}

fn default_color() -> bool {
    true
}

impl Default for ListingRules {
    fn default() -> Self {
        Self {
            max_line_width: default_max_line_width(),
            sort: SortOrder::default(),
            max_entries_per_class: default_max_entries(),
            color: default_color(),
        }
    }
}

impl ListConfig {
    /// Loads configuration, falling back to defaults.
    ///
    /// Lookup order:
    /// 1. `config_path`, if given (it must exist)
    /// 2. `.lcrc.toml` in the current directory
    /// 3. built-in defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        Ok(Self::default())
    }

    /// Loads and validates configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.listing.max_line_width == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_line_width",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// The per-class limit, with 0 mapped to "no limit".
    pub fn entry_limit(&self) -> Option<usize> {
        match self.listing.max_entries_per_class {
            0 => None,
            limit => Some(limit),
        }
    }
}
