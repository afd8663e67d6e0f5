use std::path::Path;

use serde::Deserialize;

use crate::crawl::Descend;
use crate::error::MapError;
use crate::resolver::FieldOverride;

/// Mapper configuration, parsed from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MapperConfig {
    /// Make static fields visible to the traversal.
    #[serde(default)]
    pub include_statics: bool,

    #[serde(default)]
    pub descend: Descend,

    /// Check the whole mapping against the target type at bind time.
    #[serde(default)]
    pub validate_plan: bool,

    #[serde(default)]
    pub logging: LogConfig,

    /// Per-field metadata overrides.
    #[serde(default)]
    pub fields: Vec<FieldOverride>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub verbose: bool,
}

fn default_enabled() -> bool {
    true
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            verbose: false,
        }
    }
}

impl MapperConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| MapError::Config(format!("{}: {e}", path.display())))?;
        Self::parse(&content).map_err(|e| e.with_context(path.display()))
    }

    /// Parse configuration from a TOML string.
    pub fn parse(toml_str: &str) -> Result<Self, MapError> {
        toml::from_str(toml_str).map_err(|e| MapError::Config(e.to_string()))
    }
}
