//! Configuration loading and management

use crate::core::{MaskError, MaskNode};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Header carrying the field mask when nothing else is configured
pub const DEFAULT_MASK_HEADER: &str = "x-fields";

/// How field masks are read from requests
///
/// ```yaml
/// header: x-fields
/// skip: false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskConfig {
    /// Request header holding the mask expression
    #[serde(default = "default_header")]
    pub header: String,

    /// Omit fields missing from the data instead of reporting them as null
    #[serde(default)]
    pub skip: bool,
}

fn default_header() -> String {
    DEFAULT_MASK_HEADER.to_string()
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            header: default_header(),
            skip: false,
        }
    }
}

impl MaskConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Parse a raw mask with the configured skip policy
    ///
    /// An absent or empty header means no mask at all, so every field passes
    /// through.
    pub fn parse_mask(&self, raw: Option<&str>) -> Result<Option<MaskNode>, MaskError> {
        match raw {
            Some(text) if !text.is_empty() => MaskNode::parse_with_skip(text, self.skip).map(Some),
            _ => Ok(None),
        }
    }
}
