//! Parser configuration options

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// What to do when a segment fails conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionErrorPolicy {
    /// Propagate the error out of `parse` (default)
    #[default]
    Abort,
    /// Log a warning, drop the segment and continue
    SkipSegment,
}

/// Configuration for parsing interchanges
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Stop after this many segments (default: unlimited)
    pub max_lines_to_parse: Option<usize>,
    /// Handling of segment conversion failures (default: abort)
    pub on_conversion_error: ConversionErrorPolicy,
    /// Check UNB/UNZ and UNH/UNT consistency after parsing (default: false)
    pub validate_envelopes: bool,
}

impl ParserConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the number of segments parsed
    pub fn max_lines_to_parse(mut self, max_lines_to_parse: usize) -> Self {
        self.max_lines_to_parse = Some(max_lines_to_parse);
        self
    }

    /// Set the conversion error policy
    pub fn on_conversion_error(mut self, policy: ConversionErrorPolicy) -> Self {
        self.on_conversion_error = policy;
        self
    }

    /// Enable or disable envelope validation
    pub fn validate_envelopes(mut self, validate: bool) -> Self {
        self.validate_envelopes = validate;
        self
    }

    /// Load a configuration from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::Config(format!("Invalid parser config: {e}")))
    }

    /// Load a configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Cannot read config '{}': {e}", path.display()))
        })?;
        let config = Self::from_yaml_str(&content)?;
        debug!(path = %path.display(), ?config, "loaded parser config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ParserConfig::new();
        assert_eq!(config.max_lines_to_parse, None);
        assert_eq!(config.on_conversion_error, ConversionErrorPolicy::Abort);
        assert!(!config.validate_envelopes);
    }

    #[test]
    fn test_builder() {
        let config = ParserConfig::new()
            .max_lines_to_parse(10)
            .on_conversion_error(ConversionErrorPolicy::SkipSegment)
            .validate_envelopes(true);
        assert_eq!(config.max_lines_to_parse, Some(10));
        assert_eq!(config.on_conversion_error, ConversionErrorPolicy::SkipSegment);
        assert!(config.validate_envelopes);
    }

    #[test]
    fn test_from_yaml_partial() {
        let config = ParserConfig::from_yaml_str("on_conversion_error: skip_segment\n").unwrap();
        assert_eq!(config.on_conversion_error, ConversionErrorPolicy::SkipSegment);
        assert_eq!(config.max_lines_to_parse, None);
    }

    #[test]
    fn test_from_yaml_full() {
        let yaml = "max_lines_to_parse: 25\non_conversion_error: abort\nvalidate_envelopes: true\n";
        let config = ParserConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.max_lines_to_parse, Some(25));
        assert!(config.validate_envelopes);
    }

    #[test]
    fn test_from_yaml_invalid() {
        let err = ParserConfig::from_yaml_str("on_conversion_error: retry\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_from_missing_file() {
        let err = ParserConfig::from_file("/nonexistent/parser.yaml").unwrap_err();
        assert!(err.to_string().contains("Cannot read config"));
    }
}
