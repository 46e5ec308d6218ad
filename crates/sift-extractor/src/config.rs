//! Configuration for the Extractor

use crate::error::ExtractorError;
use serde::{Deserialize, Serialize};

/// What to do when a confidence-style field is not numeric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoercionPolicy {
    /// Replace the value with the schema default (0.0 if the schema has none)
    #[default]
    UseDefault,
    /// Fail normalization; the pipeline returns an error record
    Reject,
}

/// Configuration for recovery and normalization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Characters of raw text quoted in a total-failure diagnostic
    pub error_preview_chars: usize,

    /// Field names clamped into [0.0, 1.0] instead of stringified
    pub confidence_fields: Vec<String>,

    /// Handling of non-numeric confidence values
    pub coercion_policy: CoercionPolicy,

    /// Fields logged and dropped from batch records before they reach callers
    pub strip_fields: Vec<String>,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ExtractorError> {
        if self.error_preview_chars == 0 {
            return Err(ExtractorError::Config(
                "error_preview_chars must be greater than 0".to_string(),
            ));
        }
        if self.confidence_fields.iter().any(|f| f.trim().is_empty()) {
            return Err(ExtractorError::Config(
                "confidence_fields must not contain empty names".to_string(),
            ));
        }
        if let Some(field) = self
            .strip_fields
            .iter()
            .find(|f| self.confidence_fields.contains(f))
        {
            return Err(ExtractorError::Config(format!(
                "'{}' cannot be both a confidence field and a stripped field",
                field
            )));
        }
        Ok(())
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            error_preview_chars: 200,
            confidence_fields: vec!["confidence_score".to_string()],
            coercion_policy: CoercionPolicy::UseDefault,
            strip_fields: vec!["processing_time_seconds".to_string()],
        }
    }
}

impl ExtractorConfig {
    /// Strict preset: non-numeric confidence values fail the record
    pub fn strict() -> Self {
        Self {
            coercion_policy: CoercionPolicy::Reject,
            ..Self::default()
        }
    }

    /// Lenient preset: tolerate bad confidence values, quote more raw text
    pub fn lenient() -> Self {
        Self {
            error_preview_chars: 1_000,
            coercion_policy: CoercionPolicy::UseDefault,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ExtractorError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| ExtractorError::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ExtractorError> {
        toml::to_string_pretty(self)
            .map_err(|e| ExtractorError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}
