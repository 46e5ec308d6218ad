//! Error types for the Extractor

use thiserror::Error;

/// Errors that can occur during recovery and normalization
///
/// None of these escape [`crate::ExtractionPipeline`]; the pipeline turns
/// them into error records.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Input text was empty, blank, or absent
    #[error("No response text to parse: input was empty or absent")]
    EmptyInput,

    /// Every recovery strategy missed
    #[error("Failed to parse model response with any strategy (direct, fenced, brace). Raw response: {preview}")]
    NoStructuredValue {
        /// Bounded prefix of the raw text
        preview: String,
    },

    /// A confidence-style field could not be read as a number
    #[error("Field '{field}' is not numeric (found {found})")]
    NotNumeric {
        /// Field name
        field: String,
        /// Type name of the offending value
        found: &'static str,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
