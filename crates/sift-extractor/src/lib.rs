//! Sift Extractor
//!
//! Recovers structured records from free-form model output and normalizes
//! them against a caller-supplied schema.
//!
//! # Overview
//!
//! A generative model asked for JSON may return clean JSON, JSON inside a
//! markdown fence, JSON wrapped in explanatory prose, or nothing usable.
//! The extractor tries progressively looser recovery strategies, normalizes
//! whatever it finds into a schema-complete record, and reports which
//! strategy worked to a shared telemetry handle.
//!
//! # Architecture
//!
//! ```text
//! raw text → StructuredExtractor → FieldNormalizer → Record
//!                    │                                  ↑
//!                    └── total failure ──→ error record ┘
//!                 (ExtractionTelemetry updated at every exit)
//! ```
//!
//! # Example Usage
//!
//! ```
//! use std::sync::Arc;
//! use sift_domain::Schema;
//! use sift_extractor::{ExtractionPipeline, ExtractorConfig};
//! use sift_telemetry::ExtractionTelemetry;
//!
//! let telemetry = Arc::new(ExtractionTelemetry::new());
//! let pipeline = ExtractionPipeline::new(ExtractorConfig::default(), telemetry.clone());
//!
//! let response = "Sure! Here is the data:\n{\"utr_number\": 412345678901, \"confidence_score\": 1.3}";
//! let record = pipeline.run(response, &Schema::upi_transaction());
//!
//! assert!(!record.is_error());
//! assert_eq!(record.get_text("utr_number"), Some("412345678901"));
//! assert_eq!(record.get_text("amount"), Some(""));
//! assert_eq!(telemetry.snapshot().brace, 1);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod normalizer;
mod parser;
mod types;


pub use config::{CoercionPolicy, ExtractorConfig};
pub use error::ExtractorError;
pub use extractor::ExtractionPipeline;
pub use normalizer::FieldNormalizer;
pub use parser::StructuredExtractor;
pub use types::{BatchEntry, Recovered, RecoveredBatch};
