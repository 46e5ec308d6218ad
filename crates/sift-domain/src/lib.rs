//! Sift Domain Layer
//!
//! Core data model for recovering structured records from free-form model
//! output. Every other sift crate builds on the types defined here.
//!
//! ## Key Concepts
//!
//! - **FieldValue**: A single primitive value recovered from model output
//! - **Record**: An insertion-ordered mapping of field names to values
//! - **Schema**: The caller's contract of expected fields and their defaults
//! - **StrategyTag**: Which recovery strategy produced a record
//!
//! ## Record lifecycle
//!
//! ```text
//! raw text → RecoveredRecord → NormalizedRecord (or ErrorRecord)
//! ```
//!
//! Recovered and normalized records share the [`Record`] type. An error
//! record is any record carrying an [`ERROR_FIELD`] entry.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod record;
pub mod schema;
pub mod strategy;
pub mod value;

// Re-exports for convenience
pub use record::{Record, ERROR_FIELD};
pub use schema::{FieldDefault, Schema, SchemaBuilder, SchemaError, SchemaField};
pub use strategy::StrategyTag;
pub use value::FieldValue;
