//! Result types for recovery

use sift_domain::{Record, StrategyTag};

/// A record recovered from raw text, before normalization
#[derive(Debug, Clone, PartialEq)]
pub struct Recovered {
    /// Recovered fields
    pub record: Record,

    /// Strategy that produced the record
    pub tag: StrategyTag,
}

/// One element of a recovered batch
#[derive(Debug, Clone, PartialEq)]
pub enum BatchEntry {
    /// A keyed mapping
    Record(Record),

    /// Anything else; carries the JSON type that was found
    Malformed(&'static str),
}

/// Records recovered from a batch response, before normalization
#[derive(Debug, Clone, PartialEq)]
pub struct RecoveredBatch {
    /// Elements in response order
    pub entries: Vec<BatchEntry>,

    /// Strategy that produced the batch
    pub tag: StrategyTag,
}
