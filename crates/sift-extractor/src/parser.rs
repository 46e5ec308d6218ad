//! Recover structured values from free-form model output
//!
//! Three strategies run in strict priority order, stopping at the first that
//! yields a value of the wanted shape:
//!
//! 1. **Direct**: the whole trimmed text parses as JSON.
//! 2. **FencedBlock**: the inner span of the first triple-backtick fence
//!    (optionally language-tagged) parses as JSON.
//! 3. **BraceSpan**: the text from the first `{` to the last `}` parses as JSON.
//!
//! A miss in one strategy only moves on to the next. In particular a fence
//! whose content is invalid falls through to the brace span.
//!
//! The brace span is a heuristic, not a parser. It takes the first opening
//! and last closing delimiter independently, so it mis-extracts when the text
//! holds two separate objects or a stray brace in the surrounding prose.

use crate::error::ExtractorError;
use crate::types::{BatchEntry, Recovered, RecoveredBatch};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use sift_domain::{Record, StrategyTag};
use tracing::debug;

/// First code fence, with an optional (possibly space-led) language tag,
/// non-greedy across lines
static FENCE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```[ \t]*[\w+-]*\s*(.*?)```").expect("fence pattern is valid"));

/// Which delimiters the span strategy looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Span {
    /// First `{` to last `}`
    Brace,
    /// Bracket span when an array opens first, brace span otherwise
    Outer,
}

/// Layered recovery of structured records from raw text
///
/// Stateless apart from its settings; share freely between threads.
#[derive(Debug, Clone)]
pub struct StructuredExtractor {
    preview_chars: usize,
}

impl Default for StructuredExtractor {
    fn default() -> Self {
        Self { preview_chars: 200 }
    }
}

impl StructuredExtractor {
    /// Create an extractor quoting `preview_chars` of raw text on failure
    pub fn new(preview_chars: usize) -> Self {
        Self { preview_chars }
    }

    /// Recover a single keyed mapping
    pub fn extract(&self, text: &str) -> Result<Recovered, ExtractorError> {
        let (record, tag) = self.recover(text, Span::Brace, as_record)?;
        Ok(Recovered { record, tag })
    }

    /// Recover a sequence of records, or a single mapping as a batch of one
    ///
    /// The span strategy uses `[` … last `]` when the first `[` comes before
    /// the first `{`, and the brace span otherwise.
    pub fn extract_batch(&self, text: &str) -> Result<RecoveredBatch, ExtractorError> {
        let (entries, tag) = self.recover(text, Span::Outer, as_batch)?;
        Ok(RecoveredBatch { entries, tag })
    }

    fn recover<T>(
        &self,
        text: &str,
        span: Span,
        accept: impl Fn(Value) -> Result<T, String>,
    ) -> Result<(T, StrategyTag), ExtractorError> {
        let text = text.trim();
        debug!("Recovering structured value from {} chars", text.len());

        // Strategy 1: the whole text
        match parse_with(text, &accept) {
            Ok(value) => {
                debug!("Direct parse succeeded");
                return Ok((value, StrategyTag::Direct));
            }
            Err(reason) => debug!("Direct parse missed: {}", reason),
        }

        // Strategy 2: first code fence
        match fenced_span(text) {
            Some(inner) => match parse_with(inner.trim(), &accept) {
                Ok(value) => {
                    debug!("Fenced block parse succeeded ({} chars)", inner.len());
                    return Ok((value, StrategyTag::FencedBlock));
                }
                Err(reason) => debug!("Fenced block found but parse missed: {}", reason),
            },
            None => debug!("No code fence found"),
        }

        // Strategy 3: outermost delimiters
        let candidate = match span {
            Span::Brace => brace_span(text),
            Span::Outer => outer_span(text),
        };
        match candidate {
            Some(span) => match parse_with(span, &accept) {
                Ok(value) => {
                    debug!("Brace span parse succeeded ({} chars)", span.len());
                    return Ok((value, StrategyTag::BraceSpan));
                }
                Err(reason) => debug!("Brace span parse missed: {}", reason),
            },
            None => debug!("No brace span found"),
        }

        Err(ExtractorError::NoStructuredValue {
            preview: self.preview(text),
        })
    }

    fn preview(&self, text: &str) -> String {
        let mut chars = text.chars();
        let head: String = chars.by_ref().take(self.preview_chars).collect();
        if chars.next().is_some() {
            format!("{}...", head)
        } else {
            head
        }
    }
}

fn parse_with<T>(candidate: &str, accept: &impl Fn(Value) -> Result<T, String>) -> Result<T, String> {
    let value: Value = serde_json::from_str(candidate).map_err(|e| e.to_string())?;
    accept(value)
}

fn as_record(value: Value) -> Result<Record, String> {
    match value {
        Value::Object(object) => Ok(Record::from_json_object(object)),
        other => Err(format!("expected a record, found {}", json_type(&other))),
    }
}

fn as_batch(value: Value) -> Result<Vec<BatchEntry>, String> {
    match value {
        Value::Array(items) => Ok(items.into_iter().map(batch_entry).collect()),
        Value::Object(object) => Ok(vec![BatchEntry::Record(Record::from_json_object(object))]),
        other => Err(format!("expected a record or a list, found {}", json_type(&other))),
    }
}

fn batch_entry(value: Value) -> BatchEntry {
    match value {
        Value::Object(object) => BatchEntry::Record(Record::from_json_object(object)),
        other => BatchEntry::Malformed(json_type(&other)),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Inner span of the first code fence
fn fenced_span(text: &str) -> Option<&str> {
    FENCE_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// First `{` through last `}`, inclusive
fn brace_span(text: &str) -> Option<&str> {
    delimited_span(text, '{', '}')
}

/// Bracket span when an array opens first, otherwise the brace span
fn outer_span(text: &str) -> Option<&str> {
    match (text.find('['), text.find('{')) {
        (Some(bracket), Some(brace)) if bracket < brace => delimited_span(text, '[', ']'),
        (Some(_), None) => delimited_span(text, '[', ']'),
        _ => brace_span(text),
    }
}

fn delimited_span(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    (start < end).then(|| &text[start..=end])
}
