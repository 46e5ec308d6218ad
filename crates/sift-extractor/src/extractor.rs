//! Extraction pipeline: recover, normalize, record telemetry

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::normalizer::FieldNormalizer;
use crate::parser::StructuredExtractor;
use crate::types::BatchEntry;
use sift_domain::{Record, Schema, StrategyTag, ERROR_FIELD};
use sift_telemetry::ExtractionTelemetry;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Recovers normalized records from raw model output
///
/// Every `run*` call returns records, never errors: failures come back as
/// error records carrying an [`ERROR_FIELD`] diagnostic with every schema
/// field at its default. Each call records exactly one strategy tag in the
/// shared telemetry.
pub struct ExtractionPipeline {
    extractor: StructuredExtractor,
    normalizer: FieldNormalizer,
    telemetry: Arc<ExtractionTelemetry>,
    config: ExtractorConfig,
}

impl ExtractionPipeline {
    /// Create a new pipeline sharing the given telemetry
    pub fn new(config: ExtractorConfig, telemetry: Arc<ExtractionTelemetry>) -> Self {
        Self {
            extractor: StructuredExtractor::new(config.error_preview_chars),
            normalizer: FieldNormalizer::from_config(&config),
            telemetry,
            config,
        }
    }

    /// Create a pipeline with default configuration
    pub fn with_telemetry(telemetry: Arc<ExtractionTelemetry>) -> Self {
        Self::new(ExtractorConfig::default(), telemetry)
    }

    /// Telemetry handle shared by this pipeline
    pub fn telemetry(&self) -> &Arc<ExtractionTelemetry> {
        &self.telemetry
    }

    /// Configuration in use
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Recover one record from raw text
    pub fn run(&self, text: &str, schema: &Schema) -> Record {
        self.run_maybe(Some(text), schema)
    }

    /// Recover one record from text that may be absent
    pub fn run_maybe(&self, text: Option<&str>, schema: &Schema) -> Record {
        let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
            warn!("{}: empty response, skipping recovery", schema.name);
            self.telemetry.record(StrategyTag::None);
            return self.error_record(schema, &ExtractorError::EmptyInput);
        };

        debug!("{}: recovering record from {} chars", schema.name, text.len());

        let recovered = match self.extractor.extract(text) {
            Ok(recovered) => recovered,
            Err(e) => {
                warn!("{}: all recovery strategies failed", schema.name);
                self.telemetry.record(StrategyTag::None);
                return self.error_record(schema, &e);
            }
        };

        // Structural recovery succeeded even if normalization rejects a field
        self.telemetry.record(recovered.tag);
        info!("{}: recovered record via {}", schema.name, recovered.tag);

        match self.normalizer.normalize(recovered.record, schema) {
            Ok(record) => record,
            Err(e) => {
                warn!("{}: normalization rejected record: {}", schema.name, e);
                self.error_record(schema, &e)
            }
        }
    }

    /// Recover one record per expected batch slot
    ///
    /// The response may be a sequence of records or a single record. Results
    /// keep response order; the schema's index field defaults to the 1-based
    /// position and short results are padded up to `expected`. On failure
    /// every slot (at least one) holds the same error record.
    pub fn run_batch(&self, text: &str, schema: &Schema, expected: usize) -> Vec<Record> {
        let slots = expected.max(1);

        if text.trim().is_empty() {
            warn!("{}: empty batch response, skipping recovery", schema.name);
            self.telemetry.record(StrategyTag::None);
            return self.error_slots(schema, &ExtractorError::EmptyInput, slots);
        }

        let batch = match self.extractor.extract_batch(text) {
            Ok(batch) => batch,
            Err(e) => {
                warn!("{}: all recovery strategies failed for batch", schema.name);
                self.telemetry.record(StrategyTag::None);
                return self.error_slots(schema, &e, slots);
            }
        };

        self.telemetry.record(batch.tag);
        info!(
            "{}: recovered {} batch entries via {} (expected {})",
            schema.name,
            batch.entries.len(),
            batch.tag,
            expected
        );

        let mut results: Vec<Record> = batch
            .entries
            .into_iter()
            .enumerate()
            .map(|(idx, entry)| self.normalize_entry(entry, idx + 1, schema))
            .collect();

        while results.len() < expected {
            let position = results.len() + 1;
            results.push(self.padding_record(schema, position));
        }

        debug!("{}: returning {} batch records", schema.name, results.len());
        results
    }

    fn normalize_entry(&self, entry: BatchEntry, position: usize, schema: &Schema) -> Record {
        let mut record = match entry {
            BatchEntry::Record(record) => record,
            BatchEntry::Malformed(found) => {
                warn!("{}: batch entry {} is {}, not an object", schema.name, position, found);
                let mut error = self.defaults_at(schema, position);
                error.insert(
                    ERROR_FIELD,
                    format!("Invalid batch entry {}: expected object, found {}", position, found),
                );
                return error;
            }
        };

        for field in &self.config.strip_fields {
            if let Some(value) = record.remove(field) {
                debug!("{}: entry {} {} = {}", schema.name, position, field, value);
            }
        }

        if let Some(index) = schema.index_field() {
            if !record.contains(index) {
                record.insert(index, position.to_string());
            }
        }

        match self.normalizer.normalize(record, schema) {
            Ok(record) => record,
            Err(e) => {
                warn!("{}: batch entry {} rejected: {}", schema.name, position, e);
                let mut error = self.defaults_at(schema, position);
                error.insert(ERROR_FIELD, e.to_string());
                error
            }
        }
    }

    fn padding_record(&self, schema: &Schema, position: usize) -> Record {
        let mut record = self.defaults_at(schema, position);
        if let Some(notes) = schema.notes_field() {
            record.insert(notes, format!("No match found for tenant {}", position));
        }
        record
    }

    fn defaults_at(&self, schema: &Schema, position: usize) -> Record {
        let mut record = self.normalizer.defaults(schema);
        if let Some(index) = schema.index_field() {
            record.insert(index, position.to_string());
        }
        record
    }

    fn error_record(&self, schema: &Schema, error: &ExtractorError) -> Record {
        let mut record = self.normalizer.defaults(schema);
        record.insert(ERROR_FIELD, error.to_string());
        record
    }

    fn error_slots(&self, schema: &Schema, error: &ExtractorError, slots: usize) -> Vec<Record> {
        vec![self.error_record(schema, error); slots]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sift_domain::FieldValue;

    fn pipeline() -> ExtractionPipeline {
        ExtractionPipeline::with_telemetry(Arc::new(ExtractionTelemetry::new()))
    }

    #[test]
    fn test_run_direct() {
        let pipeline = pipeline();
        let record = pipeline.run(
            r#"{"utr_number": 123456789012, "amount": "500", "confidence_score": 0.9}"#,
            &Schema::upi_transaction(),
        );
        assert!(!record.is_error());
        assert_eq!(record.get_text("utr_number"), Some("123456789012"));
        assert_eq!(record.get_text("date"), Some(""));
        assert_eq!(pipeline.telemetry().snapshot().direct, 1);
    }

    #[test]
    fn test_run_absent_input() {
        let pipeline = pipeline();
        let record = pipeline.run_maybe(None, &Schema::upi_transaction());
        assert!(record.error().unwrap().contains("empty or absent"));
        assert_eq!(record.get("confidence_score"), Some(&FieldValue::Float(0.0)));

        let snapshot = pipeline.telemetry().snapshot();
        assert_eq!(snapshot.failed, 1);
        assert_eq!(snapshot.successes(), 0);
    }

    #[test]
    fn test_run_blank_input() {
        let pipeline = pipeline();
        let record = pipeline.run("  \n\t ", &Schema::bank_statement());
        assert!(record.is_error());
        assert_eq!(pipeline.telemetry().snapshot().failed, 1);
    }

    #[test]
    fn test_error_record_has_defaults() {
        let pipeline = pipeline();
        let record = pipeline.run("the model said nothing useful", &Schema::upi_transaction());
        let error = record.error().unwrap();
        assert!(error.contains("Raw response: the model said nothing useful"));
        for field in Schema::upi_transaction().fields() {
            assert_eq!(record.get(&field.name), Some(&field.default.to_value()));
        }
    }

    #[test]
    fn test_rejected_confidence_counts_strategy() {
        let pipeline = ExtractionPipeline::new(
            ExtractorConfig::strict(),
            Arc::new(ExtractionTelemetry::new()),
        );
        let record = pipeline.run(
            r#"{"utr_number": "X", "confidence_score": "certain"}"#,
            &Schema::upi_transaction(),
        );
        assert_eq!(
            record.error(),
            Some("Field 'confidence_score' is not numeric (found text)")
        );
        assert_eq!(record.get_text("utr_number"), Some(""));
        assert_eq!(pipeline.telemetry().snapshot().direct, 1);
    }

    #[test]
    fn test_batch_index_and_strip() {
        let pipeline = pipeline();
        let response = r#"[
            {"utr_number": "111", "confidence_score": 0.9, "processing_time_seconds": "1.2"},
            {"tenant_id": 7, "utr_number": "222", "confidence_score": 1.5}
        ]"#;
        let records = pipeline.run_batch(response, &Schema::bank_statement_match(), 2);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get_text("tenant_id"), Some("1"));
        assert!(!records[0].contains("processing_time_seconds"));
        assert_eq!(records[1].get_text("tenant_id"), Some("7"));
        assert_eq!(records[1].get("confidence_score"), Some(&FieldValue::Float(1.0)));
    }

    #[test]
    fn test_batch_padding() {
        let pipeline = pipeline();
        let records = pipeline.run_batch(
            r#"{"utr_number": "111"}"#,
            &Schema::bank_statement_match(),
            3,
        );
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].get_text("utr_number"), Some("111"));
        assert_eq!(records[2].get_text("tenant_id"), Some("3"));
        assert_eq!(
            records[2].get_text("extraction_notes"),
            Some("No match found for tenant 3")
        );
        assert!(!records[2].is_error());
    }

    #[test]
    fn test_batch_total_failure_fills_slots() {
        let pipeline = pipeline();
        let records = pipeline.run_batch("no data", &Schema::bank_statement_match(), 4);
        assert_eq!(records.len(), 4);
        assert!(records.iter().all(Record::is_error));
        assert_eq!(pipeline.telemetry().snapshot().failed, 1);
        assert_eq!(pipeline.telemetry().snapshot().total, 1);
    }

    #[test]
    fn test_batch_with_zero_expected() {
        let pipeline = pipeline();
        assert_eq!(pipeline.run_batch("", &Schema::bank_statement_match(), 0).len(), 1);
        assert_eq!(
            pipeline
                .run_batch(r#"[{"utr_number": "1"}]"#, &Schema::bank_statement_match(), 0)
                .len(),
            1
        );
    }

    #[test]
    fn test_batch_malformed_entry_is_slot_error() {
        let pipeline = pipeline();
        let records = pipeline.run_batch(
            r#"[{"utr_number": "1"}, 42]"#,
            &Schema::bank_statement_match(),
            2,
        );
        assert!(!records[0].is_error());
        assert_eq!(
            records[1].error(),
            Some("Invalid batch entry 2: expected object, found number")
        );
        assert_eq!(records[1].get_text("tenant_id"), Some("2"));
    }
}
