//! Normalize recovered records against a schema
//!
//! Three passes, in order, over the recovered record:
//!
//! 1. Confidence clamping: confidence-style fields are coerced to a float and
//!    clamped into `[0.0, 1.0]`.
//! 2. Numeric-to-text coercion: every other integer or float becomes its
//!    canonical text form.
//! 3. Default injection: every schema field missing from the record is added
//!    with its default.
//!
//! Fields the schema does not declare are kept as they are.

use crate::config::{CoercionPolicy, ExtractorConfig};
use crate::error::ExtractorError;
use sift_domain::{FieldDefault, FieldValue, Record, Schema};
use tracing::debug;

/// Schema-driven record normalizer
#[derive(Debug, Clone)]
pub struct FieldNormalizer {
    confidence_fields: Vec<String>,
    policy: CoercionPolicy,
}

impl Default for FieldNormalizer {
    fn default() -> Self {
        Self::from_config(&ExtractorConfig::default())
    }
}

impl FieldNormalizer {
    /// Create a normalizer for the given confidence fields and policy
    pub fn new(confidence_fields: Vec<String>, policy: CoercionPolicy) -> Self {
        Self {
            confidence_fields,
            policy,
        }
    }

    /// Create a normalizer from extractor configuration
    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self::new(config.confidence_fields.clone(), config.coercion_policy)
    }

    /// Normalize a recovered record
    ///
    /// Only fails under [`CoercionPolicy::Reject`], when a confidence field
    /// holds a value that cannot be read as a finite number.
    pub fn normalize(&self, mut record: Record, schema: &Schema) -> Result<Record, ExtractorError> {
        self.clamp_confidence(&mut record, schema)?;
        self.stringify_numbers(&mut record);
        self.inject_defaults(&mut record, schema);
        Ok(record)
    }

    /// A schema-complete record holding only defaults
    pub fn defaults(&self, schema: &Schema) -> Record {
        let mut record = Record::new();
        self.inject_defaults(&mut record, schema);
        record
    }

    fn is_confidence(&self, name: &str) -> bool {
        self.confidence_fields.iter().any(|f| f == name)
    }

    fn clamp_confidence(&self, record: &mut Record, schema: &Schema) -> Result<(), ExtractorError> {
        for field in &self.confidence_fields {
            let Some(value) = record.get(field) else {
                continue;
            };

            let score = match (value.coerce_f64(), self.policy) {
                (Some(score), _) => score.clamp(0.0, 1.0),
                (None, CoercionPolicy::UseDefault) => {
                    debug!(
                        "Confidence field '{}' holds {}, using default",
                        field,
                        value.type_name()
                    );
                    schema
                        .default_for(field)
                        .and_then(FieldDefault::as_number)
                        .unwrap_or(0.0)
                }
                (None, CoercionPolicy::Reject) => {
                    return Err(ExtractorError::NotNumeric {
                        field: field.clone(),
                        found: value.type_name(),
                    });
                }
            };

            record.insert(field.as_str(), FieldValue::Float(score));
        }
        Ok(())
    }

    fn stringify_numbers(&self, record: &mut Record) {
        for (name, value) in record.iter_mut() {
            if self.is_confidence(name) {
                continue;
            }
            if let Some(text) = value.numeric_text() {
                *value = FieldValue::Text(text);
            }
        }
    }

    fn inject_defaults(&self, record: &mut Record, schema: &Schema) {
        for field in schema.fields() {
            if record.contains(&field.name) {
                continue;
            }
            let mut value = field.default.to_value();
            // Keeps non-confidence fields textual
            if !self.is_confidence(&field.name) {
                if let Some(text) = value.numeric_text() {
                    value = FieldValue::Text(text);
                }
            }
            record.insert(field.name.as_str(), value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn recovered(value: serde_json::Value) -> Record {
        match value {
            serde_json::Value::Object(object) => Record::from_json_object(object),
            other => panic!("expected object, got {}", other),
        }
    }

    fn schema() -> Schema {
        Schema::builder("test")
            .text("utr_number", "")
            .text("amount", "")
            .number("confidence_score", 0.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_clamp_above_one() {
        let record = recovered(json!({"confidence_score": 1.7}));
        let normalized = FieldNormalizer::default().normalize(record, &schema()).unwrap();
        assert_eq!(normalized.get("confidence_score"), Some(&FieldValue::Float(1.0)));
    }

    #[test]
    fn test_clamp_below_zero() {
        let record = recovered(json!({"confidence_score": -0.3}));
        let normalized = FieldNormalizer::default().normalize(record, &schema()).unwrap();
        assert_eq!(normalized.get("confidence_score"), Some(&FieldValue::Float(0.0)));
    }

    #[test]
    fn test_in_range_confidence_passes_through() {
        let record = recovered(json!({"confidence_score": 0.42}));
        let normalized = FieldNormalizer::default().normalize(record, &schema()).unwrap();
        assert_eq!(normalized.get("confidence_score"), Some(&FieldValue::Float(0.42)));
    }

    #[test]
    fn test_integer_and_text_confidence_become_float() {
        let normalizer = FieldNormalizer::default();

        let record = recovered(json!({"confidence_score": 1}));
        let normalized = normalizer.normalize(record, &schema()).unwrap();
        assert_eq!(normalized.get("confidence_score"), Some(&FieldValue::Float(1.0)));

        let record = recovered(json!({"confidence_score": "0.8"}));
        let normalized = normalizer.normalize(record, &schema()).unwrap();
        assert_eq!(normalized.get("confidence_score"), Some(&FieldValue::Float(0.8)));
    }

    #[test]
    fn test_uncoercible_confidence_uses_default() {
        let schema = Schema::builder("custom default")
            .number("confidence_score", 0.25)
            .build()
            .unwrap();
        let record = recovered(json!({"confidence_score": "high"}));
        let normalized = FieldNormalizer::default().normalize(record, &schema).unwrap();
        assert_eq!(normalized.get("confidence_score"), Some(&FieldValue::Float(0.25)));
    }

    #[test]
    fn test_uncoercible_confidence_without_numeric_default_is_zero() {
        let schema = Schema::builder("no confidence").text("utr_number", "").build().unwrap();
        let record = recovered(json!({"confidence_score": null}));
        let normalized = FieldNormalizer::default().normalize(record, &schema).unwrap();
        assert_eq!(normalized.get("confidence_score"), Some(&FieldValue::Float(0.0)));
    }

    #[test]
    fn test_uncoercible_confidence_rejected() {
        let normalizer = FieldNormalizer::new(
            vec!["confidence_score".to_string()],
            CoercionPolicy::Reject,
        );
        let record = recovered(json!({"confidence_score": "very sure"}));
        match normalizer.normalize(record, &schema()) {
            Err(ExtractorError::NotNumeric { field, found }) => {
                assert_eq!(field, "confidence_score");
                assert_eq!(found, "text");
            }
            other => panic!("expected NotNumeric, got {:?}", other),
        }
    }

    #[test]
    fn test_numeric_fields_become_text() {
        let record = recovered(json!({"utr_number": 12345, "amount": 5000.0}));
        let normalized = FieldNormalizer::default().normalize(record, &schema()).unwrap();
        assert_eq!(normalized.get_text("utr_number"), Some("12345"));
        assert_eq!(normalized.get_text("amount"), Some("5000.0"));
    }

    #[test]
    fn test_undeclared_numbers_become_text_and_others_pass_through() {
        let record = recovered(json!({"page": 3, "verified": true, "extra": null, "rows": [1, 2]}));
        let normalized = FieldNormalizer::default().normalize(record, &schema()).unwrap();
        assert_eq!(normalized.get_text("page"), Some("3"));
        assert_eq!(normalized.get("verified"), Some(&FieldValue::Bool(true)));
        assert_eq!(normalized.get("extra"), Some(&FieldValue::Null));
        assert_eq!(normalized.get("rows"), Some(&FieldValue::Composite(json!([1, 2]))));
    }

    #[test]
    fn test_defaults_injected() {
        let record = recovered(json!({"utr_number": "ABC123"}));
        let normalized = FieldNormalizer::default().normalize(record, &schema()).unwrap();

        let expected = recovered(json!({
            "utr_number": "ABC123",
            "amount": "",
            "confidence_score": 0.0
        }));
        assert_eq!(normalized, expected);
    }

    #[test]
    fn test_numeric_default_on_plain_field_is_text() {
        let schema = Schema::builder("page numbers").number("page", 1.0).build().unwrap();
        let normalized = FieldNormalizer::default().normalize(Record::new(), &schema).unwrap();
        assert_eq!(normalized.get_text("page"), Some("1.0"));
    }

    #[test]
    fn test_custom_confidence_fields() {
        let normalizer = FieldNormalizer::new(
            vec!["match_score".to_string()],
            CoercionPolicy::UseDefault,
        );
        let record = recovered(json!({"match_score": 3, "confidence_score": 0.5}));
        let normalized = normalizer.normalize(record, &schema()).unwrap();
        assert_eq!(normalized.get("match_score"), Some(&FieldValue::Float(1.0)));
        // Not designated here, so treated like any other number
        assert_eq!(normalized.get_text("confidence_score"), Some("0.5"));
    }

    #[test]
    fn test_defaults_record() {
        let defaults = FieldNormalizer::default().defaults(&Schema::upi_transaction());
        assert_eq!(defaults.len(), 5);
        assert_eq!(defaults.get("confidence_score"), Some(&FieldValue::Float(0.0)));
        assert_eq!(defaults.get_text("utr_number"), Some(""));
        assert!(!defaults.is_error());
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let normalizer = FieldNormalizer::default();
        let record = recovered(json!({
            "utr_number": 998877665544u64,
            "confidence_score": 7,
            "extraction_notes": "blurry"
        }));
        let once = normalizer.normalize(record, &Schema::upi_transaction()).unwrap();
        let twice = normalizer.normalize(once.clone(), &Schema::upi_transaction()).unwrap();
        assert_eq!(once, twice);
    }

    fn arb_value() -> impl Strategy<Value = serde_json::Value> {
        prop_oneof![
            any::<i64>().prop_map(serde_json::Value::from),
            (-10.0f64..10.0).prop_map(serde_json::Value::from),
            "[a-z0-9 .]{0,12}".prop_map(serde_json::Value::from),
            any::<bool>().prop_map(serde_json::Value::from),
            Just(serde_json::Value::Null),
        ]
    }

    proptest! {
        #[test]
        fn prop_confidence_always_in_range(score in -100.0f64..100.0) {
            let record = recovered(json!({"confidence_score": score}));
            let normalized = FieldNormalizer::default().normalize(record, &schema()).unwrap();
            let value = normalized.get("confidence_score").and_then(FieldValue::as_float).unwrap();
            prop_assert!((0.0..=1.0).contains(&value));
        }

        #[test]
        fn prop_normalize_twice_is_normalize_once(
            fields in proptest::collection::btree_map(
                prop_oneof![
                    Just("utr_number".to_string()),
                    Just("amount".to_string()),
                    Just("confidence_score".to_string()),
                    "[a-z]{1,8}",
                ],
                arb_value(),
                0..6,
            )
        ) {
            let object: serde_json::Map<String, serde_json::Value> = fields.into_iter().collect();
            let normalizer = FieldNormalizer::default();
            let once = normalizer.normalize(Record::from_json_object(object), &schema()).unwrap();
            let twice = normalizer.normalize(once.clone(), &schema()).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_output_is_schema_complete(
            fields in proptest::collection::btree_map("[a-z_]{1,10}", arb_value(), 0..6)
        ) {
            let object: serde_json::Map<String, serde_json::Value> = fields.into_iter().collect();
            let normalized = FieldNormalizer::default()
                .normalize(Record::from_json_object(object), &Schema::upi_transaction())
                .unwrap();
            for field in Schema::upi_transaction().fields() {
                prop_assert!(normalized.contains(&field.name));
            }
        }
    }
}
