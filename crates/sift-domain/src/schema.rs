//! Schemas - expected fields and their defaults for one record type

use crate::value::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Errors raised while building or loading a schema
#[derive(Error, Debug)]
pub enum SchemaError {
    /// Two fields share a name
    #[error("Duplicate field '{0}' in schema")]
    DuplicateField(String),

    /// A field has an empty name
    #[error("Schema field names must not be empty")]
    EmptyFieldName,

    /// The schema declares no fields
    #[error("Schema '{0}' declares no fields")]
    NoFields(String),

    /// A role (index or notes) names a field the schema does not declare
    #[error("{role} field '{name}' is not declared in the schema")]
    UndeclaredRole {
        /// Which role
        role: &'static str,
        /// The missing field name
        name: String,
    },

    /// TOML parsing error
    #[error("Failed to parse schema TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Default value injected when a field is absent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldDefault {
    /// Text default (usually the empty string)
    Text(String),
    /// Numeric default (usually a confidence of `0.0`)
    Number(f64),
}

impl FieldDefault {
    /// The numeric default, if this is one
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldDefault::Number(n) => Some(*n),
            FieldDefault::Text(_) => None,
        }
    }

    /// The default as a field value
    pub fn to_value(&self) -> FieldValue {
        match self {
            FieldDefault::Text(s) => FieldValue::Text(s.clone()),
            FieldDefault::Number(n) => FieldValue::Float(*n),
        }
    }
}

/// One declared field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    /// Field name
    pub name: String,
    /// Value injected when the model omits the field
    pub default: FieldDefault,
}

/// Expected field names and defaults for one record type
///
/// Field order is preserved and drives the order of injected defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Human-readable record type, used as log context
    pub name: String,

    fields: Vec<SchemaField>,

    /// Field holding the 1-based position of a record inside a batch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    index_field: Option<String>,

    /// Free-text notes field, used for padding diagnostics in batches
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes_field: Option<String>,
}

impl Schema {
    /// Start building a schema
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
            index_field: None,
            notes_field: None,
        }
    }

    /// Single-transaction payment screenshot
    pub fn upi_transaction() -> Self {
        Self::transaction_fields("UPI extraction", None)
    }

    /// Bank statement matched against one known transaction
    pub fn bank_statement() -> Self {
        Self::transaction_fields("Bank statement", None)
    }

    /// Bank statement matched against many tenants at once
    ///
    /// Each element of the batch carries a `tenant_id` holding its position.
    pub fn bank_statement_match() -> Self {
        Self::transaction_fields("Multi-tenant bank statement", Some("tenant_id"))
    }

    fn transaction_fields(name: &str, index_field: Option<&str>) -> Self {
        let mut fields = Vec::new();
        if let Some(index) = index_field {
            fields.push(text_field(index));
        }
        fields.push(text_field("utr_number"));
        fields.push(text_field("amount"));
        fields.push(text_field("date"));
        fields.push(SchemaField {
            name: "confidence_score".to_string(),
            default: FieldDefault::Number(0.0),
        });
        fields.push(text_field("extraction_notes"));

        Self {
            name: name.to_string(),
            fields,
            index_field: index_field.map(str::to_string),
            notes_field: Some("extraction_notes".to_string()),
        }
    }

    /// Load a schema from TOML
    ///
    /// ```toml
    /// name = "Invoice"
    /// notes_field = "notes"
    ///
    /// [[fields]]
    /// name = "invoice_id"
    /// default = ""
    ///
    /// [[fields]]
    /// name = "confidence_score"
    /// default = 0.0
    ///
    /// [[fields]]
    /// name = "notes"
    /// default = ""
    /// ```
    pub fn from_toml(toml_str: &str) -> Result<Self, SchemaError> {
        let schema: Schema = toml::from_str(toml_str)?;
        schema.validate()?;
        Ok(schema)
    }

    /// Check field-name uniqueness and role references
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.fields.is_empty() {
            return Err(SchemaError::NoFields(self.name.clone()));
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(SchemaError::EmptyFieldName);
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
        }

        for (role, name) in [("Index", &self.index_field), ("Notes", &self.notes_field)] {
            if let Some(name) = name {
                if !seen.contains(name.as_str()) {
                    return Err(SchemaError::UndeclaredRole {
                        role,
                        name: name.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Declared fields in order
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    /// Default for a declared field
    pub fn default_for(&self, name: &str) -> Option<&FieldDefault> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.default)
    }

    /// Batch position field, if any
    pub fn index_field(&self) -> Option<&str> {
        self.index_field.as_deref()
    }

    /// Notes field, if any
    pub fn notes_field(&self) -> Option<&str> {
        self.notes_field.as_deref()
    }
}

fn text_field(name: &str) -> SchemaField {
    SchemaField {
        name: name.to_string(),
        default: FieldDefault::Text(String::new()),
    }
}

/// Builder for custom schemas
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<SchemaField>,
    index_field: Option<String>,
    notes_field: Option<String>,
}

impl SchemaBuilder {
    /// Declare a text field
    pub fn text(mut self, name: impl Into<String>, default: impl Into<String>) -> Self {
        self.fields.push(SchemaField {
            name: name.into(),
            default: FieldDefault::Text(default.into()),
        });
        self
    }

    /// Declare a numeric field
    pub fn number(mut self, name: impl Into<String>, default: f64) -> Self {
        self.fields.push(SchemaField {
            name: name.into(),
            default: FieldDefault::Number(default),
        });
        self
    }

    /// Mark a declared field as the batch position field
    pub fn index_field(mut self, name: impl Into<String>) -> Self {
        self.index_field = Some(name.into());
        self
    }

    /// Mark a declared field as the notes field
    pub fn notes_field(mut self, name: impl Into<String>) -> Self {
        self.notes_field = Some(name.into());
        self
    }

    /// Validate and build the schema
    pub fn build(self) -> Result<Schema, SchemaError> {
        let schema = Schema {
            name: self.name,
            fields: self.fields,
            index_field: self.index_field,
            notes_field: self.notes_field,
        };
        schema.validate()?;
        Ok(schema)
    }
}
