//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use sift_domain::{Record, Schema, ERROR_FIELD};
use sift_telemetry::ParsingPerformance;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a single recovered record.
    pub fn format_record(&self, record: &Record) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
            OutputFormat::Table => Ok(self.records_table(std::slice::from_ref(record))),
        }
    }

    /// Format a list of records.
    pub fn format_records(&self, records: &[Record]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(records)?),
            OutputFormat::Table => Ok(self.records_table(records)),
        }
    }

    /// Format the parsing performance report.
    pub fn format_performance(&self, performance: &ParsingPerformance) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(performance)?),
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Metric", "Value"]);
                builder.push_record(["Total requests".to_string(), performance.total_requests.to_string()]);
                builder.push_record([
                    "Direct JSON success".to_string(),
                    performance.direct_json_success_rate.clone(),
                ]);
                let usage = &performance.fallback_usage;
                builder.push_record(["Markdown fallback".to_string(), usage.markdown.to_string()]);
                builder.push_record(["Bracket fallback".to_string(), usage.bracket.to_string()]);
                builder.push_record(["Failed".to_string(), usage.failed.to_string()]);
                Ok(Self::render(builder))
            }
        }
    }

    /// Format the built-in schema listing.
    pub fn format_schemas(&self, schemas: &[(&str, Schema)]) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let listing: serde_json::Map<String, serde_json::Value> = schemas
                    .iter()
                    .map(|(key, schema)| Ok(((*key).to_string(), serde_json::to_value(schema)?)))
                    .collect::<Result<_>>()?;
                Ok(serde_json::to_string_pretty(&listing)?)
            }
            OutputFormat::Table => {
                let mut builder = Builder::default();
                builder.push_record(["Key", "Name", "Fields", "Index"]);
                for (key, schema) in schemas {
                    let fields: Vec<&str> = schema.fields().iter().map(|f| f.name.as_str()).collect();
                    builder.push_record([
                        (*key).to_string(),
                        schema.name.clone(),
                        fields.join(", "),
                        schema.index_field().unwrap_or("-").to_string(),
                    ]);
                }
                Ok(Self::render(builder))
            }
        }
    }

    /// Records as a table, one column per field in first-seen order.
    fn records_table(&self, records: &[Record]) -> String {
        if records.is_empty() {
            return self.colorize("No records recovered.", "yellow");
        }

        let mut columns: Vec<&str> = Vec::new();
        for record in records {
            for (name, _) in record.iter() {
                if !columns.contains(&name) {
                    columns.push(name);
                }
            }
        }

        let mut builder = Builder::default();
        builder.push_record(columns.iter().map(|c| c.to_string()));
        for record in records {
            builder.push_record(columns.iter().map(|column| {
                let cell = record.get(column).map(|v| v.to_string()).unwrap_or_default();
                if *column == ERROR_FIELD {
                    self.colorize(&cell, "red")
                } else {
                    cell
                }
            }));
        }

        Self::render(builder)
    }

    fn render(builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}
