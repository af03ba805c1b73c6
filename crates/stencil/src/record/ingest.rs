//! Validation of raw per-page JSON at the engine's ingestion boundary.
//!
//! Each record is checked against the embedded page-record schema before it
//! is deserialized, so malformed LLM output is rejected with a message that
//! names the record instead of surfacing deep inside clustering.

use serde_json::Value;

use crate::error::IngestError;
use crate::record::PageRecord;

const PAGE_RECORD_SCHEMA: &str = include_str!("../../../../schema/page-record-v1.json");

pub struct PageRecordValidator {
    validator: jsonschema::Validator,
}

impl PageRecordValidator {
    pub fn new() -> Result<Self, IngestError> {
        let schema: Value =
            serde_json::from_str(PAGE_RECORD_SCHEMA).map_err(|e| IngestError::Schema {
                message: format!("Invalid embedded schema JSON: {}", e),
            })?;

        let validator = jsonschema::validator_for(&schema).map_err(|e| IngestError::Schema {
            message: format!("Failed to compile JSON schema: {}", e),
        })?;

        Ok(Self { validator })
    }

    /// Validates and converts the record at `index` of the input batch.
    pub fn validate(&self, index: usize, value: &Value) -> Result<PageRecord, IngestError> {
        self.check(value).map_err(|reason| IngestError::InvalidPageRecord {
            index,
            doc_id: value
                .get("doc_id")
                .and_then(Value::as_str)
                .map(str::to_string),
            reason,
        })
    }

    /// Validates and converts a single record, returning the joined schema
    /// violations on failure.
    pub fn check(&self, value: &Value) -> Result<PageRecord, String> {
        let errors: Vec<String> = self
            .validator
            .iter_errors(value)
            .map(|e| e.to_string())
            .collect();
        if !errors.is_empty() {
            return Err(errors.join("; "));
        }

        serde_json::from_value(value.clone()).map_err(|e| e.to_string())
    }
}

/// Validates a JSON array of page records.
pub fn parse_page_records(value: &Value) -> Result<Vec<PageRecord>, IngestError> {
    let items = value.as_array().ok_or_else(|| IngestError::NotAnArray {
        found: json_type_name(value).to_string(),
    })?;

    let validator = PageRecordValidator::new()?;
    items
        .iter()
        .enumerate()
        .map(|(index, item)| validator.validate(index, item))
        .collect()
}

pub fn parse_page_records_str(content: &str) -> Result<Vec<PageRecord>, IngestError> {
    let value: Value = serde_json::from_str(content)?;
    parse_page_records(&value)
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
