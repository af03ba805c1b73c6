//! Turning raw model output into validated page records.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::error::ExtractionError;
use crate::record::{PageRecord, PageRecordValidator};

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*```[A-Za-z]*\s*\n?(.*?)\s*```\s*$").expect("valid fence regex")
});

/// Returns the first balanced JSON object in `response`, skipping any prose
/// or Markdown fence around it. Falls back to the trimmed input.
pub fn extract_json(response: &str) -> &str {
    let unfenced = CODE_FENCE
        .captures(response)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(response);

    let start = match unfenced.find('{') {
        Some(idx) => idx,
        None => return unfenced.trim(),
    };

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;
    let mut end = unfenced.len();

    for (i, c) in unfenced[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match c {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    end = start + i + 1;
                    break;
                }
            }
            _ => {}
        }
    }

    &unfenced[start..end]
}

/// Reusable parser holding the compiled page-record schema.
pub struct ResponseParser {
    validator: PageRecordValidator,
}

impl ResponseParser {
    pub fn new() -> Result<Self, ExtractionError> {
        Ok(Self {
            validator: PageRecordValidator::new()?,
        })
    }

    /// Parses the model's answer for page `page_index` of `doc_id`.
    ///
    /// `doc_id` and `page_index` are filled in when the model left them out.
    pub fn parse(
        &self,
        raw: &str,
        doc_id: &str,
        page_index: u32,
    ) -> Result<PageRecord, ExtractionError> {
        if raw.trim().is_empty() {
            return Err(ExtractionError::EmptyResponse);
        }

        let mut object: Map<String, Value> =
            serde_json::from_str(extract_json(raw)).map_err(|source| {
                ExtractionError::ParseResponse {
                    doc_id: doc_id.to_string(),
                    page_index,
                    source,
                }
            })?;

        object
            .entry("doc_id")
            .or_insert_with(|| Value::String(doc_id.to_string()));
        object
            .entry("page_index")
            .or_insert_with(|| Value::from(page_index));

        self.validator
            .check(&Value::Object(object))
            .map_err(|reason| ExtractionError::InvalidRecord {
                doc_id: doc_id.to_string(),
                page_index,
                reason,
            })
    }
}

/// One-shot form of [`ResponseParser::parse`].
pub fn parse_page_response(
    raw: &str,
    doc_id: &str,
    page_index: u32,
) -> Result<PageRecord, ExtractionError> {
    ResponseParser::new()?.parse(raw, doc_id, page_index)
}
