//! Typed view of one element extracted from a page by the LLM layer.
//!
//! The wire shape is loose (every field optional, payloads side by side);
//! [`DetectedElement`] coerces it into a single structured payload so the
//! inference code never has to guess which field is populated.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Personally identifiable information carried by an element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PiiType {
    #[default]
    None,
    OrgName,
    PersonName,
    Email,
    Phone,
    Address,
    Url,
    Date,
    /// Token outside the known set, kept verbatim.
    Other(String),
}

impl PiiType {
    pub fn as_str(&self) -> &str {
        match self {
            PiiType::None => "NONE",
            PiiType::OrgName => "ORG_NAME",
            PiiType::PersonName => "PERSON_NAME",
            PiiType::Email => "EMAIL",
            PiiType::Phone => "PHONE",
            PiiType::Address => "ADDRESS",
            PiiType::Url => "URL",
            PiiType::Date => "DATE",
            PiiType::Other(token) => token,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, PiiType::None)
    }
}

impl From<String> for PiiType {
    fn from(value: String) -> Self {
        PiiType::from(value.as_str())
    }
}

impl From<&str> for PiiType {
    fn from(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.to_ascii_uppercase().as_str() {
            "" | "NONE" => PiiType::None,
            "ORG_NAME" => PiiType::OrgName,
            "PERSON_NAME" => PiiType::PersonName,
            "EMAIL" => PiiType::Email,
            "PHONE" => PiiType::Phone,
            "ADDRESS" => PiiType::Address,
            "URL" => PiiType::Url,
            "DATE" => PiiType::Date,
            _ => PiiType::Other(trimmed.to_string()),
        }
    }
}

impl From<PiiType> for String {
    fn from(value: PiiType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for PiiType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TablePayload {
    #[serde(deserialize_with = "lenient::string_list")]
    pub headers: Vec<String>,
    #[serde(deserialize_with = "lenient::string_rows")]
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataPoint {
    #[serde(deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub value: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string"
    )]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartPayload {
    #[serde(deserialize_with = "lenient::string")]
    pub chart_type: String,
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    pub data: Vec<DataPoint>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient::opt_string")]
    pub source: Option<String>,
    /// Fields outside the documented shape (e.g. `labels`/`values`).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FigurePayload {
    #[serde(deserialize_with = "lenient::string")]
    pub figure_type: String,
    #[serde(deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(deserialize_with = "lenient::string")]
    pub description: String,
    pub elements: Vec<DataPoint>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The single structured payload an element carries besides its free text.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ElementContent {
    #[default]
    Plain,
    List(Vec<String>),
    Table(TablePayload),
    Chart(ChartPayload),
    Figure(FigurePayload),
}

impl ElementContent {
    pub fn kind(&self) -> &'static str {
        match self {
            ElementContent::Plain => "plain",
            ElementContent::List(_) => "list",
            ElementContent::Table(_) => "table",
            ElementContent::Chart(_) => "chart",
            ElementContent::Figure(_) => "figure",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawElement", into = "RawElement")]
pub struct DetectedElement {
    pub element_type: String,
    pub element_id: Option<String>,
    pub text: Option<String>,
    pub content: ElementContent,
    pub description: Option<String>,
    pub category: Option<String>,
    pub importance: Option<String>,
    pub pii_type: PiiType,
    pub position_hint: Option<String>,
}

impl DetectedElement {
    pub fn new(element_type: impl Into<String>) -> Self {
        Self {
            element_type: element_type.into(),
            ..Self::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_content(mut self, content: ElementContent) -> Self {
        self.content = content;
        self
    }

    pub fn with_pii(mut self, pii_type: PiiType) -> Self {
        self.pii_type = pii_type;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Text used for cross-document comparison: the free text when present,
    /// otherwise list items joined by a space.
    pub fn text_sample(&self) -> Option<String> {
        if let Some(text) = self.text.as_deref().filter(|t| !t.is_empty()) {
            return Some(text.to_string());
        }
        match &self.content {
            ElementContent::List(items) if !items.is_empty() => Some(items.join(" ")),
            _ => None,
        }
    }

    pub fn chart(&self) -> Option<&ChartPayload> {
        match &self.content {
            ElementContent::Chart(chart) => Some(chart),
            _ => None,
        }
    }

    pub fn figure(&self) -> Option<&FigurePayload> {
        match &self.content {
            ElementContent::Figure(figure) => Some(figure),
            _ => None,
        }
    }
}

/// Wire shape of an element as the LLM emits it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawElement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    element_id: Option<String>,
    #[serde(rename = "type", default)]
    element_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient::opt_string_list"
    )]
    items: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    table: Option<TablePayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    chart: Option<ChartPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    figure: Option<FigurePayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    importance: Option<String>,
    #[serde(default)]
    pii_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position_hint: Option<String>,
}

impl From<RawElement> for DetectedElement {
    fn from(raw: RawElement) -> Self {
        let element_type = raw
            .element_type
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| "unknown".to_string());

        // First populated payload wins: items, table, chart, figure.
        let mut candidates: Vec<ElementContent> = Vec::new();
        if let Some(items) = raw.items.filter(|items| !items.is_empty()) {
            candidates.push(ElementContent::List(items));
        }
        if let Some(table) = raw.table {
            candidates.push(ElementContent::Table(table));
        }
        if let Some(chart) = raw.chart {
            candidates.push(ElementContent::Chart(chart));
        }
        if let Some(figure) = raw.figure {
            candidates.push(ElementContent::Figure(figure));
        }
        if candidates.len() > 1 {
            let dropped: Vec<&str> = candidates[1..].iter().map(|c| c.kind()).collect();
            tracing::debug!(
                element_type = %element_type,
                kept = candidates[0].kind(),
                dropped = ?dropped,
                "Element carried more than one payload"
            );
        }
        let content = candidates.into_iter().next().unwrap_or_default();

        Self {
            element_type,
            element_id: raw.element_id,
            text: raw.text,
            content,
            description: raw.description,
            category: raw.category,
            importance: raw.importance,
            pii_type: raw.pii_type.map(PiiType::from).unwrap_or_default(),
            position_hint: raw.position_hint,
        }
    }
}

impl From<DetectedElement> for RawElement {
    fn from(element: DetectedElement) -> Self {
        let mut raw = RawElement {
            element_id: element.element_id,
            element_type: Some(element.element_type),
            text: element.text,
            description: element.description,
            category: element.category,
            importance: element.importance,
            pii_type: Some(element.pii_type.into()),
            position_hint: element.position_hint,
            ..RawElement::default()
        };
        match element.content {
            ElementContent::Plain => {}
            ElementContent::List(items) => raw.items = Some(items),
            ElementContent::Table(table) => raw.table = Some(table),
            ElementContent::Chart(chart) => raw.chart = Some(chart),
            ElementContent::Figure(figure) => raw.figure = Some(figure),
        }
        raw
    }
}

/// Deserializers that accept numbers and booleans where the LLM was asked
/// for strings.
mod lenient {
    use super::*;

    fn value_to_string(value: Value) -> String {
        match value {
            Value::Null => String::new(),
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => other.to_string(),
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(value_to_string(Value::deserialize(deserializer)?))
    }

    pub fn opt_string<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => None,
            other => Some(value_to_string(other)),
        })
    }

    fn values_to_strings(value: Value) -> Vec<String> {
        match value {
            Value::Array(values) => values.into_iter().map(value_to_string).collect(),
            Value::Null => Vec::new(),
            other => vec![value_to_string(other)],
        }
    }

    pub fn string_list<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<String>, D::Error> {
        Ok(values_to_strings(Value::deserialize(deserializer)?))
    }

    pub fn opt_string_list<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<String>>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Null => None,
            other => Some(values_to_strings(other)),
        })
    }

    pub fn string_rows<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Vec<String>>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(rows) => rows.into_iter().map(values_to_strings).collect(),
            _ => Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pii_type_parsing() {
        assert_eq!(PiiType::from("ORG_NAME"), PiiType::OrgName);
        assert_eq!(PiiType::from("email"), PiiType::Email);
        assert_eq!(PiiType::from(""), PiiType::None);
        assert_eq!(PiiType::from("NONE"), PiiType::None);
        assert_eq!(
            PiiType::from("TAX_ID"),
            PiiType::Other("TAX_ID".to_string())
        );
        assert!(!PiiType::Other("TAX_ID".to_string()).is_none());
    }

    #[test]
    fn test_missing_type_becomes_unknown() {
        let element: DetectedElement = serde_json::from_value(json!({"text": "x"})).unwrap();
        assert_eq!(element.element_type, "unknown");
        assert_eq!(element.pii_type, PiiType::None);
    }

    #[test]
    fn test_first_payload_wins() {
        let element: DetectedElement = serde_json::from_value(json!({
            "type": "charts_graphs",
            "table": {"headers": ["a"], "rows": [["1"]]},
            "chart": {"chart_type": "bar", "data": [{"name": "Revenue", "value": 50}]}
        }))
        .unwrap();
        assert!(matches!(element.content, ElementContent::Table(_)));
        assert!(element.chart().is_none());
    }

    #[test]
    fn test_numeric_values_are_stringified() {
        let element: DetectedElement = serde_json::from_value(json!({
            "type": "charts_graphs",
            "chart": {
                "chart_type": "bar",
                "title": "Revenue",
                "data": [{"name": "Q1", "value": 2.5, "unit": "USD"}],
                "labels": ["Q1"]
            }
        }))
        .unwrap();
        let chart = element.chart().unwrap();
        assert_eq!(chart.data[0].value, "2.5");
        assert_eq!(chart.data[0].unit.as_deref(), Some("USD"));
        assert!(chart.extra.contains_key("labels"));
    }

    #[test]
    fn test_text_sample_prefers_text_then_items() {
        let with_text = DetectedElement::new("paragraph").with_text("Hello");
        assert_eq!(with_text.text_sample().as_deref(), Some("Hello"));

        let with_items = DetectedElement::new("bullet_list").with_content(ElementContent::List(
            vec!["one".to_string(), "two".to_string()],
        ));
        assert_eq!(with_items.text_sample().as_deref(), Some("one two"));

        let empty_text = DetectedElement::new("paragraph").with_text("");
        assert_eq!(empty_text.text_sample(), None);
    }

    #[test]
    fn test_empty_items_are_not_a_list() {
        let element: DetectedElement =
            serde_json::from_value(json!({"type": "bullet_list", "items": []})).unwrap();
        assert_eq!(element.content, ElementContent::Plain);
    }

    #[test]
    fn test_serializes_back_to_wire_shape() {
        let element = DetectedElement::new("bullet_list")
            .with_content(ElementContent::List(vec!["a".to_string()]))
            .with_pii(PiiType::Email);
        let value = serde_json::to_value(&element).unwrap();
        assert_eq!(value["type"], "bullet_list");
        assert_eq!(value["items"], json!(["a"]));
        assert_eq!(value["pii_type"], "EMAIL");
        assert!(value.get("chart").is_none());
    }
}
